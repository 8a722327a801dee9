use serde::{Deserialize, Serialize};

use crate::attendance::{AttendanceInput, ProjectionResult};
use crate::band::RiskBand;
use crate::error::ClassifierError;
use crate::model::{RiskClassifier, RiskLabel};

/// Largest number of extra leave days explored by the what-if table.
pub const MAX_EXTRA_LEAVE_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScenarioRow {
    pub extra_leave_days: i64,
    pub total_leave_days: i64,
    pub final_attended_days: i64,
    pub final_percentage: f64,
    pub band: RiskBand,
    pub risk_label: RiskLabel,
}

/// What-if rows for taking 1..=7 more leave days than the remaining budget,
/// assuming every other remaining day is attended. Yields nothing once the
/// budget is already blown. Each row costs one classifier call, made lazily.
pub struct Scenarios<'a, C: RiskClassifier + ?Sized> {
    input: &'a AttendanceInput,
    remaining_leaves: i64,
    classifier: &'a C,
    next_extra: i64,
}

impl<'a, C: RiskClassifier + ?Sized> Scenarios<'a, C> {
    pub fn new(input: &'a AttendanceInput, projection: &ProjectionResult, classifier: &'a C) -> Self {
        let next_extra = if projection.leave_budget_exceeded() {
            MAX_EXTRA_LEAVE_DAYS + 1
        } else {
            1
        };
        Self {
            input,
            remaining_leaves: projection.remaining_leaves,
            classifier,
            next_extra,
        }
    }

    fn row(&self, extra: i64, total_leave_days: i64) -> Result<ScenarioRow, ClassifierError> {
        let total_working_days = self.input.total_working_days as i64;
        let final_attended_days = (self.input.days_attended as i64
            + (total_working_days - self.input.days_completed as i64 - extra))
            .max(0);
        let final_percentage = final_attended_days as f64 / total_working_days as f64 * 100.0;

        Ok(ScenarioRow {
            extra_leave_days: extra,
            total_leave_days,
            final_attended_days,
            final_percentage,
            band: RiskBand::from_gap(final_percentage, self.input.required_percentage),
            risk_label: self.classifier.classify(final_percentage)?,
        })
    }
}

impl<'a, C: RiskClassifier + ?Sized> Iterator for Scenarios<'a, C> {
    type Item = Result<ScenarioRow, ClassifierError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_extra <= MAX_EXTRA_LEAVE_DAYS {
            let extra = self.next_extra;
            self.next_extra += 1;

            let total_leave_days = self.remaining_leaves + extra;
            if total_leave_days > self.input.total_working_days as i64 {
                continue;
            }
            return Some(self.row(extra, total_leave_days));
        }
        None
    }
}

pub fn enumerate<'a, C: RiskClassifier + ?Sized>(
    input: &'a AttendanceInput,
    projection: &ProjectionResult,
    classifier: &'a C,
) -> Scenarios<'a, C> {
    Scenarios::new(input, projection, classifier)
}
