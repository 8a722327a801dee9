use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const MIN_REQUIRED_PERCENTAGE: f64 = 50.0;
pub const MAX_REQUIRED_PERCENTAGE: f64 = 100.0;

/// The five numbers a student enters on the calculator form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AttendanceInput {
    pub classes_per_day: u32,
    pub total_working_days: u32,
    pub days_completed: u32,
    pub days_attended: u32,
    pub required_percentage: f64,
}

impl Default for AttendanceInput {
    fn default() -> Self {
        Self {
            classes_per_day: 6,
            total_working_days: 80,
            days_completed: 30,
            days_attended: 25,
            required_percentage: 75.0,
        }
    }
}

impl AttendanceInput {
    /// Checks the per-field bounds of the form. Cross-field relations
    /// (attended <= completed <= total) are deliberately left unchecked.
    pub fn validate(&self) -> Result<()> {
        if self.classes_per_day < 1 {
            return Err(AnalysisError::InvalidInput(
                "classes per day must be at least 1".to_string(),
            ));
        }
        if self.total_working_days < 1 {
            return Err(AnalysisError::InvalidInput(
                "total working days must be at least 1".to_string(),
            ));
        }
        if !(MIN_REQUIRED_PERCENTAGE..=MAX_REQUIRED_PERCENTAGE).contains(&self.required_percentage) {
            return Err(AnalysisError::InvalidInput(format!(
                "required attendance must be between {} and {}",
                MIN_REQUIRED_PERCENTAGE, MAX_REQUIRED_PERCENTAGE
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProjectionResult {
    pub total_classes: i64,
    pub classes_done: i64,
    pub attended_classes: i64,
    pub leaves_taken: i64,
    pub current_percentage: f64,
    pub max_leave_days: i64,
    pub remaining_leaves: i64,
    pub future_days: i64,
    /// `None` when even full attendance on every remaining day falls short.
    pub needed_days: Option<i64>,
}

impl ProjectionResult {
    pub fn leave_budget_exceeded(&self) -> bool {
        self.remaining_leaves < 0
    }

    /// Attendance percentage after attending `days` more full days.
    pub fn percentage_after(&self, days: i64, classes_per_day: u32) -> f64 {
        let extra = days * classes_per_day as i64;
        (self.attended_classes + extra) as f64 / (self.classes_done + extra) as f64 * 100.0
    }
}

pub fn max_leave_days(total_working_days: u32, required_percentage: f64) -> i64 {
    let required_days = (required_percentage / 100.0 * total_working_days as f64).ceil() as i64;
    total_working_days as i64 - required_days
}

pub fn project(input: &AttendanceInput) -> Result<ProjectionResult> {
    let classes_per_day = input.classes_per_day as i64;
    let total_working_days = input.total_working_days as i64;
    let days_completed = input.days_completed as i64;
    let days_attended = input.days_attended as i64;

    let total_classes = classes_per_day * total_working_days;
    let classes_done = classes_per_day * days_completed;
    let attended_classes = classes_per_day * days_attended;
    let leaves_taken = days_completed - days_attended;

    if classes_done == 0 {
        return Err(AnalysisError::NoClassesCompleted);
    }

    let current_percentage = attended_classes as f64 / classes_done as f64 * 100.0;

    let max_leave_days = max_leave_days(input.total_working_days, input.required_percentage);
    let remaining_leaves = max_leave_days - leaves_taken;

    let future_days = total_working_days - days_completed;
    let needed_days = needed_days(
        attended_classes,
        classes_done,
        classes_per_day,
        future_days,
        input.required_percentage,
    );

    Ok(ProjectionResult {
        total_classes,
        classes_done,
        attended_classes,
        leaves_taken,
        current_percentage,
        max_leave_days,
        remaining_leaves,
        future_days,
        needed_days,
    })
}

// Smallest number of consecutive fully attended days that lifts attendance to
// the goal. An overrun semester (negative future_days) searches nothing.
fn needed_days(
    attended_classes: i64,
    classes_done: i64,
    classes_per_day: i64,
    future_days: i64,
    required_percentage: f64,
) -> Option<i64> {
    (0..=future_days).find(|&i| {
        let future_attended = attended_classes + i * classes_per_day;
        let future_total = classes_done + i * classes_per_day;
        future_attended as f64 / future_total as f64 * 100.0 >= required_percentage
    })
}
