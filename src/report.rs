use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::attendance::{self, AttendanceInput, ProjectionResult};
use crate::band::RiskBand;
use crate::error::Result;
use crate::model::{RiskClassifier, RiskLabel};
use crate::scenario::{self, ScenarioRow};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FutureOutlook {
    pub days: i64,
    pub attendance_percentage: f64,
    pub band: RiskBand,
    pub risk_label: RiskLabel,
}

/// Everything the calculator shows after one "Analyze Attendance" action.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttendanceReport {
    pub input: AttendanceInput,
    pub projection: ProjectionResult,
    pub band: RiskBand,
    pub current_risk: RiskLabel,
    /// Present only when the goal is reachable and not yet met.
    pub after_needed_days: Option<FutureOutlook>,
    /// Empty when the leave budget is already exceeded.
    pub scenarios: Vec<ScenarioRow>,
    pub guidance: String,
    pub leave_advice: String,
}

/// Runs the projection and every classifier query against one injected model.
pub struct Analyzer<'a, C: RiskClassifier + ?Sized> {
    classifier: &'a C,
}

impl<'a, C: RiskClassifier + ?Sized> Analyzer<'a, C> {
    pub fn new(classifier: &'a C) -> Self {
        Analyzer { classifier }
    }

    pub fn analyze(&self, input: &AttendanceInput) -> Result<AttendanceReport> {
        input.validate()?;
        let projection = attendance::project(input)?;
        let goal = input.required_percentage;

        let band = RiskBand::from_gap(projection.current_percentage, goal);
        let current_risk = self.classifier.classify(projection.current_percentage)?;

        let after_needed_days = match projection.needed_days {
            Some(days) if days > 0 => {
                let attendance_percentage = projection.percentage_after(days, input.classes_per_day);
                Some(FutureOutlook {
                    days,
                    attendance_percentage,
                    band: RiskBand::from_gap(attendance_percentage, goal),
                    risk_label: self.classifier.classify(attendance_percentage)?,
                })
            }
            _ => None,
        };

        let scenarios = scenario::enumerate(input, &projection, self.classifier)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(
            current = projection.current_percentage,
            remaining_leaves = projection.remaining_leaves,
            needed_days = ?projection.needed_days,
            scenarios = scenarios.len(),
            "attendance analyzed"
        );

        Ok(AttendanceReport {
            guidance: guidance_text(&projection, goal),
            leave_advice: leave_text(&projection, goal),
            input: input.clone(),
            projection,
            band,
            current_risk,
            after_needed_days,
            scenarios,
        })
    }
}

pub fn guidance_text(projection: &ProjectionResult, goal: f64) -> String {
    match projection.needed_days {
        Some(days) => format!(
            "You need to attend next {} days continuously to reach {}%.",
            days, goal
        ),
        None => "Even attending all remaining classes will not reach the required attendance."
            .to_string(),
    }
}

pub fn leave_text(projection: &ProjectionResult, goal: f64) -> String {
    if projection.leave_budget_exceeded() {
        "You have already exceeded the safe leave limit.".to_string()
    } else {
        format!(
            "You can take {} more leave days and still maintain {}%.",
            projection.remaining_leaves, goal
        )
    }
}

pub fn scenario_line(row: &ScenarioRow) -> String {
    format!(
        "If you take {} leave days → Final Attendance: {:.2}% {} → ML: {}",
        row.total_leave_days, row.final_percentage, row.band, row.risk_label
    )
}

pub fn render_text(report: &AttendanceReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "🎓 Student Attendance Risk Prediction");
    let _ = writeln!(output);
    let _ = writeln!(output, "📊 Current Status");
    let _ = writeln!(
        output,
        "Current Attendance: {:.2}% {}",
        report.projection.current_percentage, report.band
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "📈 Guidance");
    let _ = writeln!(output, "{}", report.guidance);
    let _ = writeln!(output, "{}", report.leave_advice);
    let _ = writeln!(output);
    let _ = writeln!(output, "🤖 ML Prediction");
    let _ = writeln!(output, "Current Prediction: {}", report.current_risk);

    if let Some(future) = &report.after_needed_days {
        let _ = writeln!(
            output,
            "If you attend {} days → Attendance: {:.2}% {} → ML: {}",
            future.days, future.attendance_percentage, future.band, future.risk_label
        );
    }

    if !report.projection.leave_budget_exceeded() {
        let _ = writeln!(output);
        let _ = writeln!(output, "🧪 What if you take more leave days?");
        for row in &report.scenarios {
            let _ = writeln!(output, "{}", scenario_line(row));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalysisError, ClassifierError};
    use ndarray::Array2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl RiskClassifier for Counting {
        fn predict(&self, features: &Array2<f64>) -> std::result::Result<Vec<RiskLabel>, ClassifierError> {
            self.calls.fetch_add(features.nrows(), Ordering::SeqCst);
            Ok(features
                .rows()
                .into_iter()
                .map(|row| RiskLabel::from_attendance(row[0]))
                .collect())
        }
    }

    #[test]
    fn default_form_report() {
        let classifier = Counting::default();
        let report = Analyzer::new(&classifier).analyze(&AttendanceInput::default()).unwrap();

        assert_eq!(report.band, RiskBand::Safe);
        assert_eq!(report.current_risk, RiskLabel::Safe);
        assert!(report.after_needed_days.is_none());
        assert_eq!(report.scenarios.len(), 7);
        assert_eq!(report.guidance, "You need to attend next 0 days continuously to reach 75%.");
        assert_eq!(report.leave_advice, "You can take 15 more leave days and still maintain 75%.");
        // current + seven what-if rows
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn catching_up_adds_future_outlook() {
        let classifier = Counting::default();
        let input = AttendanceInput {
            days_attended: 15,
            ..AttendanceInput::default()
        };
        let report = Analyzer::new(&classifier).analyze(&input).unwrap();

        assert_eq!(report.band, RiskBand::VeryHighRisk);
        assert_eq!(report.current_risk, RiskLabel::Critical);
        let future = report.after_needed_days.as_ref().unwrap();
        assert_eq!(future.days, 30);
        assert_eq!(future.attendance_percentage, 75.0);
        assert_eq!(future.band, RiskBand::Safe);
        assert_eq!(future.risk_label, RiskLabel::Safe);
        // 15 leaves taken against a budget of 20
        assert_eq!(report.projection.remaining_leaves, 5);
        assert_eq!(report.scenarios.len(), 7);
    }

    #[test]
    fn exceeded_budget_hides_what_if_section() {
        let classifier = Counting::default();
        let input = AttendanceInput {
            days_attended: 5,
            ..AttendanceInput::default()
        };
        let report = Analyzer::new(&classifier).analyze(&input).unwrap();

        assert!(report.scenarios.is_empty());
        assert_eq!(report.leave_advice, "You have already exceeded the safe leave limit.");
        let text = render_text(&report);
        assert!(!text.contains("What if"));
        assert!(text.contains("exceeded the safe leave limit"));
    }

    #[test]
    fn unreachable_goal_is_guidance_not_error() {
        let classifier = Counting::default();
        let input = AttendanceInput {
            total_working_days: 40,
            days_attended: 5,
            ..AttendanceInput::default()
        };
        let report = Analyzer::new(&classifier).analyze(&input).unwrap();
        assert!(report.projection.needed_days.is_none());
        assert!(report.after_needed_days.is_none());
        assert_eq!(
            report.guidance,
            "Even attending all remaining classes will not reach the required attendance."
        );
    }

    #[test]
    fn no_classes_stops_before_classifying() {
        let classifier = Counting::default();
        let input = AttendanceInput {
            days_completed: 0,
            days_attended: 0,
            ..AttendanceInput::default()
        };
        let err = Analyzer::new(&classifier).analyze(&input).unwrap_err();
        assert!(matches!(err, AnalysisError::NoClassesCompleted));
        assert_eq!(err.to_string(), "No classes completed yet.");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rendered_text_lists_every_section() {
        let classifier = Counting::default();
        let report = Analyzer::new(&classifier)
            .analyze(&AttendanceInput {
                days_attended: 20,
                ..AttendanceInput::default()
            })
            .unwrap();
        let text = render_text(&report);

        assert!(text.contains("Current Attendance: 66.67% 😐 Slight Risk"));
        assert!(text.contains("Current Prediction: 😟 At Risk"));
        assert!(text.contains("If you attend 10 days → Attendance: 75.00%"));
        assert!(text.contains("If you take 11 leave days → Final Attendance: 86.25% 😊 Safe → ML: 😊 Safe"));
        assert_eq!(text.matches("If you take").count(), 7);
    }
}
