use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentational severity of the gap between actual and goal attendance.
/// Ordered from best to worst.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Safe,
    AlmostThere,
    SlightRisk,
    AtRisk,
    HighRisk,
    VeryHighRisk,
    Dead,
}

impl RiskBand {
    pub fn from_gap(actual: f64, goal: f64) -> Self {
        let diff = actual - goal;
        if diff >= 0.0 {
            RiskBand::Safe
        } else if diff >= -5.0 {
            RiskBand::AlmostThere
        } else if diff >= -10.0 {
            RiskBand::SlightRisk
        } else if diff >= -15.0 {
            RiskBand::AtRisk
        } else if diff >= -20.0 {
            RiskBand::HighRisk
        } else if diff >= -25.0 {
            RiskBand::VeryHighRisk
        } else {
            RiskBand::Dead
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskBand::Safe => "😊",
            RiskBand::AlmostThere => "🙂",
            RiskBand::SlightRisk => "😐",
            RiskBand::AtRisk => "😕",
            RiskBand::HighRisk => "😟",
            RiskBand::VeryHighRisk => "😰",
            RiskBand::Dead => "💀",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Safe => "Safe",
            RiskBand::AlmostThere => "Almost there",
            RiskBand::SlightRisk => "Slight Risk",
            RiskBand::AtRisk => "At Risk",
            RiskBand::HighRisk => "High Risk",
            RiskBand::VeryHighRisk => "Very High Risk",
            RiskBand::Dead => "Dead",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}
