use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{arr2, Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ClassifierError;

/// Stand-in for the average internal score. Every call site passes this
/// constant as the third feature.
pub const AVERAGE_INTERNAL_SCORE: f64 = 70.0;

pub const FEATURE_COUNT: usize = 3;
/// Every feature is a 0-100 quantity; the regression sees them as fractions.
pub const FEATURE_SCALE: f64 = 100.0;
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["attendance_percentage", "leave_percentage", "internal_marks"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RiskLabel {
    #[default]
    Safe,
    #[serde(rename = "At Risk")]
    AtRisk,
    Critical,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; 3] = [RiskLabel::Safe, RiskLabel::AtRisk, RiskLabel::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AtRisk => "At Risk",
            RiskLabel::Critical => "Critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "😊",
            RiskLabel::AtRisk => "😟",
            RiskLabel::Critical => "💀",
        }
    }

    /// Ground-truth rule used when synthesizing training rows.
    pub fn from_attendance(attendance_percentage: f64) -> Self {
        if attendance_percentage >= 75.0 {
            RiskLabel::Safe
        } else if attendance_percentage >= 60.0 {
            RiskLabel::AtRisk
        } else {
            RiskLabel::Critical
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.as_str())
    }
}

/// Builds the single feature row the classifier expects for an attendance
/// percentage: attendance, leave share, fixed internal score.
pub fn feature_row(attendance_percentage: f64) -> [f64; FEATURE_COUNT] {
    [
        attendance_percentage,
        100.0 - attendance_percentage,
        AVERAGE_INTERNAL_SCORE,
    ]
}

/// A trained attendance risk classifier. Implementations must be pure: the
/// same matrix always yields the same labels.
pub trait RiskClassifier: Send + Sync {
    /// One label per row of an `n x 3` feature matrix.
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<RiskLabel>, ClassifierError>;

    fn classify(&self, attendance_percentage: f64) -> Result<RiskLabel, ClassifierError> {
        let features = arr2(&[feature_row(attendance_percentage)]);
        let labels = self.predict(&features)?;
        labels
            .into_iter()
            .next()
            .ok_or(ClassifierError::LabelCount { expected: 1, actual: 0 })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassRecall {
    pub label: RiskLabel,
    pub support: usize,
    pub recall: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelInfo {
    pub accuracy: f64,
    pub training_rows: usize,
    pub classes: Vec<RiskLabel>,
    pub features: Vec<String>,
    #[serde(default)]
    pub class_recall: Vec<ClassRecall>,
}

pub fn scale_features(features: &Array2<f64>) -> Array2<f64> {
    features / FEATURE_SCALE
}

/// On-disk form of the trained model: metadata plus fitted parameters.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub info: ModelInfo,
    pub model: MultiFittedLogisticRegression<f64, RiskLabel>,
}

/// Multinomial logistic regression over the three attendance features.
pub struct TrainedModel {
    info: ModelInfo,
    model: MultiFittedLogisticRegression<f64, RiskLabel>,
}

impl TrainedModel {
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)?;
        Ok(Self {
            info: artifact.info,
            model: artifact.model,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClassifierError> {
        let artifact = ModelArtifact {
            info: self.info.clone(),
            model: self.model.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&artifact)?)?;
        Ok(())
    }
}

impl RiskClassifier for TrainedModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<RiskLabel>, ClassifierError> {
        if features.ncols() != FEATURE_COUNT {
            return Err(ClassifierError::FeatureShape {
                expected: FEATURE_COUNT,
                actual: features.ncols(),
            });
        }
        let labels = self.model.predict(&scale_features(features)).to_vec();
        if labels.len() != features.nrows() {
            return Err(ClassifierError::LabelCount {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        Ok(labels)
    }
}

/// Overall accuracy plus recall for each label present in `targets`.
pub fn score_predictions(
    predictions: &Array1<RiskLabel>,
    targets: &Array1<RiskLabel>,
) -> (f64, Vec<ClassRecall>) {
    let mut hits = 0;
    let mut class_recall: Vec<ClassRecall> = Vec::new();

    for label in RiskLabel::ALL {
        let support = targets.iter().filter(|&&actual| actual == label).count();
        if support == 0 {
            continue;
        }
        let correct = predictions
            .iter()
            .zip(targets.iter())
            .filter(|&(&pred, &actual)| actual == label && pred == label)
            .count();
        hits += correct;
        class_recall.push(ClassRecall {
            label,
            support,
            recall: correct as f64 / support as f64,
        });
    }

    let accuracy = if targets.is_empty() {
        0.0
    } else {
        hits as f64 / targets.len() as f64
    };
    (accuracy, class_recall)
}

pub fn train_model(
    features: Array2<f64>,
    targets: Array1<RiskLabel>,
    max_iterations: u64,
) -> Result<TrainedModel, ClassifierError> {
    if features.ncols() != FEATURE_COUNT {
        return Err(ClassifierError::FeatureShape {
            expected: FEATURE_COUNT,
            actual: features.ncols(),
        });
    }

    let training_rows = features.nrows();
    let dataset = Dataset::new(scale_features(&features), targets);
    let model = MultiLogisticRegression::default()
        .max_iterations(max_iterations)
        .fit(&dataset)
        .map_err(|e| ClassifierError::Training(e.to_string()))?;

    let predictions = model.predict(dataset.records());
    let (accuracy, class_recall) = score_predictions(&predictions, dataset.targets());
    let classes = class_recall.iter().map(|entry| entry.label).collect();

    Ok(TrainedModel {
        info: ModelInfo {
            accuracy,
            training_rows,
            classes,
            features: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            class_recall,
        },
        model,
    })
}
