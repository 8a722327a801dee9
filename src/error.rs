use thiserror::Error;

/// Failures raised while loading, training or querying the risk classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    #[error("feature matrix must have {expected} columns, got {actual}")]
    FeatureShape { expected: usize, actual: usize },

    #[error("classifier returned {actual} labels for {expected} rows")]
    LabelCount { expected: usize, actual: usize },

    #[error("training failed: {0}")]
    Training(String),
}

/// Errors that stop an attendance analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No classes completed yet.")]
    NoClassesCompleted,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("risk classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
