pub mod api;
pub mod attendance;
pub mod band;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod scenario;

pub use attendance::{project, AttendanceInput, ProjectionResult};
pub use band::RiskBand;
pub use error::{AnalysisError, ClassifierError};
pub use model::{RiskClassifier, RiskLabel, TrainedModel};
pub use report::{Analyzer, AttendanceReport};
pub use scenario::ScenarioRow;

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
