use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use attendance_risk::model::{ModelInfo, RiskClassifier, TrainedModel};
use attendance_risk::report::{render_text, Analyzer};
use attendance_risk::{api, AttendanceInput};

#[derive(Parser)]
#[command(name = "attendance-risk")]
#[command(about = "Student attendance risk calculator backed by a trained classifier", long_about = None)]
struct Cli {
    /// Serialized classifier produced by `train-model`
    #[arg(long, global = true, env = "ATTENDANCE_MODEL", default_value = "attendance_model.json")]
    model: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(long, env = "ATTENDANCE_HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "ATTENDANCE_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Analyze one set of numbers and print the report
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(long, default_value_t = 6)]
    classes_per_day: u32,
    #[arg(long, default_value_t = 80)]
    total_working_days: u32,
    #[arg(long, default_value_t = 30)]
    days_completed: u32,
    #[arg(long, default_value_t = 25)]
    days_attended: u32,
    #[arg(long, default_value_t = 75.0)]
    required_percentage: f64,
}

impl From<AnalyzeArgs> for AttendanceInput {
    fn from(args: AnalyzeArgs) -> Self {
        AttendanceInput {
            classes_per_day: args.classes_per_day,
            total_working_days: args.total_working_days,
            days_completed: args.days_completed,
            days_attended: args.days_attended,
            required_percentage: args.required_percentage,
        }
    }
}

fn analyze_text(classifier: &dyn RiskClassifier, input: &AttendanceInput) -> anyhow::Result<String> {
    let report = Analyzer::new(classifier).analyze(input)?;
    Ok(render_text(&report))
}

async fn start_api(model: TrainedModel, host: String, port: u16) -> std::io::Result<()> {
    let info_data = web::Data::new(model.info().clone());
    let classifier: Arc<dyn RiskClassifier> = Arc::new(model);
    let model_data = web::Data::from(classifier);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(model_data.clone())
            .app_data(info_data.clone())
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

fn load_model(path: &Path) -> anyhow::Result<TrainedModel> {
    let model = TrainedModel::load(path)
        .with_context(|| format!("failed to load classifier from {}", path.display()))?;
    let info: &ModelInfo = model.info();
    tracing::info!(
        path = %path.display(),
        accuracy = info.accuracy,
        training_rows = info.training_rows,
        "🤖 classifier loaded"
    );
    Ok(model)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    attendance_risk::init_tracing();
    let cli = Cli::parse();
    let model = load_model(&cli.model)?;

    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!("🌐 Starting Attendance Risk API on http://{}:{}", host, port);
            start_api(model, host, port).await?;
        }
        Commands::Analyze(args) => {
            let input = AttendanceInput::from(args);
            print!("{}", analyze_text(&model, &input)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_risk::{ClassifierError, RiskLabel};
    use ndarray::Array2;

    struct Threshold;

    impl RiskClassifier for Threshold {
        fn predict(&self, features: &Array2<f64>) -> Result<Vec<RiskLabel>, ClassifierError> {
            Ok(features
                .rows()
                .into_iter()
                .map(|row| RiskLabel::from_attendance(row[0]))
                .collect())
        }
    }

    fn analyze_args(argv: &[&str]) -> AttendanceInput {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Analyze(args) => AttendanceInput::from(args),
            Commands::Serve { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn analyze_defaults_match_the_form() {
        let input = analyze_args(&["attendance-risk", "analyze"]);
        assert_eq!(input, AttendanceInput::default());
    }

    #[test]
    fn analyze_prints_catch_up_report() {
        let input = analyze_args(&[
            "attendance-risk",
            "--model",
            "custom.json",
            "analyze",
            "--days-attended",
            "15",
        ]);
        assert_eq!(input.days_attended, 15);

        let text = analyze_text(&Threshold, &input).unwrap();
        assert!(text.contains("Current Attendance: 50.00% 😰 Very High Risk"));
        assert!(text.contains("You need to attend next 30 days continuously to reach 75%."));
        assert!(text.contains("Current Prediction: 💀 Critical"));
        assert_eq!(text.matches("If you take").count(), 7);
    }

    #[test]
    fn analyze_surfaces_no_classes_error() {
        let input = analyze_args(&["attendance-risk", "analyze", "--days-completed", "0", "--days-attended", "0"]);
        let err = analyze_text(&Threshold, &input).unwrap_err();
        assert_eq!(err.to_string(), "No classes completed yet.");
    }

    #[test]
    fn serve_reads_host_and_port() {
        let cli = Cli::try_parse_from(["attendance-risk", "serve", "--port", "9090"]).unwrap();
        assert_eq!(cli.model, PathBuf::from("attendance_model.json"));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 9090);
            }
            Commands::Analyze(_) => panic!("expected serve"),
        }
    }
}
