use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use attendance_risk::data;
use attendance_risk::model;

#[derive(Parser)]
#[command(name = "train-model")]
#[command(about = "Fit the attendance risk classifier and write its artifact", long_about = None)]
struct Args {
    #[arg(long, default_value = "attendance_data.csv")]
    data: PathBuf,
    #[arg(long, default_value = "attendance_model.json")]
    out: PathBuf,
    #[arg(long, default_value_t = 100)]
    max_iterations: u64,
}

fn main() -> anyhow::Result<()> {
    attendance_risk::init_tracing();
    let args = Args::parse();

    tracing::info!("🚀 Loading attendance data from {}", args.data.display());
    let rows = data::load_data(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    anyhow::ensure!(!rows.is_empty(), "{} has no rows", args.data.display());
    tracing::info!("Loaded {} attendance records", rows.len());

    let (features, targets) = data::to_training_set(&rows);

    tracing::info!("📊 Training multinomial logistic regression...");
    let trained = model::train_model(features, targets, args.max_iterations)?;
    tracing::info!("🎯 Accuracy: {:.2}%", trained.info().accuracy * 100.0);

    trained
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    tracing::info!("Model written to {}", args.out.display());

    Ok(())
}
