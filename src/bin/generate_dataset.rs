use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use attendance_risk::data::{self, DEFAULT_ROWS};
use attendance_risk::RiskLabel;

#[derive(Parser)]
#[command(name = "generate-dataset")]
#[command(about = "Synthesize a labeled attendance dataset for classifier training", long_about = None)]
struct Args {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    #[arg(long, default_value = "attendance_data.csv")]
    out: PathBuf,
    /// Fix the random seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    attendance_risk::init_tracing();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let rows = data::generate_rows(&mut rng, args.rows);

    for label in RiskLabel::ALL {
        let count = rows.iter().filter(|row| row.status == label).count();
        tracing::debug!(status = label.as_str(), count, "class distribution");
    }

    data::write_csv(&args.out, &rows)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    tracing::info!("✅ {}-row percentage-based dataset generated at {}", rows.len(), args.out.display());

    Ok(())
}
