use clap::Parser;
use simulator::{output::export_trajectory, ExperimentDir};
use std::path::PathBuf;

/// Export energy / fidelity / HR-distance trajectories to CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Experiment directory written by `vqe`
    #[arg(long, env = "VQE_OUTPUT_DIR")]
    input_dir: PathBuf,

    /// HR run to include, e.g. 10000_shots_aer_simulator
    #[arg(long)]
    hr_tag: Option<String>,

    /// Moving-average window; writes <out>.ma.csv as well
    #[arg(long)]
    window: Option<usize>,

    /// Output CSV path
    #[arg(long, default_value = "trajectory.csv")]
    out: PathBuf,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simulator::logging::init_logging(args.verbose);

    if args.window == Some(0) {
        anyhow::bail!("window must be > 0");
    }

    let dir = ExperimentDir::open(&args.input_dir)?;
    let rows = export_trajectory(&dir, args.hr_tag.as_deref(), &args.out, args.window)?;
    tracing::info!(rows = rows.len(), out = %args.out.display(), "trajectory written");
    Ok(())
}
