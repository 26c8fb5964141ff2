use clap::Parser;
use simulator::{run_reconstruction, HrConfig};
use std::path::PathBuf;

/// Hamiltonian reconstruction and fidelity over a finished VQE run
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Experiment directory written by `vqe`
    #[arg(long, env = "VQE_OUTPUT_DIR")]
    input_dir: PathBuf,

    /// Shots per measurement basis
    #[arg(long, default_value_t = 10000)]
    shots: usize,

    /// Backend identifier: aer_simulator | local_simulator | exact
    #[arg(long, default_value = "aer_simulator")]
    backend: String,

    /// Only reconstruct the indices listed in param_indices.json
    #[arg(long)]
    param_indices: bool,

    /// Ignore cached histograms and measure again
    #[arg(long)]
    no_cache: bool,

    /// RNG seed (full reproducibility)
    #[arg(long, default_value = "hr-seed")]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simulator::logging::init_logging(args.verbose);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }

    let config = HrConfig {
        input_dir: args.input_dir,
        shots: args.shots,
        backend: args.backend,
        use_param_indices: args.param_indices,
        use_cache: !args.no_cache,
        seed: args.seed,
    };

    let outcome = run_reconstruction(&config)?;
    let best = outcome
        .distances
        .iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance));
    match best {
        Some(p) => println!(
            "HR [{}]: {} points, min distance = {:.6} at index {}",
            outcome.tag,
            outcome.distances.len(),
            p.distance,
            p.param_index
        ),
        None => println!("HR [{}]: no parameter indices selected", outcome.tag),
    }
    tracing::info!(fidelities = outcome.fidelities.len(), "done");
    Ok(())
}
