use clap::{Parser, ValueEnum};
use quantum::ansatz::AnsatzKind;
use simulator::{run_vqe, MeasurementMode, VqeConfig};
use std::path::PathBuf;

/// VQE for the 2-D J1-J2 transverse-field lattice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lattice rows
    #[arg(long, default_value_t = 2)]
    m: usize,

    /// Lattice columns
    #[arg(long, default_value_t = 2)]
    n: usize,

    /// Nearest-neighbour coupling
    #[arg(long, default_value_t = 0.5)]
    j1: f64,

    /// Next-nearest-neighbour coupling
    #[arg(long, default_value_t = 0.05)]
    j2: f64,

    /// Ansatz family: ALA | HVA
    #[arg(long, default_value = "ALA")]
    ansatz: AnsatzKind,

    /// Number of ansatz layers
    #[arg(long, default_value_t = 2)]
    layers: usize,

    /// Energy measurement mode
    #[arg(long, value_enum, default_value_t = Mode::Shots)]
    mode: Mode,

    /// Shots per measurement basis (shot mode)
    #[arg(long, default_value_t = 1000)]
    shots: usize,

    /// Objective evaluation budget
    #[arg(long, default_value_t = 200)]
    max_iter: usize,

    /// Backend identifier
    #[arg(long, default_value = "aer_simulator")]
    backend: String,

    /// Experiment directory (default: results/<lattice and couplings>)
    #[arg(long, env = "VQE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// JSON parameter vector to start from
    #[arg(long)]
    init_param: Option<PathBuf>,

    /// RNG seed (full reproducibility)
    #[arg(long, default_value = "vqe-seed")]
    seed: String,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Shots,
    Statevector,
}

impl From<Mode> for MeasurementMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Shots => MeasurementMode::Shots,
            Mode::Statevector => MeasurementMode::Statevector,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simulator::logging::init_logging(args.verbose);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }

    let output_dir = args.output_dir.unwrap_or_else(|| {
        PathBuf::from("results").join(format!(
            "{}x{}_j1_{}_j2_{}_{}_{}layers",
            args.m, args.n, args.j1, args.j2, args.ansatz, args.layers
        ))
    });

    let config = VqeConfig {
        m: args.m,
        n: args.n,
        j1: args.j1,
        j2: args.j2,
        ansatz: args.ansatz,
        n_layers: args.layers,
        mode: args.mode.into(),
        shots: args.shots,
        max_iter: args.max_iter,
        output_dir,
        init_params: args.init_param,
        seed: args.seed,
        backend: args.backend,
    };

    let outcome = run_vqe(&config)?;
    println!(
        "VQE: best E = {:.6} (index {}), exact E0 = {:.6}, {} evaluations, {:?} -> {}",
        outcome.best_energy,
        outcome.best_index,
        outcome.ground_energy,
        outcome.evaluations,
        outcome.state,
        config.output_dir.display()
    );
    Ok(())
}
