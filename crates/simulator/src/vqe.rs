use crate::error::{PipelineError, PipelineResult};
use crate::history::HistoryLog;
use crate::optimizer::{ImplicitFiltering, LoopState, Optimizer, PARAM_BOUNDS};
use crate::store::{read_json, ExperimentDir, MeasurementMode, VqeRecord};
use quantum::{
    ansatz::{Ansatz, AnsatzKind},
    backend::{resolve_backend, Backend},
    energy::{energy_shots, energy_statevector},
    ground::ground_state,
    J1J2Model, Lattice, QuantumError, QuantumResult, SparseHamiltonian,
};
use rng::ONDRng;
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Debug)]
pub struct VqeConfig {
    pub m: usize,
    pub n: usize,
    pub j1: f64,
    pub j2: f64,
    pub ansatz: AnsatzKind,
    pub n_layers: usize,
    pub mode: MeasurementMode,
    /// Shots per measurement basis; ignored in statevector mode.
    pub shots: usize,
    /// Objective evaluation budget.
    pub max_iter: usize,
    pub output_dir: PathBuf,
    /// JSON parameter vector to start from instead of a seeded draw.
    pub init_params: Option<PathBuf>,
    pub seed: String,
    pub backend: String,
}

#[derive(Clone, Debug)]
pub struct VqeOutcome {
    pub ground_energy: f64,
    pub best_energy: f64,
    pub best_index: usize,
    pub evaluations: usize,
    pub state: LoopState,
}

/// Energy of one parameter vector in the configured measurement mode.
fn evaluate(
    model: &J1J2Model,
    hamiltonian: &SparseHamiltonian,
    ansatz: &Ansatz,
    backend: &mut dyn Backend,
    mode: MeasurementMode,
    shots: usize,
    params: &[f64],
) -> QuantumResult<f64> {
    let circuit = ansatz.circuit(params)?;
    match mode {
        MeasurementMode::Statevector => {
            let psi = backend.run_statevector(&circuit)?;
            Ok(energy_statevector(hamiltonian, &psi))
        }
        MeasurementMode::Shots => {
            let all: Vec<usize> = (0..model.n_qubits()).collect();
            let x_hist = backend.run_shots(&circuit, &all, shots)?;
            let z_hist = backend.run_shots(&circuit, &[], shots)?;
            Ok(energy_shots(model, &x_hist, &z_hist))
        }
    }
}

fn initial_params(config: &VqeConfig, count: usize) -> PipelineResult<Vec<f64>> {
    match &config.init_params {
        Some(path) => {
            let params: Vec<f64> = read_json(path)?;
            if params.len() != count {
                return Err(QuantumError::ParameterCount {
                    expected: count,
                    got: params.len(),
                }
                .into());
            }
            info!(path = %path.display(), "initial parameters loaded");
            Ok(params)
        }
        None => {
            let mut rng = ONDRng::new(format!("{}-init", config.seed).as_bytes());
            let (low, high) = PARAM_BOUNDS;
            Ok((0..count)
                .map(|i| rng.uniform(low, high, format!("param-{}", i).as_bytes()))
                .collect())
        }
    }
}

/// Run the optimization loop and persist every evaluation under
/// `config.output_dir`.
///
/// Each evaluation writes `params/params_{k}.json` before appending the
/// energy, so a history entry always has its snapshot on disk.
pub fn run_vqe(config: &VqeConfig) -> PipelineResult<VqeOutcome> {
    if config.max_iter == 0 {
        return Err(PipelineError::InvalidConfig(
            "max_iter must allow at least one evaluation".to_string(),
        ));
    }
    if config.mode == MeasurementMode::Shots && config.shots == 0 {
        return Err(PipelineError::InvalidConfig(
            "shot mode needs at least one shot per basis".to_string(),
        ));
    }

    let lattice = Lattice::new(config.m, config.n)?;
    let model = J1J2Model::new(lattice.clone(), config.j1, config.j2);
    let ansatz = Ansatz::new(lattice, config.ansatz, config.n_layers);
    let mut backend = resolve_backend(&config.backend, &config.seed)?;

    let hamiltonian = model.hamiltonian()?;
    let ground = ground_state(&hamiltonian)?;
    info!(
        m = config.m,
        n = config.n,
        j1 = config.j1,
        j2 = config.j2,
        ground_energy = ground.energy,
        "exact ground state"
    );

    let dir = ExperimentDir::create(&config.output_dir)?;
    let count = ansatz.parameter_count();
    let init = initial_params(config, count)?;
    let bounds = vec![PARAM_BOUNDS; count];

    let mut energies = HistoryLog::<f64>::create(&dir.energy_history_path())?;
    let optimizer = ImplicitFiltering::new(config.max_iter);

    let result = optimizer.minimize(
        |params: &[f64]| -> PipelineResult<f64> {
            let index = energies.len();
            dir.write_params(index, params)?;
            let energy = evaluate(
                &model,
                &hamiltonian,
                &ansatz,
                backend.as_mut(),
                config.mode,
                config.shots,
                params,
            )?;
            energies.append(energy)?;
            info!(index, energy, "evaluation");
            Ok(energy)
        },
        init,
        &bounds,
    )?;

    let (best_index, best_energy) = energies
        .entries()
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| PipelineError::MissingInput(energies.path().to_path_buf()))?;

    dir.write_vqe_record(&VqeRecord {
        m: config.m,
        n: config.n,
        j1: config.j1,
        j2: config.j2,
        ansatz: config.ansatz,
        n_layers: config.n_layers,
        mode: config.mode,
        shots: config.shots,
        ground_energy: ground.energy,
    })?;

    info!(
        state = ?result.state,
        evaluations = result.num_evaluations,
        true_energy = ground.energy,
        best_energy,
        best_index,
        "optimization finished"
    );

    Ok(VqeOutcome {
        ground_energy: ground.energy,
        best_energy,
        best_index,
        evaluations: result.num_evaluations,
        state: result.state,
    })
}
