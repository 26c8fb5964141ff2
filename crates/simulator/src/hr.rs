//! Hamiltonian reconstruction over a finished optimization run.
//!
//! For every selected parameter snapshot the ansatz circuit is rebuilt,
//! measured in `n_sites + 2` bases and reduced to a reconstructed coupling
//! direction; its distance from `(1, J1, J2)` is appended to
//! `hr_distance/{shots}_shots_{backend}.json`. A fidelity pass against the
//! exact ground state runs alongside, always on the exact backend.

use crate::cache::CachedSampler;
use crate::error::{PipelineError, PipelineResult};
use crate::history::HistoryLog;
use crate::store::{run_tag, ExperimentDir, HrRecord, VqeRecord};
use quantum::{
    ansatz::Ansatz,
    backend::{resolve_backend, Backend, CircuitSampler, ExactSimulator},
    fidelity::fidelity,
    ground::{ground_state, GroundState},
    reconstruction::reconstruct_distance,
    J1J2Model, Lattice,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Tolerance for the recomputed ground energy against the stored one.
const GROUND_ENERGY_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct HrConfig {
    pub input_dir: PathBuf,
    pub shots: usize,
    pub backend: String,
    /// Restrict reconstruction to the indices in `param_indices.json`.
    pub use_param_indices: bool,
    /// Reuse cached histograms from earlier runs with the same tag.
    pub use_cache: bool,
    pub seed: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HrPoint {
    pub param_index: usize,
    pub distance: f64,
}

#[derive(Clone, Debug)]
pub struct HrOutcome {
    pub tag: String,
    pub distances: Vec<HrPoint>,
    pub fidelities: Vec<f64>,
}

struct Experiment {
    dir: ExperimentDir,
    record: VqeRecord,
    model: J1J2Model,
    ansatz: Ansatz,
    ground: GroundState,
    evaluations: usize,
}

fn load_experiment(input_dir: &Path) -> PipelineResult<Experiment> {
    let dir = ExperimentDir::open(input_dir)?;
    let record = dir.read_vqe_record()?;

    let lattice = Lattice::new(record.m, record.n)?;
    let model = J1J2Model::new(lattice.clone(), record.j1, record.j2);
    let ansatz = Ansatz::new(lattice, record.ansatz, record.n_layers);

    let ground = ground_state(&model.hamiltonian()?)?;
    if (ground.energy - record.ground_energy).abs() > GROUND_ENERGY_TOLERANCE {
        warn!(
            stored = record.ground_energy,
            recomputed = ground.energy,
            "stored ground energy does not match the recomputed one"
        );
    }

    let evaluations = HistoryLog::<f64>::load(&dir.energy_history_path())?.len();
    Ok(Experiment {
        dir,
        record,
        model,
        ansatz,
        ground,
        evaluations,
    })
}

/// `|⟨g|ψ_k⟩|²` for every evaluation index, persisted to
/// `fidelity_history.json`.
fn fidelity_pass(exp: &Experiment) -> PipelineResult<Vec<f64>> {
    let mut log = HistoryLog::<f64>::create(&exp.dir.fidelity_history_path())?;
    let mut exact = ExactSimulator;
    for index in 0..exp.evaluations {
        let params = exp.dir.read_params(index)?;
        let psi = exact.run_statevector(&exp.ansatz.circuit(&params)?)?;
        let f = fidelity(&exp.ground.state, &psi)?;
        log.append(f)?;
    }
    info!(count = log.len(), "fidelity history written");
    Ok(log.entries().to_vec())
}

/// Seed of the earlier run whose cached histograms this run would reuse,
/// when it differs from `seed`.
fn foreign_cache_seed(dir: &ExperimentDir, tag: &str, seed: &str) -> PipelineResult<Option<String>> {
    Ok(dir
        .read_hr_record(tag)?
        .map(|previous| previous.seed)
        .filter(|previous| previous != seed))
}

pub fn run_reconstruction(config: &HrConfig) -> PipelineResult<HrOutcome> {
    if config.shots == 0 {
        return Err(PipelineError::InvalidConfig(
            "reconstruction needs at least one shot per basis".to_string(),
        ));
    }

    let exp = load_experiment(&config.input_dir)?;
    let mut backend = resolve_backend(&config.backend, &config.seed)?;

    let tag = run_tag(config.shots, &config.backend);
    let mut seed = config.seed.clone();
    if config.use_cache {
        if let Some(previous) = foreign_cache_seed(&exp.dir, &tag, &config.seed)? {
            warn!(
                %tag,
                cached_seed = %previous,
                seed = %config.seed,
                "reusing cached measurements drawn with another seed; pass --no-cache to resample"
            );
            seed = previous;
        }
    }
    exp.dir.write_hr_record(
        &tag,
        &HrRecord::from_vqe(&exp.record, config.shots, &config.backend, &seed),
    )?;

    let indices = if config.use_param_indices {
        exp.dir.read_param_indices()?
    } else {
        (0..exp.evaluations).collect()
    };
    info!(%tag, count = indices.len(), "reconstructing");

    let fidelities = fidelity_pass(&exp)?;

    let mut log = HistoryLog::<HrPoint>::create(&exp.dir.hr_history_path(&tag))?;
    for &index in &indices {
        let params = exp.dir.read_params(index)?;
        let circuit = exp.ansatz.circuit(&params)?;
        let sampler = CircuitSampler::new(backend.as_mut(), &circuit, config.shots);
        let mut cached = CachedSampler::new(
            sampler,
            exp.dir.measurement_dir(&tag, index),
            config.use_cache,
        );

        let (rec, distance) = reconstruct_distance(&exp.model, &mut cached)?;
        info!(
            index,
            distance,
            lambda_min = rec.eigenvalues[0],
            cached = cached.hits(),
            "hr distance"
        );
        log.append(HrPoint {
            param_index: index,
            distance,
        })?;
    }

    Ok(HrOutcome {
        tag,
        distances: log.entries().to_vec(),
        fidelities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MeasurementMode;
    use quantum::ansatz::AnsatzKind;

    fn vqe_record() -> VqeRecord {
        VqeRecord {
            m: 1,
            n: 2,
            j1: 0.5,
            j2: 0.0,
            ansatz: AnsatzKind::Ala,
            n_layers: 1,
            mode: MeasurementMode::Statevector,
            shots: 0,
            ground_energy: -2.0,
        }
    }

    #[test]
    fn cache_seed_mismatch_is_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(tmp.path()).unwrap();
        let tag = run_tag(100, "aer_simulator");

        assert_eq!(foreign_cache_seed(&dir, &tag, "a").unwrap(), None);

        let record = HrRecord::from_vqe(&vqe_record(), 100, "aer_simulator", "a");
        dir.write_hr_record(&tag, &record).unwrap();
        assert_eq!(foreign_cache_seed(&dir, &tag, "a").unwrap(), None);
        assert_eq!(foreign_cache_seed(&dir, &tag, "b").unwrap(), Some("a".to_string()));
    }
}
