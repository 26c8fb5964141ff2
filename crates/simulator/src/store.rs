//! On-disk experiment layout.
//!
//! ```text
//! <root>/
//!   vqe_hyperparams.json
//!   params/params_{index}.json
//!   energy_history.json
//!   fidelity_history.json
//!   param_indices.json                          (optional HR subset)
//!   hr_hyperparams/{shots}_shots_{backend}.json
//!   hr_distance/{shots}_shots_{backend}.json
//!   measurement/{shots}_shots_{backend}/params_{index}/{basis}.json
//! ```

use crate::error::{PipelineError, PipelineResult};
use quantum::ansatz::AnsatzKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const VQE_RECORD: &str = "vqe_hyperparams.json";
pub const PARAMS_DIR: &str = "params";
pub const ENERGY_HISTORY: &str = "energy_history.json";
pub const FIDELITY_HISTORY: &str = "fidelity_history.json";
pub const PARAM_INDICES: &str = "param_indices.json";
pub const HR_RECORD_DIR: &str = "hr_hyperparams";
pub const HR_HISTORY_DIR: &str = "hr_distance";
pub const MEASUREMENT_DIR: &str = "measurement";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    Shots,
    Statevector,
}

/// Written once after optimization; the input of every later stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VqeRecord {
    pub m: usize,
    pub n: usize,
    pub j1: f64,
    pub j2: f64,
    pub ansatz: AnsatzKind,
    pub n_layers: usize,
    pub mode: MeasurementMode,
    pub shots: usize,
    pub ground_energy: f64,
}

/// Settings of one reconstruction run, keyed by shot count and backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HrRecord {
    pub m: usize,
    pub n: usize,
    pub j1: f64,
    pub j2: f64,
    pub ansatz: AnsatzKind,
    pub n_layers: usize,
    pub ground_energy: f64,
    pub shots: usize,
    pub backend: String,
    /// Seed of the run that filled the measurement cache for this tag.
    #[serde(default)]
    pub seed: String,
}

impl HrRecord {
    pub fn from_vqe(vqe: &VqeRecord, shots: usize, backend: &str, seed: &str) -> Self {
        Self {
            m: vqe.m,
            n: vqe.n,
            j1: vqe.j1,
            j2: vqe.j2,
            ansatz: vqe.ansatz,
            n_layers: vqe.n_layers,
            ground_energy: vqe.ground_energy,
            shots,
            backend: backend.to_string(),
            seed: seed.to_string(),
        }
    }
}

/// `{shots}_shots_{backend}`; separates the outputs of runs that differ in
/// either setting.
pub fn run_tag(shots: usize, backend: &str) -> String {
    format!("{}_shots_{}", shots, backend)
}

#[derive(Clone, Debug)]
pub struct ExperimentDir {
    root: PathBuf,
}

impl ExperimentDir {
    /// Create the directory (and `params/`) for a new optimization run.
    pub fn create(root: &Path) -> PipelineResult<Self> {
        let dir = Self {
            root: root.to_path_buf(),
        };
        create_dir(&dir.root.join(PARAMS_DIR))?;
        Ok(dir)
    }

    /// Open a finished optimization run; the VQE record must exist.
    pub fn open(root: &Path) -> PipelineResult<Self> {
        let dir = Self {
            root: root.to_path_buf(),
        };
        let record = dir.root.join(VQE_RECORD);
        if !record.is_file() {
            return Err(PipelineError::InvalidExperimentState {
                path: record,
                reason: "input directory has no VQE hyperparameter record".to_string(),
            });
        }
        Ok(dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn params_path(&self, index: usize) -> PathBuf {
        self.root.join(PARAMS_DIR).join(format!("params_{}.json", index))
    }

    pub fn write_params(&self, index: usize, params: &[f64]) -> PipelineResult<()> {
        write_json_atomic(&self.params_path(index), &params)
    }

    pub fn read_params(&self, index: usize) -> PipelineResult<Vec<f64>> {
        let path = self.params_path(index);
        if !path.is_file() {
            return Err(PipelineError::MissingCheckpoint { index, path });
        }
        read_json(&path)
    }

    pub fn energy_history_path(&self) -> PathBuf {
        self.root.join(ENERGY_HISTORY)
    }

    pub fn fidelity_history_path(&self) -> PathBuf {
        self.root.join(FIDELITY_HISTORY)
    }

    pub fn write_vqe_record(&self, record: &VqeRecord) -> PipelineResult<()> {
        write_json_atomic(&self.root.join(VQE_RECORD), record)
    }

    pub fn read_vqe_record(&self) -> PipelineResult<VqeRecord> {
        let path = self.root.join(VQE_RECORD);
        let raw = fs::read_to_string(&path).map_err(|e| PipelineError::InvalidExperimentState {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| PipelineError::InvalidExperimentState {
            path,
            reason: e.to_string(),
        })
    }

    pub fn hr_record_path(&self, tag: &str) -> PathBuf {
        self.root.join(HR_RECORD_DIR).join(format!("{}.json", tag))
    }

    pub fn write_hr_record(&self, tag: &str, record: &HrRecord) -> PipelineResult<()> {
        let path = self.hr_record_path(tag);
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        write_json_atomic(&path, record)
    }

    /// Record of an earlier reconstruction run with this tag, if any.
    pub fn read_hr_record(&self, tag: &str) -> PipelineResult<Option<HrRecord>> {
        let path = self.hr_record_path(tag);
        if !path.is_file() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn hr_history_path(&self, tag: &str) -> PathBuf {
        self.root.join(HR_HISTORY_DIR).join(format!("{}.json", tag))
    }

    pub fn measurement_dir(&self, tag: &str, index: usize) -> PathBuf {
        self.root
            .join(MEASUREMENT_DIR)
            .join(tag)
            .join(format!("params_{}", index))
    }

    /// Parameter indices selected for reconstruction.
    pub fn read_param_indices(&self) -> PipelineResult<Vec<usize>> {
        let path = self.root.join(PARAM_INDICES);
        if !path.is_file() {
            return Err(PipelineError::MissingInput(path));
        }
        read_json(&path)
    }

    pub fn write_param_indices(&self, indices: &[usize]) -> PipelineResult<()> {
        write_json_atomic(&self.root.join(PARAM_INDICES), &indices)
    }
}

pub(crate) fn create_dir(path: &Path) -> PipelineResult<()> {
    fs::create_dir_all(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write via a sibling temp file and rename, so readers never see a
/// half-written file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> PipelineResult<()> {
    let body = serde_json::to_vec_pretty(value).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, body).map_err(|source| PipelineError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> PipelineResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VqeRecord {
        VqeRecord {
            m: 2,
            n: 2,
            j1: 0.5,
            j2: 0.05,
            ansatz: AnsatzKind::Ala,
            n_layers: 3,
            mode: MeasurementMode::Shots,
            shots: 1000,
            ground_energy: -4.2,
        }
    }

    #[test]
    fn missing_snapshot_reports_index_and_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(tmp.path()).unwrap();
        match dir.read_params(7) {
            Err(PipelineError::MissingCheckpoint { index, path }) => {
                assert_eq!(index, 7);
                assert!(path.ends_with("params/params_7.json"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn open_requires_record() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            ExperimentDir::open(tmp.path()),
            Err(PipelineError::InvalidExperimentState { .. })
        ));

        let dir = ExperimentDir::create(tmp.path()).unwrap();
        dir.write_vqe_record(&record()).unwrap();
        let opened = ExperimentDir::open(tmp.path()).unwrap();
        assert_eq!(opened.read_vqe_record().unwrap(), record());
    }

    #[test]
    fn malformed_record_is_invalid_state() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(VQE_RECORD), "{\"m\": 2").unwrap();
        let dir = ExperimentDir::open(tmp.path()).unwrap();
        assert!(matches!(
            dir.read_vqe_record(),
            Err(PipelineError::InvalidExperimentState { .. })
        ));
    }

    #[test]
    fn snapshots_read_back_bit_exact() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(tmp.path()).unwrap();
        let params: Vec<f64> = (0..2000)
            .map(|k| (k as f64 * 0.618_033_988_749).sin() * std::f64::consts::PI)
            .collect();

        for (index, chunk) in params.chunks(50).enumerate() {
            dir.write_params(index, chunk).unwrap();
            let back = dir.read_params(index).unwrap();
            for (a, b) in chunk.iter().zip(&back) {
                assert_eq!(a.to_bits(), b.to_bits(), "{} read back as {}", a, b);
            }
        }
    }

    #[test]
    fn record_uses_ansatz_tag() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["ansatz"], "ALA");
        assert_eq!(json["mode"], "shots");
    }
}
