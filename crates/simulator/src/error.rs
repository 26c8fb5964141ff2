use quantum::QuantumError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while driving an experiment on disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error(transparent)]
    Quantum(#[from] QuantumError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No parameter snapshot was persisted for the requested index.
    #[error("no parameter snapshot for index {index} (expected {path})")]
    MissingCheckpoint { index: usize, path: PathBuf },

    /// The hyperparameter record is absent or unreadable.
    #[error("invalid experiment state at {path}: {reason}")]
    InvalidExperimentState { path: PathBuf, reason: String },

    /// A run setting that would make every result meaningless.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("required input file {0} does not exist")]
    MissingInput(PathBuf),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
