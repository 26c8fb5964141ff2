//! Experiment pipeline: optimization loop, Hamiltonian reconstruction and
//! trajectory export over an on-disk experiment directory.

pub mod cache;
pub mod error;
pub mod history;
pub mod hr;
pub mod logging;
pub mod optimizer;
pub mod output;
pub mod store;
pub mod vqe;

pub use error::{PipelineError, PipelineResult};
pub use hr::{run_reconstruction, HrConfig, HrOutcome, HrPoint};
pub use store::{ExperimentDir, MeasurementMode};
pub use vqe::{run_vqe, VqeConfig, VqeOutcome};
