pub mod eigen;
pub mod state;

pub use state::{C64, StateVector};
