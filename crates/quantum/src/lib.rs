pub mod ansatz;
pub mod backend;
pub mod circuit;
pub mod energy;
pub mod error;
pub mod fidelity;
pub mod gates;
pub mod ground;
pub mod hamiltonian;
pub mod histogram;
pub mod lattice;
pub mod reconstruction;
pub mod shot_estimator;

pub use error::{QuantumError, QuantumResult};
pub use hamiltonian::{Couplings, J1J2Model, SparseHamiltonian};
pub use histogram::Histogram;
pub use lattice::Lattice;
