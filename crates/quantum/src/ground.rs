use crate::error::{QuantumError, QuantumResult};
use crate::hamiltonian::SparseHamiltonian;
use statevec::eigen::symmetric_eigen;
use statevec::StateVector;

/// Dense diagonalization is cubic in `2^sites`; refuse anything bigger.
pub const MAX_DENSE_SITES: usize = 12;

#[derive(Clone, Debug)]
pub struct GroundState {
    pub energy: f64,
    pub state: StateVector,
}

/// Lowest eigenpair of `h` by full eigendecomposition.
pub fn ground_state(h: &SparseHamiltonian) -> QuantumResult<GroundState> {
    let sites = h.dim().trailing_zeros() as usize;
    if sites > MAX_DENSE_SITES {
        return Err(QuantumError::LatticeTooLarge {
            sites,
            max: MAX_DENSE_SITES,
        });
    }

    let eig = symmetric_eigen(&h.to_dense());
    let (energy, vector) = eig.lowest();

    let mut state = StateVector::from_real(vector);
    state.normalize();

    tracing::debug!(energy, dim = h.dim(), "ground state solved");
    Ok(GroundState { energy, state })
}
