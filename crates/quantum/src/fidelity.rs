use crate::error::{QuantumError, QuantumResult};
use statevec::StateVector;

/// Maximum deviation of `‖ψ‖²` from 1 accepted by [`fidelity`].
pub const NORM_TOLERANCE: f64 = 1e-6;

/// `|⟨a|b⟩|²` for unit-normalized states; global phases drop out.
pub fn fidelity(a: &StateVector, b: &StateVector) -> QuantumResult<f64> {
    for psi in [a, b] {
        let norm = psi.norm_sqr();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(QuantumError::NotNormalized { norm });
        }
    }
    Ok(a.overlap(b).norm_sqr())
}
