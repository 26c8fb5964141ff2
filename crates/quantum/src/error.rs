use thiserror::Error;

/// Errors raised by the lattice model, circuits and estimators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuantumError {
    /// Lattice dimensions must both be at least 1.
    #[error("invalid lattice {m} x {n}: both dimensions must be positive")]
    InvalidLattice { m: usize, n: usize },

    /// Exact methods refuse lattices whose state space would not fit.
    #[error("lattice has {sites} sites, exact methods are limited to {max}")]
    LatticeTooLarge { sites: usize, max: usize },

    #[error("unknown ansatz type '{0}' (expected ALA or HVA)")]
    InvalidAnsatz(String),

    #[error("parameter vector has length {got}, ansatz expects {expected}")]
    ParameterCount { expected: usize, got: usize },

    #[error("qubit {qubit} out of range for {n_qubits} qubits")]
    QubitOutOfRange { qubit: usize, n_qubits: usize },

    #[error("unsupported backend '{0}'")]
    UnsupportedBackend(String),

    /// A measurement produced no counts, so no moment can be estimated.
    #[error("measurement with X-basis qubits {x_basis:?} returned no counts")]
    EmptyHistogram { x_basis: Vec<usize> },

    /// A state handed to the fidelity diagnostic is not unit-normalized.
    #[error("state is not normalized (norm = {norm})")]
    NotNormalized { norm: f64 },
}

pub type QuantumResult<T> = Result<T, QuantumError>;
