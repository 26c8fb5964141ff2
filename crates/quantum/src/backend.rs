//! Circuit execution.
//!
//! Backends turn a prepared [`Circuit`] into either an exact statevector or
//! a measurement histogram. Only local simulators are provided; remote
//! identifiers are rejected by [`resolve_backend`].

use crate::circuit::Circuit;
use crate::error::{QuantumError, QuantumResult};
use crate::histogram::Histogram;
use rng::ONDRng;
use statevec::StateVector;

pub trait Backend {
    fn id(&self) -> &str;

    fn run_statevector(&mut self, circuit: &Circuit) -> QuantumResult<StateVector>;

    /// Measure every qubit after rotating the `x_basis` qubits into X.
    fn run_shots(
        &mut self,
        circuit: &Circuit,
        x_basis: &[usize],
        shots: usize,
    ) -> QuantumResult<Histogram>;
}

/// Outcome probabilities after rotating `x_basis` into the computational basis.
pub fn measurement_distribution(circuit: &Circuit, x_basis: &[usize]) -> QuantumResult<Vec<f64>> {
    Ok(circuit.with_x_basis(x_basis)?.simulate().probabilities())
}

/// Statevector simulation with seeded multinomial shot sampling.
pub struct LocalSimulator {
    id: String,
    rng: ONDRng,
}

impl LocalSimulator {
    pub fn new(id: &str, seed: &str) -> Self {
        Self {
            id: id.to_string(),
            rng: ONDRng::new(format!("{}-{}", seed, id).as_bytes()),
        }
    }
}

impl Backend for LocalSimulator {
    fn id(&self) -> &str {
        &self.id
    }

    fn run_statevector(&mut self, circuit: &Circuit) -> QuantumResult<StateVector> {
        Ok(circuit.simulate())
    }

    fn run_shots(
        &mut self,
        circuit: &Circuit,
        x_basis: &[usize],
        shots: usize,
    ) -> QuantumResult<Histogram> {
        let probs = measurement_distribution(circuit, x_basis)?;
        Ok(Histogram::sample(&probs, shots, &mut self.rng))
    }
}

/// Noise-free reference: histograms carry the exact distribution.
#[derive(Default)]
pub struct ExactSimulator;

impl Backend for ExactSimulator {
    fn id(&self) -> &str {
        EXACT
    }

    fn run_statevector(&mut self, circuit: &Circuit) -> QuantumResult<StateVector> {
        Ok(circuit.simulate())
    }

    fn run_shots(
        &mut self,
        circuit: &Circuit,
        x_basis: &[usize],
        shots: usize,
    ) -> QuantumResult<Histogram> {
        let probs = measurement_distribution(circuit, x_basis)?;
        Ok(Histogram::from_distribution(&probs, shots as f64))
    }
}

pub const AER_SIMULATOR: &str = "aer_simulator";
pub const LOCAL_SIMULATOR: &str = "local_simulator";
pub const EXACT: &str = "exact";

pub fn resolve_backend(id: &str, seed: &str) -> QuantumResult<Box<dyn Backend>> {
    match id {
        AER_SIMULATOR | LOCAL_SIMULATOR => Ok(Box::new(LocalSimulator::new(id, seed))),
        EXACT => Ok(Box::new(ExactSimulator)),
        other => Err(QuantumError::UnsupportedBackend(other.to_string())),
    }
}

/// Source of histograms for one fixed state.
///
/// The error type is left to the implementor so that wrappers (for example
/// an on-disk measurement cache) can surface their own failures.
pub trait Sampler {
    type Error;

    fn sample(&mut self, x_basis: &[usize]) -> Result<Histogram, Self::Error>;
}

/// Binds a backend to a prepared circuit and shot count.
pub struct CircuitSampler<'a> {
    backend: &'a mut dyn Backend,
    circuit: &'a Circuit,
    shots: usize,
}

impl<'a> CircuitSampler<'a> {
    pub fn new(backend: &'a mut dyn Backend, circuit: &'a Circuit, shots: usize) -> Self {
        Self {
            backend,
            circuit,
            shots,
        }
    }
}

impl Sampler for CircuitSampler<'_> {
    type Error = QuantumError;

    fn sample(&mut self, x_basis: &[usize]) -> QuantumResult<Histogram> {
        self.backend.run_shots(self.circuit, x_basis, self.shots)
    }
}

/// Exact histograms of an explicit state (no circuit needed).
pub struct StateSampler {
    state: StateVector,
}

impl StateSampler {
    pub fn new(state: StateVector) -> Self {
        Self { state }
    }
}

impl Sampler for StateSampler {
    type Error = QuantumError;

    fn sample(&mut self, x_basis: &[usize]) -> QuantumResult<Histogram> {
        let mut psi = self.state.clone();
        for &q in x_basis {
            if q >= psi.n_qubits {
                return Err(QuantumError::QubitOutOfRange {
                    qubit: q,
                    n_qubits: psi.n_qubits,
                });
            }
            psi.apply_1q(q, crate::gates::hadamard());
        }
        Ok(Histogram::from_distribution(&psi.probabilities(), 1.0))
    }
}
