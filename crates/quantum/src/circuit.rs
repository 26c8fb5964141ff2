use crate::error::{QuantumError, QuantumResult};
use crate::gates::{cz, hadamard, pauli_x, rx, ry, rzz};
use statevec::StateVector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gate {
    H(usize),
    X(usize),
    Rx(usize, f64),
    Ry(usize, f64),
    Cz(usize, usize),
    Rzz(usize, usize, f64),
}

impl Gate {
    fn qubits(&self) -> [Option<usize>; 2] {
        match *self {
            Gate::H(q) | Gate::X(q) | Gate::Rx(q, _) | Gate::Ry(q, _) => [Some(q), None],
            Gate::Cz(a, b) | Gate::Rzz(a, b, _) => [Some(a), Some(b)],
        }
    }

    fn apply(&self, psi: &mut StateVector) {
        match *self {
            Gate::H(q) => psi.apply_1q(q, hadamard()),
            Gate::X(q) => psi.apply_1q(q, pauli_x()),
            Gate::Rx(q, t) => psi.apply_1q(q, rx(t)),
            Gate::Ry(q, t) => psi.apply_1q(q, ry(t)),
            Gate::Cz(a, b) => psi.apply_diag_2q(a, b, cz()),
            Gate::Rzz(a, b, t) => psi.apply_diag_2q(a, b, rzz(t)),
        }
    }
}

/// Gate list acting on `|0…0⟩`.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    n_qubits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(n_qubits: usize) -> Self {
        Self {
            n_qubits,
            gates: Vec::new(),
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn push(&mut self, gate: Gate) -> QuantumResult<()> {
        for q in gate.qubits().into_iter().flatten() {
            if q >= self.n_qubits {
                return Err(QuantumError::QubitOutOfRange {
                    qubit: q,
                    n_qubits: self.n_qubits,
                });
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Copy of this circuit with Hadamards appended on `x_basis`, so a
    /// computational-basis measurement reads those qubits in the X basis.
    pub fn with_x_basis(&self, x_basis: &[usize]) -> QuantumResult<Circuit> {
        let mut out = self.clone();
        for &q in x_basis {
            out.push(Gate::H(q))?;
        }
        Ok(out)
    }

    pub fn simulate(&self) -> StateVector {
        let mut psi = StateVector::new_zero(self.n_qubits);
        for g in &self.gates {
            g.apply(&mut psi);
        }
        psi
    }
}

#[cfg(test)]
mod tests {
    use super::{Circuit, Gate};
    use crate::error::QuantumError;

    #[test]
    fn rejects_out_of_range_qubit() {
        let mut c = Circuit::new(2);
        let err = c.push(Gate::Cz(0, 2)).unwrap_err();
        assert!(matches!(err, QuantumError::QubitOutOfRange { qubit: 2, n_qubits: 2 }));
    }

    #[test]
    fn x_basis_rotation_maps_plus_to_zero() {
        let mut c = Circuit::new(1);
        c.push(Gate::H(0)).unwrap();
        let psi = c.with_x_basis(&[0]).unwrap().simulate();
        assert!((psi.probabilities()[0] - 1.0).abs() < 1e-12);
    }
}
