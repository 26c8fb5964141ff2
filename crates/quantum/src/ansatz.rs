//! Variational circuit families.
//!
//! * ALA (alternating layered ansatz): layers of `RY` rotations followed by
//!   CZ on disjoint neighbouring pairs, with the pairing shifted by one qubit
//!   on odd layers.
//! * HVA (Hamiltonian variational ansatz): from `|−…−⟩`, each layer applies
//!   `RZZ` on every NN bond and `RX` on every site.

use crate::circuit::{Circuit, Gate};
use crate::error::{QuantumError, QuantumResult};
use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnsatzKind {
    #[serde(rename = "ALA")]
    Ala,
    #[serde(rename = "HVA")]
    Hva,
}

impl FromStr for AnsatzKind {
    type Err = QuantumError;

    fn from_str(s: &str) -> QuantumResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ALA" => Ok(AnsatzKind::Ala),
            "HVA" => Ok(AnsatzKind::Hva),
            _ => Err(QuantumError::InvalidAnsatz(s.to_string())),
        }
    }
}

impl fmt::Display for AnsatzKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnsatzKind::Ala => write!(f, "ALA"),
            AnsatzKind::Hva => write!(f, "HVA"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ansatz {
    lattice: Lattice,
    kind: AnsatzKind,
    layers: usize,
}

impl Ansatz {
    pub fn new(lattice: Lattice, kind: AnsatzKind, layers: usize) -> Self {
        Self {
            lattice,
            kind,
            layers,
        }
    }

    pub fn kind(&self) -> AnsatzKind {
        self.kind
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn parameter_count(&self) -> usize {
        parameter_count(&self.lattice, self.kind, self.layers)
    }

    pub fn circuit(&self, params: &[f64]) -> QuantumResult<Circuit> {
        let expected = self.parameter_count();
        if params.len() != expected {
            return Err(QuantumError::ParameterCount {
                expected,
                got: params.len(),
            });
        }

        let n = self.lattice.n_sites();
        let mut c = Circuit::new(n);
        let mut theta = params.iter().copied();
        // length checked above
        let mut next = move || theta.next().unwrap_or_default();

        match self.kind {
            AnsatzKind::Ala => {
                for layer in 0..self.layers {
                    let (start, end) = ala_window(n, layer);
                    for q in start..end {
                        c.push(Gate::Ry(q, next()))?;
                    }
                    let mut q = start;
                    while q + 1 < end {
                        c.push(Gate::Cz(q, q + 1))?;
                        q += 2;
                    }
                }
            }
            AnsatzKind::Hva => {
                for q in 0..n {
                    c.push(Gate::X(q))?;
                    c.push(Gate::H(q))?;
                }
                for _ in 0..self.layers {
                    for &(a, b) in self.lattice.nearest_neighbors() {
                        c.push(Gate::Rzz(a, b, next()))?;
                    }
                    for q in 0..n {
                        c.push(Gate::Rx(q, next()))?;
                    }
                }
            }
        }

        Ok(c)
    }
}

/// Half-open range of qubits rotated in ALA layer `layer`.
fn ala_window(n: usize, layer: usize) -> (usize, usize) {
    let even_layer = layer % 2 == 0;
    if n % 2 == 0 {
        if even_layer {
            (0, n)
        } else {
            (1, n - 1)
        }
    } else if even_layer {
        (0, n - 1)
    } else {
        (1, n)
    }
}

/// Number of free angles for `kind` with `layers` layers on `lattice`.
pub fn parameter_count(lattice: &Lattice, kind: AnsatzKind, layers: usize) -> usize {
    let n = lattice.n_sites();
    match kind {
        AnsatzKind::Ala => (0..layers)
            .map(|l| {
                let (start, end) = ala_window(n, l);
                end.saturating_sub(start)
            })
            .sum(),
        AnsatzKind::Hva => layers * (n + lattice.nearest_neighbors().len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ala_even_layer_pairs() {
        let lattice = Lattice::new(2, 2).unwrap();
        let ansatz = Ansatz::new(lattice, AnsatzKind::Ala, 2);
        let c = ansatz.circuit(&[0.1; 6]).unwrap();
        let czs: Vec<_> = c
            .gates()
            .iter()
            .filter(|g| matches!(g, Gate::Cz(..)))
            .collect();
        assert_eq!(czs, vec![&Gate::Cz(0, 1), &Gate::Cz(2, 3), &Gate::Cz(1, 2)]);
    }

    #[test]
    fn kind_round_trips_through_display() {
        for kind in [AnsatzKind::Ala, AnsatzKind::Hva] {
            assert_eq!(kind.to_string().parse::<AnsatzKind>().unwrap(), kind);
        }
        assert_eq!("hva".parse::<AnsatzKind>().unwrap(), AnsatzKind::Hva);
    }
}
