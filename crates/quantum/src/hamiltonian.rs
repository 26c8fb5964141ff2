//! Transverse-field J1-J2 model on a rectangular lattice.
//!
//! `H = Σ_i X_i + J1 Σ_NN Z_a Z_b + J2 Σ_NNN Z_a Z_b`
//!
//! The sparse matrix has dimension `2^(m·n)` and is only meant as a
//! reference oracle for a handful of sites.

use crate::error::{QuantumError, QuantumResult};
use crate::lattice::{Bond, Lattice};
use faer::Mat;
use rayon::prelude::*;
use statevec::{C64, StateVector};

/// Largest lattice the sparse builder accepts.
pub const MAX_SITES: usize = 16;

/// Coupling strengths; the transverse field is fixed at 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Couplings {
    pub j1: f64,
    pub j2: f64,
}

impl Couplings {
    pub fn new(j1: f64, j2: f64) -> Self {
        Self { j1, j2 }
    }

    /// `(1, J1, J2)`
    pub fn vector(&self) -> [f64; 3] {
        [1.0, self.j1, self.j2]
    }

    pub fn unit_vector(&self) -> [f64; 3] {
        let v = self.vector();
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        [v[0] / norm, v[1] / norm, v[2] / norm]
    }
}

#[derive(Clone, Debug)]
pub struct J1J2Model {
    pub lattice: Lattice,
    pub couplings: Couplings,
}

impl J1J2Model {
    pub fn new(lattice: Lattice, j1: f64, j2: f64) -> Self {
        Self {
            lattice,
            couplings: Couplings::new(j1, j2),
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.lattice.n_sites()
    }

    /// Diagonal (Z-basis) energy of one basis state.
    pub fn diagonal_energy(&self, basis: usize) -> f64 {
        let c = self.couplings;
        c.j1 * bond_sum(basis, self.lattice.nearest_neighbors())
            + c.j2 * bond_sum(basis, self.lattice.next_nearest_neighbors())
    }

    pub fn hamiltonian(&self) -> QuantumResult<SparseHamiltonian> {
        let n = self.n_qubits();
        if n > MAX_SITES {
            return Err(QuantumError::LatticeTooLarge { sites: n, max: MAX_SITES });
        }

        let dim = 1usize << n;
        let rows = (0..dim)
            .into_par_iter()
            .map(|b| {
                let mut row = Vec::with_capacity(n + 1);
                let d = self.diagonal_energy(b);
                if d != 0.0 {
                    row.push((b, d));
                }
                for q in 0..n {
                    row.push((b ^ (1 << q), 1.0));
                }
                row.sort_unstable_by_key(|&(c, _)| c);
                row
            })
            .collect();

        Ok(SparseHamiltonian { dim, rows })
    }
}

/// `+1` for a clear bit, `-1` for a set bit.
#[inline]
pub fn spin(basis: usize, q: usize) -> f64 {
    if (basis >> q) & 1 == 0 {
        1.0
    } else {
        -1.0
    }
}

fn bond_sum(basis: usize, bonds: &[Bond]) -> f64 {
    bonds
        .iter()
        .map(|&(a, b)| spin(basis, a) * spin(basis, b))
        .sum()
}

/// Real-symmetric matrix stored as sorted `(column, value)` rows.
#[derive(Clone, Debug)]
pub struct SparseHamiltonian {
    dim: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

impl SparseHamiltonian {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        let r = &self.rows[row];
        match r.binary_search_by_key(&col, |&(c, _)| c) {
            Ok(i) => r[i].1,
            Err(_) => 0.0,
        }
    }

    /// `H ψ`
    pub fn apply(&self, psi: &StateVector) -> Vec<C64> {
        assert_eq!(psi.dim(), self.dim, "state dimension mismatch");
        self.rows
            .par_iter()
            .map(|row| {
                row.iter()
                    .fold(C64::new(0.0, 0.0), |acc, &(c, v)| acc + psi.amps[c] * v)
            })
            .collect()
    }

    pub fn to_dense(&self) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(self.dim, self.dim);
        for (r, row) in self.rows.iter().enumerate() {
            for &(c, v) in row {
                m.write(r, c, v);
            }
        }
        m
    }

    /// Self-adjointness check; entries are real so this is symmetry.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.rows.iter().enumerate().all(|(r, row)| {
            row.iter()
                .all(|&(c, v)| (self.get(c, r) - v).abs() <= tol)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_site_is_pauli_x() {
        let model = J1J2Model::new(Lattice::new(1, 1).unwrap(), 0.5, 0.05);
        let h = model.hamiltonian().unwrap();
        assert_eq!(h.dim(), 2);
        assert_eq!(h.get(0, 0), 0.0);
        assert_eq!(h.get(0, 1), 1.0);
        assert_eq!(h.get(1, 0), 1.0);
    }

    #[test]
    fn all_up_diagonal_counts_bonds() {
        let model = J1J2Model::new(Lattice::new(2, 2).unwrap(), 0.5, 0.05);
        // 4 NN bonds, 2 NNN bonds, all aligned
        assert!((model.diagonal_energy(0) - (4.0 * 0.5 + 2.0 * 0.05)).abs() < 1e-12);
    }

    #[test]
    fn unit_vector_is_normalized() {
        let u = Couplings::new(3.0, -4.0).unit_vector();
        let n: f64 = u.iter().map(|x| x * x).sum();
        assert!((n - 1.0).abs() < 1e-12);
    }
}
