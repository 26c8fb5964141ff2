use crate::error::{QuantumError, QuantumResult};

/// Unordered site pair `(a, b)` with `a < b`.
pub type Bond = (usize, usize);

/// `m x n` grid of qubits, row-major: site `(i, j)` is `i * n + j`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    m: usize,
    n: usize,
    nn: Vec<Bond>,
    nnn: Vec<Bond>,
}

impl Lattice {
    pub fn new(m: usize, n: usize) -> QuantumResult<Self> {
        if m == 0 || n == 0 {
            return Err(QuantumError::InvalidLattice { m, n });
        }

        let site = |i: usize, j: usize| i * n + j;
        let mut nn = Vec::new();
        let mut nnn = Vec::new();

        for i in 0..m {
            for j in 0..n {
                if j + 1 < n {
                    nn.push(ordered(site(i, j), site(i, j + 1)));
                }
                if i + 1 < m {
                    nn.push(ordered(site(i, j), site(i + 1, j)));
                }
                if i + 1 < m && j + 1 < n {
                    nnn.push(ordered(site(i, j), site(i + 1, j + 1)));
                    nnn.push(ordered(site(i, j + 1), site(i + 1, j)));
                }
            }
        }
        nn.sort_unstable();
        nnn.sort_unstable();

        Ok(Self { m, n, nn, nnn })
    }

    pub fn rows(&self) -> usize {
        self.m
    }

    pub fn cols(&self) -> usize {
        self.n
    }

    pub fn n_sites(&self) -> usize {
        self.m * self.n
    }

    pub fn site(&self, i: usize, j: usize) -> usize {
        assert!(i < self.m && j < self.n, "site ({}, {}) outside lattice", i, j);
        i * self.n + j
    }

    pub fn nearest_neighbors(&self) -> &[Bond] {
        &self.nn
    }

    /// Diagonal (next-nearest) neighbors.
    pub fn next_nearest_neighbors(&self) -> &[Bond] {
        &self.nnn
    }
}

fn ordered(a: usize, b: usize) -> Bond {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
