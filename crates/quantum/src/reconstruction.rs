//! Hamiltonian reconstruction from measurement statistics.
//!
//! For a state that is an eigenstate of `w · (F, NN, NNN)`, the covariance
//! matrix of the three operator families has `w` in its null space. The
//! eigenvector of the smallest covariance eigenvalue therefore estimates the
//! coupling direction, and its distance from the true `(1, J1, J2)` measures
//! how close the state is to an eigenstate of the target Hamiltonian.

use crate::backend::Sampler;
use crate::energy::FamilyMoments;
use crate::error::QuantumError;
use crate::hamiltonian::J1J2Model;
use crate::histogram::Histogram;
use crate::lattice::Bond;
use crate::shot_estimator::parity_expectation;
use statevec::eigen::{mat_from_rows, symmetric_eigen};

/// One field site paired with one coupling bond for a cross-correlation
/// measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossTerm {
    pub site: usize,
    pub bond: Bond,
}

impl CrossTerm {
    pub fn qubits(&self) -> [usize; 3] {
        [self.site, self.bond.0, self.bond.1]
    }
}

/// Bonds of `bonds` that do not touch `site`.
///
/// `X_h` anticommutes with any `Z_a Z_b` containing `h`, so those products
/// have zero symmetrized expectation and are left out.
pub fn cross_terms(site: usize, bonds: &[Bond]) -> impl Iterator<Item = CrossTerm> + '_ {
    bonds
        .iter()
        .filter(move |&&(a, b)| a != site && b != site)
        .map(move |&bond| CrossTerm { site, bond })
}

/// 3x3 covariance over `{field, NN, NNN}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CovarianceMatrix(pub [[f64; 3]; 3]);

impl CovarianceMatrix {
    pub fn is_symmetric(&self) -> bool {
        let m = &self.0;
        (0..3).all(|i| (0..3).all(|j| m[i][j] == m[j][i]))
    }

    /// `wᵀ C w`, the variance of `w · (F, NN, NNN)`.
    pub fn quadratic_form(&self, w: &[f64; 3]) -> f64 {
        let m = &self.0;
        (0..3)
            .map(|i| (0..3).map(|j| w[i] * m[i][j] * w[j]).sum::<f64>())
            .sum()
    }
}

/// Eigen-decomposition of a covariance matrix, ascending.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub eigenvalues: [f64; 3],
    pub eigenvectors: [[f64; 3]; 3],
}

impl Reconstruction {
    /// Direction of minimal variance.
    pub fn direction(&self) -> [f64; 3] {
        self.eigenvectors[0]
    }
}

/// Measure and assemble the covariance matrix for the sampler's state.
///
/// Issues `n_sites + 2` measurements: all-Z, all-X and one per site with
/// only that site rotated. Any measurement without counts aborts with
/// [`QuantumError::EmptyHistogram`].
pub fn covariance_matrix<S>(model: &J1J2Model, sampler: &mut S) -> Result<CovarianceMatrix, S::Error>
where
    S: Sampler + ?Sized,
    S::Error: From<QuantumError>,
{
    let lattice = &model.lattice;
    let n = lattice.n_sites();
    let nn = lattice.nearest_neighbors();
    let nnn = lattice.next_nearest_neighbors();

    let all: Vec<usize> = (0..n).collect();
    let z_hist = sample_nonempty(sampler, &[])?;
    let x_hist = sample_nonempty(sampler, &all)?;

    let first = FamilyMoments::estimate(model, &x_hist, &z_hist, 1);
    let second = FamilyMoments::estimate(model, &x_hist, &z_hist, 2);

    let mut cov = [[0.0f64; 3]; 3];
    cov[0][0] = second.field - first.field * first.field;
    cov[1][1] = second.nn - first.nn * first.nn;
    cov[2][2] = second.nnn - first.nnn * first.nnn;

    let nn_nnn = bond_bond_correlation(&z_hist, nn, nnn) - first.nn * first.nnn;

    let mut field_nn = -(first.field * first.nn);
    let mut field_nnn = -(first.field * first.nnn);
    for site in 0..n {
        let hist = sample_nonempty(sampler, &[site])?;
        field_nn += cross_terms(site, nn)
            .map(|t| parity_expectation(&hist, &t.qubits()))
            .sum::<f64>();
        field_nnn += cross_terms(site, nnn)
            .map(|t| parity_expectation(&hist, &t.qubits()))
            .sum::<f64>();
    }

    cov[0][1] = field_nn;
    cov[1][0] = field_nn;
    cov[0][2] = field_nnn;
    cov[2][0] = field_nnn;
    cov[1][2] = nn_nnn;
    cov[2][1] = nn_nnn;

    tracing::debug!(?cov, "covariance assembled");
    Ok(CovarianceMatrix(cov))
}

fn sample_nonempty<S>(sampler: &mut S, x_basis: &[usize]) -> Result<Histogram, S::Error>
where
    S: Sampler + ?Sized,
    S::Error: From<QuantumError>,
{
    let hist = sampler.sample(x_basis)?;
    if hist.total() <= 0.0 {
        return Err(QuantumError::EmptyHistogram {
            x_basis: x_basis.to_vec(),
        }
        .into());
    }
    Ok(hist)
}

/// `Σ_{b∈left, c∈right} E[s_b0 s_b1 s_c0 s_c1]` from one Z-basis histogram.
fn bond_bond_correlation(z_hist: &Histogram, left: &[Bond], right: &[Bond]) -> f64 {
    let mut acc = 0.0;
    for &(a, b) in left {
        for &(c, d) in right {
            acc += parity_expectation(z_hist, &[a, b, c, d]);
        }
    }
    acc
}

pub fn reconstruct(cov: &CovarianceMatrix) -> Reconstruction {
    let eig = symmetric_eigen(&mat_from_rows(&cov.0));

    let mut eigenvalues = [0.0; 3];
    let mut eigenvectors = [[0.0; 3]; 3];
    for k in 0..3 {
        eigenvalues[k] = eig.values[k];
        eigenvectors[k].copy_from_slice(&eig.vectors[k]);
    }

    Reconstruction {
        eigenvalues,
        eigenvectors,
    }
}

/// Distance of `v` from the span of the orthonormal vectors in `basis`:
/// `‖v − Σ_k (b_k · v) b_k‖`.
pub fn distance_from_subspace(v: &[f64], basis: &[&[f64]]) -> f64 {
    let mut residual = v.to_vec();
    for b in basis {
        let proj: f64 = b.iter().zip(v).map(|(x, y)| x * y).sum();
        for (r, x) in residual.iter_mut().zip(b.iter()) {
            *r -= proj * x;
        }
    }
    residual.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Distance between the normalized `target` and the reconstructed direction.
///
/// Lies in `[0, 1]`; positive rescaling of `target` leaves it unchanged.
pub fn hr_distance(target: &[f64; 3], direction: &[f64; 3]) -> f64 {
    let norm = target.iter().map(|x| x * x).sum::<f64>().sqrt();
    let unit = [target[0] / norm, target[1] / norm, target[2] / norm];
    distance_from_subspace(&unit, &[&direction[..]])
}

/// Full reconstruction for one state: covariance, eigen-decomposition, and
/// distance from the model's coupling vector.
pub fn reconstruct_distance<S>(model: &J1J2Model, sampler: &mut S) -> Result<(Reconstruction, f64), S::Error>
where
    S: Sampler + ?Sized,
    S::Error: From<QuantumError>,
{
    let cov = covariance_matrix(model, sampler)?;
    let rec = reconstruct(&cov);
    let dist = hr_distance(&model.couplings.vector(), &rec.direction());
    Ok((rec, dist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_terms_skip_touching_bonds() {
        let bonds = [(0, 1), (1, 2), (2, 3), (0, 3)];
        let terms: Vec<_> = cross_terms(1, &bonds).map(|t| t.bond).collect();
        assert_eq!(terms, vec![(2, 3), (0, 3)]);
    }

    #[test]
    fn distance_from_own_span_is_zero() {
        let v = [0.0, 0.6, 0.8];
        assert!(distance_from_subspace(&v, &[&v[..]]) < 1e-12);
        assert!((distance_from_subspace(&v, &[&[1.0, 0.0, 0.0][..]]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn smallest_eigenvector_first() {
        let cov = CovarianceMatrix([[4.0, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 2.0]]);
        let rec = reconstruct(&cov);
        assert!((rec.eigenvalues[0] - 0.5).abs() < 1e-12);
        assert!((rec.direction()[1].abs() - 1.0).abs() < 1e-12);
    }
}
