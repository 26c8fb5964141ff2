use faer::{Mat, Side};

/// Eigenpairs of a real symmetric matrix, ascending by eigenvalue.
#[derive(Clone, Debug)]
pub struct SymmetricEigen {
    pub values: Vec<f64>,
    /// `vectors[k]` is the unit eigenvector for `values[k]`.
    pub vectors: Vec<Vec<f64>>,
}

impl SymmetricEigen {
    pub fn lowest(&self) -> (f64, &[f64]) {
        (self.values[0], &self.vectors[0])
    }
}

pub fn symmetric_eigen(m: &Mat<f64>) -> SymmetricEigen {
    assert_eq!(m.nrows(), m.ncols(), "eigendecomposition needs a square matrix");
    let dim = m.nrows();

    let evd = m.selfadjoint_eigendecomposition(Side::Lower);
    let s = evd.s().column_vector();
    let u = evd.u();

    let mut pairs: Vec<(f64, Vec<f64>)> = (0..dim)
        .map(|j| (s.read(j), (0..dim).map(|i| u.read(i, j)).collect()))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (values, vectors) = pairs.into_iter().unzip();
    SymmetricEigen { values, vectors }
}

/// Build a faer matrix from row-major nested arrays.
pub fn mat_from_rows<const N: usize>(rows: &[[f64; N]; N]) -> Mat<f64> {
    Mat::from_fn(N, N, |i, j| rows[i][j])
}
