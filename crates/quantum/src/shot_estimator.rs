//! Expectation values from measurement histograms.
//!
//! Each outcome contributes `±1` per qubit (bit clear = +1). Family
//! estimators raise the per-outcome family value to `power` before
//! averaging, so `power = 2` yields the second moment.

use crate::hamiltonian::spin;
use crate::histogram::Histogram;
use crate::lattice::Bond;

/// `E[(Σ_q s_q)^power]` over qubits `0..n_qubits`.
pub fn field_moment(hist: &Histogram, n_qubits: usize, power: i32) -> f64 {
    hist.frequencies()
        .map(|(o, f)| {
            let v: f64 = (0..n_qubits).map(|q| spin(o as usize, q)).sum();
            f * v.powi(power)
        })
        .sum()
}

/// `E[(Σ_(a,b) s_a s_b)^power]` over `bonds`.
pub fn bond_moment(hist: &Histogram, bonds: &[Bond], power: i32) -> f64 {
    hist.frequencies()
        .map(|(o, f)| {
            let v: f64 = bonds
                .iter()
                .map(|&(a, b)| spin(o as usize, a) * spin(o as usize, b))
                .sum();
            f * v.powi(power)
        })
        .sum()
}

/// `E[Π_q s_q]`; repeated qubits cancel pairwise.
pub fn parity_expectation(hist: &Histogram, qubits: &[usize]) -> f64 {
    hist.frequencies()
        .map(|(o, f)| f * qubits.iter().map(|&q| spin(o as usize, q)).product::<f64>())
        .sum()
}
