use crate::hamiltonian::{J1J2Model, SparseHamiltonian};
use crate::histogram::Histogram;
use crate::shot_estimator::{bond_moment, field_moment};
use statevec::StateVector;

/// Per-family moments `{field, NN, NNN}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FamilyMoments {
    pub field: f64,
    pub nn: f64,
    pub nnn: f64,
}

impl FamilyMoments {
    /// `x_hist` has every qubit rotated into the X basis, `z_hist` none.
    pub fn estimate(model: &J1J2Model, x_hist: &Histogram, z_hist: &Histogram, power: i32) -> Self {
        let lattice = &model.lattice;
        Self {
            field: field_moment(x_hist, lattice.n_sites(), power),
            nn: bond_moment(z_hist, lattice.nearest_neighbors(), power),
            nnn: bond_moment(z_hist, lattice.next_nearest_neighbors(), power),
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.field, self.nn, self.nnn]
    }
}

/// `⟨H⟩ = ⟨F⟩ + J1 ⟨NN⟩ + J2 ⟨NNN⟩` from shot histograms.
pub fn energy_shots(model: &J1J2Model, x_hist: &Histogram, z_hist: &Histogram) -> f64 {
    let m = FamilyMoments::estimate(model, x_hist, z_hist, 1);
    let c = model.couplings;
    m.field + c.j1 * m.nn + c.j2 * m.nnn
}

/// `Re ⟨ψ|H|ψ⟩`
pub fn energy_statevector(h: &SparseHamiltonian, psi: &StateVector) -> f64 {
    let h_psi = h.apply(psi);
    psi.amps
        .iter()
        .zip(&h_psi)
        .map(|(a, b)| (a.conj() * b).re)
        .sum()
}
