use proptest::prelude::*;
use quantum::{
    ansatz::{Ansatz, AnsatzKind},
    backend::{Backend, ExactSimulator, LocalSimulator, AER_SIMULATOR},
    energy::{energy_shots, energy_statevector},
    ground::ground_state,
    hamiltonian::J1J2Model,
    lattice::Lattice,
};
use statevec::{C64, StateVector};

fn model() -> J1J2Model {
    J1J2Model::new(Lattice::new(2, 2).unwrap(), 0.5, 0.05)
}

fn params(n: usize, offset: f64) -> Vec<f64> {
    (0..n).map(|i| ((i as f64) * 0.71 + offset).sin() * 3.0).collect()
}

#[test]
fn shot_mode_matches_statevector_on_exact_histograms() {
    let model = model();
    let h = model.hamiltonian().unwrap();
    let all: Vec<usize> = (0..4).collect();

    for kind in [AnsatzKind::Ala, AnsatzKind::Hva] {
        let ansatz = Ansatz::new(model.lattice.clone(), kind, 2);
        let circuit = ansatz.circuit(&params(ansatz.parameter_count(), 0.4)).unwrap();

        let mut backend = ExactSimulator;
        let exact = energy_statevector(&h, &backend.run_statevector(&circuit).unwrap());
        let x = backend.run_shots(&circuit, &all, 1000).unwrap();
        let z = backend.run_shots(&circuit, &[], 1000).unwrap();
        let shots = energy_shots(&model, &x, &z);

        assert!((shots - exact).abs() < 1e-10, "{}: shots = {}, exact = {}", kind, shots, exact);
    }
}

#[test]
fn sampled_energy_converges() {
    let model = model();
    let h = model.hamiltonian().unwrap();
    let ansatz = Ansatz::new(model.lattice.clone(), AnsatzKind::Ala, 3);
    let circuit = ansatz.circuit(&params(ansatz.parameter_count(), 1.3)).unwrap();

    let mut backend = LocalSimulator::new(AER_SIMULATOR, "converge");
    let exact = energy_statevector(&h, &backend.run_statevector(&circuit).unwrap());
    let x = backend.run_shots(&circuit, &[0, 1, 2, 3], 20_000).unwrap();
    let z = backend.run_shots(&circuit, &[], 20_000).unwrap();
    let est = energy_shots(&model, &x, &z);

    assert!((est - exact).abs() < 0.15, "est = {}, exact = {}", est, exact);
}

#[test]
fn ground_state_energy_matches_eigenvalue() {
    let model = model();
    let h = model.hamiltonian().unwrap();
    let gs = ground_state(&h).unwrap();
    let e = energy_statevector(&h, &gs.state);
    assert!((e - gs.energy).abs() < 1e-10, "E = {}, E0 = {}", e, gs.energy);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn statevector_energy_ignores_global_phase(
        re in prop::collection::vec(-1.0f64..1.0, 16),
        im in prop::collection::vec(-1.0f64..1.0, 16),
        phi in 0.0f64..std::f64::consts::TAU,
    ) {
        let amps: Vec<C64> = re.iter().zip(&im).map(|(&r, &i)| C64::new(r, i)).collect();
        let mut psi = StateVector::from_amplitudes(amps);
        prop_assume!(psi.norm_sqr() > 1e-6);
        psi.normalize();

        let h = model().hamiltonian().unwrap();
        let e = energy_statevector(&h, &psi);
        let e_phase = energy_statevector(&h, &psi.clone().with_global_phase(phi));

        prop_assert!((e - e_phase).abs() < 1e-10);

        // explicit Re(ψ* H ψ) against the dense matrix
        let dense = h.to_dense();
        let mut quad = C64::new(0.0, 0.0);
        for r in 0..16 {
            for c in 0..16 {
                quad += psi.amps[r].conj() * dense.read(r, c) * psi.amps[c];
            }
        }
        prop_assert!((quad.re - e).abs() < 1e-10);
        prop_assert!(quad.im.abs() < 1e-10);
    }
}
