use quantum::{fidelity::fidelity, ground::ground_state, hamiltonian::J1J2Model, lattice::Lattice, QuantumError};
use statevec::StateVector;

#[test]
fn ground_state_self_fidelity_is_one_under_phase() {
    let model = J1J2Model::new(Lattice::new(2, 2).unwrap(), 0.5, 0.05);
    let gs = ground_state(&model.hamiltonian().unwrap()).unwrap();
    let phased = gs.state.clone().with_global_phase(2.1);

    let f = fidelity(&phased, &gs.state).unwrap();
    assert!((f - 1.0).abs() < 1e-10, "F = {}", f);
}

#[test]
fn orthogonal_states_have_zero_fidelity() {
    let a = StateVector::from_real(&[1.0, 0.0]);
    let b = StateVector::from_real(&[0.0, 1.0]);
    assert_eq!(fidelity(&a, &b).unwrap(), 0.0);
}

#[test]
fn unnormalized_state_rejected() {
    let a = StateVector::from_real(&[1.0, 1.0]);
    let b = StateVector::from_real(&[1.0, 0.0]);
    let err = fidelity(&a, &b).unwrap_err();
    assert!(matches!(err, QuantumError::NotNormalized { norm } if (norm - 2.0).abs() < 1e-12));
}
