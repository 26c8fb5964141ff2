use quantum::{
    ansatz::{parameter_count, Ansatz, AnsatzKind},
    lattice::Lattice,
    QuantumError,
};

#[test]
fn ala_even_lattice_alternates() {
    let l = Lattice::new(2, 2).unwrap();
    assert_eq!(parameter_count(&l, AnsatzKind::Ala, 1), 4);
    assert_eq!(parameter_count(&l, AnsatzKind::Ala, 2), 4 + 2);
    assert_eq!(parameter_count(&l, AnsatzKind::Ala, 3), 4 + 2 + 4);
}

#[test]
fn ala_odd_lattice_is_uniform() {
    let l = Lattice::new(1, 3).unwrap();
    assert_eq!(parameter_count(&l, AnsatzKind::Ala, 2), 2 + 2);

    let l = Lattice::new(3, 3).unwrap();
    assert_eq!(parameter_count(&l, AnsatzKind::Ala, 3), 8 * 3);
}

#[test]
fn hva_counts_sites_and_bonds() {
    let l = Lattice::new(2, 2).unwrap();
    assert_eq!(parameter_count(&l, AnsatzKind::Hva, 2), 2 * (4 + 4));

    let l = Lattice::new(2, 3).unwrap();
    assert_eq!(parameter_count(&l, AnsatzKind::Hva, 1), 6 + 7);
}

#[test]
fn unknown_tag_rejected() {
    let err = "QAOA".parse::<AnsatzKind>().unwrap_err();
    assert!(matches!(err, QuantumError::InvalidAnsatz(tag) if tag == "QAOA"));
}

#[test]
fn circuit_checks_parameter_length() {
    let ansatz = Ansatz::new(Lattice::new(2, 2).unwrap(), AnsatzKind::Ala, 2);
    let err = ansatz.circuit(&[0.0; 5]).unwrap_err();
    assert!(matches!(err, QuantumError::ParameterCount { expected: 6, got: 5 }));
}

#[test]
fn circuits_prepare_unit_states() {
    for kind in [AnsatzKind::Ala, AnsatzKind::Hva] {
        let ansatz = Ansatz::new(Lattice::new(2, 3).unwrap(), kind, 3);
        let params: Vec<f64> = (0..ansatz.parameter_count())
            .map(|i| 0.37 * i as f64 - 1.1)
            .collect();
        let psi = ansatz.circuit(&params).unwrap().simulate();
        assert!((psi.norm_sqr() - 1.0).abs() < 1e-10, "{} norm = {}", kind, psi.norm_sqr());
    }
}

#[test]
fn hva_zero_angles_prepare_minus_state() {
    let ansatz = Ansatz::new(Lattice::new(1, 2).unwrap(), AnsatzKind::Hva, 1);
    let psi = ansatz.circuit(&[0.0; 3]).unwrap().simulate();
    // |−−⟩ = (|00⟩ − |01⟩ − |10⟩ + |11⟩) / 2
    let expected = [0.5, -0.5, -0.5, 0.5];
    for (a, e) in psi.amps.iter().zip(expected) {
        assert!((a.re - e).abs() < 1e-12 && a.im.abs() < 1e-12, "amps = {:?}", psi.amps);
    }
}
