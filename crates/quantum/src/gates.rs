pub use statevec::C64;
use std::f64::consts::FRAC_1_SQRT_2;

const ZERO: C64 = C64::new(0.0, 0.0);
const ONE: C64 = C64::new(1.0, 0.0);

fn re(x: f64) -> C64 {
    C64::new(x, 0.0)
}

pub fn hadamard() -> [[C64; 2]; 2] {
    let s = re(FRAC_1_SQRT_2);
    [[s, s], [s, -s]]
}

pub fn pauli_x() -> [[C64; 2]; 2] {
    [[ZERO, ONE], [ONE, ZERO]]
}

/// exp(-i θ/2 X)
pub fn rx(theta: f64) -> [[C64; 2]; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    let off = C64::new(0.0, -s);
    [[re(c), off], [off, re(c)]]
}

/// exp(-i θ/2 Y); real for real θ.
pub fn ry(theta: f64) -> [[C64; 2]; 2] {
    let (s, c) = (theta / 2.0).sin_cos();
    [[re(c), re(-s)], [re(s), re(c)]]
}

/// diag(1, 1, 1, -1)
pub fn cz() -> [C64; 4] {
    [ONE, ONE, ONE, -ONE]
}

/// exp(-i θ/2 Z⊗Z): phase e^{-iθ/2} on equal bits, e^{iθ/2} otherwise.
pub fn rzz(theta: f64) -> [C64; 4] {
    let same = C64::from_polar(1.0, -theta / 2.0);
    let diff = C64::from_polar(1.0, theta / 2.0);
    [same, diff, diff, same]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_unitary(u: [[C64; 2]; 2]) -> bool {
        (0..2).all(|i| {
            (0..2).all(|j| {
                let dot: C64 = (0..2).map(|k| u[k][i].conj() * u[k][j]).sum();
                let expect = if i == j { 1.0 } else { 0.0 };
                (dot - re(expect)).norm() < 1e-12
            })
        })
    }

    #[test]
    fn single_qubit_gates_are_unitary() {
        assert!(is_unitary(hadamard()));
        assert!(is_unitary(pauli_x()));
        for t in [0.0, 0.7, -2.3, std::f64::consts::PI] {
            assert!(is_unitary(rx(t)));
            assert!(is_unitary(ry(t)));
        }
    }
}
