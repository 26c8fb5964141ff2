use num_complex::Complex64;

pub type C64 = Complex64;

/// Dense amplitude vector over `n_qubits` qubits.
///
/// Basis index bit `q` holds qubit `q` (little-endian), so qubit 0 is the
/// least significant bit of the index.
#[derive(Clone, Debug)]
pub struct StateVector {
    pub amps: Vec<C64>,
    pub n_qubits: usize,
}

impl StateVector {
    pub fn new_zero(n_qubits: usize) -> Self {
        let mut amps = vec![C64::new(0.0, 0.0); 1usize << n_qubits];
        amps[0] = C64::new(1.0, 0.0);
        Self { amps, n_qubits }
    }

    pub fn from_amplitudes(amps: Vec<C64>) -> Self {
        assert!(
            amps.len().is_power_of_two(),
            "amplitude count {} is not a power of two",
            amps.len()
        );
        let n_qubits = amps.len().trailing_zeros() as usize;
        Self { amps, n_qubits }
    }

    pub fn from_real(values: &[f64]) -> Self {
        Self::from_amplitudes(values.iter().map(|&v| C64::new(v, 0.0)).collect())
    }

    pub fn dim(&self) -> usize {
        self.amps.len()
    }

    pub fn apply_1q(&mut self, k: usize, u: [[C64; 2]; 2]) {
        assert!(k < self.n_qubits, "qubit {} out of range", k);
        let bit = 1usize << k;

        for i in 0..self.amps.len() {
            if i & bit != 0 {
                continue;
            }
            let a0 = self.amps[i];
            let a1 = self.amps[i | bit];
            self.amps[i] = u[0][0] * a0 + u[0][1] * a1;
            self.amps[i | bit] = u[1][0] * a0 + u[1][1] * a1;
        }
    }

    /// Two-qubit gate that is diagonal in the computational basis.
    ///
    /// `diag[2 * b_a + b_b]` multiplies amplitudes whose qubit `a` bit is
    /// `b_a` and qubit `b` bit is `b_b`.
    pub fn apply_diag_2q(&mut self, a: usize, b: usize, diag: [C64; 4]) {
        assert!(a != b, "diagonal 2q gate needs distinct qubits");
        assert!(a < self.n_qubits && b < self.n_qubits, "qubit out of range");

        for (i, amp) in self.amps.iter_mut().enumerate() {
            let ba = (i >> a) & 1;
            let bb = (i >> b) & 1;
            *amp *= diag[2 * ba + bb];
        }
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn normalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm == 0.0 {
            return;
        }
        for a in &mut self.amps {
            *a /= norm;
        }
    }

    /// `⟨self|other⟩`
    pub fn overlap(&self, other: &StateVector) -> C64 {
        assert_eq!(self.dim(), other.dim(), "state dimension mismatch");
        self.amps
            .iter()
            .zip(&other.amps)
            .fold(C64::new(0.0, 0.0), |acc, (a, b)| acc + a.conj() * b)
    }

    pub fn with_global_phase(mut self, phi: f64) -> Self {
        let phase = C64::from_polar(1.0, phi);
        for a in &mut self.amps {
            *a *= phase;
        }
        self
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }
}
