use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};

/// Deterministic counter-mode generator over SHAKE256.
///
/// Every draw is tagged with a context label so that independent consumers
/// (shot sampling, parameter initialization) never share a stream by accident.
#[derive(Clone)]
pub struct ONDRng {
    state: [u8; 32],
    step: u64,
}

impl ONDRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"OND_INIT"], &mut state);
        Self { state, step: 0 }
    }

    /// Derive an independent generator for a labelled sub-stream.
    pub fn fork(&self, label: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[&self.state, &self.step.to_be_bytes(), label, b"FORK"], &mut state);
        Self { state, step: 0 }
    }

    /// Uniform draw in `[0, 1]`.
    pub fn next_f64(&mut self, ctx: &[u8]) -> f64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"QSIM"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);

        (u64::from_be_bytes(out) as f64) / (u64::MAX as f64)
    }

    /// Uniform draw in `[low, high]`.
    pub fn uniform(&mut self, low: f64, high: f64, ctx: &[u8]) -> f64 {
        low + (high - low) * self.next_f64(ctx)
    }

    /// Index drawn from an unnormalized cumulative weight table.
    ///
    /// `cumulative` must be non-decreasing with a positive last entry.
    pub fn pick_cumulative(&mut self, cumulative: &[f64], ctx: &[u8]) -> usize {
        let total = match cumulative.last() {
            Some(&t) if t > 0.0 => t,
            _ => return 0,
        };
        let x = self.next_f64(ctx) * total;
        let idx = cumulative.partition_point(|&c| c <= x);
        if idx < cumulative.len() {
            idx
        } else {
            // x == total: first entry that reaches the total carries weight
            cumulative.partition_point(|&c| c < total)
        }
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}

#[cfg(test)]
mod tests {
    use super::ONDRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = ONDRng::new(b"seed");
        let mut b = ONDRng::new(b"seed");
        for _ in 0..16 {
            assert_eq!(a.next_f64(b"T"), b.next_f64(b"T"));
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = ONDRng::new(b"range");
        for _ in 0..1000 {
            let x = rng.uniform(-3.0, 3.0, b"U");
            assert!((-3.0..=3.0).contains(&x), "x = {}", x);
        }
    }

    #[test]
    fn pick_cumulative_skips_zero_weights() {
        let mut rng = ONDRng::new(b"pick");
        let cumulative = [0.0, 0.0, 1.0, 1.0];
        for _ in 0..200 {
            assert_eq!(rng.pick_cumulative(&cumulative, b"P"), 2);
        }
    }

    #[test]
    fn forks_diverge() {
        let root = ONDRng::new(b"root");
        let mut a = root.fork(b"a");
        let mut b = root.fork(b"b");
        assert_ne!(a.next_f64(b"T"), b.next_f64(b"T"));
    }
}
