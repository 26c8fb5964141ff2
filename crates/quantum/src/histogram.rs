use rng::ONDRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome counts keyed by basis index (bit `q` = qubit `q`).
///
/// Counts are `f64` so an exact outcome distribution (the infinite-shot
/// limit) is representable alongside sampled data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    counts: BTreeMap<u64, f64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: u64) {
        self.add(outcome, 1.0);
    }

    pub fn add(&mut self, outcome: u64, weight: f64) {
        if weight == 0.0 {
            return;
        }
        *self.counts.entry(outcome).or_insert(0.0) += weight;
    }

    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, outcome: u64) -> f64 {
        self.counts.get(&outcome).copied().unwrap_or(0.0)
    }

    /// `(outcome, relative frequency)` pairs; empty when nothing was recorded.
    pub fn frequencies(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        let total = self.total();
        self.counts
            .iter()
            .filter(move |_| total > 0.0)
            .map(move |(&o, &c)| (o, c / total))
    }

    /// Exact distribution scaled to `shots` total weight.
    pub fn from_distribution(probs: &[f64], shots: f64) -> Self {
        let mut h = Self::new();
        for (o, &p) in probs.iter().enumerate() {
            h.add(o as u64, p * shots);
        }
        h
    }

    /// Draw `shots` outcomes from `probs` (need not be normalized).
    pub fn sample(probs: &[f64], shots: usize, rng: &mut ONDRng) -> Self {
        let mut cumulative = Vec::with_capacity(probs.len());
        let mut acc = 0.0;
        for &p in probs {
            acc += p.max(0.0);
            cumulative.push(acc);
        }

        let mut h = Self::new();
        for _ in 0..shots {
            let o = rng.pick_cumulative(&cumulative, b"SHOT");
            h.record(o as u64);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::Histogram;
    use rng::ONDRng;

    #[test]
    fn sampling_never_hits_zero_probability() {
        let mut rng = ONDRng::new(b"hist");
        let h = Histogram::sample(&[0.5, 0.0, 0.0, 0.5], 500, &mut rng);
        assert_eq!(h.count(1) + h.count(2), 0.0);
        assert_eq!(h.total(), 500.0);
    }

    #[test]
    fn frequencies_sum_to_one() {
        let mut h = Histogram::new();
        h.record(3);
        h.record(3);
        h.record(0);
        let sum: f64 = h.frequencies().map(|(_, f)| f).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_histogram_has_no_frequencies() {
        assert_eq!(Histogram::new().frequencies().count(), 0);
    }
}
