use crate::error::{PipelineError, PipelineResult};
use crate::store::{create_dir, read_json, write_json_atomic};
use quantum::backend::Sampler;
use quantum::Histogram;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File stem of a measurement basis: `z` for all-Z, otherwise `x_` followed
/// by the rotated qubits.
pub fn basis_label(x_basis: &[usize]) -> String {
    if x_basis.is_empty() {
        return "z".to_string();
    }
    let qubits: Vec<String> = x_basis.iter().map(|q| q.to_string()).collect();
    format!("x_{}", qubits.join("_"))
}

/// Stores every histogram drawn from `inner` under `dir`, one file per
/// basis, and serves later requests for the same basis from disk.
///
/// With `reuse` off, existing files are ignored and overwritten.
pub struct CachedSampler<S> {
    inner: S,
    dir: PathBuf,
    reuse: bool,
    hits: usize,
}

impl<S> CachedSampler<S> {
    pub fn new(inner: S, dir: PathBuf, reuse: bool) -> Self {
        Self {
            inner,
            dir,
            reuse,
            hits: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Requests answered from disk so far.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl<S> Sampler for CachedSampler<S>
where
    S: Sampler,
    PipelineError: From<S::Error>,
{
    type Error = PipelineError;

    fn sample(&mut self, x_basis: &[usize]) -> PipelineResult<Histogram> {
        let path = self.dir.join(format!("{}.json", basis_label(x_basis)));
        if self.reuse && path.is_file() {
            debug!(path = %path.display(), "measurement cache hit");
            self.hits += 1;
            return read_json(&path);
        }

        let hist = self.inner.sample(x_basis)?;
        create_dir(&self.dir)?;
        write_json_atomic(&path, &hist)?;
        Ok(hist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum::QuantumError;

    /// Counts calls and returns a histogram tagged with the call number.
    struct Counting {
        calls: u64,
    }

    impl Sampler for Counting {
        type Error = QuantumError;

        fn sample(&mut self, _x_basis: &[usize]) -> Result<Histogram, QuantumError> {
            self.calls += 1;
            let mut h = Histogram::new();
            h.add(self.calls, 10.0);
            Ok(h)
        }
    }

    #[test]
    fn labels() {
        assert_eq!(basis_label(&[]), "z");
        assert_eq!(basis_label(&[3]), "x_3");
        assert_eq!(basis_label(&[0, 1, 2]), "x_0_1_2");
    }

    #[test]
    fn second_run_reads_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("params_0");

        let mut first = CachedSampler::new(Counting { calls: 0 }, dir.clone(), true);
        let a = first.sample(&[]).unwrap();
        let b = first.sample(&[1]).unwrap();
        assert!(dir.join("z.json").is_file());
        assert!(dir.join("x_1.json").is_file());

        let mut second = CachedSampler::new(Counting { calls: 100 }, dir.clone(), true);
        assert_eq!(second.sample(&[]).unwrap(), a);
        assert_eq!(second.sample(&[1]).unwrap(), b);
        assert_eq!(second.hits(), 2);
        assert_eq!(second.inner.calls, 100);
    }

    #[test]
    fn reuse_off_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_path_buf();

        CachedSampler::new(Counting { calls: 0 }, dir.clone(), true)
            .sample(&[])
            .unwrap();
        let mut fresh = CachedSampler::new(Counting { calls: 7 }, dir.clone(), false);
        let h = fresh.sample(&[]).unwrap();
        assert_eq!(h.count(8), 10.0);
        assert_eq!(fresh.hits(), 0);

        let reread: Histogram = read_json(&dir.join("z.json")).unwrap();
        assert_eq!(reread, h);
    }
}
