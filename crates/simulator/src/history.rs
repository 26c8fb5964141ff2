use crate::error::{PipelineError, PipelineResult};
use crate::store::{create_dir, read_json, write_json_atomic};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Append-only sequence persisted as a JSON array after every append.
///
/// A crash between appends loses at most the value being appended.
#[derive(Debug)]
pub struct HistoryLog<T> {
    path: PathBuf,
    entries: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> HistoryLog<T> {
    /// Start an empty log, replacing whatever `path` held before.
    pub fn create(path: &Path) -> PipelineResult<Self> {
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        let log = Self {
            path: path.to_path_buf(),
            entries: Vec::new(),
        };
        log.persist()?;
        Ok(log)
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        if !path.is_file() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries: read_json(path)?,
        })
    }

    /// Append and persist; returns the index of the new entry.
    pub fn append(&mut self, value: T) -> PipelineResult<usize> {
        self.entries.push(value);
        self.persist()?;
        Ok(self.entries.len() - 1)
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> PipelineResult<()> {
        write_json_atomic(&self.path, &self.entries)
    }
}
