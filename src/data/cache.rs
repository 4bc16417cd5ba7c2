use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{load_and_clean, FileError};
use super::model::Dataset;

/// Per-session memo of cleaned datasets, keyed by source path.
///
/// Entries are never invalidated: editing the file on disk while the
/// session is running has no effect until the next session. Failed loads
/// are not remembered, so a fixed file can be retried.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, FileError> {
        let key = cache_key(path);
        if let Some(ds) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(ds));
        }

        let ds = Arc::new(load_and_clean(path)?);
        self.entries.insert(key, Arc::clone(&ds));
        Ok(ds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// `./data/x.csv` and `data/x.csv` share an entry when the file exists.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
