use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::JobTable;

/// Stable identity for a data source, used as the memoization key.
///
/// Canonicalization makes `./data/x.csv` and `data/x.csv` share an entry;
/// paths that cannot be canonicalized (not yet existing, permission) fall
/// back to the literal path string.
pub fn source_fingerprint(path: &Path) -> String {
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    hex::encode(hasher.finalize())
}

/// Keyed store of completed loads: source fingerprint → cleaned table.
///
/// Owned by the pipeline value that fills it; the source content is assumed
/// stable for the process lifetime, so entries are never invalidated.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<String, Arc<JobTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<JobTable>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, table: Arc<JobTable>) {
        self.entries.insert(key, table);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
