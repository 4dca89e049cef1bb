use crate::domain::ports::{CacheSession, CacheStore, Storage};
use crate::utils::error::{HunterError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value cache kept as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for JsonFileStore {
    type Session = JsonFileSession;

    fn open(&self) -> Result<JsonFileSession> {
        let entries = match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| HunterError::CacheError {
                message: format!("{} is not a valid cache file: {}", self.path.display(), e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Opened cache {} ({} keys)",
            self.path.display(),
            entries.len()
        );
        Ok(JsonFileSession {
            path: self.path.clone(),
            entries,
        })
    }
}

pub struct JsonFileSession {
    path: PathBuf,
    entries: BTreeMap<String, serde_json::Value>,
}

impl CacheSession for JsonFileSession {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: serde_json::Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Writes a sibling temp file and renames it over the cache.
    fn commit(self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let data = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("Committed cache {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {}", full_path.display());
        Ok(())
    }
}
