pub mod key;

pub use key::CacheKey;

use serde_json::Value;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access cache entry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cached response {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Keyed storage for raw API responses.
///
/// Stores hand back exactly what was put; there is no expiry and no locking.
pub trait CacheStore {
    /// Return the response stored under `key`, if any.
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Store `response` under `key`, replacing any previous entry.
    fn put(&self, key: &CacheKey, response: &Value) -> Result<(), CacheError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let value = serde_json::from_str(&contents).map_err(|source| CacheError::Corrupt {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "cache hit");
        Ok(Some(value))
    }

    fn put(&self, key: &CacheKey, response: &Value) -> Result<(), CacheError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // Value's Display impl is infallible JSON serialization
        fs::write(&path, response.to_string()).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "cached response");
        Ok(())
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RefCell<HashMap<CacheKey, Value>>,
}

#[cfg(test)]
impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &CacheKey, response: &Value) -> Result<(), CacheError> {
        self.entries.borrow_mut().insert(key.clone(), response.clone());
        Ok(())
    }
}

/// Store that never remembers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get(&self, _key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &CacheKey, _response: &Value) -> Result<(), CacheError> {
        Ok(())
    }
}
