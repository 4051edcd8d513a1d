//! Persisted client storage.
//!
//! Holds the handful of values a browser would keep in cookies and local
//! storage: the session `token` and the auth settings. Nothing else is
//! persisted; entity data lives only in the in-memory store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::errors::StorageError;

/// Session bearer token.
pub const TOKEN_KEY: &str = "token";
/// Whether CERN SSO is used for login.
pub const USE_CERN_SSO_KEY: &str = "USE_CERN_SSO";
/// Where the login page sends the user.
pub const AUTH_URL_KEY: &str = "AUTH_URL";

/// Key/value storage that survives restarts.
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TOKEN_KEY.to_string(), token.to_string());
        storage
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object in a single file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, creating its directory if needed.
    ///
    /// A missing file is an empty storage; it is written on the first change.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let values = match std::fs::read(path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!("Opened client storage at {:?} ({} keys)", path, values.len());

        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, and only then make it visible.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        change(&mut next);
        let bytes = serde_json::to_vec_pretty(&next)?;

        // Readers only ever see a complete file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;

        *values = next;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}
