// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Persistent storage for guest signer keys.

use crate::config::consts::KEY_STORE_FILE_NAME;
use crate::observability::messages::signer::{
    SignerKeyDiscarded, SignerKeyPersisted, SignerKeyRestored,
};
use crate::observability::messages::StructuredLog;
use crate::signer::keys::KeyPair;
use crate::signer::{LocalSigner, SignerError, SignerKind, SignerResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value store holding hex-encoded signer keys.
pub trait KeyStore: Send + Sync {
    fn load(&self, key: &str) -> SignerResult<Option<String>>;
    fn store(&self, key: &str, value: &str) -> SignerResult<()>;
}

/// Keys kept in a JSON document inside a directory, one entry per storage key.
///
/// Survives process restarts, so a guest keeps the same identity across runs.
pub struct FileKeyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyStore {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(KEY_STORE_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> SignerResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            SignerError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            SignerError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self, key: &str) -> SignerResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn store(&self, key: &str, value: &str) -> SignerResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SignerError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| SignerError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            SignerError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

/// Process-lifetime store. A guest identity lasts as long as the store does.
#[derive(Default)]
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self, key: &str) -> SignerResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> SignerResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl LocalSigner {
    /// Restores the key stored under `storage_key`, or generates and persists one.
    ///
    /// A stored value that does not decode to a valid key is replaced.
    pub fn from_store(store: &dyn KeyStore, storage_key: &str) -> SignerResult<Self> {
        if let Some(stored) = store.load(storage_key)? {
            match KeyPair::from_secret_hex(&stored) {
                Ok(keys) => {
                    SignerKeyRestored { storage_key }.log();
                    return Ok(Self::new(keys, SignerKind::Storage));
                }
                Err(e) => {
                    SignerKeyDiscarded {
                        storage_key,
                        reason: &e.to_string(),
                    }
                    .log();
                }
            }
        }

        let keys = KeyPair::random();
        store.store(storage_key, &keys.secret_hex())?;
        SignerKeyPersisted {
            storage_key,
            address: keys.address().as_str(),
        }
        .log();
        Ok(Self::new(keys, SignerKind::Storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_restores_identity() {
        let store = MemoryKeyStore::new();
        let first = LocalSigner::from_store(&store, "app:key").unwrap();
        let second = LocalSigner::from_store(&store, "app:key").unwrap();

        assert_eq!(first.local_address(), second.local_address());
        assert_eq!(first.kind(), SignerKind::Storage);
    }

    #[test]
    fn test_storage_keys_do_not_collide() {
        let store = MemoryKeyStore::new();
        let a = LocalSigner::from_store(&store, "app-a").unwrap();
        let b = LocalSigner::from_store(&store, "app-b").unwrap();
        assert_ne!(a.local_address(), b.local_address());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let address = {
            let store = FileKeyStore::new(dir.path());
            LocalSigner::from_store(&store, "guest")
                .unwrap()
                .local_address()
                .clone()
        };

        let reopened = FileKeyStore::new(dir.path());
        let restored = LocalSigner::from_store(&reopened, "guest").unwrap();
        assert_eq!(restored.local_address(), &address);
        assert!(reopened.path().exists());
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKeyStore::new(&nested);

        store.store("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_corrupt_key_is_replaced() {
        let store = MemoryKeyStore::new();
        store.store("guest", "not-hex").unwrap();

        let signer = LocalSigner::from_store(&store, "guest").unwrap();
        let persisted = store.load("guest").unwrap().unwrap();
        assert_ne!(persisted, "not-hex");

        let again = LocalSigner::from_store(&store, "guest").unwrap();
        assert_eq!(again.local_address(), signer.local_address());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        let result = LocalSigner::from_store(&store, "guest");
        assert!(matches!(result, Err(SignerError::Storage(_))));
    }
}
