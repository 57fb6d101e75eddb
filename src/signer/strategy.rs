// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{SignerConfig, StorageKind};
use crate::errors::ConfigError;
use crate::signer::{
    FileKeyStore, KeyStore, LocalSigner, MemoryKeyStore, SignerKind, SignerResult,
};
use crate::traits::Signer;
use std::sync::Arc;

/// Guest signer selection resolved from configuration.
#[derive(Clone)]
pub enum SignerStrategy {
    ConstantAddress(String),
    Storage {
        store: Arc<dyn KeyStore>,
        key: String,
    },
    Ephemeral,
}

impl SignerStrategy {
    /// Applies the precedence constant address > storage > ephemeral.
    ///
    /// A memory store is created here, so its keys live as long as the
    /// returned strategy (and every clone of it).
    pub fn from_config(config: &SignerConfig) -> SignerResult<Self> {
        if let Some(address) = &config.constant_address {
            return Ok(SignerStrategy::ConstantAddress(address.clone()));
        }

        if let Some(storage) = &config.storage {
            let store: Arc<dyn KeyStore> = match storage.kind {
                StorageKind::Memory => Arc::new(MemoryKeyStore::new()),
                StorageKind::File => {
                    let directory = storage
                        .resolve_directory()
                        .ok_or(ConfigError::MissingStorageDirectory)?;
                    Arc::new(FileKeyStore::new(directory))
                }
            };
            return Ok(SignerStrategy::Storage {
                store,
                key: storage.key.clone(),
            });
        }

        Ok(SignerStrategy::Ephemeral)
    }

    pub fn kind(&self) -> SignerKind {
        match self {
            SignerStrategy::ConstantAddress(_) => SignerKind::ConstantAddress,
            SignerStrategy::Storage { .. } => SignerKind::Storage,
            SignerStrategy::Ephemeral => SignerKind::Ephemeral,
        }
    }

    /// Builds a signer for one public session.
    pub fn build(&self) -> SignerResult<Arc<dyn Signer>> {
        let signer = match self {
            SignerStrategy::ConstantAddress(address) => {
                LocalSigner::from_constant_address(address)?
            }
            SignerStrategy::Storage { store, key } => LocalSigner::from_store(store.as_ref(), key)?,
            SignerStrategy::Ephemeral => LocalSigner::ephemeral(),
        };
        Ok(Arc::new(signer))
    }
}

impl std::fmt::Debug for SignerStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignerStrategy::ConstantAddress(address) => {
                f.debug_tuple("ConstantAddress").field(address).finish()
            }
            SignerStrategy::Storage { key, .. } => {
                f.debug_struct("Storage").field("key", key).finish()
            }
            SignerStrategy::Ephemeral => f.write_str("Ephemeral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    #[test]
    fn test_precedence() {
        let cases = vec![
            (
                SignerConfig {
                    constant_address: Some("0x00".to_string()),
                    storage: Some(StorageConfig::memory()),
                },
                SignerKind::ConstantAddress,
            ),
            (
                SignerConfig {
                    constant_address: None,
                    storage: Some(StorageConfig::memory()),
                },
                SignerKind::Storage,
            ),
            (SignerConfig::default(), SignerKind::Ephemeral),
        ];

        for (config, expected) in cases {
            let strategy = SignerStrategy::from_config(&config).unwrap();
            assert_eq!(strategy.kind(), expected, "config: {:?}", config);
        }
    }

    #[tokio::test]
    async fn test_memory_strategy_keeps_identity_across_builds() {
        let config = SignerConfig {
            constant_address: None,
            storage: Some(StorageConfig::memory().with_key("test")),
        };
        let strategy = SignerStrategy::from_config(&config).unwrap();

        let first = strategy.build().unwrap().address().await.unwrap();
        let second = strategy.build().unwrap().address().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ephemeral_strategy_changes_identity() {
        let strategy = SignerStrategy::Ephemeral;
        let first = strategy.build().unwrap().address().await.unwrap();
        let second = strategy.build().unwrap().address().await.unwrap();
        assert_ne!(first, second);
    }
}
