// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guest signing identities for the public session.
//!
//! Three strategies produce a [`LocalSigner`]:
//!
//! * constant address - key derived from a configured address, shared by every guest
//! * storage - random key persisted in a [`KeyStore`] and restored on the next run
//! * ephemeral - random key per construction
//!
//! [`SignerStrategy::from_config`] picks one with the precedence
//! constant address > storage > ephemeral.

mod constant;
mod ephemeral;
pub mod error;
mod keys;
mod storage;
mod strategy;

pub use error::{SignerError, SignerResult};
pub use keys::{personal_sign_digest, verify_signature};
pub use storage::{FileKeyStore, KeyStore, MemoryKeyStore};
pub use strategy::SignerStrategy;

use crate::traits::Signer;
use crate::types::{Address, Signature};
use async_trait::async_trait;
use keys::KeyPair;

/// Which strategy produced a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerKind {
    ConstantAddress,
    Storage,
    Ephemeral,
}

impl SignerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerKind::ConstantAddress => "constant_address",
            SignerKind::Storage => "storage",
            SignerKind::Ephemeral => "ephemeral",
        }
    }
}

/// In-process secp256k1 signer.
pub struct LocalSigner {
    keys: KeyPair,
    kind: SignerKind,
}

impl LocalSigner {
    fn new(keys: KeyPair, kind: SignerKind) -> Self {
        Self { keys, kind }
    }

    pub fn kind(&self) -> SignerKind {
        self.kind
    }

    /// Address this signer signs for.
    pub fn local_address(&self) -> &Address {
        self.keys.address()
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", self.keys.address())
            .field("kind", &self.kind)
            .finish()
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn address(&self) -> SignerResult<Address> {
        Ok(self.keys.address().clone())
    }

    async fn sign(&self, owner: &Address, payload: &[u8]) -> SignerResult<Signature> {
        if owner != self.keys.address() {
            return Err(SignerError::OwnerMismatch {
                held: self.keys.address().clone(),
                requested: owner.clone(),
            });
        }
        self.keys.sign(payload)
    }

    async fn contains_key(&self, owner: &Address) -> SignerResult<bool> {
        Ok(owner == self.keys.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_for_own_address() {
        let signer = LocalSigner::ephemeral();
        let owner = signer.address().await.unwrap();

        let signature = signer.sign(&owner, b"payload").await.unwrap();
        assert!(verify_signature(&owner, b"payload", &signature));
    }

    #[tokio::test]
    async fn test_sign_rejects_other_owner() {
        let signer = LocalSigner::ephemeral();
        let other = Address::parse("0x1111111111111111111111111111111111111111").unwrap();

        let result = signer.sign(&other, b"payload").await;
        match result {
            Err(SignerError::OwnerMismatch { requested, .. }) => assert_eq!(requested, other),
            other => panic!("Expected OwnerMismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_owner_comparison_ignores_case() {
        let signer = LocalSigner::ephemeral();
        let upper = Address::parse(&signer.local_address().as_str().to_ascii_uppercase()).unwrap();

        assert!(signer.contains_key(&upper).await.unwrap());
        assert!(signer.sign(&upper, b"x").await.is_ok());
    }

    #[tokio::test]
    async fn test_contains_key_only_for_own_address() {
        let signer = LocalSigner::ephemeral();
        let other = LocalSigner::ephemeral();

        assert!(signer.contains_key(signer.local_address()).await.unwrap());
        assert!(!signer.contains_key(other.local_address()).await.unwrap());
    }
}
