// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::signer::SignerResult;
use crate::types::{Address, Signature};

/// Signing identity handed to the engine when a client is constructed.
///
/// Implemented by the built-in guest signers and by embedders wrapping an
/// external wallet. Identity comparisons go through [`Address`], which is
/// case-insensitive.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn address(&self) -> SignerResult<Address>;

    /// Signs `payload` on behalf of `owner`.
    ///
    /// Must fail with `SignerError::OwnerMismatch` when `owner` is not this
    /// signer's address.
    async fn sign(&self, owner: &Address, payload: &[u8]) -> SignerResult<Signature>;

    async fn contains_key(&self, owner: &Address) -> SignerResult<bool>;
}
