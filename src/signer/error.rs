// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::types::Address;
use thiserror::Error;

/// Error type for signer operations.
#[derive(Error, Debug)]
pub enum SignerError {
    /// Asked to sign for an identity this signer does not hold.
    #[error("Owner mismatch: signer holds {held}, asked to sign for {requested}")]
    OwnerMismatch { held: Address, requested: Address },

    /// Secret key bytes were rejected by the curve.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// Signing primitive failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Reading or writing the key store failed.
    #[error("Key storage error: {0}")]
    Storage(String),

    /// External signer (e.g. a wallet extension) reported a failure.
    #[error("External signer error: {0}")]
    External(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;
