// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for guest signer selection and key storage.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Persisted signer key found and restored.
///
/// # Log Level
/// `debug!` - Routine event
pub struct SignerKeyRestored<'a> {
    pub storage_key: &'a str,
}

impl Display for SignerKeyRestored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Restored signer key from storage key '{}'", self.storage_key)
    }
}

impl StructuredLog for SignerKeyRestored<'_> {
    fn log(&self) {
        tracing::debug!(storage_key = self.storage_key, "{}", self);
    }
}

/// New signer key generated and persisted.
///
/// # Log Level
/// `info!` - A new guest identity exists
pub struct SignerKeyPersisted<'a> {
    pub storage_key: &'a str,
    pub address: &'a str,
}

impl Display for SignerKeyPersisted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generated guest identity {} and persisted it under '{}'",
            self.address, self.storage_key
        )
    }
}

impl StructuredLog for SignerKeyPersisted<'_> {
    fn log(&self) {
        tracing::info!(storage_key = self.storage_key, address = self.address, "{}", self);
    }
}

/// Persisted key could not be decoded; a fresh one replaces it.
///
/// # Log Level
/// `warn!` - Guest identity changes
pub struct SignerKeyDiscarded<'a> {
    pub storage_key: &'a str,
    pub reason: &'a str,
}

impl Display for SignerKeyDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarding unreadable signer key under '{}': {}",
            self.storage_key, self.reason
        )
    }
}

impl StructuredLog for SignerKeyDiscarded<'_> {
    fn log(&self) {
        tracing::warn!(storage_key = self.storage_key, reason = self.reason, "{}", self);
    }
}
