// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine module lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Engine source resolution (served asset vs. local package)
//! * Module fetching and validation
//! * Engine init bootstrap

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Engine module loaded and validated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use ledger_session::observability::messages::engine::EngineLoaded;
///
/// let msg = EngineLoaded {
///     source: "/opt/ledger/engine.wasm",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineLoaded<'a> {
    pub source: &'a str,
    pub size_bytes: usize,
}

impl Display for EngineLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded engine module: {} ({} bytes)",
            self.source, self.size_bytes
        )
    }
}

impl StructuredLog for EngineLoaded<'_> {
    fn log(&self) {
        tracing::info!(source = self.source, size_bytes = self.size_bytes, "{}", self);
    }
}

/// Engine module loading failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use ledger_session::observability::messages::engine::EngineLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = EngineLoadFailed {
///     source: "/opt/ledger/missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct EngineLoadFailed<'a> {
    pub source: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EngineLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load engine module '{}': {}",
            self.source, self.error
        )
    }
}

impl StructuredLog for EngineLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(source = self.source, error = %self.error, "{}", self);
    }
}

/// Engine module encoding detected.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct EncodingDetected<'a> {
    pub source: &'a str,
    pub encoding: &'a str,
}

impl Display for EncodingDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Detected {} encoding for engine module: {}",
            self.encoding, self.source
        )
    }
}

impl StructuredLog for EncodingDetected<'_> {
    fn log(&self) {
        tracing::debug!(source = self.source, encoding = self.encoding, "{}", self);
    }
}

/// Engine runtime bootstrap completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineInitialized<'a> {
    pub network: &'a str,
}

impl Display for EngineInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine runtime initialized for network '{}'", self.network)
    }
}

impl StructuredLog for EngineInitialized<'_> {
    fn log(&self) {
        tracing::info!(network = self.network, "{}", self);
    }
}
