// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors raised while validating configuration or caller-supplied identifiers.
///
/// These are always raised synchronously, before any engine or network
/// activity takes place.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No faucet URL was configured
    MissingFaucetUrl,
    /// A URL field could not be parsed
    InvalidUrl {
        /// Name of the offending field
        field: &'static str,
        /// The value as configured
        value: String,
        /// Parser diagnostic
        reason: String,
    },
    /// A chain or application identifier was empty
    EmptyIdentifier {
        /// Which kind of identifier ("chain" or "application")
        kind: &'static str,
    },
    /// An address was empty or malformed
    InvalidAddress { value: String },
    /// The chain cache capacity must hold at least one entry
    InvalidCapacity { capacity: usize },
    /// Neither a served origin nor a package path was configured for the engine
    MissingEngineSource,
    /// File-backed signer storage was selected but no directory could be resolved
    MissingStorageDirectory,
    /// The configured storage key is empty
    EmptyStorageKey,
    /// The configuration file could not be read
    Unreadable { path: String, reason: String },
    /// The configuration file could not be parsed
    Unparseable { path: String, reason: String },
    /// Several problems were found at once
    Invalid(Vec<ConfigError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingFaucetUrl => write!(f, "Faucet URL is required"),
            ConfigError::InvalidUrl {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid URL for '{}': '{}' ({})", field, value, reason)
            }
            ConfigError::EmptyIdentifier { kind } => {
                write!(f, "The {} identifier must not be empty", kind)
            }
            ConfigError::InvalidAddress { value } => {
                write!(f, "Invalid address: '{}'", value)
            }
            ConfigError::InvalidCapacity { capacity } => {
                write!(
                    f,
                    "Chain cache capacity must be at least 1 (got {})",
                    capacity
                )
            }
            ConfigError::MissingEngineSource => write!(
                f,
                "No engine source configured: set engine.origin for served assets or engine.package_path for a local package"
            ),
            ConfigError::MissingStorageDirectory => write!(
                f,
                "File-backed signer storage needs signer.storage.directory (no platform data directory was found)"
            ),
            ConfigError::EmptyStorageKey => write!(f, "Signer storage key must not be empty"),
            ConfigError::Unreadable { path, reason } => {
                write!(f, "Failed to read config '{}': {}", path, reason)
            }
            ConfigError::Unparseable { path, reason } => {
                write!(f, "Failed to parse config '{}': {}", path, reason)
            }
            ConfigError::Invalid(errors) => {
                write!(f, "Configuration validation failed:")?;
                for error in errors {
                    write!(f, "\n{}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
