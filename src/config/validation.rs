// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{SessionConfig, StorageKind};
use crate::errors::ConfigError;
use crate::types::Address;
use url::Url;

/// Validates a session configuration, collecting every problem found.
///
/// Checks performed:
/// 1. The faucet URL is present and parses as an absolute http(s) URL
/// 2. A configured engine origin parses as a URL
/// 3. The chain cache can hold at least one entry
/// 4. A configured constant address is well-formed
/// 5. Storage-backed signers have a non-empty key and, for file storage,
///    a resolvable directory
///
/// The engine source itself (origin vs. package path) is checked by
/// `EngineLoader::from_config`, because embedders that link the engine
/// natively never need one.
pub fn validate_config(cfg: &SessionConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if cfg.faucet_url.trim().is_empty() {
        errors.push(ConfigError::MissingFaucetUrl);
    } else if let Err(e) = parse_http_url("faucet_url", &cfg.faucet_url) {
        errors.push(e);
    }

    if let Some(origin) = &cfg.engine.origin {
        if let Err(e) = parse_http_url("engine.origin", origin) {
            errors.push(e);
        }
    }

    if cfg.chain_cache_capacity == 0 {
        errors.push(ConfigError::InvalidCapacity {
            capacity: cfg.chain_cache_capacity,
        });
    }

    if let Some(address) = &cfg.signer.constant_address {
        if let Err(e) = Address::parse(address) {
            errors.push(e);
        }
    }

    if let Some(storage) = &cfg.signer.storage {
        if storage.key.trim().is_empty() {
            errors.push(ConfigError::EmptyStorageKey);
        }
        if storage.kind == StorageKind::File && storage.resolve_directory().is_none() {
            errors.push(ConfigError::MissingStorageDirectory);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parses a URL field and requires an http or https scheme.
pub(crate) fn parse_http_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

impl SessionConfig {
    /// Validates this configuration.
    ///
    /// A single problem is returned as-is; several are wrapped in
    /// `ConfigError::Invalid`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(|mut errors| {
            if errors.len() == 1 {
                errors.remove(0)
            } else {
                ConfigError::Invalid(errors)
            }
        })
    }
}
