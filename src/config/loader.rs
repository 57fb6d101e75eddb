// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_CHAIN_CACHE_CAPACITY, DEFAULT_ENGINE_ASSET_PATH, DEFAULT_NETWORK,
    DEFAULT_SIGNER_STORAGE_KEY, DEFAULT_STORAGE_DIR_NAME,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for a ledger session.
///
/// The configuration is plain data: it is validated when a `SessionManager`
/// is constructed, and it can be built in code or loaded from a YAML or
/// TOML file with [`load_config`].
///
/// # Fields
/// * `faucet_url` - Base URL of the faucet service (required)
/// * `network` - Network tag handed to the engine at init time
/// * `signer` - Guest signer strategy selection
/// * `engine` - Where to find the engine module and how to initialize it
/// * `chain_cache_capacity` - Maximum number of live chain handles
///
/// # Example
/// ```yaml
/// faucet_url: http://localhost:8080
/// network: testnet
/// signer:
///   constant_address: "0x0000000000000000000000000000000000000000"
/// engine:
///   package_path: /opt/ledger/engine.wasm
///   log_filter: info
/// chain_cache_capacity: 10
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub faucet_url: String,
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default = "default_chain_cache_capacity")]
    pub chain_cache_capacity: usize,
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_chain_cache_capacity() -> usize {
    DEFAULT_CHAIN_CACHE_CAPACITY
}

impl SessionConfig {
    /// Creates a configuration with defaults for everything but the faucet URL.
    pub fn new(faucet_url: impl Into<String>) -> Self {
        Self {
            faucet_url: faucet_url.into(),
            network: default_network(),
            signer: SignerConfig::default(),
            engine: EngineConfig::default(),
            chain_cache_capacity: DEFAULT_CHAIN_CACHE_CAPACITY,
        }
    }

    pub fn with_constant_address(mut self, address: impl Into<String>) -> Self {
        self.signer.constant_address = Some(address.into());
        self
    }

    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.signer.storage = Some(storage);
        self
    }

    pub fn with_chain_cache_capacity(mut self, capacity: usize) -> Self {
        self.chain_cache_capacity = capacity;
        self
    }

    /// Options handed to the engine's init bootstrap.
    pub fn init_options(&self) -> EngineInitOptions {
        EngineInitOptions {
            network: self.network.clone(),
            log_filter: self.engine.log_filter.clone(),
        }
    }
}

/// Guest signer selection.
///
/// Precedence when several options are present: `constant_address` wins over
/// `storage`, and `storage` wins over the ephemeral default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignerConfig {
    pub constant_address: Option<String>,
    pub storage: Option<StorageConfig>,
}

/// Persistent key storage for the guest signer.
///
/// # Example
/// ```yaml
/// storage:
///   kind: file
///   key: my-app:guest-key
///   directory: /var/lib/my-app
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub kind: StorageKind,
    #[serde(default = "default_storage_key")]
    pub key: String,
    pub directory: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_SIGNER_STORAGE_KEY.to_string()
}

impl StorageConfig {
    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            kind: StorageKind::File,
            key: default_storage_key(),
            directory: Some(directory.into()),
        }
    }

    pub fn memory() -> Self {
        Self {
            kind: StorageKind::Memory,
            key: default_storage_key(),
            directory: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Directory for file-backed storage, falling back to the platform data directory.
    pub fn resolve_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join(DEFAULT_STORAGE_DIR_NAME)))
    }
}

/// Storage facility backing a persisted signer key.
///
/// * `File` - survives process restarts (the "local storage" analogue)
/// * `Memory` - lives as long as the owning session manager
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    File,
    Memory,
}

/// Engine module location and init options.
///
/// When `origin` is set the module is fetched from `origin + asset_path`,
/// the way a browser-hosted deployment serves it; otherwise it is read
/// from `package_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub origin: Option<String>,
    #[serde(default = "default_asset_path")]
    pub asset_path: String,
    pub package_path: Option<PathBuf>,
    pub log_filter: Option<String>,
}

fn default_asset_path() -> String {
    DEFAULT_ENGINE_ASSET_PATH.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            origin: None,
            asset_path: default_asset_path(),
            package_path: None,
            log_filter: None,
        }
    }
}

/// Options passed to `Engine::init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInitOptions {
    pub network: String,
    pub log_filter: Option<String>,
}

/// Load a config from a YAML or TOML file (chosen by extension)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str::<SessionConfig>(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<SessionConfig>(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::Unparseable {
        path: display,
        reason,
    })
}

/// Load and validate a config file
///
/// Validation covers required fields, URL syntax and cache bounds; see
/// [`crate::config::validate_config`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}
