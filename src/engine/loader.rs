// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine module loading.
//!
//! The loader resolves where the engine module lives, fetches or reads the
//! bytes, checks the size limit and the WebAssembly header, and hands the
//! artifact to an [`EngineInstantiator`]. The instantiator is the boundary
//! where a raw module becomes something implementing the
//! [`Engine`](crate::traits::Engine) capability set.
//!
//! Every `load()` call fetches again; callers keep the result if they want
//! to reuse it. Failures are never retried here.

use crate::config::consts::MAX_ENGINE_MODULE_SIZE;
use crate::config::{parse_http_url, EngineConfig};
use crate::engine::detector::{detect_encoding, ArtifactEncoding};
use crate::engine::error::{EngineError, EngineResult};
use crate::errors::ConfigError;
use crate::observability::messages::engine::{EncodingDetected, EngineLoadFailed, EngineLoaded};
use crate::observability::messages::StructuredLog;
use crate::traits::Engine;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Where the engine module comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSource {
    /// Static asset served relative to an origin, the way a browser host loads it
    Served { url: Url },
    /// Module file shipped alongside the application
    Package { path: PathBuf },
}

impl EngineSource {
    /// Picks the served asset when an origin is configured, else the package path.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        if let Some(origin) = &config.origin {
            let base = parse_http_url("engine.origin", origin)?;
            let url = base
                .join(&config.asset_path)
                .map_err(|e| ConfigError::InvalidUrl {
                    field: "engine.asset_path",
                    value: config.asset_path.clone(),
                    reason: e.to_string(),
                })?;
            return Ok(EngineSource::Served { url });
        }

        match &config.package_path {
            Some(path) => Ok(EngineSource::Package { path: path.clone() }),
            None => Err(ConfigError::MissingEngineSource),
        }
    }
}

impl fmt::Display for EngineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineSource::Served { url } => write!(f, "{}", url),
            EngineSource::Package { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Validated engine module bytes.
#[derive(Debug, Clone)]
pub struct EngineArtifact {
    pub source: EngineSource,
    pub bytes: Vec<u8>,
    pub encoding: ArtifactEncoding,
}

/// Turns a validated artifact into a live engine.
#[async_trait]
pub trait EngineInstantiator: Send + Sync {
    async fn instantiate(&self, artifact: EngineArtifact) -> EngineResult<Arc<dyn Engine>>;
}

enum Strategy {
    Artifact {
        source: EngineSource,
        instantiator: Arc<dyn EngineInstantiator>,
        http: reqwest::Client,
    },
    Preloaded(Arc<dyn Engine>),
}

/// Produces engine instances for a session manager.
pub struct EngineLoader {
    strategy: Strategy,
}

impl EngineLoader {
    /// Loader that fetches the module described by `config`.
    pub fn from_config(
        config: &EngineConfig,
        instantiator: Arc<dyn EngineInstantiator>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_source(EngineSource::from_config(config)?, instantiator))
    }

    pub fn from_source(source: EngineSource, instantiator: Arc<dyn EngineInstantiator>) -> Self {
        Self {
            strategy: Strategy::Artifact {
                source,
                instantiator,
                http: reqwest::Client::new(),
            },
        }
    }

    /// Loader for an engine linked into the process. No fetching happens.
    pub fn preloaded(engine: Arc<dyn Engine>) -> Self {
        Self {
            strategy: Strategy::Preloaded(engine),
        }
    }

    pub fn source(&self) -> Option<&EngineSource> {
        match &self.strategy {
            Strategy::Artifact { source, .. } => Some(source),
            Strategy::Preloaded(_) => None,
        }
    }

    pub async fn load(&self) -> EngineResult<Arc<dyn Engine>> {
        match &self.strategy {
            Strategy::Preloaded(engine) => Ok(Arc::clone(engine)),
            Strategy::Artifact {
                source,
                instantiator,
                http,
            } => {
                let artifact = load_artifact(source, http).await.map_err(|error| {
                    EngineLoadFailed {
                        source: &source.to_string(),
                        error: &error,
                    }
                    .log();
                    error
                })?;
                instantiator.instantiate(artifact).await
            }
        }
    }
}

async fn load_artifact(source: &EngineSource, http: &reqwest::Client) -> EngineResult<EngineArtifact> {
    let bytes = match source {
        EngineSource::Package { path } => tokio::fs::read(path).await?,
        EngineSource::Served { url } => fetch(http, url).await?,
    };

    if bytes.len() > MAX_ENGINE_MODULE_SIZE {
        return Err(EngineError::InvalidModule(format!(
            "engine module too large: {} bytes (max: {} bytes)",
            bytes.len(),
            MAX_ENGINE_MODULE_SIZE
        )));
    }

    let label = source.to_string();
    EngineLoaded {
        source: &label,
        size_bytes: bytes.len(),
    }
    .log();

    let encoding = detect_encoding(&bytes)?;
    EncodingDetected {
        source: &label,
        encoding: encoding.as_str(),
    }
    .log();

    Ok(EngineArtifact {
        source: source.clone(),
        bytes,
        encoding,
    })
}

async fn fetch(http: &reqwest::Client, url: &Url) -> EngineResult<Vec<u8>> {
    let fetch_error = |reason: String| EngineError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stub::{StubEngine, StubInstantiator};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn engine_module() -> Vec<u8> {
        wat::parse_str(r#"(module (memory (export "memory") 1) (func (export "init")))"#).unwrap()
    }

    #[test]
    fn test_source_prefers_origin() {
        let config = EngineConfig {
            origin: Some("http://localhost:3000".to_string()),
            package_path: Some(PathBuf::from("/opt/engine.wasm")),
            ..EngineConfig::default()
        };

        let source = EngineSource::from_config(&config).unwrap();
        assert_eq!(
            source.to_string(),
            "http://localhost:3000/engine/ledger_engine_bg.wasm"
        );
    }

    #[test]
    fn test_source_falls_back_to_package() {
        let config = EngineConfig {
            package_path: Some(PathBuf::from("/opt/engine.wasm")),
            ..EngineConfig::default()
        };
        assert_eq!(
            EngineSource::from_config(&config).unwrap(),
            EngineSource::Package {
                path: PathBuf::from("/opt/engine.wasm")
            }
        );
    }

    #[test]
    fn test_source_requires_origin_or_package() {
        assert_eq!(
            EngineSource::from_config(&EngineConfig::default()).unwrap_err(),
            ConfigError::MissingEngineSource
        );
    }

    #[tokio::test]
    async fn test_load_package() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&engine_module()).unwrap();

        let instantiator = Arc::new(StubInstantiator::new());
        let loader = EngineLoader::from_source(
            EngineSource::Package {
                path: file.path().to_path_buf(),
            },
            instantiator.clone(),
        );

        assert!(loader.load().await.is_ok());
        assert!(loader.load().await.is_ok());
        assert_eq!(
            *instantiator.seen.lock(),
            vec![ArtifactEncoding::Module, ArtifactEncoding::Module]
        );
    }

    #[tokio::test]
    async fn test_load_rejects_non_wasm() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<html>not found</html>").unwrap();

        let instantiator = Arc::new(StubInstantiator::new());
        let loader = EngineLoader::from_source(
            EngineSource::Package {
                path: file.path().to_path_buf(),
            },
            instantiator.clone(),
        );

        assert!(loader.load().await.is_err());
        assert!(instantiator.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_package() {
        let loader = EngineLoader::from_source(
            EngineSource::Package {
                path: PathBuf::from("/nonexistent/engine.wasm"),
            },
            Arc::new(StubInstantiator::new()),
        );

        match loader.load().await {
            Err(EngineError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_load_served() {
        use axum::{http::StatusCode, routing::get, Router};

        let module = engine_module();
        let app = Router::new()
            .route(
                "/engine/ledger_engine_bg.wasm",
                get(move || {
                    let module = module.clone();
                    async move { module }
                }),
            )
            .route("/missing.wasm", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = EngineConfig {
            origin: Some(origin.clone()),
            ..EngineConfig::default()
        };
        let instantiator = Arc::new(StubInstantiator::new());
        let loader = EngineLoader::from_config(&config, instantiator.clone()).unwrap();
        assert!(loader.load().await.is_ok());
        assert_eq!(*instantiator.seen.lock(), vec![ArtifactEncoding::Module]);

        let missing = EngineLoader::from_config(
            &EngineConfig {
                origin: Some(origin),
                asset_path: "/missing.wasm".to_string(),
                ..EngineConfig::default()
            },
            instantiator,
        )
        .unwrap();
        match missing.load().await {
            Err(EngineError::Fetch { reason, .. }) => assert!(reason.contains("404")),
            other => panic!("Expected Fetch error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_preloaded_skips_fetching() {
        let engine = StubEngine::new();
        let loader = EngineLoader::preloaded(engine.clone());

        let loaded = loader.load().await.unwrap();
        loaded
            .init(&crate::config::SessionConfig::new("http://localhost:8080").init_options())
            .await
            .unwrap();
        assert_eq!(engine.state.inits(), 1);
        assert!(loader.source().is_none());
    }
}
