// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level error type returned by the session manager.

use crate::engine::EngineError;
use crate::errors::{ConfigError, FaultClass};
use crate::query::QueryError;
use crate::signer::SignerError;
use crate::types::ApplicationId;
use std::fmt;
use thiserror::Error;

/// Recovery steps that can fail in a way the caller must hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    /// Reloading and initializing the engine module
    EngineReload,
    /// Re-establishing the read-only public session
    PublicSession,
}

impl fmt::Display for RecoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryStep::EngineReload => write!(f, "engine reload"),
            RecoveryStep::PublicSession => write!(f, "public session restore"),
        }
    }
}

/// Errors surfaced by `SessionManager` operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid configuration or identifier.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation ran before the state it depends on existed.
    #[error("{operation} requires {requirement}")]
    Precondition {
        operation: &'static str,
        requirement: &'static str,
    },

    /// Signer failure (address resolution, signing, key storage).
    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    /// Engine or faucet failure during a session transition.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Application handle could not be resolved on a chain.
    #[error("Application '{app_id}' unavailable: {source}")]
    ApplicationUnavailable {
        app_id: ApplicationId,
        #[source]
        source: EngineError,
    },

    /// Query execution failed inside the engine.
    #[error("Application query failed: {0}")]
    QueryFailed(#[source] EngineError),

    /// Mutation execution failed inside the engine.
    #[error("Application mutation failed: {0}")]
    MutationFailed(#[source] EngineError),

    /// Cross-chain HTTP query failure.
    #[error("Cross-chain query failed: {0}")]
    CrossChain(#[from] QueryError),

    /// Recovery could not restore the session and the environment fallback failed too.
    #[error("Recovery failed during {step}: {message}")]
    Recovery { step: RecoveryStep, message: String },
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Classifies this error against the known engine fault signatures.
    ///
    /// Only engine-originated errors can be fatal; configuration, signer and
    /// precondition errors are always `FaultClass::NotFatal`.
    pub fn fault_class(&self) -> FaultClass {
        match self {
            SessionError::Engine(e)
            | SessionError::QueryFailed(e)
            | SessionError::MutationFailed(e)
            | SessionError::ApplicationUnavailable { source: e, .. } => {
                FaultClass::classify(&e.to_string())
            }
            SessionError::Recovery { message, .. } => FaultClass::classify(message),
            _ => FaultClass::NotFatal,
        }
    }
}
