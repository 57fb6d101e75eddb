// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for engine loading and engine-side operations.

use thiserror::Error;

/// Errors raised while loading the engine module or calling into it.
///
/// Engine-runtime faults arrive as text in `Runtime` (or inside the other
/// variants' messages) and are classified by `FaultClass::classify`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No served origin or package path is configured.
    #[error("Engine source unavailable: {0}")]
    SourceUnavailable(String),

    /// Reading a packaged engine module failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a served engine module failed.
    #[error("Failed to fetch engine module from {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Artifact is not a usable WebAssembly binary.
    #[error("Invalid engine module: {0}")]
    InvalidModule(String),

    /// wasmparser rejected the artifact.
    #[error("Parser error: {0}")]
    Parser(#[from] wasmparser::BinaryReaderError),

    /// Engine runtime bootstrap failed.
    #[error("Engine initialization failed: {0}")]
    Init(String),

    /// Faucet was unreachable or refused a request.
    #[error("Faucet error: {0}")]
    Faucet(String),

    /// Chain could not be constructed or claimed.
    #[error("Chain error: {0}")]
    Chain(String),

    /// Application lookup or execution failed.
    #[error("Application error: {0}")]
    Application(String),

    /// Engine-runtime fault (trap, poisoned state, missing host capability).
    #[error("Engine runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
