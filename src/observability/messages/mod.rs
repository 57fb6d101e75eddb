// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit that line at its documented level together with
//! structured fields.
//!
//! # Organization
//!
//! * `session` - session transitions and recovery
//! * `engine` - engine module lifecycle
//! * `cache` - chain and application cache activity
//! * `signer` - guest signer selection and key storage
//!
//! # Usage Pattern
//!
//! ```rust
//! use ledger_session::observability::messages::engine::EngineLoaded;
//!
//! let msg = EngineLoaded {
//!     source: "https://app.example.com/engine/ledger_engine_bg.wasm",
//!     size_bytes: 4096,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod cache;
pub mod engine;
pub mod session;
pub mod signer;

/// Emits a message at its documented level with structured fields attached.
pub trait StructuredLog {
    fn log(&self);
}
