// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in the session manager. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent across structured log output
//! * Provide consistent, human-readable output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::session` - session transitions and recovery
//! * `messages::engine` - engine module resolution, loading and init
//! * `messages::cache` - chain and application cache activity
//! * `messages::signer` - guest signer selection and key storage
//!
//! # Usage
//!
//! ```rust
//! use ledger_session::observability::messages::session::WalletDisconnected;
//! use ledger_session::observability::messages::StructuredLog;
//!
//! WalletDisconnected { chain_id: "e476187f6ddfeb9d" }.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// `filter` takes `EnvFilter` directives (e.g. `"info,ledger_session=debug"`);
/// when absent, `RUST_LOG` is consulted and `info` is the fallback. Returns
/// `false` when a global subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
