// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Session lifecycle: the state machine, its handles, notifications and recovery.

pub mod handle;
pub mod manager;
pub mod notifier;
pub mod recovery;
pub mod state;


pub use handle::{ApplicationHandle, PublicApplication, WalletApplication};
pub use manager::SessionManager;
pub use notifier::Subscription;
pub use recovery::RecoveryOutcome;
pub use state::{SessionFailure, SessionMode, SessionState};

use crate::config::SessionConfig;
use crate::engine::{EngineInstantiator, EngineLoader};
use crate::errors::SessionResult;
use crate::observability::init_tracing;
use std::sync::Arc;

/// Composition root: installs tracing, resolves the engine source and
/// builds a shared manager.
///
/// Call once at startup and pass the returned `Arc` to every consumer.
pub fn build_session(
    config: SessionConfig,
    instantiator: Arc<dyn EngineInstantiator>,
) -> SessionResult<Arc<SessionManager>> {
    init_tracing(config.engine.log_filter.as_deref());
    let loader = EngineLoader::from_config(&config.engine, instantiator)?;
    Ok(Arc::new(SessionManager::new(config, loader)?))
}
