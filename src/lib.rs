// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod cache;         // chain + application handle caches
pub mod config;        // config loading + validation
pub mod engine;        // engine loading, leases
pub mod errors;        // error handling
pub mod observability;
pub mod query;         // cross-chain HTTP queries
pub mod session;       // session state machine + recovery
pub mod signer;        // guest signer strategies
pub mod traits;        // engine + signer seams
pub mod types;         // identifiers

pub use config::SessionConfig;
pub use errors::{FaultClass, SessionError, SessionResult};
pub use session::{build_session, SessionManager, SessionMode, SessionState};
pub use types::{Address, ApplicationId, ChainId, Signature};
