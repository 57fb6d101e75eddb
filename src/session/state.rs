// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{FaultClass, SessionError};
use crate::types::{Address, ChainId};
use serde::Serialize;
use std::fmt;

/// Session lifecycle stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No engine session exists
    #[default]
    Uninitialized,
    /// Public chain claimed with the guest identity
    ReadOnly,
    /// Public chain plus a wallet chain owned by an external signer
    Full,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Uninitialized => "uninitialized",
            SessionMode::ReadOnly => "read_only",
            SessionMode::Full => "full",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure attached to a state notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFailure {
    pub message: String,
    pub fault: FaultClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<&'static str>,
}

impl SessionFailure {
    pub fn from_error(error: &SessionError) -> Self {
        let fault = error.fault_class();
        Self {
            message: error.to_string(),
            fault,
            guidance: fault.guidance(),
        }
    }
}

/// Snapshot of the session handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub mode: SessionMode,
    pub public_chain_id: Option<ChainId>,
    pub public_address: Option<Address>,
    pub wallet_chain_id: Option<ChainId>,
    pub wallet_address: Option<Address>,
    pub error: Option<SessionFailure>,
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        self.mode != SessionMode::Uninitialized
    }

    pub fn has_wallet(&self) -> bool {
        self.mode == SessionMode::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    #[test]
    fn test_mode_serializes_snake_case() {
        let json = serde_json::to_string(&SessionMode::ReadOnly).unwrap();
        assert_eq!(json, "\"read_only\"");
        assert_eq!(SessionMode::Full.to_string(), "full");
    }

    #[test]
    fn test_failure_carries_guidance_for_environment_faults() {
        let error = SessionError::Engine(EngineError::Init(
            "SharedArrayBuffer is not defined".to_string(),
        ));
        let failure = SessionFailure::from_error(&error);

        assert_eq!(failure.fault, FaultClass::NonRecoverable);
        assert!(failure.guidance.is_some());
        assert!(failure.message.contains("SharedArrayBuffer"));
    }

    #[test]
    fn test_default_state_is_uninitialized() {
        let state = SessionState::default();
        assert!(!state.is_ready());
        assert!(!state.has_wallet());
        assert!(state.public_chain_id.is_none());
    }
}
