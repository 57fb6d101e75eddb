// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for session transitions and recovery.
//!
//! This module contains message types for logging events related to:
//! * Read-only session bootstrap
//! * Wallet connect, reconnect and disconnect
//! * Session teardown
//! * Fault handling and recovery

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Read-only session established.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use ledger_session::observability::messages::session::SessionInitialized;
///
/// let msg = SessionInitialized {
///     public_chain_id: "e476187f6ddfeb9d",
///     address: "0x5a0f3c8b1d0e6a3c1b2f0d9e8c7b6a5f4e3d2c1b",
///     signer_kind: "constant_address",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SessionInitialized<'a> {
    pub public_chain_id: &'a str,
    pub address: &'a str,
    pub signer_kind: &'a str,
}

impl Display for SessionInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Read-only session ready on public chain {} as {} ({} signer)",
            self.public_chain_id, self.address, self.signer_kind
        )
    }
}

impl StructuredLog for SessionInitialized<'_> {
    fn log(&self) {
        tracing::info!(
            public_chain_id = self.public_chain_id,
            address = self.address,
            signer_kind = self.signer_kind,
            "{}", self
        );
    }
}

/// Read-only session bootstrap failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SessionInitFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for SessionInitFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to initialize read-only session: {}", self.error)
    }
}

impl StructuredLog for SessionInitFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}

/// Wallet session established on its own chain.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WalletConnected<'a> {
    pub chain_id: &'a str,
    pub address: &'a str,
}

impl Display for WalletConnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wallet {} connected on chain {}",
            self.address, self.chain_id
        )
    }
}

impl StructuredLog for WalletConnected<'_> {
    fn log(&self) {
        tracing::info!(chain_id = self.chain_id, address = self.address, "{}", self);
    }
}

/// Same wallet identity connected again; the existing chain is reused.
///
/// # Log Level
/// `debug!` - Routine event
pub struct WalletReconnected<'a> {
    pub address: &'a str,
    pub signer_replaced: bool,
}

impl Display for WalletReconnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wallet {} reconnected, reusing wallet chain (signer replaced: {})",
            self.address, self.signer_replaced
        )
    }
}

impl StructuredLog for WalletReconnected<'_> {
    fn log(&self) {
        tracing::debug!(
            address = self.address,
            signer_replaced = self.signer_replaced,
            "{}", self
        );
    }
}

/// Wallet connection attempt failed; the session stays read-only.
///
/// # Log Level
/// `warn!` - Degraded but usable
pub struct WalletConnectFailed<'a> {
    pub address: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for WalletConnectFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to connect wallet {}: {}",
            self.address, self.error
        )
    }
}

impl StructuredLog for WalletConnectFailed<'_> {
    fn log(&self) {
        tracing::warn!(address = self.address, error = %self.error, "{}", self);
    }
}

/// Wallet session released; the public chain is untouched.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WalletDisconnected<'a> {
    pub chain_id: &'a str,
}

impl Display for WalletDisconnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Wallet disconnected, released chain {}", self.chain_id)
    }
}

impl StructuredLog for WalletDisconnected<'_> {
    fn log(&self) {
        tracing::info!(chain_id = self.chain_id, "{}", self);
    }
}

/// All session resources released.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SessionDestroyed {
    pub had_wallet: bool,
    pub chains_released: usize,
}

impl Display for SessionDestroyed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Session destroyed: {} cached chains released (wallet session: {})",
            self.chains_released, self.had_wallet
        )
    }
}

impl StructuredLog for SessionDestroyed {
    fn log(&self) {
        tracing::info!(
            had_wallet = self.had_wallet,
            chains_released = self.chains_released,
            "{}", self
        );
    }
}

/// Engine shutdown reported an error during teardown.
///
/// # Log Level
/// `warn!` - Teardown is best-effort
pub struct TeardownFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for TeardownFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine shutdown failed during teardown: {}", self.error)
    }
}

impl StructuredLog for TeardownFailed<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }
}

/// Fault reported by a caller and classified.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct FaultReported<'a> {
    pub fault_class: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for FaultReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine fault ({}): {}", self.fault_class, self.error)
    }
}

impl StructuredLog for FaultReported<'_> {
    fn log(&self) {
        tracing::error!(fault_class = self.fault_class, error = %self.error, "{}", self);
    }
}

/// Recovery protocol started.
///
/// # Log Level
/// `warn!` - The session is being rebuilt
pub struct RecoveryStarted {
    pub restore_wallet: bool,
}

impl Display for RecoveryStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reinitializing session after engine fault (restore wallet: {})",
            self.restore_wallet
        )
    }
}

impl StructuredLog for RecoveryStarted {
    fn log(&self) {
        tracing::warn!(restore_wallet = self.restore_wallet, "{}", self);
    }
}

/// A recovery step failed and the environment fallback is being invoked.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EnvironmentReloadRequested<'a> {
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EnvironmentReloadRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recovery step '{}' failed, falling back to environment reload: {}",
            self.step, self.error
        )
    }
}

impl StructuredLog for EnvironmentReloadRequested<'_> {
    fn log(&self) {
        tracing::error!(step = self.step, error = %self.error, "{}", self);
    }
}

/// Recovery finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RecoveryCompleted {
    pub wallet_restored: bool,
}

impl Display for RecoveryCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Session recovered (wallet restored: {})",
            self.wallet_restored
        )
    }
}

impl StructuredLog for RecoveryCompleted {
    fn log(&self) {
        tracing::info!(wallet_restored = self.wallet_restored, "{}", self);
    }
}
