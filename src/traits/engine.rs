// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Capability set the session manager needs from a ledger engine.
//!
//! The engine is an opaque dependency. Whatever the loader produces must
//! implement these traits; nothing else about the module is assumed.
//! Every handle that references an engine-side resource implements
//! [`Release`], and the session manager holds them in
//! [`Lease`](crate::engine::Lease)s so they are released on every exit path.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::EngineInitOptions;
use crate::engine::EngineResult;
use crate::traits::Signer;
use crate::types::{Address, ApplicationId, ChainId};

/// Frees the engine-side resource behind a handle.
///
/// Must be infallible and safe to call once per handle; leases guarantee
/// at most one call.
pub trait Release: Send + Sync {
    fn release(&self);
}

#[async_trait]
pub trait Engine: Send + Sync {
    /// Runtime bootstrap. Called once per loaded module before anything else.
    async fn init(&self, options: &EngineInitOptions) -> EngineResult<()>;

    async fn create_faucet(&self, faucet_url: &str) -> EngineResult<Arc<dyn Faucet>>;

    /// Builds a client bound to a wallet and the signer that owns it.
    async fn construct_client(
        &self,
        wallet: Arc<dyn Wallet>,
        signer: Arc<dyn Signer>,
    ) -> EngineResult<Arc<dyn Client>>;

    /// Tears down runtime state after every handle has been released.
    async fn shutdown(&self) -> EngineResult<()> {
        Ok(())
    }
}

#[async_trait]
pub trait Faucet: Release {
    async fn create_wallet(&self) -> EngineResult<Arc<dyn Wallet>>;

    /// Assigns a new chain to `owner` and records it in `wallet`.
    async fn claim_chain(&self, wallet: &dyn Wallet, owner: &Address) -> EngineResult<ChainId>;
}

pub trait Wallet: Release {}

#[async_trait]
pub trait Client: Release {
    async fn chain(&self, chain_id: &ChainId) -> EngineResult<Arc<dyn Chain>>;
}

#[async_trait]
pub trait Chain: Release {
    fn id(&self) -> &ChainId;

    async fn application(&self, app_id: &ApplicationId) -> EngineResult<Arc<dyn Application>>;
}

#[async_trait]
pub trait Application: Release {
    async fn query(&self, request: &str) -> EngineResult<String>;

    /// Executes an operation signed by the owner of the chain this handle lives on.
    async fn mutate(&self, request: &str) -> EngineResult<String>;
}
