// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composite application handles.
//!
//! A handle keeps the chain it was resolved on alive, so the engine-side
//! chain outlives every application handle built from it even after the
//! session has moved on.

use crate::cache::ChainHandle;
use crate::engine::Lease;
use crate::errors::{SessionError, SessionResult};
use crate::traits::Application;
use crate::types::{ApplicationId, ChainId};
use std::sync::Arc;

type ApplicationLease = Arc<Lease<dyn Application>>;

/// Application access on one chain.
#[derive(Clone)]
struct ChainApplication {
    chain: ChainHandle,
    application: ApplicationLease,
}

impl ChainApplication {
    async fn query(&self, request: &str) -> SessionResult<String> {
        self.application
            .query(request)
            .await
            .map_err(SessionError::QueryFailed)
    }

    async fn mutate(&self, request: &str) -> SessionResult<String> {
        self.application
            .mutate(request)
            .await
            .map_err(SessionError::MutationFailed)
    }
}

/// Application access through the public (guest) chain.
#[derive(Clone)]
pub struct PublicApplication {
    inner: ChainApplication,
}

impl PublicApplication {
    pub async fn query(&self, request: &str) -> SessionResult<String> {
        self.inner.query(request).await
    }

    /// Mutation signed by the guest identity, for system-level operations
    /// that do not need the user's wallet.
    pub async fn system_mutate(&self, request: &str) -> SessionResult<String> {
        self.inner.mutate(request).await
    }

    pub fn chain_id(&self) -> &ChainId {
        self.inner.chain.id()
    }
}

/// Application access through the wallet chain of the connected signer.
#[derive(Clone)]
pub struct WalletApplication {
    inner: ChainApplication,
}

impl WalletApplication {
    pub async fn query(&self, request: &str) -> SessionResult<String> {
        self.inner.query(request).await
    }

    pub async fn mutate(&self, request: &str) -> SessionResult<String> {
        self.inner.mutate(request).await
    }

    pub fn chain_id(&self) -> &ChainId {
        self.inner.chain.id()
    }
}

#[derive(Clone)]
pub struct ApplicationHandle {
    app_id: ApplicationId,
    pub public: PublicApplication,
    pub wallet: Option<WalletApplication>,
}

impl ApplicationHandle {
    pub(crate) fn new(
        app_id: ApplicationId,
        public: (ChainHandle, ApplicationLease),
        wallet: Option<(ChainHandle, ApplicationLease)>,
    ) -> Self {
        let (chain, application) = public;
        Self {
            app_id,
            public: PublicApplication {
                inner: ChainApplication { chain, application },
            },
            wallet: wallet.map(|(chain, application)| WalletApplication {
                inner: ChainApplication { chain, application },
            }),
        }
    }

    pub fn app_id(&self) -> &ApplicationId {
        &self.app_id
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }
}

impl std::fmt::Debug for ApplicationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationHandle")
            .field("app_id", &self.app_id)
            .field("public_chain", self.public.chain_id())
            .field("wallet_chain", &self.wallet.as_ref().map(|w| w.chain_id()))
            .finish()
    }
}
