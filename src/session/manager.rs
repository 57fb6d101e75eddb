// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Public/wallet session state machine.
//!
//! ```text
//! Uninitialized --initialize_read_only--> ReadOnly --connect_wallet--> Full
//!       ^                                    ^                          |
//!       |                                    +----disconnect_wallet-----+
//!       +---------------- destroy (from any state) ---------------------+
//! ```
//!
//! Transitions are serialized by an async transition lock. Reads
//! (`state`, `get_application`, queries) never take it. The mode flip,
//! wallet context swap, chain cache update and application cache
//! invalidation of a transition happen inside one write-locked section, and
//! subscribers are notified only after it.

use crate::cache::{ApplicationCache, ChainCache, ChainHandle};
use crate::config::SessionConfig;
use crate::engine::{EngineLoader, Lease};
use crate::errors::{SessionError, SessionResult};
use crate::observability::messages::engine::EngineInitialized;
use crate::observability::messages::session::{
    SessionDestroyed, SessionInitFailed, SessionInitialized, WalletConnectFailed, WalletConnected,
    WalletDisconnected, WalletReconnected,
};
use crate::observability::messages::StructuredLog;
use crate::query::CrossChainClient;
use crate::session::handle::ApplicationHandle;
use crate::session::notifier::{Notifier, Subscription};
use crate::session::state::{SessionFailure, SessionMode, SessionState};
use crate::signer::{SignerKind, SignerStrategy};
use crate::traits::{
    Application, Client, Engine, EnvironmentReload, Faucet, NoEnvironmentReload, Signer, Wallet,
};
use crate::types::{Address, ApplicationId, ChainId};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Engine-side resources of one chain session.
///
/// Fields drop in declaration order, so the chain is released before the
/// client and the client before the wallet.
pub(super) struct SessionContext {
    chain: ChainHandle,
    client: Arc<Lease<dyn Client>>,
    wallet: Arc<Lease<dyn Wallet>>,
    signer: Arc<dyn Signer>,
    chain_id: ChainId,
    address: Address,
}

impl SessionContext {
    fn with_signer(&self, signer: Arc<dyn Signer>) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            client: Arc::clone(&self.client),
            wallet: Arc::clone(&self.wallet),
            signer,
            chain_id: self.chain_id.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Default)]
struct Inner {
    mode: SessionMode,
    engine: Option<Arc<dyn Engine>>,
    faucet: Option<Arc<Lease<dyn Faucet>>>,
    public: Option<Arc<SessionContext>>,
    wallet: Option<Arc<SessionContext>>,
    error: Option<SessionFailure>,
}

impl Inner {
    fn snapshot(&self) -> SessionState {
        SessionState {
            mode: self.mode,
            public_chain_id: self.public.as_ref().map(|ctx| ctx.chain_id.clone()),
            public_address: self.public.as_ref().map(|ctx| ctx.address.clone()),
            wallet_chain_id: self.wallet.as_ref().map(|ctx| ctx.chain_id.clone()),
            wallet_address: self.wallet.as_ref().map(|ctx| ctx.address.clone()),
            error: self.error.clone(),
        }
    }
}

/// Everything torn out of the session by a teardown.
struct Teardown {
    engine: Option<Arc<dyn Engine>>,
    had_wallet: bool,
    chains_released: usize,
}

/// Owns the public session, the optional wallet session and their caches.
///
/// Construct one per application and share it by `Arc`.
pub struct SessionManager {
    config: SessionConfig,
    loader: EngineLoader,
    signer_strategy: SignerStrategy,
    cross_chain: CrossChainClient,
    pub(super) reload: Arc<dyn EnvironmentReload>,
    transition: Mutex<()>,
    inner: RwLock<Inner>,
    chains: ChainCache,
    applications: ApplicationCache<ApplicationHandle>,
    notifier: Notifier,
}

impl SessionManager {
    /// Validates `config` and builds an uninitialized manager.
    ///
    /// No network activity happens here.
    pub fn new(config: SessionConfig, loader: EngineLoader) -> SessionResult<Self> {
        config.validate()?;
        let signer_strategy = SignerStrategy::from_config(&config.signer)?;
        let cross_chain = CrossChainClient::new(&config.faucet_url)?;

        Ok(Self {
            chains: ChainCache::new(config.chain_cache_capacity),
            applications: ApplicationCache::new(),
            config,
            loader,
            signer_strategy,
            cross_chain,
            reload: Arc::new(NoEnvironmentReload),
            transition: Mutex::new(()),
            inner: RwLock::new(Inner::default()),
            notifier: Notifier::default(),
        })
    }

    /// Replaces the last-resort fallback used by [`reinit`](Self::reinit).
    pub fn with_reload(mut self, reload: Arc<dyn EnvironmentReload>) -> Self {
        self.reload = reload;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn signer_kind(&self) -> SignerKind {
        self.signer_strategy.kind()
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().snapshot()
    }

    pub fn mode(&self) -> SessionMode {
        self.inner.read().mode
    }

    pub fn public_chain_id(&self) -> Option<ChainId> {
        self.inner.read().public.as_ref().map(|ctx| ctx.chain_id.clone())
    }

    pub fn wallet_chain_id(&self) -> Option<ChainId> {
        self.inner.read().wallet.as_ref().map(|ctx| ctx.chain_id.clone())
    }

    pub fn is_ready(&self) -> bool {
        self.mode() != SessionMode::Uninitialized
    }

    pub fn chain_cache(&self) -> &ChainCache {
        &self.chains
    }

    /// Registers `callback` for every state notification.
    ///
    /// The returned subscription carries the state at subscription time.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let id = self.notifier.register(Arc::new(callback));
        self.notifier.subscription(id, self.state())
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    pub(super) fn publish(&self) {
        let state = self.state();
        self.notifier.notify(&state);
    }

    pub(super) async fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transition.lock().await
    }

    /// Boots the public session. Does nothing once initialized.
    ///
    /// On failure the session stays uninitialized, everything acquired so
    /// far is released, and the error is both returned and attached to the
    /// notified state.
    pub async fn initialize_read_only(&self) -> SessionResult<()> {
        let _guard = self.lock_transitions().await;
        self.initialize_locked().await
    }

    pub(super) async fn initialize_locked(&self) -> SessionResult<()> {
        if self.mode() != SessionMode::Uninitialized {
            return Ok(());
        }

        match self.boot_public().await {
            Ok((faucet, context)) => {
                let context = Arc::new(context);
                {
                    let mut inner = self.inner.write();
                    self.chains
                        .insert(context.chain_id.clone(), Arc::clone(&context.chain));
                    self.chains.protect(Some(context.chain_id.clone()));
                    inner.faucet = Some(faucet);
                    inner.public = Some(Arc::clone(&context));
                    inner.mode = SessionMode::ReadOnly;
                    inner.error = None;
                }
                SessionInitialized {
                    public_chain_id: context.chain_id.as_str(),
                    address: context.address.as_str(),
                    signer_kind: self.signer_strategy.kind().as_str(),
                }
                .log();
                self.publish();
                Ok(())
            }
            Err(error) => {
                SessionInitFailed { error: &error }.log();
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    /// Attaches `error` to the state and notifies. Mode is left unchanged.
    pub(super) fn record_failure(&self, error: &SessionError) {
        self.inner.write().error = Some(SessionFailure::from_error(error));
        self.publish();
    }

    /// Returns the loaded engine, loading and initializing it first if needed.
    pub(super) async fn ensure_engine(&self) -> SessionResult<Arc<dyn Engine>> {
        let loaded = self.inner.read().engine.clone();
        if let Some(engine) = loaded {
            return Ok(engine);
        }
        self.boot_engine().await
    }

    /// Loads a fresh engine, runs its init bootstrap and installs it.
    pub(super) async fn boot_engine(&self) -> SessionResult<Arc<dyn Engine>> {
        let engine = self.loader.load().await?;
        engine.init(&self.config.init_options()).await?;
        EngineInitialized {
            network: &self.config.network,
        }
        .log();
        self.inner.write().engine = Some(Arc::clone(&engine));
        Ok(engine)
    }

    async fn boot_public(&self) -> SessionResult<(Arc<Lease<dyn Faucet>>, SessionContext)> {
        let engine = self.ensure_engine().await?;
        let faucet: Arc<Lease<dyn Faucet>> = Arc::new(Lease::new(
            engine.create_faucet(&self.config.faucet_url).await?,
        ));
        let signer = self.signer_strategy.build()?;
        let address = signer.address().await?;
        let context = claim_session(engine.as_ref(), &faucet, signer, address).await?;
        Ok((faucet, context))
    }

    /// Connects an external signer as the wallet session.
    ///
    /// Initializes the public session first if needed. Reconnecting an
    /// address that already owns the wallet chain never claims again: a new
    /// signer instance is swapped in with one notification, the same instance
    /// is a silent no-op. On failure the previous wallet session (if any) is
    /// left as it was.
    pub async fn connect_wallet(&self, signer: Arc<dyn Signer>) -> SessionResult<()> {
        let _guard = self.lock_transitions().await;
        self.initialize_locked().await?;
        self.connect_locked(signer).await
    }

    /// Same algorithm as [`connect_wallet`](Self::connect_wallet).
    pub async fn switch_wallet(&self, signer: Arc<dyn Signer>) -> SessionResult<()> {
        self.connect_wallet(signer).await
    }

    pub(super) async fn connect_locked(&self, signer: Arc<dyn Signer>) -> SessionResult<()> {
        let address = signer.address().await?;

        let current = self.inner.read().wallet.clone();
        if let Some(current) = current.filter(|ctx| ctx.address == address) {
            let replaced = !same_instance(&current.signer, &signer);
            if replaced {
                let swapped = Arc::new(current.with_signer(signer));
                self.inner.write().wallet = Some(swapped);
            }
            WalletReconnected {
                address: address.as_str(),
                signer_replaced: replaced,
            }
            .log();
            if replaced {
                self.publish();
            }
            return Ok(());
        }

        let context = match self.claim_wallet(signer, address.clone()).await {
            Ok(context) => Arc::new(context),
            Err(error) => {
                WalletConnectFailed {
                    address: address.as_str(),
                    error: &error,
                }
                .log();
                return Err(error);
            }
        };

        let previous = {
            let mut inner = self.inner.write();
            let previous = inner.wallet.replace(Arc::clone(&context));
            if let Some(previous) = &previous {
                self.chains.remove(&previous.chain_id);
            }
            self.chains
                .insert(context.chain_id.clone(), Arc::clone(&context.chain));
            inner.mode = SessionMode::Full;
            inner.error = None;
            self.applications.invalidate_all();
            previous
        };
        drop(previous);

        WalletConnected {
            chain_id: context.chain_id.as_str(),
            address: context.address.as_str(),
        }
        .log();
        self.publish();
        Ok(())
    }

    async fn claim_wallet(
        &self,
        signer: Arc<dyn Signer>,
        address: Address,
    ) -> SessionResult<SessionContext> {
        let (engine, faucet) = {
            let inner = self.inner.read();
            (inner.engine.clone(), inner.faucet.clone())
        };
        let (Some(engine), Some(faucet)) = (engine, faucet) else {
            return Err(SessionError::Precondition {
                operation: "connect_wallet",
                requirement: "an initialized session",
            });
        };
        claim_session(engine.as_ref(), &faucet, signer, address).await
    }

    /// Drops the wallet session. The public session is untouched.
    pub async fn disconnect_wallet(&self) {
        let _guard = self.lock_transitions().await;

        let previous = {
            let mut inner = self.inner.write();
            if inner.mode != SessionMode::Full {
                return;
            }
            let previous = inner.wallet.take();
            if let Some(previous) = &previous {
                self.chains.remove(&previous.chain_id);
            }
            inner.mode = SessionMode::ReadOnly;
            self.applications.invalidate_all();
            previous
        };

        if let Some(previous) = previous {
            WalletDisconnected {
                chain_id: previous.chain_id.as_str(),
            }
            .log();
        }
        self.publish();
    }

    /// Returns the composite handle for `app_id`.
    ///
    /// `Ok(None)` when the session is not initialized. A handle built while
    /// a wallet transition ran is returned but not cached.
    pub async fn get_application(&self, app_id: &str) -> SessionResult<Option<ApplicationHandle>> {
        let app_id = ApplicationId::new(app_id)?;
        if let Some(handle) = self.applications.get(&app_id) {
            return Ok(Some(handle));
        }

        let (epoch, public, wallet) = {
            let inner = self.inner.read();
            (
                self.applications.epoch(),
                inner.public.clone(),
                inner.wallet.clone(),
            )
        };
        let Some(public) = public else {
            return Ok(None);
        };

        let public_side = self.resolve_application(&public, &app_id).await?;
        let wallet_side = match &wallet {
            Some(wallet) => Some(self.resolve_application(wallet, &app_id).await?),
            None => None,
        };

        let handle = ApplicationHandle::new(app_id.clone(), public_side, wallet_side);
        self.applications
            .set_if_current(epoch, app_id, handle.clone());
        Ok(Some(handle))
    }

    /// Resolves `app_id` on the chain handle owned by `context`.
    ///
    /// Never goes through the chain cache: a cached entry may have been
    /// rebuilt by another client and would sign with the wrong identity.
    async fn resolve_application(
        &self,
        context: &SessionContext,
        app_id: &ApplicationId,
    ) -> SessionResult<(ChainHandle, Arc<Lease<dyn Application>>)> {
        let chain = Arc::clone(&context.chain);
        let application =
            chain
                .application(app_id)
                .await
                .map_err(|source| SessionError::ApplicationUnavailable {
                    app_id: app_id.clone(),
                    source,
                })?;
        Ok((chain, Arc::new(Lease::new(application))))
    }

    /// Chain handle for any chain id.
    ///
    /// The public and wallet chains come from their own sessions. Any other
    /// chain is built through the public client and cached.
    pub async fn chain(&self, chain_id: &str) -> SessionResult<ChainHandle> {
        let chain_id = ChainId::new(chain_id)?;
        let (public, wallet) = {
            let inner = self.inner.read();
            (inner.public.clone(), inner.wallet.clone())
        };
        let Some(public) = public else {
            return Err(SessionError::Precondition {
                operation: "chain",
                requirement: "an initialized session",
            });
        };
        if let Some(owned) = [Some(&public), wallet.as_ref()]
            .into_iter()
            .flatten()
            .find(|ctx| ctx.chain_id == chain_id)
        {
            return Ok(Arc::clone(&owned.chain));
        }
        Ok(self.chains.get(&**public.client, &chain_id).await?)
    }

    /// Queries `app_id` on the public chain.
    pub async fn public_query(&self, app_id: &str, request: &str) -> SessionResult<String> {
        let handle = self
            .get_application(app_id)
            .await?
            .ok_or(SessionError::Precondition {
                operation: "public_query",
                requirement: "an initialized session",
            })?;
        handle.public.query(request).await
    }

    /// Mutates `app_id` on the wallet chain.
    pub async fn wallet_mutate(&self, app_id: &str, request: &str) -> SessionResult<String> {
        let handle = self
            .get_application(app_id)
            .await?
            .ok_or(SessionError::Precondition {
                operation: "wallet_mutate",
                requirement: "an initialized session",
            })?;
        let wallet = handle.wallet.ok_or(SessionError::Precondition {
            operation: "wallet_mutate",
            requirement: "a connected wallet",
        })?;
        wallet.mutate(request).await
    }

    /// Queries an application on any chain over HTTP, bypassing chain handles.
    pub async fn query_chain_application(
        &self,
        chain_id: &str,
        app_id: &str,
        query: &str,
    ) -> SessionResult<serde_json::Value> {
        let chain_id = ChainId::new(chain_id)?;
        let app_id = ApplicationId::new(app_id)?;
        Ok(self.cross_chain.query(&chain_id, &app_id, query).await?)
    }

    /// Releases everything, returns to `Uninitialized`, notifies, then drops
    /// every subscriber.
    ///
    /// State is always cleared. An error from the engine's shutdown hook is
    /// returned afterwards.
    pub async fn destroy(&self) -> SessionResult<()> {
        let _guard = self.lock_transitions().await;
        let result = self.teardown_locked().await;
        self.notifier.clear();
        result
    }

    /// Clears all session state and releases every handle, then notifies.
    /// Subscribers are kept.
    pub(super) async fn teardown_locked(&self) -> SessionResult<()> {
        let teardown = self.take_all();
        SessionDestroyed {
            had_wallet: teardown.had_wallet,
            chains_released: teardown.chains_released,
        }
        .log();
        self.publish();

        match teardown.engine {
            Some(engine) => Ok(engine.shutdown().await?),
            None => Ok(()),
        }
    }

    /// Empties the session in one write-locked step; handles drop with it.
    fn take_all(&self) -> Teardown {
        let (public, wallet, faucet, engine, chains_released) = {
            let mut inner = self.inner.write();
            let chains_released = self.chains.clear();
            self.applications.invalidate_all();
            inner.mode = SessionMode::Uninitialized;
            inner.error = None;
            (
                inner.public.take(),
                inner.wallet.take(),
                inner.faucet.take(),
                inner.engine.take(),
                chains_released,
            )
        };
        let had_wallet = wallet.is_some();
        drop(wallet);
        drop(public);
        drop(faucet);
        Teardown {
            engine,
            had_wallet,
            chains_released,
        }
    }

    #[cfg(test)]
    pub(crate) fn cached_applications(&self) -> usize {
        self.applications.len()
    }

    /// Signer of the wallet session, if one is connected.
    pub(super) fn wallet_signer(&self) -> Option<Arc<dyn Signer>> {
        self.inner
            .read()
            .wallet
            .as_ref()
            .map(|ctx| Arc::clone(&ctx.signer))
    }
}

/// Creates a wallet, claims a chain for `address` and builds its client and chain handle.
///
/// Everything acquired is leased, so a failure part way releases what was built.
async fn claim_session(
    engine: &dyn Engine,
    faucet: &Lease<dyn Faucet>,
    signer: Arc<dyn Signer>,
    address: Address,
) -> SessionResult<SessionContext> {
    let wallet: Arc<Lease<dyn Wallet>> = Arc::new(Lease::new(faucet.create_wallet().await?));
    let chain_id = faucet.claim_chain(&**wallet, &address).await?;
    let client: Arc<Lease<dyn Client>> = Arc::new(Lease::new(
        engine
            .construct_client(wallet.share(), Arc::clone(&signer))
            .await?,
    ));
    let chain: ChainHandle = Arc::new(Lease::new(client.chain(&chain_id).await?));

    Ok(SessionContext {
        chain,
        client,
        wallet,
        signer,
        chain_id,
        address,
    })
}

fn same_instance(a: &Arc<dyn Signer>, b: &Arc<dyn Signer>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
