// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory engine for tests.
//!
//! Counts claims and handle lifetimes so tests can assert that sessions
//! never re-claim needlessly and never leak handles. Failures are injected
//! per call site through [`StubState`].

use crate::config::EngineInitOptions;
use crate::engine::{ArtifactEncoding, EngineArtifact, EngineError, EngineInstantiator, EngineResult};
use crate::traits::{Application, Chain, Client, Engine, Faucet, Release, Signer, Wallet};
use crate::types::{Address, ApplicationId, ChainId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared counters and failure switches for one stub engine.
#[derive(Default)]
pub struct StubState {
    pub inits: AtomicUsize,
    pub claims: AtomicUsize,
    pub wallets_created: AtomicUsize,
    pub clients_constructed: AtomicUsize,
    pub chains_constructed: AtomicUsize,
    pub applications_resolved: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    pub claimed_for: Mutex<Vec<Address>>,
    pub init_failure: Mutex<Option<String>>,
    pub faucet_failure: Mutex<Option<String>>,
    pub claim_failure: Mutex<Option<String>>,
    pub application_failure: Mutex<Option<String>>,
    pub query_failure: Mutex<Option<String>>,
    pub shutdown_failure: Mutex<Option<String>>,
    pub shutdowns: AtomicUsize,
    pub application_gate: Mutex<Option<Arc<ApplicationGate>>>,
}

/// Holds `Chain::application` calls until released.
///
/// `entered` fires when a call reaches the gate; the call then waits on `release`.
#[derive(Default)]
pub struct ApplicationGate {
    pub entered: Notify,
    pub release: Notify,
}

impl StubState {
    pub fn claims(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn chains_constructed(&self) -> usize {
        self.chains_constructed.load(Ordering::SeqCst)
    }

    pub fn applications_resolved(&self) -> usize {
        self.applications_resolved.load(Ordering::SeqCst)
    }

    /// Handles acquired and not yet released.
    pub fn live_handles(&self) -> usize {
        self.acquired.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn fail_init(&self, message: &str) {
        *self.init_failure.lock() = Some(message.to_string());
    }

    pub fn fail_faucet(&self, message: &str) {
        *self.faucet_failure.lock() = Some(message.to_string());
    }

    pub fn fail_claims(&self, message: &str) {
        *self.claim_failure.lock() = Some(message.to_string());
    }

    pub fn fail_queries(&self, message: &str) {
        *self.query_failure.lock() = Some(message.to_string());
    }

    pub fn fail_shutdown(&self, message: &str) {
        *self.shutdown_failure.lock() = Some(message.to_string());
    }

    pub fn fail_applications(&self, message: &str) {
        *self.application_failure.lock() = Some(message.to_string());
    }

    /// Installs a gate that holds every following application resolution.
    pub fn hold_applications(&self) -> Arc<ApplicationGate> {
        let gate = Arc::new(ApplicationGate::default());
        *self.application_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn open_applications(&self) {
        *self.application_gate.lock() = None;
    }

    pub fn heal(&self) {
        *self.init_failure.lock() = None;
        *self.faucet_failure.lock() = None;
        *self.claim_failure.lock() = None;
        *self.application_failure.lock() = None;
        *self.query_failure.lock() = None;
        *self.shutdown_failure.lock() = None;
    }

    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Option<String> {
    slot.lock().clone()
}

pub struct StubEngine {
    pub state: Arc<StubState>,
}

impl StubEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(StubState::default()),
        })
    }
}

#[async_trait]
impl Engine for StubEngine {
    async fn init(&self, _options: &EngineInitOptions) -> EngineResult<()> {
        self.state.inits.fetch_add(1, Ordering::SeqCst);
        match injected(&self.state.init_failure) {
            Some(message) => Err(EngineError::Init(message)),
            None => Ok(()),
        }
    }

    async fn create_faucet(&self, faucet_url: &str) -> EngineResult<Arc<dyn Faucet>> {
        if let Some(message) = injected(&self.state.faucet_failure) {
            return Err(EngineError::Faucet(format!("{}: {}", faucet_url, message)));
        }
        self.state.acquire();
        Ok(Arc::new(StubFaucet {
            state: Arc::clone(&self.state),
        }))
    }

    async fn construct_client(
        &self,
        _wallet: Arc<dyn Wallet>,
        signer: Arc<dyn Signer>,
    ) -> EngineResult<Arc<dyn Client>> {
        let owner = signer
            .address()
            .await
            .map_err(|e| EngineError::Chain(e.to_string()))?;
        self.state.clients_constructed.fetch_add(1, Ordering::SeqCst);
        self.state.acquire();
        Ok(Arc::new(StubClient {
            state: Arc::clone(&self.state),
            owner,
            signer,
        }))
    }

    async fn shutdown(&self) -> EngineResult<()> {
        self.state.shutdowns.fetch_add(1, Ordering::SeqCst);
        match injected(&self.state.shutdown_failure) {
            Some(message) => Err(EngineError::Runtime(message)),
            None => Ok(()),
        }
    }
}

struct StubFaucet {
    state: Arc<StubState>,
}

impl Release for StubFaucet {
    fn release(&self) {
        self.state.release();
    }
}

#[async_trait]
impl Faucet for StubFaucet {
    async fn create_wallet(&self) -> EngineResult<Arc<dyn Wallet>> {
        if let Some(message) = injected(&self.state.faucet_failure) {
            return Err(EngineError::Faucet(message));
        }
        self.state.wallets_created.fetch_add(1, Ordering::SeqCst);
        self.state.acquire();
        Ok(Arc::new(StubWallet {
            state: Arc::clone(&self.state),
        }))
    }

    async fn claim_chain(&self, _wallet: &dyn Wallet, owner: &Address) -> EngineResult<ChainId> {
        if let Some(message) = injected(&self.state.claim_failure) {
            return Err(EngineError::Faucet(message));
        }
        let n = self.state.claims.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.claimed_for.lock().push(owner.clone());
        ChainId::new(format!("chain-{}", n)).map_err(|e| EngineError::Chain(e.to_string()))
    }
}

struct StubWallet {
    state: Arc<StubState>,
}

impl Release for StubWallet {
    fn release(&self) {
        self.state.release();
    }
}

impl Wallet for StubWallet {}

struct StubClient {
    state: Arc<StubState>,
    owner: Address,
    signer: Arc<dyn Signer>,
}

impl Release for StubClient {
    fn release(&self) {
        self.state.release();
    }
}

#[async_trait]
impl Client for StubClient {
    async fn chain(&self, chain_id: &ChainId) -> EngineResult<Arc<dyn Chain>> {
        self.state.chains_constructed.fetch_add(1, Ordering::SeqCst);
        self.state.acquire();
        Ok(Arc::new(StubChain {
            state: Arc::clone(&self.state),
            id: chain_id.clone(),
            owner: self.owner.clone(),
            signer: Arc::clone(&self.signer),
        }))
    }
}

struct StubChain {
    state: Arc<StubState>,
    id: ChainId,
    owner: Address,
    signer: Arc<dyn Signer>,
}

impl Release for StubChain {
    fn release(&self) {
        self.state.release();
    }
}

#[async_trait]
impl Chain for StubChain {
    fn id(&self) -> &ChainId {
        &self.id
    }

    async fn application(&self, app_id: &ApplicationId) -> EngineResult<Arc<dyn Application>> {
        let gate = self.state.application_gate.lock().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(message) = injected(&self.state.application_failure) {
            return Err(EngineError::Application(message));
        }
        self.state.applications_resolved.fetch_add(1, Ordering::SeqCst);
        self.state.acquire();
        Ok(Arc::new(StubApplication {
            state: Arc::clone(&self.state),
            chain_id: self.id.clone(),
            app_id: app_id.clone(),
            owner: self.owner.clone(),
            signer: Arc::clone(&self.signer),
        }))
    }
}

struct StubApplication {
    state: Arc<StubState>,
    chain_id: ChainId,
    app_id: ApplicationId,
    owner: Address,
    signer: Arc<dyn Signer>,
}

impl Release for StubApplication {
    fn release(&self) {
        self.state.release();
    }
}

#[async_trait]
impl Application for StubApplication {
    /// Echoes `chain|app|query|request`.
    async fn query(&self, request: &str) -> EngineResult<String> {
        if let Some(message) = injected(&self.state.query_failure) {
            return Err(EngineError::Runtime(message));
        }
        Ok(format!("{}|{}|query|{}", self.chain_id, self.app_id, request))
    }

    /// Signs the request as the chain owner and echoes `chain|app|owner|mutate|request`.
    async fn mutate(&self, request: &str) -> EngineResult<String> {
        if let Some(message) = injected(&self.state.query_failure) {
            return Err(EngineError::Runtime(message));
        }
        self.signer
            .sign(&self.owner, request.as_bytes())
            .await
            .map_err(|e| EngineError::Application(e.to_string()))?;
        Ok(format!(
            "{}|{}|{}|mutate|{}",
            self.chain_id, self.app_id, self.owner, request
        ))
    }
}

/// Instantiator handing out one shared stub engine and recording what it was given.
pub struct StubInstantiator {
    pub engine: Arc<StubEngine>,
    pub seen: Mutex<Vec<ArtifactEncoding>>,
}

impl StubInstantiator {
    pub fn new() -> Self {
        Self {
            engine: StubEngine::new(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EngineInstantiator for StubInstantiator {
    async fn instantiate(&self, artifact: EngineArtifact) -> EngineResult<Arc<dyn Engine>> {
        self.seen.lock().push(artifact.encoding);
        Ok(self.engine.clone())
    }
}
