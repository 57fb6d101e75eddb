// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded cache of chain handles.
//!
//! Chain handles hold live engine resources and cost a round trip to build.
//! The cache keeps at most `capacity` of them, evicting in insertion order,
//! and never evicts the protected (public) chain.

use crate::engine::{EngineResult, Lease};
use crate::observability::messages::cache::{ChainCached, ChainEvicted};
use crate::observability::messages::StructuredLog;
use crate::traits::{Chain, Client};
use crate::types::ChainId;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Shared chain handle. The engine resource is released when the last clone drops.
pub type ChainHandle = Arc<Lease<dyn Chain>>;

#[derive(Default)]
struct Entries {
    handles: HashMap<ChainId, ChainHandle>,
    order: VecDeque<ChainId>,
    protected: Option<ChainId>,
}

impl Entries {
    fn insert(&mut self, id: ChainId, handle: ChainHandle) {
        if self.handles.insert(id.clone(), handle).is_none() {
            self.order.push_back(id);
        }
    }

    fn remove(&mut self, id: &ChainId) -> Option<ChainHandle> {
        let handle = self.handles.remove(id)?;
        self.order.retain(|entry| entry != id);
        Some(handle)
    }

    fn oldest_except(&self, protected: Option<&ChainId>) -> Option<ChainId> {
        self.order
            .iter()
            .find(|id| Some(*id) != protected)
            .cloned()
    }
}

pub struct ChainCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl ChainCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached handle for `chain_id` without touching the engine.
    pub fn peek(&self, chain_id: &ChainId) -> Option<ChainHandle> {
        self.entries.lock().handles.get(chain_id).cloned()
    }

    /// Returns the cached handle, or builds one through `client` and caches it.
    ///
    /// The handle is returned even if caching it immediately evicts it again
    /// (possible only when every slot is protected).
    pub async fn get(&self, client: &dyn Client, chain_id: &ChainId) -> EngineResult<ChainHandle> {
        if let Some(handle) = self.peek(chain_id) {
            return Ok(handle);
        }

        let handle: ChainHandle = Arc::new(Lease::new(client.chain(chain_id).await?));
        Ok(self.insert(chain_id.clone(), handle))
    }

    /// Caches a handle built elsewhere and enforces the capacity bound.
    ///
    /// If a concurrent caller cached the same chain first, that handle wins
    /// and is returned; the one passed in is dropped.
    pub fn insert(&self, chain_id: ChainId, handle: ChainHandle) -> ChainHandle {
        let mut evicted = Vec::new();
        let (winner, size) = {
            let mut entries = self.entries.lock();
            let winner = match entries.handles.get(&chain_id) {
                Some(existing) => Arc::clone(existing),
                None => {
                    entries.insert(chain_id.clone(), Arc::clone(&handle));
                    handle
                }
            };
            while entries.handles.len() > self.capacity {
                let protected = entries.protected.clone();
                let Some(oldest) = entries.oldest_except(protected.as_ref()) else {
                    break;
                };
                if let Some(old) = entries.remove(&oldest) {
                    evicted.push((oldest, old));
                }
            }
            (winner, entries.handles.len())
        };

        ChainCached {
            chain_id: chain_id.as_str(),
            cache_size: size,
            capacity: self.capacity,
        }
        .log();
        for (id, _) in &evicted {
            ChainEvicted {
                chain_id: id.as_str(),
                capacity: self.capacity,
            }
            .log();
        }
        winner
    }

    /// Marks `chain_id` as exempt from eviction (or clears the mark with `None`).
    pub fn protect(&self, chain_id: Option<ChainId>) {
        self.entries.lock().protected = chain_id;
    }

    pub fn protected(&self) -> Option<ChainId> {
        self.entries.lock().protected.clone()
    }

    /// Removes an entry. Removing the protected chain also clears protection.
    pub fn remove(&self, chain_id: &ChainId) -> Option<ChainHandle> {
        let mut entries = self.entries.lock();
        if entries.protected.as_ref() == Some(chain_id) {
            entries.protected = None;
        }
        entries.remove(chain_id)
    }

    /// Evicts the oldest entry other than `protected`. Returns the evicted id.
    pub fn evict_oldest_except(&self, protected: Option<&ChainId>) -> Option<ChainId> {
        let evicted = {
            let mut entries = self.entries.lock();
            let oldest = entries.oldest_except(protected)?;
            entries.remove(&oldest).map(|handle| (oldest, handle))
        };
        evicted.map(|(id, _handle)| {
            ChainEvicted {
                chain_id: id.as_str(),
                capacity: self.capacity,
            }
            .log();
            id
        })
    }

    /// Drops every entry and the protection mark. Returns how many entries were dropped.
    pub fn clear(&self) -> usize {
        let drained: Vec<ChainHandle> = {
            let mut entries = self.entries.lock();
            entries.order.clear();
            entries.protected = None;
            entries.handles.drain().map(|(_, handle)| handle).collect()
        };
        drained.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, chain_id: &ChainId) -> bool {
        self.entries.lock().handles.contains_key(chain_id)
    }

    /// Cached ids, oldest first.
    pub fn ids(&self) -> Vec<ChainId> {
        self.entries.lock().order.iter().cloned().collect()
    }
}
