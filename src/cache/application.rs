// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Application handle cache with epoch-guarded writes.
//!
//! Every wallet transition calls [`ApplicationCache::invalidate_all`], which
//! clears the map and bumps the epoch. A lookup that started before the
//! transition writes back with [`ApplicationCache::set_if_current`] and is
//! refused, so a handle routed through a released wallet chain never lands
//! in the cache.

use crate::observability::messages::cache::{ApplicationsInvalidated, StaleApplicationDiscarded};
use crate::observability::messages::StructuredLog;
use crate::types::ApplicationId;
use parking_lot::Mutex;
use std::collections::HashMap;

struct Entries<H> {
    handles: HashMap<ApplicationId, H>,
    epoch: u64,
}

pub struct ApplicationCache<H> {
    entries: Mutex<Entries<H>>,
}

impl<H: Clone> ApplicationCache<H> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                handles: HashMap::new(),
                epoch: 0,
            }),
        }
    }

    pub fn get(&self, app_id: &ApplicationId) -> Option<H> {
        self.entries.lock().handles.get(app_id).cloned()
    }

    pub fn set(&self, app_id: ApplicationId, handle: H) {
        self.entries.lock().handles.insert(app_id, handle);
    }

    /// Stores `handle` only if no invalidation happened since `epoch` was read.
    ///
    /// Returns whether the handle was stored.
    pub fn set_if_current(&self, epoch: u64, app_id: ApplicationId, handle: H) -> bool {
        let mut entries = self.entries.lock();
        if entries.epoch != epoch {
            drop(entries);
            StaleApplicationDiscarded {
                app_id: app_id.as_str(),
                built_epoch: epoch,
            }
            .log();
            return false;
        }
        entries.handles.insert(app_id, handle);
        true
    }

    /// Clears every entry and starts a new epoch. Returns the new epoch.
    pub fn invalidate_all(&self) -> u64 {
        let (drained, epoch) = {
            let mut entries = self.entries.lock();
            entries.epoch += 1;
            let drained: Vec<H> = entries.handles.drain().map(|(_, handle)| handle).collect();
            (drained, entries.epoch)
        };
        ApplicationsInvalidated {
            entries: drained.len(),
            epoch,
        }
        .log();
        epoch
    }

    pub fn epoch(&self) -> u64 {
        self.entries.lock().epoch
    }

    pub fn len(&self) -> usize {
        self.entries.lock().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Clone> Default for ApplicationCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
