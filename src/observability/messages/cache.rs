// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for chain and application cache activity.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Chain handle constructed and cached.
///
/// # Log Level
/// `debug!` - Routine event
pub struct ChainCached<'a> {
    pub chain_id: &'a str,
    pub cache_size: usize,
    pub capacity: usize,
}

impl Display for ChainCached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cached chain handle {} ({}/{})",
            self.chain_id, self.cache_size, self.capacity
        )
    }
}

impl StructuredLog for ChainCached<'_> {
    fn log(&self) {
        tracing::debug!(
            chain_id = self.chain_id,
            cache_size = self.cache_size,
            capacity = self.capacity,
            "{}", self
        );
    }
}

/// Oldest chain handle evicted to stay within capacity.
///
/// # Log Level
/// `debug!` - Routine event
pub struct ChainEvicted<'a> {
    pub chain_id: &'a str,
    pub capacity: usize,
}

impl Display for ChainEvicted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Evicted chain handle {} (capacity {})",
            self.chain_id, self.capacity
        )
    }
}

impl StructuredLog for ChainEvicted<'_> {
    fn log(&self) {
        tracing::debug!(chain_id = self.chain_id, capacity = self.capacity, "{}", self);
    }
}

/// Application cache cleared after a wallet transition.
///
/// # Log Level
/// `debug!` - Routine event
pub struct ApplicationsInvalidated {
    pub entries: usize,
    pub epoch: u64,
}

impl Display for ApplicationsInvalidated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invalidated {} cached application handles (epoch {})",
            self.entries, self.epoch
        )
    }
}

impl StructuredLog for ApplicationsInvalidated {
    fn log(&self) {
        tracing::debug!(entries = self.entries, epoch = self.epoch, "{}", self);
    }
}

/// Application handle built under an older wallet identity was not cached.
///
/// # Log Level
/// `debug!` - Routine event
pub struct StaleApplicationDiscarded<'a> {
    pub app_id: &'a str,
    pub built_epoch: u64,
}

impl Display for StaleApplicationDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Not caching application {}: built under epoch {} before a wallet transition",
            self.app_id, self.built_epoch
        )
    }
}

impl StructuredLog for StaleApplicationDiscarded<'_> {
    fn log(&self) {
        tracing::debug!(app_id = self.app_id, built_epoch = self.built_epoch, "{}", self);
    }
}
