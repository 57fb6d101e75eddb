// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handle caches owned by the session manager.

pub mod application;
pub mod chain;

pub use application::ApplicationCache;
pub use chain::{ChainCache, ChainHandle};
