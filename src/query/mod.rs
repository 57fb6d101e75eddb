// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod cross_chain;
pub mod error;

pub use cross_chain::CrossChainClient;
pub use error::{QueryError, QueryResult};
