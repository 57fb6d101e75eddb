// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod engine;
pub mod recovery;
pub mod signer;

pub use engine::{Application, Chain, Client, Engine, Faucet, Release, Wallet};
pub use recovery::{EnvironmentReload, NoEnvironmentReload};
pub use signer::Signer;
