// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod fault;
mod session;

pub use config::ConfigError;
pub use fault::FaultClass;
pub use session::{RecoveryStep, SessionError, SessionResult};
