// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ledger engine boundary.
//!
//! Loading and validating the engine module, the error type for everything
//! that happens on the engine side, and [`Lease`], the scoped owner that
//! releases engine handles.

pub mod detector;
pub mod error;
pub mod lease;
pub mod loader;

#[cfg(test)]
pub(crate) mod stub;

pub use detector::{detect_encoding, ArtifactEncoding};
pub use error::{EngineError, EngineResult};
pub use lease::Lease;
pub use loader::{EngineArtifact, EngineInstantiator, EngineLoader, EngineSource};
