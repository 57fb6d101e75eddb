// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::signer::keys::KeyPair;
use crate::signer::{LocalSigner, SignerKind};

impl LocalSigner {
    /// Signer with a fresh random key. Nothing is persisted.
    pub fn ephemeral() -> Self {
        Self::new(KeyPair::random(), SignerKind::Ephemeral)
    }
}
