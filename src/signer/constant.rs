// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::signer::keys::{derive_secret, KeyPair};
use crate::signer::{LocalSigner, SignerKind, SignerResult};
use crate::types::Address;

impl LocalSigner {
    /// Signer whose key is the Keccak-256 hash of a configured address.
    ///
    /// Every process configured with the same address gets the same key, so a
    /// faucet can hand all anonymous visitors one shared chain. The address is
    /// canonicalized first; case variants map to the same key.
    ///
    /// The signer's own address is the one derived from that key, not the
    /// configured text.
    pub fn from_constant_address(address: &str) -> SignerResult<Self> {
        let canonical = Address::parse(address)?;
        let keys = KeyPair::from_secret(&derive_secret(canonical.as_str()))?;
        Ok(Self::new(keys, SignerKind::ConstantAddress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::SignerError;

    const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

    #[test]
    fn test_same_address_same_identity() {
        let a = LocalSigner::from_constant_address(ZERO_ADDRESS).unwrap();
        let b = LocalSigner::from_constant_address(ZERO_ADDRESS).unwrap();
        assert_eq!(a.local_address(), b.local_address());
        assert_eq!(a.kind(), SignerKind::ConstantAddress);
    }

    #[test]
    fn test_case_variants_share_identity() {
        let lower = LocalSigner::from_constant_address("0xabcdef0123").unwrap();
        let upper = LocalSigner::from_constant_address("0xABCDEF0123").unwrap();
        assert_eq!(lower.local_address(), upper.local_address());
    }

    #[test]
    fn test_different_addresses_differ() {
        let a = LocalSigner::from_constant_address(ZERO_ADDRESS).unwrap();
        let b = LocalSigner::from_constant_address("0x01").unwrap();
        assert_ne!(a.local_address(), b.local_address());
    }

    #[test]
    fn test_empty_address_rejected() {
        let result = LocalSigner::from_constant_address("  ");
        assert!(matches!(result, Err(SignerError::Config(_))));
    }
}
