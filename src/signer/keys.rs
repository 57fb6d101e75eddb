// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! secp256k1 key handling for local signers.
//!
//! Addresses are EVM-style: `0x` followed by the hex of the last 20 bytes of
//! the Keccak-256 hash of the uncompressed public key (without its `0x04`
//! prefix). Signatures are recoverable ECDSA over the EIP-191 personal-sign
//! digest of the payload, so anything that verifies wallet-extension
//! signatures also verifies ours.

use crate::signer::error::{SignerError, SignerResult};
use crate::types::{Address, Signature};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};

/// Private key together with the address it controls.
pub(crate) struct KeyPair {
    signing_key: SigningKey,
    address: Address,
}

impl KeyPair {
    pub(crate) fn from_secret(secret: &[u8]) -> SignerResult<Self> {
        let signing_key =
            SigningKey::from_slice(secret).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self::from_signing_key(signing_key))
    }

    pub(crate) fn from_secret_hex(secret: &str) -> SignerResult<Self> {
        let trimmed = secret.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_secret(&bytes)
    }

    pub(crate) fn random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_from_verifying_key(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub(crate) fn address(&self) -> &Address {
        &self.address
    }

    pub(crate) fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub(crate) fn sign(&self, payload: &[u8]) -> SignerResult<Signature> {
        let digest = personal_sign_digest(payload);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recovery_id.to_byte();
        Ok(Signature::from_bytes(out))
    }
}

/// Derives a deterministic 32-byte secret from a seed string.
pub(crate) fn derive_secret(seed: &str) -> [u8; 32] {
    let digest = Keccak256::digest(seed.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// EIP-191 personal-sign digest of `payload`.
pub fn personal_sign_digest(payload: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", payload.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(payload);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    let pubkey = encoded.as_bytes();
    let digest = Keccak256::digest(&pubkey[1..]);
    Address::from_canonical(format!("0x{}", hex::encode(&digest[12..])))
}

/// Checks that `signature` over `payload` was produced by the key behind `address`.
///
/// Accepts `v` as 27/28 or 0/1. Malformed signatures verify as `false`.
pub fn verify_signature(address: &Address, payload: &[u8], signature: &Signature) -> bool {
    let raw = signature.as_bytes();
    let v = match raw[64] {
        27 | 28 => raw[64] - 27,
        0 | 1 => raw[64],
        _ => return false,
    };
    let Some(recovery_id) = RecoveryId::from_byte(v) else {
        return false;
    };
    let Ok(ecdsa) = EcdsaSignature::from_slice(&raw[..64]) else {
        return false;
    };

    let digest = personal_sign_digest(payload);
    match VerifyingKey::recover_from_prehash(&digest, &ecdsa, recovery_id) {
        Ok(recovered) => &address_from_verifying_key(&recovered) == address,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_shape() {
        let keys = KeyPair::random();
        let address = keys.address().as_str();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        assert_eq!(address, address.to_ascii_lowercase());
    }

    #[test]
    fn test_known_key_address() {
        // Private key 1 is the secp256k1 generator point.
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let keys = KeyPair::from_secret(&secret).unwrap();
        assert_eq!(
            keys.address().as_str(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let keys = KeyPair::random();
        let signature = keys.sign(b"challenge").unwrap();

        assert!(verify_signature(keys.address(), b"challenge", &signature));
        assert!(!verify_signature(keys.address(), b"other", &signature));

        let stranger = KeyPair::random();
        assert!(!verify_signature(stranger.address(), b"challenge", &signature));
    }

    #[test]
    fn test_secret_hex_roundtrip_preserves_address() {
        let keys = KeyPair::random();
        let restored = KeyPair::from_secret_hex(&keys.secret_hex()).unwrap();
        assert_eq!(restored.address(), keys.address());
    }

    #[test]
    fn test_zero_secret_rejected() {
        let result = KeyPair::from_secret(&[0u8; 32]);
        assert!(matches!(result, Err(SignerError::InvalidKey(_))));
    }

    #[test]
    fn test_derive_secret_is_deterministic() {
        assert_eq!(derive_secret("0xabc"), derive_secret("0xabc"));
        assert_ne!(derive_secret("0xabc"), derive_secret("0xabd"));
    }
}
