// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Classification of engine-runtime faults.
//!
//! The engine reports fatal conditions only as text. Known signatures are
//! matched case-insensitively and sorted into recoverable faults (handled by
//! tearing the session down and booting it again) and non-recoverable faults
//! (surfaced with guidance, never retried automatically).

use serde::Serialize;

/// Signatures of faults that leave the host environment itself unusable.
const NON_RECOVERABLE_SIGNATURES: &[&str] = &[
    "sharedarraybuffer",
    "cross-origin isolation",
    "crossoriginisolated",
];

/// Signatures of faults that a fresh engine instance recovers from.
const RECOVERABLE_SIGNATURES: &[&str] = &[
    "memory access out of bounds",
    "unreachable",
    "runtimeerror",
    "recursive use of an object detected",
    "already mutably borrowed",
    "null pointer passed to rust",
    "webassembly.instantiate",
    "failed to initialize",
];

const CROSS_ORIGIN_GUIDANCE: &str = "The engine needs cross-origin isolation. Serve the application with \
`Cross-Origin-Opener-Policy: same-origin` and `Cross-Origin-Embedder-Policy: require-corp` headers.";

/// How the caller should react to an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    /// Ordinary failure; report it and carry on
    NotFatal,
    /// Engine-runtime fault cured by `reinit()`
    Recoverable,
    /// Environment fault that no amount of retrying fixes
    NonRecoverable,
}

impl FaultClass {
    /// Classifies an error message by matching known fault signatures.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        if NON_RECOVERABLE_SIGNATURES
            .iter()
            .any(|sig| lowered.contains(sig))
        {
            return FaultClass::NonRecoverable;
        }
        if RECOVERABLE_SIGNATURES.iter().any(|sig| lowered.contains(sig)) {
            return FaultClass::Recoverable;
        }
        FaultClass::NotFatal
    }

    #[inline]
    pub fn is_fatal(self) -> bool {
        !matches!(self, FaultClass::NotFatal)
    }

    /// Actionable guidance for non-recoverable faults.
    pub fn guidance(self) -> Option<&'static str> {
        match self {
            FaultClass::NonRecoverable => Some(CROSS_ORIGIN_GUIDANCE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table_driven() {
        struct TestCase {
            message: &'static str,
            expected: FaultClass,
        }

        let cases = vec![
            TestCase {
                message: "RuntimeError: memory access out of bounds",
                expected: FaultClass::Recoverable,
            },
            TestCase {
                message: "RuntimeError: unreachable executed",
                expected: FaultClass::Recoverable,
            },
            TestCase {
                message: "recursive use of an object detected which would lead to unsafe aliasing in rust",
                expected: FaultClass::Recoverable,
            },
            TestCase {
                message: "ReferenceError: SharedArrayBuffer is not defined",
                expected: FaultClass::NonRecoverable,
            },
            TestCase {
                message: "page is not crossOriginIsolated",
                expected: FaultClass::NonRecoverable,
            },
            TestCase {
                message: "chain claim rejected by faucet",
                expected: FaultClass::NotFatal,
            },
        ];

        for case in cases {
            assert_eq!(
                FaultClass::classify(case.message),
                case.expected,
                "message: {}",
                case.message
            );
        }
    }

    #[test]
    fn test_guidance_only_for_non_recoverable() {
        assert!(FaultClass::NonRecoverable.guidance().is_some());
        assert!(FaultClass::Recoverable.guidance().is_none());
        assert!(!FaultClass::NotFatal.is_fatal());
        assert!(FaultClass::Recoverable.is_fatal());
    }
}
