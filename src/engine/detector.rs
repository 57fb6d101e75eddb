// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine module encoding detection.

use crate::engine::error::{EngineError, EngineResult};

use wasmparser::{Encoding, Parser, Payload};

/// Binary encoding of an engine artifact.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArtifactEncoding {
    /// Core WebAssembly module (binary version 1)
    Module,
    /// Component Model component (binary version 2+)
    Component,
}

impl ArtifactEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactEncoding::Module => "module",
            ArtifactEncoding::Component => "component",
        }
    }
}

/// Parses the whole artifact and reports its encoding.
///
/// # Errors
/// Returns an error if the input is empty, truncated, or otherwise not a
/// valid WebAssembly binary.
pub fn detect_encoding(bytes: &[u8]) -> EngineResult<ArtifactEncoding> {
    let mut encoding = None;

    for payload in Parser::new(0).parse_all(bytes) {
        if let Payload::Version { encoding: enc, .. } = payload? {
            encoding = Some(enc);
        }
    }

    match encoding {
        Some(Encoding::Module) => Ok(ArtifactEncoding::Module),
        Some(Encoding::Component) => Ok(ArtifactEncoding::Component),
        None => Err(EngineError::InvalidModule(
            "missing WebAssembly header".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(detect_encoding(&[]).is_err());
    }

    #[test]
    fn test_invalid_input() {
        let bad = b"\x00\x00\x00\x00\x00\x00\x00\x00";
        assert!(detect_encoding(bad).is_err());
    }

    #[test]
    fn test_core_module() {
        let bytes = wat::parse_str(r#"(module (func (export "init")))"#).unwrap();
        assert_eq!(detect_encoding(&bytes).unwrap(), ArtifactEncoding::Module);
    }

    #[test]
    fn test_component() {
        let bytes = wat::parse_str("(component)").unwrap();
        assert_eq!(detect_encoding(&bytes).unwrap(), ArtifactEncoding::Component);
    }

    #[test]
    fn test_truncated_module() {
        let bytes = wat::parse_str(r#"(module (func (export "init")))"#).unwrap();
        assert!(detect_encoding(&bytes[..bytes.len() - 3]).is_err());
    }
}
