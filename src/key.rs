//! Key material representation and base64 transport encoding
//!
//! Keys travel inside mail headers as base64, folded to keep header lines
//! within transport limits. This module owns the raw bytes and their
//! canonical rendering; generating the underlying asymmetric key pairs is
//! a concern of the cryptography backend, not of this crate.
//!
//! # Examples
//!
//! ```rust
//! use mail_text_engine::key::Key;
//!
//! let key = Key::from_bytes(b"Delta Chat");
//! assert_eq!(key.to_base64(78, " "), "RGVsdGEgQ2hhdA==");
//!
//! // Decoding tolerates folding whitespace
//! let parsed = Key::from_base64("RG VsdGEgQ\r\n2hhdA==").unwrap();
//! assert_eq!(parsed, key);
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::EngineError;
use crate::textutils::insert_breaks;

/// Raw key material
///
/// A thin owner of key bytes with a canonical base64 transport rendering.
/// The bytes are opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Key {
            bytes: bytes.to_vec(),
        }
    }

    /// Decode key material from base64
    ///
    /// All ASCII whitespace is stripped first, so folded renderings and
    /// values copied out of wrapped header lines decode unchanged.
    ///
    /// # Errors
    ///
    /// - `EngineError::Base64` when the remaining characters are not
    ///   valid standard-alphabet base64
    pub fn from_base64(encoded: &str) -> Result<Self, EngineError> {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| EngineError::Base64(format!("invalid key payload: {}", e)))?;
        Ok(Key { bytes })
    }

    /// The raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True for zero-length key material
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the canonical base64 form, folded at `width` columns
    ///
    /// `break_str` is inserted between groups; the final group carries no
    /// break. `width == 0` or an empty break string renders a single
    /// unfolded line.
    pub fn to_base64(&self, width: usize, break_str: &str) -> String {
        insert_breaks(&BASE64.encode(&self.bytes), width, break_str)
    }
}

/// An asymmetric key pair
///
/// Container only; how the pair is generated is up to the cryptography
/// backend feeding this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public: Key,
    pub secret: Key,
}
