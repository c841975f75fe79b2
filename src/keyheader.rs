//! Key-exchange header parsing and rendering
//!
//! Encryption-capable messengers announce their key material in a mail
//! header carrying a semicolon-delimited attribute list:
//!
//! ```text
//! to=alice@example.org; type=p; prefer-encrypted=yes; key=RGVsdGEgQ2hhdA==
//! ```
//!
//! The format is transported through mail infrastructure that folds long
//! lines, so the parser tolerates whitespace (including CRLF folding)
//! around every name and value and inside the base64 payload. Tolerance
//! has a sharp edge, though: an attribute name the parser does not know
//! rejects the whole line unless it is prefixed with an underscore, which
//! marks it as ignorable. A malformed line must not half-apply.
//!
//! The encryption preference is a tri-state: an absent attribute means
//! "no preference", which is not an error and is distinct from an
//! explicit `no`.
//!
//! # Examples
//!
//! ```rust
//! use mail_text_engine::keyheader::{EncryptPreference, KeyExchangeHeader};
//!
//! let header: KeyExchangeHeader =
//!     "to=a@b.example.org; key=RGVsdGEgQ2hhdA==".parse().unwrap();
//! assert_eq!(header.addr, "a@b.example.org");
//! assert_eq!(header.prefer_encrypted, EncryptPreference::NoPreference);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::key::Key;

/// Column at which rendered key payloads are folded
const KEY_FOLD_WIDTH: usize = 78;

/// The sender's encryption preference
///
/// `NoPreference` is the default when the attribute is absent; only the
/// explicit values `yes` and `no` are valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptPreference {
    #[default]
    NoPreference,
    Yes,
    No,
}

impl fmt::Display for EncryptPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptPreference::NoPreference => write!(f, "nopreference"),
            EncryptPreference::Yes => write!(f, "yes"),
            EncryptPreference::No => write!(f, "no"),
        }
    }
}

/// A parsed key-exchange header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyExchangeHeader {
    /// The address the key belongs to
    pub addr: String,
    /// The sender's encryption preference
    pub prefer_encrypted: EncryptPreference,
    /// The announced public key
    pub public_key: Key,
}

impl KeyExchangeHeader {
    /// Create a header for the given address and key
    pub fn new(addr: &str, public_key: Key, prefer_encrypted: EncryptPreference) -> Self {
        KeyExchangeHeader {
            addr: addr.to_string(),
            prefer_encrypted,
            public_key,
        }
    }

    /// Render the canonical wire form
    ///
    /// `NoPreference` renders no preference attribute at all. The key
    /// payload is folded with single spaces so the header can be wrapped
    /// by mail transport without changing its meaning; `render` output
    /// always re-parses to an equal header.
    pub fn render(&self) -> String {
        let mut out = format!("to={}; ", self.addr);
        match self.prefer_encrypted {
            EncryptPreference::Yes => out.push_str("prefer-encrypted=yes; "),
            EncryptPreference::No => out.push_str("prefer-encrypted=no; "),
            EncryptPreference::NoPreference => {}
        }
        out.push_str("key= ");
        out.push_str(&self.public_key.to_base64(KEY_FOLD_WIDTH, " "));
        out
    }
}

impl FromStr for KeyExchangeHeader {
    type Err = EngineError;

    /// Parse a header line
    ///
    /// Attribute rules:
    /// - segments are trimmed of surrounding whitespace including folded
    ///   CRLF; empty segments are skipped
    /// - `to` (required, non-empty) and `key` (required, must decode to a
    ///   non-empty payload)
    /// - `type` is optional; any value other than `p` rejects the line
    /// - `prefer-encrypted` accepts `yes` and `no`; anything else rejects
    ///   the line, absence means no preference
    /// - names starting with `_` are ignored, with or without a value;
    ///   any other unknown name rejects the whole line
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut addr: Option<String> = None;
        let mut public_key: Option<Key> = None;
        let mut prefer_encrypted = EncryptPreference::NoPreference;

        for segment in line.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = match segment.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => {
                    if segment.starts_with('_') {
                        continue;
                    }
                    log::debug!("rejecting header, bare attribute {:?}", segment);
                    return Err(EngineError::HeaderSyntax(format!(
                        "attribute without value: '{}'",
                        segment
                    )));
                }
            };
            if name.starts_with('_') {
                continue;
            }
            match name {
                "to" => addr = Some(value.to_string()),
                "type" => {
                    if value != "p" {
                        return Err(EngineError::HeaderSyntax(format!(
                            "unsupported key type '{}'",
                            value
                        )));
                    }
                }
                "prefer-encrypted" => {
                    prefer_encrypted = match value {
                        "yes" => EncryptPreference::Yes,
                        "no" => EncryptPreference::No,
                        other => {
                            return Err(EngineError::HeaderSyntax(format!(
                                "invalid encryption preference '{}'",
                                other
                            )));
                        }
                    };
                }
                "key" => public_key = Some(Key::from_base64(value)?),
                other => {
                    log::debug!("rejecting header, unknown attribute {:?}", other);
                    return Err(EngineError::HeaderSyntax(format!(
                        "unknown attribute '{}'",
                        other
                    )));
                }
            }
        }

        let addr = addr
            .filter(|a| !a.is_empty())
            .ok_or_else(|| EngineError::HeaderSyntax("missing 'to' attribute".to_string()))?;
        let public_key = public_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| EngineError::HeaderSyntax("missing 'key' attribute".to_string()))?;

        Ok(KeyExchangeHeader {
            addr,
            prefer_encrypted,
            public_key,
        })
    }
}
