//! Mail Text Engine - markup simplification for email messengers
//!
//! This library turns the loosely-formed, often malformed markup found in
//! real mail bodies into normalized plain text, and carries the small
//! key-exchange primitives that travel alongside it in mail headers.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `tokenizer`: single-pass scanner producing structural markup events
//! - `simplifier`: event-stream reduction to normalized plain text
//! - `charset`: character encoding detection and decoding
//! - `textutils`: generic string helpers (replace, break insertion)
//! - `key`: key material with base64 transport encoding
//! - `keyheader`: key-exchange header parsing and rendering
//! - `ffi`: C-compatible interface for messenger-core integration
//!
//! # Safety
//!
//! All FFI functions are marked `unsafe` and include safety
//! documentation. Memory allocated by Rust must be freed by Rust via the
//! provided cleanup functions. Everything outside `ffi` is safe code.

// Module declarations
pub mod charset;
pub mod error;
pub mod ffi;
pub mod key;
pub mod keyheader;
pub mod simplifier;
pub mod textutils;
pub mod tokenizer;

// Re-export main types for convenience
pub use error::EngineError;
pub use key::{Key, KeyPair};
pub use keyheader::{EncryptPreference, KeyExchangeHeader};
pub use simplifier::Simplifier;
pub use tokenizer::{MarkupEvent, Tokenizer};
