//! Error types for engine operations

use std::fmt;

/// Errors that can occur at the engine's fallible boundaries
///
/// The simplifier itself never fails: malformed markup is recovered
/// best-effort and the only caller-visible outcome is the shape of the
/// returned text. Errors exist only at the byte/charset boundary, the
/// key-exchange header parser, and base64 decoding.
#[derive(Debug)]
pub enum EngineError {
    /// Character encoding error (unsupported charset, undecodable bytes)
    Encoding(String),
    /// Invalid input data (empty buffer, null pointer at the FFI boundary)
    InvalidInput(String),
    /// Key-exchange header line rejected
    HeaderSyntax(String),
    /// Base64 payload could not be decoded
    Base64(String),
    /// Internal error
    Internal(String),
}

impl EngineError {
    /// Get numeric error code for FFI
    pub fn code(&self) -> u32 {
        match self {
            EngineError::Encoding(_) => 1,
            EngineError::InvalidInput(_) => 2,
            EngineError::HeaderSyntax(_) => 3,
            EngineError::Base64(_) => 4,
            EngineError::Internal(_) => 99,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::HeaderSyntax(msg) => write!(f, "Header syntax error: {}", msg),
            EngineError::Base64(msg) => write!(f, "Base64 error: {}", msg),
            EngineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
