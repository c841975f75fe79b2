//! Character encoding detection and decoding
//!
//! Mail bodies arrive as raw bytes in whatever encoding the sending
//! client chose. This module turns those bytes into UTF-8 text for the
//! simplifier using a three-level cascade:
//!
//! 1. **Content-Type value**: a `charset=` parameter, when the caller has
//!    one from the enclosing MIME part
//! 2. **Markup itself**: a `<meta charset>` or
//!    `<meta http-equiv="Content-Type">` declaration in the first 1024
//!    bytes
//! 3. **UTF-8 default** when both fail
//!
//! UTF-8 input is borrowed without copying; everything else is transcoded
//! with `encoding_rs`.
//!
//! # Examples
//!
//! ```rust
//! use mail_text_engine::charset::detect_charset;
//!
//! let charset = detect_charset(Some("text/html; charset=ISO-8859-1"), b"<html>");
//! assert_eq!(charset, "ISO-8859-1");
//!
//! let charset = detect_charset(None, b"<meta charset=\"UTF-8\">");
//! assert_eq!(charset, "UTF-8");
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::EngineError;

/// Charset assumed when detection fails
const DEFAULT_CHARSET: &str = "UTF-8";

/// Meta declarations must appear within this prefix to be honored
const META_SCAN_LIMIT: usize = 1024;

fn content_type_charset_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()
}

fn meta_charset_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok())
        .as_ref()
}

fn meta_http_equiv_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
        )
        .ok()
    })
    .as_ref()
}

/// Detect the character encoding of a markup buffer
///
/// Runs the detection cascade and returns the charset name normalized to
/// uppercase. Always returns a usable name, defaulting to `UTF-8`.
///
/// # Arguments
///
/// * `content_type` - Optional Content-Type value (e.g. `text/html; charset=UTF-8`)
/// * `input` - Markup bytes to scan for meta declarations
pub fn detect_charset(content_type: Option<&str>, input: &[u8]) -> String {
    if let Some(ct) = content_type
        && let Some(charset) = charset_from_content_type(ct)
    {
        return charset.to_uppercase();
    }
    if let Some(charset) = charset_from_meta(input) {
        return charset.to_uppercase();
    }
    DEFAULT_CHARSET.to_string()
}

/// Extract the `charset=` parameter from a Content-Type value
///
/// Accepts quoted and unquoted parameter values and further parameters
/// after the charset (`text/html; charset=UTF-8; boundary=...`).
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type_charset_regex()?
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a charset declared in the markup's own meta tags
///
/// Understands the HTML5 form (`<meta charset="...">`) and the legacy
/// http-equiv form. Only the first `META_SCAN_LIMIT` bytes are scanned;
/// declarations are expected early in the document.
pub fn charset_from_meta(input: &[u8]) -> Option<String> {
    let scan_limit = std::cmp::min(input.len(), META_SCAN_LIMIT);
    // Lossy conversion is fine for locating an ASCII meta declaration
    let prefix = String::from_utf8_lossy(&input[..scan_limit]);

    if let Some(caps) = meta_charset_regex()?.captures(&prefix)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }
    if let Some(caps) = meta_http_equiv_regex()?.captures(&prefix)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }
    None
}

/// Decode a markup buffer to UTF-8 text using the detection cascade
///
/// UTF-8 input is returned borrowed; other supported encodings are
/// transcoded to an owned string.
///
/// # Errors
///
/// - `EngineError::Encoding` when the detected charset is not supported
///   by `encoding_rs`, or the bytes are invalid for it
pub fn decode_to_utf8<'a>(
    input: &'a [u8],
    content_type: Option<&str>,
) -> Result<Cow<'a, str>, EngineError> {
    let charset = detect_charset(content_type, input);

    if charset.eq_ignore_ascii_case("UTF-8") {
        return std::str::from_utf8(input).map(Cow::Borrowed).map_err(|e| {
            EngineError::Encoding(format!(
                "invalid UTF-8 at byte position {}: {} (detected charset: {})",
                e.valid_up_to(),
                e,
                charset
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        log::debug!("unsupported charset label {:?}", charset);
        EngineError::Encoding(format!("unsupported charset '{}'", charset))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(input)
        .ok_or_else(|| {
            EngineError::Encoding(format!("invalid byte sequence for charset '{}'", charset))
        })
}
