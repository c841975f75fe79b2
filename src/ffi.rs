//! FFI (Foreign Function Interface) layer for C integration
//!
//! This module exposes the simplifier to a C messenger core. The caller
//! hands in a markup buffer and receives an owned plain-text string it
//! must release through the paired free function.
//!
//! # FFI Boundary Contract
//!
//! **All strings are UTF-8 bytes + length (NOT NUL-terminated C strings).**
//! Every string field is a pointer plus a `_len` field carrying the exact
//! byte count; no NUL terminator is appended and C code must never call
//! `strlen()` on these buffers.
//!
//! ## Memory Management
//!
//! - Rust allocates all output memory (`Box<[u8]>`)
//! - C receives raw pointers but does not own the allocator state
//! - C must call `simplify_result_free()` exactly once per result
//! - After the free call all pointers in the result are NULL
//!
//! ## Error Handling
//!
//! Success: `error_code == 0`, `error_message == NULL`, `text` valid.
//! Failure: `error_code != 0`, `error_message` describes the failure,
//! `text` is NULL. Note that malformed markup is NOT a failure: the
//! simplifier recovers best-effort, and errors arise only from the
//! boundary itself (NULL or empty input, undecodable charsets).
//!
//! ## Panic Safety
//!
//! Every entry point wraps its body in `catch_unwind`; a panic becomes
//! `SIMPLIFY_ERROR_INTERNAL` and never crosses into C.
//!
//! ## Thread Safety
//!
//! The simplifier holds no mutable state, so concurrent calls from
//! multiple threads are safe as long as each call owns its result struct.
//!
//! # Example Usage (C)
//!
//! ```c
//! simplify_result_t result;
//! uint32_t rc = simplify_markup((const uint8_t*)html, strlen(html),
//!                               NULL, 0, 1, &result);
//! if (rc == SIMPLIFY_SUCCESS) {
//!     fwrite(result.text, 1, result.text_len, stdout);
//! }
//! simplify_result_free(&result);
//! ```

use std::panic;
use std::ptr;
use std::slice;

use crate::error::EngineError;
use crate::simplifier::Simplifier;

// ============================================================================
// Error Code Constants
// ============================================================================

/// Success - no error occurred
pub const SIMPLIFY_SUCCESS: u32 = 0;

/// Character encoding error (unsupported charset, undecodable bytes)
pub const SIMPLIFY_ERROR_ENCODING: u32 = 1;

/// Invalid input data (NULL pointers, empty buffer)
pub const SIMPLIFY_ERROR_INVALID_INPUT: u32 = 2;

/// Internal error (unexpected condition, panic caught)
pub const SIMPLIFY_ERROR_INTERNAL: u32 = 99;

// ============================================================================
// FFI Data Structures
// ============================================================================

/// Result of a simplify call, filled in by Rust
///
/// `#[repr(C)]` for a stable layout across the boundary. String fields
/// follow the bytes + length pattern described in the module docs.
#[repr(C)]
pub struct SimplifyResult {
    /// Simplified plain text (UTF-8 bytes, NOT NUL-terminated)
    pub text: *mut u8,
    /// Length of `text` in bytes
    pub text_len: usize,
    /// Error code (0 on success)
    pub error_code: u32,
    /// Error description (UTF-8 bytes, NULL on success)
    pub error_message: *mut u8,
    /// Length of `error_message` in bytes
    pub error_len: usize,
}

fn reset_result(result: &mut SimplifyResult) {
    result.text = ptr::null_mut();
    result.text_len = 0;
    result.error_code = SIMPLIFY_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn set_error_result(result: &mut SimplifyResult, error_code: u32, error_message: String) {
    let error_bytes = error_message.into_bytes().into_boxed_slice();
    result.error_code = error_code;
    result.error_len = error_bytes.len();
    result.error_message = Box::into_raw(error_bytes) as *mut u8;
}

fn set_success_result(result: &mut SimplifyResult, text: String) {
    let text_bytes = text.into_bytes().into_boxed_slice();
    result.text_len = text_bytes.len();
    result.text = Box::into_raw(text_bytes) as *mut u8;
    result.error_code = SIMPLIFY_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn required_bytes<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a [u8], EngineError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(EngineError::InvalidInput(format!(
            "{name}_len > 0 with NULL {name} pointer"
        )));
    }
    // SAFETY: Pointer validated as non-NULL above; the caller guarantees
    // `len` readable bytes for the duration of this call.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

fn optional_utf8<'a>(ptr: *const u8, len: usize, name: &str) -> Result<Option<&'a str>, EngineError> {
    if ptr.is_null() || len == 0 {
        return Ok(None);
    }
    // SAFETY: Pointer is non-NULL and the caller guarantees `len`
    // readable bytes.
    let bytes = unsafe { slice::from_raw_parts(ptr, len) };
    Ok(std::str::from_utf8(bytes).ok())
}

fn simplify_inner(
    input: *const u8,
    input_len: usize,
    content_type: *const u8,
    content_type_len: usize,
    is_html: u8,
) -> Result<String, EngineError> {
    let input = required_bytes(input, input_len, "input")?;
    let content_type = optional_utf8(content_type, content_type_len, "content_type")?;
    Simplifier::new().simplify_bytes(input, content_type, is_html != 0)
}

// ============================================================================
// FFI Entry Points
// ============================================================================

/// Simplify a markup buffer to plain text
///
/// # Arguments
///
/// - `input` / `input_len`: the markup bytes; must be non-empty
/// - `content_type` / `content_type_len`: optional Content-Type value
///   for charset detection; pass NULL / 0 when unavailable
/// - `is_html`: non-zero to interpret markup, zero for
///   whitespace-collapse-only mode
/// - `result`: out-parameter filled in by this call
///
/// # Returns
///
/// The error code, additionally stored in `result.error_code`.
///
/// # Safety
///
/// - `result` must be a valid, writable pointer
/// - `input` must point to `input_len` readable bytes (when non-NULL)
/// - `content_type` must point to `content_type_len` readable bytes
///   (when non-NULL)
/// - The filled result must be released with [`simplify_result_free`]
///   exactly once
#[unsafe(no_mangle)]
pub unsafe extern "C" fn simplify_markup(
    input: *const u8,
    input_len: usize,
    content_type: *const u8,
    content_type_len: usize,
    is_html: u8,
    result: *mut SimplifyResult,
) -> u32 {
    if result.is_null() {
        return SIMPLIFY_ERROR_INVALID_INPUT;
    }
    // SAFETY: `result` was checked as non-NULL; the caller guarantees it
    // is valid and writable.
    let result = unsafe { &mut *result };
    reset_result(result);

    let outcome = panic::catch_unwind(|| {
        simplify_inner(input, input_len, content_type, content_type_len, is_html)
    });

    match outcome {
        Ok(Ok(text)) => {
            set_success_result(result, text);
            SIMPLIFY_SUCCESS
        }
        Ok(Err(error)) => {
            let code = error.code();
            set_error_result(result, code, error.to_string());
            code
        }
        Err(_) => {
            set_error_result(
                result,
                SIMPLIFY_ERROR_INTERNAL,
                "panic during simplification".to_string(),
            );
            SIMPLIFY_ERROR_INTERNAL
        }
    }
}

fn free_buffer(ptr_field: &mut *mut u8, len_field: &mut usize) {
    if !ptr_field.is_null() {
        // SAFETY: The pointer/length pair was produced by Box::into_raw
        // of a boxed slice in this module and has not been freed yet.
        unsafe {
            drop(Box::from_raw(slice::from_raw_parts_mut(
                *ptr_field, *len_field,
            )));
        }
        *ptr_field = ptr::null_mut();
        *len_field = 0;
    }
}

/// Free the buffers inside a [`SimplifyResult`]
///
/// Idempotent: pointers are nulled after release, so a second call on
/// the same struct is a no-op. Passing NULL is a no-op.
///
/// # Safety
///
/// `result` must be NULL or point to a result previously filled by
/// [`simplify_markup`] and not freed through any other channel.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn simplify_result_free(result: *mut SimplifyResult) {
    if result.is_null() {
        return;
    }
    // SAFETY: `result` was checked as non-NULL; the caller guarantees it
    // points to a result this module filled in.
    let result = unsafe { &mut *result };
    free_buffer(&mut result.text, &mut result.text_len);
    free_buffer(&mut result.error_message, &mut result.error_len);
    result.error_code = SIMPLIFY_SUCCESS;
}
