//! FFI integration tests
//!
//! These tests verify that the FFI functions work correctly and handle
//! memory management properly.

use mail_text_engine::ffi::*;
use std::ptr;
use std::slice;

fn ffi_simplify(
    input: &[u8],
    content_type: Option<&[u8]>,
    is_html: bool,
    result: *mut SimplifyResult,
) -> u32 {
    let (ct_ptr, ct_len) = match content_type {
        Some(ct) => (ct.as_ptr(), ct.len()),
        None => (ptr::null(), 0),
    };
    unsafe {
        simplify_markup(
            input.as_ptr(),
            input.len(),
            ct_ptr,
            ct_len,
            is_html as u8,
            result,
        )
    }
}

fn ffi_result_free(result: *mut SimplifyResult) {
    unsafe { simplify_result_free(result) }
}

fn empty_result() -> SimplifyResult {
    SimplifyResult {
        text: ptr::null_mut(),
        text_len: 0,
        error_code: 0,
        error_message: ptr::null_mut(),
        error_len: 0,
    }
}

fn result_text(result: &SimplifyResult) -> String {
    assert!(!result.text.is_null(), "Result text should not be NULL");
    let bytes = unsafe { slice::from_raw_parts(result.text, result.text_len) };
    String::from_utf8(bytes.to_vec()).expect("Result text should be UTF-8")
}

#[test]
fn test_basic_simplification() {
    let mut result = empty_result();
    let rc = ffi_simplify(b"click <a href=url>here</a>", None, true, &mut result);

    assert_eq!(rc, SIMPLIFY_SUCCESS);
    assert_eq!(result.error_code, SIMPLIFY_SUCCESS);
    assert!(result.error_message.is_null());
    assert_eq!(result_text(&result), "click [here](url)");

    ffi_result_free(&mut result);
    assert!(result.text.is_null(), "Free should null the text pointer");
    assert_eq!(result.text_len, 0);
}

#[test]
fn test_non_markup_mode() {
    let mut result = empty_result();
    let rc = ffi_simplify(b"  a <b>bold</b>  ", None, false, &mut result);

    assert_eq!(rc, SIMPLIFY_SUCCESS);
    assert_eq!(result_text(&result), "a <b>bold</b>");

    ffi_result_free(&mut result);
}

#[test]
fn test_charset_via_content_type() {
    // "café" in ISO-8859-1; 0xE9 is invalid UTF-8
    let mut result = empty_result();
    let rc = ffi_simplify(
        b"caf\xe9",
        Some(b"text/html; charset=ISO-8859-1"),
        true,
        &mut result,
    );

    assert_eq!(rc, SIMPLIFY_SUCCESS);
    assert_eq!(result_text(&result), "caf\u{e9}");

    ffi_result_free(&mut result);
}

#[test]
fn test_empty_input_is_invalid() {
    let mut result = empty_result();
    let rc = ffi_simplify(b"", None, true, &mut result);

    assert_eq!(rc, SIMPLIFY_ERROR_INVALID_INPUT);
    assert_eq!(result.error_code, SIMPLIFY_ERROR_INVALID_INPUT);
    assert!(result.text.is_null(), "Error results carry no text");
    assert!(!result.error_message.is_null(), "Error message expected");

    ffi_result_free(&mut result);
    assert!(result.error_message.is_null());
}

#[test]
fn test_undecodable_input_is_encoding_error() {
    let mut result = empty_result();
    let rc = ffi_simplify(b"\xff\xfe broken", None, true, &mut result);

    assert_eq!(rc, SIMPLIFY_ERROR_ENCODING);
    assert!(result.text.is_null());

    ffi_result_free(&mut result);
}

#[test]
fn test_null_input_with_nonzero_length() {
    let mut result = empty_result();
    let rc = unsafe { simplify_markup(ptr::null(), 8, ptr::null(), 0, 1, &mut result) };

    assert_eq!(rc, SIMPLIFY_ERROR_INVALID_INPUT);

    ffi_result_free(&mut result);
}

#[test]
fn test_null_result_pointer_is_rejected() {
    let rc = unsafe { simplify_markup(b"x".as_ptr(), 1, ptr::null(), 0, 1, ptr::null_mut()) };
    assert_eq!(rc, SIMPLIFY_ERROR_INVALID_INPUT);
}

#[test]
fn test_result_free_is_idempotent() {
    let mut result = empty_result();
    let rc = ffi_simplify(b"some text", None, true, &mut result);
    assert_eq!(rc, SIMPLIFY_SUCCESS);

    ffi_result_free(&mut result);
    ffi_result_free(&mut result);
    assert!(result.text.is_null());
}

#[test]
fn test_result_free_null_is_noop() {
    ffi_result_free(ptr::null_mut());
}

#[test]
fn test_malformed_markup_is_not_an_error() {
    // Malformed markup degrades to best-effort text, never to an error
    let mut result = empty_result();
    let rc = ffi_simplify(b"<a href=url>text</a", None, true, &mut result);

    assert_eq!(rc, SIMPLIFY_SUCCESS);
    assert_eq!(result_text(&result), "[text](url)");

    ffi_result_free(&mut result);
}
