//! JSON field encoder
//!
//! Every function appends to a caller-owned buffer and never reads back what
//! is already there except for the last byte, which decides whether a field
//! separator is needed. The functions are pure and deterministic, so the same
//! fields always encode to the same bytes; the context snapshot relies on this.

use serde::Serialize;
use std::io::Write;

/// Initial capacity of a freshly encoded context snapshot.
pub const CONTEXT_CAPACITY: usize = 500;

#[inline]
pub fn append_begin_marker(dst: &mut Vec<u8>) {
    dst.push(b'{');
}

#[inline]
pub fn append_end_marker(dst: &mut Vec<u8>) {
    dst.push(b'}');
}

#[inline]
pub fn append_line_break(dst: &mut Vec<u8>) {
    dst.push(b'\n');
}

/// Append `"key":`, preceded by a comma when `dst` already holds a field.
pub fn append_key(dst: &mut Vec<u8>, key: &str) {
    if needs_separator(dst) {
        dst.push(b',');
    }
    append_string(dst, key);
    dst.push(b':');
}

/// Append a quoted, JSON-escaped string.
pub fn append_string(dst: &mut Vec<u8>, s: &str) {
    // Writing a str into a Vec cannot fail.
    let _ = serde_json::to_writer(&mut *dst, s);
}

pub fn append_int(dst: &mut Vec<u8>, value: i64) {
    let _ = write!(dst, "{}", value);
}

pub fn append_uint(dst: &mut Vec<u8>, value: u64) {
    let _ = write!(dst, "{}", value);
}

/// Append a float. NaN and infinities have no JSON number form and are
/// written as strings.
pub fn append_float(dst: &mut Vec<u8>, value: f64) {
    if value.is_nan() {
        append_string(dst, "NaN");
    } else if value.is_infinite() {
        append_string(dst, if value > 0.0 { "+Inf" } else { "-Inf" });
    } else {
        let _ = serde_json::to_writer(&mut *dst, &value);
    }
}

pub fn append_bool(dst: &mut Vec<u8>, value: bool) {
    dst.extend_from_slice(if value { b"true" } else { b"false" });
}

pub fn append_null(dst: &mut Vec<u8>) {
    dst.extend_from_slice(b"null");
}

/// Append any serializable value as JSON.
///
/// On failure nothing is written and the serializer error is returned.
pub fn append_json<T: Serialize + ?Sized>(
    dst: &mut Vec<u8>,
    value: &T,
) -> Result<(), serde_json::Error> {
    let encoded = serde_json::to_vec(value)?;
    dst.extend_from_slice(&encoded);
    Ok(())
}

/// Append already-encoded object fields held in `src` to `dst`.
///
/// A leading `{` in `src` is dropped, and a comma is inserted when `dst`
/// already holds fields. An empty `src` leaves `dst` untouched.
pub fn append_object_data(dst: &mut Vec<u8>, src: &[u8]) {
    let src = src.strip_prefix(b"{").unwrap_or(src);
    if src.is_empty() {
        return;
    }
    if needs_separator(dst) {
        dst.push(b',');
    }
    dst.extend_from_slice(src);
}

#[inline]
fn needs_separator(dst: &[u8]) -> bool {
    matches!(dst.last(), Some(&last) if last != b'{')
}
