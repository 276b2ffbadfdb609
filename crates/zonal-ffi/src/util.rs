//! Pointer helpers shared by the entry points.

use std::ffi::{c_char, CStr};

use crate::status::ZonalStatus;

/// Write `value` through `out`.
///
/// Returns `InvalidArgument` for a null pointer.
#[allow(unsafe_code)]
pub(crate) fn write_out<T>(out: *mut T, value: T) -> i32 {
    if out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    // SAFETY: out is non-null; the caller guarantees it is aligned and
    // points to writable storage for one T.
    unsafe { out.write(value) };
    ZonalStatus::Ok as i32
}

/// Borrow a caller array of `len` elements. A null pointer is only
/// accepted when `len == 0`.
#[allow(unsafe_code)]
pub(crate) fn read_slice<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: ptr is non-null; the caller guarantees it points to `len`
    // initialised elements that outlive this call.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Borrow a caller buffer of `len` elements for writing.
#[allow(unsafe_code)]
pub(crate) fn write_slice<'a, T>(ptr: *mut T, len: usize) -> Option<&'a mut [T]> {
    if len == 0 {
        return Some(&mut []);
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: ptr is non-null; the caller guarantees it points to `len`
    // writable elements not aliased elsewhere during this call.
    Some(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
}

/// Read a null-terminated UTF-8 string.
#[allow(unsafe_code)]
pub(crate) fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: ptr is non-null; the caller guarantees a valid
    // null-terminated string that outlives this call.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Copy `text` plus a null terminator into `buf`, reporting the text
/// length (without terminator) through `len_out` either way.
///
/// Returns `BufferTooSmall` if `cap` cannot hold the text and terminator;
/// `buf` may be null to query the length.
pub(crate) fn write_text(text: &str, buf: *mut c_char, cap: usize, len_out: *mut usize) -> i32 {
    if !len_out.is_null() {
        let status = write_out(len_out, text.len());
        if status != ZonalStatus::Ok as i32 {
            return status;
        }
    }
    if buf.is_null() || cap <= text.len() {
        return ZonalStatus::BufferTooSmall as i32;
    }
    let Some(dst) = write_slice(buf.cast::<u8>(), text.len() + 1) else {
        return ZonalStatus::InvalidArgument as i32;
    };
    dst[..text.len()].copy_from_slice(text.as_bytes());
    dst[text.len()] = 0;
    ZonalStatus::Ok as i32
}
