//! C FFI bindings for the Zonal grid framework.
//!
//! Every core object crosses the boundary as an opaque `u64` handle into
//! a generation-checked table, so a destroyed or forged handle, or one
//! issued for another kind of object, yields [`ZonalStatus::InvalidHandle`]
//! rather than undefined behaviour. Every
//! entry point returns an `i32` status (0 on success, negative on error)
//! and writes results through caller-supplied out-pointers.
//!
//! Pointers handed back to the caller (grid arrays, field data) alias
//! internal storage. They stay valid until the owning handle is destroyed
//! and must never be freed by the caller.
//!
//! This is the only crate in the workspace that contains `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a caught panic into `ZonalStatus::Panicked`.
///
/// `return` inside the body returns from the guarded closure, so early
/// exits with a status code work as in an ordinary function.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(_) => {
                ::tracing::error!("panic caught at the C boundary");
                $crate::status::ZonalStatus::Panicked as i32
            }
        }
    };
}

/// Lock a table mutex, returning `ZonalStatus::InternalError` from the
/// enclosing body if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::ZonalStatus::InternalError as i32,
        }
    };
}

pub mod field;
pub mod function_space;
pub mod grid;
pub(crate) mod handle;
pub mod partitioner;
pub mod status;
pub(crate) mod util;

pub use status::{ZonalDataType, ZonalStatus};
