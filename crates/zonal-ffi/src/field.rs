//! Field FFI: creation per numeric kind, typed data access, metadata and
//! halo exchange.
//!
//! Typed data pointers alias the field's storage and stay valid until
//! the field is destroyed. The caller must not touch them while a halo
//! exchange on the same field is in progress.

use std::ffi::c_char;
use std::sync::Mutex;

use zonal_core::DataType;
use zonal_field::{Field, FieldValue};

use crate::function_space::get_function_space;
use crate::handle::{HandleKind, HandleTable};
use crate::status::{ZonalDataType, ZonalStatus};
use crate::util::{read_str, write_out, write_slice, write_text};

/// A field plus the function-space handle it was created from.
struct FieldEntry {
    field: Field,
    function_space: u64,
}

static FIELDS: Mutex<HandleTable<FieldEntry>> =
    Mutex::new(HandleTable::new(HandleKind::Field));

fn create(
    name: *const c_char,
    data_type: DataType,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    if out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    let name = match read_str(name) {
        Some(s) => s,
        None => return ZonalStatus::InvalidArgument as i32,
    };
    let fs = match get_function_space(function_space) {
        Some(fs) => fs,
        None => return ZonalStatus::InvalidHandle as i32,
    };
    let field = match Field::with_data_type(name, data_type, nb_vars, fs) {
        Ok(f) => f,
        Err(e) => return ZonalStatus::from(&e) as i32,
    };
    let inserted = ffi_lock!(FIELDS).insert(FieldEntry {
        field,
        function_space,
    });
    match inserted {
        Some(handle) => write_out(out, handle),
        None => ZonalStatus::InternalError as i32,
    }
}

/// Create a field of the kind named by `data_type` (see [`ZonalDataType`]).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_new(
    name: *const c_char,
    data_type: i32,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        match ZonalDataType::from_raw(data_type) {
            Some(t) => create(name, t.into(), nb_vars, function_space, out),
            None => ZonalStatus::InvalidArgument as i32,
        }
    })
}

/// Create a 32-bit integer field.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_new_int(
    name: *const c_char,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({ create(name, DataType::Int32, nb_vars, function_space, out) })
}

/// Create a single-precision field.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_new_float(
    name: *const c_char,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({ create(name, DataType::Real32, nb_vars, function_space, out) })
}

/// Create a double-precision field.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_new_double(
    name: *const c_char,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({ create(name, DataType::Real64, nb_vars, function_space, out) })
}

/// Create a field whose kind is given by its string tag (`"int32"`,
/// `"real32"` or `"real64"`).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_new_named(
    name: *const c_char,
    data_type: *const c_char,
    nb_vars: usize,
    function_space: u64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        match read_str(data_type).and_then(DataType::from_str_tag) {
            Some(t) => create(name, t, nb_vars, function_space, out),
            None => ZonalStatus::InvalidArgument as i32,
        }
    })
}

/// Destroy a field and its storage.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_destroy(field: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(FIELDS).remove(field) {
            Some(_) => ZonalStatus::Ok as i32,
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Copy the field name into `buf`; see `zonal_partitioner_list` for the
/// buffer protocol.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_name(
    field: u64,
    buf: *mut c_char,
    cap: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(FIELDS);
        match table.get(field) {
            Some(entry) => write_text(entry.field.name(), buf, cap, len_out),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Borrow the data-type string (`"int32"`, `"real32"` or `"real64"`).
///
/// The string is static and null-terminated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_datatype(field: u64, out: *mut *const c_char) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(FIELDS);
        let entry = match table.get(field) {
            Some(e) => e,
            None => return ZonalStatus::InvalidHandle as i32,
        };
        let tag: &'static [u8] = match entry.field.data_type() {
            DataType::Int32 => b"int32\0",
            DataType::Real32 => b"real32\0",
            DataType::Real64 => b"real64\0",
        };
        write_out(out, tag.as_ptr().cast::<c_char>())
    })
}

/// Storage footprint of the field values in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_bytes(field: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        let bytes = match ffi_lock!(FIELDS).get(field) {
            Some(entry) => entry.field.bytes(),
            None => return ZonalStatus::InvalidHandle as i32,
        };
        write_out(out, bytes)
    })
}

/// Values per node.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_nb_vars(field: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(FIELDS);
        match table.get(field) {
            Some(entry) => write_out(out, entry.field.nb_vars()),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// The function-space handle the field was created from.
///
/// The field keeps its layout alive, but the returned handle may have
/// been destroyed since.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_function_space(field: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(FIELDS);
        match table.get(field) {
            Some(entry) => write_out(out, entry.function_space),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Borrow typed data plus its shape.
///
/// `shape_out` must hold at least 2 entries; it receives
/// `[nb_nodes, nb_vars]` and `rank_out` receives 2.
fn data<T: FieldValue>(
    field: u64,
    ptr_out: *mut *mut T,
    shape_out: *mut usize,
    rank_out: *mut usize,
) -> i32 {
    if ptr_out.is_null() || rank_out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    let mut table = ffi_lock!(FIELDS);
    let entry = match table.get_mut(field) {
        Some(e) => e,
        None => return ZonalStatus::InvalidHandle as i32,
    };
    let bounds = entry.field.bounds();
    let shape = match write_slice(shape_out, bounds.len()) {
        Some(s) => s,
        None => return ZonalStatus::InvalidArgument as i32,
    };
    let values = match entry.field.data_mut::<T>() {
        Ok(v) => v,
        Err(e) => return ZonalStatus::from(&e) as i32,
    };
    shape.copy_from_slice(&bounds);
    let status = write_out(ptr_out, values.as_mut_ptr());
    if status != ZonalStatus::Ok as i32 {
        return status;
    }
    write_out(rank_out, bounds.len())
}

/// Borrow 32-bit integer data. Fails with `TypeMismatch` for other kinds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_data_int(
    field: u64,
    ptr_out: *mut *mut i32,
    shape_out: *mut usize,
    rank_out: *mut usize,
) -> i32 {
    ffi_guard!({ data::<i32>(field, ptr_out, shape_out, rank_out) })
}

/// Borrow single-precision data. Fails with `TypeMismatch` for other kinds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_data_float(
    field: u64,
    ptr_out: *mut *mut f32,
    shape_out: *mut usize,
    rank_out: *mut usize,
) -> i32 {
    ffi_guard!({ data::<f32>(field, ptr_out, shape_out, rank_out) })
}

/// Borrow double-precision data. Fails with `TypeMismatch` for other kinds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_data_double(
    field: u64,
    ptr_out: *mut *mut f64,
    shape_out: *mut usize,
    rank_out: *mut usize,
) -> i32 {
    ffi_guard!({ data::<f64>(field, ptr_out, shape_out, rank_out) })
}

/// Refresh the field's halo through its function space.
///
/// The field table stays locked for the whole exchange, so other field
/// calls from any thread wait until it returns. Function spaces built
/// through this interface are serial, which makes the exchange a local
/// copy. A distributed layout would need the field taken out of the
/// table first, since a rank blocked here cannot serve its peers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_halo_exchange(field: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(FIELDS);
        let entry = match table.get_mut(field) {
            Some(e) => e,
            None => return ZonalStatus::InvalidHandle as i32,
        };
        match entry.field.halo_exchange() {
            Ok(()) => ZonalStatus::Ok as i32,
            Err(e) => ZonalStatus::from(&e) as i32,
        }
    })
}

// ── Metadata ────────────────────────────────────────────────────────

fn with_metadata(field: u64, key: *const c_char, f: impl FnOnce(&mut Field, &str) -> i32) -> i32 {
    let key = match read_str(key) {
        Some(k) => k,
        None => return ZonalStatus::InvalidArgument as i32,
    };
    let mut table = ffi_lock!(FIELDS);
    match table.get_mut(field) {
        Some(entry) => f(&mut entry.field, key),
        None => ZonalStatus::InvalidHandle as i32,
    }
}

/// Set an integer metadata entry.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_metadata_set_int(field: u64, key: *const c_char, value: i64) -> i32 {
    ffi_guard!({
        with_metadata(field, key, |f, k| {
            f.metadata_mut().set(k, value);
            ZonalStatus::Ok as i32
        })
    })
}

/// Set a real metadata entry.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_metadata_set_double(
    field: u64,
    key: *const c_char,
    value: f64,
) -> i32 {
    ffi_guard!({
        with_metadata(field, key, |f, k| {
            f.metadata_mut().set(k, value);
            ZonalStatus::Ok as i32
        })
    })
}

/// Read an integer metadata entry; `NotFound` if absent or not an integer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_metadata_get_int(
    field: u64,
    key: *const c_char,
    out: *mut i64,
) -> i32 {
    ffi_guard!({
        with_metadata(field, key, |f, k| match f.metadata().get_int(k) {
            Some(v) => write_out(out, v),
            None => ZonalStatus::NotFound as i32,
        })
    })
}

/// Read a real metadata entry (integers widen); `NotFound` otherwise.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_metadata_get_double(
    field: u64,
    key: *const c_char,
    out: *mut f64,
) -> i32 {
    ffi_guard!({
        with_metadata(field, key, |f, k| match f.metadata().get_real(k) {
            Some(v) => write_out(out, v),
            None => ZonalStatus::NotFound as i32,
        })
    })
}

/// 1 if the metadata has `key`, 0 if not.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_field_metadata_has(field: u64, key: *const c_char, out: *mut i32) -> i32 {
    ffi_guard!({
        with_metadata(field, key, |f, k| {
            write_out(out, i32::from(f.metadata().has(k)))
        })
    })
}
