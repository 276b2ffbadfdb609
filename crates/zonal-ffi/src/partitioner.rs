//! Partitioner FFI: build by name, query the registry, run a partition.

use std::ffi::c_char;
use std::sync::Mutex;

use zonal_partition::{Partitioner, PartitionerFactory};

use crate::grid::get_grid;
use crate::handle::{HandleKind, HandleTable};
use crate::status::ZonalStatus;
use crate::util::{read_str, write_out, write_slice, write_text};

static PARTITIONERS: Mutex<HandleTable<Box<dyn Partitioner>>> =
    Mutex::new(HandleTable::new(HandleKind::Partitioner));

fn build(name: *const c_char, grid: u64, nb_partitions: Option<usize>, out: *mut u64) -> i32 {
    if out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    let name = match read_str(name) {
        Some(s) => s,
        None => return ZonalStatus::InvalidArgument as i32,
    };
    let grid = match get_grid(grid) {
        Some(g) => g,
        None => return ZonalStatus::InvalidHandle as i32,
    };
    let built = match nb_partitions {
        Some(n) => PartitionerFactory::build_with(name, grid, n),
        None => PartitionerFactory::build(name, grid),
    };
    match built {
        Ok(p) => {
            let inserted = ffi_lock!(PARTITIONERS).insert(p);
            match inserted {
                Some(handle) => write_out(out, handle),
                None => ZonalStatus::InternalError as i32,
            }
        }
        Err(e) => ZonalStatus::from(&e) as i32,
    }
}

/// Build partitioner `name` over `grid`, one partition per worker
/// (`ZONAL_NB_WORKERS`, default 1).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_build(name: *const c_char, grid: u64, out: *mut u64) -> i32 {
    ffi_guard!({ build(name, grid, None, out) })
}

/// Build partitioner `name` over `grid` with `nb_partitions` partitions.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_build_with(
    name: *const c_char,
    grid: u64,
    nb_partitions: usize,
    out: *mut u64,
) -> i32 {
    ffi_guard!({ build(name, grid, Some(nb_partitions), out) })
}

/// 1 if a partitioner is registered under `name`, 0 if not.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_has(name: *const c_char, out: *mut i32) -> i32 {
    ffi_guard!({
        match read_str(name) {
            Some(s) => write_out(out, i32::from(PartitionerFactory::has(s))),
            None => ZonalStatus::InvalidArgument as i32,
        }
    })
}

/// Registered names, separated by `\n`, into `buf` (null-terminated).
///
/// `len_out` receives the text length without terminator, even when the
/// buffer is too small; pass a null `buf` to query it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_list(buf: *mut c_char, cap: usize, len_out: *mut usize) -> i32 {
    ffi_guard!({ write_text(&PartitionerFactory::list().join("\n"), buf, cap, len_out) })
}

/// Number of partitions a partitioner produces.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_nb_partitions(partitioner: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        let table = ffi_lock!(PARTITIONERS);
        match table.get(partitioner) {
            Some(p) => write_out(out, p.nb_partitions()),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Write one partition id per grid point into `part[0..len]`.
///
/// `len` must equal the grid's point count.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_partition(partitioner: u64, part: *mut u32, len: usize) -> i32 {
    ffi_guard!({
        let out = match write_slice(part, len) {
            Some(s) => s,
            None => return ZonalStatus::InvalidArgument as i32,
        };
        let table = ffi_lock!(PARTITIONERS);
        let p = match table.get(partitioner) {
            Some(p) => p,
            None => return ZonalStatus::InvalidHandle as i32,
        };
        match p.partition(out) {
            Ok(()) => ZonalStatus::Ok as i32,
            Err(e) => ZonalStatus::from(&e) as i32,
        }
    })
}

/// Destroy a partitioner.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_partitioner_destroy(partitioner: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(PARTITIONERS).remove(partitioner) {
            Some(_) => ZonalStatus::Ok as i32,
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}
