//! Function-space FFI.
//!
//! Only the serial layout is reachable from C: a multi-rank layout needs
//! a communicator, and those live on the Rust side.

use std::sync::{Arc, Mutex};

use zonal_field::{FunctionSpace, StructuredColumns};

use crate::grid::get_grid;
use crate::handle::{HandleKind, HandleTable};
use crate::status::ZonalStatus;
use crate::util::write_out;

static FUNCTION_SPACES: Mutex<HandleTable<Arc<dyn FunctionSpace>>> =
    Mutex::new(HandleTable::new(HandleKind::FunctionSpace));

/// Clone the function space behind a handle.
pub(crate) fn get_function_space(handle: u64) -> Option<Arc<dyn FunctionSpace>> {
    FUNCTION_SPACES.lock().ok()?.get(handle).cloned()
}

/// Single-partition structured-columns layout over `grid`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_structured_columns_new(grid: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return ZonalStatus::InvalidArgument as i32;
        }
        let grid = match get_grid(grid) {
            Some(g) => g,
            None => return ZonalStatus::InvalidHandle as i32,
        };
        let fs = match StructuredColumns::serial(grid) {
            Ok(fs) => fs,
            Err(e) => return ZonalStatus::from(&e) as i32,
        };
        let inserted = ffi_lock!(FUNCTION_SPACES).insert(Arc::new(fs));
        match inserted {
            Some(handle) => write_out(out, handle),
            None => ZonalStatus::InternalError as i32,
        }
    })
}

/// Number of local nodes in a function space.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_function_space_nb_nodes(function_space: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        match get_function_space(function_space) {
            Some(fs) => write_out(out, fs.nb_nodes()),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Release a function-space handle. Fields built on it keep it alive.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_function_space_destroy(function_space: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(FUNCTION_SPACES).remove(function_space) {
            Some(_) => ZonalStatus::Ok as i32,
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{zonal_grid_delete, zonal_grid_octahedral};

    #[test]
    fn serial_layout_covers_grid() {
        let mut grid = 0u64;
        assert_eq!(zonal_grid_octahedral(2, &mut grid), 0);
        let mut fs = 0u64;
        assert_eq!(zonal_structured_columns_new(grid, &mut fs), 0);
        zonal_grid_delete(grid);

        let mut n = 0usize;
        assert_eq!(zonal_function_space_nb_nodes(fs, &mut n), 0);
        assert_eq!(n, 88);
        assert_eq!(zonal_function_space_destroy(fs), 0);
        assert_eq!(
            zonal_function_space_nb_nodes(fs, &mut n),
            ZonalStatus::InvalidHandle as i32
        );
    }
}
