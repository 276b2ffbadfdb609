//! Structured-grid FFI: construction, deletion and read-only queries.
//!
//! Grids are frozen once built and shared as `Arc<StructuredGrid>`, so
//! partitioners and function spaces built from a grid handle keep the
//! grid alive even after `zonal_grid_delete`.

use std::ffi::c_char;
use std::sync::{Arc, Mutex};

use zonal_core::GridError;
use zonal_grid::StructuredGrid;

use crate::handle::{HandleKind, HandleTable};
use crate::status::ZonalStatus;
use crate::util::{read_slice, read_str, write_out};

static GRIDS: Mutex<HandleTable<Arc<StructuredGrid>>> =
    Mutex::new(HandleTable::new(HandleKind::Grid));

/// Clone the grid behind a handle, briefly locking the table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
pub(crate) fn get_grid(handle: u64) -> Option<Arc<StructuredGrid>> {
    GRIDS.lock().ok()?.get(handle).cloned()
}

fn store(result: Result<StructuredGrid, GridError>, out: *mut u64) -> i32 {
    if out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    match result {
        Ok(grid) => {
            let inserted = ffi_lock!(GRIDS).insert(Arc::new(grid));
            match inserted {
                Some(handle) => write_out(out, handle),
                None => ZonalStatus::InternalError as i32,
            }
        }
        Err(e) => ZonalStatus::from(&e) as i32,
    }
}

/// Answer a query against a live grid, writing the result through `out`.
fn query<T>(
    handle: u64,
    out: *mut T,
    f: impl FnOnce(&StructuredGrid) -> Result<T, GridError>,
) -> i32 {
    if out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    let grid = match get_grid(handle) {
        Some(g) => g,
        None => return ZonalStatus::InvalidHandle as i32,
    };
    match f(&grid) {
        Ok(v) => write_out(out, v),
        Err(e) => ZonalStatus::from(&e) as i32,
    }
}

/// Hand out a borrowed array. Both out-pointers are checked before
/// either is written.
fn write_array<T>(values: &[T], ptr_out: *mut *const T, len_out: *mut usize) -> i32 {
    if ptr_out.is_null() || len_out.is_null() {
        return ZonalStatus::InvalidArgument as i32;
    }
    let status = write_out(ptr_out, values.as_ptr());
    if status != ZonalStatus::Ok as i32 {
        return status;
    }
    write_out(len_out, values.len())
}

// ── Construction ────────────────────────────────────────────────────

/// Build a grid from its short name (`"F32"`, `"O32"`, `"L360x181"`,
/// `"S360x180"`).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_from_name(name: *const c_char, out: *mut u64) -> i32 {
    ffi_guard!({
        let name = match read_str(name) {
            Some(s) => s,
            None => return ZonalStatus::InvalidArgument as i32,
        };
        store(StructuredGrid::from_name(name), out)
    })
}

/// Regular gaussian grid `F<n>`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_regular_gaussian(n: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::regular_gaussian(n), out) })
}

/// Octahedral reduced gaussian grid `O<n>`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_octahedral(n: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::octahedral(n), out) })
}

/// Regular lon/lat grid `L<nlon>x<nlat>` with both poles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_regular_lonlat(nlon: usize, nlat: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::regular_lonlat(nlon, nlat), out) })
}

/// Lon/lat grid `S<nlon>x<nlat>`, shifted half a cell in both directions.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_shifted_lonlat(nlon: usize, nlat: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::shifted_lonlat(nlon, nlat), out) })
}

/// Lon/lat grid with poles, shifted half a cell in longitude.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_shifted_lon(nlon: usize, nlat: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::shifted_lon(nlon, nlat), out) })
}

/// Lon/lat grid shifted half a cell in latitude, starting at 0°.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_shifted_lat(nlon: usize, nlat: usize, out: *mut u64) -> i32 {
    ffi_guard!({ store(StructuredGrid::shifted_lat(nlon, nlat), out) })
}

/// Reduced gaussian grid from the `n` northern band sizes, as 32-bit
/// counts. The southern hemisphere mirrors them.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_reduced_gaussian_int(n: usize, pl: *const i32, out: *mut u64) -> i32 {
    ffi_guard!({
        let pl: Vec<i64> = match read_slice(pl, n) {
            Some(p) => p.iter().map(|&c| i64::from(c)).collect(),
            None => return ZonalStatus::InvalidArgument as i32,
        };
        store(StructuredGrid::reduced_gaussian(n, &pl), out)
    })
}

/// Reduced gaussian grid from the `n` northern band sizes, as 64-bit
/// counts.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_reduced_gaussian_long(
    n: usize,
    pl: *const i64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        match read_slice(pl, n) {
            Some(p) => store(StructuredGrid::reduced_gaussian(n, p), out),
            None => ZonalStatus::InvalidArgument as i32,
        }
    })
}

fn custom(
    nlat: usize,
    lats: *const f64,
    pl: Option<Vec<i64>>,
    lonmin: *const f64,
    lonmax: *const f64,
    out: *mut u64,
) -> i32 {
    let (lats, pl) = match (read_slice(lats, nlat), pl) {
        (Some(l), Some(p)) => (l.to_vec(), p),
        _ => return ZonalStatus::InvalidArgument as i32,
    };
    if lonmin.is_null() && lonmax.is_null() {
        return store(StructuredGrid::custom(lats, pl), out);
    }
    match (read_slice(lonmin, nlat), read_slice(lonmax, nlat)) {
        (Some(lo), Some(hi)) if !lonmin.is_null() && !lonmax.is_null() => store(
            StructuredGrid::custom_with_bounds(lats, pl, lo.to_vec(), hi.to_vec()),
            out,
        ),
        _ => ZonalStatus::InvalidArgument as i32,
    }
}

/// Custom grid from `nlat` latitudes and 32-bit per-band counts.
///
/// `lonmin` and `lonmax` are either both null (global bands starting at
/// 0°) or both arrays of `nlat` bounds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_custom_int(
    nlat: usize,
    lats: *const f64,
    pl: *const i32,
    lonmin: *const f64,
    lonmax: *const f64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        let pl = read_slice(pl, nlat).map(|p| p.iter().map(|&n| i64::from(n)).collect());
        custom(nlat, lats, pl, lonmin, lonmax, out)
    })
}

/// Custom grid from `nlat` latitudes and 64-bit per-band counts.
///
/// Bounds follow [`zonal_grid_custom_int`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_custom_long(
    nlat: usize,
    lats: *const f64,
    pl: *const i64,
    lonmin: *const f64,
    lonmax: *const f64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        let pl = read_slice(pl, nlat).map(<[i64]>::to_vec);
        custom(nlat, lats, pl, lonmin, lonmax, out)
    })
}

/// Release a grid handle. Objects built from the grid keep it alive.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_delete(grid: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(GRIDS).remove(grid) {
            Some(_) => ZonalStatus::Ok as i32,
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

// ── Queries ─────────────────────────────────────────────────────────

/// Gaussian number `N`.
#[no_mangle]
#[allow(unsafe_code)]
#[allow(non_snake_case)]
pub extern "C" fn zonal_grid_N(grid: u64, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(g.N())) })
}

/// Number of latitude bands.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_nlat(grid: u64, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(g.nlat())) })
}

/// Number of longitudes in band `jlat`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_nlon(grid: u64, jlat: usize, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| g.nlon(jlat)) })
}

/// Smallest band size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_nlonmin(grid: u64, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(g.nlonmin())) })
}

/// Largest band size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_nlonmax(grid: u64, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(g.nlonmax())) })
}

/// Total number of points.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_npts(grid: u64, out: *mut usize) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(g.npts())) })
}

/// Latitude of band `jlat`, degrees.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_lat(grid: u64, jlat: usize, out: *mut f64) -> i32 {
    ffi_guard!({ query(grid, out, |g| g.lat(jlat)) })
}

/// Longitude of point `(jlat, jlon)`, degrees.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_lon(grid: u64, jlat: usize, jlon: usize, out: *mut f64) -> i32 {
    ffi_guard!({ query(grid, out, |g| g.lon(jlat, jlon)) })
}

/// `[lon, lat]` of point `(jlat, jlon)` into a 2-element array.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_lonlat(
    grid: u64,
    jlat: usize,
    jlon: usize,
    out: *mut [f64; 2],
) -> i32 {
    ffi_guard!({
        query(grid, out, |g| g.lonlat(jlat, jlon).map(|(lon, lat)| [lon, lat]))
    })
}

/// 1 if band sizes vary, 0 if the grid is regular.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_reduced(grid: u64, out: *mut i32) -> i32 {
    ffi_guard!({ query(grid, out, |g| Ok(i32::from(g.reduced()))) })
}

/// Borrow the per-band longitude counts.
///
/// The array stays valid while any handle to the grid, or any object
/// built from it, is alive.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_pl(grid: u64, ptr_out: *mut *const i64, len_out: *mut usize) -> i32 {
    ffi_guard!({
        if len_out.is_null() {
            return ZonalStatus::InvalidArgument as i32;
        }
        match get_grid(grid) {
            Some(g) => write_array(g.pl(), ptr_out, len_out),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}

/// Borrow the band latitudes, north to south.
///
/// Validity as for [`zonal_grid_pl`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn zonal_grid_latitudes(
    grid: u64,
    ptr_out: *mut *const f64,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if len_out.is_null() {
            return ZonalStatus::InvalidArgument as i32;
        }
        match get_grid(grid) {
            Some(g) => write_array(g.latitudes(), ptr_out, len_out),
            None => ZonalStatus::InvalidHandle as i32,
        }
    })
}
