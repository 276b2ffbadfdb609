//! Structured-grid invariant checks.
//!
//! These functions verify that a grid satisfies the invariants every
//! consumer relies on. Reused across the family and custom-grid tests.

use crate::structured::StructuredGrid;
use indexmap::IndexSet;

/// Assert that `npts == sum(pl)` and every per-band array has `nlat` entries.
pub fn assert_point_count_consistent(grid: &StructuredGrid) {
    let sum: i64 = grid.pl().iter().sum();
    assert_eq!(grid.npts() as i64, sum, "npts != sum(pl)");
    for (what, len) in [
        ("pl", grid.pl().len()),
        ("latitudes", grid.latitudes().len()),
        ("lonmin", grid.lonmin().len()),
        ("lonmax", grid.lonmax().len()),
        ("lon_inc", grid.lon_inc().len()),
    ] {
        assert_eq!(len, grid.nlat(), "{what} has {len} entries, nlat is {}", grid.nlat());
    }
    assert!(grid.pl().iter().all(|&n| n >= 1), "pl contains a count below 1");
}

/// Assert that `reduced()` agrees with the longitude-count extremes.
pub fn assert_reduced_consistent(grid: &StructuredGrid) {
    let min = *grid.pl().iter().min().unwrap() as usize;
    let max = *grid.pl().iter().max().unwrap() as usize;
    assert_eq!(grid.nlonmin(), min);
    assert_eq!(grid.nlonmax(), max);
    assert_eq!(grid.reduced(), min != max);
}

/// Assert that longitudes strictly increase along every band.
pub fn assert_longitudes_increasing(grid: &StructuredGrid) {
    for jlat in 0..grid.nlat() {
        let nlon = grid.nlon(jlat).unwrap();
        for jlon in 1..nlon {
            let prev = grid.lon(jlat, jlon - 1).unwrap();
            let curr = grid.lon(jlat, jlon).unwrap();
            assert!(
                curr > prev,
                "lon({jlat}, {jlon}) = {curr} not greater than lon({jlat}, {}) = {prev}",
                jlon - 1
            );
        }
    }
}

/// Assert that the last point of each band sits at `lonmax`.
pub fn assert_longitudes_reach_lonmax(grid: &StructuredGrid) {
    for jlat in 0..grid.nlat() {
        let last = grid.lon(jlat, grid.nlon(jlat).unwrap() - 1).unwrap();
        let lonmax = grid.lonmax()[jlat];
        assert!(
            (last - lonmax).abs() < 1e-9,
            "band {jlat} ends at {last}, lonmax is {lonmax}"
        );
    }
}

/// Assert that latitudes strictly decrease from north to south.
pub fn assert_latitudes_descending(grid: &StructuredGrid) {
    for w in grid.latitudes().windows(2) {
        assert!(w[0] > w[1], "latitude {} not north of {}", w[0], w[1]);
    }
}

/// Assert that the bulk coordinates match the per-point accessor, in
/// index order, with no duplicate points.
pub fn assert_bulk_lonlats_match(grid: &StructuredGrid) {
    let bulk = grid.lonlats();
    assert_eq!(bulk.len(), grid.npts(), "lonlats() length != npts");
    for (p, &pt) in bulk.iter().enumerate() {
        let (jlat, jlon) = grid.position(p).unwrap();
        assert_eq!(pt, grid.lonlat(jlat, jlon).unwrap(), "point {p} mismatch");
    }
    let unique: IndexSet<_> = bulk.iter().map(|(lon, lat)| (lon.to_bits(), lat.to_bits())).collect();
    assert_eq!(unique.len(), grid.npts(), "lonlats() has duplicates");
}

/// Run every check on a grid.
pub fn run_full_compliance(grid: &StructuredGrid) {
    assert_point_count_consistent(grid);
    assert_reduced_consistent(grid);
    assert_longitudes_increasing(grid);
    assert_longitudes_reach_lonmax(grid);
    assert_latitudes_descending(grid);
    assert_bulk_lonlats_match(grid);
}
