//! Canonical fixture grids.
//!
//! - [`reduced_2442`]: 4 bands with 2, 4, 4, 2 points (12 total), the
//!   smallest grid with reduced polar bands.
//! - [`octahedral`]: an `O<n>` grid.
//! - [`regular_lonlat`]: an `L<nlon>x<nlat>` grid with poles.

use std::sync::Arc;

use zonal_grid::StructuredGrid;

/// Latitudes of [`reduced_2442`], north to south.
pub const REDUCED_2442_LATS: [f64; 4] = [67.5, 22.5, -22.5, -67.5];

/// Points per band of [`reduced_2442`].
pub const REDUCED_2442_PL: [i64; 4] = [2, 4, 4, 2];

/// The 2-4-4-2 custom grid.
pub fn reduced_2442() -> StructuredGrid {
    StructuredGrid::custom(REDUCED_2442_LATS.to_vec(), REDUCED_2442_PL.to_vec())
        .expect("fixture grid is valid")
}

/// Octahedral grid `O<n>`.
pub fn octahedral(n: usize) -> StructuredGrid {
    StructuredGrid::octahedral(n).expect("octahedral fixture")
}

/// Regular lon/lat grid with both poles.
pub fn regular_lonlat(nlon: usize, nlat: usize) -> StructuredGrid {
    StructuredGrid::regular_lonlat(nlon, nlat).expect("lonlat fixture")
}

/// Wrap a fixture for sharing with partitioners and function spaces.
pub fn shared(grid: StructuredGrid) -> Arc<StructuredGrid> {
    Arc::new(grid)
}
