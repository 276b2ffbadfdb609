//! Canonical grid families and their short names.
//!
//! | Name        | Family                                   |
//! |-------------|------------------------------------------|
//! | `F<N>`      | regular gaussian, `2N` x `4N`            |
//! | `O<N>`      | octahedral reduced gaussian              |
//! | `L<X>x<Y>`  | regular lon/lat including the poles      |
//! | `S<X>x<Y>`  | lon/lat shifted by half a cell both ways |

use std::fmt;

use zonal_core::GridError;

use crate::domain::{lon_limits, Domain, FULL_CIRCLE};
use crate::gaussian::gaussian_latitudes;
use crate::structured::StructuredGrid;

/// The family a [`StructuredGrid`] was built from.
///
/// All families populate the same per-band representation; the variant
/// only records which recipe was used.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridFamily {
    /// Gaussian latitudes with `4N` longitudes in every band.
    RegularGaussian {
        /// Latitudes per hemisphere.
        n: usize,
    },
    /// Gaussian latitudes with caller-chosen longitude counts.
    ReducedGaussian {
        /// Latitudes per hemisphere.
        n: usize,
    },
    /// Reduced gaussian with `20 + 4j` longitudes in northern band `j`.
    Octahedral {
        /// Latitudes per hemisphere.
        n: usize,
    },
    /// Equally spaced latitudes from pole to pole.
    RegularLonLat {
        /// Longitudes per band.
        nlon: usize,
        /// Number of bands.
        nlat: usize,
    },
    /// Lon/lat grid shifted half a cell in both directions.
    ShiftedLonLat {
        /// Longitudes per band.
        nlon: usize,
        /// Number of bands.
        nlat: usize,
    },
    /// Lon/lat grid shifted half a cell in longitude only.
    ShiftedLon {
        /// Longitudes per band.
        nlon: usize,
        /// Number of bands.
        nlat: usize,
    },
    /// Lon/lat grid shifted half a cell in latitude only.
    ShiftedLat {
        /// Longitudes per band.
        nlon: usize,
        /// Number of bands.
        nlat: usize,
    },
    /// Built from explicit per-band arrays.
    Custom,
}

impl GridFamily {
    /// Short name understood by [`StructuredGrid::from_name`], if any.
    pub fn short_name(&self) -> Option<String> {
        match self {
            Self::RegularGaussian { n } => Some(format!("F{n}")),
            Self::Octahedral { n } => Some(format!("O{n}")),
            Self::RegularLonLat { nlon, nlat } => Some(format!("L{nlon}x{nlat}")),
            Self::ShiftedLonLat { nlon, nlat } => Some(format!("S{nlon}x{nlat}")),
            Self::ReducedGaussian { .. }
            | Self::ShiftedLon { .. }
            | Self::ShiftedLat { .. }
            | Self::Custom => None,
        }
    }
}

impl fmt::Display for GridFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegularGaussian { .. } => f.write_str("regular_gaussian"),
            Self::ReducedGaussian { .. } => f.write_str("reduced_gaussian"),
            Self::Octahedral { .. } => f.write_str("octahedral"),
            Self::RegularLonLat { .. } => f.write_str("regular_lonlat"),
            Self::ShiftedLonLat { .. } => f.write_str("shifted_lonlat"),
            Self::ShiftedLon { .. } => f.write_str("shifted_lon"),
            Self::ShiftedLat { .. } => f.write_str("shifted_lat"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

fn positive(name: &'static str, value: usize) -> Result<(), GridError> {
    if value == 0 {
        return Err(GridError::InvalidParameter {
            name,
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

/// Lon/lat construction shared by the regular and shifted variants.
fn lonlat_grid(
    family: GridFamily,
    nlon: usize,
    nlat: usize,
    shift_lon: bool,
    shift_lat: bool,
) -> Result<StructuredGrid, GridError> {
    positive("nlon", nlon)?;
    positive("nlat", nlat)?;
    let lats: Vec<f64> = if shift_lat {
        let dlat = 180.0 / nlat as f64;
        (0..nlat).map(|j| 90.0 - (j as f64 + 0.5) * dlat).collect()
    } else {
        if nlat < 2 {
            return Err(GridError::InvalidParameter {
                name: "nlat",
                reason: "a pole-to-pole grid needs at least 2 latitudes".into(),
            });
        }
        let dlat = 180.0 / (nlat - 1) as f64;
        (0..nlat).map(|j| 90.0 - j as f64 * dlat).collect()
    };
    let west = if shift_lon {
        0.5 * FULL_CIRCLE / nlon as f64
    } else {
        0.0
    };
    let pl = vec![nlon as i64; nlat];
    let limits = lon_limits(&pl, &Domain::global_from(west))?;
    StructuredGrid::setup(family, nlat / 2, lats, pl, limits.lonmin, limits.lonmax)
}

impl StructuredGrid {
    /// Regular gaussian grid: `2N` gaussian latitudes, `4N` longitudes each.
    pub fn regular_gaussian(n: usize) -> Result<Self, GridError> {
        let lats = gaussian_latitudes(n)?;
        let pl = vec![4 * n as i64; n];
        Self::setup_hemisphere(GridFamily::RegularGaussian { n }, &lats, &pl)
    }

    /// Reduced gaussian grid from the northern-hemisphere longitude counts.
    pub fn reduced_gaussian(n: usize, pl: &[i64]) -> Result<Self, GridError> {
        let lats = gaussian_latitudes(n)?;
        Self::setup_hemisphere(GridFamily::ReducedGaussian { n }, &lats, pl)
    }

    /// Octahedral reduced gaussian grid: `20 + 4j` longitudes in northern
    /// band `j`.
    pub fn octahedral(n: usize) -> Result<Self, GridError> {
        let lats = gaussian_latitudes(n)?;
        let pl: Vec<i64> = (0..n as i64).map(|j| 20 + 4 * j).collect();
        Self::setup_hemisphere(GridFamily::Octahedral { n }, &lats, &pl)
    }

    /// Regular lon/lat grid with both poles included.
    pub fn regular_lonlat(nlon: usize, nlat: usize) -> Result<Self, GridError> {
        lonlat_grid(GridFamily::RegularLonLat { nlon, nlat }, nlon, nlat, false, false)
    }

    /// Lon/lat grid shifted half a cell in longitude and latitude.
    pub fn shifted_lonlat(nlon: usize, nlat: usize) -> Result<Self, GridError> {
        lonlat_grid(GridFamily::ShiftedLonLat { nlon, nlat }, nlon, nlat, true, true)
    }

    /// Lon/lat grid shifted half a cell in longitude only.
    pub fn shifted_lon(nlon: usize, nlat: usize) -> Result<Self, GridError> {
        lonlat_grid(GridFamily::ShiftedLon { nlon, nlat }, nlon, nlat, true, false)
    }

    /// Lon/lat grid shifted half a cell in latitude only.
    pub fn shifted_lat(nlon: usize, nlat: usize) -> Result<Self, GridError> {
        lonlat_grid(GridFamily::ShiftedLat { nlon, nlat }, nlon, nlat, false, true)
    }

    /// Build a grid from its short name, e.g. `"O32"` or `"L360x181"`.
    pub fn from_name(name: &str) -> Result<Self, GridError> {
        let unknown = || GridError::UnknownName {
            name: name.to_string(),
        };
        let mut chars = name.chars();
        let prefix = chars.next().ok_or_else(unknown)?;
        let rest = chars.as_str();
        match prefix {
            'F' | 'O' => {
                let n: usize = rest.parse().map_err(|_| unknown())?;
                if prefix == 'F' {
                    Self::regular_gaussian(n)
                } else {
                    Self::octahedral(n)
                }
            }
            'L' | 'S' => {
                let (x, y) = rest.split_once('x').ok_or_else(unknown)?;
                let nlon: usize = x.parse().map_err(|_| unknown())?;
                let nlat: usize = y.parse().map_err(|_| unknown())?;
                if prefix == 'L' {
                    Self::regular_lonlat(nlon, nlat)
                } else {
                    Self::shifted_lonlat(nlon, nlat)
                }
            }
            _ => Err(unknown()),
        }
    }
}
