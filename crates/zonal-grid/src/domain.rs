//! Longitude domains and the per-band longitude-limits algorithm.

use zonal_core::GridError;

/// Full circle in degrees.
pub const FULL_CIRCLE: f64 = 360.0;

/// Longitudinal extent covered by every latitude band of a grid.
///
/// A periodic domain wraps at `west + 360`, so its last point sits one
/// increment short of the eastern bound. A limited domain includes both
/// endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    west: f64,
    east: f64,
    periodic: bool,
}

impl Domain {
    /// The whole globe, `[0, 360)`.
    pub fn global() -> Self {
        Self::global_from(0.0)
    }

    /// The whole globe starting at `west`, i.e. `[west, west + 360)`.
    pub fn global_from(west: f64) -> Self {
        Self {
            west,
            east: west + FULL_CIRCLE,
            periodic: true,
        }
    }

    /// A limited zonal band `[west, east]` with both endpoints included.
    ///
    /// Fails if the bounds are not finite, not increasing, or span more
    /// than a full circle.
    pub fn zonal_band(west: f64, east: f64) -> Result<Self, GridError> {
        if !west.is_finite() || !east.is_finite() || east <= west || east - west > FULL_CIRCLE
        {
            return Err(GridError::InvalidParameter {
                name: "domain",
                reason: format!("[{west}, {east}] is not a valid zonal band"),
            });
        }
        Ok(Self {
            west,
            east,
            periodic: false,
        })
    }

    /// Western bound in degrees.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Eastern bound in degrees.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Whether the domain wraps around the globe.
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Spacing of `nlon` evenly distributed points over this domain.
    pub fn increment(&self, nlon: usize) -> f64 {
        let span = self.east - self.west;
        if self.periodic {
            span / nlon as f64
        } else if nlon > 1 {
            span / (nlon - 1) as f64
        } else {
            0.0
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::global()
    }
}

/// Per-band longitude bounds derived from a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct LonLimits {
    /// Longitude of the first point of each band.
    pub lonmin: Vec<f64>,
    /// Longitude of the last point of each band.
    pub lonmax: Vec<f64>,
}

/// Compute `lonmin`/`lonmax` for every band so that `pl[i]` evenly spaced
/// points tile `domain` exactly.
///
/// Fails with [`GridError::InvalidPointCount`] if any `pl[i] < 1`.
pub fn lon_limits(pl: &[i64], domain: &Domain) -> Result<LonLimits, GridError> {
    let mut lonmin = Vec::with_capacity(pl.len());
    let mut lonmax = Vec::with_capacity(pl.len());
    for (jlat, &count) in pl.iter().enumerate() {
        if count < 1 {
            return Err(GridError::InvalidPointCount { jlat, count });
        }
        let inc = domain.increment(count as usize);
        lonmin.push(domain.west);
        lonmax.push(domain.west + inc * (count - 1) as f64);
    }
    Ok(LonLimits { lonmin, lonmax })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_domain_excludes_east_bound() {
        let limits = lon_limits(&[4, 8], &Domain::global()).unwrap();
        assert_eq!(limits.lonmin, vec![0.0, 0.0]);
        assert_eq!(limits.lonmax, vec![270.0, 315.0]);
    }

    #[test]
    fn shifted_global_domain() {
        let limits = lon_limits(&[4], &Domain::global_from(45.0)).unwrap();
        assert_eq!(limits.lonmin, vec![45.0]);
        assert_eq!(limits.lonmax, vec![315.0]);
    }

    #[test]
    fn limited_domain_includes_both_ends() {
        let dom = Domain::zonal_band(-10.0, 30.0).unwrap();
        let limits = lon_limits(&[5, 1], &dom).unwrap();
        assert_eq!(limits.lonmin, vec![-10.0, -10.0]);
        assert_eq!(limits.lonmax, vec![30.0, -10.0]);
    }

    #[test]
    fn single_point_band_has_zero_increment() {
        assert_eq!(Domain::zonal_band(0.0, 90.0).unwrap().increment(1), 0.0);
        assert_eq!(Domain::global().increment(1), 360.0);
    }

    #[test]
    fn zero_count_rejected() {
        let err = lon_limits(&[4, 0], &Domain::global()).unwrap_err();
        assert_eq!(err, GridError::InvalidPointCount { jlat: 1, count: 0 });
    }

    #[test]
    fn malformed_band_rejected() {
        assert!(Domain::zonal_band(10.0, 10.0).is_err());
        assert!(Domain::zonal_band(0.0, 400.0).is_err());
        assert!(Domain::zonal_band(f64::NAN, 10.0).is_err());
    }
}
