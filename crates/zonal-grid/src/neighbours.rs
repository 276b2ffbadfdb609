//! Point adjacency on a structured grid.
//!
//! Used to derive halo regions: a point's neighbours are its east and
//! west neighbours within the band, plus the two points bracketing its
//! longitude in each adjacent band.

use smallvec::SmallVec;
use zonal_core::GridError;

use crate::domain::FULL_CIRCLE;
use crate::structured::StructuredGrid;

/// Global indices of the points adjacent to a grid point.
///
/// At most 6 entries: 2 in the same band, 2 in each adjacent band.
pub type PointNeighbours = SmallVec<[usize; 8]>;

const PERIODIC_TOLERANCE: f64 = 1e-9;

impl StructuredGrid {
    /// Whether band `jlat` wraps around the globe, i.e. one more increment
    /// past `lonmax` lands back on `lonmin + 360`.
    pub fn is_periodic_band(&self, jlat: usize) -> Result<bool, GridError> {
        let nlon = self.nlon(jlat)?;
        let wrap = self.lonmax()[jlat] + self.lon_inc()[jlat];
        let periodic = (nlon == 1 && self.lon_inc()[jlat] == 0.0)
            || (wrap - (self.lonmin()[jlat] + FULL_CIRCLE)).abs() < PERIODIC_TOLERANCE;
        Ok(periodic)
    }

    /// Neighbours of the point with global index `point`, ascending and
    /// without duplicates. The point itself is never included.
    pub fn neighbours(&self, point: usize) -> Result<PointNeighbours, GridError> {
        let (jlat, jlon) = self.position(point)?;
        let lon = self.lon(jlat, jlon)?;
        let mut out = PointNeighbours::new();

        let nlon = self.nlon(jlat)?;
        if nlon > 1 {
            let periodic = self.is_periodic_band(jlat)?;
            if jlon > 0 {
                out.push(self.index(jlat, jlon - 1)?);
            } else if periodic {
                out.push(self.index(jlat, nlon - 1)?);
            }
            if jlon + 1 < nlon {
                out.push(self.index(jlat, jlon + 1)?);
            } else if periodic {
                out.push(self.index(jlat, 0)?);
            }
        }

        let adjacent = [jlat.checked_sub(1), Some(jlat + 1).filter(|&j| j < self.nlat())];
        for other in adjacent.into_iter().flatten() {
            for jlon_other in self.bracketing(other, lon)? {
                out.push(self.index(other, jlon_other)?);
            }
        }

        out.sort_unstable();
        out.dedup();
        out.retain(|&mut p| p != point);
        Ok(out)
    }

    /// The (up to two) longitude indices of band `jlat` that bracket `lon`.
    fn bracketing(&self, jlat: usize, lon: f64) -> Result<SmallVec<[usize; 2]>, GridError> {
        let nlon = self.nlon(jlat)?;
        let inc = self.lon_inc()[jlat];
        if nlon == 1 || inc == 0.0 {
            return Ok(SmallVec::from_slice(&[0]));
        }
        let offset = lon - self.lonmin()[jlat];
        if self.is_periodic_band(jlat)? {
            let offset = offset.rem_euclid(FULL_CIRCLE);
            let west = (offset / inc).floor() as usize % nlon;
            Ok(SmallVec::from_slice(&[west, (west + 1) % nlon]))
        } else {
            let pos = (offset / inc).floor();
            let last = (nlon - 1) as f64;
            let west = pos.clamp(0.0, last) as usize;
            let east = (pos + 1.0).clamp(0.0, last) as usize;
            Ok(SmallVec::from_slice(&[west, east]))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Domain;
    use crate::structured::StructuredGrid;

    fn reduced_2442() -> StructuredGrid {
        StructuredGrid::custom(vec![67.5, 22.5, -22.5, -67.5], vec![2, 4, 4, 2]).unwrap()
    }

    #[test]
    fn global_bands_are_periodic() {
        let g = reduced_2442();
        for jlat in 0..g.nlat() {
            assert!(g.is_periodic_band(jlat).unwrap());
        }
    }

    #[test]
    fn limited_bands_are_not_periodic() {
        let dom = Domain::zonal_band(0.0, 90.0).unwrap();
        let g = StructuredGrid::custom_in_domain(vec![10.0, 0.0], vec![4, 4], &dom).unwrap();
        assert!(!g.is_periodic_band(0).unwrap());
        // First point of a limited band has no western neighbour.
        assert_eq!(g.neighbours(0).unwrap().as_slice(), &[1, 4, 5]);
    }

    #[test]
    fn neighbours_wrap_within_band() {
        let g = reduced_2442();
        // Point 2 is (1, 0) at lon 0; its west neighbour wraps to (1, 3).
        let n = g.neighbours(2).unwrap();
        assert!(n.contains(&3));
        assert!(n.contains(&5));
    }

    #[test]
    fn neighbours_reach_adjacent_bands() {
        let g = reduced_2442();
        // (1, 1) at lon 90 sits between (0, 0) and (0, 1) to the north,
        // and between (2, 1) and (2, 2) to the south.
        let n = g.neighbours(3).unwrap();
        assert_eq!(n.as_slice(), &[0, 1, 2, 4, 7, 8]);
    }

    #[test]
    fn polar_band_neighbours() {
        let g = reduced_2442();
        // (0, 0): the only other point in its band, plus the bracket in band 1.
        assert_eq!(g.neighbours(0).unwrap().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn neighbours_exclude_self_and_are_sorted() {
        let g = StructuredGrid::octahedral(3).unwrap();
        for p in 0..g.npts() {
            let n = g.neighbours(p).unwrap();
            assert!(!n.contains(&p));
            assert!(n.windows(2).all(|w| w[0] < w[1]));
            assert!(n.len() <= 6);
        }
    }

    #[test]
    fn out_of_range_point_rejected() {
        assert!(reduced_2442().neighbours(12).is_err());
    }
}
