//! The structured grid: latitude bands with their own longitude counts.

use std::fmt;

use tracing::debug;
use zonal_core::{GridError, GridHash};

use crate::domain::{lon_limits, Domain};
use crate::family::GridFamily;

/// A latitude/longitude grid organised as a sequence of latitude bands,
/// each holding `pl[j]` evenly spaced longitude points.
///
/// Every grid family (regular and reduced gaussian, regular and shifted
/// lon/lat, custom) shares this one representation; families differ
/// only in how the per-band arrays are populated. Once constructed, a
/// grid is immutable and safe to share across threads.
///
/// Points are numbered band by band from the northernmost latitude, and
/// west to east within a band. This is the order used by [`lonlats`],
/// [`index`] and every partition assignment.
///
/// Indexed accessors are checked: an out-of-range `jlat` or `jlon`
/// returns [`GridError::IndexOutOfRange`] instead of reading past the
/// per-band arrays.
///
/// [`lonlats`]: StructuredGrid::lonlats
/// [`index`]: StructuredGrid::index
#[derive(Clone, Debug)]
pub struct StructuredGrid {
    family: GridFamily,
    n: usize,
    lat: Vec<f64>,
    pl: Vec<i64>,
    lonmin: Vec<f64>,
    lonmax: Vec<f64>,
    lon_inc: Vec<f64>,
    /// `offsets[j]` is the global index of the first point of band `j`.
    offsets: Vec<usize>,
    nlonmin: usize,
    nlonmax: usize,
    npts: usize,
    hash: GridHash,
}

/// Summary of a grid, suitable for logging or handing across the FFI.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    /// Family the grid was built from.
    pub family: GridFamily,
    /// Short name, if the family has one.
    pub name: Option<String>,
    /// Latitudes per hemisphere.
    pub n: usize,
    /// Number of latitude bands.
    pub nlat: usize,
    /// Total number of points.
    pub npts: usize,
    /// Whether the longitude count varies between bands.
    pub reduced: bool,
    /// Identity hash of the `pl` array.
    pub hash: GridHash,
}

impl StructuredGrid {
    /// Build a custom grid from explicit latitudes and point counts.
    ///
    /// Each band covers the full globe, `[0, 360)`.
    pub fn custom(lats: Vec<f64>, pl: Vec<i64>) -> Result<Self, GridError> {
        let limits = lon_limits(&pl, &Domain::global())?;
        Self::setup(
            GridFamily::Custom,
            lats.len() / 2,
            lats,
            pl,
            limits.lonmin,
            limits.lonmax,
        )
    }

    /// Build a custom grid with explicit per-band longitude bounds.
    ///
    /// `lonmin[j]` and `lonmax[j]` are the first and last longitude of
    /// band `j`; the `pl[j]` points are spread evenly between them.
    pub fn custom_with_bounds(
        lats: Vec<f64>,
        pl: Vec<i64>,
        lonmin: Vec<f64>,
        lonmax: Vec<f64>,
    ) -> Result<Self, GridError> {
        Self::setup(GridFamily::Custom, lats.len() / 2, lats, pl, lonmin, lonmax)
    }

    /// Build a custom grid covering `domain` in every band.
    pub fn custom_in_domain(
        lats: Vec<f64>,
        pl: Vec<i64>,
        domain: &Domain,
    ) -> Result<Self, GridError> {
        let limits = lon_limits(&pl, domain)?;
        Self::setup(
            GridFamily::Custom,
            lats.len() / 2,
            lats,
            pl,
            limits.lonmin,
            limits.lonmax,
        )
    }

    /// Build a custom grid that is symmetric about the equator from its
    /// northern hemisphere only.
    ///
    /// `lats` and `pl` hold the `N` northern bands from the pole towards
    /// the equator; the southern bands are their mirror image.
    pub fn custom_hemisphere(lats: &[f64], pl: &[i64]) -> Result<Self, GridError> {
        Self::setup_hemisphere(GridFamily::Custom, lats, pl)
    }

    /// Mirror one hemisphere and build a global grid from it.
    pub(crate) fn setup_hemisphere(
        family: GridFamily,
        lats: &[f64],
        pl: &[i64],
    ) -> Result<Self, GridError> {
        let n = lats.len();
        if n == 0 {
            return Err(GridError::EmptyGrid);
        }
        if pl.len() != n {
            return Err(GridError::LengthMismatch {
                what: "pl",
                expected: n,
                actual: pl.len(),
            });
        }
        if let Some((jlat, &value)) = lats.iter().enumerate().find(|&(_, &l)| !(l > 0.0)) {
            return Err(GridError::InvalidLatitude {
                jlat,
                value,
                reason: "hemisphere latitudes must lie north of the equator",
            });
        }

        let mut full_lat = Vec::with_capacity(2 * n);
        full_lat.extend_from_slice(lats);
        full_lat.extend(lats.iter().rev().map(|l| -l));

        let mut full_pl = Vec::with_capacity(2 * n);
        full_pl.extend_from_slice(pl);
        full_pl.extend(pl.iter().rev());

        let limits = lon_limits(&full_pl, &Domain::global())?;
        Self::setup(family, n, full_lat, full_pl, limits.lonmin, limits.lonmax)
    }

    /// Validate the per-band arrays and derive the grid totals.
    pub(crate) fn setup(
        family: GridFamily,
        n: usize,
        lat: Vec<f64>,
        pl: Vec<i64>,
        lonmin: Vec<f64>,
        lonmax: Vec<f64>,
    ) -> Result<Self, GridError> {
        let nlat = lat.len();
        if nlat == 0 {
            return Err(GridError::EmptyGrid);
        }
        for (what, len) in [("pl", pl.len()), ("lonmin", lonmin.len()), ("lonmax", lonmax.len())] {
            if len != nlat {
                return Err(GridError::LengthMismatch {
                    what,
                    expected: nlat,
                    actual: len,
                });
            }
        }
        check_latitudes(&lat)?;

        let mut lon_inc = Vec::with_capacity(nlat);
        let mut offsets = Vec::with_capacity(nlat);
        let mut npts = 0usize;
        for jlat in 0..nlat {
            let count = pl[jlat];
            if count < 1 {
                return Err(GridError::InvalidPointCount { jlat, count });
            }
            let (lo, hi) = (lonmin[jlat], lonmax[jlat]);
            let bounds_ok = lo.is_finite() && hi.is_finite() && (hi > lo || (count == 1 && hi >= lo));
            if !bounds_ok {
                return Err(GridError::InvalidLonBounds {
                    jlat,
                    lonmin: lo,
                    lonmax: hi,
                });
            }
            lon_inc.push(if count > 1 {
                (hi - lo) / (count - 1) as f64
            } else {
                0.0
            });
            offsets.push(npts);
            npts = usize::try_from(count)
                .ok()
                .and_then(|c| npts.checked_add(c))
                .ok_or_else(|| GridError::InvalidParameter {
                    name: "pl",
                    reason: format!("total point count overflows at latitude {jlat}"),
                })?;
        }

        // pl is non-empty and every entry is >= 1 at this point.
        let nlonmin = pl.iter().copied().min().unwrap_or(1) as usize;
        let nlonmax = pl.iter().copied().max().unwrap_or(1) as usize;
        let hash = GridHash::from_pl(&pl);

        debug!(
            family = %family,
            nlat,
            npts,
            nlonmin,
            nlonmax,
            hash = %hash,
            "structured grid set up"
        );

        Ok(Self {
            family,
            n,
            lat,
            pl,
            lonmin,
            lonmax,
            lon_inc,
            offsets,
            nlonmin,
            nlonmax,
            npts,
            hash,
        })
    }

    // ── Totals ──────────────────────────────────────────────────

    /// Total number of points.
    pub fn npts(&self) -> usize {
        self.npts
    }

    /// Number of latitude bands.
    pub fn nlat(&self) -> usize {
        self.lat.len()
    }

    /// Number of latitudes in one hemisphere.
    #[allow(non_snake_case)]
    pub fn N(&self) -> usize {
        self.n
    }

    /// Smallest longitude count of any band.
    pub fn nlonmin(&self) -> usize {
        self.nlonmin
    }

    /// Largest longitude count of any band.
    pub fn nlonmax(&self) -> usize {
        self.nlonmax
    }

    /// `true` when the longitude count varies between bands.
    pub fn reduced(&self) -> bool {
        self.nlonmax != self.nlonmin
    }

    // ── Per-band arrays ─────────────────────────────────────────

    /// Longitude count of every band.
    pub fn pl(&self) -> &[i64] {
        &self.pl
    }

    /// Latitude of every band, north to south.
    pub fn latitudes(&self) -> &[f64] {
        &self.lat
    }

    /// First longitude of every band.
    pub fn lonmin(&self) -> &[f64] {
        &self.lonmin
    }

    /// Last longitude of every band.
    pub fn lonmax(&self) -> &[f64] {
        &self.lonmax
    }

    /// Longitude spacing of every band.
    pub fn lon_inc(&self) -> &[f64] {
        &self.lon_inc
    }

    // ── Indexed access ──────────────────────────────────────────

    fn check_jlat(&self, jlat: usize) -> Result<(), GridError> {
        if jlat < self.lat.len() {
            Ok(())
        } else {
            Err(GridError::IndexOutOfRange {
                what: "jlat",
                index: jlat,
                len: self.lat.len(),
            })
        }
    }

    fn check_jlon(&self, jlat: usize, jlon: usize) -> Result<(), GridError> {
        self.check_jlat(jlat)?;
        let len = self.pl[jlat] as usize;
        if jlon < len {
            Ok(())
        } else {
            Err(GridError::IndexOutOfRange {
                what: "jlon",
                index: jlon,
                len,
            })
        }
    }

    /// Longitude count of band `jlat`.
    pub fn nlon(&self, jlat: usize) -> Result<usize, GridError> {
        self.check_jlat(jlat)?;
        Ok(self.pl[jlat] as usize)
    }

    /// Latitude of band `jlat`.
    pub fn lat(&self, jlat: usize) -> Result<f64, GridError> {
        self.check_jlat(jlat)?;
        Ok(self.lat[jlat])
    }

    /// Longitude of point `jlon` in band `jlat`:
    /// `lonmin[jlat] + jlon * lon_inc[jlat]`.
    pub fn lon(&self, jlat: usize, jlon: usize) -> Result<f64, GridError> {
        self.check_jlon(jlat, jlon)?;
        Ok(self.lon_unchecked(jlat, jlon))
    }

    #[inline]
    fn lon_unchecked(&self, jlat: usize, jlon: usize) -> f64 {
        self.lonmin[jlat] + jlon as f64 * self.lon_inc[jlat]
    }

    /// `(lon, lat)` of point `jlon` in band `jlat`.
    pub fn lonlat(&self, jlat: usize, jlon: usize) -> Result<(f64, f64), GridError> {
        self.check_jlon(jlat, jlon)?;
        Ok((self.lon_unchecked(jlat, jlon), self.lat[jlat]))
    }

    /// Global index of point `jlon` in band `jlat`.
    pub fn index(&self, jlat: usize, jlon: usize) -> Result<usize, GridError> {
        self.check_jlon(jlat, jlon)?;
        Ok(self.offsets[jlat] + jlon)
    }

    /// `(jlat, jlon)` of the point with global index `point`.
    pub fn position(&self, point: usize) -> Result<(usize, usize), GridError> {
        if point >= self.npts {
            return Err(GridError::IndexOutOfRange {
                what: "point",
                index: point,
                len: self.npts,
            });
        }
        // Last band whose first point is <= `point`.
        let jlat = self.offsets.partition_point(|&o| o <= point) - 1;
        Ok((jlat, point - self.offsets[jlat]))
    }

    /// Global index of the first point of every band.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    // ── Bulk coordinates ────────────────────────────────────────

    /// `(lon, lat)` of every point, in global index order.
    pub fn lonlats(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::with_capacity(self.npts);
        for jlat in 0..self.nlat() {
            let lat = self.lat[jlat];
            for jlon in 0..self.pl[jlat] as usize {
                out.push((self.lon_unchecked(jlat, jlon), lat));
            }
        }
        out
    }

    /// Write interleaved `lon, lat` pairs into `buf`, returning the number
    /// of values written.
    ///
    /// Stops early (at a whole point) if `buf` is shorter than `2 * npts`.
    pub fn copy_lonlats(&self, buf: &mut [f64]) -> usize {
        let mut written = 0;
        for (chunk, (lon, lat)) in buf.chunks_exact_mut(2).zip(self.lonlats()) {
            chunk[0] = lon;
            chunk[1] = lat;
            written += 2;
        }
        written
    }

    // ── Identity ────────────────────────────────────────────────

    /// Family this grid was built from.
    pub fn family(&self) -> &GridFamily {
        &self.family
    }

    /// Short name (e.g. `"O32"`), if the family has one.
    pub fn name(&self) -> Option<String> {
        self.family.short_name()
    }

    /// Identity hash of the `pl` array.
    pub fn hash(&self) -> GridHash {
        self.hash
    }

    /// Name of the mesh generator best suited to this grid.
    ///
    /// Pure metadata for downstream meshing; nothing in this crate reads it.
    pub fn optimal_mesh_generator(&self) -> &'static str {
        "Structured"
    }

    /// Summary of this grid.
    pub fn spec(&self) -> GridSpec {
        GridSpec {
            family: self.family.clone(),
            name: self.name(),
            n: self.n,
            nlat: self.nlat(),
            npts: self.npts,
            reduced: self.reduced(),
            hash: self.hash,
        }
    }
}

impl fmt::Display for StructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structured(family:{},N:{},nlat:{},npts:{})",
            self.family,
            self.n,
            self.nlat(),
            self.npts
        )
    }
}

/// Latitudes must be finite, within `[-90, 90]`, and strictly decreasing.
fn check_latitudes(lat: &[f64]) -> Result<(), GridError> {
    for (jlat, &value) in lat.iter().enumerate() {
        if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
            return Err(GridError::InvalidLatitude {
                jlat,
                value,
                reason: "must be a finite value in [-90, 90]",
            });
        }
        if jlat > 0 && value >= lat[jlat - 1] {
            return Err(GridError::InvalidLatitude {
                jlat,
                value,
                reason: "latitudes must decrease from north to south",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn reduced_2442() -> StructuredGrid {
        StructuredGrid::custom(vec![67.5, 22.5, -22.5, -67.5], vec![2, 4, 4, 2]).unwrap()
    }

    // ── Totals ──────────────────────────────────────────────────

    #[test]
    fn totals_of_reduced_grid() {
        let g = reduced_2442();
        assert_eq!(g.nlat(), 4);
        assert_eq!(g.npts(), 12);
        assert_eq!(g.nlonmin(), 2);
        assert_eq!(g.nlonmax(), 4);
        assert!(g.reduced());
        assert_eq!(g.N(), 2);
    }

    #[test]
    fn regular_grid_is_not_reduced() {
        let g = StructuredGrid::custom(vec![45.0, -45.0], vec![8, 8]).unwrap();
        assert!(!g.reduced());
        assert_eq!(g.nlonmin(), g.nlonmax());
    }

    // ── Longitudes ──────────────────────────────────────────────

    #[test]
    fn default_bounds_cover_the_globe() {
        let g = reduced_2442();
        assert_eq!(g.lon(0, 0).unwrap(), 0.0);
        assert_eq!(g.lon(0, 1).unwrap(), 180.0);
        assert_eq!(g.lon(1, 3).unwrap(), 270.0);
        assert_eq!(g.lonlat(2, 1).unwrap(), (90.0, -22.5));
    }

    #[test]
    fn explicit_bounds_set_increment() {
        let g = StructuredGrid::custom_with_bounds(
            vec![10.0, 0.0],
            vec![5, 1],
            vec![-20.0, 7.0],
            vec![20.0, 7.0],
        )
        .unwrap();
        assert_eq!(g.lon_inc(), &[10.0, 0.0]);
        assert_eq!(g.lon(0, 4).unwrap(), 20.0);
        assert_eq!(g.lon(1, 0).unwrap(), 7.0);
    }

    #[test]
    fn limited_domain_grid() {
        let dom = Domain::zonal_band(0.0, 40.0).unwrap();
        let g = StructuredGrid::custom_in_domain(vec![5.0, -5.0], vec![5, 3], &dom).unwrap();
        assert_eq!(g.lon(0, 4).unwrap(), 40.0);
        assert_eq!(g.lon(1, 2).unwrap(), 40.0);
    }

    // ── Hemisphere setup ────────────────────────────────────────

    #[test]
    fn hemisphere_mirrors_latitudes_and_counts() {
        let g = StructuredGrid::custom_hemisphere(&[60.0, 20.0], &[3, 6]).unwrap();
        assert_eq!(g.nlat(), 4);
        assert_eq!(g.N(), 2);
        assert_eq!(g.latitudes(), &[60.0, 20.0, -20.0, -60.0]);
        assert_eq!(g.pl(), &[3, 6, 6, 3]);
        assert_eq!(g.npts(), 18);
    }

    #[test]
    fn hemisphere_rejects_southern_latitudes() {
        let err = StructuredGrid::custom_hemisphere(&[60.0, -20.0], &[3, 6]).unwrap_err();
        assert!(matches!(err, GridError::InvalidLatitude { jlat: 1, .. }));
    }

    #[test]
    fn hemisphere_rejects_mismatched_pl() {
        let err = StructuredGrid::custom_hemisphere(&[60.0, 20.0], &[3]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                what: "pl",
                expected: 2,
                actual: 1
            }
        );
    }

    // ── Invariant violations ────────────────────────────────────

    #[test]
    fn empty_grid_rejected() {
        assert_eq!(
            StructuredGrid::custom(vec![], vec![]).unwrap_err(),
            GridError::EmptyGrid
        );
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = StructuredGrid::custom(vec![10.0, 0.0], vec![4]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                what: "pl",
                expected: 2,
                actual: 1
            }
        );
        let err = StructuredGrid::custom_with_bounds(
            vec![10.0, 0.0],
            vec![4, 4],
            vec![0.0],
            vec![270.0, 270.0],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::LengthMismatch { what: "lonmin", .. }));
    }

    #[test]
    fn non_positive_count_rejected() {
        let err = StructuredGrid::custom_with_bounds(
            vec![10.0, 0.0],
            vec![4, 0],
            vec![0.0, 0.0],
            vec![270.0, 270.0],
        )
        .unwrap_err();
        assert_eq!(err, GridError::InvalidPointCount { jlat: 1, count: 0 });
    }

    #[test]
    fn overflowing_point_total_rejected() {
        let err = StructuredGrid::custom(vec![10.0, 0.0, -10.0], vec![i64::MAX; 3]).unwrap_err();
        assert!(matches!(err, GridError::InvalidParameter { name: "pl", .. }));
    }

    #[test]
    fn malformed_bounds_rejected() {
        let err = StructuredGrid::custom_with_bounds(
            vec![10.0],
            vec![4],
            vec![90.0],
            vec![10.0],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidLonBounds { jlat: 0, .. }));
    }

    #[test]
    fn unordered_latitudes_rejected() {
        let err = StructuredGrid::custom(vec![0.0, 10.0], vec![4, 4]).unwrap_err();
        assert!(matches!(err, GridError::InvalidLatitude { jlat: 1, .. }));
        let err = StructuredGrid::custom(vec![95.0], vec![4]).unwrap_err();
        assert!(matches!(err, GridError::InvalidLatitude { jlat: 0, .. }));
    }

    // ── Checked indexing ────────────────────────────────────────

    #[test]
    fn out_of_range_jlat_is_reported() {
        let g = reduced_2442();
        let expected = GridError::IndexOutOfRange {
            what: "jlat",
            index: 4,
            len: 4,
        };
        assert_eq!(g.nlon(4).unwrap_err(), expected);
        assert_eq!(g.lat(4).unwrap_err(), expected);
        assert_eq!(g.lon(4, 0).unwrap_err(), expected);
    }

    #[test]
    fn out_of_range_jlon_is_reported() {
        let g = reduced_2442();
        assert_eq!(
            g.lonlat(0, 2).unwrap_err(),
            GridError::IndexOutOfRange {
                what: "jlon",
                index: 2,
                len: 2
            }
        );
        // jlon 2 is valid in the wider band.
        assert!(g.lonlat(1, 2).is_ok());
    }

    #[test]
    fn index_and_position_are_inverse() {
        let g = reduced_2442();
        assert_eq!(g.index(0, 1).unwrap(), 1);
        assert_eq!(g.index(1, 0).unwrap(), 2);
        assert_eq!(g.index(3, 1).unwrap(), 11);
        for p in 0..g.npts() {
            let (jlat, jlon) = g.position(p).unwrap();
            assert_eq!(g.index(jlat, jlon).unwrap(), p);
        }
        assert!(g.position(12).is_err());
    }

    // ── Bulk coordinates ────────────────────────────────────────

    #[test]
    fn bulk_lonlats_follow_index_order() {
        let g = reduced_2442();
        let pts = g.lonlats();
        assert_eq!(pts.len(), 12);
        assert_eq!(pts[0], (0.0, 67.5));
        assert_eq!(pts[1], (180.0, 67.5));
        assert_eq!(pts[2], (0.0, 22.5));
        assert_eq!(pts[11], (180.0, -67.5));
    }

    #[test]
    fn copy_lonlats_stops_at_buffer_end() {
        let g = reduced_2442();
        let mut full = vec![0.0; 24];
        assert_eq!(g.copy_lonlats(&mut full), 24);
        assert_eq!(&full[2..4], &[180.0, 67.5]);
        let mut short = vec![0.0; 5];
        assert_eq!(g.copy_lonlats(&mut short), 4);
    }

    // ── Identity ────────────────────────────────────────────────

    #[test]
    fn hash_depends_only_on_pl() {
        let a = StructuredGrid::custom(vec![60.0, 0.0, -60.0], vec![4, 8, 4]).unwrap();
        let b = StructuredGrid::custom_with_bounds(
            vec![50.0, 10.0, -70.0],
            vec![4, 8, 4],
            vec![10.0, 10.0, 10.0],
            vec![100.0, 100.0, 100.0],
        )
        .unwrap();
        let c = StructuredGrid::custom(vec![60.0, 0.0, -60.0], vec![4, 6, 4]).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn display_and_spec() {
        let g = reduced_2442();
        assert_eq!(g.to_string(), "Structured(family:custom,N:2,nlat:4,npts:12)");
        let spec = g.spec();
        assert_eq!(spec.npts, 12);
        assert!(spec.reduced);
        assert_eq!(spec.name, None);
        assert_eq!(g.optimal_mesh_generator(), "Structured");
    }

    #[test]
    fn compliance_reduced() {
        compliance::run_full_compliance(&reduced_2442());
    }

    // ── Properties ──────────────────────────────────────────────

    fn arb_grid() -> impl Strategy<Value = StructuredGrid> {
        prop::collection::vec(1i64..64, 1..24).prop_map(|pl| {
            let nlat = pl.len();
            let lats = (0..nlat)
                .map(|j| 89.0 - 178.0 * j as f64 / nlat as f64)
                .collect();
            StructuredGrid::custom(lats, pl).unwrap()
        })
    }

    proptest! {
        #[test]
        fn npts_is_sum_of_pl(g in arb_grid()) {
            prop_assert_eq!(g.npts() as i64, g.pl().iter().sum::<i64>());
            prop_assert_eq!(g.pl().len(), g.nlat());
        }

        #[test]
        fn reduced_iff_counts_differ(g in arb_grid()) {
            prop_assert_eq!(g.reduced(), g.nlonmax() != g.nlonmin());
        }

        #[test]
        fn full_compliance(g in arb_grid()) {
            compliance::run_full_compliance(&g);
        }
    }
}
