//! Structured latitude/longitude grids for Zonal.
//!
//! A [`StructuredGrid`] describes the globe as a sequence of latitude
//! bands, each carrying its own number of evenly spaced longitude
//! points. Regular grids have the same count in every band; reduced
//! grids thin the bands out towards the poles.
//!
//! # Families
//!
//! - [`StructuredGrid::regular_gaussian`], [`StructuredGrid::reduced_gaussian`],
//!   [`StructuredGrid::octahedral`]: gaussian latitudes, mirrored from one hemisphere
//! - [`StructuredGrid::regular_lonlat`] and the shifted variants
//! - [`StructuredGrid::custom`] and friends: explicit per-band arrays
//!
//! All of them share one representation and one set of invariants; see
//! [`GridFamily`] for the recipes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod family;
pub mod gaussian;
pub mod neighbours;
pub mod structured;

#[cfg(test)]
pub(crate) mod compliance;

pub use domain::{lon_limits, Domain, LonLimits};
pub use family::GridFamily;
pub use gaussian::gaussian_latitudes;
pub use neighbours::PointNeighbours;
pub use structured::{GridSpec, StructuredGrid};
