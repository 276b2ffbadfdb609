//! Zonal: structured latitude/longitude grids, domain decomposition and
//! halo-exchanged fields.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Zonal sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use zonal::prelude::*;
//!
//! let grid = Arc::new(StructuredGrid::from_name("O16").unwrap());
//! assert_eq!(grid.nlat(), 32);
//!
//! let partitioner = PartitionerFactory::build_with("checkerboard", grid.clone(), 1).unwrap();
//! let distribution = partitioner.distribution().unwrap();
//! assert_eq!(distribution.nb_pts(), &[grid.npts()]);
//!
//! let fs: Arc<dyn FunctionSpace> = Arc::new(StructuredColumns::serial(grid.clone()).unwrap());
//! let mut field = Field::new_real64("temperature", 2, fs).unwrap();
//! field.data_mut::<f64>().unwrap()[0] = 273.15;
//! field.halo_exchange().unwrap();
//! assert_eq!(field.bounds().as_slice(), &[grid.npts(), 2]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `zonal-core` | Data types, grid hashes, error enums |
//! | [`grid`] | `zonal-grid` | Structured grids, families, gaussian latitudes |
//! | [`partition`] | `zonal-partition` | Partitioners, registry, distributions |
//! | [`field`] | `zonal-field` | Fields, function spaces, halo transport |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary (`zonal-core`).
pub use zonal_core as types;

/// Structured grids (`zonal-grid`).
///
/// [`grid::StructuredGrid`] is the single grid representation; the
/// family constructors and [`grid::StructuredGrid::from_name`] build it.
pub use zonal_grid as grid;

/// Domain decomposition (`zonal-partition`).
pub use zonal_partition as partition;

/// Field storage and halo exchange (`zonal-field`).
///
/// Multi-rank layouts need a [`field::Communicator`]; in-process ranks
/// can use [`field::ChannelComm::group`].
pub use zonal_field as field;

/// Common imports for typical Zonal usage.
pub mod prelude {
    // Core
    pub use zonal_core::{DataType, GridHash};

    // Errors
    pub use zonal_core::{CommError, FieldError, GridError, PartitionError};

    // Grid
    pub use zonal_grid::{Domain, GridFamily, StructuredGrid};

    // Partitioning
    pub use zonal_partition::{
        DecompositionConfig, Distribution, Partitioner, PartitionerFactory, PartitionerRegistry,
    };

    // Fields
    pub use zonal_field::{
        ChannelComm, Communicator, Field, FieldValue, FunctionSpace, Metadata, StructuredColumns,
    };
}
