//! Benchmark profiles and utilities for the Zonal grid framework.
//!
//! - [`reference_grid`]: O32 octahedral grid (5,248 points)
//! - [`stress_grid`]: O160 octahedral grid (~108K points)
//! - [`channel_layouts`]: one [`StructuredColumns`] per in-process rank

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use zonal_core::FieldError;
use zonal_field::{ChannelComm, Communicator, StructuredColumns};
use zonal_grid::StructuredGrid;
use zonal_partition::{Distribution, PartitionerFactory};

/// Octahedral O32 grid.
pub fn reference_grid() -> Arc<StructuredGrid> {
    Arc::new(StructuredGrid::octahedral(32).expect("O32 is a valid grid"))
}

/// Octahedral O160 grid.
pub fn stress_grid() -> Arc<StructuredGrid> {
    Arc::new(StructuredGrid::octahedral(160).expect("O160 is a valid grid"))
}

/// Decompose `grid` with `strategy` into `nb_partitions` parts and build
/// the layout of every rank over a shared channel group.
///
/// Element `r` is rank `r`'s layout; move each into its own thread to
/// exchange.
pub fn channel_layouts(
    grid: &Arc<StructuredGrid>,
    strategy: &str,
    nb_partitions: usize,
) -> Result<Vec<StructuredColumns>, FieldError> {
    let distribution = distribution(grid, strategy, nb_partitions);
    ChannelComm::group(nb_partitions)
        .into_iter()
        .map(|comm| {
            let comm: Arc<dyn Communicator> = Arc::new(comm);
            StructuredColumns::new(grid.clone(), &distribution, comm)
        })
        .collect()
}

/// Distribution of `grid` under a built-in strategy.
///
/// # Panics
///
/// If `strategy` is not registered or `nb_partitions` does not fit the
/// grid. Benchmarks only use fixed, valid inputs.
pub fn distribution(
    grid: &Arc<StructuredGrid>,
    strategy: &str,
    nb_partitions: usize,
) -> Distribution {
    PartitionerFactory::build_with(strategy, grid.clone(), nb_partitions)
        .and_then(|p| p.distribution())
        .expect("benchmark decomposition must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_grid_size() {
        assert_eq!(reference_grid().npts(), 5248);
    }

    #[test]
    fn layouts_cover_grid() {
        let grid = reference_grid();
        let layouts = channel_layouts(&grid, "checkerboard", 4).unwrap();
        assert_eq!(layouts.len(), 4);
        let owned: usize = layouts.iter().map(|l| l.nb_owned()).sum();
        assert_eq!(owned, grid.npts());
        for (rank, l) in layouts.iter().enumerate() {
            assert_eq!(l.partition(), rank);
            assert!(l.nb_halo() > 0);
        }
    }
}
