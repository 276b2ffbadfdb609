//! The [`Partitioner`] trait and the state every strategy shares.

use std::sync::Arc;

use tracing::debug;
use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::distribution::Distribution;

/// A domain-decomposition strategy bound to one grid.
///
/// Implementations must be deterministic: the same grid and partition
/// count always produce the same assignment, in this process or any
/// other. Workers rely on this to agree on point ownership without
/// exchanging the assignment.
///
/// # Object Safety
///
/// This trait is designed for use as `Box<dyn Partitioner>`, which is
/// what [`PartitionerRegistry::build`](crate::PartitionerRegistry::build)
/// returns.
pub trait Partitioner: Send + Sync {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// The grid being partitioned.
    fn grid(&self) -> &Arc<StructuredGrid>;

    /// Number of partitions to produce.
    fn nb_partitions(&self) -> usize;

    /// Write one partition id per grid point into `part`.
    ///
    /// `part.len()` must equal `grid().npts()`. Every written id lies in
    /// `[0, nb_partitions())`. Every partition receives at least one
    /// point when `nb_partitions() <= grid().npts()`; beyond that the
    /// surplus partitions are empty.
    fn partition(&self, part: &mut [u32]) -> Result<(), PartitionError>;

    /// Run [`partition`](Self::partition) once and keep the result.
    ///
    /// Strategies may override this when they can build the distribution
    /// more cheaply.
    fn distribution(&self) -> Result<Distribution, PartitionError> {
        let mut part = vec![0u32; self.grid().npts()];
        self.partition(&mut part)?;
        let dist = Distribution::from_assignment(part, self.nb_partitions())?;
        debug!(
            partitioner = self.name(),
            nb_partitions = dist.nb_partitions(),
            min_pts = dist.min_pts(),
            max_pts = dist.max_pts(),
            "distribution computed"
        );
        Ok(dist)
    }
}

/// Grid binding and partition count shared by the built-in strategies.
#[derive(Clone, Debug)]
pub struct PartitionerBase {
    grid: Arc<StructuredGrid>,
    nb_partitions: usize,
}

impl PartitionerBase {
    /// Bind to `grid` with `nb_partitions` partitions.
    ///
    /// Fails if `nb_partitions` is zero. A count above `grid.npts()` is
    /// accepted and leaves the surplus partitions empty.
    pub fn new(grid: Arc<StructuredGrid>, nb_partitions: usize) -> Result<Self, PartitionError> {
        if nb_partitions == 0 {
            return Err(PartitionError::InvalidPartitionCount {
                nb_partitions,
                npts: grid.npts(),
            });
        }
        Ok(Self {
            grid,
            nb_partitions,
        })
    }

    /// The bound grid.
    pub fn grid(&self) -> &Arc<StructuredGrid> {
        &self.grid
    }

    /// Number of partitions.
    pub fn nb_partitions(&self) -> usize {
        self.nb_partitions
    }

    /// Check that an output buffer has one slot per grid point.
    pub fn check_output(&self, part: &[u32]) -> Result<(), PartitionError> {
        if part.len() != self.grid.npts() {
            return Err(PartitionError::OutputLength {
                expected: self.grid.npts(),
                actual: part.len(),
            });
        }
        Ok(())
    }
}

/// Sizes of `parts` contiguous runs covering `len` items; the first
/// `len % parts` runs are one longer than the rest.
pub(crate) fn block_sizes(len: usize, parts: usize) -> impl Iterator<Item = usize> {
    let base = len / parts;
    let rem = len % parts;
    (0..parts).map(move |p| base + usize::from(p < rem))
}

/// Fill `part[order[i]]` with consecutive block ids starting at `first`,
/// splitting `order` into `parts` balanced runs.
pub(crate) fn assign_blocks(part: &mut [u32], order: &[usize], parts: usize, first: u32) {
    let mut cursor = 0;
    for (block, size) in block_sizes(order.len(), parts).enumerate() {
        for &point in &order[cursor..cursor + size] {
            part[point] = first + block as u32;
        }
        cursor += size;
    }
}
