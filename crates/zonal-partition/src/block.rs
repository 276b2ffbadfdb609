//! Contiguous runs of global indices.

use std::sync::Arc;

use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::partitioner::{assign_blocks, Partitioner, PartitionerBase};

/// Splits the global index order into `nb_partitions` contiguous runs.
///
/// Since points are numbered band by band, each partition is a set of
/// whole or partial latitude bands. Run lengths differ by at most one.
#[derive(Clone, Debug)]
pub struct BlockPartitioner {
    base: PartitionerBase,
}

impl BlockPartitioner {
    /// Registry name.
    pub const NAME: &'static str = "block";

    /// Bind to `grid` with `nb_partitions` partitions.
    pub fn new(grid: Arc<StructuredGrid>, nb_partitions: usize) -> Result<Self, PartitionError> {
        Ok(Self {
            base: PartitionerBase::new(grid, nb_partitions)?,
        })
    }
}

impl Partitioner for BlockPartitioner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn grid(&self) -> &Arc<StructuredGrid> {
        self.base.grid()
    }

    fn nb_partitions(&self) -> usize {
        self.base.nb_partitions()
    }

    fn partition(&self, part: &mut [u32]) -> Result<(), PartitionError> {
        self.base.check_output(part)?;
        let order: Vec<usize> = (0..part.len()).collect();
        assign_blocks(part, &order, self.base.nb_partitions(), 0);
        Ok(())
    }
}
