//! Latitude bands crossed with longitude sectors.

use std::sync::Arc;

use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::partitioner::{assign_blocks, block_sizes, Partitioner, PartitionerBase};

/// Splits the grid into `nbands` latitude strips, then each strip into
/// `ncols` longitude sectors, with `nbands * ncols == nb_partitions`.
///
/// `nbands` is the largest divisor of `nb_partitions` not exceeding its
/// square root, so partitions are as close to square as the count allows.
/// A prime count degenerates to one strip of sectors.
///
/// Partition `band * ncols + col` holds sector `col` of strip `band`.
/// Strips are balanced runs of the global index order; sectors are
/// balanced runs of a strip's points ordered by longitude. Partition
/// sizes differ by at most two.
#[derive(Clone, Debug)]
pub struct CheckerboardPartitioner {
    base: PartitionerBase,
    nbands: usize,
    ncols: usize,
}

impl CheckerboardPartitioner {
    /// Registry name.
    pub const NAME: &'static str = "checkerboard";

    /// Bind to `grid` with `nb_partitions` partitions.
    pub fn new(grid: Arc<StructuredGrid>, nb_partitions: usize) -> Result<Self, PartitionError> {
        let base = PartitionerBase::new(grid, nb_partitions)?;
        let nbands = (1..=nb_partitions)
            .take_while(|d| d * d <= nb_partitions)
            .filter(|d| nb_partitions % d == 0)
            .last()
            .unwrap_or(1);
        Ok(Self {
            base,
            nbands,
            ncols: nb_partitions / nbands,
        })
    }

    /// Number of latitude strips.
    pub fn nbands(&self) -> usize {
        self.nbands
    }

    /// Number of longitude sectors per strip.
    pub fn ncols(&self) -> usize {
        self.ncols
    }
}

impl Partitioner for CheckerboardPartitioner {
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
        let lonlats = self.base.grid().lonlats();
        let mut start = 0;
        for (band, size) in block_sizes(part.len(), self.nbands).enumerate() {
            let mut strip: Vec<usize> = (start..start + size).collect();
            strip.sort_by(|&a, &b| lonlats[a].0.total_cmp(&lonlats[b].0));
            assign_blocks(part, &strip, self.ncols, (band * self.ncols) as u32);
            start += size;
        }
        Ok(())
    }
}
