//! Balanced random assignment with a grid-derived seed.

use std::sync::Arc;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::partitioner::{assign_blocks, Partitioner, PartitionerBase};

/// Scatters points over partitions at random, keeping sizes balanced.
///
/// Starts from the [`block`](crate::BlockPartitioner) assignment and
/// shuffles it with a ChaCha8 stream seeded from the grid hash and the
/// partition count. ChaCha8 output is fixed across platforms and
/// releases, so every worker derives the same assignment.
#[derive(Clone, Debug)]
pub struct ShuffledPartitioner {
    base: PartitionerBase,
}

impl ShuffledPartitioner {
    /// Registry name.
    pub const NAME: &'static str = "shuffled";

    /// Bind to `grid` with `nb_partitions` partitions.
    pub fn new(grid: Arc<StructuredGrid>, nb_partitions: usize) -> Result<Self, PartitionError> {
        Ok(Self {
            base: PartitionerBase::new(grid, nb_partitions)?,
        })
    }

    /// Seed of the shuffle for this grid and partition count.
    pub fn seed(&self) -> u64 {
        self.base.grid().hash().value() ^ (self.base.nb_partitions() as u64).rotate_left(32)
    }
}

impl Partitioner for ShuffledPartitioner {
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

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed());
        for i in (1..part.len()).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            part.swap(i, j);
        }
        Ok(())
    }
}
