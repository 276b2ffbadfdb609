//! Cyclic assignment: point `i` goes to partition `i % nb_partitions`.

use std::sync::Arc;

use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::partitioner::{Partitioner, PartitionerBase};

/// Deals points out to partitions in turn.
///
/// Perfectly balanced but with no locality at all; every point's
/// neighbours tend to live elsewhere, so halos are as large as they get.
/// Useful as a stress case for halo exchange.
#[derive(Clone, Debug)]
pub struct RoundRobinPartitioner {
    base: PartitionerBase,
}

impl RoundRobinPartitioner {
    /// Registry name.
    pub const NAME: &'static str = "round_robin";

    /// Bind to `grid` with `nb_partitions` partitions.
    pub fn new(grid: Arc<StructuredGrid>, nb_partitions: usize) -> Result<Self, PartitionError> {
        Ok(Self {
            base: PartitionerBase::new(grid, nb_partitions)?,
        })
    }
}

impl Partitioner for RoundRobinPartitioner {
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
        let n = self.base.nb_partitions();
        for (i, p) in part.iter_mut().enumerate() {
            *p = (i % n) as u32;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    #[test]
    fn deals_in_turn() {
        let grid = Arc::new(StructuredGrid::custom(vec![45.0, -45.0], vec![3, 2]).unwrap());
        let p = RoundRobinPartitioner::new(grid, 2).unwrap();
        let mut part = vec![7; 5];
        p.partition(&mut part).unwrap();
        assert_eq!(part, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn compliance() {
        let grid = Arc::new(StructuredGrid::regular_lonlat(8, 5).unwrap());
        for n in [1, 3, 40] {
            let p = RoundRobinPartitioner::new(grid.clone(), n).unwrap();
            compliance::run_full_compliance(&p);
            compliance::assert_balanced(&p, 1);
        }
    }

    #[test]
    fn surplus_partitions_stay_empty() {
        let grid = Arc::new(StructuredGrid::custom(vec![45.0, -45.0], vec![2, 3]).unwrap());
        for n in [6, 7, 11] {
            let p = RoundRobinPartitioner::new(grid.clone(), n).unwrap();
            compliance::run_full_compliance(&p);
            compliance::assert_surplus_partitions_empty(&p);
        }
    }
}
