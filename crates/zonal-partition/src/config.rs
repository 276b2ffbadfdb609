//! Decomposition configuration.

use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::registry::PartitionerFactory;

/// Environment variable holding the ambient worker count.
pub const WORKERS_ENV: &str = "ZONAL_NB_WORKERS";

/// Number of workers taking part in the decomposition.
///
/// Read from [`WORKERS_ENV`]; unset, unparsable or zero values resolve
/// to 1 (a serial run).
pub fn nb_workers() -> usize {
    std::env::var(WORKERS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

// ── DecompositionConfig ─────────────────────────────────────────────

/// Which partitioner to use and how many partitions to make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompositionConfig {
    /// Registry name of the strategy. Default: [`Self::DEFAULT_PARTITIONER`].
    pub partitioner: String,
    /// Partition count. `None` = [`nb_workers()`].
    pub nb_partitions: Option<usize>,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            partitioner: Self::DEFAULT_PARTITIONER.to_string(),
            nb_partitions: None,
        }
    }
}

impl DecompositionConfig {
    /// Strategy used when none is configured.
    pub const DEFAULT_PARTITIONER: &'static str = "checkerboard";

    /// Config for a named strategy with an explicit partition count.
    pub fn new(partitioner: impl Into<String>, nb_partitions: usize) -> Self {
        Self {
            partitioner: partitioner.into(),
            nb_partitions: Some(nb_partitions),
        }
    }

    /// Resolve the partition count, falling back to [`nb_workers()`].
    pub fn resolved_nb_partitions(&self) -> usize {
        self.nb_partitions.unwrap_or_else(nb_workers)
    }

    /// Check that the strategy exists and the count is positive.
    ///
    /// Counts above `grid.npts()` are valid; the surplus partitions stay
    /// empty.
    pub fn validate(&self, grid: &StructuredGrid) -> Result<(), PartitionError> {
        if !PartitionerFactory::has(&self.partitioner) {
            return Err(PartitionError::UnknownStrategy {
                name: self.partitioner.clone(),
                available: PartitionerFactory::list(),
            });
        }
        let nb_partitions = self.resolved_nb_partitions();
        if nb_partitions == 0 {
            return Err(PartitionError::InvalidPartitionCount {
                nb_partitions,
                npts: grid.npts(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> StructuredGrid {
        StructuredGrid::custom(vec![45.0, -45.0], vec![4, 4]).unwrap()
    }

    #[test]
    fn default_uses_checkerboard() {
        let cfg = DecompositionConfig::default();
        assert_eq!(cfg.partitioner, "checkerboard");
        assert!(cfg.nb_partitions.is_none());
        assert!(cfg.resolved_nb_partitions() >= 1);
    }

    #[test]
    fn explicit_count_wins() {
        assert_eq!(DecompositionConfig::new("block", 5).resolved_nb_partitions(), 5);
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(DecompositionConfig::new("round_robin", 8).validate(&grid()).is_ok());
    }

    #[test]
    fn validate_unknown_strategy_fails() {
        let err = DecompositionConfig::new("metis", 2).validate(&grid()).unwrap_err();
        match err {
            PartitionError::UnknownStrategy { name, available } => {
                assert_eq!(name, "metis");
                assert!(available.contains(&"block".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_zero_partitions_fails() {
        assert_eq!(
            DecompositionConfig::new("block", 0).validate(&grid()),
            Err(PartitionError::InvalidPartitionCount {
                nb_partitions: 0,
                npts: 8
            })
        );
    }

    #[test]
    fn validate_more_partitions_than_points_succeeds() {
        assert!(DecompositionConfig::new("block", 9).validate(&grid()).is_ok());
    }
}
