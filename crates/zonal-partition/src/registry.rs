//! Name-keyed partitioner lookup.
//!
//! A [`PartitionerRegistry`] is an ordered table of `(name, builder)`
//! pairs. [`PartitionerFactory`] wraps a process-wide registry of the
//! built-in strategies, filled once on first use from a static table.
//! Callers that need their own strategies build a registry explicitly
//! with [`PartitionerRegistry::builtin`] and [`PartitionerRegistry::register`].

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use tracing::{debug, warn};
use zonal_core::PartitionError;
use zonal_grid::StructuredGrid;

use crate::block::BlockPartitioner;
use crate::checkerboard::CheckerboardPartitioner;
use crate::config::{nb_workers, DecompositionConfig};
use crate::partitioner::Partitioner;
use crate::round_robin::RoundRobinPartitioner;
use crate::shuffled::ShuffledPartitioner;

/// Constructor for a registered strategy.
pub type PartitionerBuilder =
    fn(Arc<StructuredGrid>, usize) -> Result<Box<dyn Partitioner>, PartitionError>;

fn build_block(grid: Arc<StructuredGrid>, n: usize) -> Result<Box<dyn Partitioner>, PartitionError> {
    Ok(Box::new(BlockPartitioner::new(grid, n)?))
}

fn build_checkerboard(
    grid: Arc<StructuredGrid>,
    n: usize,
) -> Result<Box<dyn Partitioner>, PartitionError> {
    Ok(Box::new(CheckerboardPartitioner::new(grid, n)?))
}

fn build_round_robin(
    grid: Arc<StructuredGrid>,
    n: usize,
) -> Result<Box<dyn Partitioner>, PartitionError> {
    Ok(Box::new(RoundRobinPartitioner::new(grid, n)?))
}

fn build_shuffled(grid: Arc<StructuredGrid>, n: usize) -> Result<Box<dyn Partitioner>, PartitionError> {
    Ok(Box::new(ShuffledPartitioner::new(grid, n)?))
}

/// Built-in strategies, in the order [`PartitionerFactory::list`] reports them.
const BUILTIN: [(&str, PartitionerBuilder); 4] = [
    (BlockPartitioner::NAME, build_block),
    (CheckerboardPartitioner::NAME, build_checkerboard),
    (RoundRobinPartitioner::NAME, build_round_robin),
    (ShuffledPartitioner::NAME, build_shuffled),
];

// ── PartitionerRegistry ─────────────────────────────────────────────

/// Ordered table of partitioner builders keyed by name.
#[derive(Clone, Debug, Default)]
pub struct PartitionerRegistry {
    builders: IndexMap<String, PartitionerBuilder>,
}

impl PartitionerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in strategies, in table order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, builder) in BUILTIN {
            registry.builders.insert(name.to_string(), builder);
        }
        registry
    }

    /// Add a strategy. Names are unique; re-registering one is an error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        builder: PartitionerBuilder,
    ) -> Result<(), PartitionError> {
        let name = name.into();
        if self.builders.contains_key(&name) {
            return Err(PartitionError::DuplicateStrategy { name });
        }
        self.builders.insert(name, builder);
        Ok(())
    }

    /// Whether a strategy is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.builders.keys().cloned().collect()
    }

    /// Instantiate the strategy registered under `name`.
    pub fn build(
        &self,
        name: &str,
        grid: Arc<StructuredGrid>,
        nb_partitions: usize,
    ) -> Result<Box<dyn Partitioner>, PartitionError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| PartitionError::UnknownStrategy {
                name: name.to_string(),
                available: self.list(),
            })?;
        let partitioner = builder(grid, nb_partitions)?;
        debug!(
            partitioner = name,
            nb_partitions,
            grid = %partitioner.grid(),
            "partitioner built"
        );
        Ok(partitioner)
    }
}

// ── PartitionerFactory ──────────────────────────────────────────────

static BUILTIN_REGISTRY: OnceLock<PartitionerRegistry> = OnceLock::new();

/// Process-wide lookup of the built-in strategies.
///
/// The registry is built from a static table the first time any method
/// is called; there is no load-time registration.
pub struct PartitionerFactory;

impl PartitionerFactory {
    /// The shared registry.
    pub fn registry() -> &'static PartitionerRegistry {
        BUILTIN_REGISTRY.get_or_init(PartitionerRegistry::builtin)
    }

    /// Whether a strategy is registered under `name`.
    pub fn has(name: &str) -> bool {
        Self::registry().has(name)
    }

    /// Registered names, in registration order.
    pub fn list() -> Vec<String> {
        Self::registry().list()
    }

    /// Build `name` with one partition per worker (see [`nb_workers`]).
    pub fn build(
        name: &str,
        grid: Arc<StructuredGrid>,
    ) -> Result<Box<dyn Partitioner>, PartitionError> {
        Self::build_with(name, grid, nb_workers())
    }

    /// Build `name` with an explicit partition count.
    pub fn build_with(
        name: &str,
        grid: Arc<StructuredGrid>,
        nb_partitions: usize,
    ) -> Result<Box<dyn Partitioner>, PartitionError> {
        Self::registry().build(name, grid, nb_partitions)
    }

    /// Build `name`, or `fallback` if `name` is not registered.
    ///
    /// Only the unknown-name failure is recovered; a bad partition count
    /// is reported as usual.
    pub fn build_or(
        name: &str,
        fallback: &str,
        grid: Arc<StructuredGrid>,
        nb_partitions: usize,
    ) -> Result<Box<dyn Partitioner>, PartitionError> {
        if Self::has(name) {
            return Self::build_with(name, grid, nb_partitions);
        }
        warn!(
            requested = name,
            fallback,
            available = ?Self::list(),
            "unknown partitioner, using fallback"
        );
        Self::build_with(fallback, grid, nb_partitions)
    }

    /// Build the strategy a [`DecompositionConfig`] names.
    pub fn build_from_config(
        config: &DecompositionConfig,
        grid: Arc<StructuredGrid>,
    ) -> Result<Box<dyn Partitioner>, PartitionError> {
        Self::build_with(&config.partitioner, grid, config.resolved_nb_partitions())
    }
}
