//! Domain decomposition of structured grids.
//!
//! A [`Partitioner`] assigns every point of a [`StructuredGrid`] to one of
//! `nb_partitions` partitions. Assignments are pure functions of
//! `(grid, nb_partitions)`: every worker can compute the same assignment
//! independently, so none has to be broadcast.
//!
//! # Strategies
//!
//! | Name            | Type                      |
//! |-----------------|---------------------------|
//! | `"block"`       | [`BlockPartitioner`]      |
//! | `"checkerboard"`| [`CheckerboardPartitioner`] |
//! | `"round_robin"` | [`RoundRobinPartitioner`] |
//! | `"shuffled"`    | [`ShuffledPartitioner`]   |
//!
//! Strategies are selected by name through a [`PartitionerRegistry`];
//! [`PartitionerFactory`] is the process-wide registry of the built-ins.
//!
//! [`StructuredGrid`]: zonal_grid::StructuredGrid

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod checkerboard;
pub mod config;
pub mod distribution;
pub mod partitioner;
pub mod registry;
pub mod round_robin;
pub mod shuffled;

#[cfg(test)]
pub(crate) mod compliance;

pub use block::BlockPartitioner;
pub use checkerboard::CheckerboardPartitioner;
pub use config::{nb_workers, DecompositionConfig};
pub use distribution::Distribution;
pub use partitioner::{Partitioner, PartitionerBase};
pub use registry::{PartitionerBuilder, PartitionerFactory, PartitionerRegistry};
pub use round_robin::RoundRobinPartitioner;
pub use shuffled::ShuffledPartitioner;
