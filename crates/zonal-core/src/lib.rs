//! Core types for the Zonal grid framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the grid, partitioning and field crates:
//! the numeric [`DataType`] tag, the [`GridHash`] identity, and the
//! error enums for each subsystem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dtype;
pub mod error;
pub mod hash;

pub use dtype::DataType;
pub use error::{CommError, FieldError, GridError, PartitionError};
pub use hash::GridHash;
