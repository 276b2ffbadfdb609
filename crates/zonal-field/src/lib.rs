//! Typed field storage and halo exchange for Zonal.
//!
//! A [`Field`] is a named, typed array of `nb_nodes * nb_vars` values laid
//! out over a [`FunctionSpace`]. The function space owns the spatial
//! layout (which grid points are local, which are halo copies) and the
//! communication needed to refresh halos; the field only owns its values.
//!
//! [`StructuredColumns`] is the function space for structured grids: it
//! takes a grid, a [`Distribution`](zonal_partition::Distribution) and a
//! [`Communicator`], and derives its halo topology locally.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod field;
pub mod function_space;
pub mod metadata;
pub mod structured_columns;
pub mod value;

pub use comm::{ChannelComm, Communicator, HaloPayload, SerialComm};
pub use field::{Field, FieldShape};
pub use function_space::{FunctionSpace, HaloBuffer};
pub use metadata::{Metadata, MetadataValue};
pub use structured_columns::StructuredColumns;
pub use value::{FieldData, FieldValue};
