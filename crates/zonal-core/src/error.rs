//! Error types for the Zonal grid framework.
//!
//! Organised by subsystem: grid construction and indexing, domain
//! decomposition, field storage, and halo communication. None of these
//! are transient; they report programming or configuration mistakes and
//! carry enough context to diagnose them without re-running.

use std::error::Error;
use std::fmt;

use crate::dtype::DataType;

/// Errors from structured-grid construction and indexed access.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A grid needs at least one latitude band.
    EmptyGrid,
    /// A per-latitude array does not have one entry per band.
    LengthMismatch {
        /// Which array was mis-sized (e.g. `"pl"`, `"lonmin"`).
        what: &'static str,
        /// Number of latitude bands.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// A band was given fewer than one longitude point.
    InvalidPointCount {
        /// Offending band.
        jlat: usize,
        /// The count that was supplied.
        count: i64,
    },
    /// A latitude value is non-finite, outside `[-90, 90]`, or breaks the
    /// north-to-south ordering.
    InvalidLatitude {
        /// Offending band.
        jlat: usize,
        /// The value that was supplied.
        value: f64,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Longitude bounds of a band are non-finite or not increasing.
    InvalidLonBounds {
        /// Offending band.
        jlat: usize,
        /// Supplied western bound.
        lonmin: f64,
        /// Supplied eastern bound.
        lonmax: f64,
    },
    /// A latitude or longitude index is outside the grid.
    IndexOutOfRange {
        /// Which index (`"jlat"`, `"jlon"`, `"point"`).
        what: &'static str,
        /// The index that was requested.
        index: usize,
        /// Number of valid positions.
        len: usize,
    },
    /// A family constructor received an unusable parameter.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A short grid name does not denote a known family.
    UnknownName {
        /// The name that was requested.
        name: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one latitude"),
            Self::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what} has {actual} entries but the grid has {expected} latitudes"
            ),
            Self::InvalidPointCount { jlat, count } => {
                write!(f, "latitude {jlat} has {count} longitude points, need at least 1")
            }
            Self::InvalidLatitude {
                jlat,
                value,
                reason,
            } => write!(f, "latitude {jlat} = {value}: {reason}"),
            Self::InvalidLonBounds {
                jlat,
                lonmin,
                lonmax,
            } => write!(
                f,
                "latitude {jlat} has invalid longitude bounds [{lonmin}, {lonmax}]"
            ),
            Self::IndexOutOfRange { what, index, len } => {
                write!(f, "{what} index {index} out of range [0, {len})")
            }
            Self::InvalidParameter { name, reason } => write!(f, "invalid {name}: {reason}"),
            Self::UnknownName { name } => write!(f, "unknown grid name '{name}'"),
        }
    }
}

impl Error for GridError {}

/// Errors from domain decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// No partitioner is registered under the requested name.
    UnknownStrategy {
        /// The name that was requested.
        name: String,
        /// Names that are registered, in registration order.
        available: Vec<String>,
    },
    /// A partitioner is already registered under this name.
    DuplicateStrategy {
        /// The name that was registered twice.
        name: String,
    },
    /// The partition count is zero.
    InvalidPartitionCount {
        /// Requested number of partitions.
        nb_partitions: usize,
        /// Number of points in the grid.
        npts: usize,
    },
    /// The output buffer does not have one slot per grid point.
    OutputLength {
        /// Number of points in the grid.
        expected: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },
    /// An assignment names a partition outside `[0, nb_partitions)`.
    AssignmentOutOfRange {
        /// Point whose assignment is invalid.
        point: usize,
        /// The partition it was assigned to.
        partition: u32,
        /// Number of partitions.
        nb_partitions: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStrategy { name, available } => write!(
                f,
                "no partitioner named '{name}' (available: {})",
                available.join(", ")
            ),
            Self::DuplicateStrategy { name } => {
                write!(f, "a partitioner named '{name}' is already registered")
            }
            Self::InvalidPartitionCount {
                nb_partitions,
                npts,
            } => write!(
                f,
                "cannot split {npts} points into {nb_partitions} partitions"
            ),
            Self::OutputLength { expected, actual } => write!(
                f,
                "partition buffer has length {actual}, expected {expected}"
            ),
            Self::AssignmentOutOfRange {
                point,
                partition,
                nb_partitions,
            } => write!(
                f,
                "point {point} assigned to partition {partition}, outside [0, {nb_partitions})"
            ),
        }
    }
}

impl Error for PartitionError {}

/// Errors from the halo-exchange transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A peer rank is outside the communicator.
    InvalidRank {
        /// The rank that was addressed.
        rank: usize,
        /// Communicator size.
        size: usize,
    },
    /// The channel to or from a peer has been closed.
    Disconnected {
        /// The peer rank.
        peer: usize,
    },
    /// A peer sent data of a different numeric kind.
    PayloadType {
        /// The sending rank.
        peer: usize,
        /// Kind the receiver expected.
        expected: DataType,
        /// Kind that arrived.
        actual: DataType,
    },
    /// A peer sent a different number of values than the plan requires.
    PayloadLength {
        /// The sending rank.
        peer: usize,
        /// Number of values the receiver expected.
        expected: usize,
        /// Number of values that arrived.
        actual: usize,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank, size } => {
                write!(f, "rank {rank} outside communicator of size {size}")
            }
            Self::Disconnected { peer } => write!(f, "channel to rank {peer} disconnected"),
            Self::PayloadType {
                peer,
                expected,
                actual,
            } => write!(f, "rank {peer} sent {actual} data, expected {expected}"),
            Self::PayloadLength {
                peer,
                expected,
                actual,
            } => write!(f, "rank {peer} sent {actual} values, expected {expected}"),
        }
    }
}

impl Error for CommError {}

/// Errors from field storage, function-space layout and typed access.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The field was viewed as a numeric kind it does not store.
    TypeMismatch {
        /// Name of the field.
        field: String,
        /// Kind the caller asked for.
        requested: DataType,
        /// Kind the field actually stores.
        actual: DataType,
    },
    /// A field must carry at least one variable per point.
    ZeroVars {
        /// Name of the field.
        field: String,
    },
    /// A buffer handed to a halo exchange does not match the layout.
    BufferLength {
        /// Expected number of values (`nb_nodes * nb_vars`).
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A function-space input disagrees with the grid or communicator.
    Layout {
        /// Which quantity disagrees (e.g. `"distribution points"`).
        what: &'static str,
        /// Value required by the layout.
        expected: usize,
        /// Value that was supplied.
        actual: usize,
    },
    /// Grid lookup failed while building a layout.
    Grid(GridError),
    /// The underlying halo transport failed.
    Comm(CommError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                field,
                requested,
                actual,
            } => write!(
                f,
                "could not view field '{field}' with data type {actual} as {requested}"
            ),
            Self::ZeroVars { field } => {
                write!(f, "field '{field}' must have at least one variable")
            }
            Self::BufferLength { expected, actual } => write!(
                f,
                "halo buffer has {actual} values, layout requires {expected}"
            ),
            Self::Layout {
                what,
                expected,
                actual,
            } => write!(f, "{what} is {actual}, layout requires {expected}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Comm(e) => write!(f, "halo exchange: {e}"),
        }
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for FieldError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<CommError> for FieldError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_field_and_kinds() {
        let e = FieldError::TypeMismatch {
            field: "temperature".into(),
            requested: DataType::Int32,
            actual: DataType::Real64,
        };
        let msg = e.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("real64"));
        assert!(msg.contains("int32"));
    }

    #[test]
    fn unknown_strategy_lists_alternatives() {
        let e = PartitionError::UnknownStrategy {
            name: "nonexistent".into(),
            available: vec!["block".into(), "round_robin".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("block, round_robin"));
    }

    #[test]
    fn comm_error_is_field_error_source() {
        let e = FieldError::from(CommError::Disconnected { peer: 3 });
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "halo exchange: channel to rank 3 disconnected");
    }

    #[test]
    fn index_out_of_range_display() {
        let e = GridError::IndexOutOfRange {
            what: "jlat",
            index: 7,
            len: 4,
        };
        assert_eq!(e.to_string(), "jlat index 7 out of range [0, 4)");
    }
}
