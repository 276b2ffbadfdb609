//! C-compatible status codes and numeric-kind tags.
//!
//! [`ZonalStatus`] is the return value of every entry point. Conversions
//! from the Rust error enums (`GridError`, `PartitionError`,
//! `FieldError`, `CommError`) are provided.

use zonal_core::{CommError, DataType, FieldError, GridError, PartitionError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZonalStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, not UTF-8, or otherwise unusable.
    InvalidArgument = -2,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -3,
    /// Grid construction rejected its inputs.
    InvalidGrid = -4,
    /// A latitude, longitude or point index is outside the grid.
    IndexOutOfRange = -5,
    /// A short grid name does not denote a known family.
    UnknownGridName = -6,
    /// No partitioner is registered under the requested name.
    UnknownPartitioner = -7,
    /// Partition count is zero.
    InvalidPartitionCount = -8,
    /// Field data requested as a kind it does not store.
    TypeMismatch = -9,
    /// Function-space inputs disagree with each other.
    LayoutMismatch = -10,
    /// Halo transport failed.
    CommFailed = -11,
    /// A metadata key is missing or holds another kind of value.
    NotFound = -12,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&GridError> for ZonalStatus {
    fn from(e: &GridError) -> Self {
        match e {
            GridError::IndexOutOfRange { .. } => ZonalStatus::IndexOutOfRange,
            GridError::UnknownName { .. } => ZonalStatus::UnknownGridName,
            GridError::EmptyGrid
            | GridError::LengthMismatch { .. }
            | GridError::InvalidPointCount { .. }
            | GridError::InvalidLatitude { .. }
            | GridError::InvalidLonBounds { .. }
            | GridError::InvalidParameter { .. } => ZonalStatus::InvalidGrid,
        }
    }
}

impl From<&PartitionError> for ZonalStatus {
    fn from(e: &PartitionError) -> Self {
        match e {
            PartitionError::UnknownStrategy { .. } => ZonalStatus::UnknownPartitioner,
            PartitionError::DuplicateStrategy { .. } => ZonalStatus::InvalidArgument,
            PartitionError::InvalidPartitionCount { .. } => ZonalStatus::InvalidPartitionCount,
            PartitionError::OutputLength { .. } => ZonalStatus::BufferTooSmall,
            PartitionError::AssignmentOutOfRange { .. } => ZonalStatus::InternalError,
        }
    }
}

impl From<&CommError> for ZonalStatus {
    fn from(_e: &CommError) -> Self {
        ZonalStatus::CommFailed
    }
}

impl From<&FieldError> for ZonalStatus {
    fn from(e: &FieldError) -> Self {
        match e {
            FieldError::TypeMismatch { .. } => ZonalStatus::TypeMismatch,
            FieldError::ZeroVars { .. } => ZonalStatus::InvalidArgument,
            FieldError::BufferLength { .. } => ZonalStatus::BufferTooSmall,
            FieldError::Layout { .. } => ZonalStatus::LayoutMismatch,
            FieldError::Grid(g) => ZonalStatus::from(g),
            FieldError::Comm(c) => ZonalStatus::from(c),
        }
    }
}

/// C-compatible numeric kind of field data.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZonalDataType {
    /// 32-bit signed integers.
    Int32 = 0,
    /// 32-bit floats.
    Real32 = 1,
    /// 64-bit floats.
    Real64 = 2,
}

impl ZonalDataType {
    /// Decode a raw tag received from C.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            x if x == Self::Int32 as i32 => Some(Self::Int32),
            x if x == Self::Real32 as i32 => Some(Self::Real32),
            x if x == Self::Real64 as i32 => Some(Self::Real64),
            _ => None,
        }
    }
}

impl From<ZonalDataType> for DataType {
    fn from(t: ZonalDataType) -> Self {
        match t {
            ZonalDataType::Int32 => DataType::Int32,
            ZonalDataType::Real32 => DataType::Real32,
            ZonalDataType::Real64 => DataType::Real64,
        }
    }
}

impl From<DataType> for ZonalDataType {
    fn from(t: DataType) -> Self {
        match t {
            DataType::Int32 => ZonalDataType::Int32,
            DataType::Real32 => ZonalDataType::Real32,
            DataType::Real64 => ZonalDataType::Real64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(ZonalStatus::Ok as i32, 0);
        assert_eq!(ZonalStatus::InvalidHandle as i32, -1);
        assert_eq!(ZonalStatus::InvalidArgument as i32, -2);
        assert_eq!(ZonalStatus::BufferTooSmall as i32, -3);
        assert_eq!(ZonalStatus::InvalidGrid as i32, -4);
        assert_eq!(ZonalStatus::IndexOutOfRange as i32, -5);
        assert_eq!(ZonalStatus::UnknownGridName as i32, -6);
        assert_eq!(ZonalStatus::UnknownPartitioner as i32, -7);
        assert_eq!(ZonalStatus::InvalidPartitionCount as i32, -8);
        assert_eq!(ZonalStatus::TypeMismatch as i32, -9);
        assert_eq!(ZonalStatus::LayoutMismatch as i32, -10);
        assert_eq!(ZonalStatus::CommFailed as i32, -11);
        assert_eq!(ZonalStatus::NotFound as i32, -12);
        assert_eq!(ZonalStatus::InternalError as i32, -20);
        assert_eq!(ZonalStatus::Panicked as i32, -128);
    }

    #[test]
    fn grid_errors_map() {
        let e = GridError::IndexOutOfRange {
            what: "jlat",
            index: 9,
            len: 4,
        };
        assert_eq!(ZonalStatus::from(&e), ZonalStatus::IndexOutOfRange);
        assert_eq!(ZonalStatus::from(&GridError::EmptyGrid), ZonalStatus::InvalidGrid);
    }

    #[test]
    fn nested_field_errors_map_through() {
        let e = FieldError::Grid(GridError::UnknownName { name: "X1".into() });
        assert_eq!(ZonalStatus::from(&e), ZonalStatus::UnknownGridName);
        let e = FieldError::Comm(CommError::Disconnected { peer: 1 });
        assert_eq!(ZonalStatus::from(&e), ZonalStatus::CommFailed);
    }

    #[test]
    fn data_type_tags_round_trip() {
        for dt in DataType::ALL {
            let tag = ZonalDataType::from(dt);
            assert_eq!(ZonalDataType::from_raw(tag as i32), Some(tag));
            assert_eq!(DataType::from(tag), dt);
        }
        assert_eq!(ZonalDataType::from_raw(3), None);
    }
}
