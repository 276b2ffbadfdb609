//! Numeric element kinds a field can store.

use zonal_core::{CommError, DataType};

use crate::comm::HaloPayload;
use crate::function_space::HaloBuffer;

/// A field's values, tagged with their numeric kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldData {
    /// 32-bit integers.
    Int32(Vec<i32>),
    /// 32-bit floats.
    Real32(Vec<f32>),
    /// 64-bit floats.
    Real64(Vec<f64>),
}

impl FieldData {
    /// Numeric kind of the values.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int32(_) => DataType::Int32,
            Self::Real32(_) => DataType::Real32,
            Self::Real64(_) => DataType::Real64,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Real32(v) => v.len(),
            Self::Real64(v) => v.len(),
        }
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the values for a halo exchange.
    pub fn halo_buffer(&mut self) -> HaloBuffer<'_> {
        match self {
            Self::Int32(v) => HaloBuffer::Int32(v),
            Self::Real32(v) => HaloBuffer::Real32(v),
            Self::Real64(v) => HaloBuffer::Real64(v),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Element types a [`Field`](crate::Field) can store: `i32`, `f32`, `f64`.
///
/// Sealed; the set of kinds is closed so that typed access is a tag
/// comparison rather than a runtime cast.
pub trait FieldValue: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// Tag of this kind.
    const DATA_TYPE: DataType;

    /// Wrap owned values.
    fn wrap(values: Vec<Self>) -> FieldData;

    /// View `data` as this kind, if it is this kind.
    fn slice(data: &FieldData) -> Option<&[Self]>;

    /// Mutable view of `data` as this kind, if it is this kind.
    fn slice_mut(data: &mut FieldData) -> Option<&mut [Self]>;

    /// Pack values for sending.
    fn into_payload(values: Vec<Self>) -> HaloPayload;

    /// Unpack a payload received from `peer`.
    fn from_payload(payload: HaloPayload, peer: usize) -> Result<Vec<Self>, CommError>;
}

macro_rules! field_value {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl FieldValue for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn wrap(values: Vec<Self>) -> FieldData {
                FieldData::$variant(values)
            }

            fn slice(data: &FieldData) -> Option<&[Self]> {
                match data {
                    FieldData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut FieldData) -> Option<&mut [Self]> {
                match data {
                    FieldData::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_payload(values: Vec<Self>) -> HaloPayload {
                HaloPayload::$variant(values)
            }

            fn from_payload(payload: HaloPayload, peer: usize) -> Result<Vec<Self>, CommError> {
                match payload {
                    HaloPayload::$variant(v) => Ok(v),
                    other => Err(CommError::PayloadType {
                        peer,
                        expected: DataType::$variant,
                        actual: other.data_type(),
                    }),
                }
            }
        }
    };
}

field_value!(i32, Int32);
field_value!(f32, Real32);
field_value!(f64, Real64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_kinds() {
        assert_eq!(i32::DATA_TYPE, DataType::Int32);
        assert_eq!(f32::DATA_TYPE, DataType::Real32);
        assert_eq!(f64::DATA_TYPE, DataType::Real64);
        assert_eq!(f64::wrap(vec![1.0]).data_type(), DataType::Real64);
    }

    #[test]
    fn slice_only_matches_own_kind() {
        let mut data = FieldData::Real32(vec![1.0, 2.0]);
        assert_eq!(f32::slice(&data), Some(&[1.0f32, 2.0][..]));
        assert!(f64::slice(&data).is_none());
        assert!(i32::slice_mut(&mut data).is_none());
    }

    #[test]
    fn payload_kind_checked() {
        let err = i32::from_payload(HaloPayload::Real64(vec![0.5]), 2).unwrap_err();
        assert_eq!(
            err,
            CommError::PayloadType {
                peer: 2,
                expected: DataType::Int32,
                actual: DataType::Real64
            }
        );
        assert_eq!(f64::from_payload(HaloPayload::Real64(vec![0.5]), 2), Ok(vec![0.5]));
    }
}
