//! The closed set of numeric kinds a field can store.

use std::fmt;

/// Numeric kind of a field's storage buffer.
///
/// The tag is fixed when a field is created and always matches the
/// variant of the buffer it describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    /// 32-bit signed integer.
    Int32,
    /// 32-bit IEEE float.
    Real32,
    /// 64-bit IEEE float.
    Real64,
}

impl DataType {
    /// All supported kinds, in tag order.
    pub const ALL: [DataType; 3] = [DataType::Int32, DataType::Real32, DataType::Real64];

    /// The canonical string tag (`"int32"`, `"real32"`, `"real64"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Real32 => "real32",
            Self::Real64 => "real64",
        }
    }

    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            Self::Int32 | Self::Real32 => 4,
            Self::Real64 => 8,
        }
    }

    /// Parse a string tag back into a kind.
    pub fn from_str_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == tag)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
