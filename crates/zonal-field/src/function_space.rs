//! The [`FunctionSpace`] capability fields are laid out over.

use zonal_core::{DataType, FieldError};

/// A field's values handed to a function space for halo exchange.
///
/// Values are node-major: the `nb_vars` values of node `i` occupy
/// `[i * nb_vars, (i + 1) * nb_vars)`.
#[derive(Debug)]
pub enum HaloBuffer<'a> {
    /// 32-bit integers.
    Int32(&'a mut [i32]),
    /// 32-bit floats.
    Real32(&'a mut [f32]),
    /// 64-bit floats.
    Real64(&'a mut [f64]),
}

impl HaloBuffer<'_> {
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

    /// Whether the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spatial layout of a field's nodes, plus the communication that keeps
/// halo nodes in step with their owners.
///
/// Fields hold their function space as `Arc<dyn FunctionSpace>`, so a
/// space lives as long as any field laid out over it.
///
/// # Contract
///
/// - `nb_nodes()` is fixed for the lifetime of the space.
/// - `halo_exchange` overwrites halo nodes only; owned nodes are left
///   untouched. It is collective: every rank of the space must call it
///   with the same kind and `nb_vars`, in the same order relative to
///   other exchanges.
pub trait FunctionSpace: Send + Sync {
    /// Human-readable name of the layout.
    fn name(&self) -> &str;

    /// Number of local nodes, owned and halo.
    fn nb_nodes(&self) -> usize;

    /// Refresh the halo nodes of `buffer` from their owners.
    ///
    /// Fails with [`FieldError::BufferLength`] if `buffer` does not hold
    /// `nb_nodes() * nb_vars` values.
    fn halo_exchange(&self, buffer: HaloBuffer<'_>, nb_vars: usize) -> Result<(), FieldError>;
}
