//! Named, typed arrays laid out over a function space.

use std::fmt;
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};
use tracing::debug;
use zonal_core::{DataType, FieldError};

use crate::function_space::FunctionSpace;
use crate::metadata::Metadata;
use crate::value::{FieldData, FieldValue};

/// Extents of a field's array, outermost first.
pub type FieldShape = SmallVec<[usize; 4]>;

/// A named array of `nb_nodes * nb_vars` values of one numeric kind.
///
/// Values are node-major: `values[node * nb_vars + var]`. The numeric
/// kind is fixed at construction; [`data`](Field::data) and
/// [`data_mut`](Field::data_mut) fail with [`FieldError::TypeMismatch`]
/// when asked for another kind, and never reinterpret storage.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use zonal_field::{Field, StructuredColumns};
/// use zonal_grid::StructuredGrid;
///
/// let grid = Arc::new(StructuredGrid::octahedral(2).unwrap());
/// let fs = Arc::new(StructuredColumns::serial(grid).unwrap());
/// let mut t = Field::new_real64("temperature", 1, fs).unwrap();
/// t.data_mut::<f64>().unwrap()[0] = 273.15;
/// assert_eq!(t.data::<f64>().unwrap()[0], 273.15);
/// assert!(t.data::<i32>().is_err());
/// ```
pub struct Field {
    name: String,
    nb_vars: usize,
    data: FieldData,
    metadata: Metadata,
    function_space: Arc<dyn FunctionSpace>,
}

impl Field {
    /// Zero-initialised field of kind `T` with `nb_vars` values per node.
    pub fn new<T: FieldValue>(
        name: impl Into<String>,
        nb_vars: usize,
        function_space: Arc<dyn FunctionSpace>,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        if nb_vars == 0 {
            return Err(FieldError::ZeroVars { field: name });
        }
        let size = function_space.nb_nodes() * nb_vars;
        debug!(
            field = %name,
            data_type = %T::DATA_TYPE,
            nb_nodes = function_space.nb_nodes(),
            nb_vars,
            function_space = function_space.name(),
            "field created"
        );
        Ok(Self {
            name,
            nb_vars,
            data: T::wrap(vec![T::default(); size]),
            metadata: Metadata::new(),
            function_space,
        })
    }

    /// Integer field.
    pub fn new_int32(
        name: impl Into<String>,
        nb_vars: usize,
        function_space: Arc<dyn FunctionSpace>,
    ) -> Result<Self, FieldError> {
        Self::new::<i32>(name, nb_vars, function_space)
    }

    /// Single-precision field.
    pub fn new_real32(
        name: impl Into<String>,
        nb_vars: usize,
        function_space: Arc<dyn FunctionSpace>,
    ) -> Result<Self, FieldError> {
        Self::new::<f32>(name, nb_vars, function_space)
    }

    /// Double-precision field.
    pub fn new_real64(
        name: impl Into<String>,
        nb_vars: usize,
        function_space: Arc<dyn FunctionSpace>,
    ) -> Result<Self, FieldError> {
        Self::new::<f64>(name, nb_vars, function_space)
    }

    /// Create a field of the kind named by a runtime tag.
    pub fn with_data_type(
        name: impl Into<String>,
        data_type: DataType,
        nb_vars: usize,
        function_space: Arc<dyn FunctionSpace>,
    ) -> Result<Self, FieldError> {
        match data_type {
            DataType::Int32 => Self::new::<i32>(name, nb_vars, function_space),
            DataType::Real32 => Self::new::<f32>(name, nb_vars, function_space),
            DataType::Real64 => Self::new::<f64>(name, nb_vars, function_space),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values per node.
    pub fn nb_vars(&self) -> usize {
        self.nb_vars
    }

    /// Numeric kind of the stored values.
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Total number of values.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Storage footprint of the values in bytes.
    pub fn bytes(&self) -> usize {
        self.size() * self.data_type().size_of()
    }

    /// `[nb_nodes, nb_vars]`.
    pub fn bounds(&self) -> FieldShape {
        smallvec![self.function_space.nb_nodes(), self.nb_vars]
    }

    /// Number of array dimensions.
    pub fn rank(&self) -> usize {
        2
    }

    /// The values as kind `T`.
    pub fn data<T: FieldValue>(&self) -> Result<&[T], FieldError> {
        let actual = self.data.data_type();
        T::slice(&self.data).ok_or_else(|| self.type_mismatch(T::DATA_TYPE, actual))
    }

    /// Mutable values as kind `T`.
    pub fn data_mut<T: FieldValue>(&mut self) -> Result<&mut [T], FieldError> {
        let actual = self.data.data_type();
        if actual != T::DATA_TYPE {
            return Err(self.type_mismatch(T::DATA_TYPE, actual));
        }
        let name = &self.name;
        T::slice_mut(&mut self.data).ok_or_else(|| FieldError::TypeMismatch {
            field: name.clone(),
            requested: T::DATA_TYPE,
            actual,
        })
    }

    /// The tagged storage.
    pub fn values(&self) -> &FieldData {
        &self.data
    }

    /// Metadata attached to the field.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The layout this field lives on.
    pub fn function_space(&self) -> &Arc<dyn FunctionSpace> {
        &self.function_space
    }

    /// Refresh halo values through the function space.
    ///
    /// Collective over all ranks of the function space.
    pub fn halo_exchange(&mut self) -> Result<(), FieldError> {
        self.function_space
            .halo_exchange(self.data.halo_buffer(), self.nb_vars)
    }

    fn type_mismatch(&self, requested: DataType, actual: DataType) -> FieldError {
        FieldError::TypeMismatch {
            field: self.name.clone(),
            requested,
            actual,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("data_type", &self.data_type())
            .field("bounds", &self.bounds())
            .field("function_space", &self.function_space.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_columns::StructuredColumns;
    use zonal_grid::StructuredGrid;

    fn space() -> Arc<dyn FunctionSpace> {
        let grid =
            StructuredGrid::custom(vec![67.5, 22.5, -22.5, -67.5], vec![2, 4, 4, 2]).unwrap();
        Arc::new(StructuredColumns::serial(Arc::new(grid)).unwrap())
    }

    #[test]
    fn real64_field_rejects_int_view() {
        let f = Field::new_real64("temperature", 1, space()).unwrap();
        assert_eq!(f.data_type().as_str(), "real64");
        let err = f.data::<i32>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("real64"));
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: "temperature".into(),
                requested: DataType::Int32,
                actual: DataType::Real64
            }
        );
    }

    #[test]
    fn writes_visible_on_next_read() {
        let mut f = Field::new_real32("q", 3, space()).unwrap();
        {
            let data = f.data_mut::<f32>().unwrap();
            data[5] = 1.5;
            data[35] = -2.0;
        }
        let data = f.data::<f32>().unwrap();
        assert_eq!(data[5], 1.5);
        assert_eq!(data[35], -2.0);
        assert!(f.data_mut::<f64>().is_err());
    }

    #[test]
    fn shape_follows_function_space() {
        let f = Field::new_int32("mask", 2, space()).unwrap();
        assert_eq!(f.size(), 24);
        assert_eq!(f.bytes(), 96);
        assert_eq!(f.bounds().as_slice(), &[12, 2]);
        assert_eq!(f.rank(), 2);
        assert_eq!(f.nb_vars(), 2);
        assert!(f.data::<i32>().unwrap().iter().all(|&v| v == 0));
        assert_eq!(f.values(), &FieldData::Int32(vec![0; 24]));
    }

    #[test]
    fn zero_vars_rejected() {
        assert_eq!(
            Field::new_real64("empty", 0, space()).err(),
            Some(FieldError::ZeroVars {
                field: "empty".into()
            })
        );
    }

    #[test]
    fn runtime_tag_picks_kind() {
        for dt in DataType::ALL {
            let f = Field::with_data_type("x", dt, 1, space()).unwrap();
            assert_eq!(f.data_type(), dt);
        }
    }

    #[test]
    fn metadata_travels_with_field() {
        let mut f = Field::new_real64("t", 1, space()).unwrap();
        f.metadata_mut().set("units", "K");
        assert_eq!(f.metadata().get_text("units"), Some("K"));
    }

    #[test]
    fn serial_halo_exchange_is_noop() {
        let mut f = Field::new_real64("t", 1, space()).unwrap();
        f.data_mut::<f64>().unwrap()[3] = 9.0;
        f.halo_exchange().unwrap();
        assert_eq!(f.data::<f64>().unwrap()[3], 9.0);
    }
}
