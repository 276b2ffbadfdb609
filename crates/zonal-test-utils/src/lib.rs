//! Test fixtures and mock types for Zonal development.
//!
//! Provides the canonical fixture grids used across the workspace tests
//! and a [`RecordingFunctionSpace`] that counts halo exchanges instead of
//! performing them.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Mutex;

use zonal_core::{DataType, FieldError};
use zonal_field::{FunctionSpace, HaloBuffer};

pub use fixtures::{octahedral, reduced_2442, regular_lonlat, shared};

/// One recorded call to [`FunctionSpace::halo_exchange`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaloCall {
    pub data_type: DataType,
    pub len: usize,
    pub nb_vars: usize,
}

/// Mock function space with a fixed node count.
///
/// `halo_exchange` validates the buffer length like a real layout, then
/// records the call and leaves the data untouched.
pub struct RecordingFunctionSpace {
    nb_nodes: usize,
    calls: Mutex<Vec<HaloCall>>,
}

impl RecordingFunctionSpace {
    pub fn new(nb_nodes: usize) -> Self {
        Self {
            nb_nodes,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<HaloCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl FunctionSpace for RecordingFunctionSpace {
    fn name(&self) -> &str {
        "Recording"
    }

    fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }

    fn halo_exchange(&self, buffer: HaloBuffer<'_>, nb_vars: usize) -> Result<(), FieldError> {
        let expected = self.nb_nodes * nb_vars;
        if buffer.len() != expected {
            return Err(FieldError::BufferLength {
                expected,
                actual: buffer.len(),
            });
        }
        self.calls.lock().unwrap().push(HaloCall {
            data_type: buffer.data_type(),
            len: buffer.len(),
            nb_vars,
        });
        Ok(())
    }
}
