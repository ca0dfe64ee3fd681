//! Output modules and result writers
//!
//! This module provides the selective scalar-field output pipeline:
//! - **Output modules** own one [`ScalarBuffer`] per collected quantity and
//!   drive the allocate → process → commit lifecycle
//! - **Result writers** receive named buffers through the
//!   [`ScalarBufferSink`] capability and persist them
//! - **Pipeline** runs one output step over several modules and writers
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file (OutputModule trait, buffers)
//! ├── config.rs           ← OutputConfiguration (six switches)
//! ├── blackoil.rs         ← BlackOilOutputModule
//! ├── writer.rs           ← ResultWriter / ScalarBufferSink protocol
//! ├── pipeline.rs         ← OutputPipeline (one output step)
//! ├── export/             ← Data writers
//! │   ├── memory.rs
//! │   └── csv.rs
//! └── visualization/      ← Plot writer
//!     ├── config.rs
//!     └── field_plots.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use blackoil_output::mesh::CellGrid;
//! use blackoil_output::output::{BlackOilOutputModule, OutputConfiguration, OutputPipeline};
//! use blackoil_output::output::export::MemoryWriter;
//! use blackoil_output::physics::{BlackOilFluidState, PhaseArray, RegionTable, TabulatedPvt};
//!
//! let fs = BlackOilFluidState::new(PhaseArray::splat(2.0e7), PhaseArray::new(0.7, 0.1, 0.2));
//! let grid = CellGrid::cell_centered(vec![fs; 10], vec![0; 10]).unwrap();
//! let table = RegionTable::new(
//!     vec![1.0e5, 3.0e7], vec![0.0, 150.0], vec![1.0, 0.004], vec![1.0, 1.5], vec![0.0, 0.15],
//! ).unwrap();
//! let pvt = Arc::new(TabulatedPvt::new(vec![table]).unwrap());
//!
//! let mut pipeline = OutputPipeline::new();
//! pipeline.add_module(BlackOilOutputModule::new(&grid, pvt, OutputConfiguration::default()));
//!
//! let mut writer = MemoryWriter::new();
//! pipeline.run_step(&grid, &mut [&mut writer]);
//!
//! assert_eq!(writer.get("PRESSURE").unwrap().len(), 10);
//! assert!(writer.get("SOIL").is_none());
//! ```

pub mod config;
pub mod blackoil;
pub mod writer;
pub mod pipeline;
pub mod export;
pub mod visualization;

use nalgebra::DVector;

use crate::mesh::ElementContext;

/// One value per global DOF
pub type ScalarBuffer = DVector<f64>;

/// Storage location of a committed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    /// One value per degree of freedom
    Dof,

    /// One value per grid vertex
    Vertex,

    /// One value per grid element
    Element,
}

/// Lifecycle state of an output module within an output step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// No buffers sized yet
    Unallocated,

    /// Buffers sized (zero-filled), nothing processed since
    Allocated,

    /// At least one element processed since the last allocate/commit
    Populated,

    /// Buffers handed to a writer
    Committed,
}

/// Producer of named scalar fields
///
/// # Lifecycle
///
/// 1. `allocate` when the DOF count or the configuration changes
/// 2. `process` once per element (or `process_elements` for a batch)
/// 3. `commit` once per output step and per writer
///
/// Unsupported discretizations and writers are not errors: the affected
/// calls simply do nothing.
pub trait OutputModule: Send {
    /// Name of the module (used for logging)
    fn name(&self) -> &str;

    /// Current lifecycle state
    fn state(&self) -> OutputState;

    /// Size the buffers of every enabled quantity to `dof_count`
    fn allocate(&mut self, dof_count: usize);

    /// Fill the buffers from the DOFs of one element
    fn process(&mut self, element: &dyn ElementContext);

    /// Fill the buffers from a batch of elements
    ///
    /// Must leave the buffers exactly as processing the elements one by one
    /// in slice order would.
    fn process_elements(&mut self, elements: &[&(dyn ElementContext + Sync)]) {
        for element in elements {
            self.process(*element);
        }
    }

    /// Hand the buffers of enabled quantities to `writer`
    fn commit(&mut self, writer: &mut dyn writer::ResultWriter);
}

/// Discard `buffer` and replace it with `len` zeros
pub(crate) fn resize_scalar_buffer(buffer: &mut ScalarBuffer, len: usize) {
    *buffer = DVector::zeros(len);
}

/// Hand one named buffer to a sink
pub(crate) fn commit_scalar_buffer(
    sink: &mut dyn writer::ScalarBufferSink,
    name: &str,
    buffer: &ScalarBuffer,
    buffer_type: BufferType,
) {
    log::trace!("committing '{}' ({} values, {:?})", name, buffer.len(), buffer_type);
    sink.commit_scalar_buffer(name, buffer, buffer_type);
}

// Re-export commonly used items for convenience
pub use blackoil::BlackOilOutputModule;
pub use config::{OutputConfiguration, ParameterInfo};
pub use pipeline::OutputPipeline;
pub use writer::{ProducerKind, ResultWriter, ScalarBufferSink};
