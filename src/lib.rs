//! blackoil-output: Selective scalar-field output for black-oil simulations
//!
//! Collects per-degree-of-freedom quantities of a multiphase flow run
//! (phase pressures, saturations and PVT-derived properties) and hands
//! them to result writers under their ECL names.
//!
//! # Architecture
//!
//! blackoil-output is built on two core principles:
//!
//! 1. **Separation of Simulation and Output**
//!    - The simulation exposes its mesh and fluid state through traits
//!    - Output modules decide what to collect and how to name it
//!    - Result writers decide how to persist it
//!
//! 2. **Selective, Silent Output**
//!    - Six switches select the collected quantities; disabled ones cost nothing
//!    - Unsupported discretizations and writers turn operations into no-ops
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use blackoil_output::prelude::*;
//! use blackoil_output::output::export::MemoryWriter;
//!
//! # fn main() -> Result<(), String> {
//! // 1. Describe the simulation state
//! let fs = BlackOilFluidState::new(
//!     PhaseArray::new(2.5e7, 2.5e7, 2.6e7),
//!     PhaseArray::new(0.6, 0.1, 0.3),
//! );
//! let grid = CellGrid::cell_centered(vec![fs; 4], vec![0; 4])?;
//!
//! // 2. Provide PVT properties
//! let table = RegionTable::new(
//!     vec![1.0e5, 3.0e7],
//!     vec![0.0, 150.0],
//!     vec![1.0, 0.004],
//!     vec![1.0, 1.5],
//!     vec![0.0, 0.15],
//! )?;
//! let pvt = Arc::new(TabulatedPvt::new(vec![table])?);
//!
//! // 3. Select the output and run one step
//! let config = OutputConfiguration::default().saturations(false);
//! let mut pipeline = OutputPipeline::new();
//! pipeline.add_module(BlackOilOutputModule::new(&grid, pvt, config));
//!
//! let mut writer = MemoryWriter::new();
//! pipeline.run_step(&grid, &mut [&mut writer]);
//!
//! // 4. Access results
//! assert_eq!(writer.get("PRESSURE").unwrap()[0], 250.0);
//! assert!(writer.get("SWAT").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Fluid states and PVT providers
//! - [`mesh`]: Simulation and element contexts, reference grid
//! - [`output`]: Output modules, pipeline and result writers

// Core modules
pub mod physics;
pub mod mesh;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use blackoil_output::prelude::*;
    //! ```
    pub use crate::mesh::{CellGrid, Discretization, ElementContext, Simulation};
    pub use crate::output::{
        BlackOilOutputModule,
        BufferType,
        OutputConfiguration,
        OutputModule,
        OutputPipeline,
        OutputState,
        ProducerKind,
        ResultWriter,
        ScalarBuffer,
        ScalarBufferSink,
    };
    pub use crate::physics::{
        BlackOilFluidState,
        FluidState,
        Phase,
        PhaseArray,
        PvtProvider,
        RegionTable,
        TabulatedPvt,
    };
}
