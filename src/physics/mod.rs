//! Fluid physics boundary
//!
//! This module provides the types the output pipeline reads from the
//! simulation: fluid states and PVT properties. It does not model any
//! physics itself, beyond table lookup in [`TabulatedPvt`].
//!
//! # Core Concepts
//!
//! - **Phase / Component**: closed identifiers of the black-oil model
//! - **Fluid State**: per-DOF snapshot (pressures, saturations, compositions)
//! - **PVT Provider**: pure evaluators `F(p, region)` for Rs, Bg, Bo and
//!   `F(X_oG, region)` for the saturation pressure
//!
//! # Example
//!
//! ```rust
//! use blackoil_output::physics::{
//!     BlackOilFluidState, FluidState, Phase, PhaseArray, PvtProvider, RegionTable, TabulatedPvt,
//! };
//!
//! let table = RegionTable::new(
//!     vec![1.0e5, 2.0e7],
//!     vec![0.0, 100.0],
//!     vec![1.0, 0.005],
//!     vec![1.0, 1.4],
//!     vec![0.0, 0.1],
//! ).unwrap();
//! let pvt = TabulatedPvt::new(vec![table]).unwrap();
//!
//! let fs = BlackOilFluidState::new(PhaseArray::splat(2.0e7), PhaseArray::new(0.7, 0.1, 0.2));
//! let rs = pvt.gas_dissolution_factor(fs.pressure(Phase::Oil), 0);
//! assert_eq!(rs, 100.0);
//! ```
//!
//! # Implementing a New PVT Provider
//!
//! Implement [`PvtProvider`]. Evaluators must be pure functions of their
//! arguments: output modules call them from several threads and rely on
//! identical inputs giving bit-identical outputs.

// module declaration
pub mod traits;
pub mod fluid_state;
pub mod pvt;

// re-export commonly used types for convenience
pub use fluid_state::BlackOilFluidState;
pub use pvt::{RegionTable, TabulatedPvt};
pub use traits::{
    Component,
    FluidState,
    Phase,
    PhaseArray,
    PvtProvider,
    NUM_PHASES, };
