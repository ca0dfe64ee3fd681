//! Mesh and simulation context traits
//!
//! # Design Philosophy
//!
//! The output pipeline never sees the grid itself. It only sees:
//! - a `Simulation` that knows its discretization, DOF count and elements
//! - an `ElementContext` per element that maps local DOFs to global ones
//!   and exposes the fluid state and PVT region of each DOF
//!
//! Both are object-safe where output modules need them to be, so one
//! pipeline can drive heterogeneous modules through `&dyn ElementContext`.

use std::fmt;

use crate::physics::FluidState;

// =================================================================================================
// Discretization kind
// =================================================================================================

/// Kind of spatial discretization the simulation runs with
///
/// Output modules use this tag as a capability check: a module that only
/// applies to one kind silently does nothing under the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discretization {
    /// Element-centered finite volumes (one DOF per element)
    CellCentered,

    /// Vertex-centered finite volumes (box scheme, DOFs on vertices)
    VertexCentered,
}

impl Discretization {
    /// Get name identifier
    pub fn name(&self) -> &'static str {
        match self {
            Discretization::CellCentered => "CellCentered",
            Discretization::VertexCentered => "VertexCentered",
        }
    }
}

impl fmt::Display for Discretization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Element Context
// =================================================================================================

/// Local view of one mesh element at the current output step
///
/// `time_idx` selects the time level: `0` is the current solution, larger
/// values are history kept by the solver. Output modules only read level 0.
pub trait ElementContext {
    /// Discretization the element belongs to
    fn discretization(&self) -> Discretization;

    /// Number of primary DOFs of the element at a time level
    fn num_primary_dof(&self, time_idx: usize) -> usize;

    /// Global index of a local DOF
    fn global_space_index(&self, dof: usize, time_idx: usize) -> usize;

    /// Fluid state of a local DOF
    fn fluid_state(&self, dof: usize, time_idx: usize) -> &dyn FluidState;

    /// PVT region of a local DOF
    fn pvt_region_index(&self, dof: usize, time_idx: usize) -> usize;
}

// =================================================================================================
// Simulation
// =================================================================================================

/// The running simulation, as seen by output modules
///
/// # Stability
/// Output modules bind to a simulation once, at construction, and only
/// read its discretization. The pipeline reads the DOF count and the
/// elements at every output step.
pub trait Simulation {
    /// Element context handed out for each element
    type Element<'a>: ElementContext + Sync
    where
        Self: 'a;

    /// Discretization of the simulation
    fn discretization(&self) -> Discretization;

    /// Number of DOFs of the active partition
    fn num_global_dof(&self) -> usize;

    /// All elements of the active partition
    fn elements(&self) -> Vec<Self::Element<'_>>;
}
