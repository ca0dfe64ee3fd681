//! In-memory reference grid
//!
//! `CellGrid` is a one-dimensional chain of elements carrying a fluid state
//! and a PVT region per DOF. It implements [`Simulation`] so the output
//! pipeline can be driven without a real solver.
//!
//! # DOF layout
//!
//! ```text
//! cell-centered    : | e0 | e1 | e2 |      DOF i  = element i       (n DOFs)
//! vertex-centered  : v0 - v1 - v2 - v3     element i = (v_i, v_i+1)  (n+1 DOFs)
//! ```
//!
//! Two time levels are kept: `0` (current) and `1` (previous).

use ndarray::Array2;

use crate::mesh::traits::{Discretization, ElementContext, Simulation};
use crate::physics::{BlackOilFluidState, FluidState, Phase, PhaseArray, NUM_PHASES};

/// Reference grid with per-DOF fluid states
#[derive(Debug, Clone)]
pub struct CellGrid {
    discretization: Discretization,
    num_elements: usize,
    current: Vec<BlackOilFluidState>,
    previous: Vec<BlackOilFluidState>,
    regions: Vec<usize>,
}

impl CellGrid {
    /// Cell-centered grid with one element per state
    pub fn cell_centered(states: Vec<BlackOilFluidState>, regions: Vec<usize>) -> Result<Self, String> {
        Self::new(Discretization::CellCentered, states, regions)
    }

    /// Vertex-centered chain with `states.len() - 1` elements
    pub fn vertex_centered(states: Vec<BlackOilFluidState>, regions: Vec<usize>) -> Result<Self, String> {
        Self::new(Discretization::VertexCentered, states, regions)
    }

    /// Create a grid from per-DOF states and region ids
    ///
    /// # Errors
    ///
    /// Returns an error if the number of region ids does not match the
    /// number of states, or if a vertex-centered grid has fewer than two
    /// vertices.
    pub fn new(
        discretization: Discretization,
        states: Vec<BlackOilFluidState>,
        regions: Vec<usize>,
    ) -> Result<Self, String> {
        if states.len() != regions.len() {
            return Err(format!(
                "Grid has {} fluid states but {} PVT region ids",
                states.len(),
                regions.len()
            ));
        }

        let num_elements = match discretization {
            Discretization::CellCentered => states.len(),
            Discretization::VertexCentered => {
                if states.len() < 2 {
                    return Err("Vertex-centered grid needs at least 2 vertices".to_string());
                }
                states.len() - 1
            }
        };

        Ok(Self {
            discretization,
            num_elements,
            previous: states.clone(),
            current: states,
            regions,
        })
    }

    /// Create a grid from solver arrays
    ///
    /// `pressure` and `saturation` have shape `[n_dof, 3]` with columns in
    /// `[oil, gas, water]` order; pressures are in Pa.
    pub fn from_arrays(
        discretization: Discretization,
        pressure: &Array2<f64>,
        saturation: &Array2<f64>,
        regions: Vec<usize>,
    ) -> Result<Self, String> {
        if pressure.ncols() != NUM_PHASES || saturation.ncols() != NUM_PHASES {
            return Err(format!(
                "Phase arrays must have {} columns, got {} (pressure) and {} (saturation)",
                NUM_PHASES,
                pressure.ncols(),
                saturation.ncols()
            ));
        }
        if pressure.nrows() != saturation.nrows() {
            return Err(format!(
                "Pressure has {} rows but saturation has {}",
                pressure.nrows(),
                saturation.nrows()
            ));
        }

        let states = pressure
            .rows()
            .into_iter()
            .zip(saturation.rows())
            .map(|(p, s)| {
                BlackOilFluidState::new(
                    PhaseArray::from_fn(|phase| p[phase.index()]),
                    PhaseArray::from_fn(|phase| s[phase.index()]),
                )
            })
            .collect();

        Self::new(discretization, states, regions)
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Number of DOFs
    pub fn num_dof(&self) -> usize {
        self.current.len()
    }

    /// Replace the current solution, shifting it to the previous time level
    pub fn advance(&mut self, states: Vec<BlackOilFluidState>) -> Result<(), String> {
        if states.len() != self.current.len() {
            return Err(format!(
                "New solution has {} states, grid has {} DOFs",
                states.len(),
                self.current.len()
            ));
        }
        self.previous = std::mem::replace(&mut self.current, states);
        Ok(())
    }

    /// Overwrite the current fluid state of one DOF
    ///
    /// # Errors
    ///
    /// Returns an error if `dof` is not a DOF of this grid.
    pub fn set_state(&mut self, dof: usize, state: BlackOilFluidState) -> Result<(), String> {
        let num_dof = self.current.len();
        let slot = self
            .current
            .get_mut(dof)
            .ok_or_else(|| format!("DOF {} out of range, grid has {} DOFs", dof, num_dof))?;
        *slot = state;
        Ok(())
    }

    /// Current fluid state of one DOF, `None` if out of range
    pub fn state(&self, dof: usize) -> Option<&BlackOilFluidState> {
        self.current.get(dof)
    }

    /// Set the oil pressure of every DOF (handy for sweeps in tests and benches)
    pub fn fill_oil_pressure(&mut self, pressure: f64) {
        for state in &mut self.current {
            state.set_pressure(Phase::Oil, pressure);
        }
    }

    /// Element context for element `index`
    pub fn element(&self, index: usize) -> CellElement<'_> {
        CellElement { grid: self, index }
    }

    /// Split the elements into `num_parts` contiguous partitions
    ///
    /// Each partition is extended by `overlap` elements on both sides, so
    /// neighbouring partitions share DOFs at their boundaries the same way
    /// an overlapping domain decomposition does.
    pub fn partitions(&self, num_parts: usize, overlap: usize) -> Vec<Vec<CellElement<'_>>> {
        let num_parts = num_parts.clamp(1, self.num_elements.max(1));
        let chunk = self.num_elements.div_ceil(num_parts);

        (0..num_parts)
            .map(|part| {
                let start = (part * chunk).min(self.num_elements);
                let end = ((part + 1) * chunk).min(self.num_elements);
                let lo = start.saturating_sub(overlap);
                let hi = (end + overlap).min(self.num_elements);
                (lo..hi).map(|i| self.element(i)).collect()
            })
            .collect()
    }

    fn states(&self, time_idx: usize) -> &[BlackOilFluidState] {
        if time_idx == 0 { &self.current } else { &self.previous }
    }
}

impl Simulation for CellGrid {
    type Element<'a> = CellElement<'a>;

    fn discretization(&self) -> Discretization {
        self.discretization
    }

    fn num_global_dof(&self) -> usize {
        self.num_dof()
    }

    fn elements(&self) -> Vec<CellElement<'_>> {
        (0..self.num_elements).map(|i| self.element(i)).collect()
    }
}

/// Element of a [`CellGrid`]
#[derive(Debug, Clone, Copy)]
pub struct CellElement<'a> {
    grid: &'a CellGrid,
    index: usize,
}

impl CellElement<'_> {
    /// Index of the element in its grid
    pub fn index(&self) -> usize {
        self.index
    }
}

impl ElementContext for CellElement<'_> {
    fn discretization(&self) -> Discretization {
        self.grid.discretization
    }

    fn num_primary_dof(&self, _time_idx: usize) -> usize {
        match self.grid.discretization {
            Discretization::CellCentered => 1,
            Discretization::VertexCentered => 2,
        }
    }

    fn global_space_index(&self, dof: usize, _time_idx: usize) -> usize {
        self.index + dof
    }

    fn fluid_state(&self, dof: usize, time_idx: usize) -> &dyn FluidState {
        let global = self.global_space_index(dof, time_idx);
        &self.grid.states(time_idx)[global]
    }

    fn pvt_region_index(&self, dof: usize, time_idx: usize) -> usize {
        self.grid.regions[self.global_space_index(dof, time_idx)]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
