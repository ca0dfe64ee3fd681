//! Grids, PVT tables and writers shared by the integration tests

use std::sync::Arc;

use blackoil_output::mesh::{CellElement, CellGrid, Discretization, ElementContext};
use blackoil_output::output::ResultWriter;
use blackoil_output::physics::{BlackOilFluidState, FluidState, PhaseArray, RegionTable, TabulatedPvt};

/// Two-region PVT table sampled between 1 and 300 bar
pub fn standard_pvt() -> Arc<TabulatedPvt> {
    let region = |shift: f64| {
        RegionTable::new(
            vec![1.0e5, 1.0e7, 2.0e7, 3.0e7],
            vec![0.0, 50.0 + shift, 100.0 + shift, 150.0 + shift],
            vec![1.0, 0.012, 0.006, 0.004],
            vec![1.0, 1.15, 1.3, 1.45],
            vec![0.0, 0.05, 0.1, 0.15],
        )
        .unwrap()
    };
    Arc::new(TabulatedPvt::new(vec![region(0.0), region(10.0)]).unwrap())
}

/// `n` identical DOFs
pub fn uniform_grid(n: usize, pressure: PhaseArray<f64>, saturation: PhaseArray<f64>) -> CellGrid {
    let fs = BlackOilFluidState::new(pressure, saturation);
    CellGrid::cell_centered(vec![fs; n], vec![0; n]).unwrap()
}

/// `n` DOFs with pressure, saturation, dissolved gas and region varying with the index
pub fn varied_grid(discretization: Discretization, n: usize) -> CellGrid {
    let states = (0..n)
        .map(|i| {
            let t = i as f64 / n.max(1) as f64;
            let po = 5.0e6 + 2.0e7 * t;
            BlackOilFluidState::new(
                PhaseArray::new(po, po + 2.0e5, po - 1.0e5),
                PhaseArray::new(0.7 - 0.3 * t, 0.1 * t, 0.3 + 0.2 * t),
            )
            .with_dissolved_gas(0.02 + 0.1 * t)
        })
        .collect();
    let regions = (0..n).map(|i| i % 2).collect();
    CellGrid::new(discretization, states, regions).unwrap()
}

/// Element whose global indices are shifted by `offset`
///
/// Mimics a mesh context that reports indices outside the active partition.
pub struct OffsetElement<'a> {
    pub inner: CellElement<'a>,
    pub offset: usize,
}

impl ElementContext for OffsetElement<'_> {
    fn discretization(&self) -> Discretization {
        self.inner.discretization()
    }

    fn num_primary_dof(&self, time_idx: usize) -> usize {
        self.inner.num_primary_dof(time_idx)
    }

    fn global_space_index(&self, dof: usize, time_idx: usize) -> usize {
        self.inner.global_space_index(dof, time_idx) + self.offset
    }

    fn fluid_state(&self, dof: usize, time_idx: usize) -> &dyn FluidState {
        self.inner.fluid_state(dof, time_idx)
    }

    fn pvt_region_index(&self, dof: usize, time_idx: usize) -> usize {
        self.inner.pvt_region_index(dof, time_idx)
    }
}

/// Writer that accepts no producer kind
pub struct RejectingWriter;

impl ResultWriter for RejectingWriter {
    fn name(&self) -> &str {
        "RejectingWriter"
    }
}
