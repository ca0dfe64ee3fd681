//! Black-oil output module for ECL-style result files
//!
//! # What is collected
//!
//! | Switch | Buffers | Committed as |
//! |--------|---------|--------------|
//! | pressures | one per phase, in **bar** | `PRESSURE` (oil), `PGAS`, `PWAT` |
//! | saturations | one per phase | `SWAT`, `SGAS` (oil is never committed) |
//! | gas dissolution factor | Rs(p_o, region) | `RS` |
//! | gas formation volume factor | Bg(p_o, region) | `BG` |
//! | oil formation volume factor | Bo(p_o, region) of saturated oil | `BOSAT` |
//! | oil saturation pressure | p_sat(X_oG, region) | `PSAT` |
//!
//! Pressures are divided by `1e5` exactly: consumers of ECL files read bar.
//! Oil saturation is never committed: it is `1 - SWAT - SGAS`.
//!
//! # Lifecycle
//!
//! ```text
//! Unallocated ──allocate──▶ Allocated ──process──▶ Populated ──commit──▶ Committed
//!                               ▲                      ▲                    │
//!                               └──────allocate────────┴──────process───────┘
//! ```
//!
//! The module only applies to cell-centered discretizations. Under any
//! other discretization every operation is a no-op.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use blackoil_output::mesh::{CellGrid, Simulation};
//! use blackoil_output::output::{BlackOilOutputModule, OutputConfiguration, OutputModule};
//! use blackoil_output::output::export::MemoryWriter;
//! use blackoil_output::physics::{BlackOilFluidState, PhaseArray, RegionTable, TabulatedPvt};
//!
//! let fs = BlackOilFluidState::new(PhaseArray::new(2.5e7, 2.5e7, 2.6e7), PhaseArray::new(0.6, 0.1, 0.3));
//! let grid = CellGrid::cell_centered(vec![fs], vec![0]).unwrap();
//! let table = RegionTable::new(
//!     vec![1.0e5, 3.0e7], vec![0.0, 150.0], vec![1.0, 0.004], vec![1.0, 1.5], vec![0.0, 0.15],
//! ).unwrap();
//!
//! let config = OutputConfiguration::none().pressures(true);
//! let mut module = BlackOilOutputModule::new(&grid, Arc::new(TabulatedPvt::new(vec![table]).unwrap()), config);
//!
//! module.allocate(grid.num_global_dof());
//! for element in grid.elements() {
//!     module.process(&element);
//! }
//!
//! let mut writer = MemoryWriter::new();
//! module.commit(&mut writer);
//! assert_eq!(writer.get("PRESSURE").unwrap().as_slice(), &[250.0]);
//! ```

use std::sync::Arc;

use nalgebra::DVector;

use crate::mesh::{Discretization, ElementContext, Simulation};
use crate::output::config::OutputConfiguration;
use crate::output::writer::{ProducerKind, ResultWriter};
use crate::output::{commit_scalar_buffer, resize_scalar_buffer, BufferType, OutputModule, OutputState, ScalarBuffer};
use crate::physics::{Component, Phase, PhaseArray, PvtProvider};

/// Conversion factor from the fluid state's pressure unit (Pa) to bar
pub const PASCAL_PER_BAR: f64 = 1e5;

/// Oil pressure (bar)
pub const PRESSURE: &str = "PRESSURE";
/// Gas pressure (bar)
pub const PGAS: &str = "PGAS";
/// Water pressure (bar)
pub const PWAT: &str = "PWAT";
/// Water saturation
pub const SWAT: &str = "SWAT";
/// Gas saturation
pub const SGAS: &str = "SGAS";
/// Gas dissolution factor
pub const RS: &str = "RS";
/// Gas formation volume factor
pub const BG: &str = "BG";
/// Formation volume factor of saturated oil
pub const BOSAT: &str = "BOSAT";
/// Oil saturation pressure
pub const PSAT: &str = "PSAT";

/// Every name the module can commit, in commit order
pub const FIELD_NAMES: [&str; 9] = [PRESSURE, PGAS, PWAT, SWAT, SGAS, RS, BG, BOSAT, PSAT];

/// Values computed for one DOF, before they are stored
///
/// Disabled groups stay `None`, so storing a record never touches their buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DofRecord {
    global: usize,
    saturation: Option<PhaseArray<f64>>,
    pressure: Option<PhaseArray<f64>>,
    gas_dissolution_factor: Option<f64>,
    gas_formation_volume_factor: Option<f64>,
    saturated_oil_formation_volume_factor: Option<f64>,
    oil_saturation_pressure: Option<f64>,
}

/// Collects pressures, saturations and PVT properties of a black-oil run
pub struct BlackOilOutputModule {
    discretization: Discretization,
    configuration: OutputConfiguration,
    pvt: Arc<dyn PvtProvider>,
    state: OutputState,
    dof_count: usize,

    saturation: PhaseArray<ScalarBuffer>,
    pressure: PhaseArray<ScalarBuffer>,
    gas_dissolution_factor: ScalarBuffer,
    gas_formation_volume_factor: ScalarBuffer,
    saturated_oil_formation_volume_factor: ScalarBuffer,
    oil_saturation_pressure: ScalarBuffer,
}

impl BlackOilOutputModule {
    /// Create a module bound to a simulation
    ///
    /// Only the simulation's discretization is retained.
    pub fn new<S: Simulation>(
        simulation: &S,
        pvt: Arc<dyn PvtProvider>,
        configuration: OutputConfiguration,
    ) -> Self {
        Self::with_discretization(simulation.discretization(), pvt, configuration)
    }

    /// Create a module for an explicit discretization kind
    pub fn with_discretization(
        discretization: Discretization,
        pvt: Arc<dyn PvtProvider>,
        configuration: OutputConfiguration,
    ) -> Self {
        Self {
            discretization,
            configuration,
            pvt,
            state: OutputState::Unallocated,
            dof_count: 0,
            saturation: PhaseArray::from_fn(|_| DVector::zeros(0)),
            pressure: PhaseArray::from_fn(|_| DVector::zeros(0)),
            gas_dissolution_factor: DVector::zeros(0),
            gas_formation_volume_factor: DVector::zeros(0),
            saturated_oil_formation_volume_factor: DVector::zeros(0),
            oil_saturation_pressure: DVector::zeros(0),
        }
    }

    /// Configuration the module was built with
    pub fn configuration(&self) -> &OutputConfiguration {
        &self.configuration
    }

    /// Discretization the module is bound to
    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    /// Saturation buffer of a phase
    pub fn saturation(&self, phase: Phase) -> &ScalarBuffer {
        &self.saturation[phase]
    }

    /// Pressure buffer of a phase (bar)
    pub fn pressure(&self, phase: Phase) -> &ScalarBuffer {
        &self.pressure[phase]
    }

    /// Gas dissolution factor buffer
    pub fn gas_dissolution_factor(&self) -> &ScalarBuffer {
        &self.gas_dissolution_factor
    }

    /// Gas formation volume factor buffer
    pub fn gas_formation_volume_factor(&self) -> &ScalarBuffer {
        &self.gas_formation_volume_factor
    }

    /// Saturated oil formation volume factor buffer
    pub fn saturated_oil_formation_volume_factor(&self) -> &ScalarBuffer {
        &self.saturated_oil_formation_volume_factor
    }

    /// Oil saturation pressure buffer
    pub fn oil_saturation_pressure(&self) -> &ScalarBuffer {
        &self.oil_saturation_pressure
    }

    fn applies(&self) -> bool {
        self.discretization == Discretization::CellCentered
    }

    // ============================== per-DOF kernel ==============================

    /// Compute the record of one local DOF (current time level only)
    ///
    /// Pure function of the element's local data: workers handling
    /// overlapping partitions compute bit-identical records.
    fn evaluate_dof(&self, element: &dyn ElementContext, dof: usize) -> DofRecord {
        let config = &self.configuration;
        let fs = element.fluid_state(dof, 0);
        let region = element.pvt_region_index(dof, 0);
        let po = fs.pressure(Phase::Oil);
        let x_og = fs.mass_fraction(Phase::Oil, Component::Gas);

        DofRecord {
            global: element.global_space_index(dof, 0),
            saturation: config
                .write_saturations
                .then(|| PhaseArray::from_fn(|phase| fs.saturation(phase))),
            pressure: config
                .write_pressures
                .then(|| PhaseArray::from_fn(|phase| fs.pressure(phase) / PASCAL_PER_BAR)),
            gas_dissolution_factor: config
                .write_gas_dissolution_factor
                .then(|| self.pvt.gas_dissolution_factor(po, region)),
            gas_formation_volume_factor: config
                .write_gas_formation_volume_factor
                .then(|| self.pvt.gas_formation_volume_factor(po, region)),
            saturated_oil_formation_volume_factor: config
                .write_oil_formation_volume_factor
                .then(|| self.pvt.saturated_oil_formation_volume_factor(po, region)),
            oil_saturation_pressure: config
                .write_oil_saturation_pressure
                .then(|| self.pvt.oil_saturation_pressure(x_og, region)),
        }
    }

    fn evaluate_element(&self, element: &dyn ElementContext) -> Vec<DofRecord> {
        (0..element.num_primary_dof(0))
            .map(|dof| self.evaluate_dof(element, dof))
            .collect()
    }

    /// Write a record into the buffers
    ///
    /// Records whose global index lies outside the allocated buffers are
    /// dropped with a warning.
    fn store(&mut self, record: &DofRecord) {
        let g = record.global;
        if g >= self.dof_count {
            log::warn!(
                "BlackOilOutputModule: global DOF index {} out of range (buffers hold {} DOFs), skipped",
                g,
                self.dof_count
            );
            return;
        }

        if let Some(values) = &record.saturation {
            for (phase, value) in values.iter() {
                store_value(&mut self.saturation[phase], g, *value, "saturation");
            }
        }
        if let Some(values) = &record.pressure {
            for (phase, value) in values.iter() {
                store_value(&mut self.pressure[phase], g, *value, "pressure");
            }
        }
        if let Some(value) = record.gas_dissolution_factor {
            store_value(&mut self.gas_dissolution_factor, g, value, RS);
        }
        if let Some(value) = record.gas_formation_volume_factor {
            store_value(&mut self.gas_formation_volume_factor, g, value, BG);
        }
        if let Some(value) = record.saturated_oil_formation_volume_factor {
            store_value(&mut self.saturated_oil_formation_volume_factor, g, value, BOSAT);
        }
        if let Some(value) = record.oil_saturation_pressure {
            store_value(&mut self.oil_saturation_pressure, g, value, PSAT);
        }
    }

    /// Guards shared by `process` and `process_elements`
    fn ready_to_process(&self) -> bool {
        if !self.applies() {
            return false;
        }
        if self.state == OutputState::Unallocated {
            log::debug!("BlackOilOutputModule: process called before allocate, ignored");
            return false;
        }
        self.configuration.any_enabled()
    }

    fn process_batch(&mut self, elements: &[&(dyn ElementContext + Sync)], threshold: usize) {
        if !self.ready_to_process() {
            return;
        }

        let records: Vec<Vec<DofRecord>> = if elements.len() > threshold {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;

                // Each element is evaluated independently from shared, read-only
                // data. collect() keeps element order, so the scatter below writes
                // exactly what the sequential path would.
                let this = &*self;
                elements
                    .par_iter()
                    .map(|element| this.evaluate_element(*element))
                    .collect()
            }
            #[cfg(not(feature = "parallel"))]
            {
                elements.iter().map(|element| self.evaluate_element(*element)).collect()
            }
        } else {
            elements.iter().map(|element| self.evaluate_element(*element)).collect()
        };

        for record in records.iter().flatten() {
            self.store(record);
        }
        self.state = OutputState::Populated;
    }
}

impl OutputModule for BlackOilOutputModule {
    fn name(&self) -> &str {
        "BlackOilOutputModule"
    }

    fn state(&self) -> OutputState {
        self.state
    }

    fn allocate(&mut self, dof_count: usize) {
        if !self.applies() {
            log::debug!(
                "BlackOilOutputModule: {} discretization not supported, allocation skipped",
                self.discretization
            );
            return;
        }

        let config = self.configuration;
        if config.write_saturations {
            for (_, buffer) in self.saturation.iter_mut() {
                resize_scalar_buffer(buffer, dof_count);
            }
        }
        if config.write_pressures {
            for (_, buffer) in self.pressure.iter_mut() {
                resize_scalar_buffer(buffer, dof_count);
            }
        }
        if config.write_gas_dissolution_factor {
            resize_scalar_buffer(&mut self.gas_dissolution_factor, dof_count);
        }
        if config.write_gas_formation_volume_factor {
            resize_scalar_buffer(&mut self.gas_formation_volume_factor, dof_count);
        }
        if config.write_oil_formation_volume_factor {
            resize_scalar_buffer(&mut self.saturated_oil_formation_volume_factor, dof_count);
        }
        if config.write_oil_saturation_pressure {
            resize_scalar_buffer(&mut self.oil_saturation_pressure, dof_count);
        }

        self.dof_count = dof_count;
        self.state = OutputState::Allocated;
    }

    fn process(&mut self, element: &dyn ElementContext) {
        if element.discretization() != Discretization::CellCentered || !self.ready_to_process() {
            return;
        }

        for dof in 0..element.num_primary_dof(0) {
            let record = self.evaluate_dof(element, dof);
            self.store(&record);
        }
        self.state = OutputState::Populated;
    }

    fn process_elements(&mut self, elements: &[&(dyn ElementContext + Sync)]) {
        if elements
            .iter()
            .any(|element| element.discretization() != Discretization::CellCentered)
        {
            log::debug!("BlackOilOutputModule: batch contains non cell-centered elements, skipped");
            return;
        }
        self.process_batch(elements, crate::mesh::parallel_threshold());
    }

    fn commit(&mut self, writer: &mut dyn ResultWriter) {
        if !self.applies() {
            return;
        }
        if self.state == OutputState::Unallocated {
            log::debug!("BlackOilOutputModule: commit called before allocate, ignored");
            return;
        }

        let writer_name = writer.name().to_string();
        let Some(sink) = writer.scalar_sink(ProducerKind::Ecl) else {
            log::debug!(
                "BlackOilOutputModule: writer '{}' does not accept {} buffers, commit skipped",
                writer_name,
                ProducerKind::Ecl
            );
            return;
        };

        let config = self.configuration;
        let buffer_type = BufferType::Element;

        if config.write_pressures {
            commit_scalar_buffer(sink, PRESSURE, &self.pressure[Phase::Oil], buffer_type);
            commit_scalar_buffer(sink, PGAS, &self.pressure[Phase::Gas], buffer_type);
            commit_scalar_buffer(sink, PWAT, &self.pressure[Phase::Water], buffer_type);
        }
        if config.write_saturations {
            commit_scalar_buffer(sink, SWAT, &self.saturation[Phase::Water], buffer_type);
            commit_scalar_buffer(sink, SGAS, &self.saturation[Phase::Gas], buffer_type);
        }
        if config.write_gas_dissolution_factor {
            commit_scalar_buffer(sink, RS, &self.gas_dissolution_factor, buffer_type);
        }
        if config.write_gas_formation_volume_factor {
            commit_scalar_buffer(sink, BG, &self.gas_formation_volume_factor, buffer_type);
        }
        if config.write_oil_formation_volume_factor {
            commit_scalar_buffer(sink, BOSAT, &self.saturated_oil_formation_volume_factor, buffer_type);
        }
        if config.write_oil_saturation_pressure {
            commit_scalar_buffer(sink, PSAT, &self.oil_saturation_pressure, buffer_type);
        }

        self.state = OutputState::Committed;
    }
}

impl std::fmt::Debug for BlackOilOutputModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlackOilOutputModule")
            .field("discretization", &self.discretization)
            .field("configuration", &self.configuration)
            .field("pvt", &self.pvt.name())
            .field("state", &self.state)
            .field("dof_count", &self.dof_count)
            .finish()
    }
}

fn store_value(buffer: &mut ScalarBuffer, global: usize, value: f64, quantity: &str) {
    buffer[global] = value;
    debug_assert!(
        !buffer[global].is_nan(),
        "undefined {} value stored at global DOF {}",
        quantity,
        global
    );
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CellGrid;
    use crate::output::export::MemoryWriter;
    use crate::physics::{BlackOilFluidState, RegionTable, TabulatedPvt};
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Linear PVT with a call counter
    #[derive(Default)]
    struct LinearPvt {
        calls: AtomicUsize,
    }

    impl PvtProvider for LinearPvt {
        fn gas_dissolution_factor(&self, pressure: f64, region: usize) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            pressure * 1e-5 + region as f64
        }

        fn gas_formation_volume_factor(&self, pressure: f64, _region: usize) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            1.0e5 / pressure
        }

        fn saturated_oil_formation_volume_factor(&self, pressure: f64, region: usize) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            1.0 + pressure * 1e-8 + 0.1 * region as f64
        }

        fn oil_saturation_pressure(&self, gas_mass_fraction: f64, _region: usize) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            gas_mass_fraction * 1.0e8
        }
    }

    fn state(po: f64, sw: f64, sg: f64) -> BlackOilFluidState {
        BlackOilFluidState::new(
            PhaseArray::new(po, po + 1.0e5, po - 1.0e5),
            PhaseArray::new(1.0 - sw - sg, sg, sw),
        )
        .with_dissolved_gas(0.05)
    }

    fn grid(n: usize) -> CellGrid {
        let states = (0..n).map(|i| state(1.0e7 + 1.0e6 * i as f64, 0.2, 0.1)).collect();
        let regions = (0..n).map(|i| i % 2).collect();
        CellGrid::cell_centered(states, regions).unwrap()
    }

    fn make_module(config: OutputConfiguration) -> (BlackOilOutputModule, Arc<LinearPvt>) {
        let pvt = Arc::new(LinearPvt::default());
        let module = BlackOilOutputModule::with_discretization(
            Discretization::CellCentered,
            pvt.clone(),
            config,
        );
        (module, pvt)
    }

    fn run(module: &mut BlackOilOutputModule, grid: &CellGrid) {
        module.allocate(grid.num_global_dof());
        for element in grid.elements() {
            module.process(&element);
        }
    }

    #[test]
    fn test_new_module_is_unallocated() {
        let (module, _) = make_module(OutputConfiguration::default());
        assert_eq!(module.state(), OutputState::Unallocated);
        assert_eq!(module.pressure(Phase::Oil).len(), 0);
    }

    #[test]
    fn test_allocate_sizes_only_enabled_groups() {
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true).saturation_pressure(true));
        module.allocate(7);

        for phase in Phase::ALL {
            assert_eq!(module.pressure(phase).len(), 7);
            assert_eq!(module.saturation(phase).len(), 0);
        }
        assert_eq!(module.oil_saturation_pressure().len(), 7);
        assert_eq!(module.gas_dissolution_factor().len(), 0);
        assert_eq!(module.gas_formation_volume_factor().len(), 0);
        assert_eq!(module.saturated_oil_formation_volume_factor().len(), 0);
        assert_eq!(module.state(), OutputState::Allocated);
    }

    #[test]
    fn test_reallocate_discards_contents() {
        let grid = grid(3);
        let (mut module, _) = make_module(OutputConfiguration::default());
        run(&mut module, &grid);
        assert!(module.pressure(Phase::Oil)[0] > 0.0);

        module.allocate(5);
        assert_eq!(module.pressure(Phase::Oil).len(), 5);
        assert!(module.pressure(Phase::Oil).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_process_fills_every_quantity() {
        let grid = grid(4);
        let (mut module, _) = make_module(OutputConfiguration::default());
        run(&mut module, &grid);

        assert_eq!(module.state(), OutputState::Populated);

        // DOF 2: po = 1.2e7, region 0
        assert_eq!(module.pressure(Phase::Oil)[2], 120.0);
        assert_eq!(module.pressure(Phase::Gas)[2], 121.0);
        assert_eq!(module.pressure(Phase::Water)[2], 119.0);
        assert_relative_eq!(module.saturation(Phase::Oil)[2], 0.7);
        assert_eq!(module.saturation(Phase::Gas)[2], 0.1);
        assert_eq!(module.saturation(Phase::Water)[2], 0.2);
        assert_relative_eq!(module.gas_dissolution_factor()[2], 120.0);
        assert_relative_eq!(module.gas_formation_volume_factor()[2], 1.0e5 / 1.2e7);
        assert_relative_eq!(module.saturated_oil_formation_volume_factor()[2], 1.12);
        assert_relative_eq!(module.oil_saturation_pressure()[2], 5.0e6);

        // DOF 3 lives in region 1
        assert_relative_eq!(module.gas_dissolution_factor()[3], 131.0);
        assert_relative_eq!(module.saturated_oil_formation_volume_factor()[3], 1.23);
    }

    #[test]
    fn test_pressure_is_converted_to_bar_exactly() {
        for pa in [1.0e5, 2.5e7, 3.141_592_653e6, 123_456.789] {
            let fs = BlackOilFluidState::new(PhaseArray::splat(pa), PhaseArray::new(0.6, 0.1, 0.3));
            let grid = CellGrid::cell_centered(vec![fs], vec![0]).unwrap();
            let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));
            run(&mut module, &grid);

            for phase in Phase::ALL {
                assert_eq!(module.pressure(phase)[0], pa / 1e5);
            }
        }
    }

    #[test]
    fn test_process_is_idempotent() {
        let grid = grid(5);
        let (mut module, _) = make_module(OutputConfiguration::default());
        run(&mut module, &grid);
        let first = module.pressure(Phase::Oil).clone();
        let first_rs = module.gas_dissolution_factor().clone();

        for element in grid.elements() {
            module.process(&element);
        }
        assert_eq!(module.pressure(Phase::Oil), &first);
        assert_eq!(module.gas_dissolution_factor(), &first_rs);
    }

    #[test]
    fn test_disabled_groups_skip_pvt_calls() {
        let grid = grid(3);
        let (mut module, pvt) = make_module(OutputConfiguration::none().saturations(true));
        run(&mut module, &grid);

        assert_eq!(pvt.calls.load(Ordering::Relaxed), 0);
        assert_eq!(module.gas_dissolution_factor().len(), 0);
    }

    #[test]
    fn test_each_pvt_switch_is_independent() {
        let grid = grid(2);
        let mut config = OutputConfiguration::none();
        config.write_gas_formation_volume_factor = true;
        let (mut module, pvt) = make_module(config);
        run(&mut module, &grid);

        assert_eq!(pvt.calls.load(Ordering::Relaxed), 2);
        assert_eq!(module.gas_formation_volume_factor().len(), 2);
        assert_eq!(module.gas_dissolution_factor().len(), 0);
    }

    #[test]
    fn test_historical_time_level_ignored() {
        let mut grid = grid(2);
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));

        let next = vec![state(3.0e7, 0.2, 0.1), state(3.0e7, 0.2, 0.1)];
        grid.advance(next).unwrap();
        run(&mut module, &grid);

        assert_eq!(module.pressure(Phase::Oil)[0], 300.0);
        assert_eq!(module.pressure(Phase::Oil)[1], 300.0);
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let grid = grid(4);
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));
        module.allocate(2);
        for element in grid.elements() {
            module.process(&element);
        }

        assert_eq!(module.pressure(Phase::Oil).len(), 2);
        assert_eq!(module.pressure(Phase::Oil)[1], 110.0);
    }

    #[test]
    fn test_process_before_allocate_is_ignored() {
        let grid = grid(2);
        let (mut module, pvt) = make_module(OutputConfiguration::default());
        module.process(&grid.element(0));

        assert_eq!(module.state(), OutputState::Unallocated);
        assert_eq!(pvt.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_vertex_centered_module_is_inert() {
        let pvt = Arc::new(LinearPvt::default());
        let mut module = BlackOilOutputModule::with_discretization(
            Discretization::VertexCentered,
            pvt.clone(),
            OutputConfiguration::default(),
        );
        let grid = grid(3);
        run(&mut module, &grid);

        let mut writer = MemoryWriter::new();
        module.commit(&mut writer);

        assert_eq!(module.state(), OutputState::Unallocated);
        assert_eq!(module.pressure(Phase::Oil).len(), 0);
        assert!(writer.is_empty());
        assert_eq!(pvt.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_vertex_centered_element_is_ignored() {
        let states = (0..3).map(|_| state(1.0e7, 0.2, 0.1)).collect();
        let vertex_grid = CellGrid::vertex_centered(states, vec![0; 3]).unwrap();
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));
        module.allocate(3);
        module.process(&vertex_grid.element(0));

        assert_eq!(module.state(), OutputState::Allocated);
        assert_eq!(module.pressure(Phase::Oil)[0], 0.0);
    }

    #[test]
    fn test_commit_order_and_names() {
        let grid = grid(2);
        let (mut module, _) = make_module(OutputConfiguration::default());
        run(&mut module, &grid);

        let mut writer = MemoryWriter::new();
        module.commit(&mut writer);

        assert_eq!(writer.names(), FIELD_NAMES.to_vec());
        assert_eq!(module.state(), OutputState::Committed);
        for (_, committed) in writer.iter() {
            assert_eq!(committed.buffer_type, BufferType::Element);
        }
    }

    #[test]
    fn test_commit_keeps_module_buffers() {
        let grid = grid(2);
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));
        run(&mut module, &grid);

        let mut writer = MemoryWriter::new();
        module.commit(&mut writer);
        assert_eq!(module.pressure(Phase::Oil)[0], 100.0);
        assert_eq!(writer.get(PRESSURE).unwrap().as_slice(), module.pressure(Phase::Oil).as_slice());
    }

    #[test]
    fn test_batch_matches_sequential() {
        let grid = grid(64);
        let elements = grid.elements();
        let refs: Vec<&(dyn ElementContext + Sync)> =
            elements.iter().map(|e| e as &(dyn ElementContext + Sync)).collect();

        let (mut sequential, _) = make_module(OutputConfiguration::default());
        run(&mut sequential, &grid);

        // threshold 0 forces the parallel path when the feature is enabled
        let (mut batched, _) = make_module(OutputConfiguration::default());
        batched.allocate(grid.num_global_dof());
        batched.process_batch(&refs, 0);

        for phase in Phase::ALL {
            assert_eq!(batched.pressure(phase), sequential.pressure(phase));
            assert_eq!(batched.saturation(phase), sequential.saturation(phase));
        }
        assert_eq!(batched.gas_dissolution_factor(), sequential.gas_dissolution_factor());
        assert_eq!(batched.oil_saturation_pressure(), sequential.oil_saturation_pressure());
        assert_eq!(batched.state(), OutputState::Populated);
    }

    fn nan_pressure_grid() -> CellGrid {
        CellGrid::cell_centered(vec![state(f64::NAN, 0.2, 0.1)], vec![0]).unwrap()
    }

    fn tabulated_pvt() -> Arc<TabulatedPvt> {
        let table = RegionTable::new(
            vec![1.0e5, 2.0e7],
            vec![0.0, 100.0],
            vec![1.0, 0.005],
            vec![1.0, 1.4],
            vec![0.0, 0.1],
        )
        .unwrap();
        Arc::new(TabulatedPvt::new(vec![table]).unwrap())
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "undefined pressure value")]
    fn test_nan_pressure_trips_definedness_check() {
        let (mut module, _) = make_module(OutputConfiguration::none().pressures(true));
        run(&mut module, &nan_pressure_grid());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "undefined RS value")]
    fn test_nan_pvt_lookup_trips_definedness_check() {
        let mut module = BlackOilOutputModule::with_discretization(
            Discretization::CellCentered,
            tabulated_pvt(),
            OutputConfiguration::none().pvt_properties(true),
        );
        run(&mut module, &nan_pressure_grid());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_nan_stored_silently_in_release() {
        let mut module = BlackOilOutputModule::with_discretization(
            Discretization::CellCentered,
            tabulated_pvt(),
            OutputConfiguration::none().pressures(true).pvt_properties(true),
        );
        run(&mut module, &nan_pressure_grid());

        assert!(module.pressure(Phase::Oil)[0].is_nan());
        assert!(module.gas_dissolution_factor()[0].is_nan());
        assert_eq!(module.state(), OutputState::Populated);
    }

    #[test]
    fn test_unknown_pvt_region_is_reported_not_fatal() {
        let grid = CellGrid::cell_centered(vec![state(1.0e7, 0.2, 0.1)], vec![5]).unwrap();
        let mut module = BlackOilOutputModule::with_discretization(
            Discretization::CellCentered,
            tabulated_pvt(),
            OutputConfiguration::none().pressures(true),
        );
        run(&mut module, &grid);

        // pressures do not consult the PVT, so the bad region is harmless here
        assert_relative_eq!(module.pressure(Phase::Oil)[0], 100.0);
    }

    #[test]
    fn test_debug_output_names_provider() {
        let (module, _) = make_module(OutputConfiguration::default());
        let text = format!("{:?}", module);
        assert!(text.contains("PVT provider"));
        assert!(text.contains("CellCentered"));
    }
}
