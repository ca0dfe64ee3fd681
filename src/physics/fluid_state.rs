//! Concrete black-oil fluid state
//!
//! A plain value type holding what the solver knows about one DOF at one
//! time level. Reference meshes and tests store one of these per DOF.

use nalgebra::Matrix3;

use crate::physics::traits::{Component, FluidState, Phase, PhaseArray};

/// Snapshot of phase pressures, saturations and compositions at one DOF
///
/// # Composition Layout
///
/// Mass fractions are stored in a 3×3 matrix `X[phase, component]`. Each
/// row should sum to one. Rows are not normalised here.
///
/// # Example
/// ```
/// use blackoil_output::physics::{BlackOilFluidState, FluidState, Phase, PhaseArray};
///
/// let fs = BlackOilFluidState::new(
///     PhaseArray::new(2.5e7, 2.5e7, 2.6e7),
///     PhaseArray::new(0.6, 0.1, 0.3),
/// );
/// assert_eq!(fs.pressure(Phase::Water), 2.6e7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlackOilFluidState {
    pressure: PhaseArray<f64>,
    saturation: PhaseArray<f64>,
    mass_fraction: Matrix3<f64>,
}

impl BlackOilFluidState {
    /// Create a state with pure phases (each phase holds only its own component)
    pub fn new(pressure: PhaseArray<f64>, saturation: PhaseArray<f64>) -> Self {
        Self {
            pressure,
            saturation,
            mass_fraction: Matrix3::identity(),
        }
    }

    /// Set the mass fraction of gas dissolved in oil, keeping the oil row normalised
    pub fn with_dissolved_gas(mut self, gas_mass_fraction: f64) -> Self {
        self.set_mass_fraction(Phase::Oil, Component::Gas, gas_mass_fraction);
        self.set_mass_fraction(Phase::Oil, Component::Oil, 1.0 - gas_mass_fraction);
        self
    }

    /// Set a single mass fraction
    pub fn set_mass_fraction(&mut self, phase: Phase, component: Component, value: f64) {
        self.mass_fraction[(phase.index(), component.index())] = value;
    }

    /// Set a phase pressure (Pa)
    pub fn set_pressure(&mut self, phase: Phase, value: f64) {
        self.pressure[phase] = value;
    }

    /// Set a phase saturation
    pub fn set_saturation(&mut self, phase: Phase, value: f64) {
        self.saturation[phase] = value;
    }
}

impl FluidState for BlackOilFluidState {
    fn pressure(&self, phase: Phase) -> f64 {
        self.pressure[phase]
    }

    fn saturation(&self, phase: Phase) -> f64 {
        self.saturation[phase]
    }

    fn mass_fraction(&self, phase: Phase, component: Component) -> f64 {
        self.mass_fraction[(phase.index(), component.index())]
    }
}
