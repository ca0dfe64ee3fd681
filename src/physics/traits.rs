//! Fluid-state and fluid-property traits and types
//!
//! This module defines the boundary between the output pipeline and the
//! physics that produced the solution:
//! - `Phase` / `Component`: closed, type-safe identifiers
//! - `PhaseArray`: fixed-size per-phase storage
//! - `FluidState`: per-DOF snapshot read by output modules
//! - `PvtProvider`: pure PVT evaluators (Rs, Bg, Bo, p_sat)

use std::fmt;
use std::ops::{Index, IndexMut};

// =================================================================================================
// Phases and components (Type-safe Identifiers)
// =================================================================================================

/// Number of fluid phases of the black-oil model
pub const NUM_PHASES: usize = 3;

/// Fluid phases of the black-oil model
///
/// The set is closed: the output pipeline relies on exactly three phases and
/// stores per-phase data in a [`PhaseArray`], never in a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Liquid hydrocarbon phase
    Oil,

    /// Vapour hydrocarbon phase
    Gas,

    /// Aqueous phase
    Water,
}

impl Phase {
    /// All phases in storage order
    pub const ALL: [Phase; NUM_PHASES] = [Phase::Oil, Phase::Gas, Phase::Water];

    /// Storage index of the phase
    pub const fn index(self) -> usize {
        match self {
            Phase::Oil => 0,
            Phase::Gas => 1,
            Phase::Water => 2,
        }
    }

    /// Short lowercase name (used in logs and plot titles)
    pub fn name(self) -> &'static str {
        match self {
            Phase::Oil => "oil",
            Phase::Gas => "gas",
            Phase::Water => "water",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chemical pseudo-components of the black-oil model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Oil,
    Gas,
    Water,
}

impl Component {
    /// Storage index of the component
    pub const fn index(self) -> usize {
        match self {
            Component::Oil => 0,
            Component::Gas => 1,
            Component::Water => 2,
        }
    }
}

// =================================================================================================
// PhaseArray (fixed-size per-phase container)
// =================================================================================================

/// Fixed-size container with one slot per [`Phase`]
///
/// # Example
/// ```
/// use blackoil_output::physics::{Phase, PhaseArray};
///
/// let mut pressure = PhaseArray::splat(1.0e5);
/// pressure[Phase::Water] = 1.2e5;
///
/// assert_eq!(pressure[Phase::Oil], 1.0e5);
/// assert_eq!(pressure[Phase::Water], 1.2e5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseArray<T>([T; NUM_PHASES]);

impl<T> PhaseArray<T> {
    /// Build from values given in `[oil, gas, water]` order
    pub const fn new(oil: T, gas: T, water: T) -> Self {
        Self([oil, gas, water])
    }

    /// Build by evaluating `f` for every phase
    pub fn from_fn(mut f: impl FnMut(Phase) -> T) -> Self {
        Self(Phase::ALL.map(&mut f))
    }

    /// Iterate over `(phase, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
        Phase::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate mutably over `(phase, value)` pairs in storage order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Phase, &mut T)> {
        Phase::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Clone> PhaseArray<T> {
    /// Same value for every phase
    pub fn splat(value: T) -> Self {
        Self([value.clone(), value.clone(), value])
    }
}

impl<T> Index<Phase> for PhaseArray<T> {
    type Output = T;

    fn index(&self, phase: Phase) -> &T {
        &self.0[phase.index()]
    }
}

impl<T> IndexMut<Phase> for PhaseArray<T> {
    fn index_mut(&mut self, phase: Phase) -> &mut T {
        &mut self.0[phase.index()]
    }
}

// =================================================================================================
// Fluid State
// =================================================================================================

/// Per-DOF snapshot of the fluid produced by the solver
///
/// Pressures are in Pa, saturations and mass fractions are dimensionless.
pub trait FluidState {
    /// Pressure of a phase (Pa)
    fn pressure(&self, phase: Phase) -> f64;

    /// Saturation of a phase (-)
    fn saturation(&self, phase: Phase) -> f64;

    /// Mass fraction of `component` dissolved in `phase` (-)
    fn mass_fraction(&self, phase: Phase, component: Component) -> f64;
}

// =================================================================================================
// Fluid Property Provider
// =================================================================================================

/// Pure PVT evaluators of a black-oil fluid system
///
/// # Responsibility
/// Derives PVT quantities from a pressure (or dissolved-gas fraction) and
/// a PVT region index. Implementations must be pure: the same inputs
/// always give the same output, whichever thread or partition asks.
///
/// # Mandatory Point
/// Output modules share one provider across worker threads, hence the
/// `Send + Sync` bound.
pub trait PvtProvider: Send + Sync {
    /// Gas dissolution factor Rs of saturated oil at `pressure` (Pa)
    fn gas_dissolution_factor(&self, pressure: f64, region: usize) -> f64;

    /// Gas formation volume factor Bg at `pressure` (Pa)
    fn gas_formation_volume_factor(&self, pressure: f64, region: usize) -> f64;

    /// Formation volume factor Bo of gas-saturated oil at `pressure` (Pa)
    fn saturated_oil_formation_volume_factor(&self, pressure: f64, region: usize) -> f64;

    /// Saturation (bubble-point) pressure of oil holding a gas mass fraction
    /// `gas_mass_fraction` (Pa)
    fn oil_saturation_pressure(&self, gas_mass_fraction: f64, region: usize) -> f64;

    /// Name of the provider (used to display and logging)
    fn name(&self) -> &str {
        "PVT provider"
    }
}
