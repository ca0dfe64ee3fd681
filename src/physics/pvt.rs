//! Tabulated black-oil PVT properties
//!
//! A minimal [`PvtProvider`] backed by one table per PVT region. Every
//! column is sampled on a common, strictly increasing pressure axis and
//! evaluated by piecewise-linear interpolation. Outside the table the
//! end values are held constant.
//!
//! The saturation pressure is obtained by reading the table backwards:
//! the saturated gas mass fraction column must therefore be strictly
//! increasing with pressure.
//!
//! Lookups never panic. A NaN argument or an unknown region id yields NaN,
//! which the output module's definedness check then reports.

use nalgebra::DVector;

use crate::physics::traits::PvtProvider;

/// PVT table of a single region
///
/// | Column | Unit | Meaning |
/// |--------|------|---------|
/// | `pressure` | Pa | sampling axis, strictly increasing |
/// | `rs` | sm³/sm³ | gas dissolution factor of saturated oil |
/// | `bg` | rm³/sm³ | gas formation volume factor |
/// | `bo` | rm³/sm³ | formation volume factor of saturated oil |
/// | `x_og` | - | mass fraction of gas in saturated oil |
#[derive(Debug, Clone)]
pub struct RegionTable {
    pressure: DVector<f64>,
    rs: DVector<f64>,
    bg: DVector<f64>,
    bo: DVector<f64>,
    x_og: DVector<f64>,
}

impl RegionTable {
    /// Create and validate a region table
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - fewer than two samples are given
    /// - columns have different lengths
    /// - a value is NaN or infinite
    /// - `pressure` or `x_og` is not strictly increasing
    pub fn new(
        pressure: Vec<f64>,
        rs: Vec<f64>,
        bg: Vec<f64>,
        bo: Vec<f64>,
        x_og: Vec<f64>,
    ) -> Result<Self, String> {
        let table = Self {
            pressure: DVector::from_vec(pressure),
            rs: DVector::from_vec(rs),
            bg: DVector::from_vec(bg),
            bo: DVector::from_vec(bo),
            x_og: DVector::from_vec(x_og),
        };
        table.validate()?;
        Ok(table)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    fn validate(&self) -> Result<(), String> {
        let n = self.pressure.len();
        if n < 2 {
            return Err(format!("PVT table needs at least 2 samples, got {}", n));
        }

        for (name, column) in [
            ("rs", &self.rs),
            ("bg", &self.bg),
            ("bo", &self.bo),
            ("x_og", &self.x_og),
        ] {
            if column.len() != n {
                return Err(format!(
                    "PVT column '{}' has {} samples, pressure axis has {}",
                    name,
                    column.len(),
                    n
                ));
            }
        }

        for (name, column) in [
            ("pressure", &self.pressure),
            ("rs", &self.rs),
            ("bg", &self.bg),
            ("bo", &self.bo),
            ("x_og", &self.x_og),
        ] {
            if column.iter().any(|v| !v.is_finite()) {
                return Err(format!("PVT column '{}' contains NaN or Inf", name));
            }
        }

        if !is_strictly_increasing(self.pressure.as_slice()) {
            return Err("PVT pressure axis must be strictly increasing".to_string());
        }
        if !is_strictly_increasing(self.x_og.as_slice()) {
            return Err(
                "PVT column 'x_og' must be strictly increasing to invert the saturation pressure"
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// Piecewise-linear black-oil PVT, one table per region
#[derive(Debug, Clone)]
pub struct TabulatedPvt {
    regions: Vec<RegionTable>,
}

impl TabulatedPvt {
    /// Create from region tables, indexed by PVT region id
    pub fn new(regions: Vec<RegionTable>) -> Result<Self, String> {
        if regions.is_empty() {
            return Err("TabulatedPvt needs at least one region".to_string());
        }
        Ok(Self { regions })
    }

    /// Number of PVT regions
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Evaluate `column(axis)` at `x` in `region`, NaN for an unknown region
    fn lookup(
        &self,
        region: usize,
        x: f64,
        columns: impl Fn(&RegionTable) -> (&DVector<f64>, &DVector<f64>),
    ) -> f64 {
        match self.regions.get(region) {
            Some(table) => {
                let (axis, values) = columns(table);
                interpolate(axis.as_slice(), values.as_slice(), x)
            }
            None => {
                log::warn!(
                    "PVT region {} out of range ({} regions), returning NaN",
                    region,
                    self.regions.len()
                );
                f64::NAN
            }
        }
    }
}

impl PvtProvider for TabulatedPvt {
    fn gas_dissolution_factor(&self, pressure: f64, region: usize) -> f64 {
        self.lookup(region, pressure, |t| (&t.pressure, &t.rs))
    }

    fn gas_formation_volume_factor(&self, pressure: f64, region: usize) -> f64 {
        self.lookup(region, pressure, |t| (&t.pressure, &t.bg))
    }

    fn saturated_oil_formation_volume_factor(&self, pressure: f64, region: usize) -> f64 {
        self.lookup(region, pressure, |t| (&t.pressure, &t.bo))
    }

    fn oil_saturation_pressure(&self, gas_mass_fraction: f64, region: usize) -> f64 {
        self.lookup(region, gas_mass_fraction, |t| (&t.x_og, &t.pressure))
    }

    fn name(&self) -> &str {
        "Tabulated PVT"
    }
}

// =================================================================================================
// Helper Functions
// =================================================================================================

fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}

/// Linear interpolation of `ys(xs)` at `x`, clamped to the end values
///
/// `xs` must be strictly increasing and hold at least two samples. NaN in,
/// NaN out.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let n = xs.len();
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // first sample strictly greater than x; guaranteed in 1..n by the checks above
    let upper = xs.partition_point(|&xi| xi <= x);
    let lower = upper - 1;
    let alpha = (x - xs[lower]) / (xs[upper] - xs[lower]);

    ys[lower] + alpha * (ys[upper] - ys[lower])
}

// =================================================================================================
// Tests
// =================================================================================================
