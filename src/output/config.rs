//! Output configuration of the black-oil module
//!
//! Six independent switches select which quantities are collected and
//! committed. Every switch defaults to `true`.
//!
//! The switches have stable external names (`EclOutputWrite*`) listed by
//! [`OutputConfiguration::parameters`]. The same names are used as keys of
//! the `[output]` table when loading from TOML:
//!
//! ```toml
//! [output]
//! EclOutputWriteSaturations = false
//! EclOutputWriteOilSaturationPressure = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Description of one configuration switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    /// External name of the switch
    pub name: &'static str,

    /// Human-readable effect of the switch
    pub description: &'static str,

    /// Value used when the switch is not set
    pub default: bool,
}

const PARAMETERS: [ParameterInfo; 6] = [
    ParameterInfo {
        name: "EclOutputWriteSaturations",
        description: "Include the saturations of all fluid phases in the ECL output files",
        default: true,
    },
    ParameterInfo {
        name: "EclOutputWritePressures",
        description: "Include the absolute pressures of all fluid phases in the ECL output files",
        default: true,
    },
    ParameterInfo {
        name: "EclOutputWriteGasDissolutionFactor",
        description: "Include the gas dissolution factor in the ECL output files",
        default: true,
    },
    ParameterInfo {
        name: "EclOutputWriteGasFormationVolumeFactor",
        description: "Include the gas formation volume factor in the ECL output files",
        default: true,
    },
    ParameterInfo {
        name: "EclOutputWriteOilFormationVolumeFactor",
        description: "Include the oil formation volume factor of saturated oil in the ECL output files",
        default: true,
    },
    ParameterInfo {
        name: "EclOutputWriteOilSaturationPressure",
        description: "Include the saturation pressure of oil in the ECL output files",
        default: true,
    },
];

fn enabled() -> bool {
    true
}

/// Switches selecting the quantities written by the black-oil output module
///
/// # Example
///
/// ```rust
/// use blackoil_output::output::OutputConfiguration;
///
/// let config = OutputConfiguration {
///     write_saturations: false,
///     ..Default::default()
/// };
/// assert!(config.write_pressures);
/// assert!(!config.write_saturations);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfiguration {
    /// Saturations of all phases (oil saturation is collected but never committed)
    #[serde(rename = "EclOutputWriteSaturations", default = "enabled")]
    pub write_saturations: bool,

    /// Pressures of all phases, in bar
    #[serde(rename = "EclOutputWritePressures", default = "enabled")]
    pub write_pressures: bool,

    /// Gas dissolution factor Rs
    #[serde(rename = "EclOutputWriteGasDissolutionFactor", default = "enabled")]
    pub write_gas_dissolution_factor: bool,

    /// Gas formation volume factor Bg
    #[serde(rename = "EclOutputWriteGasFormationVolumeFactor", default = "enabled")]
    pub write_gas_formation_volume_factor: bool,

    /// Formation volume factor of saturated oil Bo
    #[serde(rename = "EclOutputWriteOilFormationVolumeFactor", default = "enabled")]
    pub write_oil_formation_volume_factor: bool,

    /// Saturation pressure of oil
    #[serde(rename = "EclOutputWriteOilSaturationPressure", default = "enabled")]
    pub write_oil_saturation_pressure: bool,
}

impl Default for OutputConfiguration {
    fn default() -> Self {
        Self {
            write_saturations: true,
            write_pressures: true,
            write_gas_dissolution_factor: true,
            write_gas_formation_volume_factor: true,
            write_oil_formation_volume_factor: true,
            write_oil_saturation_pressure: true,
        }
    }
}

/// Layout of a configuration file: only the `[output]` table is read
#[derive(Deserialize)]
struct ConfigurationFile {
    #[serde(default)]
    output: OutputConfiguration,
}

impl OutputConfiguration {
    /// Configuration with every switch disabled
    pub fn none() -> Self {
        Self {
            write_saturations: false,
            write_pressures: false,
            write_gas_dissolution_factor: false,
            write_gas_formation_volume_factor: false,
            write_oil_formation_volume_factor: false,
            write_oil_saturation_pressure: false,
        }
    }

    /// Builder pattern: set saturations switch
    pub fn saturations(mut self, enabled: bool) -> Self {
        self.write_saturations = enabled;
        self
    }

    /// Builder pattern: set pressures switch
    pub fn pressures(mut self, enabled: bool) -> Self {
        self.write_pressures = enabled;
        self
    }

    /// Builder pattern: set the three PVT switches driven by oil pressure (Rs, Bg, Bo)
    pub fn pvt_properties(mut self, enabled: bool) -> Self {
        self.write_gas_dissolution_factor = enabled;
        self.write_gas_formation_volume_factor = enabled;
        self.write_oil_formation_volume_factor = enabled;
        self
    }

    /// Builder pattern: set saturation pressure switch
    pub fn saturation_pressure(mut self, enabled: bool) -> Self {
        self.write_oil_saturation_pressure = enabled;
        self
    }

    /// All known switches with their description and default
    pub fn parameters() -> &'static [ParameterInfo] {
        &PARAMETERS
    }

    /// Whether at least one quantity is collected
    pub fn any_enabled(&self) -> bool {
        PARAMETERS
            .iter()
            .any(|p| self.get(p.name).unwrap_or(false))
    }

    /// Read a switch by external name
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "EclOutputWriteSaturations" => Some(self.write_saturations),
            "EclOutputWritePressures" => Some(self.write_pressures),
            "EclOutputWriteGasDissolutionFactor" => Some(self.write_gas_dissolution_factor),
            "EclOutputWriteGasFormationVolumeFactor" => Some(self.write_gas_formation_volume_factor),
            "EclOutputWriteOilFormationVolumeFactor" => Some(self.write_oil_formation_volume_factor),
            "EclOutputWriteOilSaturationPressure" => Some(self.write_oil_saturation_pressure),
            _ => None,
        }
    }

    /// Set a switch by external name
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not one of [`parameters`](Self::parameters).
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), String> {
        let slot = match name {
            "EclOutputWriteSaturations" => &mut self.write_saturations,
            "EclOutputWritePressures" => &mut self.write_pressures,
            "EclOutputWriteGasDissolutionFactor" => &mut self.write_gas_dissolution_factor,
            "EclOutputWriteGasFormationVolumeFactor" => &mut self.write_gas_formation_volume_factor,
            "EclOutputWriteOilFormationVolumeFactor" => &mut self.write_oil_formation_volume_factor,
            "EclOutputWriteOilSaturationPressure" => &mut self.write_oil_saturation_pressure,
            _ => return Err(format!("Unknown output parameter '{}'", name)),
        };
        *slot = value;
        Ok(())
    }

    /// Parse the `[output]` table of a TOML document
    ///
    /// Missing keys keep their default; a missing table gives the default
    /// configuration. Unknown keys inside `[output]` are rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str::<ConfigurationFile>(content)
            .map(|file| file.output)
            .map_err(|e| format!("Invalid output configuration: {}", e))
    }

    /// Read and parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
