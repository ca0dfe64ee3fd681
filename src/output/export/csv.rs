//! CSV export of committed output fields
//!
//! The [`CsvWriter`] is a result writer: output modules commit their
//! buffers into it, then [`CsvWriter::write_step`] dumps one output step to
//! a CSV file that Excel, Python pandas, MATLAB and most data analysis
//! tools can read.
//!
//! # Features
//!
//! - **One row per DOF**: `dof` column followed by one column per field
//! - **Commit order**: columns appear in the order modules committed them
//! - **Metadata support**: Optional `#` header with case information
//! - **Customizable**: Delimiter, precision, decimal separator
//! - **Validation**: Checks for empty data, mismatched lengths, NaN/Inf
//!
//! # Quick Example
//!
//! ```rust,ignore
//! use blackoil_output::output::export::{CsvConfig, CsvMetadata, CsvWriter};
//!
//! let config = CsvConfig::default()
//!     .with_metadata(CsvMetadata::from_step("SPE1", 86400.0, 1));
//! let mut writer = CsvWriter::new(config);
//!
//! pipeline.run_step(&grid, &mut [&mut writer]);
//! writer.write_step("step_0001.csv")?;
//! ```
//!
//! **Output** (`step_0001.csv`):
//! ```csv
//! # Black-Oil Output Data
//! # Generated: 2026-02-11T15:30:00Z
//! # Case: SPE1
//! # Time: 86400 s
//! # Report Step: 1
//! #
//! dof,PRESSURE,PGAS,PWAT,SWAT,SGAS,RS,BG,BOSAT,PSAT
//! 0,250.000000,250.000000,260.000000,...
//! ```

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::output::export::memory::MemoryWriter;
use crate::output::writer::{ProducerKind, ResultWriter, ScalarBufferSink};

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use blackoil_output::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the DOF index column (default: "dof")
    pub dof_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            dof_header: "dof".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Case name (e.g., "SPE1")
    pub case_name: Option<String>,

    /// Producer of the data
    pub simulator: Option<String>,

    /// Simulated time of the step (seconds)
    pub time: Option<f64>,

    /// Report step number
    pub report_step: Option<usize>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing one report step of a case
    pub fn from_step(case_name: &str, time: f64, report_step: usize) -> Self {
        Self {
            case_name: Some(case_name.to_string()),
            time: Some(time),
            report_step: Some(report_step),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> Result<(), Box<dyn Error>> {
    writeln!(out, "# Black-Oil Output Data")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(case_name) = &metadata.case_name {
        writeln!(out, "# Case: {}", case_name)?;
    }
    if let Some(simulator) = &metadata.simulator {
        writeln!(out, "# Simulator: {}", simulator)?;
    }
    if let Some(time) = metadata.time {
        writeln!(out, "# Time: {} s", time)?;
    }
    if let Some(step) = metadata.report_step {
        writeln!(out, "# Report Step: {}", step)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;

    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Check that the columns can be written as a rectangular table
fn validate_columns(names: &[&str], columns: &[&[f64]], config: &CsvConfig) -> Result<(), String> {
    if columns.is_empty() || columns[0].is_empty() {
        return Err("Empty data: at least one non-empty field is required".to_string());
    }

    if names.len() != columns.len() {
        return Err(format!(
            "Data length mismatch: {} field names versus {} columns",
            names.len(),
            columns.len()
        ));
    }

    if config.delimiter == config.decimal_separator {
        return Err(format!(
            "Invalid configuration: delimiter and decimal separator are both '{}'",
            config.delimiter
        ));
    }

    let rows = columns[0].len();
    for (name, column) in names.iter().zip(columns) {
        if column.len() != rows {
            return Err(format!(
                "Field [{}] length mismatch: {} values versus {} DOFs",
                name,
                column.len(),
                rows
            ));
        }

        if column.iter().any(|v| !v.is_finite()) {
            return Err(format!("Invalid data: NaN or Inf detected in field {}", name));
        }
    }

    Ok(())
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export named per-DOF columns to CSV
///
/// Writes a `dof` column followed by one column per field.
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths
/// - NaN or Inf values
/// - Delimiter equal to the decimal separator
/// - File creation errors
pub fn export_fields_csv<P: AsRef<Path>>(
    names: &[&str],
    columns: &[&[f64]],
    output_path: P,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Validation =============================

    validate_columns(names, columns, configuration)?;

    // ============================= Open File ==============================

    let mut out = BufWriter::new(File::create(output_path.as_ref())?);

    // ============================= Write Metadata =========================

    if configuration.include_metadata {
        if let Some(metadata) = &configuration.metadata {
            write_metadata_header(&mut out, metadata)?;
        }
    }

    // ============================= Write Header ===========================

    write!(out, "{}", configuration.dof_header)?;
    for name in names {
        write!(out, "{}{}", configuration.delimiter, name)?;
    }
    writeln!(out)?;

    // ============================= Write Data =============================

    for dof in 0..columns[0].len() {
        write!(out, "{}", dof)?;
        for column in columns {
            write!(out, "{}{}", configuration.delimiter, format_number(column[dof], configuration))?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    log::debug!(
        "CSV export: {} fields x {} DOFs to '{}'",
        names.len(),
        columns[0].len(),
        output_path.as_ref().display()
    );

    Ok(())
}

// =============================================================================
// Writer
// =============================================================================

/// Result writer collecting one output step and dumping it to CSV
#[derive(Debug, Clone)]
pub struct CsvWriter {
    config: CsvConfig,
    fields: MemoryWriter,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new(CsvConfig::default())
    }
}

impl CsvWriter {
    /// CSV writer accepting ECL producers
    pub fn new(config: CsvConfig) -> Self {
        Self {
            config,
            fields: MemoryWriter::new(),
        }
    }

    /// Configuration used by [`write_step`](Self::write_step)
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Fields collected so far
    pub fn fields(&self) -> &MemoryWriter {
        &self.fields
    }

    /// Write the collected fields to `path`
    ///
    /// # Errors
    ///
    /// Fails if nothing was committed, if fields have different lengths or
    /// hold non-finite values, or if the file cannot be written.
    pub fn write_step<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let names = self.fields.names();
        let columns: Vec<&[f64]> = self.fields.iter().map(|(_, b)| b.values.as_slice()).collect();
        export_fields_csv(&names, &columns, path, Some(&self.config))
    }

    /// Forget the collected fields before the next step
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl ResultWriter for CsvWriter {
    fn name(&self) -> &str {
        "CsvWriter"
    }

    fn scalar_sink(&mut self, producer: ProducerKind) -> Option<&mut dyn ScalarBufferSink> {
        self.fields.scalar_sink(producer)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
