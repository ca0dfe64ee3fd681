//! Static plots of committed per-DOF fields
//!
//! Uses `plotters` to render each field as a line against the DOF index,
//! to PNG or SVG depending on the file extension.
//!
//! # Example: Plot writer
//!
//! ```rust,ignore
//! use blackoil_output::output::visualization::{ImageFormat, PlotWriter};
//!
//! let mut plots = PlotWriter::new("plots", ImageFormat::Svg);
//! pipeline.run_step(&grid, &mut [&mut plots]);
//!
//! // plots/PRESSURE.svg, plots/PGAS.svg, ...
//! let written = plots.write_step()?;
//! ```
//!
//! # Example: Direct plotting
//!
//! ```rust,ignore
//! use blackoil_output::output::visualization::{plot_field, PlotConfig};
//!
//! plot_field(pressure.as_slice(), "pressure.png", Some(&PlotConfig::field("PRESSURE")))?;
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::output::blackoil::{BG, BOSAT, PGAS, PRESSURE, PSAT, PWAT, RS, SGAS, SWAT};
use crate::output::export::MemoryWriter;
use crate::output::visualization::config::PlotConfig;
use crate::output::writer::{ProducerKind, ResultWriter, ScalarBufferSink};

// =================================================================================================
// Helpers
// =================================================================================================

/// Y-axis label with unit for a known field name
pub fn field_unit_label(name: &str) -> &'static str {
    match name {
        PRESSURE | PGAS | PWAT => "Pressure (bar)",
        SWAT | SGAS => "Saturation (-)",
        RS => "Rs (sm3/sm3)",
        BG => "Bg (rm3/sm3)",
        BOSAT => "Bo (rm3/sm3)",
        PSAT => "Saturation pressure (Pa)",
        _ => "Value",
    }
}

/// Y range covering every value, widened when all values are equal
fn value_range(columns: &[&[f64]]) -> (f64, f64) {
    let (min, max) = columns
        .iter()
        .flat_map(|c| c.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if max - min > 0.0 {
        let pad = 0.05 * (max - min);
        (min - pad, max + pad)
    } else {
        let pad = (0.1 * min.abs()).max(1e-10);
        (min - pad, max + pad)
    }
}

fn validate(names: &[&str], columns: &[&[f64]]) -> Result<(), String> {
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
    for (name, column) in names.iter().zip(columns) {
        if column.len() != columns[0].len() {
            return Err(format!("Field [{}] length mismatch", name));
        }
        if column.iter().any(|v| !v.is_finite()) {
            return Err(format!("Invalid data: NaN or Inf detected in field {}", name));
        }
    }
    Ok(())
}

// =================================================================================================
// Plot Functions
// =================================================================================================

/// Plot one per-DOF field
///
/// # Errors
///
/// Returns `Err` on empty or non-finite data, or if the backend cannot
/// write to `output_path`.
pub fn plot_field<P: AsRef<Path>>(
    values: &[f64],
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = PlotConfig::default();
    let config = config.unwrap_or(&default_config);
    let name = config.title.clone();
    plot_fields(&[name.as_str()], &[values], output_path, Some(config))
}

/// Plot several per-DOF fields of equal length on one chart
///
/// # Errors
///
/// Returns `Err` on empty, mismatched or non-finite data, or if the
/// backend cannot write to `output_path`.
pub fn plot_fields<P: AsRef<Path>>(
    names: &[&str],
    columns: &[&[f64]],
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    validate(names, columns)?;

    let default_config = PlotConfig::default();
    let config = config.unwrap_or(&default_config);

    let path = output_path.as_ref();
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(path, (config.width, config.height));
            plot_fields_impl(backend, names, columns, config)
        }
        _ => {
            let backend = BitMapBackend::new(path, (config.width, config.height));
            plot_fields_impl(backend, names, columns, config)
        }
    }
}

// =================================================================================================
// Private Plot Implementation
// =================================================================================================

fn plot_fields_impl<DB: DrawingBackend>(
    backend: DB,
    names: &[&str],
    columns: &[&[f64]],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let max_dof = (columns[0].len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = value_range(columns);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_dof, y_min..y_max)?;

    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&config.ylabel)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.3}", y))
            .draw()?;
    }

    for (k, (name, column)) in names.iter().zip(columns).enumerate() {
        let color = if columns.len() == 1 {
            config.line_color
        } else {
            config.get_field_color(k)
        };

        chart
            .draw_series(LineSeries::new(
                column.iter().enumerate().map(|(dof, v)| (dof as f64, *v)),
                ShapeStyle::from(&color).stroke_width(config.line_width),
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    if columns.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&config.background.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Writer
// =================================================================================================

/// Image format written by [`PlotWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Result writer rendering each committed field to `<directory>/<NAME>.<ext>`
pub struct PlotWriter {
    directory: PathBuf,
    format: ImageFormat,
    config: PlotConfig,
    fields: MemoryWriter,
}

impl PlotWriter {
    /// Plot writer accepting ECL producers, with the default plot config
    pub fn new<P: Into<PathBuf>>(directory: P, format: ImageFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
            config: PlotConfig::default(),
            fields: MemoryWriter::new(),
        }
    }

    /// Builder pattern: base plot config (title and y label are set per field)
    pub fn with_config(mut self, config: PlotConfig) -> Self {
        self.config = config;
        self
    }

    /// Fields collected so far
    pub fn fields(&self) -> &MemoryWriter {
        &self.fields
    }

    /// Render every collected field and return the written paths
    ///
    /// Creates the directory if needed.
    pub fn write_step(&self) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        fs::create_dir_all(&self.directory)?;

        let mut written = Vec::with_capacity(self.fields.len());
        for (name, committed) in self.fields.iter() {
            let path = self.directory.join(format!("{}.{}", name, self.format.extension()));

            let config = self.config.clone().title(name).ylabel(field_unit_label(name));

            plot_field(committed.values.as_slice(), &path, Some(&config))?;
            log::debug!("PlotWriter: wrote '{}'", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Forget the collected fields before the next step
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl ResultWriter for PlotWriter {
    fn name(&self) -> &str {
        "PlotWriter"
    }

    fn scalar_sink(&mut self, producer: ProducerKind) -> Option<&mut dyn ScalarBufferSink> {
        self.fields.scalar_sink(producer)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
