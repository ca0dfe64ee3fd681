//! Visualization of committed output fields
//!
//! This module renders per-DOF fields using the `plotters` library.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **field_plots**: Field-vs-DOF plots and the `PlotWriter` result writer
//!
//! # When to Use Which Function
//!
//! | Use Case | Function |
//! |----------|----------|
//! | One image per committed field, per step | [`PlotWriter`] |
//! | Single field from a buffer | [`plot_field`] |
//! | Several fields on one chart | [`plot_fields`] |

pub mod config;
pub mod field_plots;

pub use config::PlotConfig;
pub use field_plots::{field_unit_label, plot_field, plot_fields, ImageFormat, PlotWriter};
