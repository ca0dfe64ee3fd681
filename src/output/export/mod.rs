//! Result writers persisting committed fields
//!
//! # Architecture
//!
//! Every writer implements [`ResultWriter`](crate::output::ResultWriter)
//! and opts in to producer kinds through
//! [`scalar_sink`](crate::output::ResultWriter::scalar_sink). Each format
//! is an independent implementation in its own sub-module: adding a format
//! means adding a file, never modifying the output modules.
//!
//! # Available writers
//!
//! | Writer | Module | Persists to |
//! |--------|--------|-------------|
//! | [`MemoryWriter`] | [`memory`] | in-memory copies (tests, post-processing) |
//! | [`CsvWriter`] | [`csv`] | one CSV file per output step |
//! | [`PlotWriter`](crate::output::visualization::PlotWriter) | `visualization` | PNG/SVG per field |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use blackoil_output::output::export::{CsvWriter, MemoryWriter};
//!
//! let mut memory = MemoryWriter::new();
//! let mut csv = CsvWriter::default();
//!
//! pipeline.run_step(&grid, &mut [&mut memory, &mut csv]);
//! csv.write_step("step_0001.csv")?;
//! ```

pub mod csv;
pub mod memory;

// Re-export the most commonly used types at the module level so users can write:
//   use blackoil_output::output::export::{CsvWriter, MemoryWriter};
pub use csv::{export_fields_csv, CsvConfig, CsvMetadata, CsvWriter};
pub use memory::{CommittedBuffer, MemoryWriter};
