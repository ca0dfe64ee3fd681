//! Result writer protocol
//!
//! A result writer persists whatever output modules hand to it. Modules do
//! not know the concrete writer type; they ask for a capability instead:
//!
//! ```text
//! module ──scalar_sink(ProducerKind::Ecl)──▶ writer
//!        ◀──── Some(&mut dyn ScalarBufferSink) │ None (silently ignored)
//! ```
//!
//! A writer that does not recognise the producer kind returns `None` and
//! the module commits nothing to it. This allows one set of writers to be
//! shared by heterogeneous output modules.

use std::fmt;

use crate::output::{BufferType, ScalarBuffer};

/// File-format family an output module produces for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProducerKind {
    /// ECL-style restart/summary fields (`PRESSURE`, `SWAT`, `RS`, ...)
    Ecl,

    /// VTK-style visualisation fields
    Vtk,
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerKind::Ecl => f.write_str("ECL"),
            ProducerKind::Vtk => f.write_str("VTK"),
        }
    }
}

/// Capability of accepting named scalar buffers
///
/// `commit_scalar_buffer` only borrows the buffer: the producing module keeps
/// ownership and will overwrite it at the next output step. Sinks copy what
/// they need to keep.
pub trait ScalarBufferSink {
    /// Accept one named buffer (one value per global DOF)
    fn commit_scalar_buffer(&mut self, name: &str, buffer: &ScalarBuffer, buffer_type: BufferType);
}

/// Downstream result writer
///
/// # Implementing this trait
///
/// Writers opt in per producer kind by returning a sink from
/// [`scalar_sink`](ResultWriter::scalar_sink). The default implementation
/// accepts nothing.
pub trait ResultWriter {
    /// Name of the writer (used for logging)
    fn name(&self) -> &str;

    /// Return the scalar-buffer sink if this writer accepts `producer`
    fn scalar_sink(&mut self, _producer: ProducerKind) -> Option<&mut dyn ScalarBufferSink> {
        None
    }
}
