//! In-memory result writer
//!
//! Keeps a copy of every committed buffer, in commit order. Committing a
//! name that is already present replaces its buffer in place, so one
//! writer can be reused across output steps and always reflects the latest
//! step.

use crate::output::writer::{ProducerKind, ResultWriter, ScalarBufferSink};
use crate::output::{BufferType, ScalarBuffer};

/// One buffer received by a writer
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedBuffer {
    /// Field name (`PRESSURE`, `SWAT`, ...)
    pub name: String,

    /// Copy of the committed values
    pub values: ScalarBuffer,

    /// Storage location announced by the producer
    pub buffer_type: BufferType,
}

/// Result writer keeping committed buffers in memory
///
/// # Example
///
/// ```rust
/// use blackoil_output::output::export::MemoryWriter;
/// use blackoil_output::output::{ProducerKind, ResultWriter};
///
/// let mut ecl = MemoryWriter::new();
/// assert!(ecl.scalar_sink(ProducerKind::Ecl).is_some());
/// assert!(ecl.scalar_sink(ProducerKind::Vtk).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryWriter {
    accepted: Vec<ProducerKind>,
    buffers: Vec<CommittedBuffer>,
}

impl Default for MemoryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWriter {
    /// Writer accepting ECL producers
    pub fn new() -> Self {
        Self::accepting(&[ProducerKind::Ecl])
    }

    /// Writer accepting the given producer kinds only
    pub fn accepting(producers: &[ProducerKind]) -> Self {
        Self {
            accepted: producers.to_vec(),
            buffers: Vec::new(),
        }
    }

    /// Whether `producer` is accepted
    pub fn accepts(&self, producer: ProducerKind) -> bool {
        self.accepted.contains(&producer)
    }

    /// Values committed under `name`
    pub fn get(&self, name: &str) -> Option<&ScalarBuffer> {
        self.entry(name).map(|b| &b.values)
    }

    /// Full record committed under `name`
    pub fn entry(&self, name: &str) -> Option<&CommittedBuffer> {
        self.buffers.iter().find(|b| b.name == name)
    }

    /// Field names in commit order
    pub fn names(&self) -> Vec<&str> {
        self.buffers.iter().map(|b| b.name.as_str()).collect()
    }

    /// Iterate over `(name, buffer)` in commit order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommittedBuffer)> {
        self.buffers.iter().map(|b| (b.name.as_str(), b))
    }

    /// Number of distinct fields received
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether no field has been received yet
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Forget every received buffer
    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}

impl ScalarBufferSink for MemoryWriter {
    fn commit_scalar_buffer(&mut self, name: &str, buffer: &ScalarBuffer, buffer_type: BufferType) {
        match self.buffers.iter_mut().find(|b| b.name == name) {
            Some(existing) => {
                existing.values.clone_from(buffer);
                existing.buffer_type = buffer_type;
            }
            None => self.buffers.push(CommittedBuffer {
                name: name.to_string(),
                values: buffer.clone(),
                buffer_type,
            }),
        }
    }
}

impl ResultWriter for MemoryWriter {
    fn name(&self) -> &str {
        "MemoryWriter"
    }

    fn scalar_sink(&mut self, producer: ProducerKind) -> Option<&mut dyn ScalarBufferSink> {
        if self.accepts(producer) {
            Some(self as &mut dyn ScalarBufferSink)
        } else {
            None
        }
    }
}
