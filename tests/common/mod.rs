//! Common utilities for integration tests

pub mod fixtures;
pub mod test_helpers;

// Re-export commonly used items
pub use fixtures::{standard_pvt, uniform_grid, varied_grid, OffsetElement, RejectingWriter};
pub use test_helpers::{assert_buffers_close, committed_snapshot, ThresholdOverride};
