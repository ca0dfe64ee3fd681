//! Helper functions for integration tests

use std::sync::{Mutex, MutexGuard};

use blackoil_output::mesh;
use blackoil_output::output::export::MemoryWriter;
use blackoil_output::output::ScalarBuffer;

static THRESHOLD_LOCK: Mutex<()> = Mutex::new(());

/// Scoped override of the global parallel threshold
///
/// Holds a lock so threshold-sensitive tests in one binary run one at a
/// time, and restores the previous value on drop, also when the test panics.
pub struct ThresholdOverride {
    previous: usize,
    _lock: MutexGuard<'static, ()>,
}

impl ThresholdOverride {
    pub fn set(threshold: usize) -> Self {
        let lock = THRESHOLD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = mesh::parallel_threshold();
        mesh::set_parallel_threshold(threshold);
        Self { previous, _lock: lock }
    }

    /// Threshold in effect before this override
    pub fn previous(&self) -> usize {
        self.previous
    }
}

impl Drop for ThresholdOverride {
    fn drop(&mut self) {
        mesh::set_parallel_threshold(self.previous);
    }
}

/// Assert that two buffers are close (within relative tolerance)
pub fn assert_buffers_close(actual: &ScalarBuffer, expected: &ScalarBuffer, tolerance: f64, message: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: Dimension mismatch", message);

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() <= tolerance * scale,
            "{}: DOF {} is {} (expected {}, tolerance {})",
            message, i, a, e, tolerance
        );
    }
}

/// `(name, values)` of every committed buffer, in commit order
pub fn committed_snapshot(writer: &MemoryWriter) -> Vec<(String, Vec<f64>)> {
    writer
        .iter()
        .map(|(name, committed)| (name.to_string(), committed.values.as_slice().to_vec()))
        .collect()
}
