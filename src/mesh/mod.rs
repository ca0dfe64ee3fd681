//! Mesh and simulation context
//!
//! Output modules only see the mesh through two traits:
//!
//! - **`Simulation`**: discretization kind, DOF count, element list
//! - **`ElementContext`**: local→global DOF mapping, fluid state and PVT
//!   region of each local DOF
//!
//! The module also ships [`CellGrid`], an in-memory reference grid used
//! by tests, benchmarks and small drivers.
//!
//! # Quick Start Example
//!
//! ```rust
//! use blackoil_output::mesh::{CellGrid, ElementContext, Simulation};
//! use blackoil_output::physics::{BlackOilFluidState, PhaseArray};
//!
//! let states = vec![BlackOilFluidState::new(PhaseArray::splat(1.0e7), PhaseArray::new(0.7, 0.1, 0.2)); 3];
//! let grid = CellGrid::cell_centered(states, vec![0, 0, 1]).unwrap();
//!
//! for element in grid.elements() {
//!     for dof in 0..element.num_primary_dof(0) {
//!         let _global = element.global_space_index(dof, 0);
//!     }
//! }
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod grid;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand element traversal off to Rayon is a traversal
// concern, so it lives next to the mesh rather than in the output modules.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without a mutex on every output
// step. Relaxed ordering is sufficient: the value is a performance hint,
// not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of elements above which batch processing switches to
/// parallel iteration.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Batch element processing stays sequential when fewer elements than this
/// value are processed, and switches to Rayon above it, but only when the
/// crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use blackoil_output::mesh::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use blackoil_output::mesh::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{Discretization, ElementContext, Simulation};
pub use grid::{CellElement, CellGrid};

// =================================================================================================
// Tests
// =================================================================================================
