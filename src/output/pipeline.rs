//! One output step over several modules and writers
//!
//! The pipeline enforces the ordering output modules rely on:
//!
//! ```text
//! allocate (first step, or DOF count changed)
//!     │   ← barrier: buffers are sized before any element is processed
//! process_elements (every module, every element; rayon above threshold)
//!     │
//! commit (every module × every writer)
//! ```
//!
//! Writers that do not accept a module's producer kind are skipped by the
//! module itself, so heterogeneous modules can share one writer set.

use crate::mesh::{ElementContext, Simulation};
use crate::output::writer::ResultWriter;
use crate::output::OutputModule;

/// Drives output modules through allocate → process → commit
#[derive(Default)]
pub struct OutputPipeline {
    modules: Vec<Box<dyn OutputModule>>,
    allocated_dof: Option<usize>,
    steps: usize,
}

impl OutputPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an output module
    ///
    /// Forces a reallocation at the next step so the new module gets sized.
    pub fn add_module<M: OutputModule + 'static>(&mut self, module: M) {
        self.modules.push(Box::new(module));
        self.allocated_dof = None;
    }

    /// Registered modules
    pub fn modules(&self) -> &[Box<dyn OutputModule>] {
        &self.modules
    }

    /// Number of completed output steps
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Force a reallocation at the next step (e.g. after a mesh change)
    pub fn invalidate(&mut self) {
        self.allocated_dof = None;
    }

    /// Run one output step
    ///
    /// Every module is committed to every writer, in registration order.
    pub fn run_step<S: Simulation>(&mut self, simulation: &S, writers: &mut [&mut dyn ResultWriter]) {
        let dof_count = simulation.num_global_dof();
        if self.allocated_dof != Some(dof_count) {
            log::debug!(
                "OutputPipeline: allocating {} module(s) for {} DOFs",
                self.modules.len(),
                dof_count
            );
            for module in &mut self.modules {
                module.allocate(dof_count);
            }
            self.allocated_dof = Some(dof_count);
        }

        let elements = simulation.elements();
        let batch: Vec<&(dyn ElementContext + Sync)> = elements
            .iter()
            .map(|element| element as &(dyn ElementContext + Sync))
            .collect();

        for module in &mut self.modules {
            module.process_elements(&batch);
        }

        for module in &mut self.modules {
            for writer in writers.iter_mut() {
                module.commit(&mut **writer);
            }
        }

        self.steps += 1;
        log::debug!(
            "OutputPipeline: step {} done ({} elements, {} writer(s))",
            self.steps,
            batch.len(),
            writers.len()
        );
    }
}

impl std::fmt::Debug for OutputPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.modules.iter().map(|m| m.name()).collect();
        f.debug_struct("OutputPipeline")
            .field("modules", &names)
            .field("allocated_dof", &self.allocated_dof)
            .field("steps", &self.steps)
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
