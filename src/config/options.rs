//! Options for the instrumented expression demo.
//!
//! `DemoOptions` controls how many times the example expression is evaluated
//! by the timing and profiling tasks and how many allocation sites the memory
//! task prints.

/// Demo parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoOptions {
    /// Loop count for the timing and profiling tasks
    pub iterations: usize,

    /// Number of allocation sites printed by the memory task
    pub top_n: usize,
}

impl Default for DemoOptions {
    fn default() -> Self {
        DemoOptions {
            iterations: 1000,
            top_n: 5,
        }
    }
}

impl DemoOptions {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}
