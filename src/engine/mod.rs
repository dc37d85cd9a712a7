//! Exact 0-1 optimization engines.

pub mod milp;
pub mod result;
pub mod stats;

pub use milp::MilpEngine;
pub use result::{EngineOutcome, Solution, SolverResult, TerminationReason};
pub use stats::SolverStatistics;

use std::time::Duration;

use crate::model::Model;

/// Anything that can minimize a [`Model`] under a wall-clock budget.
pub trait SolveEngine {
    fn name(&self) -> &'static str;

    fn solve(&mut self, model: &Model, time_limit: Duration) -> EngineOutcome;
}

impl SolveEngine for MilpEngine {
    fn name(&self) -> &'static str {
        "highs-milp"
    }

    fn solve(&mut self, model: &Model, time_limit: Duration) -> EngineOutcome {
        self.solve_with_time_limit(model, time_limit)
    }
}
