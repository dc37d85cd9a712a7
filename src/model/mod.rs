//! 0-1 linear model of a rostering problem.
//!
//! Decisions exist only for eligible pairs. Hard rules are
//! [`LinearConstraint`] rows with positive coefficients; soft rules live in
//! the [`Objective`].

pub mod builder;
pub mod constraint;
pub mod decision;
pub mod objective;

pub use builder::{ModelBuilder, FORMULATION_VERSION, MIN_REST_MINUTES};
pub use constraint::{ConstraintKind, LinearConstraint, Sense, Term};
pub use decision::{Decision, DecisionArena, DecisionId};
pub use objective::{ConsecutiveTerm, DayIndicator, Objective};

use crate::domain::RosterProblem;

#[derive(Debug, Clone)]
pub struct Model {
    pub decisions: DecisionArena,
    pub constraints: Vec<LinearConstraint>,
    pub objective: Objective,
}

impl Model {
    /// Builds the model for `problem`.
    pub fn build(problem: &RosterProblem) -> Self {
        ModelBuilder::new(problem).build()
    }

    #[inline]
    pub fn num_decisions(&self) -> usize {
        self.decisions.len()
    }

    pub fn count(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }

    /// True if every row holds under `values`.
    pub fn is_feasible(&self, values: &[bool]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(values))
    }
}
