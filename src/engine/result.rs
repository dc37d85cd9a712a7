use crate::model::DecisionId;

use super::stats::SolverStatistics;

/// A complete assignment satisfying every row of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub objective: i64,
    /// Decisions valued true, ascending.
    pub selected: Vec<DecisionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have proven that the model is infeasible.
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(Solution),
    /// We have found a solution, but not proven its optimality.
    Feasible(Solution),
    /// The engine stopped without a solution and without proving
    /// infeasibility.
    Unknown,
}

impl SolverResult {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(s) => write!(f, "Optimal(objective={})", s.objective),
            SolverResult::Feasible(s) => write!(f, "Feasible(objective={})", s.objective),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver closed: optimality or infeasibility is proven.
    Exhausted,
    /// The solver stopped early. The string says why.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Search exhausted"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of an engine run after termination.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub result: SolverResult,
    pub reason: TerminationReason,
    pub statistics: SolverStatistics,
}

impl EngineOutcome {
    /// Maps the best solution in hand and the termination reason to a result.
    ///
    /// A closed search proves optimality of its incumbent, or infeasibility
    /// without one. An aborted search proves nothing.
    pub fn from_search(
        best: Option<Solution>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        let result = match (&reason, best) {
            (TerminationReason::Exhausted, Some(s)) => SolverResult::Optimal(s),
            (TerminationReason::Exhausted, None) => SolverResult::Infeasible,
            (TerminationReason::Aborted(_), Some(s)) => SolverResult::Feasible(s),
            (TerminationReason::Aborted(_), None) => SolverResult::Unknown,
        };
        Self {
            result,
            reason,
            statistics,
        }
    }
}
