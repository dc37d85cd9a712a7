//! Solve statistics.

use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverStatistics {
    /// One binary column per eligible (shift, employee) pair.
    pub decision_variables: u64,
    /// Day indicator and consecutive-pair columns.
    pub auxiliary_variables: u64,
    /// Rows handed to the solver.
    pub rows: u64,
    /// Rows settled before the solver ran.
    pub rows_presolved: u64,
    pub solutions_found: u64,
    pub time_total: Duration,
}

impl SolverStatistics {
    #[inline]
    pub fn on_row(&mut self) {
        self.rows = self.rows.saturating_add(1);
    }

    #[inline]
    pub fn on_row_presolved(&mut self) {
        self.rows_presolved = self.rows_presolved.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    pub fn variables(&self) -> u64 {
        self.decision_variables.saturating_add(self.auxiliary_variables)
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MILP statistics:")?;
        writeln!(f, "  Decision variables:    {}", self.decision_variables)?;
        writeln!(f, "  Auxiliary variables:   {}", self.auxiliary_variables)?;
        writeln!(f, "  Rows:                  {}", self.rows)?;
        writeln!(f, "  Rows presolved:        {}", self.rows_presolved)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}
