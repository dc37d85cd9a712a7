//! Solver orchestration for shift rostering.
//!
//! `normalize -> eligibility -> model -> engine -> result`. Every solve builds
//! its own model and engine, so concurrent solves share nothing.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::domain::RosterProblem;
use crate::dto::{SolveRequest, SolveResponse};
use crate::engine::{EngineOutcome, MilpEngine, SolveEngine, SolverResult, SolverStatistics};
use crate::error::ValidationError;
use crate::model::Model;
use crate::normalize::normalize;

#[cfg(feature = "console")]
use crate::console;

/// Default solving time: 10 seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 10;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven best roster.
    Optimal,
    /// Valid roster; the budget ran out before optimality was proven.
    Feasible,
    /// No roster satisfies the hard rules.
    Infeasible,
    /// The budget ran out with neither a roster nor a proof of infeasibility.
    Unknown,
}

impl SolveStatus {
    /// Returns the status as rendered on the wire.
    ///
    /// ```
    /// use shift_roster::solver::SolveStatus;
    ///
    /// assert_eq!(SolveStatus::Optimal.as_str(), "OPTIMAL");
    /// assert_eq!(SolveStatus::Unknown.as_str(), "UNKNOWN");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub shift_id: String,
    pub employee_id: String,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// `None` unless a roster is in hand.
    pub objective: Option<i64>,
    /// Sorted by shift, then employee. Empty unless a roster is in hand.
    pub assignments: Vec<Assignment>,
    pub statistics: SolverStatistics,
    /// Wall time from normalized input to result.
    pub duration: Duration,
}

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Stop after this duration. Expiry yields FEASIBLE or UNKNOWN.
    pub time_limit: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }

    /// Applies the request's `timeLimitSeconds` override, if any.
    pub fn for_request(&self, request: &SolveRequest) -> Result<Self, ValidationError> {
        match request.time_limit_seconds {
            None => Ok(*self),
            Some(seconds) => Duration::try_from_secs_f64(seconds)
                .map(Self::with_time_limit)
                .map_err(|_| ValidationError::InvalidTimeLimit {
                    seconds: seconds.to_string(),
                }),
        }
    }
}

/// Validates `request` and solves it.
///
/// Malformed input is the only error. Every well-formed request gets a
/// result whose status is authoritative.
pub fn solve(request: &SolveRequest, config: &SolverConfig) -> Result<SolveResult, ValidationError> {
    let config = config.for_request(request)?;
    let problem = normalize(request)?;
    Ok(solve_problem(&problem, &config))
}

/// Solves an already normalized problem with the HiGHS engine.
pub fn solve_problem(problem: &RosterProblem, config: &SolverConfig) -> SolveResult {
    solve_with_engine(problem, config, &mut MilpEngine::new())
}

/// Solves `problem` with any engine implementing [`SolveEngine`].
pub fn solve_with_engine<E>(problem: &RosterProblem, config: &SolverConfig, engine: &mut E) -> SolveResult
where
    E: SolveEngine,
{
    let solve_start = Instant::now();

    info!(
        shifts = problem.shifts.len(),
        employees = problem.employees.len(),
        pins = problem.pins.len(),
        time_limit_secs = config.time_limit.as_secs_f64(),
        engine = engine.name(),
        "Starting roster solve"
    );

    let model = Model::build(problem);

    #[cfg(feature = "console")]
    console::print_problem(problem, &model);

    let outcome = engine.solve(&model, config.time_limit);
    debug!(
        reason = %outcome.reason,
        variables = outcome.statistics.variables(),
        rows = outcome.statistics.rows,
        rows_presolved = outcome.statistics.rows_presolved,
        solutions = outcome.statistics.solutions_found,
        "Engine finished"
    );

    let result = extract(problem, &model, outcome, solve_start.elapsed());

    info!(
        status = result.status.as_str(),
        objective = ?result.objective,
        assignments = result.assignments.len(),
        duration_secs = result.duration.as_secs_f64(),
        "Roster solve complete"
    );

    #[cfg(debug_assertions)]
    {
        let violations = crate::audit::check(problem, &result);
        debug_assert!(
            violations.is_empty(),
            "solver returned a roster with violations: {violations:?}"
        );
    }

    #[cfg(feature = "console")]
    console::print_solving_ended(&result);

    result
}

/// Maps the engine outcome back onto shift and employee ids.
fn extract(problem: &RosterProblem, model: &Model, outcome: EngineOutcome, duration: Duration) -> SolveResult {
    let (status, solution) = match outcome.result {
        SolverResult::Optimal(s) => (SolveStatus::Optimal, Some(s)),
        SolverResult::Feasible(s) => (SolveStatus::Feasible, Some(s)),
        SolverResult::Infeasible => (SolveStatus::Infeasible, None),
        SolverResult::Unknown => (SolveStatus::Unknown, None),
    };

    let objective = solution.as_ref().map(|s| s.objective);
    let mut assignments: Vec<Assignment> = solution
        .map(|s| {
            s.selected
                .iter()
                .map(|&id| {
                    let decision = model.decisions.decision(id);
                    Assignment {
                        shift_id: problem.shifts[decision.shift].id.clone(),
                        employee_id: problem.employees[decision.employee].id.clone(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    assignments.sort();

    SolveResult {
        status,
        objective,
        assignments,
        statistics: outcome.statistics,
        duration,
    }
}

// ============================================================================
// Background jobs
// ============================================================================

/// Lifecycle of a background solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Solving,
    Solved,
}

/// A background solve and, once finished, its result.
pub struct SolveJob {
    pub id: String,
    pub status: JobStatus,
    pub result: Option<SolveResult>,
}

impl SolveJob {
    pub fn new(id: String) -> Self {
        Self {
            id,
            status: JobStatus::Solving,
            result: None,
        }
    }

    /// Wire view of the finished result, if any.
    pub fn response(&self) -> Option<SolveResponse> {
        self.result.as_ref().map(SolveResponse::from)
    }
}

/// Tracks background solves by id.
///
/// # Examples
///
/// ```
/// use shift_roster::solver::{JobStatus, SolverService};
///
/// let service = SolverService::new();
/// let job = service.create_job("job-1".to_string());
/// assert_eq!(job.read().status, JobStatus::Solving);
/// assert_eq!(service.list_jobs(), vec!["job-1".to_string()]);
/// ```
pub struct SolverService {
    jobs: RwLock<HashMap<String, Arc<RwLock<SolveJob>>>>,
}

impl SolverService {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn create_job(&self, id: String) -> Arc<RwLock<SolveJob>> {
        let job = Arc::new(RwLock::new(SolveJob::new(id.clone())));
        self.jobs.write().insert(id, job.clone());
        job
    }

    pub fn get_job(&self, id: &str) -> Option<Arc<RwLock<SolveJob>>> {
        self.jobs.read().get(id).cloned()
    }

    pub fn list_jobs(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Forgets a job. A solve still running finishes into the dropped job.
    pub fn remove_job(&self, id: &str) -> Option<Arc<RwLock<SolveJob>>> {
        self.jobs.write().remove(id)
    }

    /// Solves `problem` on the blocking pool and stores the result in `job`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_solving(&self, job: Arc<RwLock<SolveJob>>, problem: RosterProblem, config: SolverConfig) {
        tokio::task::spawn_blocking(move || {
            let job_id = job.read().id.clone();
            info!(job_id = %job_id, "Background solve started");

            let result = solve_problem(&problem, &config);

            let mut guard = job.write();
            guard.result = Some(result);
            guard.status = JobStatus::Solved;
        });
    }
}

impl Default for SolverService {
    fn default() -> Self {
        Self::new()
    }
}
