//! Mixed-integer engine: the [`Model`] handed to HiGHS through `good_lp`.
//!
//! Every decision becomes a binary column and every row a linear
//! constraint. The consecutive-day penalty is linearized with two more
//! column families:
//!
//! - `w` per day indicator: `w >= x` for each member, and `w <= Σ members`.
//! - `p` per consecutive term: `p >= w1 + w2 - 1`, `p <= w1`, `p <= w2`.
//!
//! Objective coefficients are integers, so HiGHS runs with a zero relative
//! gap and an absolute gap below one unit. An optimum it reports is exact.

use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::solvers::SolutionStatus;
use good_lp::*;
use tracing::{debug, warn};

use crate::model::{DecisionId, Model, Sense};

use super::result::{EngineOutcome, Solution as Incumbent, TerminationReason};
use super::stats::SolverStatistics;

/// HiGHS stops once incumbent and bound are this close.
const MIP_ABS_GAP: f64 = 0.5;

/// A decision column counts as selected at or above this value.
const SELECTED_THRESHOLD: f64 = 0.5;

fn time_limit_reached() -> TerminationReason {
    TerminationReason::Aborted("time limit".to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MilpEngine;

impl MilpEngine {
    pub fn new() -> Self {
        Self
    }

    /// Minimizes `model` within `time_limit`.
    ///
    /// Contradictory rows are caught before HiGHS runs, so they prove
    /// infeasibility even with a zero budget.
    pub fn solve_with_time_limit(&self, model: &Model, time_limit: Duration) -> EngineOutcome {
        let start = Instant::now();
        let mut stats = SolverStatistics::default();

        let finish = |best: Option<Incumbent>, reason: TerminationReason, mut stats: SolverStatistics| {
            stats.set_total_time(start.elapsed());
            EngineOutcome::from_search(best, reason, stats)
        };

        let mut rows = Vec::with_capacity(model.constraints.len());
        for row in &model.constraints {
            if row.is_contradiction() {
                debug!(row = %row, "Contradictory row");
                stats.on_row_presolved();
                return finish(None, TerminationReason::Exhausted, stats);
            }
            if row.terms.is_empty() {
                stats.on_row_presolved();
                continue;
            }
            rows.push(row);
        }

        // HiGHS refuses a model without columns.
        if model.num_decisions() == 0 {
            stats.on_solution_found();
            let best = Incumbent {
                objective: model.objective.evaluate(&[]),
                selected: Vec::new(),
            };
            return finish(Some(best), TerminationReason::Exhausted, stats);
        }

        let remaining = time_limit.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return finish(None, time_limit_reached(), stats);
        }

        let mut vars = variables!();
        let x: Vec<Variable> = (0..model.num_decisions())
            .map(|i| vars.add(variable().binary().name(format!("x_{i}"))))
            .collect();
        let w: Vec<Variable> = model
            .objective
            .day_indicators
            .iter()
            .map(|d| vars.add(variable().binary().name(format!("w_{}_{}", d.employee, d.weekday))))
            .collect();
        let p: Vec<Variable> = (0..model.objective.consecutive.len())
            .map(|t| vars.add(variable().binary().name(format!("p_{t}"))))
            .collect();
        stats.decision_variables = x.len() as u64;
        stats.auxiliary_variables = (w.len() + p.len()) as u64;

        // Objective: Σ cost·x + Σ weight·p
        let objective = model
            .objective
            .costs
            .iter()
            .zip(&x)
            .fold(Expression::from(0.0), |acc, (&cost, &xi)| acc + (cost as f64) * xi);
        let objective = model
            .objective
            .consecutive
            .iter()
            .zip(&p)
            .fold(objective, |acc, (term, &pt)| acc + (term.weight as f64) * pt);

        let mut prob = vars
            .minimise(objective)
            .using(highs)
            .with_time_limit(remaining.as_secs_f64())
            .set_option("mip_rel_gap", 0.0)
            .set_option("mip_abs_gap", MIP_ABS_GAP);

        for row in rows {
            let lhs = row
                .terms
                .iter()
                .fold(Expression::from(0.0), |acc, t| {
                    acc + (t.coefficient as f64) * x[t.decision.get()]
                });
            let rhs = row.rhs as f64;
            match row.sense {
                Sense::Equal => prob.add_constraint(lhs.eq(rhs)),
                Sense::AtMost => prob.add_constraint(lhs.leq(rhs)),
            };
            stats.on_row();
        }

        // worksDay(e, d) is the OR of its members.
        for (indicator, &wk) in model.objective.day_indicators.iter().zip(&w) {
            for member in &indicator.members {
                let xm = x[member.get()];
                prob.add_constraint(constraint!(wk >= xm));
                stats.on_row();
            }
            let any = indicator
                .members
                .iter()
                .fold(Expression::from(0.0), |acc, m| acc + x[m.get()]);
            prob.add_constraint(constraint!(wk <= any));
            stats.on_row();
        }

        // pair = worksDay(first) AND worksDay(second)
        for (term, &pt) in model.objective.consecutive.iter().zip(&p) {
            let (first, second) = (w[term.first], w[term.second]);
            prob.add_constraint(constraint!(pt + 1.0 >= first + second));
            prob.add_constraint(constraint!(pt <= first));
            prob.add_constraint(constraint!(pt <= second));
            stats.rows = stats.rows.saturating_add(3);
        }

        debug!(
            decisions = stats.decision_variables,
            auxiliary = stats.auxiliary_variables,
            rows = stats.rows,
            time_limit_secs = remaining.as_secs_f64(),
            "Handing model to HiGHS"
        );

        let solution = match prob.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                return finish(None, TerminationReason::Exhausted, stats);
            }
            Err(err) => {
                warn!(error = %err, "HiGHS stopped without a roster");
                return finish(None, TerminationReason::Aborted(err.to_string()), stats);
            }
        };

        let reason = match solution.status() {
            SolutionStatus::Optimal => TerminationReason::Exhausted,
            _ => time_limit_reached(),
        };

        let values: Vec<bool> = x
            .iter()
            .map(|&xi| solution.value(xi) >= SELECTED_THRESHOLD)
            .collect();

        // A stopped run can hand back columns that are not a roster.
        if !model.is_feasible(&values) {
            debug!(reason = %reason, "HiGHS returned no feasible incumbent");
            let reason = match reason {
                TerminationReason::Exhausted => time_limit_reached(),
                aborted => aborted,
            };
            return finish(None, reason, stats);
        }

        stats.on_solution_found();
        let best = Incumbent {
            objective: model.objective.evaluate(&values),
            selected: values
                .iter()
                .enumerate()
                .filter(|(_, &v)| v)
                .map(|(i, _)| DecisionId::new(i))
                .collect(),
        };
        finish(Some(best), reason, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::SolverResult;
    use crate::model::{
        ConsecutiveTerm, ConstraintKind, DayIndicator, DecisionArena, LinearConstraint, Objective, Term,
    };

    /// `n` decisions for shift 0, one per employee.
    fn model(costs: Vec<i64>, constraints: Vec<LinearConstraint>) -> Model {
        let mut decisions = DecisionArena::new(1, costs.len());
        for e in 0..costs.len() {
            decisions.insert(0, e);
        }
        Model {
            decisions,
            constraints,
            objective: Objective {
                costs,
                day_indicators: Vec::new(),
                consecutive: Vec::new(),
            },
        }
    }

    fn ids(range: std::ops::Range<usize>) -> Vec<DecisionId> {
        range.map(DecisionId::new).collect()
    }

    fn solve(model: &Model) -> EngineOutcome {
        MilpEngine::new().solve_with_time_limit(model, Duration::from_secs(30))
    }

    #[test]
    fn test_picks_cheapest_cover() {
        let m = model(
            vec![500, 200, 300, 100],
            vec![LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..4), 2)],
        );
        let outcome = solve(&m);
        let SolverResult::Optimal(solution) = outcome.result else {
            panic!("expected optimal, got {}", outcome.result);
        };
        assert_eq!(solution.objective, 300);
        assert_eq!(solution.selected, vec![DecisionId::new(1), DecisionId::new(3)]);
        assert_eq!(outcome.reason, TerminationReason::Exhausted);
        assert_eq!(outcome.statistics.decision_variables, 4);
        assert_eq!(outcome.statistics.solutions_found, 1);
    }

    #[test]
    fn test_conflicts_force_pricier_choice() {
        // Cover two rows; the two cheapest picks share a conflict.
        let m = model(
            vec![100, 900, 150, 200],
            vec![
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..2), 1),
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(2..4), 1),
                LinearConstraint::at_most(
                    ConstraintKind::NoOverlap,
                    &[DecisionId::new(0), DecisionId::new(2)],
                    1,
                ),
            ],
        );
        let outcome = solve(&m);
        assert_eq!(outcome.result.solution().map(|s| s.objective), Some(300));
        assert!(matches!(outcome.result, SolverResult::Optimal(_)));
    }

    #[test]
    fn test_root_contradiction_is_infeasible_even_without_budget() {
        let m = model(
            vec![100],
            vec![LinearConstraint::exactly(ConstraintKind::Pin, &[], 1)],
        );
        let outcome = MilpEngine::new().solve_with_time_limit(&m, Duration::ZERO);
        assert_eq!(outcome.result, SolverResult::Infeasible);
        assert_eq!(outcome.statistics.rows_presolved, 1);
    }

    #[test]
    fn test_solver_proves_infeasibility() {
        // Need two of three, but every pair conflicts.
        let m = model(
            vec![1, 2, 3],
            vec![
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..3), 2),
                LinearConstraint::at_most(ConstraintKind::Rest, &ids(0..2), 1),
                LinearConstraint::at_most(ConstraintKind::Rest, &ids(1..3), 1),
                LinearConstraint::at_most(
                    ConstraintKind::Rest,
                    &[DecisionId::new(0), DecisionId::new(2)],
                    1,
                ),
            ],
        );
        let outcome = solve(&m);
        assert_eq!(outcome.result, SolverResult::Infeasible);
        assert_eq!(outcome.reason, TerminationReason::Exhausted);
    }

    #[test]
    fn test_zero_budget_without_solution_is_unknown() {
        let m = model(
            vec![100, 200],
            vec![LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..2), 1)],
        );
        let outcome = MilpEngine::new().solve_with_time_limit(&m, Duration::ZERO);
        assert_eq!(outcome.result, SolverResult::Unknown);
        assert!(matches!(outcome.reason, TerminationReason::Aborted(_)));
    }

    #[test]
    fn test_weighted_cap_row() {
        // Needs two of three; durations 300/300/500 under a 700 cap.
        let m = model(
            vec![10, 20, 1],
            vec![
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..3), 2),
                LinearConstraint::new(
                    ConstraintKind::WeeklyCap,
                    vec![
                        Term { decision: DecisionId::new(0), coefficient: 300 },
                        Term { decision: DecisionId::new(1), coefficient: 300 },
                        Term { decision: DecisionId::new(2), coefficient: 500 },
                    ],
                    Sense::AtMost,
                    700,
                ),
            ],
        );
        let outcome = solve(&m);
        let solution = outcome.result.solution().unwrap();
        assert_eq!(solution.objective, 30);
        assert_eq!(solution.selected, ids(0..2));
    }

    #[test]
    fn test_consecutive_penalty_steers_choice() {
        // Decisions 0 and 1 cover a Monday row, 2 covers Tuesday.
        // Employee A owns 0 and 2; taking 0 makes A work both days.
        let mut m = model(
            vec![100, 120, 100],
            vec![
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..2), 1),
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(2..3), 1),
            ],
        );
        m.objective.day_indicators = vec![
            DayIndicator { employee: 0, weekday: 0, members: vec![DecisionId::new(0)] },
            DayIndicator { employee: 0, weekday: 1, members: vec![DecisionId::new(2)] },
        ];
        m.objective.consecutive = vec![ConsecutiveTerm { first: 0, second: 1, weight: 50 }];

        let outcome = solve(&m);
        let solution = outcome.result.solution().cloned().unwrap();
        assert_eq!(solution.objective, 220);
        assert_eq!(solution.selected, vec![DecisionId::new(1), DecisionId::new(2)]);
        assert_eq!(outcome.statistics.auxiliary_variables, 3);
    }

    #[test]
    fn test_consecutive_penalty_paid_when_unavoidable() {
        // Only employee A can cover either day.
        let mut m = model(
            vec![100, 100],
            vec![
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(0..1), 1),
                LinearConstraint::exactly(ConstraintKind::Coverage, &ids(1..2), 1),
            ],
        );
        m.objective.day_indicators = vec![
            DayIndicator { employee: 0, weekday: 2, members: vec![DecisionId::new(0)] },
            DayIndicator { employee: 0, weekday: 3, members: vec![DecisionId::new(1)] },
        ];
        m.objective.consecutive = vec![ConsecutiveTerm { first: 0, second: 1, weight: 75 }];

        let outcome = solve(&m);
        assert_eq!(outcome.result.solution().map(|s| s.objective), Some(275));
        assert!(matches!(outcome.result, SolverResult::Optimal(_)));
    }

    #[test]
    fn test_empty_model_is_optimal() {
        let m = model(Vec::new(), Vec::new());
        let outcome = solve(&m);
        assert_eq!(
            outcome.result,
            SolverResult::Optimal(Incumbent { objective: 0, selected: Vec::new() })
        );
    }
}
