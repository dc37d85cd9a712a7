//! Objective composition.
//!
//! `minimize  Σ (wage + casual surcharge)·x  +  Σ consecutivePenalty·pair(e, d)`
//!
//! Wages are in cents and penalties in weight points; both share one linear
//! scale so the weights act as the trade-off between cost and preference.
//! All coefficients are non-negative, which keeps the objective monotone in
//! every decision.

use crate::domain::RosterProblem;

use super::decision::{DecisionArena, DecisionId};

/// Weekdays whose successor is also in the week. Sunday -> Monday does not
/// count as consecutive.
pub const CONSECUTIVE_DAY_PAIRS: u8 = 6;

/// `worksDay(employee, weekday)`: the OR of the employee's decisions on
/// shifts starting that weekday. Days without candidate shifts get no
/// indicator and are false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIndicator {
    pub employee: usize,
    pub weekday: u8,
    pub members: Vec<DecisionId>,
}

/// `weight · (worksDay(first) AND worksDay(second))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsecutiveTerm {
    pub first: usize,
    pub second: usize,
    pub weight: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objective {
    /// Linear cost per decision, indexed by `DecisionId`.
    pub costs: Vec<i64>,
    pub day_indicators: Vec<DayIndicator>,
    pub consecutive: Vec<ConsecutiveTerm>,
}

impl Objective {
    /// Evaluates the objective under a full assignment.
    pub fn evaluate(&self, values: &[bool]) -> i64 {
        let linear: i64 = self
            .costs
            .iter()
            .zip(values)
            .filter(|(_, &v)| v)
            .map(|(c, _)| *c)
            .sum();

        let works: Vec<bool> = self
            .day_indicators
            .iter()
            .map(|d| d.members.iter().any(|m| values[m.get()]))
            .collect();

        let penalty: i64 = self
            .consecutive
            .iter()
            .filter(|t| works[t.first] && works[t.second])
            .map(|t| t.weight)
            .sum();

        linear + penalty
    }
}

/// Builds the objective for the decisions in `arena`.
pub fn compose(problem: &RosterProblem, arena: &DecisionArena) -> Objective {
    let weights = problem.weights;

    let costs = arena
        .iter()
        .map(|(_, d)| {
            let employee = &problem.employees[d.employee];
            let mut cost = employee.wage_cents;
            if employee.employment_type.is_casual() && weights.casual_penalty != 0 {
                cost = cost.saturating_add(weights.casual_penalty);
            }
            cost
        })
        .collect();

    let mut day_indicators = Vec::new();
    let mut consecutive = Vec::new();

    if weights.consecutive_penalty != 0 {
        for employee in &problem.employees {
            let mut by_day: [Option<usize>; 7] = [None; 7];
            for &id in arena.for_employee(employee.index) {
                let weekday = problem.shifts[arena.decision(id).shift].weekday;
                let slot = by_day[weekday as usize].get_or_insert_with(|| {
                    day_indicators.push(DayIndicator {
                        employee: employee.index,
                        weekday,
                        members: Vec::new(),
                    });
                    day_indicators.len() - 1
                });
                day_indicators[*slot].members.push(id);
            }

            for d in 0..CONSECUTIVE_DAY_PAIRS as usize {
                if let (Some(first), Some(second)) = (by_day[d], by_day[d + 1]) {
                    consecutive.push(ConsecutiveTerm {
                        first,
                        second,
                        weight: weights.consecutive_penalty,
                    });
                }
            }
        }
    }

    Objective {
        costs,
        day_indicators,
        consecutive,
    }
}
