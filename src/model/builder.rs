//! Constraint model construction.
//!
//! Single formulation for every entry point. Bump [`FORMULATION_VERSION`]
//! whenever the rows or the objective change meaning.

use tracing::{debug, warn};

use crate::domain::RosterProblem;
use crate::eligibility;

use super::constraint::{ConstraintKind, LinearConstraint, Sense, Term};
use super::decision::{DecisionArena, DecisionId};
use super::objective;
use super::Model;

pub const FORMULATION_VERSION: u32 = 1;

/// Minimum rest between two shifts worked by the same employee.
pub const MIN_REST_MINUTES: i64 = 12 * 60;

pub struct ModelBuilder<'a> {
    problem: &'a RosterProblem,
    arena: DecisionArena,
    constraints: Vec<LinearConstraint>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(problem: &'a RosterProblem) -> Self {
        Self {
            problem,
            arena: DecisionArena::new(problem.shifts.len(), problem.employees.len()),
            constraints: Vec::new(),
        }
    }

    pub fn build(mut self) -> Model {
        self.add_decisions();
        self.add_coverage();
        self.add_pins();
        self.add_conflicts();
        self.add_weekly_caps();

        let objective = objective::compose(self.problem, &self.arena);

        let model = Model {
            decisions: self.arena,
            constraints: self.constraints,
            objective,
        };
        debug!(
            version = FORMULATION_VERSION,
            decisions = model.num_decisions(),
            rows = model.constraints.len(),
            coverage = model.count(ConstraintKind::Coverage),
            conflicts = model.count(ConstraintKind::NoOverlap) + model.count(ConstraintKind::Rest),
            consecutive_terms = model.objective.consecutive.len(),
            "Model built"
        );
        model
    }

    fn add_decisions(&mut self) {
        for (shift, employee) in eligibility::eligible_pairs(self.problem) {
            self.arena.insert(shift, employee);
        }
    }

    fn add_coverage(&mut self) {
        for shift in &self.problem.shifts {
            self.constraints.push(LinearConstraint::exactly(
                ConstraintKind::Coverage,
                self.arena.for_shift(shift.index),
                shift.required,
            ));
        }
    }

    /// A pin on a pair without a decision becomes `0 == 1`.
    fn add_pins(&mut self) {
        for pin in &self.problem.pins {
            let decisions: Vec<DecisionId> = self.arena.get(pin.shift, pin.employee).into_iter().collect();
            if decisions.is_empty() {
                warn!(
                    shift = %self.problem.shifts[pin.shift].id,
                    employee = %self.problem.employees[pin.employee].id,
                    "Pinned pair is not eligible; the model is infeasible"
                );
            }
            self.constraints
                .push(LinearConstraint::exactly(ConstraintKind::Pin, &decisions, 1));
        }
    }

    /// One at-most-one row per employee for every unordered pair of shifts
    /// that intersect or leave less than [`MIN_REST_MINUTES`] between them.
    fn add_conflicts(&mut self) {
        let shifts = &self.problem.shifts;
        for (i, a) in shifts.iter().enumerate() {
            for b in &shifts[i + 1..] {
                let kind = if a.overlaps(b) {
                    ConstraintKind::NoOverlap
                } else if a.gap_minutes_to(b) < MIN_REST_MINUTES
                    && b.gap_minutes_to(a) < MIN_REST_MINUTES
                {
                    // Disjoint pairs have one negative gap; this reads
                    // "the non-negative gap is short".
                    ConstraintKind::Rest
                } else {
                    continue;
                };

                for &xa in self.arena.for_shift(a.index) {
                    let employee = self.arena.decision(xa).employee;
                    if let Some(xb) = self.arena.get(b.index, employee) {
                        self.constraints
                            .push(LinearConstraint::at_most(kind, &[xa, xb], 1));
                    }
                }
            }
        }
    }

    fn add_weekly_caps(&mut self) {
        for employee in &self.problem.employees {
            let terms: Vec<Term> = self
                .arena
                .for_employee(employee.index)
                .iter()
                .map(|&id| Term {
                    decision: id,
                    coefficient: self.problem.shifts[self.arena.decision(id).shift].duration_minutes,
                })
                .filter(|t| t.coefficient > 0)
                .collect();
            if terms.is_empty() {
                continue;
            }
            self.constraints.push(LinearConstraint::new(
                ConstraintKind::WeeklyCap,
                terms,
                Sense::AtMost,
                employee.max_weekly_minutes,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmploymentType, Pin, Shift, Weights};
    use crate::normalize::parse_timestamp;
    use chrono::{Datelike, Timelike};

    fn shift(index: usize, start: &str, end: &str) -> Shift {
        let start = parse_timestamp("start", start).unwrap();
        let end = parse_timestamp("end", end).unwrap();
        let duration_minutes = (end - start).num_minutes();
        let start_minute = start.hour() * 60 + start.minute();
        Shift {
            index,
            id: format!("s{index}"),
            role: "cook".to_string(),
            start,
            end,
            required: 1,
            duration_minutes,
            weekday: start.weekday().num_days_from_monday() as u8,
            start_minute,
            end_minute: start_minute + duration_minutes as u32,
        }
    }

    fn employee(index: usize, wage_cents: i64, employment_type: EmploymentType) -> Employee {
        Employee {
            index,
            id: format!("e{index}"),
            wage_cents,
            roles: ["cook".to_string()].into_iter().collect(),
            max_weekly_minutes: 2280,
            employment_type,
            availability: Vec::new(),
            time_off: Vec::new(),
        }
    }

    fn problem(shifts: Vec<Shift>, employees: Vec<Employee>) -> RosterProblem {
        RosterProblem {
            shifts,
            employees,
            pins: Vec::new(),
            weights: Weights::default(),
        }
    }

    #[test]
    fn test_ineligible_pairs_have_no_decision() {
        let mut chef = employee(1, 2500, EmploymentType::Permanent);
        chef.roles = ["chef".to_string()].into_iter().collect();
        let p = problem(
            vec![shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z")],
            vec![employee(0, 2000, EmploymentType::Permanent), chef],
        );
        let model = ModelBuilder::new(&p).build();
        assert_eq!(model.num_decisions(), 1);
        assert!(model.decisions.get(0, 0).is_some());
        assert!(model.decisions.get(0, 1).is_none());
        assert_eq!(model.count(ConstraintKind::Coverage), 1);
    }

    #[test]
    fn test_conflict_rows_cover_overlap_and_short_rest() {
        let p = problem(
            vec![
                shift(0, "2025-09-29T06:00:00Z", "2025-09-29T14:00:00Z"),
                // Overlaps shift 0.
                shift(1, "2025-09-29T12:00:00Z", "2025-09-29T20:00:00Z"),
                // 8h after shift 1 ends, 14h after shift 0 ends.
                shift(2, "2025-09-30T04:00:00Z", "2025-09-30T10:00:00Z"),
                // Exactly 12h after shift 2 ends.
                shift(3, "2025-09-30T22:00:00Z", "2025-10-01T06:00:00Z"),
            ],
            vec![employee(0, 2000, EmploymentType::Permanent)],
        );
        let model = ModelBuilder::new(&p).build();
        assert_eq!(model.count(ConstraintKind::NoOverlap), 1);
        assert_eq!(model.count(ConstraintKind::Rest), 1);

        let rest = model
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::Rest)
            .unwrap();
        let shifts: Vec<usize> = rest
            .terms
            .iter()
            .map(|t| model.decisions.decision(t.decision).shift)
            .collect();
        assert_eq!(shifts, vec![1, 2]);
    }

    #[test]
    fn test_ineligible_pin_yields_contradiction() {
        let mut p = problem(
            vec![shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z")],
            vec![employee(0, 2000, EmploymentType::Permanent)],
        );
        p.employees[0].roles.clear();
        p.pins.push(Pin { shift: 0, employee: 0 });
        let model = ModelBuilder::new(&p).build();
        let pin = model
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::Pin)
            .unwrap();
        assert!(pin.is_contradiction());
    }

    #[test]
    fn test_weekly_cap_uses_durations() {
        let p = problem(
            vec![
                shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z"),
                shift(1, "2025-09-30T09:00:00Z", "2025-09-30T19:00:00Z"),
            ],
            vec![employee(0, 2000, EmploymentType::Permanent)],
        );
        let model = ModelBuilder::new(&p).build();
        let cap = model
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::WeeklyCap)
            .unwrap();
        let coefficients: Vec<i64> = cap.terms.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![480, 600]);
        assert_eq!(cap.rhs, 2280);
    }

    #[test]
    fn test_objective_costs_and_casual_surcharge() {
        let mut p = problem(
            vec![shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z")],
            vec![
                employee(0, 2000, EmploymentType::Permanent),
                employee(1, 1800, EmploymentType::Casual),
            ],
        );
        p.weights.casual_penalty = 500;
        let model = ModelBuilder::new(&p).build();
        assert_eq!(model.objective.costs, vec![2000, 2300]);
    }

    #[test]
    fn test_consecutive_terms_skip_week_wrap() {
        let mut p = problem(
            vec![
                // Monday, Tuesday, Sunday.
                shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z"),
                shift(1, "2025-09-30T09:00:00Z", "2025-09-30T17:00:00Z"),
                shift(2, "2025-10-05T09:00:00Z", "2025-10-05T17:00:00Z"),
            ],
            vec![employee(0, 2000, EmploymentType::Permanent)],
        );
        p.weights.consecutive_penalty = 70;
        let model = ModelBuilder::new(&p).build();

        assert_eq!(model.objective.day_indicators.len(), 3);
        assert_eq!(model.objective.consecutive.len(), 1);
        assert_eq!(model.objective.evaluate(&[true, true, false]), 4070);
        assert_eq!(model.objective.evaluate(&[true, false, true]), 4000);
    }

    #[test]
    fn test_zero_consecutive_weight_adds_no_terms() {
        let p = problem(
            vec![
                shift(0, "2025-09-29T09:00:00Z", "2025-09-29T17:00:00Z"),
                shift(1, "2025-09-30T09:00:00Z", "2025-09-30T17:00:00Z"),
            ],
            vec![employee(0, 2000, EmploymentType::Permanent)],
        );
        let model = ModelBuilder::new(&p).build();
        assert!(model.objective.consecutive.is_empty());
        assert_eq!(model.objective.evaluate(&[true, true]), 4000);
    }
}
