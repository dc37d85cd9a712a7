//! Independent re-check of a roster against the hard rules.
//!
//! Works on shift and employee ids only, never on the model, so it also
//! catches mistakes in model construction.

use std::collections::HashMap;
use std::fmt;

use crate::domain::RosterProblem;
use crate::eligibility;
use crate::model::MIN_REST_MINUTES;
use crate::solver::SolveResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Assigned headcount differs from the required count.
    Coverage { shift: String, required: i64, assigned: i64 },
    /// An employee works two intersecting shifts.
    Overlap { employee: String, first: String, second: String },
    /// An employee gets less than the minimum rest between two shifts.
    Rest { employee: String, first: String, second: String, gap_minutes: i64 },
    WeeklyCap { employee: String, minutes: i64, cap: i64 },
    MissingPin { shift: String, employee: String },
    /// The employee may not work the shift at all.
    Ineligible { shift: String, employee: String },
    /// The assignment names an id that is not in the problem.
    UnknownId { shift: String, employee: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Coverage { shift, required, assigned } => {
                write!(f, "shift '{shift}' needs {required}, has {assigned}")
            }
            Violation::Overlap { employee, first, second } => {
                write!(f, "'{employee}' works overlapping shifts '{first}' and '{second}'")
            }
            Violation::Rest { employee, first, second, gap_minutes } => write!(
                f,
                "'{employee}' rests {gap_minutes} min between '{first}' and '{second}'"
            ),
            Violation::WeeklyCap { employee, minutes, cap } => {
                write!(f, "'{employee}' works {minutes} min, cap is {cap}")
            }
            Violation::MissingPin { shift, employee } => {
                write!(f, "pin '{shift}' -> '{employee}' not honoured")
            }
            Violation::Ineligible { shift, employee } => {
                write!(f, "'{employee}' is not eligible for '{shift}'")
            }
            Violation::UnknownId { shift, employee } => {
                write!(f, "assignment '{shift}' -> '{employee}' names an unknown id")
            }
        }
    }
}

/// Checks `result` against `problem`. Results without a roster trivially
/// pass.
pub fn check(problem: &RosterProblem, result: &SolveResult) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !result.status.has_solution() {
        return violations;
    }

    let shift_index: HashMap<&str, usize> = problem.shifts.iter().map(|s| (s.id.as_str(), s.index)).collect();
    let employee_index: HashMap<&str, usize> =
        problem.employees.iter().map(|e| (e.id.as_str(), e.index)).collect();

    let mut headcount = vec![0i64; problem.shifts.len()];
    let mut worked: Vec<Vec<usize>> = vec![Vec::new(); problem.employees.len()];

    for a in &result.assignments {
        let (Some(&s), Some(&e)) = (
            shift_index.get(a.shift_id.as_str()),
            employee_index.get(a.employee_id.as_str()),
        ) else {
            violations.push(Violation::UnknownId {
                shift: a.shift_id.clone(),
                employee: a.employee_id.clone(),
            });
            continue;
        };
        if !eligibility::is_eligible(&problem.shifts[s], &problem.employees[e]) {
            violations.push(Violation::Ineligible {
                shift: a.shift_id.clone(),
                employee: a.employee_id.clone(),
            });
        }
        headcount[s] += 1;
        worked[e].push(s);
    }

    for shift in &problem.shifts {
        if headcount[shift.index] != shift.required {
            violations.push(Violation::Coverage {
                shift: shift.id.clone(),
                required: shift.required,
                assigned: headcount[shift.index],
            });
        }
    }

    for employee in &problem.employees {
        let mut shifts: Vec<_> = worked[employee.index].iter().map(|&s| &problem.shifts[s]).collect();
        shifts.sort_by_key(|s| s.start);

        for (i, a) in shifts.iter().enumerate() {
            for b in &shifts[i + 1..] {
                if a.overlaps(b) {
                    violations.push(Violation::Overlap {
                        employee: employee.id.clone(),
                        first: a.id.clone(),
                        second: b.id.clone(),
                    });
                    continue;
                }
                let gap = a.gap_minutes_to(b).max(b.gap_minutes_to(a));
                if gap < MIN_REST_MINUTES {
                    violations.push(Violation::Rest {
                        employee: employee.id.clone(),
                        first: a.id.clone(),
                        second: b.id.clone(),
                        gap_minutes: gap,
                    });
                }
            }
        }

        let minutes: i64 = shifts.iter().map(|s| s.duration_minutes).sum();
        if minutes > employee.max_weekly_minutes {
            violations.push(Violation::WeeklyCap {
                employee: employee.id.clone(),
                minutes,
                cap: employee.max_weekly_minutes,
            });
        }
    }

    for pin in &problem.pins {
        if !worked[pin.employee].contains(&pin.shift) {
            violations.push(Violation::MissingPin {
                shift: problem.shifts[pin.shift].id.clone(),
                employee: problem.employees[pin.employee].id.clone(),
            });
        }
    }

    violations
}
