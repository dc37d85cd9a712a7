//! Per-pair eligibility.
//!
//! A pair is eligible when the employee holds the shift's role, one of the
//! employee's availability windows contains the shift (or the employee has
//! none), and no time-off interval intersects it.

use crate::domain::{Employee, RosterProblem, Shift};

pub fn role_match(shift: &Shift, employee: &Employee) -> bool {
    employee.roles.contains(&shift.role)
}

/// Open availability when no windows are declared; otherwise the shift must
/// sit fully inside a window on its weekday.
pub fn is_available(shift: &Shift, employee: &Employee) -> bool {
    employee.availability.is_empty() || employee.availability.iter().any(|w| w.contains(shift))
}

pub fn has_time_off_conflict(shift: &Shift, employee: &Employee) -> bool {
    employee.time_off.iter().any(|t| t.overlaps(shift))
}

pub fn is_eligible(shift: &Shift, employee: &Employee) -> bool {
    role_match(shift, employee) && is_available(shift, employee) && !has_time_off_conflict(shift, employee)
}

/// All eligible `(shift, employee)` index pairs, shift-major.
pub fn eligible_pairs(problem: &RosterProblem) -> impl Iterator<Item = (usize, usize)> + '_ {
    problem.shifts.iter().flat_map(move |s| {
        problem
            .employees
            .iter()
            .filter(move |e| is_eligible(s, e))
            .map(move |e| (s.index, e.index))
    })
}
