//! Canonical domain model for shift rostering.
//!
//! Everything here is built by [`normalize`](crate::normalize) from the wire
//! records in [`dto`](crate::dto) and is immutable for the rest of a solve.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minutes in a day; minute-of-day values live in `0..=MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Weekly cap applied when a request omits `maxWeeklyHours`.
pub const DEFAULT_MAX_WEEKLY_HOURS: i64 = 38;

/// Contract tag of an employee. Only [`EmploymentType::Casual`] draws the
/// casual surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    #[default]
    Permanent,
    FullTime,
    PartTime,
    Casual,
}

impl EmploymentType {
    pub fn is_casual(self) -> bool {
        matches!(self, EmploymentType::Casual)
    }
}

/// A shift slot that needs `required` employees holding `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    /// Index of this shift in `RosterProblem.shifts`.
    pub index: usize,
    pub id: String,
    pub role: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub required: i64,
    pub duration_minutes: i64,
    /// Monday = 0 .. Sunday = 6, taken in the start timestamp's own offset.
    pub weekday: u8,
    pub start_minute: u32,
    /// `start_minute + duration_minutes`; exceeds [`MINUTES_PER_DAY`] for
    /// shifts that run past midnight.
    pub end_minute: u32,
}

impl Shift {
    /// Half-open intersection test on absolute instants.
    pub fn overlaps(&self, other: &Shift) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }

    /// Minutes from the end of `self` to the start of `next`. Negative when
    /// `next` starts before `self` ends.
    pub fn gap_minutes_to(&self, next: &Shift) -> i64 {
        (next.start - self.end).num_minutes()
    }
}

/// A weekly availability window, already converted to the Monday = 0
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub weekday: u8,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl AvailabilityWindow {
    /// True if `shift` starts on this window's weekday and lies entirely
    /// inside it.
    pub fn contains(&self, shift: &Shift) -> bool {
        self.weekday == shift.weekday
            && self.start_minute <= shift.start_minute
            && shift.end_minute <= self.end_minute
    }
}

/// An absolute interval during which an employee cannot work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOff {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeOff {
    pub fn overlaps(&self, shift: &Shift) -> bool {
        !(self.end <= shift.start || shift.end <= self.start)
    }
}

/// An employee who can be assigned to shifts.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// Index of this employee in `RosterProblem.employees`.
    pub index: usize,
    pub id: String,
    /// Hourly rate rounded to the nearest cent.
    pub wage_cents: i64,
    pub roles: HashSet<String>,
    pub max_weekly_minutes: i64,
    pub employment_type: EmploymentType,
    /// Empty means the employee is always available.
    pub availability: Vec<AvailabilityWindow>,
    pub time_off: Vec<TimeOff>,
}

/// A caller-forced assignment, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin {
    pub shift: usize,
    pub employee: usize,
}

/// Soft-constraint weights, in objective points per occurrence.
///
/// Wages enter the objective in cents, so a weight of 100 trades against one
/// currency unit of wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weights {
    /// Added to every assignment of a casual employee.
    pub casual_penalty: i64,
    /// Added per employee for every pair of calendar-adjacent weekdays worked.
    pub consecutive_penalty: i64,
}

/// A fully normalized rostering problem, ready for model construction.
#[derive(Debug, Clone)]
pub struct RosterProblem {
    pub shifts: Vec<Shift>,
    pub employees: Vec<Employee>,
    pub pins: Vec<Pin>,
    pub weights: Weights,
}
