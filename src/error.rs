//! Input validation errors.
//!
//! These are the only failures a solve can produce. Everything downstream of
//! normalization reports through [`SolveStatus`](crate::solver::SolveStatus).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { field: String, value: String },

    #[error("{field}: cannot parse time of day '{value}' (expected HH:MM)")]
    InvalidTimeOfDay { field: String, value: String },

    #[error("{field}: end must be after start")]
    EmptyInterval { field: String },

    #[error("shift '{shift}': required count {count} is negative")]
    NegativeRequiredCount { shift: String, count: i64 },

    #[error("employee '{employee}': availability weekday {weekday} is outside 0..=6")]
    InvalidWeekday { employee: String, weekday: i64 },

    #[error("employee '{employee}': hourly rate {rate} is outside 0..=100000")]
    InvalidHourlyRate { employee: String, rate: String },

    #[error("employee '{employee}': max weekly hours {hours} is negative")]
    NegativeWeeklyHours { employee: String, hours: i64 },

    #[error("weight '{name}' is negative ({value})")]
    NegativeWeight { name: &'static str, value: i64 },

    #[error("weight '{name}' is {value}, above the limit of {max}")]
    WeightTooLarge { name: &'static str, value: i64, max: i64 },

    #[error("time limit {seconds}s is negative, not finite or too large")]
    InvalidTimeLimit { seconds: String },

    #[error("duplicate shift id '{0}'")]
    DuplicateShift(String),

    #[error("duplicate employee id '{0}'")]
    DuplicateEmployee(String),

    #[error("pin references unknown shift '{0}'")]
    UnknownPinnedShift(String),

    #[error("pin references unknown employee '{0}'")]
    UnknownPinnedEmployee(String),
}

impl ValidationError {
    pub(crate) fn timestamp(field: impl Into<String>, value: &str) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn time_of_day(field: impl Into<String>, value: &str) -> Self {
        Self::InvalidTimeOfDay {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn empty_interval(field: impl Into<String>) -> Self {
        Self::EmptyInterval {
            field: field.into(),
        }
    }
}
