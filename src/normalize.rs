//! Input normalization.
//!
//! Turns wire records into the canonical [`RosterProblem`]. All validation
//! happens here; later stages assume well-formed input.
//!
//! Weekdays use one convention after this point: Monday = 0 .. Sunday = 6.
//! Availability weekdays arrive Sunday-based and go through
//! [`weekday_from_sunday_based`].

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::{
    AvailabilityWindow, Employee, Pin, RosterProblem, Shift, TimeOff, Weights, MINUTES_PER_DAY,
};
use crate::dto::{EmployeeDto, ShiftDto, SolveRequest};
use crate::error::ValidationError;

/// Largest accepted hourly rate. Keeps every objective sum exact in both
/// `i64` cents and the solver's `f64` coefficients.
pub const MAX_HOURLY_RATE: f64 = 100_000.0;

/// Largest accepted penalty weight.
pub const MAX_WEIGHT: i64 = 10_000_000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Converts a Sunday = 0 .. Saturday = 6 weekday to Monday = 0 .. Sunday = 6.
///
/// ```
/// use shift_roster::normalize::weekday_from_sunday_based;
///
/// assert_eq!(weekday_from_sunday_based(0), 6); // Sunday
/// assert_eq!(weekday_from_sunday_based(1), 0); // Monday
/// assert_eq!(weekday_from_sunday_based(6), 5); // Saturday
/// ```
pub fn weekday_from_sunday_based(external: u8) -> u8 {
    (external + 6) % 7
}

/// Parses an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM[:SS]` one read
/// as UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ValidationError::timestamp(field, value))
}

/// Parses `HH:MM` (seconds ignored) into minutes after midnight. `24:00` is
/// accepted as the end of the day.
///
/// ```
/// use shift_roster::normalize::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("start", "09:30").unwrap(), 570);
/// assert_eq!(parse_time_of_day("end", "24:00").unwrap(), 1440);
/// assert!(parse_time_of_day("end", "9h30").is_err());
/// ```
pub fn parse_time_of_day(field: &str, value: &str) -> Result<u32, ValidationError> {
    let err = || ValidationError::time_of_day(field, value);
    let mut parts = value.trim().split(':');
    let hours: u32 = parts.next().and_then(|h| h.parse().ok()).ok_or_else(err)?;
    let minutes: u32 = parts.next().and_then(|m| m.parse().ok()).ok_or_else(err)?;
    if let Some(seconds) = parts.next() {
        seconds.parse::<u32>().map_err(|_| err())?;
    }
    if parts.next().is_some() || minutes >= 60 || hours > 24 {
        return Err(err());
    }
    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return Err(err());
    }
    Ok(total)
}

fn normalize_shift(index: usize, dto: &ShiftDto) -> Result<Shift, ValidationError> {
    let field = format!("shift '{}'", dto.id);
    let start = parse_timestamp(&format!("{field} start"), &dto.start)?;
    let end = parse_timestamp(&format!("{field} end"), &dto.end)?;
    if end <= start {
        return Err(ValidationError::empty_interval(field));
    }
    if dto.required_count < 0 {
        return Err(ValidationError::NegativeRequiredCount {
            shift: dto.id.clone(),
            count: dto.required_count,
        });
    }

    let duration_minutes = (end - start).num_minutes();
    let start_minute = start.hour() * 60 + start.minute();
    let end_minute = start_minute.saturating_add(u32::try_from(duration_minutes).unwrap_or(u32::MAX));

    Ok(Shift {
        index,
        id: dto.id.clone(),
        role: dto.role_id.clone(),
        start,
        end,
        required: dto.required_count,
        duration_minutes,
        weekday: start.weekday().num_days_from_monday() as u8,
        start_minute,
        end_minute,
    })
}

fn normalize_employee(index: usize, dto: &EmployeeDto) -> Result<Employee, ValidationError> {
    if !dto.hourly_rate.is_finite() || !(0.0..=MAX_HOURLY_RATE).contains(&dto.hourly_rate) {
        return Err(ValidationError::InvalidHourlyRate {
            employee: dto.id.clone(),
            rate: dto.hourly_rate.to_string(),
        });
    }
    if dto.max_weekly_hours < 0 {
        return Err(ValidationError::NegativeWeeklyHours {
            employee: dto.id.clone(),
            hours: dto.max_weekly_hours,
        });
    }

    let mut availability = Vec::with_capacity(dto.availability.len());
    for window in &dto.availability {
        let field = format!("employee '{}' availability", dto.id);
        let weekday = u8::try_from(window.weekday)
            .ok()
            .filter(|d| *d < 7)
            .ok_or(ValidationError::InvalidWeekday {
                employee: dto.id.clone(),
                weekday: window.weekday,
            })?;
        let start_minute = parse_time_of_day(&format!("{field} start"), &window.start)?;
        let end_minute = parse_time_of_day(&format!("{field} end"), &window.end)?;
        if end_minute <= start_minute {
            return Err(ValidationError::empty_interval(field));
        }
        availability.push(AvailabilityWindow {
            weekday: weekday_from_sunday_based(weekday),
            start_minute,
            end_minute,
        });
    }

    let mut time_off = Vec::with_capacity(dto.time_off.len());
    for interval in &dto.time_off {
        let field = format!("employee '{}' time off", dto.id);
        let start = parse_timestamp(&format!("{field} start"), &interval.start)?;
        let end = parse_timestamp(&format!("{field} end"), &interval.end)?;
        if end <= start {
            return Err(ValidationError::empty_interval(field));
        }
        time_off.push(TimeOff { start, end });
    }

    Ok(Employee {
        index,
        id: dto.id.clone(),
        wage_cents: (dto.hourly_rate * 100.0).round() as i64,
        roles: dto.eligible_roles.iter().cloned().collect(),
        max_weekly_minutes: dto.max_weekly_hours.saturating_mul(60),
        employment_type: dto.employment_type,
        availability,
        time_off,
    })
}

fn validate_weights(weights: &Weights) -> Result<(), ValidationError> {
    for (name, value) in [
        ("casualPenalty", weights.casual_penalty),
        ("consecutivePenalty", weights.consecutive_penalty),
    ] {
        if value < 0 {
            return Err(ValidationError::NegativeWeight { name, value });
        }
        if value > MAX_WEIGHT {
            return Err(ValidationError::WeightTooLarge {
                name,
                value,
                max: MAX_WEIGHT,
            });
        }
    }
    Ok(())
}

/// Validates a request and builds the canonical problem.
pub fn normalize(request: &SolveRequest) -> Result<RosterProblem, ValidationError> {
    validate_weights(&request.weights)?;

    let mut seen = HashSet::new();
    let shifts = request
        .shifts
        .iter()
        .enumerate()
        .map(|(i, dto)| {
            if !seen.insert(dto.id.as_str()) {
                return Err(ValidationError::DuplicateShift(dto.id.clone()));
            }
            normalize_shift(i, dto)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let employees = request
        .employees
        .iter()
        .enumerate()
        .map(|(i, dto)| {
            if !seen.insert(dto.id.as_str()) {
                return Err(ValidationError::DuplicateEmployee(dto.id.clone()));
            }
            normalize_employee(i, dto)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let shift_idx: HashMap<&str, usize> = shifts.iter().map(|s| (s.id.as_str(), s.index)).collect();
    let employee_idx: HashMap<&str, usize> =
        employees.iter().map(|e| (e.id.as_str(), e.index)).collect();

    // Repeated pins collapse to one.
    let mut pins = BTreeSet::new();
    for pin in &request.pinned {
        let shift = *shift_idx
            .get(pin.shift_id.as_str())
            .ok_or_else(|| ValidationError::UnknownPinnedShift(pin.shift_id.clone()))?;
        let employee = *employee_idx
            .get(pin.employee_id.as_str())
            .ok_or_else(|| ValidationError::UnknownPinnedEmployee(pin.employee_id.clone()))?;
        pins.insert(Pin { shift, employee });
    }

    Ok(RosterProblem {
        shifts,
        employees,
        pins: pins.into_iter().collect(),
        weights: request.weights,
    })
}
