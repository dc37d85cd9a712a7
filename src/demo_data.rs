//! Demo data generators for shift rostering.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{EmploymentType, Weights, DEFAULT_MAX_WEEKLY_HOURS};
use crate::dto::{AvailabilityDto, EmployeeDto, PinDto, ShiftDto, SolveRequest, TimeOffDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                roles: vec!["Nurse", "Doctor"],
                shift_start_times: vec![time(6, 0), time(14, 0)],
                employee_count: 14,
                required_distribution: vec![(1, 0.8), (2, 0.2)],
                employment_distribution: vec![
                    (EmploymentType::Permanent, 3.0),
                    (EmploymentType::PartTime, 1.0),
                    (EmploymentType::Casual, 1.0),
                ],
                second_role_probability: 0.3,
                availability_probability: 0.3,
                time_off_probability: 0.2,
            },
            DemoData::Large => DemoDataParameters {
                roles: vec!["Nurse", "Doctor", "Anaesthetist", "Radiographer"],
                shift_start_times: vec![time(6, 0), time(14, 0), time(22, 0)],
                employee_count: 60,
                required_distribution: vec![(1, 0.6), (2, 0.3), (3, 0.1)],
                employment_distribution: vec![
                    (EmploymentType::Permanent, 2.0),
                    (EmploymentType::FullTime, 2.0),
                    (EmploymentType::PartTime, 1.0),
                    (EmploymentType::Casual, 1.0),
                ],
                second_role_probability: 0.25,
                availability_probability: 0.25,
                time_off_probability: 0.15,
            },
        }
    }
}

struct DemoDataParameters {
    roles: Vec<&'static str>,
    shift_start_times: Vec<NaiveTime>,
    employee_count: usize,
    required_distribution: Vec<(i64, f64)>,
    employment_distribution: Vec<(EmploymentType, f64)>,
    second_role_probability: f64,
    /// Chance that an employee is restricted to a few weekdays.
    availability_probability: f64,
    time_off_probability: f64,
}

/// Shift length in hours.
const SHIFT_HOURS: i64 = 8;

/// Part-time weekly cap in hours.
const PART_TIME_HOURS: i64 = 24;

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a one-week demo roster request starting on a Monday.
pub fn generate(demo: DemoData) -> SolveRequest {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let start_date = find_next_monday(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default());

    let mut employees = Vec::with_capacity(params.employee_count);
    for i in 0..params.employee_count {
        let primary = params.roles[i % params.roles.len()];
        let mut eligible_roles = vec![primary.to_string()];
        if params.roles.len() > 1 && rng.gen_bool(params.second_role_probability) {
            let others: Vec<&str> = params.roles.iter().copied().filter(|r| *r != primary).collect();
            if let Some(extra) = others.choose(&mut rng) {
                eligible_roles.push(extra.to_string());
            }
        }

        let employment_type = pick_weighted(&mut rng, &params.employment_distribution)
            .unwrap_or(EmploymentType::Permanent);
        let max_weekly_hours = match employment_type {
            EmploymentType::PartTime => PART_TIME_HOURS,
            _ => DEFAULT_MAX_WEEKLY_HOURS,
        };
        let hourly_rate = (rng.gen_range(2200..3800) as f64) / 100.0;

        // Restricted employees work whole days on five weekdays.
        let availability = if rng.gen_bool(params.availability_probability) {
            let mut days: Vec<u32> = (0..7).collect();
            days.shuffle(&mut rng);
            let mut days: Vec<u32> = days.into_iter().take(5).collect();
            days.sort_unstable();
            days.into_iter()
                .map(|monday_based| AvailabilityDto {
                    weekday: ((monday_based + 1) % 7) as i64,
                    start: "00:00".to_string(),
                    end: "24:00".to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let time_off = if rng.gen_bool(params.time_off_probability) {
            let day = start_date + Duration::days(rng.gen_range(0..7));
            vec![TimeOffDto {
                start: timestamp(NaiveDateTime::new(day, time(0, 0))),
                end: timestamp(NaiveDateTime::new(day + Duration::days(1), time(0, 0))),
            }]
        } else {
            Vec::new()
        };

        employees.push(EmployeeDto {
            id: format!("{}-{}", FIRST_NAMES[i % FIRST_NAMES.len()], i),
            hourly_rate,
            eligible_roles,
            max_weekly_hours,
            employment_type,
            availability,
            time_off,
        });
    }

    let mut shifts = Vec::new();
    for day in 0..7 {
        let date = start_date + Duration::days(day);
        for &shift_start in &params.shift_start_times {
            let start = NaiveDateTime::new(date, shift_start);
            let end = start + Duration::hours(SHIFT_HOURS);
            for role in &params.roles {
                let required_count = pick_weighted(&mut rng, &params.required_distribution).unwrap_or(1);
                shifts.push(ShiftDto {
                    id: format!(
                        "{}-{}-{}",
                        date.format("%a").to_string().to_lowercase(),
                        shift_start.format("%H%M"),
                        role.to_lowercase()
                    ),
                    start: timestamp(start),
                    end: timestamp(end),
                    required_count,
                    role_id: role.to_string(),
                });
            }
        }
    }

    // Pin the first nurse to the opening shift if they can take it.
    let pinned = employees
        .iter()
        .find(|e| {
            e.eligible_roles.iter().any(|r| r == "Nurse") && e.time_off.is_empty() && e.availability.is_empty()
        })
        .and_then(|e| {
            shifts
                .iter()
                .find(|s| s.role_id == "Nurse")
                .map(|s| PinDto {
                    shift_id: s.id.clone(),
                    employee_id: e.id.clone(),
                })
        })
        .into_iter()
        .collect();

    SolveRequest {
        shifts,
        employees,
        weights: Weights {
            casual_penalty: 300,
            consecutive_penalty: 150,
        },
        pinned,
        time_limit_seconds: None,
    }
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn timestamp(at: NaiveDateTime) -> String {
    format!("{}Z", at.format("%Y-%m-%dT%H:%M:%S"))
}

fn find_next_monday(date: NaiveDate) -> NaiveDate {
    let days_until_monday = match date.weekday() {
        Weekday::Mon => 0,
        Weekday::Tue => 6,
        Weekday::Wed => 5,
        Weekday::Thu => 4,
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        Weekday::Sun => 1,
    };
    date + Duration::days(days_until_monday)
}

/// Picks a value based on a weighted distribution.
fn pick_weighted<T: Copy>(rng: &mut StdRng, distribution: &[(T, f64)]) -> Option<T> {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total_weight;

    for (value, weight) in distribution {
        if choice < *weight {
            return Some(*value);
        }
        choice -= weight;
    }
    distribution.last().map(|(v, _)| *v)
}

const FIRST_NAMES: &[&str] = &[
    "amy", "beth", "carl", "dan", "elsa", "flo", "gus", "hugo", "ivy", "jay",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::solver::{solve, SolveStatus, SolverConfig};
    use std::collections::HashSet;

    #[test]
    fn test_generate_small() {
        let request = generate(DemoData::Small);

        assert_eq!(request.employees.len(), 14);
        // 7 days x 2 start times x 2 roles
        assert_eq!(request.shifts.len(), 28);
        assert!(request.pinned.len() <= 1);
    }

    #[test]
    fn test_generate_large() {
        let request = generate(DemoData::Large);

        assert_eq!(request.employees.len(), 60);
        assert_eq!(request.shifts.len(), 7 * 3 * 4);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = serde_json::to_value(generate(DemoData::Small)).unwrap();
        let b = serde_json::to_value(generate(DemoData::Small)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_demo_requests_normalize() {
        for demo in [DemoData::Small, DemoData::Large] {
            let request = generate(demo);
            let problem = normalize(&request).unwrap();
            assert_eq!(problem.shifts[0].weekday, 0, "{} must start on a Monday", demo.as_str());

            let ids: HashSet<_> = request.shifts.iter().map(|s| &s.id).collect();
            assert_eq!(ids.len(), request.shifts.len());
        }
    }

    #[test]
    fn test_small_demo_is_solved_to_optimality() {
        let request = generate(DemoData::Small);
        let result = solve(&request, &SolverConfig::default()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal, "got {}", result.status.as_str());

        let problem = normalize(&request).unwrap();
        assert!(crate::audit::check(&problem, &result).is_empty());
    }

    #[test]
    fn test_demo_data_from_str() {
        assert_eq!("SMALL".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("invalid".parse::<DemoData>().is_err());
    }
}
