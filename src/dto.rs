//! Wire records for solve requests and responses.
//!
//! Field names follow the camelCase JSON used by the scheduling front end.
//! Aliases accept the older solver-service spellings (`required`,
//! `hourlyCost`, `roleIds`, `avail`, `timeOffs`).

use serde::{Deserialize, Serialize};

use crate::domain::{EmploymentType, Weights, DEFAULT_MAX_WEEKLY_HOURS};
use crate::solver::{SolveResult, SolveStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDto {
    pub id: String,
    pub start: String,
    pub end: String,
    #[serde(alias = "required")]
    pub required_count: i64,
    pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    /// Sunday = 0 .. Saturday = 6.
    pub weekday: i64,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffDto {
    pub start: String,
    pub end: String,
}

fn default_max_weekly_hours() -> i64 {
    DEFAULT_MAX_WEEKLY_HOURS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: String,
    #[serde(alias = "hourlyCost")]
    pub hourly_rate: f64,
    #[serde(alias = "roleIds")]
    pub eligible_roles: Vec<String>,
    #[serde(default = "default_max_weekly_hours")]
    pub max_weekly_hours: i64,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default, alias = "avail")]
    pub availability: Vec<AvailabilityDto>,
    #[serde(default, alias = "timeOffs")]
    pub time_off: Vec<TimeOffDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDto {
    pub shift_id: String,
    pub employee_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub shifts: Vec<ShiftDto>,
    pub employees: Vec<EmployeeDto>,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub pinned: Vec<PinDto>,
    /// Overrides the configured time budget for this solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub shift_id: String,
    pub employee_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub status: SolveStatus,
    pub objective: Option<i64>,
    pub assignments: Vec<AssignmentDto>,
}

impl From<&SolveResult> for SolveResponse {
    fn from(result: &SolveResult) -> Self {
        Self {
            status: result.status,
            objective: result.objective,
            assignments: result
                .assignments
                .iter()
                .map(|a| AssignmentDto {
                    shift_id: a.shift_id.clone(),
                    employee_id: a.employee_id.clone(),
                })
                .collect(),
        }
    }
}
