//! REST API handlers for shift rostering.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::demo_data::{self, DemoData};
use crate::dto::{SolveRequest, SolveResponse};
use crate::error::ValidationError;
use crate::normalize::normalize;
use crate::solver::{solve_problem, JobStatus, SolverConfig, SolverService};

/// Application state shared across handlers.
pub struct AppState {
    pub solver: SolverService,
    /// Defaults for every solve; requests may override the time limit.
    pub config: SolverConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            solver: SolverService::new(),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound,
    /// The blocking solve task panicked or was cancelled.
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // One-shot solve
        .route("/solve", post(solve_now))
        // Background solves
        .route("/schedules", post(create_schedule).get(list_schedules))
        .route("/schedules/{id}", get(get_schedule).delete(delete_schedule))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
    pub formulation_version: u32,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Shift Rostering",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "highs-milp",
        formulation_version: crate::model::FORMULATION_VERSION,
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo request.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<SolveRequest>, ApiError> {
    let demo = id.parse::<DemoData>().map_err(|_| ApiError::NotFound)?;
    Ok(Json(demo_data::generate(demo)))
}

/// POST /solve - Solve and answer in one round trip.
///
/// The solve runs on the blocking pool so the executor keeps accepting
/// requests.
async fn solve_now(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, ApiError> {
    let config = state.config.for_request(&request)?;
    let problem = normalize(&request)?;

    let result = tokio::task::spawn_blocking(move || solve_problem(&problem, &config))
        .await
        .map_err(|err| {
            warn!(error = %err, "Solve task failed");
            ApiError::Internal(err.to_string())
        })?;

    Ok(Json(SolveResponse::from(&result)))
}

/// POST /schedules - Start a background solve.
/// Returns the job ID as plain text.
async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SolveRequest>,
) -> Result<String, ApiError> {
    let config = state.config.for_request(&request)?;
    let problem = normalize(&request)?;

    let id = uuid::Uuid::new_v4().to_string();
    let job = state.solver.create_job(id.clone());
    state.solver.start_solving(job, problem, config);

    Ok(id)
}

/// GET /schedules - List all job IDs.
async fn list_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.solver.list_jobs())
}

/// Job state on the wire: `{"status": "SOLVING"}` until the solve finishes,
/// then the solve response itself.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobView {
    Solving { status: JobStatus },
    Solved(SolveResponse),
}

/// GET /schedules/{id} - Get a job's state.
async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JobView>, ApiError> {
    let job = state.solver.get_job(&id).ok_or(ApiError::NotFound)?;
    let guard = job.read();
    let view = match guard.response() {
        Some(response) => JobView::Solved(response),
        None => JobView::Solving {
            status: guard.status,
        },
    };
    Ok(Json(view))
}

/// DELETE /schedules/{id} - Forget a job.
async fn delete_schedule(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    match state.solver.remove_job(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new());
        (state.clone(), router(state))
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn two_employee_request() -> Value {
        json!({
            "shifts": [{ "id": "s1", "start": "2025-09-29T09:00:00Z", "end": "2025-09-29T17:00:00Z",
                         "requiredCount": 1, "roleId": "cook" }],
            "employees": [
                { "id": "e1", "hourlyRate": 20.0, "eligibleRoles": ["cook"] },
                { "id": "e2", "hourlyRate": 25.0, "eligibleRoles": ["cook"] }
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let response = app.oneshot(empty_request(Method::GET, "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "UP" }));
    }

    #[tokio::test]
    async fn test_solve_returns_optimal_roster() {
        let (_, app) = app();
        let response = app
            .oneshot(json_request(Method::POST, "/solve", &two_employee_request()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": "OPTIMAL",
                "objective": 2000,
                "assignments": [{ "shiftId": "s1", "employeeId": "e1" }]
            })
        );
    }

    #[tokio::test]
    async fn test_infeasible_is_not_an_error() {
        let (_, app) = app();
        let mut body = two_employee_request();
        body["shifts"][0]["requiredCount"] = json!(3);
        let response = app.oneshot(json_request(Method::POST, "/solve", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["status"], "INFEASIBLE");
        assert!(value["objective"].is_null());
        assert_eq!(value["assignments"], json!([]));
    }

    #[tokio::test]
    async fn test_validation_error_is_unprocessable() {
        let (_, app) = app();
        let mut body = two_employee_request();
        body["shifts"][0]["end"] = json!("2025-09-29T08:00:00Z");
        let response = app.oneshot(json_request(Method::POST, "/solve", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let value = body_json(response).await;
        assert!(value["error"].as_str().unwrap().contains("end must be after start"));
    }

    #[tokio::test]
    async fn test_demo_data_routes() {
        let (_, app) = app();
        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/demo-data"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!(["SMALL", "LARGE"]));

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/demo-data/small"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["shifts"].as_array().unwrap().len(), 28);

        let response = app
            .oneshot(empty_request(Method::GET, "/demo-data/huge"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_background_job_lifecycle() {
        let (state, app) = app();
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/schedules", &two_employee_request()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let id = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(state.solver.list_jobs(), vec![id.clone()]);

        let uri = format!("/schedules/{id}");
        let mut value = Value::Null;
        for _ in 0..200 {
            let response = app.clone().oneshot(empty_request(Method::GET, &uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            value = body_json(response).await;
            if value["status"] != "SOLVING" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        assert_eq!(value["status"], "OPTIMAL");
        assert_eq!(value["objective"], 2000);

        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
