//! # API REST
//!
//! REST API implementation for patientor.
//!
//! Handles:
//! - HTTP endpoints with axum under `/api`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for the health check and the error envelope; all record logic lives in
//! `patientor-core`.

#![warn(rust_2018_idioms)]

use api_shared::{ErrorRes, HealthService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use patientor_core::{DiagnosisService, PatientService, PatientorError, Services};
use records::{
    Diagnosis, Discharge, Entry, EntryDetails, Gender, Patient, PatientSummary, SickLeave,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Cloned into every handler; the services share one patient store.
#[derive(Clone, Debug)]
pub struct AppState {
    patients: PatientService,
    diagnoses: DiagnosisService,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            patients: services.patients,
            diagnoses: services.diagnoses,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        ping,
        list_diagnoses,
        list_patients,
        get_patient,
        create_patient,
        add_entry,
    ),
    components(schemas(
        Diagnosis,
        Discharge,
        Entry,
        EntryDetails,
        ErrorRes,
        Gender,
        Patient,
        PatientSummary,
        SickLeave,
    ))
)]
pub struct ApiDoc;

/// Builds the application router with CORS, Swagger UI and the `/api` routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/diagnoses", get(list_diagnoses))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id/entries", post(add_entry))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorRes>);

/// Maps a core error to its HTTP status and error envelope.
///
/// Only `NotFound` and `Validation` messages reach the client; anything else is logged and
/// reported as an opaque 500.
fn api_error(err: PatientorError, context: &str) -> ApiError {
    match err {
        PatientorError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorRes::new(msg))),
        PatientorError::Validation(msg) => (StatusCode::BAD_REQUEST, Json(ErrorRes::new(msg))),
        other => {
            tracing::error!("{} error: {:?}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new("Internal error")),
            )
        }
    }
}

/// Unwraps a JSON body, treating an unreadable body as JSON `null`.
///
/// The record parsers then reject it with the same message as any other non-object payload.
fn body_or_null(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!("unreadable request body: {}", rejection.body_text());
            Value::Null
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ping",
    responses(
        (status = 200, description = "Liveness check", body = String, content_type = "text/plain")
    )
)]
/// Liveness endpoint
///
/// Always answers `pong`; used by monitoring and by the frontend to detect the backend.
#[axum::debug_handler]
async fn ping() -> &'static str {
    HealthService::ping()
}

#[utoipa::path(
    get,
    path = "/api/diagnoses",
    responses(
        (status = 200, description = "All diagnosis codes", body = [Diagnosis])
    )
)]
/// List the diagnosis reference data in fixture order
#[axum::debug_handler]
async fn list_diagnoses(State(state): State<AppState>) -> Json<Vec<Diagnosis>> {
    Json(state.diagnoses.list())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients without ssn", body = [PatientSummary]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients
///
/// Returns every patient in store order with the `ssn` field removed.
///
/// # Errors
/// Returns `500 Internal Server Error` if the patient store is unavailable.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    state
        .patients
        .list_patients()
        .map(Json)
        .map_err(|e| api_error(e, "List patients"))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Full patient record", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch one patient, including `ssn` and all entries
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    state
        .patients
        .get_patient(&id)
        .map(Json)
        .map_err(|e| api_error(e, "Get patient"))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body(content = Value, description = "Patient fields: name, dateOfBirth, ssn, gender, occupation"),
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid patient payload", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Register a new patient
///
/// The body is validated field by field; on success the stored record is returned with its
/// generated `id` and an empty `entries` list.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not a JSON object,
/// - a required field is missing or not a non-empty string,
/// - `gender` is not `male`, `female` or `other`.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let payload = body_or_null(body);
    match state.patients.create_patient(&payload) {
        Ok(patient) => Ok((StatusCode::CREATED, Json(patient))),
        Err(e) => Err(api_error(e, "Create patient")),
    }
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/entries",
    params(("id" = String, Path, description = "Patient identifier")),
    request_body(content = Value, description = "Hospital, OccupationalHealthcare or HealthCheck entry tagged by `type`"),
    responses(
        (status = 201, description = "Entry appended", body = Entry),
        (status = 400, description = "Invalid entry payload", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Append a medical entry to a patient
///
/// The patient is resolved before the body is inspected, so an unknown id yields 404 whatever
/// the payload.
///
/// # Errors
/// Returns `404 Not Found` for an unknown patient and `400 Bad Request` for an invalid entry.
#[axum::debug_handler]
async fn add_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let payload = body_or_null(body);
    match state.patients.add_entry(&id, &payload) {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(e) => Err(api_error(e, "Add entry")),
    }
}
