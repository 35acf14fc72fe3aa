use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionSubmission, EmployeeId,
};
use super::report::{CorrectiveActionView, DisciplineStatsView};
use super::repository::{CorrectiveActionRepository, RepositoryError, TierAlertPublisher};
use super::service::{DisciplineService, DisciplineServiceError};
use super::stats::Clock;

type SharedService<R, A, C> = Arc<DisciplineService<R, A, C>>;

/// Router builder exposing corrective-action intake, lifecycle, and standing endpoints.
pub fn discipline_router<R, A, C>(service: SharedService<R, A, C>) -> Router
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees/:employee_id/corrective-actions",
            post(record_handler::<R, A, C>).get(list_handler::<R, A, C>),
        )
        .route(
            "/api/v1/employees/:employee_id/discipline",
            get(stats_handler::<R, A, C>),
        )
        .route(
            "/api/v1/employees/:employee_id/discipline/document",
            get(document_handler::<R, A, C>),
        )
        .route(
            "/api/v1/corrective-actions/:action_id/acknowledge",
            post(acknowledge_handler::<R, A, C>),
        )
        .route(
            "/api/v1/corrective-actions/:action_id/dispute",
            post(dispute_handler::<R, A, C>),
        )
        .route(
            "/api/v1/corrective-actions/:action_id/void",
            post(void_handler::<R, A, C>),
        )
        .route(
            "/api/v1/corrective-actions/:action_id/adjust",
            post(adjust_handler::<R, A, C>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AcknowledgeRequest {
    #[serde(default)]
    pub(crate) acknowledged_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoidRequest {
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdjustRequest {
    pub(crate) points: i32,
    pub(crate) reason: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CorrectiveActionListResponse {
    pub(crate) employee_id: EmployeeId,
    pub(crate) records: Vec<CorrectiveActionView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DisciplineStandingResponse {
    pub(crate) employee_id: EmployeeId,
    pub(crate) as_of: NaiveDate,
    pub(crate) stats: DisciplineStatsView,
}

pub(crate) async fn record_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(employee_id): Path<String>,
    axum::Json(submission): axum::Json<CorrectiveActionSubmission>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let employee_id = EmployeeId(employee_id);
    match service.record(&employee_id, submission) {
        Ok(record) => {
            let view = record.to_view(service.catalog());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let employee_id = EmployeeId(employee_id);
    match service.list(&employee_id) {
        Ok(records) => {
            let records = records
                .iter()
                .map(|record| record.to_view(service.catalog()))
                .collect();
            let payload = CorrectiveActionListResponse {
                employee_id,
                records,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let employee_id = EmployeeId(employee_id);
    match service.stats(&employee_id) {
        Ok(stats) => {
            let payload = DisciplineStandingResponse {
                employee_id,
                as_of: service.today(),
                stats: stats.to_view(),
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn document_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    match service.document(&EmployeeId(employee_id)) {
        Ok(document) => (StatusCode::OK, axum::Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn acknowledge_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(action_id): Path<String>,
    axum::Json(request): axum::Json<AcknowledgeRequest>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let result = service.acknowledge(&CorrectiveActionId(action_id), request.acknowledged_on);
    record_response(&service, result)
}

pub(crate) async fn dispute_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(action_id): Path<String>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let result = service.dispute(&CorrectiveActionId(action_id));
    record_response(&service, result)
}

pub(crate) async fn void_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(action_id): Path<String>,
    axum::Json(request): axum::Json<VoidRequest>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let result = service.void(&CorrectiveActionId(action_id), &request.reason);
    record_response(&service, result)
}

pub(crate) async fn adjust_handler<R, A, C>(
    State(service): State<SharedService<R, A, C>>,
    Path(action_id): Path<String>,
    axum::Json(request): axum::Json<AdjustRequest>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    let result = service.adjust_points(
        &CorrectiveActionId(action_id),
        request.points,
        &request.reason,
    );
    record_response(&service, result)
}

fn record_response<R, A, C>(
    service: &DisciplineService<R, A, C>,
    result: Result<CorrectiveActionRecord, DisciplineServiceError>,
) -> Response
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    match result {
        Ok(record) => {
            let view = record.to_view(service.catalog());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: DisciplineServiceError) -> Response {
    let status = match &error {
        DisciplineServiceError::UnknownCategory(_)
        | DisciplineServiceError::FutureViolationDate { .. }
        | DisciplineServiceError::BlankReason
        | DisciplineServiceError::InvalidTransition { .. }
        | DisciplineServiceError::Voided(_)
        | DisciplineServiceError::AcknowledgementOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DisciplineServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DisciplineServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DisciplineServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
