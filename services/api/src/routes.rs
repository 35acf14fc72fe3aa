use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use care_ops::error::AppError;
use care_ops::workflows::discipline::{
    build_documents, discipline_router, rolling_cutoff, Clock, CorrectiveActionDocument,
    CorrectiveActionImporter, CorrectiveActionRepository, DisciplineService,
    DisciplineStatsCalculator, DisciplineStatsView, EmployeeId, FixedClock, TierAlertPublisher,
    ViolationCatalog,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct DisciplineReportRequest {
    pub(crate) csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) employee_id: Option<String>,
    #[serde(default)]
    pub(crate) include_records: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeStandingEntry {
    pub(crate) employee_id: EmployeeId,
    pub(crate) stats: DisciplineStatsView,
}

#[derive(Debug, Serialize)]
pub(crate) struct DisciplineReportResponse {
    pub(crate) today: NaiveDate,
    pub(crate) window_start: NaiveDate,
    pub(crate) imported_records: usize,
    pub(crate) employees: Vec<EmployeeStandingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) documents: Option<Vec<CorrectiveActionDocument>>,
}

pub(crate) fn with_discipline_routes<R, A, C>(
    service: Arc<DisciplineService<R, A, C>>,
) -> axum::Router
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    discipline_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/discipline/report",
            axum::routing::post(discipline_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Standing for every employee in a posted CSV export, optionally narrowed to one employee.
pub(crate) async fn discipline_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DisciplineReportRequest>,
) -> Result<Json<DisciplineReportResponse>, AppError> {
    let DisciplineReportRequest {
        csv,
        today,
        employee_id,
        include_records,
    } = payload;

    let catalog = ViolationCatalog::standard();
    let mut records =
        CorrectiveActionImporter::from_reader(Cursor::new(csv.into_bytes()), &catalog)?;
    let imported_records = records.len();
    if let Some(employee_id) = employee_id.as_deref().map(str::trim) {
        records.retain(|record| record.employee_id.0 == employee_id);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let calculator =
        DisciplineStatsCalculator::with_clock(FixedClock(today)).with_policy(state.negative_points);
    let documents = build_documents(&records, today, &calculator, &catalog);
    debug!(
        imported_records,
        employees = documents.len(),
        %today,
        "built discipline report from export"
    );

    let employees = documents
        .iter()
        .map(|document| EmployeeStandingEntry {
            employee_id: document.employee_id.clone(),
            stats: document.stats.clone(),
        })
        .collect();

    Ok(Json(DisciplineReportResponse {
        today,
        window_start: rolling_cutoff(today),
        imported_records,
        employees,
        documents: include_records.then_some(documents),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryCorrectiveActionRepository, InMemoryTierAlertPublisher};
    use axum::body::Body;
    use axum::http::Request;
    use care_ops::workflows::discipline::{DisciplineLevel, NegativePointsPolicy};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const EXPORT: &str = "Employee ID,Violation Date,Category,Status,Points Assigned,Points Adjusted,Description\n\
emp-1,2025-09-20,No Call / No Show,acknowledged,,,\n\
emp-1,2025-09-25,Medication Error,,,,\n\
emp-2,2025-09-26,Tardiness,acknowledged,,-2,Covered a double\n\
emp-2,2025-04-01,Policy Violation,acknowledged,,,\n";

    fn state(ready: bool, negative_points: NegativePointsPolicy) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            negative_points,
        }
    }

    fn request(employee_id: Option<&str>, include_records: bool) -> DisciplineReportRequest {
        DisciplineReportRequest {
            csv: EXPORT.to_string(),
            today: NaiveDate::from_ymd_opt(2025, 10, 1),
            employee_id: employee_id.map(str::to_string),
            include_records,
        }
    }

    #[tokio::test]
    async fn discipline_report_endpoint_summarizes_each_employee() {
        let Json(body) = discipline_report_endpoint(
            Extension(state(true, NegativePointsPolicy::AllowCredit)),
            Json(request(None, false)),
        )
        .await
        .expect("report builds");

        assert_eq!(body.imported_records, 4);
        assert_eq!(body.employees.len(), 2);
        assert_eq!(body.employees[0].stats.current_points, 10);
        assert_eq!(
            body.employees[0].stats.discipline_level,
            DisciplineLevel::WrittenWarning
        );
        assert_eq!(body.employees[1].stats.current_points, -2);
        assert_eq!(body.employees[1].stats.expired_count, 1);
        assert!(body.documents.is_none());
    }

    #[tokio::test]
    async fn discipline_report_endpoint_filters_and_clamps() {
        let Json(body) = discipline_report_endpoint(
            Extension(state(true, NegativePointsPolicy::ClampAtZero)),
            Json(request(Some("emp-2"), true)),
        )
        .await
        .expect("report builds");

        assert_eq!(body.employees.len(), 1);
        assert_eq!(body.employees[0].stats.current_points, 0);
        let documents = body.documents.expect("documents returned");
        assert_eq!(documents[0].rolling.len(), 1);
        assert_eq!(documents[0].expired.len(), 1);
    }

    #[tokio::test]
    async fn discipline_report_endpoint_rejects_bad_rows() {
        let mut bad = request(None, false);
        bad.csv.push_str("emp-3,someday,Tardiness,,,,\n");

        let error = discipline_report_endpoint(
            Extension(state(true, NegativePointsPolicy::AllowCredit)),
            Json(bad),
        )
        .await
        .expect_err("bad date rejected");

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let service = Arc::new(DisciplineService::new(
            Arc::new(InMemoryCorrectiveActionRepository::default()),
            Arc::new(InMemoryTierAlertPublisher::default()),
            NegativePointsPolicy::AllowCredit,
        ));
        let app = with_discipline_routes(service)
            .layer(Extension(state(false, NegativePointsPolicy::AllowCredit)));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("ready executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("health executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
