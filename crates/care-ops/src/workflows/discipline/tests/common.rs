use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::workflows::discipline::domain::{
    CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionSubmission, EmployeeId,
};
use crate::workflows::discipline::repository::{
    AlertError, CorrectiveActionRepository, RepositoryError, TierAlert, TierAlertPublisher,
};
use crate::workflows::discipline::stats::FixedClock;
use crate::workflows::discipline::{discipline_router, DisciplineService};

pub(super) type TestService = DisciplineService<MemoryRepository, MemoryAlerts, FixedClock>;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn employee() -> EmployeeId {
    EmployeeId("emp-204".to_string())
}

pub(super) fn submission(category: &str, violation_date: NaiveDate) -> CorrectiveActionSubmission {
    CorrectiveActionSubmission {
        category: category.to_string(),
        violation_date,
        points_assigned: None,
        description: "Observed by shift lead".to_string(),
        issued_by: Some("  Dana Whitfield ".to_string()),
    }
}

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryAlerts>) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service =
        DisciplineService::with_clock(repository.clone(), alerts.clone(), FixedClock(today()));
    (service, repository, alerts)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    discipline_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CorrectiveActionId, CorrectiveActionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: CorrectiveActionRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl CorrectiveActionRepository for MemoryRepository {
    fn insert(
        &self,
        record: CorrectiveActionRecord,
    ) -> Result<CorrectiveActionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: CorrectiveActionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(
        &self,
        id: &CorrectiveActionId,
    ) -> Result<Option<CorrectiveActionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CorrectiveActionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.employee_id == employee_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<TierAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<TierAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl TierAlertPublisher for MemoryAlerts {
    fn publish(&self, alert: TierAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct OfflineAlerts;

impl TierAlertPublisher for OfflineAlerts {
    fn publish(&self, _alert: TierAlert) -> Result<(), AlertError> {
        Err(AlertError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl CorrectiveActionRepository for ConflictRepository {
    fn insert(
        &self,
        _record: CorrectiveActionRecord,
    ) -> Result<CorrectiveActionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: CorrectiveActionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(
        &self,
        _id: &CorrectiveActionId,
    ) -> Result<Option<CorrectiveActionRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_employee(
        &self,
        _employee_id: &EmployeeId,
    ) -> Result<Vec<CorrectiveActionRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl CorrectiveActionRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: CorrectiveActionRecord,
    ) -> Result<CorrectiveActionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CorrectiveActionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &CorrectiveActionId,
    ) -> Result<Option<CorrectiveActionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_employee(
        &self,
        _employee_id: &EmployeeId,
    ) -> Result<Vec<CorrectiveActionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
