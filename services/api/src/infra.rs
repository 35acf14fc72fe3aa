use care_ops::workflows::discipline::{
    AlertError, CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionRepository,
    EmployeeId, NegativePointsPolicy, RepositoryError, TierAlert, TierAlertPublisher,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) negative_points: NegativePointsPolicy,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCorrectiveActionRepository {
    records: Arc<Mutex<HashMap<CorrectiveActionId, CorrectiveActionRecord>>>,
}

impl CorrectiveActionRepository for InMemoryCorrectiveActionRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Keeps escalations in memory and mirrors each one to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTierAlertPublisher {
    events: Arc<Mutex<Vec<TierAlert>>>,
}

impl TierAlertPublisher for InMemoryTierAlertPublisher {
    fn publish(&self, alert: TierAlert) -> Result<(), AlertError> {
        info!(
            employee_id = %alert.employee_id,
            previous = alert.previous_level.label(),
            current = alert.current_level.label(),
            points = alert.current_points,
            "discipline tier escalated"
        );
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryTierAlertPublisher {
    pub(crate) fn events(&self) -> Vec<TierAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
