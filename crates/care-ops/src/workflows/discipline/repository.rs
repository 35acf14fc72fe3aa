use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{CorrectiveActionId, CorrectiveActionRecord, EmployeeId};
use super::stats::DisciplineLevel;

/// Storage abstraction; implementations scope results to the caller's permitted houses.
pub trait CorrectiveActionRepository: Send + Sync {
    fn insert(
        &self,
        record: CorrectiveActionRecord,
    ) -> Result<CorrectiveActionRecord, RepositoryError>;
    fn update(&self, record: CorrectiveActionRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        id: &CorrectiveActionId,
    ) -> Result<Option<CorrectiveActionRecord>, RepositoryError>;
    fn for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CorrectiveActionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for tier escalations (e-mail, HR inbox, dashboard feed).
pub trait TierAlertPublisher: Send + Sync {
    fn publish(&self, alert: TierAlert) -> Result<(), AlertError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAlert {
    pub template: String,
    pub employee_id: EmployeeId,
    pub previous_level: DisciplineLevel,
    pub current_level: DisciplineLevel,
    pub current_points: i32,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
