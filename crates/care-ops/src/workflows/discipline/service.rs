use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::catalog::ViolationCatalog;
use super::domain::{
    CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionStatus,
    CorrectiveActionSubmission, EmployeeId,
};
use super::report::{build_document, CorrectiveActionDocument};
use super::repository::{
    CorrectiveActionRepository, RepositoryError, TierAlert, TierAlertPublisher,
};
use super::stats::{
    Clock, DisciplineStats, DisciplineStatsCalculator, NegativePointsPolicy, SystemClock,
};

/// Service composing the repository, the point calculator, and escalation alerts.
///
/// Point-changing calls for one employee are serialized inside a service instance so each
/// tier crossing produces exactly one alert.
pub struct DisciplineService<R, A, C = SystemClock> {
    repository: Arc<R>,
    alerts: Arc<A>,
    calculator: DisciplineStatsCalculator<C>,
    catalog: Arc<ViolationCatalog>,
    employee_locks: EmployeeLocks,
}

#[derive(Default)]
struct EmployeeLocks {
    locks: Mutex<HashMap<EmployeeId, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    fn for_employee(&self, employee_id: &EmployeeId) -> Arc<Mutex<()>> {
        let mut guard = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entry(employee_id.clone()).or_default().clone()
    }
}

static ACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_action_id() -> CorrectiveActionId {
    let id = ACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CorrectiveActionId(format!("ca-{id:06}"))
}

impl<R, A> DisciplineService<R, A, SystemClock>
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, policy: NegativePointsPolicy) -> Self {
        Self::with_clock(repository, alerts, SystemClock).with_policy(policy)
    }
}

impl<R, A, C> DisciplineService<R, A, C>
where
    R: CorrectiveActionRepository + 'static,
    A: TierAlertPublisher + 'static,
    C: Clock + 'static,
{
    pub fn with_clock(repository: Arc<R>, alerts: Arc<A>, clock: C) -> Self {
        Self {
            repository,
            alerts,
            calculator: DisciplineStatsCalculator::with_clock(clock),
            catalog: Arc::new(ViolationCatalog::standard()),
            employee_locks: EmployeeLocks::default(),
        }
    }

    pub fn with_policy(mut self, policy: NegativePointsPolicy) -> Self {
        self.calculator = self.calculator.with_policy(policy);
        self
    }

    pub fn catalog(&self) -> &ViolationCatalog {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.calculator.today()
    }

    /// Record a new corrective action awaiting the employee's signature.
    ///
    /// Once the record is stored the call succeeds; escalation alert failures are logged.
    pub fn record(
        &self,
        employee_id: &EmployeeId,
        submission: CorrectiveActionSubmission,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        let category = self
            .catalog
            .find(&submission.category)
            .ok_or_else(|| DisciplineServiceError::UnknownCategory(submission.category.clone()))?;

        let today = self.today();
        if submission.violation_date > today {
            return Err(DisciplineServiceError::FutureViolationDate {
                violation_date: submission.violation_date,
                today,
            });
        }

        let lock = self.employee_locks.for_employee(employee_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let before = self.stats(employee_id)?;

        let record = CorrectiveActionRecord {
            id: next_action_id(),
            employee_id: employee_id.clone(),
            category: category.key.to_string(),
            violation_date: submission.violation_date,
            status: CorrectiveActionStatus::PendingSignature,
            points_assigned: submission
                .points_assigned
                .unwrap_or(category.default_points),
            points_adjusted: None,
            description: submission.description.trim().to_string(),
            issued_by: submission
                .issued_by
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            adjustment_reason: None,
            void_reason: None,
            acknowledged_on: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            employee = %employee_id,
            action = %stored.id,
            category = %stored.category,
            points = stored.points_assigned,
            "corrective action recorded"
        );

        self.publish_if_escalated(employee_id, before);
        Ok(stored)
    }

    /// Employee signature on a pending (or resolved disputed) action. The signature date must
    /// fall between the violation date and today.
    pub fn acknowledge(
        &self,
        id: &CorrectiveActionId,
        acknowledged_on: Option<NaiveDate>,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        let today = self.today();
        let signed_on = acknowledged_on.unwrap_or(today);
        self.transition(id, CorrectiveActionStatus::Acknowledged, |record| {
            if signed_on < record.violation_date || signed_on > today {
                return Err(DisciplineServiceError::AcknowledgementOutOfRange {
                    acknowledged_on: signed_on,
                    violation_date: record.violation_date,
                    today,
                });
            }
            record.acknowledged_on = Some(signed_on);
            Ok(())
        })
    }

    pub fn dispute(
        &self,
        id: &CorrectiveActionId,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        self.transition(id, CorrectiveActionStatus::Disputed, |_| Ok(()))
    }

    /// Administratively nullify an action. The record is retained for audit.
    pub fn void(
        &self,
        id: &CorrectiveActionId,
        reason: &str,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        let reason = non_blank(reason)?;
        let record = self.transition(id, CorrectiveActionStatus::Voided, |record| {
            record.void_reason = Some(reason);
            Ok(())
        })?;
        info!(employee = %record.employee_id, action = %record.id, "corrective action voided");
        Ok(record)
    }

    /// Override the point value counted for an action.
    pub fn adjust_points(
        &self,
        id: &CorrectiveActionId,
        points: i32,
        reason: &str,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        let reason = non_blank(reason)?;
        let employee_id = self.fetch(id)?.employee_id;
        let lock = self.employee_locks.for_employee(&employee_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.fetch(id)?;
        if record.is_voided() {
            return Err(DisciplineServiceError::Voided(id.clone()));
        }

        let before = self.stats(&employee_id)?;

        record.points_adjusted = Some(points);
        record.adjustment_reason = Some(reason);
        self.repository.update(record.clone())?;

        if points < 0 {
            warn!(
                action = %record.id,
                points,
                "negative point adjustment recorded"
            );
        }
        info!(
            employee = %record.employee_id,
            action = %record.id,
            assigned = record.points_assigned,
            adjusted = points,
            "corrective action points adjusted"
        );

        self.publish_if_escalated(&employee_id, before);
        Ok(record)
    }

    pub fn get(
        &self,
        id: &CorrectiveActionId,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        self.fetch(id)
    }

    /// All of an employee's actions, newest violation first.
    pub fn list(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CorrectiveActionRecord>, DisciplineServiceError> {
        let mut records = self.repository.for_employee(employee_id)?;
        records.sort_by(|a, b| {
            b.violation_date
                .cmp(&a.violation_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    pub fn stats(&self, employee_id: &EmployeeId) -> Result<DisciplineStats, DisciplineServiceError> {
        let records = self.repository.for_employee(employee_id)?;
        Ok(self.calculator.compute_now(&records))
    }

    pub fn document(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<CorrectiveActionDocument, DisciplineServiceError> {
        let records = self.repository.for_employee(employee_id)?;
        Ok(build_document(
            employee_id,
            &records,
            self.today(),
            &self.calculator,
            &self.catalog,
        ))
    }

    fn fetch(
        &self,
        id: &CorrectiveActionId,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn transition<F>(
        &self,
        id: &CorrectiveActionId,
        next: CorrectiveActionStatus,
        apply: F,
    ) -> Result<CorrectiveActionRecord, DisciplineServiceError>
    where
        F: FnOnce(&mut CorrectiveActionRecord) -> Result<(), DisciplineServiceError>,
    {
        let mut record = self.fetch(id)?;
        if !record.status.can_transition_to(next) {
            return Err(DisciplineServiceError::InvalidTransition {
                id: id.clone(),
                from: record.status,
                to: next,
            });
        }

        apply(&mut record)?;
        record.status = next;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Runs after the write has been stored, so failures here are logged rather than returned.
    fn publish_if_escalated(&self, employee_id: &EmployeeId, before: DisciplineStats) {
        let after = match self.stats(employee_id) {
            Ok(after) => after,
            Err(error) => {
                warn!(employee = %employee_id, %error, "standing unavailable after write");
                return;
            }
        };
        if after.discipline_level <= before.discipline_level {
            return;
        }

        warn!(
            employee = %employee_id,
            from = before.discipline_level.label(),
            to = after.discipline_level.label(),
            points = after.current_points,
            "discipline level escalated"
        );

        let mut details = BTreeMap::new();
        details.insert(
            "previous_level".to_string(),
            before.discipline_level.label().to_string(),
        );
        details.insert(
            "current_level".to_string(),
            after.discipline_level.label().to_string(),
        );
        details.insert(
            "current_points".to_string(),
            after.current_points.to_string(),
        );

        let alert = TierAlert {
            template: "discipline_tier_escalated".to_string(),
            employee_id: employee_id.clone(),
            previous_level: before.discipline_level,
            current_level: after.discipline_level,
            current_points: after.current_points,
            details,
        };
        if let Err(error) = self.alerts.publish(alert) {
            warn!(employee = %employee_id, %error, "tier escalation alert not delivered");
        }
    }
}

fn non_blank(reason: &str) -> Result<String, DisciplineServiceError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        Err(DisciplineServiceError::BlankReason)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Error raised by the discipline service.
#[derive(Debug, thiserror::Error)]
pub enum DisciplineServiceError {
    #[error("unknown violation category '{0}'")]
    UnknownCategory(String),
    #[error("violation date {violation_date} is after today ({today})")]
    FutureViolationDate {
        violation_date: NaiveDate,
        today: NaiveDate,
    },
    #[error("a reason is required")]
    BlankReason,
    #[error("corrective action {id} cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        id: CorrectiveActionId,
        from: CorrectiveActionStatus,
        to: CorrectiveActionStatus,
    },
    #[error("corrective action {0} is voided")]
    Voided(CorrectiveActionId),
    #[error("acknowledged on {acknowledged_on}, outside {violation_date}..={today}")]
    AcknowledgementOutOfRange {
        acknowledged_on: NaiveDate,
        violation_date: NaiveDate,
        today: NaiveDate,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
