use super::super::domain::CorrectiveActionRecord;
use super::levels::DisciplineLevel;
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the trailing window in which infractions still count.
pub const ROLLING_WINDOW_DAYS: i64 = 90;

/// Source of "today" for point calculations.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned date, used by reports with an explicit evaluation date and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How a rolling total below zero is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativePointsPolicy {
    /// Negative adjustments act as credit and may drive the total below zero.
    #[default]
    AllowCredit,
    /// The reported total never drops below zero.
    ClampAtZero,
}

/// Point standing for one employee as of a given day. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisciplineStats {
    pub current_points: i32,
    pub discipline_level: DisciplineLevel,
    pub rolling_count: usize,
    pub expired_count: usize,
    pub voided_count: usize,
    pub total_count: usize,
}

impl DisciplineStats {
    pub fn next_level(&self) -> Option<DisciplineLevel> {
        self.discipline_level.next()
    }

    /// Points still needed to reach the next tier; `None` at the top tier.
    pub fn points_to_next_level(&self) -> Option<i32> {
        self.next_level()
            .map(|next| next.threshold().saturating_sub(self.current_points))
    }
}

/// Records split by how they count toward the rolling total.
#[derive(Debug, Default)]
pub struct RecordPartition<'a> {
    pub rolling: Vec<&'a CorrectiveActionRecord>,
    pub expired: Vec<&'a CorrectiveActionRecord>,
    pub voided: Vec<&'a CorrectiveActionRecord>,
}

impl<'a> RecordPartition<'a> {
    pub fn len(&self) -> usize {
        self.rolling.len() + self.expired.len() + self.voided.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rolling_points(&self) -> i32 {
        self.rolling
            .iter()
            .fold(0i32, |total, record| total.saturating_add(record.effective_points()))
    }
}

/// First day still inside the rolling window ending on `today`.
pub fn rolling_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ROLLING_WINDOW_DAYS)
}

/// Splits records into voided, rolling (on or after the cutoff) and expired buckets.
pub fn partition(records: &[CorrectiveActionRecord], today: NaiveDate) -> RecordPartition<'_> {
    let cutoff = rolling_cutoff(today);
    let mut buckets = RecordPartition::default();

    for record in records {
        if record.is_voided() {
            buckets.voided.push(record);
        } else if record.violation_date >= cutoff {
            buckets.rolling.push(record);
        } else {
            buckets.expired.push(record);
        }
    }

    buckets
}

/// Stats with the default negative-points policy.
pub fn compute_stats(records: &[CorrectiveActionRecord], today: NaiveDate) -> DisciplineStats {
    DisciplineStatsCalculator::with_clock(FixedClock(today)).compute(records, today)
}

/// Stateless calculator pairing the point rules with an injected clock.
#[derive(Debug, Clone)]
pub struct DisciplineStatsCalculator<C = SystemClock> {
    clock: C,
    policy: NegativePointsPolicy,
}

impl<C: Clock> DisciplineStatsCalculator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            policy: NegativePointsPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: NegativePointsPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn compute_now(&self, records: &[CorrectiveActionRecord]) -> DisciplineStats {
        self.compute(records, self.clock.today())
    }

    pub fn compute(&self, records: &[CorrectiveActionRecord], today: NaiveDate) -> DisciplineStats {
        let buckets = partition(records, today);

        let current_points = match self.policy {
            NegativePointsPolicy::AllowCredit => buckets.rolling_points(),
            NegativePointsPolicy::ClampAtZero => buckets.rolling_points().max(0),
        };

        DisciplineStats {
            current_points,
            discipline_level: DisciplineLevel::from_points(current_points),
            rolling_count: buckets.rolling.len(),
            expired_count: buckets.expired.len(),
            voided_count: buckets.voided.len(),
            total_count: records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::domain::{CorrectiveActionId, CorrectiveActionStatus, EmployeeId};
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
    }

    fn record(
        days_ago: i64,
        status: CorrectiveActionStatus,
        points_assigned: u32,
        points_adjusted: Option<i32>,
    ) -> CorrectiveActionRecord {
        CorrectiveActionRecord {
            id: CorrectiveActionId(format!("ca-{days_ago}-{points_assigned}")),
            employee_id: EmployeeId("emp-100".to_string()),
            category: "policy_violation".to_string(),
            violation_date: today() - Duration::days(days_ago),
            status,
            points_assigned,
            points_adjusted,
            description: "test record".to_string(),
            issued_by: None,
            adjustment_reason: None,
            void_reason: None,
            acknowledged_on: None,
        }
    }

    fn rolling(points: u32) -> CorrectiveActionRecord {
        record(5, CorrectiveActionStatus::Acknowledged, points, None)
    }

    #[test]
    fn single_rolling_record_reaches_verbal_warning() {
        let stats = compute_stats(&[rolling(6)], today());
        assert_eq!(stats.current_points, 6);
        assert_eq!(stats.discipline_level, DisciplineLevel::VerbalWarning);
        assert_eq!(stats.discipline_level.label(), "Verbal Warning");
    }

    #[test]
    fn adjustment_overrides_assigned_points() {
        let records = [record(
            10,
            CorrectiveActionStatus::PendingSignature,
            10,
            Some(3),
        )];
        let stats = compute_stats(&records, today());
        assert_eq!(stats.current_points, 3);
        assert_eq!(stats.discipline_level, DisciplineLevel::Coaching);
    }

    #[test]
    fn eighteen_points_triggers_termination_review() {
        let stats = compute_stats(&[rolling(10), rolling(8)], today());
        assert_eq!(stats.current_points, 18);
        assert_eq!(stats.discipline_level, DisciplineLevel::TerminationReview);
        assert_eq!(stats.points_to_next_level(), None);
    }

    #[test]
    fn records_older_than_window_expire() {
        let records = [record(91, CorrectiveActionStatus::Acknowledged, 20, None)];
        let stats = compute_stats(&records, today());
        assert_eq!(stats.current_points, 0);
        assert_eq!(stats.discipline_level, DisciplineLevel::GoodStanding);
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.rolling_count, 0);
    }

    #[test]
    fn voided_records_never_count() {
        let records = [record(0, CorrectiveActionStatus::Voided, 20, None)];
        let stats = compute_stats(&records, today());
        assert_eq!(stats.current_points, 0);
        assert_eq!(stats.voided_count, 1);
        assert_eq!(stats.rolling_count, 0);
        assert_eq!(stats.total_count, 1);
    }

    #[test]
    fn cutoff_day_is_inside_the_window() {
        let on_cutoff = record(90, CorrectiveActionStatus::Acknowledged, 4, None);
        assert_eq!(on_cutoff.violation_date, rolling_cutoff(today()));

        let stats = compute_stats(&[on_cutoff], today());
        assert_eq!(stats.rolling_count, 1);
        assert_eq!(stats.current_points, 4);
    }

    #[test]
    fn voided_wins_over_date_buckets() {
        let records = [
            record(2, CorrectiveActionStatus::Voided, 6, None),
            record(200, CorrectiveActionStatus::Voided, 6, None),
        ];
        let buckets = partition(&records, today());
        assert_eq!(buckets.voided.len(), 2);
        assert!(buckets.rolling.is_empty());
        assert!(buckets.expired.is_empty());
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let records = vec![
            record(0, CorrectiveActionStatus::PendingSignature, 1, None),
            record(45, CorrectiveActionStatus::Disputed, 3, Some(1)),
            record(90, CorrectiveActionStatus::Acknowledged, 2, None),
            record(91, CorrectiveActionStatus::Acknowledged, 2, None),
            record(400, CorrectiveActionStatus::PendingSignature, 6, None),
            record(30, CorrectiveActionStatus::Voided, 10, None),
            record(120, CorrectiveActionStatus::Voided, 10, None),
        ];

        let buckets = partition(&records, today());
        assert_eq!(buckets.len(), records.len());

        let mut seen: Vec<&str> = buckets
            .rolling
            .iter()
            .chain(&buckets.expired)
            .chain(&buckets.voided)
            .map(|record| record.id.0.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), records.len());

        let stats = compute_stats(&records, today());
        assert_eq!(
            stats.rolling_count + stats.expired_count + stats.voided_count,
            stats.total_count
        );
        assert_eq!(stats.rolling_count, 3);
        assert_eq!(stats.expired_count, 2);
        assert_eq!(stats.voided_count, 2);
        assert_eq!(stats.current_points, 1 + 1 + 2);
    }

    #[test]
    fn negative_credit_respects_policy() {
        let records = [
            rolling(2),
            record(3, CorrectiveActionStatus::Acknowledged, 4, Some(-5)),
        ];

        let credit = compute_stats(&records, today());
        assert_eq!(credit.current_points, -3);
        assert_eq!(credit.discipline_level, DisciplineLevel::GoodStanding);

        let clamped = DisciplineStatsCalculator::with_clock(FixedClock(today()))
            .with_policy(NegativePointsPolicy::ClampAtZero)
            .compute_now(&records);
        assert_eq!(clamped.current_points, 0);
        assert_eq!(clamped.discipline_level, DisciplineLevel::GoodStanding);
    }

    #[test]
    fn compute_now_reads_injected_clock() {
        let records = [record(0, CorrectiveActionStatus::Acknowledged, 7, None)];
        let calculator = DisciplineStatsCalculator::with_clock(FixedClock(today()));
        assert_eq!(calculator.compute_now(&records).current_points, 7);

        let later = DisciplineStatsCalculator::with_clock(FixedClock(
            today() + Duration::days(ROLLING_WINDOW_DAYS + 1),
        ));
        let stats = later.compute_now(&records);
        assert_eq!(stats.current_points, 0);
        assert_eq!(stats.expired_count, 1);
    }

    #[test]
    fn points_to_next_level_counts_remaining_gap() {
        let stats = compute_stats(&[rolling(7)], today());
        assert_eq!(stats.next_level(), Some(DisciplineLevel::WrittenWarning));
        assert_eq!(stats.points_to_next_level(), Some(3));

        let empty = compute_stats(&[], today());
        assert_eq!(empty.discipline_level, DisciplineLevel::GoodStanding);
        assert_eq!(empty.points_to_next_level(), Some(1));
        assert_eq!(empty.total_count, 0);
    }
}
