use super::super::catalog::ViolationCatalog;
use super::super::domain::{CorrectiveActionRecord, EmployeeId};
use super::super::stats::{partition, rolling_cutoff, Clock, DisciplineStatsCalculator};
use super::views::{CorrectiveActionDocument, CorrectiveActionView};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub fn build_document<C: Clock>(
    employee_id: &EmployeeId,
    records: &[CorrectiveActionRecord],
    today: NaiveDate,
    calculator: &DisciplineStatsCalculator<C>,
    catalog: &ViolationCatalog,
) -> CorrectiveActionDocument {
    let stats = calculator.compute(records, today);
    let buckets = partition(records, today);

    let views = |mut bucket: Vec<&CorrectiveActionRecord>| -> Vec<CorrectiveActionView> {
        bucket.sort_by(|a, b| {
            b.violation_date
                .cmp(&a.violation_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        bucket
            .into_iter()
            .map(|record| record.to_view(catalog))
            .collect()
    };

    CorrectiveActionDocument {
        employee_id: employee_id.clone(),
        generated_on: today,
        window_start: rolling_cutoff(today),
        stats: stats.to_view(),
        rolling: views(buckets.rolling),
        expired: views(buckets.expired),
        voided: views(buckets.voided),
    }
}

/// One document per employee found in `records`, ordered by employee id.
pub fn build_documents<C: Clock>(
    records: &[CorrectiveActionRecord],
    today: NaiveDate,
    calculator: &DisciplineStatsCalculator<C>,
    catalog: &ViolationCatalog,
) -> Vec<CorrectiveActionDocument> {
    let mut by_employee: BTreeMap<&EmployeeId, Vec<CorrectiveActionRecord>> = BTreeMap::new();
    for record in records {
        by_employee
            .entry(&record.employee_id)
            .or_default()
            .push(record.clone());
    }

    by_employee
        .into_iter()
        .map(|(employee_id, history)| {
            build_document(employee_id, &history, today, calculator, catalog)
        })
        .collect()
}
