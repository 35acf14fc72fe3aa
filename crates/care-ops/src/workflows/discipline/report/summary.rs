use super::super::catalog::ViolationCatalog;
use super::super::domain::CorrectiveActionRecord;
use super::super::stats::DisciplineStats;
use super::views::{CorrectiveActionView, DisciplineProgressView, DisciplineStatsView};

impl DisciplineStats {
    pub fn to_view(&self) -> DisciplineStatsView {
        DisciplineStatsView {
            current_points: self.current_points,
            discipline_level: self.discipline_level,
            discipline_level_label: self.discipline_level.label(),
            rolling_count: self.rolling_count,
            expired_count: self.expired_count,
            voided_count: self.voided_count,
            total_count: self.total_count,
            next_level_label: self.next_level().map(|level| level.label()),
            points_to_next_level: self.points_to_next_level(),
            progress: DisciplineProgressView::for_points(self.current_points),
        }
    }
}

impl CorrectiveActionRecord {
    /// Display projection; unknown categories fall back to the raw key.
    pub fn to_view(&self, catalog: &ViolationCatalog) -> CorrectiveActionView {
        let category = catalog.find(&self.category);

        CorrectiveActionView {
            id: self.id.clone(),
            employee_id: self.employee_id.clone(),
            category: self.category.clone(),
            category_label: category
                .map(|category| category.label.to_string())
                .unwrap_or_else(|| self.category.clone()),
            severity: category.map(|category| category.severity),
            violation_date: self.violation_date,
            status: self.status,
            status_label: self.status.label(),
            points_assigned: self.points_assigned,
            points_adjusted: self.points_adjusted,
            effective_points: self.effective_points(),
            description: self.description.clone(),
            issued_by: self.issued_by.clone(),
            adjustment_reason: self.adjustment_reason.clone(),
            void_reason: self.void_reason.clone(),
            acknowledged_on: self.acknowledged_on,
        }
    }
}
