use super::super::domain::{
    CorrectiveActionId, CorrectiveActionStatus, EmployeeId, ViolationSeverity,
};
use super::super::stats::DisciplineLevel;
use chrono::NaiveDate;
use serde::Serialize;

/// Point total at which the progress bar is full.
pub const PROGRESS_FULL_POINTS: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Green,
    Yellow,
    Orange,
    Red,
}

impl ProgressBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// Bar width in percent, clamped to 0..=100.
pub fn progress_percent(current_points: i32) -> f32 {
    (current_points as f32 / PROGRESS_FULL_POINTS as f32 * 100.0).clamp(0.0, 100.0)
}

pub fn progress_band(current_points: i32) -> ProgressBand {
    if current_points >= 14 {
        ProgressBand::Red
    } else if current_points >= 10 {
        ProgressBand::Orange
    } else if current_points >= 6 {
        ProgressBand::Yellow
    } else {
        ProgressBand::Green
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineProgressView {
    pub percent: f32,
    pub band: ProgressBand,
    pub band_label: &'static str,
}

impl DisciplineProgressView {
    pub fn for_points(current_points: i32) -> Self {
        let band = progress_band(current_points);
        Self {
            percent: progress_percent(current_points),
            band,
            band_label: band.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineStatsView {
    pub current_points: i32,
    pub discipline_level: DisciplineLevel,
    pub discipline_level_label: &'static str,
    pub rolling_count: usize,
    pub expired_count: usize,
    pub voided_count: usize,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_to_next_level: Option<i32>,
    pub progress: DisciplineProgressView,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrectiveActionView {
    pub id: CorrectiveActionId,
    pub employee_id: EmployeeId,
    pub category: String,
    pub category_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<ViolationSeverity>,
    pub violation_date: NaiveDate,
    pub status: CorrectiveActionStatus,
    pub status_label: &'static str,
    pub points_assigned: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_adjusted: Option<i32>,
    pub effective_points: i32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_on: Option<NaiveDate>,
}

/// Printable corrective-action summary handed to the PDF export.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectiveActionDocument {
    pub employee_id: EmployeeId,
    pub generated_on: NaiveDate,
    pub window_start: NaiveDate,
    pub stats: DisciplineStatsView,
    pub rolling: Vec<CorrectiveActionView>,
    pub expired: Vec<CorrectiveActionView>,
    pub voided: Vec<CorrectiveActionView>,
}
