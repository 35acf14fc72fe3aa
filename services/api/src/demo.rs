use crate::infra::{InMemoryCorrectiveActionRepository, InMemoryTierAlertPublisher};
use care_ops::config::AppConfig;
use care_ops::error::AppError;
use care_ops::workflows::discipline::{
    build_documents, CorrectiveActionDocument, CorrectiveActionImporter,
    CorrectiveActionSubmission, DisciplineService, DisciplineStatsCalculator,
    DisciplineStatsView, EmployeeId, FixedClock, ViolationCatalog,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the final corrective-action document as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DisciplineReportArgs {
    /// Corrective-action CSV export to summarize
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation date for the rolling window (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Only report on this employee id
    #[arg(long)]
    pub(crate) employee: Option<String>,
    /// List rolling, expired, and voided records under each employee
    #[arg(long)]
    pub(crate) list_records: bool,
}

pub(crate) fn run_discipline_report(args: DisciplineReportArgs) -> Result<(), AppError> {
    let DisciplineReportArgs {
        csv,
        today,
        employee,
        list_records,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = ViolationCatalog::standard();

    let mut records = CorrectiveActionImporter::from_path(&csv, &catalog)?;
    let imported = records.len();
    if let Some(employee) = employee.as_deref().map(str::trim) {
        records.retain(|record| record.employee_id.0 == employee);
    }

    let calculator = DisciplineStatsCalculator::with_clock(FixedClock(today))
        .with_policy(config.discipline.negative_points);
    let documents = build_documents(&records, today, &calculator, &catalog);

    println!("Discipline standing report");
    println!(
        "Source: {} ({} records) | evaluated {}",
        csv.display(),
        imported,
        today
    );

    if documents.is_empty() {
        println!("\nNo corrective actions matched.");
        return Ok(());
    }

    for document in &documents {
        render_document(document, list_records);
    }

    Ok(())
}

/// Walks one synthetic aide through a quarter of corrective actions.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, json } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let repository = Arc::new(InMemoryCorrectiveActionRepository::default());
    let alerts = Arc::new(InMemoryTierAlertPublisher::default());
    let service = DisciplineService::with_clock(repository, alerts.clone(), FixedClock(today));
    let employee = EmployeeId("demo-aide-01".to_string());

    println!("Corrective action demo for {} (as of {})", employee, today);
    println!("\nIntake");

    let mut recorded = Vec::new();
    for submission in demo_submissions(today) {
        let label = service
            .catalog()
            .label_for(&submission.category)
            .unwrap_or("Unknown");
        let record = match service.record(&employee, submission) {
            Ok(record) => record,
            Err(err) => {
                println!("- {} rejected: {}", label, err);
                continue;
            }
        };
        let stats = match service.stats(&employee) {
            Ok(stats) => stats.to_view(),
            Err(err) => {
                println!("  Standing unavailable: {}", err);
                return Ok(());
            }
        };
        println!(
            "- {} on {} (+{}) -> {} pts, {}",
            label,
            record.violation_date,
            record.points_assigned,
            stats.current_points,
            stats.discipline_level_label
        );
        recorded.push(record);
    }

    println!("\nLifecycle");
    if let Some(first) = recorded.first() {
        report_step(
            "Acknowledged",
            service.acknowledge(&first.id, Some(today)),
        );
    }
    if let Some(second) = recorded.get(1) {
        report_step("Disputed", service.dispute(&second.id));
        report_step(
            "Adjusted",
            service.adjust_points(&second.id, 2, "dose was charted on paper MAR"),
        );
    }
    if let Some(third) = recorded.get(2) {
        report_step(
            "Voided",
            service.void(&third.id, "entered against the wrong aide"),
        );
    }

    let events = alerts.events();
    if events.is_empty() {
        println!("\nTier alerts: none dispatched");
    } else {
        println!("\nTier alerts");
        for alert in events {
            println!(
                "- {}: {} -> {} at {} pts",
                alert.template,
                alert.previous_level.label(),
                alert.current_level.label(),
                alert.current_points
            );
        }
    }

    let document = match service.document(&employee) {
        Ok(document) => document,
        Err(err) => {
            println!("\nDocument unavailable: {}", err);
            return Ok(());
        }
    };

    if json {
        match serde_json::to_string_pretty(&document) {
            Ok(payload) => println!("\n{}", payload),
            Err(err) => println!("\nDocument payload unavailable: {}", err),
        }
    } else {
        render_document(&document, true);
    }

    Ok(())
}

fn report_step<T, E: std::fmt::Display>(label: &str, result: Result<T, E>) {
    match result {
        Ok(_) => println!("- {}", label),
        Err(err) => println!("- {} failed: {}", label, err),
    }
}

fn demo_submissions(today: NaiveDate) -> Vec<CorrectiveActionSubmission> {
    let entry = |category: &str, days_ago: i64, description: &str| CorrectiveActionSubmission {
        category: category.to_string(),
        violation_date: today - Duration::days(days_ago),
        points_assigned: None,
        description: description.to_string(),
        issued_by: Some("House Manager".to_string()),
    };

    vec![
        entry("tardiness", 62, "Clocked in 25 minutes late for day shift"),
        entry("medication_error", 41, "8pm medication pass not charted"),
        entry("dress_code", 30, "No name badge"),
        entry("no_call_no_show", 12, "Missed Saturday overnight"),
        entry("unexcused_absence", 3, "Left shift without coverage"),
        entry("policy_violation", 130, "Personal phone use during med pass"),
    ]
}

fn render_document(document: &CorrectiveActionDocument, list_records: bool) {
    println!("\nEmployee {}", document.employee_id);
    render_standing(&document.stats);
    println!(
        "Rolling window {} -> {}",
        document.window_start, document.generated_on
    );

    if !list_records {
        return;
    }

    for (heading, views) in [
        ("Rolling", &document.rolling),
        ("Expired", &document.expired),
        ("Voided", &document.voided),
    ] {
        if views.is_empty() {
            continue;
        }
        println!("{}", heading);
        for view in views {
            println!(
                "  - {} {} [{}] {} pts{}",
                view.violation_date,
                view.category_label,
                view.status_label,
                view.effective_points,
                view.adjustment_reason
                    .as_deref()
                    .or(view.void_reason.as_deref())
                    .map(|reason| format!(" ({reason})"))
                    .unwrap_or_default()
            );
        }
    }
}

fn render_standing(stats: &DisciplineStatsView) {
    println!(
        "Standing: {} ({} pts) {} {:.0}%",
        stats.discipline_level_label,
        stats.current_points,
        progress_bar(stats.progress.percent),
        stats.progress.percent
    );
    match (stats.next_level_label, stats.points_to_next_level) {
        (Some(next), Some(points)) => println!("Next level: {} in {} pts", next, points),
        _ => println!("Next level: none (highest tier)"),
    }
    println!(
        "Records: {} rolling | {} expired | {} voided",
        stats.rolling_count, stats.expired_count, stats.voided_count
    );
}

fn progress_bar(percent: f32) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f32).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_is_fixed_width() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn demo_history_spans_the_rolling_window() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let submissions = demo_submissions(today);
        let catalog = ViolationCatalog::standard();

        assert!(submissions
            .iter()
            .all(|submission| catalog.find(&submission.category).is_some()));
        assert!(submissions
            .iter()
            .any(|submission| submission.violation_date < today - Duration::days(90)));
    }

    #[test]
    fn demo_runs_against_a_fixed_date() {
        let args = DemoArgs {
            today: NaiveDate::from_ymd_opt(2025, 10, 1),
            json: false,
        };
        assert!(run_demo(args).is_ok());
    }
}
