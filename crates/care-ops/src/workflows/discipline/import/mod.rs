mod parser;

use super::catalog::ViolationCatalog;
use super::domain::{
    CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionStatus, EmployeeId,
};
use std::io::Read;
use std::path::Path;

use parser::CorrectiveActionRow;

/// Failures while loading a corrective-action spreadsheet. Row-level variants carry the
/// 1-based file line so the export can be corrected at the source.
#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { line: usize, value: String },
    InvalidStatus { line: usize, value: String },
    InvalidPoints { line: usize, value: String },
    UnknownCategory { line: usize, value: String },
    MissingEmployee { line: usize },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read corrective action export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid corrective action CSV data: {}", err),
            ImportError::InvalidDate { line, value } => {
                write!(f, "line {}: unparseable violation date '{}'", line, value)
            }
            ImportError::InvalidStatus { line, value } => {
                write!(f, "line {}: unknown status '{}'", line, value)
            }
            ImportError::InvalidPoints { line, value } => {
                write!(f, "line {}: invalid point value '{}'", line, value)
            }
            ImportError::UnknownCategory { line, value } => write!(
                f,
                "line {}: unknown category '{}' and no points assigned",
                line, value
            ),
            ImportError::MissingEmployee { line } => {
                write!(f, "line {}: employee id is required", line)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct CorrectiveActionImporter;

impl CorrectiveActionImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &ViolationCatalog,
    ) -> Result<Vec<CorrectiveActionRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &ViolationCatalog,
    ) -> Result<Vec<CorrectiveActionRecord>, ImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .map(|(line, row)| record_from_row(line, row, catalog))
            .collect()
    }
}

fn record_from_row(
    line: usize,
    row: CorrectiveActionRow,
    catalog: &ViolationCatalog,
) -> Result<CorrectiveActionRecord, ImportError> {
    let employee_id = row.employee_id.trim();
    if employee_id.is_empty() {
        return Err(ImportError::MissingEmployee { line });
    }

    let violation_date =
        parser::parse_violation_date(&row.violation_date).ok_or_else(|| {
            ImportError::InvalidDate {
                line,
                value: row.violation_date.clone(),
            }
        })?;

    let status = match row.status.as_deref() {
        Some(raw) => CorrectiveActionStatus::parse(raw).ok_or_else(|| {
            ImportError::InvalidStatus {
                line,
                value: raw.to_string(),
            }
        })?,
        None => CorrectiveActionStatus::PendingSignature,
    };

    let category = catalog.find(&row.category);
    let points_assigned = match row.points_assigned.as_deref() {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ImportError::InvalidPoints {
                line,
                value: raw.to_string(),
            })?,
        None => category
            .map(|category| category.default_points)
            .ok_or_else(|| ImportError::UnknownCategory {
                line,
                value: row.category.clone(),
            })?,
    };

    let points_adjusted = row
        .points_adjusted
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| ImportError::InvalidPoints {
                    line,
                    value: raw.to_string(),
                })
        })
        .transpose()?;

    Ok(CorrectiveActionRecord {
        id: CorrectiveActionId(format!("import-{line:05}")),
        employee_id: EmployeeId(employee_id.to_string()),
        category: category
            .map(|category| category.key.to_string())
            .unwrap_or_else(|| row.category.trim().to_string()),
        violation_date,
        status,
        points_assigned,
        points_adjusted,
        description: row.description,
        issued_by: None,
        adjustment_reason: points_adjusted.map(|_| "imported adjustment".to_string()),
        void_reason: None,
        acknowledged_on: None,
    })
}
