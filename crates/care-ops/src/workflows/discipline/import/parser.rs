use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One spreadsheet row, still as text.
#[derive(Debug, Deserialize)]
pub(crate) struct CorrectiveActionRow {
    #[serde(rename = "Employee ID")]
    pub(crate) employee_id: String,
    #[serde(rename = "Violation Date")]
    pub(crate) violation_date: String,
    #[serde(rename = "Category")]
    pub(crate) category: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<String>,
    #[serde(
        rename = "Points Assigned",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) points_assigned: Option<String>,
    #[serde(
        rename = "Points Adjusted",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) points_adjusted: Option<String>,
    #[serde(rename = "Description", default)]
    pub(crate) description: String,
}

/// Rows paired with the 1-based file line each record starts on. Blank lines and quoted
/// multi-line cells are accounted for.
pub(crate) fn parse_rows<R: Read>(
    mut reader: R,
) -> Result<Vec<(usize, CorrectiveActionRow)>, csv::Error> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let source = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source.as_bytes());
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record
            .position()
            .map_or(0, |position| record_start_line(source, position));
        let row: CorrectiveActionRow = record.deserialize(Some(&headers))?;
        rows.push((line, row));
    }

    Ok(rows)
}

/// A record's position is where the previous record ended, so blank lines between the two
/// still have to be stepped over.
fn record_start_line(source: &str, position: &csv::Position) -> usize {
    let bytes = source.as_bytes();
    let start = usize::try_from(position.byte())
        .unwrap_or(bytes.len())
        .min(bytes.len());
    let skipped = bytes[start..]
        .iter()
        .take_while(|byte| matches!(byte, b'\r' | b'\n'))
        .filter(|byte| **byte == b'\n')
        .count();
    usize::try_from(position.line()).unwrap_or(usize::MAX) + skipped
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, or an RFC 3339 timestamp.
pub(crate) fn parse_violation_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    None
}
