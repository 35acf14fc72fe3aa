use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for staff members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for corrective actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrectiveActionId(pub String);

impl fmt::Display for CorrectiveActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signature lifecycle of a corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectiveActionStatus {
    PendingSignature,
    Acknowledged,
    Disputed,
    Voided,
}

impl CorrectiveActionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingSignature => "Pending Signature",
            Self::Acknowledged => "Acknowledged",
            Self::Disputed => "Disputed",
            Self::Voided => "Voided",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingSignature, Self::Acknowledged)
                | (Self::PendingSignature, Self::Disputed)
                | (Self::Acknowledged, Self::Disputed)
                | (Self::Disputed, Self::Acknowledged)
                | (Self::PendingSignature, Self::Voided)
                | (Self::Acknowledged, Self::Voided)
                | (Self::Disputed, Self::Voided)
        )
    }

    /// Lenient parser for spreadsheet exports and query strings.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "pending_signature" | "pending" => Some(Self::PendingSignature),
            "acknowledged" | "signed" => Some(Self::Acknowledged),
            "disputed" => Some(Self::Disputed),
            "voided" | "void" => Some(Self::Voided),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}

impl ViolationSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

/// A recorded disciplinary incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveActionRecord {
    pub id: CorrectiveActionId,
    pub employee_id: EmployeeId,
    pub category: String,
    pub violation_date: NaiveDate,
    pub status: CorrectiveActionStatus,
    pub points_assigned: u32,
    #[serde(default)]
    pub points_adjusted: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issued_by: Option<String>,
    #[serde(default)]
    pub adjustment_reason: Option<String>,
    #[serde(default)]
    pub void_reason: Option<String>,
    #[serde(default)]
    pub acknowledged_on: Option<NaiveDate>,
}

impl CorrectiveActionRecord {
    /// Adjusted points when present, otherwise the assigned points.
    pub fn effective_points(&self) -> i32 {
        self.points_adjusted
            .unwrap_or_else(|| i32::try_from(self.points_assigned).unwrap_or(i32::MAX))
    }

    pub fn is_voided(&self) -> bool {
        self.status == CorrectiveActionStatus::Voided
    }
}

/// Intake payload for a new corrective action. Points default from the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveActionSubmission {
    pub category: String,
    pub violation_date: NaiveDate,
    #[serde(default)]
    pub points_assigned: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issued_by: Option<String>,
}
