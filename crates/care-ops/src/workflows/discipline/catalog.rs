use super::domain::ViolationSeverity;
use serde::Serialize;

/// A violation category with the point value assigned at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub default_points: u32,
    pub severity: ViolationSeverity,
}

#[derive(Debug)]
pub struct ViolationCatalog {
    categories: Vec<ViolationCategory>,
}

impl ViolationCatalog {
    pub fn standard() -> Self {
        Self {
            categories: standard_categories(),
        }
    }

    pub fn categories(&self) -> &[ViolationCategory] {
        &self.categories
    }

    /// Matches either the category key or its label, ignoring case and punctuation.
    pub fn find(&self, raw: &str) -> Option<&ViolationCategory> {
        let wanted = normalize_key(raw);
        if wanted.is_empty() {
            return None;
        }

        self.categories
            .iter()
            .find(|category| category.key == wanted || normalize_key(category.label) == wanted)
    }

    pub fn label_for(&self, key: &str) -> Option<&'static str> {
        self.find(key).map(|category| category.label)
    }
}

fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn standard_categories() -> Vec<ViolationCategory> {
    vec![
        ViolationCategory {
            key: "tardiness",
            label: "Tardiness",
            default_points: 1,
            severity: ViolationSeverity::Minor,
        },
        ViolationCategory {
            key: "early_departure",
            label: "Early Departure",
            default_points: 1,
            severity: ViolationSeverity::Minor,
        },
        ViolationCategory {
            key: "dress_code",
            label: "Dress Code",
            default_points: 1,
            severity: ViolationSeverity::Minor,
        },
        ViolationCategory {
            key: "documentation_lapse",
            label: "Documentation Lapse",
            default_points: 2,
            severity: ViolationSeverity::Moderate,
        },
        ViolationCategory {
            key: "shift_chore_incomplete",
            label: "Shift Chore Incomplete",
            default_points: 2,
            severity: ViolationSeverity::Moderate,
        },
        ViolationCategory {
            key: "unexcused_absence",
            label: "Unexcused Absence",
            default_points: 3,
            severity: ViolationSeverity::Moderate,
        },
        ViolationCategory {
            key: "training_overdue",
            label: "Training Overdue",
            default_points: 3,
            severity: ViolationSeverity::Moderate,
        },
        ViolationCategory {
            key: "medication_error",
            label: "Medication Error",
            default_points: 4,
            severity: ViolationSeverity::Major,
        },
        ViolationCategory {
            key: "policy_violation",
            label: "Policy Violation",
            default_points: 4,
            severity: ViolationSeverity::Major,
        },
        ViolationCategory {
            key: "no_call_no_show",
            label: "No Call / No Show",
            default_points: 6,
            severity: ViolationSeverity::Major,
        },
        ViolationCategory {
            key: "resident_rights_violation",
            label: "Resident Rights Violation",
            default_points: 10,
            severity: ViolationSeverity::Critical,
        },
    ]
}
