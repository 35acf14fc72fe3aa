use serde::{Deserialize, Serialize};

/// Named discipline tier derived from an employee's rolling point total.
///
/// Variants are declared in escalation order so `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisciplineLevel {
    GoodStanding,
    Coaching,
    VerbalWarning,
    WrittenWarning,
    FinalWarning,
    TerminationReview,
}

/// Inclusive lower bounds, highest first.
const LEVEL_THRESHOLDS: [(i32, DisciplineLevel); 5] = [
    (18, DisciplineLevel::TerminationReview),
    (14, DisciplineLevel::FinalWarning),
    (10, DisciplineLevel::WrittenWarning),
    (6, DisciplineLevel::VerbalWarning),
    (1, DisciplineLevel::Coaching),
];

impl DisciplineLevel {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::GoodStanding,
            Self::Coaching,
            Self::VerbalWarning,
            Self::WrittenWarning,
            Self::FinalWarning,
            Self::TerminationReview,
        ]
    }

    /// Totals at or below zero, including negative credit, map to good standing.
    pub fn from_points(points: i32) -> Self {
        LEVEL_THRESHOLDS
            .iter()
            .find(|(threshold, _)| points >= *threshold)
            .map(|(_, level)| *level)
            .unwrap_or(Self::GoodStanding)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GoodStanding => "Good Standing",
            Self::Coaching => "Coaching",
            Self::VerbalWarning => "Verbal Warning",
            Self::WrittenWarning => "Written Warning",
            Self::FinalWarning => "Final Warning",
            Self::TerminationReview => "Termination Review",
        }
    }

    /// Lowest point total that lands in this tier.
    pub const fn threshold(self) -> i32 {
        match self {
            Self::GoodStanding => 0,
            Self::Coaching => 1,
            Self::VerbalWarning => 6,
            Self::WrittenWarning => 10,
            Self::FinalWarning => 14,
            Self::TerminationReview => 18,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::GoodStanding => Some(Self::Coaching),
            Self::Coaching => Some(Self::VerbalWarning),
            Self::VerbalWarning => Some(Self::WrittenWarning),
            Self::WrittenWarning => Some(Self::FinalWarning),
            Self::FinalWarning => Some(Self::TerminationReview),
            Self::TerminationReview => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_threshold_table() {
        let cases = [
            (-4, DisciplineLevel::GoodStanding),
            (0, DisciplineLevel::GoodStanding),
            (1, DisciplineLevel::Coaching),
            (5, DisciplineLevel::Coaching),
            (6, DisciplineLevel::VerbalWarning),
            (9, DisciplineLevel::VerbalWarning),
            (10, DisciplineLevel::WrittenWarning),
            (13, DisciplineLevel::WrittenWarning),
            (14, DisciplineLevel::FinalWarning),
            (17, DisciplineLevel::FinalWarning),
            (18, DisciplineLevel::TerminationReview),
            (240, DisciplineLevel::TerminationReview),
        ];

        for (points, expected) in cases {
            assert_eq!(
                DisciplineLevel::from_points(points),
                expected,
                "{points} points"
            );
        }
    }

    #[test]
    fn level_is_monotonic_in_points() {
        let mut previous = DisciplineLevel::from_points(-10);
        for points in -9..=40 {
            let level = DisciplineLevel::from_points(points);
            assert!(level >= previous, "level dropped at {points} points");
            previous = level;
        }
    }

    #[test]
    fn thresholds_agree_with_classification() {
        for level in DisciplineLevel::ordered() {
            assert_eq!(DisciplineLevel::from_points(level.threshold()), level);
            if let Some(next) = level.next() {
                assert_eq!(DisciplineLevel::from_points(next.threshold() - 1), level);
                assert!(next > level);
            }
        }
    }

    #[test]
    fn labels_match_policy_names() {
        let labels: Vec<_> = DisciplineLevel::ordered()
            .into_iter()
            .map(DisciplineLevel::label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Good Standing",
                "Coaching",
                "Verbal Warning",
                "Written Warning",
                "Final Warning",
                "Termination Review",
            ]
        );
    }
}
