//! Corrective actions and the rolling-window discipline standing derived from them.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use catalog::{ViolationCatalog, ViolationCategory};
pub use domain::{
    CorrectiveActionId, CorrectiveActionRecord, CorrectiveActionStatus,
    CorrectiveActionSubmission, EmployeeId, ViolationSeverity,
};
pub use import::{CorrectiveActionImporter, ImportError};
pub use report::{
    build_document, build_documents, progress_band, progress_percent, CorrectiveActionDocument,
    CorrectiveActionView, DisciplineProgressView, DisciplineStatsView, ProgressBand,
};
pub use repository::{
    AlertError, CorrectiveActionRepository, RepositoryError, TierAlert, TierAlertPublisher,
};
pub use router::discipline_router;
pub use service::{DisciplineService, DisciplineServiceError};
pub use stats::{
    compute_stats, partition, rolling_cutoff, Clock, DisciplineLevel, DisciplineStats,
    DisciplineStatsCalculator, FixedClock, NegativePointsPolicy, RecordPartition, SystemClock,
    ROLLING_WINDOW_DAYS,
};
