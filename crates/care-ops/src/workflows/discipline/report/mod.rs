mod document;
mod summary;
pub mod views;

pub use document::{build_document, build_documents};
pub use views::{
    progress_band, progress_percent, CorrectiveActionDocument, CorrectiveActionView,
    DisciplineProgressView, DisciplineStatsView, ProgressBand,
};
