//! Core document model for the experiment form.
//! This crate owns the consistency rules of the edited experiment document;
//! transport and storage stay with the host.

pub mod editor;
pub mod import;
pub mod logging;
pub mod model;
pub mod options;
pub mod reconcile;
pub mod service;

pub use editor::json_editor::{JsonBlob, JsonEditor, JsonParseError};
pub use editor::rating_editor::RatingEditor;
pub use editor::task_editor::TaskEditor;
pub use editor::EditorError;
pub use import::{import_preserving_id, parse_experiment, ImportError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::assignment::{Assignment, Assignments, ParticipantId};
pub use model::experiment::{Experiment, ExperimentId, ValidationError};
pub use model::rating::{Rating, RatingId, DEFAULT_RATING_TYPE};
pub use model::task::{Task, TaskId, PRACTICE_TASK_LABEL};
pub use options::{ChoiceMap, FormOptions};
pub use reconcile::{AssignmentError, AssignmentReconciler, AssignmentSelection, DELETE_SENTINEL};
pub use service::document_sink::{DocumentSink, RecordingSink};
pub use service::form_service::{ExperimentForm, FormError, FormResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
