//! Whole-document file import.
//!
//! # Responsibility
//! - Parse a user-selected experiment file into the document model.
//! - Replace a document wholesale while keeping its original id.
//!
//! # Invariants
//! - Import never merges partially: it either yields a complete document or
//!   an error.
//! - The imported file's `id` never overrides the edited experiment's id.

use crate::model::experiment::{Experiment, ExperimentId, ValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Import failure surfaced to the user.
#[derive(Debug)]
pub enum ImportError {
    /// File could not be read.
    Io(std::io::Error),
    /// File content is not a well-formed experiment document.
    Json(serde_json::Error),
    /// Document parsed but reuses a task id.
    Invalid(ValidationError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read experiment file: {err}"),
            Self::Json(err) => write!(f, "malformed experiment document: {err}"),
            Self::Invalid(err) => write!(f, "invalid experiment document: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for ImportError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Parses one experiment document and checks task id uniqueness.
///
/// Dangling assignments are not rejected here; the form prunes them when the
/// imported task list is applied.
pub fn parse_experiment(bytes: &[u8]) -> Result<Experiment, ImportError> {
    let experiment: Experiment = serde_json::from_slice(bytes).map_err(|err| {
        warn!(
            "event=import_parse module=import status=error line={} column={}",
            err.line(),
            err.column()
        );
        err
    })?;
    experiment.validate_task_ids()?;
    Ok(experiment)
}

/// Parses `bytes` as a replacement for the document identified by `keep_id`.
///
/// The returned document carries `keep_id` regardless of the file's `id`.
pub fn import_preserving_id(
    bytes: &[u8],
    keep_id: ExperimentId,
) -> Result<Experiment, ImportError> {
    let mut experiment = parse_experiment(bytes)?;
    experiment.id = keep_id;
    info!(
        "event=import module=import status=ok tasks={} ratings={} participants={}",
        experiment.tasks.len(),
        experiment.ratings.len(),
        experiment.assignments.len()
    );
    Ok(experiment)
}

/// Reads a local file and imports it as a replacement for `keep_id`.
pub fn import_file_preserving_id(
    path: &Path,
    keep_id: ExperimentId,
) -> Result<Experiment, ImportError> {
    let bytes = std::fs::read(path)?;
    import_preserving_id(&bytes, keep_id)
}
