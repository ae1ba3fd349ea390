//! Snapshot-in / full-value-out field editors.
//!
//! # Responsibility
//! - Hold a transient local copy of one sub-object during an edit session.
//! - Apply discrete input events and hand back the complete updated copy.
//!
//! # Invariants
//! - Editors never drop fields they were not asked to change.
//! - Editors never persist anything; the owner merges by replacement.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_editor;
pub mod rating_editor;
pub mod task_editor;

/// Rejected editor input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Selected rating type is not offered by the rating choice map.
    UnknownRatingType(String),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRatingType(value) => write!(f, "unknown rating type: `{value}`"),
        }
    }
}

impl Error for EditorError {}
