//! Participant-to-task assignment model.
//!
//! # Invariants
//! - `id` references a task of the owning experiment.
//! - A `started` assignment is locked: its task id cannot be changed from the
//!   editor.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Participant key as used by the backend's participant label map.
pub type ParticipantId = String;

/// Per-participant ordered assignment lists.
pub type Assignments = BTreeMap<ParticipantId, Vec<Assignment>>;

/// One task scheduled for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Id of the assigned task.
    pub id: TaskId,
    /// Whether the participant has already started this task.
    #[serde(default)]
    pub started: bool,
}

impl Assignment {
    /// Creates a not-yet-started assignment for `id`.
    pub fn pending(id: TaskId) -> Self {
        Self { id, started: false }
    }
}
