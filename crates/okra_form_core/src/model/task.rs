//! Task domain model.
//!
//! # Responsibility
//! - Define one unit of work performed by a participant.
//! - Provide constructors for list tasks and the practice task.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - `data` is an opaque JSON payload; its shape is owned by the task type.
//! - Unknown wire fields survive a deserialize/serialize cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Fixed label carried by a freshly created practice task.
pub const PRACTICE_TASK_LABEL: &str = "practice-task";

/// One task of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task id referenced by assignments.
    pub id: TaskId,
    /// Human-facing label. Not required to be unique.
    pub label: String,
    /// Opaque payload interpreted by the task runtime.
    #[serde(default)]
    pub data: Value,
    /// Wire fields this model does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task with a generated id and an empty object payload.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), label)
    }

    /// Creates a task with a caller-provided id.
    pub fn with_id(id: TaskId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            data: Value::Object(Map::new()),
            extra: Map::new(),
        }
    }

    /// Creates a practice task with a fresh id and the fixed practice label.
    pub fn practice() -> Self {
        Self::new(PRACTICE_TASK_LABEL)
    }

    /// Label given to the `n`-th task added during one editing session.
    pub fn sequence_label(n: u64) -> String {
        format!("task-{n}")
    }
}
