//! Experiment document model.
//!
//! # Responsibility
//! - Define the top-level document edited by the experiment form.
//! - Keep the JSON shape field-for-field compatible with the backend.
//! - Check referential invariants after import.
//!
//! # Invariants
//! - `id` is immutable once set.
//! - Task ids are unique across `tasks` and `practice_task`.
//! - Every assignment id references a task in `tasks`.
//! - One participant's list never holds the same task id twice.

use crate::model::assignment::{Assignments, ParticipantId};
use crate::model::rating::Rating;
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an experiment.
pub type ExperimentId = Uuid;

/// Top-level document edited by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: ExperimentId,
    /// Key from the task type choice map.
    pub task_type: String,
    pub title: String,
    /// Shown before the first task.
    pub instructions: String,
    #[serde(default)]
    pub instructions_after_task: Option<String>,
    #[serde(default)]
    pub instructions_after_final_task: Option<String>,
    #[serde(default)]
    pub instructions_after_practice_task: Option<String>,
    #[serde(default)]
    pub practice_task: Option<Task>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    /// Experiments a participant must finish before this one.
    ///
    /// Outer `None` means the key is absent; `Some(None)` is an explicit
    /// `null`. Both survive a round trip unchanged.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub requirements: Option<Option<Vec<ExperimentId>>>,
    #[serde(default)]
    pub assignments: Assignments,
    /// Wire fields this model does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Distinguishes an explicit `null` from a missing key; `default` covers
/// the missing case.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Invariant violations detected by [`Experiment::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two tasks share one id.
    DuplicateTaskId(TaskId),
    /// An assignment references a task id that is not in `tasks`.
    DanglingAssignment {
        participant: ParticipantId,
        task_id: TaskId,
    },
    /// One participant has the same task assigned twice.
    DuplicateAssignment {
        participant: ParticipantId,
        task_id: TaskId,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id: {id}"),
            Self::DanglingAssignment {
                participant,
                task_id,
            } => write!(
                f,
                "assignment of participant `{participant}` references unknown task {task_id}"
            ),
            Self::DuplicateAssignment {
                participant,
                task_id,
            } => write!(
                f,
                "participant `{participant}` has task {task_id} assigned more than once"
            ),
        }
    }
}

impl Error for ValidationError {}

impl Experiment {
    /// Creates an empty experiment with a generated id.
    pub fn new(task_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_type: task_type.into(),
            title: title.into(),
            instructions: String::new(),
            instructions_after_task: None,
            instructions_after_final_task: None,
            instructions_after_practice_task: None,
            practice_task: None,
            tasks: Vec::new(),
            ratings: Vec::new(),
            requirements: None,
            assignments: Assignments::new(),
            extra: Map::new(),
        }
    }

    /// Returns the ids of the live task list in list order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|task| task.id).collect()
    }

    /// Returns the position of the task with `id` in `tasks`.
    pub fn task_index(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Checks that no two tasks, practice task included, share an id.
    pub fn validate_task_ids(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for task in self.practice_task.iter().chain(self.tasks.iter()) {
            if !seen.insert(task.id) {
                return Err(ValidationError::DuplicateTaskId(task.id));
            }
        }
        Ok(())
    }

    /// Checks referential invariants of the document.
    ///
    /// # Errors
    /// - Returns the first violation found, checking tasks before assignments.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_task_ids()?;

        let live: HashSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        for (participant, list) in &self.assignments {
            let mut assigned = HashSet::new();
            for assignment in list {
                if !live.contains(&assignment.id) {
                    return Err(ValidationError::DanglingAssignment {
                        participant: participant.clone(),
                        task_id: assignment.id,
                    });
                }
                if !assigned.insert(assignment.id) {
                    return Err(ValidationError::DuplicateAssignment {
                        participant: participant.clone(),
                        task_id: assignment.id,
                    });
                }
            }
        }
        Ok(())
    }
}
