//! Assignment reconciliation for one participant.
//!
//! # Responsibility
//! - Keep a participant's assignment list consistent with the live task list.
//! - Apply selector edits and first-fit additions.
//!
//! # Invariants
//! - No assignment ever references a task id outside the current task set.
//! - One list never holds the same task id twice.
//! - Started assignments cannot be re-pointed or deleted from the editor.
//! - Pruning after a task-set change is a filter pass, so runs of consecutive
//!   stale entries are all removed.
//! - Pruning also folds repeats of one task id into its first entry, so lists
//!   arriving from an import are healed rather than rejected.

use crate::model::assignment::Assignment;
use crate::model::task::TaskId;
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Selector value meaning "remove this assignment".
pub const DELETE_SENTINEL: &str = "DELETED";

const DELETE_SENTINEL_ALIAS: &str = "DELETE";

/// Errors from assignment edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// Selector index is past the end of the list.
    IndexOutOfRange { index: usize, len: usize },
    /// Target assignment is already started.
    Locked { index: usize, task_id: TaskId },
    /// Selected task id is not in the current task list.
    UnknownTask(TaskId),
    /// Selected task id is already held by another entry.
    AlreadyAssigned(TaskId),
    /// Every task is already assigned to this participant.
    NoTaskAvailable,
    /// Selector value is neither the delete sentinel nor a task id.
    InvalidSelection(String),
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "assignment index {index} out of range for length {len}")
            }
            Self::Locked { index, task_id } => {
                write!(f, "assignment {index} (task {task_id}) is already started")
            }
            Self::UnknownTask(id) => write!(f, "task not found: {id}"),
            Self::AlreadyAssigned(id) => write!(f, "task already assigned: {id}"),
            Self::NoTaskAvailable => write!(f, "every task is already assigned"),
            Self::InvalidSelection(value) => write!(f, "invalid assignment selection: `{value}`"),
        }
    }
}

impl Error for AssignmentError {}

/// Value chosen in one assignment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSelection {
    Delete,
    Task(TaskId),
}

impl FromStr for AssignmentSelection {
    type Err = AssignmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed == DELETE_SENTINEL || trimmed == DELETE_SENTINEL_ALIAS {
            return Ok(Self::Delete);
        }
        Uuid::parse_str(trimmed)
            .map(Self::Task)
            .map_err(|_| AssignmentError::InvalidSelection(value.to_string()))
    }
}

/// First-fit scan: the first id of `task_ids` not present in `assignments`.
pub fn first_free_task(assignments: &[Assignment], task_ids: &[TaskId]) -> Option<TaskId> {
    task_ids
        .iter()
        .copied()
        .find(|task_id| !assignments.iter().any(|assignment| assignment.id == *task_id))
}

/// Reconciler bound to one participant's assignment list.
pub struct AssignmentReconciler<'a> {
    participant: &'a str,
    assignments: &'a mut Vec<Assignment>,
}

impl<'a> AssignmentReconciler<'a> {
    pub fn new(participant: &'a str, assignments: &'a mut Vec<Assignment>) -> Self {
        Self {
            participant,
            assignments,
        }
    }

    /// Drops every assignment whose task is not in `task_ids` and every later
    /// repeat of a task id already kept.
    ///
    /// A folded repeat that was started marks the kept entry as started.
    /// Returns the number of dropped entries.
    pub fn retain_known(&mut self, task_ids: &[TaskId]) -> usize {
        let live: HashSet<&TaskId> = task_ids.iter().collect();
        let before = self.assignments.len();
        let mut kept: Vec<Assignment> = Vec::with_capacity(before);
        for assignment in self.assignments.drain(..) {
            if !live.contains(&assignment.id) {
                continue;
            }
            match kept.iter_mut().find(|existing| existing.id == assignment.id) {
                Some(existing) => existing.started |= assignment.started,
                None => kept.push(assignment),
            }
        }
        *self.assignments = kept;

        let dropped = before - self.assignments.len();
        if dropped > 0 {
            debug!(
                "event=assignments_pruned module=reconcile status=ok participant={} dropped={}",
                self.participant, dropped
            );
        }
        dropped
    }

    /// Applies one selector edit.
    ///
    /// # Contract
    /// - `Delete` removes the entry at `index`.
    /// - `Task(id)` replaces the entry with `{ id, started: false }`.
    ///
    /// # Errors
    /// - `IndexOutOfRange`, `Locked`, `UnknownTask` or `AlreadyAssigned`; the
    ///   list is unchanged on error.
    pub fn select(
        &mut self,
        index: usize,
        selection: AssignmentSelection,
        task_ids: &[TaskId],
    ) -> Result<(), AssignmentError> {
        let current = *self
            .assignments
            .get(index)
            .ok_or(AssignmentError::IndexOutOfRange {
                index,
                len: self.assignments.len(),
            })?;
        if current.started {
            return Err(AssignmentError::Locked {
                index,
                task_id: current.id,
            });
        }

        match selection {
            AssignmentSelection::Delete => {
                self.assignments.remove(index);
            }
            AssignmentSelection::Task(task_id) => {
                if !task_ids.contains(&task_id) {
                    return Err(AssignmentError::UnknownTask(task_id));
                }
                let taken_elsewhere = self
                    .assignments
                    .iter()
                    .enumerate()
                    .any(|(position, assignment)| position != index && assignment.id == task_id);
                if taken_elsewhere {
                    return Err(AssignmentError::AlreadyAssigned(task_id));
                }
                self.assignments[index] = Assignment::pending(task_id);
            }
        }
        Ok(())
    }

    /// First task in list order not yet assigned to this participant.
    pub fn available_task(&self, task_ids: &[TaskId]) -> Option<TaskId> {
        first_free_task(self.assignments.as_slice(), task_ids)
    }

    /// Whether the add control is enabled.
    pub fn can_add(&self, task_ids: &[TaskId]) -> bool {
        self.available_task(task_ids).is_some()
    }

    /// Appends the first free task as a pending assignment.
    ///
    /// # Errors
    /// - Returns `NoTaskAvailable` when every task is already assigned.
    pub fn add(&mut self, task_ids: &[TaskId]) -> Result<Assignment, AssignmentError> {
        let task_id = self
            .available_task(task_ids)
            .ok_or(AssignmentError::NoTaskAvailable)?;
        let assignment = Assignment::pending(task_id);
        self.assignments.push(assignment);
        Ok(assignment)
    }
}
