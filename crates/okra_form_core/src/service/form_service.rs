//! Experiment form orchestrator.
//!
//! # Responsibility
//! - Own the edited experiment document for one editing session.
//! - Dispatch add/remove/replace operations and editor commits.
//! - Keep participant assignments consistent with the live task list.
//! - Emit the whole document to the sink after every successful mutation.
//!
//! # Invariants
//! - Experiment, task and rating ids are never rewritten by an edit.
//! - Failed operations leave the document untouched and emit nothing.
//! - Successful operations emit exactly once.
//! - Task labels come from a session counter seeded with the task count at
//!   load; it is never recomputed from the live list and import keeps it.

use crate::editor::rating_editor::RatingEditor;
use crate::editor::task_editor::TaskEditor;
use crate::editor::EditorError;
use crate::import::{import_file_preserving_id, import_preserving_id, ImportError};
use crate::model::assignment::Assignment;
use crate::model::experiment::{Experiment, ExperimentId};
use crate::model::rating::{Rating, RatingId};
use crate::model::task::{Task, TaskId};
use crate::options::FormOptions;
use crate::reconcile::{
    first_free_task, AssignmentError, AssignmentReconciler, AssignmentSelection,
};
use crate::service::document_sink::DocumentSink;
use log::{debug, info};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

/// Result alias for form operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors from form operations.
#[derive(Debug)]
pub enum FormError {
    /// Task index is past the end of the task list.
    TaskIndexOutOfRange { index: usize, len: usize },
    /// Rating index is past the end of the rating list.
    RatingIndexOutOfRange { index: usize, len: usize },
    /// Practice task edit requested while no practice task exists.
    NoPracticeTask,
    /// Committed object does not carry the id of the slot it replaces.
    IdMismatch { expected: Uuid, found: Uuid },
    /// Field has a dedicated operation and is not writable through
    /// `replace_field`.
    ReadOnlyField(String),
    /// Field path does not resolve inside the document.
    UnknownField(String),
    /// Replacement value does not fit the document shape.
    InvalidFieldValue {
        path: String,
        source: serde_json::Error,
    },
    /// Task type key is not offered by the task type choice map.
    UnknownTaskType(String),
    /// Required experiment is unknown or is this experiment itself.
    InvalidRequirement(ExperimentId),
    /// Participant is neither labelled nor present in the document.
    UnknownParticipant(String),
    /// Document could not be rendered as JSON.
    Serialize(serde_json::Error),
    Editor(EditorError),
    Assignment(AssignmentError),
    Import(ImportError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskIndexOutOfRange { index, len } => {
                write!(f, "task index {index} out of range for length {len}")
            }
            Self::RatingIndexOutOfRange { index, len } => {
                write!(f, "rating index {index} out of range for length {len}")
            }
            Self::NoPracticeTask => write!(f, "experiment has no practice task"),
            Self::IdMismatch { expected, found } => {
                write!(f, "id mismatch: expected {expected}, found {found}")
            }
            Self::ReadOnlyField(path) => write!(f, "field is read-only: `{path}`"),
            Self::UnknownField(path) => write!(f, "field not found: `{path}`"),
            Self::InvalidFieldValue { path, source } => {
                write!(f, "invalid value for `{path}`: {source}")
            }
            Self::UnknownTaskType(value) => write!(f, "unknown task type: `{value}`"),
            Self::InvalidRequirement(id) => write!(f, "invalid required experiment: {id}"),
            Self::UnknownParticipant(id) => write!(f, "participant not found: `{id}`"),
            Self::Serialize(err) => write!(f, "failed to render document: {err}"),
            Self::Editor(err) => write!(f, "{err}"),
            Self::Assignment(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFieldValue { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Editor(err) => Some(err),
            Self::Assignment(err) => Some(err),
            Self::Import(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EditorError> for FormError {
    fn from(value: EditorError) -> Self {
        Self::Editor(value)
    }
}

impl From<AssignmentError> for FormError {
    fn from(value: AssignmentError) -> Self {
        Self::Assignment(value)
    }
}

impl From<ImportError> for FormError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Form orchestrator over one experiment document.
pub struct ExperimentForm<S: DocumentSink> {
    experiment: Experiment,
    options: FormOptions,
    task_label_counter: u64,
    sink: S,
}

impl<S: DocumentSink> ExperimentForm<S> {
    /// Opens an editing session over `experiment`.
    ///
    /// Nothing is emitted until the first mutation.
    pub fn new(experiment: Experiment, options: FormOptions, sink: S) -> Self {
        let task_label_counter = experiment.tasks.len() as u64;
        debug!(
            "event=form_open module=form status=ok tasks={} ratings={} participants={}",
            experiment.tasks.len(),
            experiment.ratings.len(),
            options.participant_labels.len()
        );
        Self {
            experiment,
            options,
            task_label_counter,
            sink,
        }
    }

    pub fn document(&self) -> &Experiment {
        &self.experiment
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Next number used for a `task-{n}` label.
    pub fn task_label_counter(&self) -> u64 {
        self.task_label_counter
    }

    pub fn into_document(self) -> Experiment {
        self.experiment
    }

    /// Ends the session and hands back the document and the sink.
    pub fn into_parts(self) -> (Experiment, S) {
        (self.experiment, self.sink)
    }

    /// Appends a task labelled `task-{n}` and returns its id.
    pub fn add_task(&mut self) -> TaskId {
        let task = Task::new(Task::sequence_label(self.task_label_counter));
        self.task_label_counter += 1;
        let task_id = task.id;
        self.experiment.tasks.push(task);
        debug!(
            "event=task_added module=form status=ok task_id={} tasks={}",
            task_id,
            self.experiment.tasks.len()
        );
        self.emit();
        task_id
    }

    /// Removes the task at `index` and prunes assignments referencing it.
    ///
    /// Remaining tasks keep their labels.
    pub fn remove_task(&mut self, index: usize) -> FormResult<Task> {
        self.check_task_index(index)?;
        let removed = self.experiment.tasks.remove(index);
        debug!(
            "event=task_removed module=form status=ok task_id={} tasks={}",
            removed.id,
            self.experiment.tasks.len()
        );
        self.reconcile_assignments();
        self.emit();
        Ok(removed)
    }

    /// Appends an empty rating with the default response type.
    pub fn add_rating(&mut self) -> RatingId {
        let rating = Rating::new();
        let rating_id = rating.id;
        self.experiment.ratings.push(rating);
        debug!(
            "event=rating_added module=form status=ok rating_id={}",
            rating_id
        );
        self.emit();
        rating_id
    }

    pub fn remove_rating(&mut self, index: usize) -> FormResult<Rating> {
        self.check_rating_index(index)?;
        let removed = self.experiment.ratings.remove(index);
        debug!(
            "event=rating_removed module=form status=ok rating_id={}",
            removed.id
        );
        self.emit();
        Ok(removed)
    }

    /// Sets whether the experiment has a practice task.
    ///
    /// Turning it on when already present keeps the existing task. Turning
    /// it on after it was removed creates a new task with a fresh id.
    pub fn toggle_practice_task(&mut self, present: bool) {
        match (present, self.experiment.practice_task.is_some()) {
            (true, false) => {
                let task = Task::practice();
                debug!(
                    "event=practice_task_added module=form status=ok task_id={}",
                    task.id
                );
                self.experiment.practice_task = Some(task);
            }
            (false, true) => {
                self.experiment.practice_task = None;
                debug!("event=practice_task_removed module=form status=ok");
            }
            _ => {}
        }
        self.emit();
    }

    pub fn add_practice_task(&mut self) {
        self.toggle_practice_task(true);
    }

    pub fn remove_practice_task(&mut self) {
        self.toggle_practice_task(false);
    }

    /// Replaces one existing document field addressed by a JSON pointer.
    ///
    /// # Contract
    /// - `path` is an RFC 6901 pointer such as `/title` or `/tasks/0/label`.
    /// - The target must already exist in the rendered document.
    /// - Ids, whole tasks/ratings, the practice task slot, requirements and
    ///   assignments are read-only here; they have dedicated operations.
    /// - Task type and rating type values must be offered choices.
    /// - The whole document is re-typed after the write; on any failure the
    ///   current document is kept.
    pub fn replace_field(&mut self, path: &str, value: Value) -> FormResult<()> {
        ensure_writable(path)?;

        let mut rendered =
            serde_json::to_value(&self.experiment).map_err(FormError::Serialize)?;
        let slot = rendered
            .pointer_mut(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        *slot = value;

        let updated: Experiment =
            serde_json::from_value(rendered).map_err(|source| FormError::InvalidFieldValue {
                path: path.to_string(),
                source,
            })?;
        self.check_choices(&updated)?;

        self.experiment = updated;
        debug!("event=field_replaced module=form status=ok path={}", path);
        self.emit();
        Ok(())
    }

    /// Replaces the required-experiment list.
    ///
    /// Every id must be a known experiment other than this one.
    pub fn set_requirements(&mut self, requirements: Vec<ExperimentId>) -> FormResult<()> {
        for required in &requirements {
            let known = self
                .options
                .experiment_titles
                .contains_key(&required.to_string());
            if !known || *required == self.experiment.id {
                return Err(FormError::InvalidRequirement(*required));
            }
        }
        let mut deduped = Vec::with_capacity(requirements.len());
        for required in requirements {
            if !deduped.contains(&required) {
                deduped.push(required);
            }
        }
        self.experiment.requirements = Some(Some(deduped));
        self.emit();
        Ok(())
    }

    /// Opens an editor over the task at `index`.
    pub fn task_editor(&self, index: usize) -> FormResult<TaskEditor> {
        self.check_task_index(index)?;
        Ok(TaskEditor::new(&self.experiment.tasks[index]))
    }

    pub fn practice_task_editor(&self) -> FormResult<TaskEditor> {
        self.experiment
            .practice_task
            .as_ref()
            .map(TaskEditor::new)
            .ok_or(FormError::NoPracticeTask)
    }

    /// Opens an editor over the rating at `index`.
    pub fn rating_editor(&self, index: usize) -> FormResult<RatingEditor> {
        self.check_rating_index(index)?;
        Ok(RatingEditor::new(
            &self.experiment.ratings[index],
            &self.options.rating_type_choices,
        ))
    }

    /// Merges an edited task back by replacing the task at `index`.
    pub fn commit_task(&mut self, index: usize, task: Task) -> FormResult<()> {
        self.check_task_index(index)?;
        ensure_same_id(self.experiment.tasks[index].id, task.id)?;
        self.experiment.tasks[index] = task;
        self.emit();
        Ok(())
    }

    pub fn commit_practice_task(&mut self, task: Task) -> FormResult<()> {
        let current = self
            .experiment
            .practice_task
            .as_mut()
            .ok_or(FormError::NoPracticeTask)?;
        ensure_same_id(current.id, task.id)?;
        *current = task;
        self.emit();
        Ok(())
    }

    /// Merges an edited rating back by replacing the rating at `index`.
    pub fn commit_rating(&mut self, index: usize, rating: Rating) -> FormResult<()> {
        self.check_rating_index(index)?;
        ensure_same_id(self.experiment.ratings[index].id, rating.id)?;
        self.experiment.ratings[index] = rating;
        self.emit();
        Ok(())
    }

    /// Participants with an assignment editor, as `(id, label)`.
    pub fn participants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .participant_labels
            .iter()
            .map(|(id, label)| (id.as_str(), label.as_str()))
    }

    /// Current assignment list of `participant`; empty when none exists yet.
    pub fn assignments(&self, participant: &str) -> &[Assignment] {
        self.experiment
            .assignments
            .get(participant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the add control of `participant` is enabled.
    pub fn can_add_assignment(&self, participant: &str) -> bool {
        first_free_task(self.assignments(participant), &self.experiment.task_ids()).is_some()
    }

    /// Appends the first unassigned task to `participant`'s list.
    pub fn add_assignment(&mut self, participant: &str) -> FormResult<Assignment> {
        self.ensure_participant(participant)?;
        let task_ids = self.experiment.task_ids();
        if !self.can_add_assignment(participant) {
            return Err(AssignmentError::NoTaskAvailable.into());
        }
        let list = self
            .experiment
            .assignments
            .entry(participant.to_string())
            .or_default();
        let added = AssignmentReconciler::new(participant, list).add(&task_ids)?;
        debug!(
            "event=assignment_added module=form status=ok participant={} task_id={}",
            participant, added.id
        );
        self.emit();
        Ok(added)
    }

    /// Applies a selector edit to one of `participant`'s assignments.
    pub fn select_assignment(
        &mut self,
        participant: &str,
        index: usize,
        selection: AssignmentSelection,
    ) -> FormResult<()> {
        self.ensure_participant(participant)?;
        let task_ids = self.experiment.task_ids();
        let list = self
            .experiment
            .assignments
            .get_mut(participant)
            .ok_or(AssignmentError::IndexOutOfRange { index, len: 0 })?;
        AssignmentReconciler::new(participant, list).select(index, selection, &task_ids)?;
        debug!(
            "event=assignment_selected module=form status=ok participant={} index={}",
            participant, index
        );
        self.emit();
        Ok(())
    }

    /// Replaces the document with an imported one, keeping the current id.
    ///
    /// # Errors
    /// - Propagates `ImportError` for malformed content; the current
    ///   document is kept and nothing is emitted.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> FormResult<()> {
        let imported = import_preserving_id(bytes, self.experiment.id)?;
        self.replace_document(imported);
        Ok(())
    }

    /// Reads a local file and imports it like [`Self::import_bytes`].
    pub fn import_file(&mut self, path: &Path) -> FormResult<()> {
        let imported = import_file_preserving_id(path, self.experiment.id)?;
        self.replace_document(imported);
        Ok(())
    }

    fn replace_document(&mut self, imported: Experiment) {
        self.experiment = imported;
        self.reconcile_assignments();
        info!(
            "event=document_imported module=form status=ok tasks={}",
            self.experiment.tasks.len()
        );
        self.emit();
    }

    fn reconcile_assignments(&mut self) {
        let task_ids = self.experiment.task_ids();
        for (participant, list) in self.experiment.assignments.iter_mut() {
            AssignmentReconciler::new(participant, list).retain_known(&task_ids);
        }
    }

    fn emit(&mut self) {
        self.sink.emit(&self.experiment);
    }

    fn check_task_index(&self, index: usize) -> FormResult<()> {
        let len = self.experiment.tasks.len();
        if index >= len {
            return Err(FormError::TaskIndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn check_rating_index(&self, index: usize) -> FormResult<()> {
        let len = self.experiment.ratings.len();
        if index >= len {
            return Err(FormError::RatingIndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn ensure_participant(&self, participant: &str) -> FormResult<()> {
        if self.options.is_participant(participant)
            || self.experiment.assignments.contains_key(participant)
        {
            return Ok(());
        }
        Err(FormError::UnknownParticipant(participant.to_string()))
    }

    fn check_choices(&self, updated: &Experiment) -> FormResult<()> {
        if updated.task_type != self.experiment.task_type
            && !self.options.is_task_type(&updated.task_type)
        {
            return Err(FormError::UnknownTaskType(updated.task_type.clone()));
        }
        for rating in &updated.ratings {
            let unchanged = self
                .experiment
                .ratings
                .iter()
                .any(|old| old.id == rating.id && old.rating_type == rating.rating_type);
            if !unchanged && !self.options.is_rating_type(&rating.rating_type) {
                return Err(EditorError::UnknownRatingType(rating.rating_type.clone()).into());
            }
        }
        Ok(())
    }
}

fn ensure_same_id(expected: Uuid, found: Uuid) -> FormResult<()> {
    if expected != found {
        return Err(FormError::IdMismatch { expected, found });
    }
    Ok(())
}

fn ensure_writable(path: &str) -> FormResult<()> {
    if !path.starts_with('/') {
        return Err(FormError::ReadOnlyField(path.to_string()));
    }
    let tokens: Vec<&str> = path.split('/').skip(1).collect();
    let read_only = matches!(
        tokens.as_slice(),
        ["id"]
            | ["tasks"]
            | ["tasks", _]
            | ["tasks", _, "id"]
            | ["ratings"]
            | ["ratings", _]
            | ["ratings", _, "id"]
            | ["practiceTask"]
            | ["practiceTask", "id"]
            | ["requirements", ..]
            | ["assignments", ..]
    );
    if read_only {
        return Err(FormError::ReadOnlyField(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_writable;

    #[test]
    fn ids_and_assignments_are_read_only() {
        for path in [
            "",
            "/id",
            "/tasks/0/id",
            "/ratings/3/id",
            "/practiceTask/id",
            "/practiceTask",
            "/tasks",
            "/tasks/1",
            "/requirements/0",
            "/assignments/p-1",
            "title",
        ] {
            assert!(ensure_writable(path).is_err(), "{path} should be read-only");
        }
        for path in [
            "/title",
            "/tasks/0/label",
            "/tasks/0/data/id",
            "/practiceTask/data",
            "/ratings/0/type",
        ] {
            assert!(ensure_writable(path).is_ok(), "{path} should be writable");
        }
    }
}
