//! Task editor.

use crate::editor::json_editor::JsonEditor;
use crate::model::task::Task;

/// Edit session over a local copy of one task.
///
/// The id is read-only; label and payload are edited in place and every
/// input returns the full updated task for the owner to merge back.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEditor {
    task: Task,
    data: JsonEditor,
}

impl TaskEditor {
    /// Starts an edit session from a task snapshot.
    pub fn new(snapshot: &Task) -> Self {
        Self {
            data: JsonEditor::new(&snapshot.data),
            task: snapshot.clone(),
        }
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &Task {
        self.task.label = label.into();
        &self.task
    }

    /// Feeds raw payload text through the JSON editor.
    ///
    /// While the text does not parse, `data` becomes `null`.
    pub fn input_data(&mut self, text: impl Into<String>) -> &Task {
        self.task.data = self.data.input(text);
        &self.task
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn data_editor(&self) -> &JsonEditor {
        &self.data
    }

    pub fn into_task(self) -> Task {
        self.task
    }
}
