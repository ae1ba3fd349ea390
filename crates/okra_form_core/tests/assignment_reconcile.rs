use okra_form_core::{
    Assignment, AssignmentError, AssignmentSelection, Experiment, ExperimentForm, FormError,
    FormOptions, RecordingSink, Task,
};
use uuid::Uuid;

const PARTICIPANT: &str = "p-1";

/// Builds a form with `tasks` tasks; `assigned` holds `(task index, started)`.
fn form_with(tasks: usize, assigned: &[(usize, bool)]) -> ExperimentForm<RecordingSink> {
    let mut experiment = Experiment::new("digit-span", "Span");
    for n in 0..tasks {
        experiment.tasks.push(Task::new(format!("task-{n}")));
    }
    let list = assigned
        .iter()
        .map(|&(index, started)| Assignment {
            id: experiment.tasks[index].id,
            started,
        })
        .collect();
    experiment.assignments.insert(PARTICIPANT.to_string(), list);
    let options = FormOptions::with_builtin_choices()
        .with_participant(PARTICIPANT, "first")
        .with_participant("p-2", "second");
    ExperimentForm::new(experiment, options, RecordingSink::new())
}

#[test]
fn add_then_remove_task_prunes_assignment() {
    let mut form = form_with(2, &[(0, false)]);
    let task_a = form.document().tasks[0].id;
    let task_b = form.document().tasks[1].id;

    let added = form.add_assignment(PARTICIPANT).unwrap();
    assert_eq!(added, Assignment::pending(task_b));
    assert_eq!(
        form.assignments(PARTICIPANT),
        &[Assignment::pending(task_a), Assignment::pending(task_b)]
    );

    form.remove_task(1).unwrap();
    assert_eq!(form.assignments(PARTICIPANT), &[Assignment::pending(task_a)]);
    assert_eq!(form.sink().len(), 2);
}

#[test]
fn removing_task_prunes_every_participant_including_started_entries() {
    let mut form = form_with(3, &[(1, true), (1, false), (2, false)]);
    let task_c = form.document().tasks[2].id;

    form.remove_task(1).unwrap();
    assert_eq!(form.assignments(PARTICIPANT), &[Assignment::pending(task_c)]);
}

#[test]
fn add_is_first_fit_and_disabled_when_all_tasks_assigned() {
    let mut form = form_with(3, &[(1, false)]);
    let ids = form.document().task_ids();

    assert_eq!(form.add_assignment(PARTICIPANT).unwrap().id, ids[0]);
    assert_eq!(form.add_assignment(PARTICIPANT).unwrap().id, ids[2]);
    assert!(!form.can_add_assignment(PARTICIPANT));

    let err = form.add_assignment(PARTICIPANT).unwrap_err();
    assert!(matches!(
        err,
        FormError::Assignment(AssignmentError::NoTaskAvailable)
    ));
    assert_eq!(form.sink().len(), 2);
}

#[test]
fn add_creates_list_for_labelled_participant_without_one() {
    let mut form = form_with(1, &[]);
    assert!(form.assignments("p-2").is_empty());
    assert!(form.can_add_assignment("p-2"));

    form.add_assignment("p-2").unwrap();
    assert_eq!(form.assignments("p-2").len(), 1);

    assert!(matches!(
        form.add_assignment("stranger"),
        Err(FormError::UnknownParticipant(_))
    ));
}

#[test]
fn add_without_tasks_leaves_document_untouched() {
    let mut form = form_with(0, &[]);
    assert!(form.add_assignment("p-2").is_err());
    assert!(!form.document().assignments.contains_key("p-2"));
    assert!(form.sink().is_empty());
}

#[test]
fn selecting_delete_sentinel_removes_entry() {
    let mut form = form_with(2, &[(0, false), (1, false)]);
    let task_b = form.document().tasks[1].id;

    let selection: AssignmentSelection = "DELETED".parse().unwrap();
    form.select_assignment(PARTICIPANT, 0, selection).unwrap();
    assert_eq!(form.assignments(PARTICIPANT), &[Assignment::pending(task_b)]);

    let alias: AssignmentSelection = "DELETE".parse().unwrap();
    form.select_assignment(PARTICIPANT, 0, alias).unwrap();
    assert!(form.assignments(PARTICIPANT).is_empty());
}

#[test]
fn selecting_task_replaces_entry_with_pending_assignment() {
    let mut form = form_with(3, &[(0, false)]);
    let task_c = form.document().tasks[2].id;

    let selection: AssignmentSelection = task_c.to_string().parse().unwrap();
    form.select_assignment(PARTICIPANT, 0, selection).unwrap();
    assert_eq!(form.assignments(PARTICIPANT), &[Assignment::pending(task_c)]);
}

#[test]
fn started_assignments_are_locked() {
    let mut form = form_with(2, &[(0, true)]);
    let task_b = form.document().tasks[1].id;

    let err = form
        .select_assignment(PARTICIPANT, 0, AssignmentSelection::Task(task_b))
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Assignment(AssignmentError::Locked { index: 0, .. })
    ));
    assert!(form
        .select_assignment(PARTICIPANT, 0, AssignmentSelection::Delete)
        .is_err());
    assert!(form.assignments(PARTICIPANT)[0].started);
}

#[test]
fn selection_rejects_unknown_and_duplicate_tasks() {
    let mut form = form_with(2, &[(0, false), (1, false)]);
    let task_b = form.document().tasks[1].id;

    let unknown = Uuid::new_v4();
    assert!(matches!(
        form.select_assignment(PARTICIPANT, 0, AssignmentSelection::Task(unknown)),
        Err(FormError::Assignment(AssignmentError::UnknownTask(id))) if id == unknown
    ));
    assert!(matches!(
        form.select_assignment(PARTICIPANT, 0, AssignmentSelection::Task(task_b)),
        Err(FormError::Assignment(AssignmentError::AlreadyAssigned(_)))
    ));
    assert!(matches!(
        form.select_assignment(PARTICIPANT, 4, AssignmentSelection::Delete),
        Err(FormError::Assignment(AssignmentError::IndexOutOfRange { index: 4, len: 2 }))
    ));
    assert!(form.sink().is_empty());
}
