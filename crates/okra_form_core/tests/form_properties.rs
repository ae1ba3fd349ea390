use okra_form_core::{
    AssignmentSelection, Experiment, ExperimentForm, FormOptions, RecordingSink, Task,
};
use proptest::prelude::*;
use std::collections::HashSet;

const PARTICIPANTS: [&str; 2] = ["p-1", "p-2"];

#[derive(Debug, Clone)]
enum Op {
    AddTask,
    RemoveTask(usize),
    AddAssignment(usize),
    Select {
        participant: usize,
        index: usize,
        task: Option<usize>,
    },
    TogglePractice(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddTask),
        2 => (0usize..8).prop_map(Op::RemoveTask),
        3 => (0usize..2).prop_map(Op::AddAssignment),
        2 => (0usize..2, 0usize..8, proptest::option::of(0usize..8)).prop_map(
            |(participant, index, task)| Op::Select {
                participant,
                index,
                task,
            }
        ),
        1 => any::<bool>().prop_map(Op::TogglePractice),
    ]
}

fn open_form(initial_tasks: usize) -> ExperimentForm<RecordingSink> {
    let mut experiment = Experiment::new("n-back", "props");
    for n in 0..initial_tasks {
        experiment.tasks.push(Task::new(format!("task-{n}")));
    }
    let options = PARTICIPANTS
        .iter()
        .fold(FormOptions::with_builtin_choices(), |options, id| {
            options.with_participant(*id, *id)
        });
    ExperimentForm::new(experiment, options, RecordingSink::new())
}

fn apply(form: &mut ExperimentForm<RecordingSink>, op: &Op) {
    match op {
        Op::AddTask => {
            form.add_task();
        }
        Op::RemoveTask(index) => {
            let _ = form.remove_task(*index);
        }
        Op::AddAssignment(participant) => {
            let _ = form.add_assignment(PARTICIPANTS[*participant]);
        }
        Op::Select {
            participant,
            index,
            task,
        } => {
            let selection = match task {
                Some(position) => match form.document().tasks.get(*position) {
                    Some(task) => AssignmentSelection::Task(task.id),
                    None => AssignmentSelection::Delete,
                },
                None => AssignmentSelection::Delete,
            };
            let _ = form.select_assignment(PARTICIPANTS[*participant], *index, selection);
        }
        Op::TogglePractice(present) => form.toggle_practice_task(*present),
    }
}

proptest! {
    #[test]
    fn task_ids_stay_unique_and_are_never_reused(initial in 0usize..4, ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let mut form = open_form(initial);
        let mut ever_seen: HashSet<_> = form.document().task_ids().into_iter().collect();
        for op in &ops {
            let before: HashSet<_> = form.document().task_ids().into_iter().collect();
            apply(&mut form, op);
            let ids = form.document().task_ids();
            let unique: HashSet<_> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
            for id in unique.difference(&before) {
                prop_assert!(ever_seen.insert(*id), "task id {} reused", id);
            }
        }
        prop_assert!(form.document().validate_task_ids().is_ok());
    }

    #[test]
    fn assignments_never_dangle_or_repeat(initial in 0usize..4, ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let mut form = open_form(initial);
        for op in &ops {
            apply(&mut form, op);
            prop_assert!(form.document().validate().is_ok(), "after {:?}", op);
        }
    }

    #[test]
    fn every_successful_step_emits_the_current_document(ops in proptest::collection::vec(op_strategy(), 1..20)) {
        let mut form = open_form(2);
        for op in &ops {
            let before = form.sink().len();
            apply(&mut form, op);
            if form.sink().len() > before {
                prop_assert_eq!(form.sink().len(), before + 1);
                prop_assert_eq!(form.sink().last().unwrap(), form.document());
            }
        }
    }
}
