use okra_form_core::{JsonBlob, JsonEditor, Task, TaskEditor};
use serde_json::{json, Value};

#[test]
fn truncated_input_sets_error_and_emits_null() {
    let mut editor = JsonEditor::new(&json!({}));

    let emitted = editor.input(r#"{"a":1"#);
    assert_eq!(emitted, Value::Null);
    assert_eq!(editor.text(), r#"{"a":1"#);
    assert!(!editor.is_valid());

    let error = editor.error().unwrap();
    assert_eq!(error.line, 1);
    assert!(!error.message.is_empty());
    assert_eq!(editor.last_valid(), &json!({}));
}

#[test]
fn corrected_input_clears_error_and_emits_value() {
    let mut editor = JsonEditor::new(&json!({}));
    editor.input(r#"{"a":1"#);

    let emitted = editor.input(r#"{"a":1}"#);
    assert_eq!(emitted, json!({"a": 1}));
    assert!(editor.error().is_none());
    assert_eq!(editor.state(), &JsonBlob::Parsed(json!({"a": 1})));
    assert_eq!(editor.value(), json!({"a": 1}));
}

#[test]
fn scalar_and_null_payloads_are_valid_json() {
    let mut editor = JsonEditor::new(&Value::Null);
    assert_eq!(editor.text(), "null");
    assert_eq!(editor.input("42"), json!(42));
    assert_eq!(editor.input("null"), Value::Null);
    assert!(editor.is_valid());
}

#[test]
fn task_editor_nulls_data_while_payload_is_invalid() {
    let mut task = Task::new("task-0");
    task.data = json!({"trials": 3});
    task.extra.insert("difficulty".to_string(), json!("hard"));
    let mut editor = TaskEditor::new(&task);
    assert_eq!(editor.data_editor().text(), r#"{"trials":3}"#);

    let edited = editor.input_data("{\"trials\": ").clone();
    assert_eq!(edited.data, Value::Null);
    assert_eq!(edited.id, task.id);
    assert_eq!(edited.label, "task-0");
    assert_eq!(edited.extra.get("difficulty"), Some(&json!("hard")));
    assert_eq!(
        editor.data_editor().last_valid(),
        &json!({"trials": 3})
    );

    let edited = editor.input_data("{\"trials\": 5}");
    assert_eq!(edited.data, json!({"trials": 5}));
}
