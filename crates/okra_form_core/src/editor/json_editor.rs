//! Free-form JSON blob editor.
//!
//! # Responsibility
//! - Keep the raw text exactly as typed so invalid input can be corrected.
//! - Parse on every edit and expose both the error and the last valid value.
//!
//! # Invariants
//! - A failed parse emits `null` upward; the previous value is never kept
//!   silently as if it were current.
//! - `last_valid` only ever holds a value that parsed successfully.

use log::debug;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Parser failure for the current editor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonParseError {
    pub message: String,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
}

impl From<serde_json::Error> for JsonParseError {
    fn from(value: serde_json::Error) -> Self {
        Self {
            message: value.to_string(),
            line: value.line(),
            column: value.column(),
        }
    }
}

impl Display for JsonParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for JsonParseError {}

/// Parse state of the editor text.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonBlob {
    /// Text parsed; this is the value emitted upward.
    Parsed(Value),
    /// Text does not parse; `null` is emitted upward.
    Invalid {
        last_valid: Value,
        error: JsonParseError,
    },
}

/// Editor for one opaque JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonEditor {
    text: String,
    state: JsonBlob,
}

impl JsonEditor {
    /// Starts an edit session with the compact rendering of `value`.
    pub fn new(value: &Value) -> Self {
        Self {
            text: value.to_string(),
            state: JsonBlob::Parsed(value.clone()),
        }
    }

    /// Replaces the editor text and returns the value to emit upward.
    pub fn input(&mut self, text: impl Into<String>) -> Value {
        self.text = text.into();
        match serde_json::from_str::<Value>(&self.text) {
            Ok(value) => {
                self.state = JsonBlob::Parsed(value.clone());
                value
            }
            Err(err) => {
                debug!(
                    "event=json_blob_invalid module=editor status=error line={} column={}",
                    err.line(),
                    err.column()
                );
                self.state = JsonBlob::Invalid {
                    last_valid: self.last_valid().clone(),
                    error: err.into(),
                };
                Value::Null
            }
        }
    }

    /// Raw text as last entered.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> &JsonBlob {
        &self.state
    }

    /// Value currently emitted upward (`null` while invalid).
    pub fn value(&self) -> Value {
        match &self.state {
            JsonBlob::Parsed(value) => value.clone(),
            JsonBlob::Invalid { .. } => Value::Null,
        }
    }

    /// Most recent successfully parsed value.
    pub fn last_valid(&self) -> &Value {
        match &self.state {
            JsonBlob::Parsed(value) => value,
            JsonBlob::Invalid { last_valid, .. } => last_valid,
        }
    }

    pub fn error(&self) -> Option<&JsonParseError> {
        match &self.state {
            JsonBlob::Parsed(_) => None,
            JsonBlob::Invalid { error, .. } => Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, JsonBlob::Parsed(_))
    }
}
