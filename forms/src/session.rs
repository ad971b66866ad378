//! Ephemeral per-mount state: current values, field errors, submission phase.
//!
//! A `SessionState` is created when a form mounts and dropped with it. It is
//! owned by exactly one [`crate::engine::FormEngine`]; nothing here is shared
//! between form instances or persisted.
//!
//! Submission lifecycle:
//!
//! ```text
//! Pristine --submit--> Validating --all rules pass--> (values emitted) --> Pristine
//!                                 \--any rule fails--> Invalid --submit--> Validating
//! ```

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::schema::{DefaultValue, FieldSchema};
use crate::validate::FieldError;

/// Current value of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single checkbox state.
    Bool(bool),
    /// Text-like inputs, select, radio, hidden.
    Text(String),
    /// Checked option values of a checkbox group, or chosen file names.
    List(Vec<String>),
}

impl FieldValue {
    /// Whether the value counts as "nothing entered" for `required`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// The text content, for length and pattern checks.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether both values are the same variant, whatever their contents.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Scalar values map onto a schema default; lists have no schema-level default.
    #[must_use]
    pub fn to_default_value(&self) -> Option<DefaultValue> {
        match self {
            Self::Bool(b) => Some(DefaultValue::Bool(*b)),
            Self::Text(s) => Some(DefaultValue::Text(s.clone())),
            Self::List(_) => None,
        }
    }
}

/// Field name to value, ordered by name.
pub type FormValues = BTreeMap<String, FieldValue>;

/// Where the session is in the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// No submission attempted since mount or since the last successful submit.
    #[default]
    Pristine,
    /// A submission is being evaluated.
    Validating,
    /// The last submission was blocked; errors are attached.
    Invalid,
}

/// Values and errors for one mounted form.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    values: FormValues,
    errors: BTreeMap<String, FieldError>,
    phase: SubmitPhase,
    submit_count: u32,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Values ---

    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Drop values and errors for names not in `names`.
    pub fn retain_names(&mut self, names: &HashSet<&str>) {
        self.values.retain(|k, _| names.contains(k.as_str()));
        self.errors.retain(|k, _| names.contains(k.as_str()));
    }

    // --- Errors ---

    #[must_use]
    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// All attached errors, ordered by field name.
    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Replace or clear the error for one field.
    pub fn set_error(&mut self, name: &str, error: Option<FieldError>) {
        match error {
            Some(e) => {
                self.errors.insert(name.to_owned(), e);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    // --- Lifecycle ---

    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Number of successful submissions since mount.
    #[must_use]
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Enter `Validating`, discarding errors from the previous attempt.
    pub fn begin_validation(&mut self) {
        self.errors.clear();
        self.phase = SubmitPhase::Validating;
    }

    /// Attach the failures of the current attempt and enter `Invalid`.
    pub fn reject(&mut self, errors: Vec<FieldError>) {
        for e in errors {
            self.errors.insert(e.field.clone(), e);
        }
        self.phase = SubmitPhase::Invalid;
    }

    /// Complete a passing attempt: snapshot the values and return to `Pristine`.
    pub fn accept(&mut self) -> FormValues {
        self.errors.clear();
        self.phase = SubmitPhase::Pristine;
        self.submit_count += 1;
        self.values.clone()
    }
}

/// Value a field starts with when its form mounts.
#[must_use]
pub fn initial_value(field: &FieldSchema, widget: crate::registry::WidgetKind) -> FieldValue {
    use crate::registry::WidgetKind as W;
    match widget {
        W::MultiChoice if field.options.is_some() => FieldValue::List(Vec::new()),
        W::MultiChoice => FieldValue::Bool(field.default_value.as_ref().is_some_and(DefaultValue::truthy)),
        W::FilePicker => FieldValue::List(Vec::new()),
        W::SingleLine | W::MultiLine | W::SingleChoice | W::Passthrough => {
            FieldValue::Text(field.display_default().unwrap_or_default())
        }
    }
}
