//! Form engine: one mounted form instance and its event surface.
//!
//! `FormEngine` owns the field list, the compiled rule bindings, and the
//! session for one render lifecycle. Interaction methods never call back into
//! the host; they return [`Action`]s describing what happened, in order. Hosts
//! that prefer callbacks pass those actions to [`dispatch`] with a
//! [`FormListener`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SUBMIT_TEXT, DEFAULT_VALUE_ATTRIBUTE};
use crate::error::FormError;
use crate::registry::{FieldRegistry, WidgetKind};
use crate::render::{FormTree, RenderContext, RenderMode, render};
use crate::schema::{FieldSchema, FormConfig};
use crate::session::{FieldValue, FormValues, SessionState, SubmitPhase, initial_value};
use crate::validate::{Bindings, FieldError, bind};

/// A field edit reported to schema-editing listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field_id: String,
    /// Schema attribute the value belongs to (`defaultValue` for value edits).
    pub attribute: String,
    pub value: FieldValue,
}

/// Raw user input for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Typed text, or the chosen value of a select/radio.
    Text(String),
    /// A standalone checkbox was set or cleared.
    Checked(bool),
    /// One box of a checkbox group was set or cleared.
    Toggle { value: String, checked: bool },
    /// The chosen files of a file picker.
    Files(Vec<String>),
}

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FieldChanged(FieldChange),
    /// Submission was blocked; each error is attached to its field.
    SubmitBlocked(Vec<FieldError>),
    /// Every bound rule passed; carries the collected values.
    Submitted(FormValues),
    RenderNeeded,
}

/// Callback surface for hosts that consume actions as events.
pub trait FormListener {
    fn on_field_change(&mut self, _change: &FieldChange) {}

    fn on_submit(&mut self, _values: &FormValues) {}

    fn on_submit_blocked(&mut self, _errors: &[FieldError]) {}
}

/// Deliver actions to a listener in order. `RenderNeeded` is not forwarded.
pub fn dispatch(actions: &[Action], listener: &mut impl FormListener) {
    for action in actions {
        match action {
            Action::FieldChanged(change) => listener.on_field_change(change),
            Action::Submitted(values) => listener.on_submit(values),
            Action::SubmitBlocked(errors) => listener.on_submit_blocked(errors),
            Action::RenderNeeded => {}
        }
    }
}

/// A mounted form.
#[derive(Debug, Clone)]
pub struct FormEngine {
    fields: Vec<FieldSchema>,
    mode: RenderMode,
    registry: FieldRegistry,
    bindings: Bindings,
    session: SessionState,
    submit_text: String,
}

impl FormEngine {
    /// Mount `fields` with the standard registry.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found while loading the schema.
    pub fn mount(fields: Vec<FieldSchema>, mode: RenderMode) -> Result<Self, FormError> {
        Self::mount_with_registry(fields, mode, FieldRegistry::standard())
    }

    /// Mount `fields` with a caller-supplied registry.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found while loading the schema.
    pub fn mount_with_registry(
        fields: Vec<FieldSchema>,
        mode: RenderMode,
        registry: FieldRegistry,
    ) -> Result<Self, FormError> {
        let bindings = bind(&fields, &registry, mode)?;
        let mut engine = Self {
            fields,
            mode,
            registry,
            bindings,
            session: SessionState::new(),
            submit_text: DEFAULT_SUBMIT_TEXT.to_owned(),
        };
        engine.seed_session();
        tracing::debug!(fields = engine.fields.len(), ?mode, "form mounted");
        Ok(engine)
    }

    /// Mount a saved form config.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found while loading the schema.
    pub fn from_config(config: &FormConfig, mode: RenderMode) -> Result<Self, FormError> {
        let mut engine = Self::mount(config.fields.clone(), mode)?;
        config.submit_text().clone_into(&mut engine.submit_text);
        Ok(engine)
    }

    /// Swap in an updated field list, keeping values for names that persist.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error; the engine is left unchanged.
    pub fn replace_fields(&mut self, fields: Vec<FieldSchema>) -> Result<(), FormError> {
        let bindings = bind(&fields, &self.registry, self.mode)?;
        self.fields = fields;
        self.bindings = bindings;
        if self.mode == RenderMode::SubmitEnabled {
            let names: HashSet<&str> = self
                .fields
                .iter()
                .filter(|f| self.bindings.contains_key(&f.id))
                .map(|f| f.name.as_str())
                .collect();
            self.session.retain_names(&names);
        }
        self.seed_session();
        Ok(())
    }

    /// Give every bound field a value shaped for its widget. Values that
    /// already fit are kept; a field retyped under the same name starts over.
    fn seed_session(&mut self) {
        if self.mode == RenderMode::EditOnly {
            return;
        }
        for field in &self.fields {
            if !self.bindings.contains_key(&field.id) {
                continue;
            }
            let Ok(strategy) = self.registry.resolve(&field.field_type) else {
                continue;
            };
            let initial = initial_value(field, strategy.widget);
            let fits = self.session.value(&field.name).is_some_and(|v| v.same_shape(&initial));
            if !fits {
                self.session.set_value(&field.name, initial);
                self.session.set_error(&field.name, None);
            }
        }
    }

    // --- Render ---

    /// Render the current fields against the current session.
    #[must_use]
    pub fn render(&self) -> FormTree {
        let ctx = RenderContext {
            registry: &self.registry,
            mode: self.mode,
            session: &self.session,
            bindings: &self.bindings,
            submit_text: &self.submit_text,
        };
        render(&self.fields, &ctx)
    }

    // --- Interaction ---

    /// Apply user input to a field.
    ///
    /// Always reports a [`FieldChange`] for the field's `defaultValue`. In
    /// submit-enabled mode the session value is updated too, and after a
    /// blocked submission the field is re-validated on its own.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when no field has `field_id`, and
    /// [`FormError::InputMismatch`] when the input's shape does not fit the
    /// field's widget.
    pub fn input(&mut self, field_id: &str, input: FieldInput) -> Result<Vec<Action>, FormError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.id == field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_owned()))?;

        let Ok(strategy) = self.registry.resolve(&field.field_type) else {
            tracing::debug!(field_id, "input ignored for unrendered field");
            return Ok(Vec::new());
        };

        if !accepts(field, strategy.widget, &input) {
            return Err(FormError::InputMismatch { field: field_id.to_owned(), widget: strategy.widget.as_str() });
        }

        let current = self.session.value(&field.name).cloned();
        let value = next_value(field, current, input);

        if let Some(rules) = self.bindings.get(field_id) {
            self.session.set_value(&field.name, value.clone());
            if self.session.phase() == SubmitPhase::Invalid {
                self.session.set_error(&field.name, rules.check(&value));
            }
        }

        Ok(vec![
            Action::FieldChanged(FieldChange {
                field_id: field_id.to_owned(),
                attribute: DEFAULT_VALUE_ATTRIBUTE.to_owned(),
                value,
            }),
            Action::RenderNeeded,
        ])
    }

    /// Attempt a submission.
    ///
    /// In edit-only mode this is a no-op. Otherwise every bound field is
    /// checked; any failure blocks the submission and attaches errors, and a
    /// clean pass emits the collected values and resets to pristine.
    pub fn submit(&mut self) -> Vec<Action> {
        if self.mode == RenderMode::EditOnly {
            return Vec::new();
        }

        self.session.begin_validation();
        let empty = FieldValue::Text(String::new());
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|f| {
                let rules = self.bindings.get(&f.id)?;
                rules.check(self.session.value(&f.name).unwrap_or(&empty))
            })
            .collect();

        if errors.is_empty() {
            let values = self.session.accept();
            tracing::info!(fields = values.len(), "form submitted");
            vec![Action::Submitted(values), Action::RenderNeeded]
        } else {
            tracing::debug!(errors = errors.len(), "submission blocked");
            self.session.reject(errors.clone());
            vec![Action::SubmitBlocked(errors), Action::RenderNeeded]
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Look up a field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }
}

/// Whether `input` is something the field's widget can produce.
fn accepts(field: &FieldSchema, widget: WidgetKind, input: &FieldInput) -> bool {
    match (widget, input) {
        (
            WidgetKind::SingleLine | WidgetKind::MultiLine | WidgetKind::SingleChoice | WidgetKind::Passthrough,
            FieldInput::Text(_),
        )
        | (WidgetKind::FilePicker, FieldInput::Files(_)) => true,
        (WidgetKind::MultiChoice, FieldInput::Checked(_)) => field.options.is_none(),
        (WidgetKind::MultiChoice, FieldInput::Toggle { .. }) => field.options.is_some(),
        _ => false,
    }
}

/// Fold one input into a field's value. The input has already been checked
/// against the widget.
fn next_value(field: &FieldSchema, current: Option<FieldValue>, input: FieldInput) -> FieldValue {
    match input {
        FieldInput::Text(s) => FieldValue::Text(s),
        FieldInput::Checked(b) => FieldValue::Bool(b),
        FieldInput::Files(files) => FieldValue::List(files),
        FieldInput::Toggle { value, checked } => {
            let mut set: HashSet<String> = match current {
                Some(FieldValue::List(items)) => items.into_iter().collect(),
                _ => HashSet::new(),
            };
            if checked {
                set.insert(value);
            } else {
                set.remove(&value);
            }
            // Option order, not click order.
            FieldValue::List(
                field.option_list().iter().filter(|o| set.contains(&o.value)).map(|o| o.value.clone()).collect(),
            )
        }
    }
}
