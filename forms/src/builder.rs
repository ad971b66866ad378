//! Live form builder.
//!
//! `FormBuilder` owns a [`FormConfig`] under construction. Fields are added
//! from a small palette, edited through sparse updates, and previewed by
//! mounting the current schema in edit-only mode. The builder listens to the
//! preview's field-change events so a value typed into the preview becomes
//! that field's `defaultValue`.

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

use uuid::Uuid;

use crate::consts::{DEFAULT_VALUE_ATTRIBUTE, FIELD_ID_PREFIX, FIELD_NAME_PREFIX};
use crate::engine::{FieldChange, FormEngine, FormListener};
use crate::error::{FormError, StoreError};
use crate::render::RenderMode;
use crate::schema::{FieldSchema, FieldType, FormConfig, PartialFieldSchema};
use crate::store::FormStore;

/// One addable field type as shown in the builder palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub field_type: FieldType,
    pub label: &'static str,
}

const DEFAULT_PALETTE: [PaletteEntry; 2] = [
    PaletteEntry { field_type: FieldType::Text, label: "Text Input" },
    PaletteEntry { field_type: FieldType::Email, label: "Email Input" },
];

#[derive(Debug, Clone)]
pub struct FormBuilder {
    config: FormConfig,
}

impl FormBuilder {
    /// Start a new, empty form.
    pub fn new(title: impl Into<String>) -> Self {
        Self { config: FormConfig::new(title) }
    }

    /// Resume editing a saved form.
    #[must_use]
    pub fn from_config(config: FormConfig) -> Self {
        Self { config }
    }

    /// Types offered for [`FormBuilder::add_field`].
    #[must_use]
    pub fn palette() -> &'static [PaletteEntry] {
        &DEFAULT_PALETTE
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn into_config(self) -> FormConfig {
        self.config
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.config.fields
    }

    // --- Mutations ---

    /// Append a fresh field of `field_type` and return its id.
    pub fn add_field(&mut self, field_type: FieldType) -> String {
        let n = self.config.fields.len() + 1;
        let id = format!("{FIELD_ID_PREFIX}{}", Uuid::new_v4());
        let field = FieldSchema::new(
            id.clone(),
            field_type,
            format!("New {field_type} Field"),
            format!("{FIELD_NAME_PREFIX}{n}"),
        );
        self.config.fields.push(field);
        self.config.touch();
        tracing::debug!(field_id = %id, %field_type, "field added");
        id
    }

    /// Merge a sparse update into the field with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when no field has `id`.
    pub fn update_field(&mut self, id: &str, partial: &PartialFieldSchema) -> Result<(), FormError> {
        let field = self
            .config
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FormError::UnknownField(id.to_owned()))?;
        field.apply_partial(partial);
        self.config.touch();
        Ok(())
    }

    /// Remove the field with `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when no field has `id`.
    pub fn remove_field(&mut self, id: &str) -> Result<FieldSchema, FormError> {
        let index = self
            .config
            .fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FormError::UnknownField(id.to_owned()))?;
        let removed = self.config.fields.remove(index);
        self.config.touch();
        tracing::debug!(field_id = %id, "field removed");
        Ok(removed)
    }

    // --- Preview / persistence ---

    /// Mount the current fields in edit-only mode.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] when a field carries an invalid pattern.
    pub fn preview(&self) -> Result<FormEngine, FormError> {
        FormEngine::from_config(&self.config, RenderMode::EditOnly)
    }

    /// Hand the current config to `store`.
    ///
    /// # Errors
    ///
    /// Propagates the store's failure.
    pub fn save(&self, store: &mut impl FormStore) -> Result<(), StoreError> {
        store.save(&self.config)
    }
}

impl FormListener for FormBuilder {
    fn on_field_change(&mut self, change: &FieldChange) {
        if change.attribute != DEFAULT_VALUE_ATTRIBUTE {
            return;
        }
        // List values (checkbox groups, file pickers) have no schema default.
        let Some(value) = change.value.to_default_value() else {
            return;
        };
        let partial = PartialFieldSchema { default_value: Some(value), ..Default::default() };
        if let Err(e) = self.update_field(&change.field_id, &partial) {
            tracing::warn!(error = %e, "field change for unknown field");
        }
    }
}
