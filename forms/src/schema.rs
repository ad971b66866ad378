//! Schema model: field descriptors, form configs, and sparse field updates.
//!
//! `FieldSchema` is the declarative description of one form field as it
//! arrives from a builder or a saved `FormConfig`. The `type` tag stays a raw
//! string so that forward-compatible schemas carrying tags this crate does not
//! know still deserialize; [`FieldType`] is the closed set the registry
//! understands. `PartialFieldSchema` carries builder edits, applied with
//! [`FieldSchema::apply_partial`].

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::DEFAULT_SUBMIT_TEXT;
use crate::error::FormError;

/// Closed enumeration of field types understood by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Date,
    #[serde(alias = "datetime")]
    DatetimeLocal,
    Month,
    Week,
    Time,
    Color,
    Range,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
    Hidden,
}

impl FieldType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Number,
        Self::Tel,
        Self::Url,
        Self::Date,
        Self::DatetimeLocal,
        Self::Month,
        Self::Week,
        Self::Time,
        Self::Color,
        Self::Range,
        Self::Textarea,
        Self::Select,
        Self::Checkbox,
        Self::Radio,
        Self::File,
        Self::Hidden,
    ];

    /// The wire tag for this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Month => "month",
            Self::Week => "week",
            Self::Time => "time",
            Self::Color => "color",
            Self::Range => "range",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::File => "file",
            Self::Hidden => "hidden",
        }
    }

    /// Whether this type requires a non-empty `options` list.
    #[must_use]
    pub fn needs_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "datetime" {
            return Ok(Self::DatetimeLocal);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FormError::UnknownFieldType(s.to_owned()))
    }
}

/// A field's declared default: string, number, or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl DefaultValue {
    /// String form shown in a control (`5` renders as `"5"`, not `"5.0"`).
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_text(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Boolean coercion: `false`, `0`, `NaN`, and `""` are false.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

/// Shortest round-trip digits, in exponent form (`1e+21`, `1.5e-7`) outside
/// `[1e-6, 1e21)`.
fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let abs = n.abs();
    if abs == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// One selectable choice of a select, radio, or checkbox-group field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// Extra validation settings attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    /// Checked for well-formedness at load time; not bound as a rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Replaces the generic message of any failing rule on this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// Declarative description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Stable per-instance identifier.
    pub id: String,
    /// Raw type tag; see [`FieldType`] for the known set.
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    /// Session-state key; unique within a submit-enabled form.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    /// MIME filter for file pickers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FieldSchema {
    /// A field with the given identity and every optional attribute unset.
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: field_type.as_str().to_owned(),
            label: label.into(),
            name: name.into(),
            placeholder: None,
            required: false,
            default_value: None,
            options: None,
            multiple: false,
            min: None,
            max: None,
            step: None,
            pattern: None,
            rows: None,
            cols: None,
            accept: None,
            validation: None,
        }
    }

    /// Parse the raw type tag.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownFieldType`] for tags outside the closed set.
    pub fn kind(&self) -> Result<FieldType, FormError> {
        self.field_type.parse()
    }

    /// The default value as control text, if one is set.
    #[must_use]
    pub fn display_default(&self) -> Option<String> {
        self.default_value.as_ref().map(DefaultValue::display)
    }

    /// Options as a slice; empty when absent.
    #[must_use]
    pub fn option_list(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Custom message from the validation block, if any.
    #[must_use]
    pub fn custom_message(&self) -> Option<&str> {
        self.validation.as_ref().and_then(|v| v.custom_message.as_deref())
    }

    /// Apply a sparse update. Only present fields are written.
    pub fn apply_partial(&mut self, partial: &PartialFieldSchema) {
        if let Some(ref t) = partial.field_type {
            self.field_type.clone_from(t);
        }
        if let Some(ref label) = partial.label {
            self.label.clone_from(label);
        }
        if let Some(ref name) = partial.name {
            self.name.clone_from(name);
        }
        if let Some(ref placeholder) = partial.placeholder {
            self.placeholder = Some(placeholder.clone());
        }
        if let Some(required) = partial.required {
            self.required = required;
        }
        if let Some(ref value) = partial.default_value {
            self.default_value = Some(value.clone());
        }
        if let Some(ref options) = partial.options {
            self.options = Some(options.clone());
        }
        if let Some(multiple) = partial.multiple {
            self.multiple = multiple;
        }
        if let Some(ref pattern) = partial.pattern {
            self.pattern = Some(pattern.clone());
        }
        if let Some(ref validation) = partial.validation {
            self.validation = Some(validation.clone());
        }
    }
}

/// Sparse update for a field. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFieldSchema {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// A persisted form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormConfig {
    /// Create an empty form with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
            submit_text: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Submit button label, falling back to [`DEFAULT_SUBMIT_TEXT`].
    #[must_use]
    pub fn submit_text(&self) -> &str {
        self.submit_text.as_deref().unwrap_or(DEFAULT_SUBMIT_TEXT)
    }

    /// Look up a field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
