//! Configuration and storage errors.
//!
//! User-visible validation failures are not errors in this sense; they are
//! reported per field as [`crate::validate::FieldError`] and never abort the
//! session.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Stable machine-readable code for an error value.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Errors raised while resolving or loading a form schema.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The `type` tag is outside the closed field-type enumeration.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    /// A `pattern` or `validation.regex` expression failed to compile.
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// A choice field has no options to choose from.
    #[error("field {field} requires at least one option")]
    MissingOptions { field: String },
    /// A field has an empty `name` in a form that collects submissions.
    #[error("field {field_id} has an empty name")]
    MissingName { field_id: String },
    /// Two fields share a `name` in a form that collects submissions.
    #[error("duplicate field name: {name}")]
    DuplicateName { name: String },
    /// No field with the given id exists in the mounted form.
    #[error("field not found: {0}")]
    UnknownField(String),
    /// The input's shape does not fit the field's widget.
    #[error("input does not fit {widget} field {field}")]
    InputMismatch { field: String, widget: &'static str },
}

impl ErrorCode for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFieldType(_) => "E_UNKNOWN_FIELD_TYPE",
            Self::InvalidPattern { .. } => "E_INVALID_PATTERN",
            Self::MissingOptions { .. } => "E_MISSING_OPTIONS",
            Self::MissingName { .. } => "E_MISSING_NAME",
            Self::DuplicateName { .. } => "E_DUPLICATE_NAME",
            Self::UnknownField(_) => "E_UNKNOWN_FIELD",
            Self::InputMismatch { .. } => "E_INPUT_MISMATCH",
        }
    }
}

/// Errors raised by [`crate::store::FormStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("form not found: {0}")]
    NotFound(String),
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("form config encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_FORM_NOT_FOUND",
            Self::Io(_) => "E_STORE_IO",
            Self::Serde(_) => "E_STORE_SERDE",
        }
    }
}
