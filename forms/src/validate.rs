//! Validation rules: schema-load checks, rule compilation, and evaluation.
//!
//! [`bind`] is the load step a form goes through before it renders. It
//! rejects malformed configuration (bad regular expressions, choice fields
//! without options, missing or duplicate names) and compiles the rules each
//! field's [`RuleProfile`] derives. Evaluation is strictly per field; no rule
//! reads another field's value.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::consts::{MSG_PATTERN, MSG_REQUIRED};
use crate::error::FormError;
use crate::registry::{FieldRegistry, RuleProfile};
use crate::render::RenderMode;
use crate::schema::{FieldSchema, FieldType};
use crate::session::FieldValue;

/// Which rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
}

/// A user-visible validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name the error is attached to.
    pub field: String,
    pub rule: RuleKind,
    pub message: String,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
}

impl Rule {
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Required => RuleKind::Required,
            Self::MinLength(_) => RuleKind::MinLength,
            Self::MaxLength(_) => RuleKind::MaxLength,
            Self::Pattern(_) => RuleKind::Pattern,
        }
    }

    /// Whether `value` satisfies this rule. Empty values only fail `Required`.
    fn passes(&self, value: &FieldValue) -> bool {
        if let Self::Required = self {
            return !value.is_empty();
        }
        let Some(text) = value.as_text().filter(|t| !t.is_empty()) else {
            return true;
        };
        match self {
            Self::Required => true,
            Self::MinLength(n) => text.chars().count() >= *n,
            Self::MaxLength(n) => text.chars().count() <= *n,
            Self::Pattern(re) => re.is_match(text),
        }
    }

    fn generic_message(&self) -> String {
        match self {
            Self::Required => MSG_REQUIRED.to_owned(),
            Self::MinLength(n) => format!("Must be at least {n} characters"),
            Self::MaxLength(n) => format!("Must be at most {n} characters"),
            Self::Pattern(_) => MSG_PATTERN.to_owned(),
        }
    }
}

/// Rules bound to one field, in evaluation order.
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    custom_message: Option<String>,
    rules: Vec<Rule>,
}

impl FieldRules {
    /// Compile the rules `profile` derives from `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] when `pattern` does not compile.
    pub fn compile(field: &FieldSchema, profile: RuleProfile) -> Result<Self, FormError> {
        let mut rules = Vec::new();
        if profile.required && field.required {
            rules.push(Rule::Required);
        }
        if profile.length {
            if let Some(v) = &field.validation {
                if let Some(n) = v.min_length {
                    rules.push(Rule::MinLength(n));
                }
                if let Some(n) = v.max_length {
                    rules.push(Rule::MaxLength(n));
                }
            }
        }
        if profile.pattern {
            if let Some(p) = &field.pattern {
                rules.push(Rule::Pattern(compile_pattern(&field.name, p)?));
            }
        }
        Ok(Self {
            name: field.name.clone(),
            custom_message: field.custom_message().map(str::to_owned),
            rules,
        })
    }

    /// Field name these rules guard.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(Rule::kind).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First failing rule for `value`, if any.
    #[must_use]
    pub fn check(&self, value: &FieldValue) -> Option<FieldError> {
        let failed = self.rules.iter().find(|r| !r.passes(value))?;
        Some(FieldError {
            field: self.name.clone(),
            rule: failed.kind(),
            message: self
                .custom_message
                .clone()
                .unwrap_or_else(|| failed.generic_message()),
        })
    }
}

/// Compiled rules keyed by field id.
pub type Bindings = HashMap<String, FieldRules>;

/// Compile a field's regular expression.
///
/// # Errors
///
/// Returns [`FormError::InvalidPattern`] naming the field on compile failure.
pub fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, FormError> {
    Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        field: field.to_owned(),
        pattern: pattern.to_owned(),
        source,
    })
}

/// Load-time checks plus rule binding for a field list.
///
/// Regular expressions are checked in both modes. Name and option invariants
/// only apply to submit-enabled forms, and only submit-enabled forms get
/// bindings; edit-only forms always return an empty map. Fields with unknown
/// type tags are skipped.
///
/// # Errors
///
/// Returns the first configuration error in field order.
pub fn bind(fields: &[FieldSchema], registry: &FieldRegistry, mode: RenderMode) -> Result<Bindings, FormError> {
    let mut bindings = Bindings::new();
    let mut names: HashSet<&str> = HashSet::new();

    for field in fields {
        check_patterns(field)?;

        let Ok(strategy) = registry.resolve(&field.field_type) else {
            tracing::warn!(field_id = %field.id, field_type = %field.field_type, "unknown field type; field will render empty");
            continue;
        };

        if mode == RenderMode::EditOnly {
            continue;
        }

        if field.name.is_empty() {
            return Err(FormError::MissingName { field_id: field.id.clone() });
        }
        if !names.insert(field.name.as_str()) {
            return Err(FormError::DuplicateName { name: field.name.clone() });
        }
        if missing_options(field) {
            return Err(FormError::MissingOptions { field: field.name.clone() });
        }

        bindings.insert(field.id.clone(), FieldRules::compile(field, strategy.rules)?);
    }

    Ok(bindings)
}

fn check_patterns(field: &FieldSchema) -> Result<(), FormError> {
    let label = if field.name.is_empty() { &field.id } else { &field.name };
    if let Some(p) = &field.pattern {
        compile_pattern(label, p)?;
    }
    if let Some(p) = field.validation.as_ref().and_then(|v| v.regex.as_ref()) {
        compile_pattern(label, p)?;
    }
    Ok(())
}

fn missing_options(field: &FieldSchema) -> bool {
    match field.kind() {
        Ok(t) if t.needs_options() => field.option_list().is_empty(),
        Ok(FieldType::Checkbox) => field.options.as_ref().is_some_and(Vec::is_empty),
        _ => false,
    }
}
