//! Type-tag dispatch table.
//!
//! Each known [`FieldType`] maps to a [`RenderStrategy`]: which widget family
//! renders it and which validation rules its constraint attributes derive.
//! Adding a field type is a table entry, not a new match arm in the renderer.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use crate::error::FormError;
use crate::schema::FieldType;

/// Widget family a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Single-line input (text, email, number, date variants, ...).
    SingleLine,
    /// Multi-line text area.
    MultiLine,
    /// Exactly one value chosen from a set (select, radio).
    SingleChoice,
    /// Checkbox: a group when options are present, otherwise one boolean box.
    MultiChoice,
    /// File picker.
    FilePicker,
    /// Invisible value carried through to submission.
    Passthrough,
}

impl WidgetKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleLine => "single-line",
            Self::MultiLine => "multi-line",
            Self::SingleChoice => "single-choice",
            Self::MultiChoice => "multi-choice",
            Self::FilePicker => "file-picker",
            Self::Passthrough => "passthrough",
        }
    }
}

/// Which constraint attributes of a schema turn into bound rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleProfile {
    /// Bind `required` when the schema sets it.
    pub required: bool,
    /// Bind the `pattern` attribute.
    pub pattern: bool,
    /// Bind `validation.minLength` / `validation.maxLength`.
    pub length: bool,
}

impl RuleProfile {
    /// No rules are derived.
    pub const NONE: Self = Self { required: false, pattern: false, length: false };
    /// Only `required` is derived.
    pub const REQUIRED: Self = Self { required: true, pattern: false, length: false };
    /// `required` and length bounds, no pattern.
    pub const TEXT_BLOCK: Self = Self { required: true, pattern: false, length: true };
    /// Every constraint attribute is derived.
    pub const TEXT_LINE: Self = Self { required: true, pattern: true, length: true };
}

/// Widget family plus rule derivation for one field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStrategy {
    pub widget: WidgetKind,
    pub rules: RuleProfile,
}

impl RenderStrategy {
    #[must_use]
    pub const fn new(widget: WidgetKind, rules: RuleProfile) -> Self {
        Self { widget, rules }
    }
}

/// Lookup table from field type to render strategy.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    strategies: HashMap<FieldType, RenderStrategy>,
}

impl FieldRegistry {
    /// The built-in table covering every [`FieldType`].
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self { strategies: HashMap::new() };
        for t in FieldType::ALL {
            registry.register(t, standard_strategy(t));
        }
        registry
    }

    /// Insert or replace the strategy for a type.
    pub fn register(&mut self, field_type: FieldType, strategy: RenderStrategy) {
        self.strategies.insert(field_type, strategy);
    }

    /// Strategy for an already-parsed type, if registered.
    #[must_use]
    pub fn get(&self, field_type: FieldType) -> Option<RenderStrategy> {
        self.strategies.get(&field_type).copied()
    }

    /// Resolve a raw type tag.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownFieldType`] when the tag is outside the
    /// closed enumeration or has no registered strategy.
    pub fn resolve(&self, tag: &str) -> Result<RenderStrategy, FormError> {
        let field_type: FieldType = tag.parse()?;
        self.get(field_type)
            .ok_or_else(|| FormError::UnknownFieldType(tag.to_owned()))
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_strategy(field_type: FieldType) -> RenderStrategy {
    use FieldType as T;
    match field_type {
        T::Text
        | T::Email
        | T::Password
        | T::Number
        | T::Tel
        | T::Url
        | T::Date
        | T::DatetimeLocal
        | T::Month
        | T::Week
        | T::Time
        | T::Color
        | T::Range => RenderStrategy::new(WidgetKind::SingleLine, RuleProfile::TEXT_LINE),
        T::Textarea => RenderStrategy::new(WidgetKind::MultiLine, RuleProfile::TEXT_BLOCK),
        // Select derives no `required` rule; see DESIGN.md.
        T::Select => RenderStrategy::new(WidgetKind::SingleChoice, RuleProfile::NONE),
        T::Checkbox => RenderStrategy::new(WidgetKind::MultiChoice, RuleProfile::NONE),
        T::Radio => RenderStrategy::new(WidgetKind::SingleChoice, RuleProfile::REQUIRED),
        T::File => RenderStrategy::new(WidgetKind::FilePicker, RuleProfile::REQUIRED),
        T::Hidden => RenderStrategy::new(WidgetKind::Passthrough, RuleProfile::NONE),
    }
}
