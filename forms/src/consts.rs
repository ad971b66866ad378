//! Shared labels, messages, and naming prefixes for the forms crate.

// ── Rendering ───────────────────────────────────────────────────

/// Submit button label used when a form config does not set `submitText`.
pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";

/// Placeholder shown by a select control before any option is chosen.
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// Schema attribute carried by value-edit field-change events.
pub const DEFAULT_VALUE_ATTRIBUTE: &str = "defaultValue";

// ── Validation messages ─────────────────────────────────────────

/// Message attached when a required field is empty.
pub const MSG_REQUIRED: &str = "This field is required";

/// Message attached when a value does not match the field's pattern.
pub const MSG_PATTERN: &str = "Invalid format";

// ── Builder ─────────────────────────────────────────────────────

/// Prefix for builder-generated field ids.
pub const FIELD_ID_PREFIX: &str = "field-";

/// Prefix for builder-generated field names; followed by the 1-based field count.
pub const FIELD_NAME_PREFIX: &str = "field_";
