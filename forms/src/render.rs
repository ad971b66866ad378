//! Pure schema-to-tree rendering.
//!
//! [`render`] maps an ordered field list onto a [`FormTree`], one [`Node`]
//! per field in schema order. The tree is plain data: a host UI layer walks
//! it to build real widgets. Rendering reads the session (current values and
//! errors) but never mutates it, so rendering the same inputs twice yields
//! equal trees.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::SELECT_PLACEHOLDER;
use crate::registry::{FieldRegistry, WidgetKind};
use crate::schema::{DefaultValue, FieldOption, FieldSchema, FieldType};
use crate::session::{FieldValue, SessionState};
use crate::validate::{Bindings, FieldRules, RuleKind};

/// Whether a rendered form collects submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Rules are bound and a submit control is rendered.
    SubmitEnabled,
    /// Builder preview: structure only, no rule binding, no submit control.
    EditOnly,
}

/// Everything a render pass reads besides the field list.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub registry: &'a FieldRegistry,
    pub mode: RenderMode,
    pub session: &'a SessionState,
    pub bindings: &'a Bindings,
    pub submit_text: &'a str,
}

/// Rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTree {
    pub mode: RenderMode,
    pub nodes: Vec<Node>,
    /// Submit button label; absent in edit-only mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<String>,
}

impl FormTree {
    /// Nodes that render a visible or hidden control (everything but `Empty`).
    pub fn controls(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !matches!(n, Node::Empty { .. }))
    }

    /// Node rendered for the field with this id.
    #[must_use]
    pub fn node(&self, field_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.field_id() == field_id)
    }
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Node {
    /// Unknown type tag: nothing is drawn.
    #[serde(rename_all = "camelCase")]
    Empty { field_id: String },
    Input(InputNode),
    TextArea(TextAreaNode),
    Select(SelectNode),
    Checkbox(CheckboxNode),
    CheckboxGroup(CheckboxGroupNode),
    RadioGroup(RadioGroupNode),
    File(FileNode),
    Hidden(HiddenNode),
}

impl Node {
    /// Id of the field this node renders.
    #[must_use]
    pub fn field_id(&self) -> &str {
        match self {
            Self::Empty { field_id } => field_id,
            Self::Input(n) => &n.id,
            Self::TextArea(n) => &n.id,
            Self::Select(n) => &n.id,
            Self::Checkbox(n) => &n.id,
            Self::CheckboxGroup(n) => &n.id,
            Self::RadioGroup(n) => &n.id,
            Self::File(n) => &n.id,
            Self::Hidden(n) => &n.id,
        }
    }

    /// Number of interactive controls this node produces.
    #[must_use]
    pub fn control_count(&self) -> usize {
        match self {
            Self::Empty { .. } => 0,
            Self::CheckboxGroup(n) => n.boxes.len(),
            Self::RadioGroup(n) => n.items.len(),
            _ => 1,
        }
    }

    /// Error message attached to the node's field, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Empty { .. } | Self::Hidden(_) => None,
            Self::Input(n) => n.error.as_deref(),
            Self::TextArea(n) => n.error.as_deref(),
            Self::Select(n) => n.error.as_deref(),
            Self::Checkbox(n) => n.error.as_deref(),
            Self::CheckboxGroup(n) => n.error.as_deref(),
            Self::RadioGroup(n) => n.error.as_deref(),
            Self::File(n) => n.error.as_deref(),
        }
    }

    /// Rules bound to the node's field.
    #[must_use]
    pub fn rules(&self) -> &[RuleKind] {
        match self {
            Self::Empty { .. } | Self::Hidden(_) | Self::Checkbox(_) | Self::CheckboxGroup(_) => &[],
            Self::Input(n) => &n.rules,
            Self::TextArea(n) => &n.rules,
            Self::Select(n) => &n.rules,
            Self::RadioGroup(n) => &n.rules,
            Self::File(n) => &n.rules,
        }
    }
}

/// Single-line input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputNode {
    pub id: String,
    pub name: String,
    pub label: String,
    /// Input type attribute (`text`, `email`, `datetime-local`, ...).
    pub input_type: String,
    pub placeholder: Option<String>,
    /// Markup-level required marker; enforcement comes from `rules`.
    pub required: bool,
    pub value: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub rules: Vec<RuleKind>,
    pub error: Option<String>,
}

/// Multi-line text area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub value: String,
    pub rules: Vec<RuleKind>,
    pub error: Option<String>,
}

/// Dropdown with a single selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub options: Vec<FieldOption>,
    pub selected: Option<String>,
    pub rules: Vec<RuleKind>,
    pub error: Option<String>,
}

/// One checkbox, standalone or inside a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxNode {
    pub id: String,
    pub name: String,
    pub label: String,
    /// Option value for group members; `None` for a standalone box.
    pub value: Option<String>,
    pub checked: bool,
    pub error: Option<String>,
}

/// A set of checkboxes sharing one field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxGroupNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub boxes: Vec<CheckboxNode>,
    pub error: Option<String>,
}

/// One radio button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    pub id: String,
    pub value: String,
    pub label: String,
}

/// Radio buttons with a single selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroupNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub items: Vec<ChoiceItem>,
    pub selected: Option<String>,
    pub rules: Vec<RuleKind>,
    pub error: Option<String>,
}

/// File picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub label: String,
    pub multiple: bool,
    pub accept: Option<String>,
    pub files: Vec<String>,
    pub rules: Vec<RuleKind>,
    pub error: Option<String>,
}

/// Invisible passthrough value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenNode {
    pub id: String,
    pub name: String,
    pub value: String,
}

/// Render every field in order.
#[must_use]
pub fn render(fields: &[FieldSchema], ctx: &RenderContext<'_>) -> FormTree {
    let nodes: Vec<Node> = fields.iter().map(|f| render_field(f, ctx)).collect();
    tracing::debug!(nodes = nodes.len(), mode = ?ctx.mode, "form rendered");
    let submit = match ctx.mode {
        RenderMode::SubmitEnabled => Some(ctx.submit_text.to_owned()),
        RenderMode::EditOnly => None,
    };
    FormTree { mode: ctx.mode, nodes, submit }
}

/// Render a single field. Unknown type tags produce [`Node::Empty`].
#[must_use]
pub fn render_field(field: &FieldSchema, ctx: &RenderContext<'_>) -> Node {
    let Ok(strategy) = ctx.registry.resolve(&field.field_type) else {
        return Node::Empty { field_id: field.id.clone() };
    };

    let value = ctx.session.value(&field.name);
    let error = ctx.session.error(&field.name).map(|e| e.message.clone());
    let rules = ctx
        .bindings
        .get(&field.id)
        .map(FieldRules::kinds)
        .unwrap_or_default();

    match strategy.widget {
        WidgetKind::SingleLine => Node::Input(InputNode {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            input_type: field.field_type.clone(),
            placeholder: field.placeholder.clone(),
            required: field.required,
            value: text_value(field, value),
            min: field.min,
            max: field.max,
            step: field.step,
            rules,
            error,
        }),
        WidgetKind::MultiLine => Node::TextArea(TextAreaNode {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            placeholder: field.placeholder.clone(),
            required: field.required,
            rows: field.rows,
            cols: field.cols,
            value: text_value(field, value),
            rules,
            error,
        }),
        WidgetKind::SingleChoice if matches!(field.kind(), Ok(FieldType::Radio)) => Node::RadioGroup(RadioGroupNode {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            items: field
                .option_list()
                .iter()
                .map(|o| ChoiceItem { id: option_id(field, o), value: o.value.clone(), label: o.label.clone() })
                .collect(),
            selected: selected_value(field, value),
            rules,
            error,
        }),
        WidgetKind::SingleChoice => Node::Select(SelectNode {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            placeholder: SELECT_PLACEHOLDER.to_owned(),
            options: field.option_list().to_vec(),
            selected: selected_value(field, value),
            rules,
            error,
        }),
        WidgetKind::MultiChoice => match &field.options {
            Some(options) => {
                let checked: &[String] = match value {
                    Some(FieldValue::List(items)) => items,
                    _ => &[],
                };
                Node::CheckboxGroup(CheckboxGroupNode {
                    id: field.id.clone(),
                    name: field.name.clone(),
                    label: field.label.clone(),
                    boxes: options
                        .iter()
                        .map(|o| CheckboxNode {
                            id: option_id(field, o),
                            name: field.name.clone(),
                            label: o.label.clone(),
                            value: Some(o.value.clone()),
                            checked: checked.contains(&o.value),
                            error: None,
                        })
                        .collect(),
                    error,
                })
            }
            None => Node::Checkbox(CheckboxNode {
                id: field.id.clone(),
                name: field.name.clone(),
                label: field.label.clone(),
                value: None,
                checked: match value {
                    Some(FieldValue::Bool(b)) => *b,
                    _ => field.default_value.as_ref().is_some_and(DefaultValue::truthy),
                },
                error,
            }),
        },
        WidgetKind::FilePicker => Node::File(FileNode {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            multiple: field.multiple,
            accept: field.accept.clone(),
            files: match value {
                Some(FieldValue::List(files)) => files.clone(),
                _ => Vec::new(),
            },
            rules,
            error,
        }),
        WidgetKind::Passthrough => Node::Hidden(HiddenNode {
            id: field.id.clone(),
            name: field.name.clone(),
            value: text_value(field, value),
        }),
    }
}

fn option_id(field: &FieldSchema, option: &FieldOption) -> String {
    format!("{}-{}", field.id, option.value)
}

/// Session text if present, otherwise the schema default.
fn text_value(field: &FieldSchema, value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(s)) => s.clone(),
        _ => field.display_default().unwrap_or_default(),
    }
}

fn selected_value(field: &FieldSchema, value: Option<&FieldValue>) -> Option<String> {
    Some(text_value(field, value)).filter(|s| !s.is_empty())
}
