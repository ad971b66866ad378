use super::*;
use crate::engine::{FieldInput, dispatch};
use crate::render::Node;
use crate::schema::{DefaultValue, FieldOption};
use crate::session::FieldValue;
use crate::store::MemoryFormStore;

// =============================================================
// Palette and add_field
// =============================================================

#[test]
fn palette_offers_text_and_email() {
    let labels: Vec<&str> = FormBuilder::palette().iter().map(|e| e.label).collect();
    assert_eq!(labels, vec!["Text Input", "Email Input"]);
    assert_eq!(FormBuilder::palette()[1].field_type, FieldType::Email);
}

#[test]
fn add_field_uses_builder_defaults() {
    let mut builder = FormBuilder::new("Signup");
    let first = builder.add_field(FieldType::Text);
    let second = builder.add_field(FieldType::Email);

    assert!(first.starts_with("field-"));
    assert_ne!(first, second);
    let field = builder.config().field(&second).unwrap();
    assert_eq!(field.field_type, "email");
    assert_eq!(field.label, "New email Field");
    assert_eq!(field.name, "field_2");
    assert!(!field.required);
}

#[test]
fn mutations_bump_updated_at() {
    let mut builder = FormBuilder::new("Signup");
    let created = builder.config().updated_at;
    let id = builder.add_field(FieldType::Text);
    assert!(builder.config().updated_at >= created);
    let added = builder.config().updated_at;
    builder.remove_field(&id).unwrap();
    assert!(builder.config().updated_at >= added);
    assert!(builder.fields().is_empty());
}

// =============================================================
// update_field / remove_field
// =============================================================

#[test]
fn update_field_merges_only_present_attributes() {
    let mut builder = FormBuilder::new("Signup");
    let id = builder.add_field(FieldType::Text);
    let partial = PartialFieldSchema { label: Some("Full name".into()), required: Some(true), ..Default::default() };
    builder.update_field(&id, &partial).unwrap();

    let field = builder.config().field(&id).unwrap();
    assert_eq!(field.label, "Full name");
    assert!(field.required);
    assert_eq!(field.name, "field_1");
}

#[test]
fn update_and_remove_unknown_field_fail() {
    let mut builder = FormBuilder::new("Signup");
    assert!(matches!(
        builder.update_field("ghost", &PartialFieldSchema::default()),
        Err(FormError::UnknownField(_))
    ));
    assert!(matches!(builder.remove_field("ghost"), Err(FormError::UnknownField(_))));
}

// =============================================================
// Preview and change events
// =============================================================

#[test]
fn preview_is_edit_only_without_submit() {
    let mut builder = FormBuilder::new("Signup");
    builder.add_field(FieldType::Email);
    let tree = builder.preview().unwrap().render();
    assert_eq!(tree.mode, RenderMode::EditOnly);
    assert_eq!(tree.submit, None);
    assert_eq!(tree.nodes.len(), 1);
}

#[test]
fn preview_input_folds_into_default_value() {
    let mut builder = FormBuilder::new("Signup");
    let id = builder.add_field(FieldType::Text);
    let mut preview = builder.preview().unwrap();

    let actions = preview.input(&id, FieldInput::Text("hello".into())).unwrap();
    dispatch(&actions, &mut builder);

    let field = builder.config().field(&id).unwrap();
    assert_eq!(field.default_value, Some(DefaultValue::Text("hello".into())));

    // Remounting shows the folded value.
    let tree = builder.preview().unwrap().render();
    let Some(Node::Input(input)) = tree.node(&id) else {
        panic!("expected input");
    };
    assert_eq!(input.value, "hello");
}

#[test]
fn single_checkbox_change_becomes_boolean_default() {
    let mut builder = FormBuilder::new("Prefs");
    let id = builder.add_field(FieldType::Checkbox);
    let mut preview = builder.preview().unwrap();
    let actions = preview.input(&id, FieldInput::Checked(true)).unwrap();
    dispatch(&actions, &mut builder);
    assert_eq!(builder.config().field(&id).unwrap().default_value, Some(DefaultValue::Bool(true)));
}

#[test]
fn list_changes_leave_default_untouched() {
    let mut builder = FormBuilder::new("Prefs");
    let id = builder.add_field(FieldType::Checkbox);
    let options = PartialFieldSchema { options: Some(vec![FieldOption::new("a", "A")]), ..Default::default() };
    builder.update_field(&id, &options).unwrap();

    builder.on_field_change(&FieldChange {
        field_id: id.clone(),
        attribute: DEFAULT_VALUE_ATTRIBUTE.into(),
        value: FieldValue::List(vec!["a".into()]),
    });
    assert_eq!(builder.config().field(&id).unwrap().default_value, None);
}

#[test]
fn other_attributes_are_ignored() {
    let mut builder = FormBuilder::new("Signup");
    let id = builder.add_field(FieldType::Text);
    builder.on_field_change(&FieldChange {
        field_id: id.clone(),
        attribute: "label".into(),
        value: FieldValue::Text("x".into()),
    });
    assert_eq!(builder.config().field(&id).unwrap().default_value, None);
}

// =============================================================
// Persistence
// =============================================================

#[test]
fn save_then_resume() {
    let mut builder = FormBuilder::new("Signup");
    builder.add_field(FieldType::Email);
    let mut store = MemoryFormStore::new();
    builder.save(&mut store).unwrap();

    let loaded = store.load(&builder.config().id).unwrap();
    let resumed = FormBuilder::from_config(loaded);
    assert_eq!(resumed.config(), builder.config());
}
