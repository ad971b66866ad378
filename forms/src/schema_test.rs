#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// FieldType
// =============================================================

#[test]
fn field_type_parses_every_tag() {
    for t in FieldType::ALL {
        assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
    }
}

#[test]
fn field_type_accepts_datetime_alias() {
    assert_eq!("datetime".parse::<FieldType>().unwrap(), FieldType::DatetimeLocal);
    let t: FieldType = serde_json::from_str("\"datetime\"").unwrap();
    assert_eq!(t, FieldType::DatetimeLocal);
}

#[test]
fn field_type_rejects_unknown_tag() {
    let err = "unsupported-xyz".parse::<FieldType>().unwrap_err();
    assert!(matches!(err, FormError::UnknownFieldType(ref tag) if tag == "unsupported-xyz"));
}

#[test]
fn field_type_search_is_outside_the_enumeration() {
    assert!("search".parse::<FieldType>().is_err());
}

#[test]
fn field_type_serializes_kebab_case() {
    assert_eq!(serde_json::to_string(&FieldType::DatetimeLocal).unwrap(), "\"datetime-local\"");
    assert_eq!(serde_json::to_string(&FieldType::Textarea).unwrap(), "\"textarea\"");
}

#[test]
fn field_type_display_matches_tag() {
    assert_eq!(FieldType::Tel.to_string(), "tel");
}

#[test]
fn only_select_and_radio_need_options() {
    let needing: Vec<FieldType> = FieldType::ALL.into_iter().filter(|t| t.needs_options()).collect();
    assert_eq!(needing, vec![FieldType::Select, FieldType::Radio]);
}

// =============================================================
// DefaultValue
// =============================================================

#[test]
fn default_value_deserializes_each_shape() {
    let v: DefaultValue = serde_json::from_value(json!("hello")).unwrap();
    assert_eq!(v, DefaultValue::Text("hello".into()));
    let v: DefaultValue = serde_json::from_value(json!(42)).unwrap();
    assert_eq!(v, DefaultValue::Number(42.0));
    let v: DefaultValue = serde_json::from_value(json!(true)).unwrap();
    assert_eq!(v, DefaultValue::Bool(true));
}

#[test]
fn default_value_display_drops_integral_fraction() {
    assert_eq!(DefaultValue::Number(5.0).display(), "5");
    assert_eq!(DefaultValue::Number(-3.0).display(), "-3");
    assert_eq!(DefaultValue::Number(1.5).display(), "1.5");
    assert_eq!(DefaultValue::Bool(false).display(), "false");
    assert_eq!(DefaultValue::Text("x".into()).display(), "x");
}

#[test]
fn default_value_display_uses_exponent_form_at_the_extremes() {
    let cases = [
        (1e20, "100000000000000000000"),
        (1e21, "1e+21"),
        (-2.5e22, "-2.5e+22"),
        (0.000_001, "0.000001"),
        (1.5e-7, "1.5e-7"),
        (-0.0, "0"),
        (f64::NAN, "NaN"),
        (f64::INFINITY, "Infinity"),
        (f64::NEG_INFINITY, "-Infinity"),
    ];
    for (n, expected) in cases {
        assert_eq!(DefaultValue::Number(n).display(), expected, "{n}");
    }
}

#[test]
fn default_value_truthiness() {
    assert!(DefaultValue::Bool(true).truthy());
    assert!(!DefaultValue::Bool(false).truthy());
    assert!(!DefaultValue::Number(0.0).truthy());
    assert!(!DefaultValue::Number(f64::NAN).truthy());
    assert!(DefaultValue::Number(2.0).truthy());
    assert!(!DefaultValue::Text(String::new()).truthy());
    assert!(DefaultValue::Text("false".into()).truthy());
}

// =============================================================
// FieldSchema serde
// =============================================================

#[test]
fn field_schema_reads_camel_case_json() {
    let field: FieldSchema = serde_json::from_value(json!({
        "id": "f1",
        "type": "text",
        "label": "Email",
        "name": "email",
        "required": true,
        "defaultValue": "a@b.com",
        "pattern": "^\\S+@\\S+$",
        "validation": { "minLength": 3, "maxLength": 64, "customMessage": "Bad email" }
    }))
    .unwrap();

    assert_eq!(field.field_type, "text");
    assert!(field.required);
    assert_eq!(field.display_default().as_deref(), Some("a@b.com"));
    assert_eq!(field.custom_message(), Some("Bad email"));
    let validation = field.validation.unwrap();
    assert_eq!(validation.min_length, Some(3));
    assert_eq!(validation.max_length, Some(64));
}

#[test]
fn field_schema_keeps_unknown_type_tag() {
    let field: FieldSchema = serde_json::from_value(json!({
        "id": "f1", "type": "unsupported-xyz", "label": "?", "name": "x"
    }))
    .unwrap();
    assert_eq!(field.field_type, "unsupported-xyz");
    assert!(field.kind().is_err());
}

#[test]
fn field_schema_omits_unset_attributes() {
    let field = FieldSchema::new("f1", FieldType::Text, "Name", "name");
    let value = serde_json::to_value(&field).unwrap();
    assert_eq!(value, json!({ "id": "f1", "type": "text", "label": "Name", "name": "name", "required": false }));
}

#[test]
fn option_list_is_empty_when_absent() {
    let field = FieldSchema::new("f1", FieldType::Select, "Pick", "pick");
    assert!(field.option_list().is_empty());
}

// =============================================================
// apply_partial
// =============================================================

#[test]
fn apply_partial_updates_only_present_fields() {
    let mut field = FieldSchema::new("f1", FieldType::Text, "Name", "name");
    field.placeholder = Some("Your name".into());

    let partial = PartialFieldSchema {
        default_value: Some(DefaultValue::Text("Ada".into())),
        required: Some(true),
        ..Default::default()
    };
    field.apply_partial(&partial);

    assert_eq!(field.default_value, Some(DefaultValue::Text("Ada".into())));
    assert!(field.required);
    assert_eq!(field.label, "Name");
    assert_eq!(field.placeholder.as_deref(), Some("Your name"));
}

#[test]
fn apply_partial_can_change_type_tag() {
    let mut field = FieldSchema::new("f1", FieldType::Text, "Name", "name");
    field.apply_partial(&PartialFieldSchema { field_type: Some("email".into()), ..Default::default() });
    assert_eq!(field.kind().unwrap(), FieldType::Email);
}

#[test]
fn partial_serializes_sparse() {
    let partial = PartialFieldSchema { label: Some("L".into()), ..Default::default() };
    assert_eq!(serde_json::to_value(&partial).unwrap(), json!({ "label": "L" }));
}

// =============================================================
// FormConfig
// =============================================================

#[test]
fn form_config_defaults_submit_text() {
    let mut config = FormConfig::new("Contact");
    assert_eq!(config.submit_text(), "Submit");
    config.submit_text = Some("Send".into());
    assert_eq!(config.submit_text(), "Send");
}

#[test]
fn form_config_touch_moves_updated_at_forward() {
    let mut config = FormConfig::new("Contact");
    let before = config.updated_at;
    config.touch();
    assert!(config.updated_at >= before);
    assert_eq!(config.created_at, before);
}

#[test]
fn form_config_round_trips_through_json() {
    let mut config = FormConfig::new("Contact");
    config.fields.push(FieldSchema::new("f1", FieldType::Email, "Email", "email"));
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"createdAt\""));
    let back: FormConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    assert!(back.field("f1").is_some());
    assert!(back.field("f2").is_none());
}
