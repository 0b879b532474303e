//! Schema-driven validation of candidate documents.
//!
//! Per field, in schema order:
//! 1. absent (or null) → the field default
//! 2. declared sanitizer and non-empty input → sanitizer output, or on
//!    rejection an error plus the current value (when non-empty) or default
//! 3. otherwise the builtin sanitizer for the declared type
//!
//! Undeclared candidate fields are dropped. Validation never fails; every
//! anomaly becomes a [`ValidationError`] and a safe value.

use serde_json::Value;

use crate::document::{ConfigDocument, SettingValue};
use crate::sanitize::builtins;
use crate::sanitize::error::ValidationError;
use crate::schema::{FieldRef, SchemaModel, SchemaNode};

/// A validated document and the advisory errors produced on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub document: ConfigDocument,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `candidate` against `schema`, falling back to `current` for
/// rejected values. Pure: no I/O, no authorization.
pub fn validate(candidate: &Value, current: &ConfigDocument, schema: &SchemaModel) -> ValidationOutcome {
    let mut document = ConfigDocument::new();
    let mut errors = Vec::new();

    for field in schema.walk_fields() {
        let raw = candidate
            .get(field.section)
            .and_then(|section| section.get(field.field))
            .filter(|v| !v.is_null());

        let value = match raw {
            None => field.node.default_value(),
            Some(raw) => sanitize_field(field, raw, current, &mut errors),
        };
        document.set(field.section, field.field, value);
    }

    ValidationOutcome { document, errors }
}

fn sanitize_field(
    field: FieldRef<'_>,
    raw: &Value,
    current: &ConfigDocument,
    errors: &mut Vec<ValidationError>,
) -> SettingValue {
    if let Some(sanitizer) = field.node.sanitizer() {
        if !builtins::is_empty_raw(raw) {
            // Output of the wrong type counts as a rejection.
            return match sanitizer.apply(raw).filter(|v| field.node.accepts(v)) {
                Some(value) => value,
                None => reject(field, current, errors),
            };
        }
    }

    match field.node {
        SchemaNode::String(_) => match builtins::sanitize_text_field(raw) {
            Some(value) => value,
            None => reject(field, current, errors),
        },
        SchemaNode::Boolean(_) => SettingValue::Boolean(builtins::to_bool(raw)),
        SchemaNode::Integer(_) => SettingValue::Integer(builtins::to_absint(raw)),
        SchemaNode::Object(_) => {
            let default = field.node.default_value();
            // Nested objects are not editable; echoing the default back is not an error.
            if serde_json::from_value::<SettingValue>(raw.clone()).ok().as_ref() != Some(&default) {
                errors.push(ValidationError::invalid_value(field.section, field.field));
            }
            default
        }
    }
}

fn reject(field: FieldRef<'_>, current: &ConfigDocument, errors: &mut Vec<ValidationError>) -> SettingValue {
    errors.push(ValidationError::invalid_value(field.section, field.field));
    match current.get(field.section, field.field) {
        Some(value) if !value.is_empty() && field.node.accepts(value) => value.clone(),
        _ => field.node.default_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::Sanitizer;
    use crate::schema::builtin::plugin_schema;
    use crate::schema::ObjectNode;
    use serde_json::json;

    fn schema() -> SchemaModel {
        SchemaModel::build(plugin_schema(), Vec::new()).unwrap()
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let schema = schema();
        let out = validate(&json!({"general": {}}), &schema.defaults(), &schema);

        assert!(out.is_clean());
        assert_eq!(out.document.get("general", "site_name"), Some(&SettingValue::from("")));
        assert_eq!(out.document.get("general", "enable_feature"), Some(&SettingValue::Boolean(false)));
        assert_eq!(out.document.get("advanced", "cache_duration"), Some(&SettingValue::Integer(60)));
        assert!(schema.is_complete(&out.document));
    }

    #[test]
    fn test_rejected_email_falls_back_to_current() {
        let schema = schema();
        let mut current = schema.defaults();
        current.set("general", "email_id", "a@b.com");

        let out = validate(&json!({"general": {"email_id": "not-an-email"}}), &current, &schema);

        assert_eq!(out.document.get("general", "email_id"), Some(&SettingValue::from("a@b.com")));
        assert_eq!(out.errors, vec![ValidationError::invalid_value("general", "email_id")]);
        assert_eq!(out.errors[0].message, "Invalid value for email_id in section general.");
    }

    #[test]
    fn test_rejected_email_without_current_uses_default() {
        let schema = schema();
        let out = validate(&json!({"general": {"email_id": "nope"}}), &schema.defaults(), &schema);
        assert_eq!(out.document.get("general", "email_id"), Some(&SettingValue::from("")));
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn test_empty_email_bypasses_sanitizer() {
        let schema = schema();
        let out = validate(&json!({"general": {"email_id": ""}}), &schema.defaults(), &schema);
        assert!(out.is_clean());
        assert_eq!(out.document.get("general", "email_id"), Some(&SettingValue::from("")));
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let schema = schema();
        let out = validate(
            &json!({"general": {"mystery_field": 1}, "bogus": {"x": true}}),
            &schema.defaults(),
            &schema,
        );
        assert!(out.document.get("general", "mystery_field").is_none());
        assert!(out.document.section("bogus").is_none());
        assert!(schema.is_complete(&out.document));
    }

    #[test]
    fn test_integer_coercion() {
        let schema = schema();
        let current = schema.defaults();

        let out = validate(&json!({"advanced": {"cache_duration": "-5"}}), &current, &schema);
        assert_eq!(out.document.get("advanced", "cache_duration"), Some(&SettingValue::Integer(0)));

        let out = validate(&json!({"advanced": {"cache_duration": "45"}}), &current, &schema);
        assert_eq!(out.document.get("advanced", "cache_duration"), Some(&SettingValue::Integer(45)));
    }

    #[test]
    fn test_type_coercion_of_scalars() {
        let schema = schema();
        let out = validate(
            &json!({"general": {"site_name": "<b>Acme</b>  Inc", "enable_feature": "on"}}),
            &schema.defaults(),
            &schema,
        );
        assert_eq!(out.document.get("general", "site_name"), Some(&SettingValue::from("Acme Inc")));
        assert_eq!(out.document.get("general", "enable_feature"), Some(&SettingValue::Boolean(true)));
    }

    #[test]
    fn test_container_for_string_field_is_rejected() {
        let schema = schema();
        let mut current = schema.defaults();
        current.set("general", "site_name", "Acme");

        let out = validate(&json!({"general": {"site_name": ["a", "b"]}}), &current, &schema);
        assert_eq!(out.document.get("general", "site_name"), Some(&SettingValue::from("Acme")));
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn test_malformed_shapes_default_everything() {
        let schema = schema();
        for candidate in [json!(null), json!(42), json!("x"), json!({"general": 5})] {
            let out = validate(&candidate, &schema.defaults(), &schema);
            assert_eq!(out.document, schema.defaults());
            assert!(out.is_clean());
        }
    }

    #[test]
    fn test_nested_object_field_is_invalid() {
        let root = ObjectNode::new().property(
            "general",
            ObjectNode::new().property(
                "nested",
                ObjectNode::new().property("depth", SchemaNode::integer(2)),
            ),
        );
        let schema = SchemaModel::build(root, Vec::new()).unwrap();

        let out = validate(&json!({"general": {"nested": {"depth": 9}}}), &schema.defaults(), &schema);
        assert_eq!(out.errors, vec![ValidationError::invalid_value("general", "nested")]);
        assert_eq!(out.document, schema.defaults());
    }

    #[test]
    fn test_nested_object_default_round_trips_cleanly() {
        let root = ObjectNode::new().property(
            "general",
            ObjectNode::new().property(
                "nested",
                ObjectNode::new().property("depth", SchemaNode::integer(2)),
            ),
        );
        let schema = SchemaModel::build(root, Vec::new()).unwrap();

        // A client that GETs the document and POSTs it back unchanged.
        let echoed = serde_json::to_value(schema.defaults()).unwrap();
        let out = validate(&echoed, &schema.defaults(), &schema);
        assert!(out.is_clean());
        assert_eq!(out.document, schema.defaults());
    }

    #[test]
    fn test_sanitizer_with_wrong_output_type_rejected() {
        let root = ObjectNode::new().property(
            "general",
            ObjectNode::new().property(
                "name",
                SchemaNode::string("anon")
                    .sanitizer(Sanitizer::new("broken", |_: &Value| Some(SettingValue::Integer(1)))),
            ),
        );
        let schema = SchemaModel::build(root, Vec::new()).unwrap();

        let out = validate(&json!({"general": {"name": "bob"}}), &schema.defaults(), &schema);
        assert_eq!(out.document.get("general", "name"), Some(&SettingValue::from("anon")));
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let schema = schema();
        let mut current = schema.defaults();
        current.set("general", "email_id", "a@b.com");

        let candidates = [
            json!({"general": {"site_name": " <i>x</i>  y ", "email_id": "bad", "enable_feature": "0"}}),
            json!({"advanced": {"cache_duration": -12.5, "api_key": "%41key"}, "extra": 1}),
            json!({"general": {"email_id": "  ok@example.com"}, "advanced": {"cache_duration": "7days"}}),
            json!([1, 2, 3]),
            json!({"general": {"email_id": "a@b.c."}}),
            json!({"general": {"email_id": "a((@b.c"}}),
            json!({"general": {"email_id": "jo(h)n@ex-(.co-m."}}),
        ];

        for candidate in candidates {
            let once = validate(&candidate, &current, &schema);
            let twice = validate(&once.document.to_json(), &current, &schema);
            assert_eq!(twice.document, once.document, "candidate {}", candidate);
            assert!(twice.is_clean());
        }
    }
}
