//! Layer 1: JSON Schema check for registry documents
//!
//! The YAML document is converted to a JSON value and checked before serde
//! sees it, so every structural problem is reported at once with its path.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::errors::{ValidationError, ValidationLayer};

static REGISTRY_SCHEMA_JSON: Lazy<Value> = Lazy::new(|| {
    let entry = |extra: Value| {
        let mut required = vec![json!("id"), json!("label"), json!("icon")];
        let mut properties = json!({
            "id": { "type": "string" },
            "label": { "type": "string" },
            "icon": { "type": "string" },
        });
        if let (Some(props), Some(extra_props)) = (
            properties.as_object_mut(),
            extra.get("properties").and_then(Value::as_object),
        ) {
            for (key, schema) in extra_props {
                props.insert(key.clone(), schema.clone());
            }
        }
        if let Some(extra_required) = extra.get("required").and_then(Value::as_array) {
            required.extend(extra_required.iter().cloned());
        }
        json!({
            "type": "object",
            "required": required,
            "properties": properties,
        })
    };

    json!({
        "type": "object",
        "required": ["schema"],
        "properties": {
            "schema": { "type": "string" },
            "name": { "type": "string" },
            "default_tab": { "type": "string" },
            "tabs": {
                "type": "array",
                "items": entry(json!({
                    "properties": { "accessibility_id": { "type": "string" } }
                })),
            },
            "details": {
                "type": "array",
                "items": entry(json!({
                    "properties": { "parent": { "type": "string" } },
                    "required": ["parent"],
                })),
            },
            "onboarding": {
                "type": "array",
                "items": entry(json!({
                    "properties": {
                        "page": { "type": "integer" },
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                    },
                    "required": ["page"],
                })),
            },
            "utility": {
                "type": "array",
                "items": entry(json!({})),
            },
        },
    })
});

/// The embedded registry schema (also printed by `tabstack schema`)
pub fn registry_schema() -> &'static Value {
    &REGISTRY_SCHEMA_JSON
}

/// Check a registry document against the embedded schema
pub fn check(document: &Value) -> Vec<ValidationError> {
    let validator = match jsonschema::validator_for(registry_schema()) {
        Ok(v) => v,
        Err(e) => {
            return vec![ValidationError::SchemaViolation {
                layer: ValidationLayer::Schema,
                path: String::from("/"),
                message: format!("embedded schema failed to compile: {e}"),
            }]
        }
    };

    validator
        .iter_errors(document)
        .map(|e| {
            let path = e.instance_path.to_string();
            ValidationError::SchemaViolation {
                layer: ValidationLayer::Schema,
                path: if path.is_empty() { String::from("/") } else { path },
                message: e.to_string(),
            }
        })
        .collect()
}
