//! JSON representation of schemas.
//!
//! Schema files use the same shape the REST API publishes:
//!
//! ```text
//! {"type": "object", "properties": {
//!     "general": {"type": "object", "properties": {
//!         "email_id": {"type": "string", "default": "", "sanitize_callback": "sanitize_email"}
//!     }}
//! }}
//! ```

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::sanitize::SanitizerRegistry;
use crate::schema::model::{SchemaError, SchemaModel};
use crate::schema::node::{LeafNode, ObjectNode, SchemaNode};

impl SchemaModel {
    /// Parse a schema document, resolving sanitizer names through `registry`.
    pub fn from_json(value: &Value, registry: &SanitizerRegistry) -> Result<ObjectNode, SchemaError> {
        match parse_node("", value, registry)? {
            SchemaNode::Object(root) => Ok(root),
            other => Err(SchemaError::Malformed {
                path: String::new(),
                reason: format!("root must be an object, found {}", other.type_name()),
            }),
        }
    }

    /// Read and parse a schema file.
    pub fn load_file(path: &Path, registry: &SanitizerRegistry) -> Result<ObjectNode, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_json(&value, registry)
    }

    /// The schema in its published JSON shape.
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .sections()
            .map(|(name, section)| (name.to_string(), object_to_json(section)))
            .collect();
        json!({ "type": "object", "properties": properties })
    }
}

fn parse_node(path: &str, value: &Value, registry: &SanitizerRegistry) -> Result<SchemaNode, SchemaError> {
    let malformed = |reason: &str| SchemaError::Malformed {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let obj = value.as_object().ok_or_else(|| malformed("node must be a JSON object"))?;
    let type_name = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing \"type\""))?;
    let description = obj.get("description").and_then(Value::as_str).map(str::to_string);
    let default = obj.get("default").filter(|v| !v.is_null());

    let sanitizer = match obj.get("sanitize_callback").and_then(Value::as_str) {
        Some(name) => Some(registry.get(name).ok_or_else(|| SchemaError::UnknownSanitizer {
            path: path.to_string(),
            name: name.to_string(),
        })?),
        None => None,
    };

    let mismatch = |expected: &'static str| SchemaError::DefaultMismatch {
        path: path.to_string(),
        expected,
    };

    let node = match type_name {
        "object" => {
            if sanitizer.is_some() {
                return Err(malformed("object nodes cannot declare a sanitizer"));
            }
            let mut node = ObjectNode::new();
            node.description = description;
            if let Some(props) = obj.get("properties") {
                let props = props
                    .as_object()
                    .ok_or_else(|| malformed("\"properties\" must be an object"))?;
                for (name, child) in props {
                    let child_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", path, name)
                    };
                    node.insert(name.clone(), parse_node(&child_path, child, registry)?);
                }
            }
            return Ok(SchemaNode::Object(node));
        }
        "string" => {
            let default = match default {
                Some(v) => v.as_str().ok_or_else(|| mismatch("string"))?.to_string(),
                None => String::new(),
            };
            SchemaNode::String(leaf(default, description, sanitizer))
        }
        "integer" => {
            let default = match default {
                Some(v) => v.as_u64().ok_or_else(|| mismatch("integer"))?,
                None => 0,
            };
            SchemaNode::Integer(leaf(default, description, sanitizer))
        }
        "boolean" => {
            let default = match default {
                Some(v) => v.as_bool().ok_or_else(|| mismatch("boolean"))?,
                None => false,
            };
            SchemaNode::Boolean(leaf(default, description, sanitizer))
        }
        other => {
            return Err(SchemaError::UnknownType {
                path: path.to_string(),
                type_name: other.to_string(),
            })
        }
    };

    Ok(node)
}

fn leaf<T>(default: T, description: Option<String>, sanitizer: Option<crate::sanitize::Sanitizer>) -> LeafNode<T> {
    LeafNode {
        default,
        description,
        sanitizer,
    }
}

fn object_to_json(node: &ObjectNode) -> Value {
    let properties: Map<String, Value> = node
        .iter()
        .map(|(name, child)| (name.to_string(), node_to_json(child)))
        .collect();
    let mut out = json!({ "type": "object", "properties": properties });
    if let Some(description) = &node.description {
        out["description"] = json!(description);
    }
    out
}

fn node_to_json(node: &SchemaNode) -> Value {
    if let SchemaNode::Object(obj) = node {
        return object_to_json(obj);
    }

    let mut out = json!({
        "type": node.type_name(),
        "default": serde_json::to_value(node.default_value()).unwrap_or(Value::Null),
    });
    if let Some(description) = node.description() {
        out["description"] = json!(description);
    }
    if let Some(sanitizer) = node.sanitizer() {
        out["sanitize_callback"] = json!(sanitizer.name());
    }
    out
}
