//! Schema node definitions.

use std::collections::BTreeMap;

use crate::document::SettingValue;
use crate::sanitize::Sanitizer;

/// A typed leaf field: its default, description and optional sanitizer.
#[derive(Debug, Clone)]
pub struct LeafNode<T> {
    pub default: T,
    pub description: Option<String>,
    pub sanitizer: Option<Sanitizer>,
}

impl<T> LeafNode<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            description: None,
            sanitizer: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

/// A node of the settings schema.
///
/// The set of node kinds is closed: code that dispatches on a node matches
/// exhaustively, so a new kind cannot be added without visiting every site.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Object(ObjectNode),
    String(LeafNode<String>),
    Integer(LeafNode<u64>),
    Boolean(LeafNode<bool>),
}

impl SchemaNode {
    /// A string field with the given default.
    pub fn string(default: impl Into<String>) -> LeafNode<String> {
        LeafNode::new(default.into())
    }

    /// An integer field with the given default.
    pub fn integer(default: u64) -> LeafNode<u64> {
        LeafNode::new(default)
    }

    /// A boolean field with the given default.
    pub fn boolean(default: bool) -> LeafNode<bool> {
        LeafNode::new(default)
    }

    /// The declared type, as spelled in schema files.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Object(_) => "object",
            SchemaNode::String(_) => "string",
            SchemaNode::Integer(_) => "integer",
            SchemaNode::Boolean(_) => "boolean",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Object(node) => node.description.as_deref(),
            SchemaNode::String(leaf) => leaf.description.as_deref(),
            SchemaNode::Integer(leaf) => leaf.description.as_deref(),
            SchemaNode::Boolean(leaf) => leaf.description.as_deref(),
        }
    }

    pub fn sanitizer(&self) -> Option<&Sanitizer> {
        match self {
            SchemaNode::Object(_) => None,
            SchemaNode::String(leaf) => leaf.sanitizer.as_ref(),
            SchemaNode::Integer(leaf) => leaf.sanitizer.as_ref(),
            SchemaNode::Boolean(leaf) => leaf.sanitizer.as_ref(),
        }
    }

    /// The typed default. Objects default to the defaults of their properties.
    pub fn default_value(&self) -> SettingValue {
        match self {
            SchemaNode::Object(node) => SettingValue::Object(
                node.iter()
                    .map(|(name, child)| (name.to_string(), child.default_value()))
                    .collect::<BTreeMap<_, _>>(),
            ),
            SchemaNode::String(leaf) => SettingValue::String(leaf.default.clone()),
            SchemaNode::Integer(leaf) => SettingValue::Integer(leaf.default),
            SchemaNode::Boolean(leaf) => SettingValue::Boolean(leaf.default),
        }
    }

    /// Whether `value` has this node's declared type.
    pub fn accepts(&self, value: &SettingValue) -> bool {
        matches!(
            (self, value),
            (SchemaNode::Object(_), SettingValue::Object(_))
                | (SchemaNode::String(_), SettingValue::String(_))
                | (SchemaNode::Integer(_), SettingValue::Integer(_))
                | (SchemaNode::Boolean(_), SettingValue::Boolean(_))
        )
    }
}

impl From<LeafNode<String>> for SchemaNode {
    fn from(leaf: LeafNode<String>) -> Self {
        SchemaNode::String(leaf)
    }
}

impl From<LeafNode<u64>> for SchemaNode {
    fn from(leaf: LeafNode<u64>) -> Self {
        SchemaNode::Integer(leaf)
    }
}

impl From<LeafNode<bool>> for SchemaNode {
    fn from(leaf: LeafNode<bool>) -> Self {
        SchemaNode::Boolean(leaf)
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(node: ObjectNode) -> Self {
        SchemaNode::Object(node)
    }
}

/// An object node: named properties in insertion (display) order.
#[derive(Debug, Clone, Default)]
pub struct ObjectNode {
    pub description: Option<String>,
    properties: Vec<(String, SchemaNode)>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder form of [`ObjectNode::insert`].
    pub fn property(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.insert(name, node);
        self
    }

    /// Insert or replace a property. A replaced property keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Option<SchemaNode> {
        let name = name.into();
        let node = node.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, node)),
            None => {
                self.properties.push((name, node));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SchemaNode> {
        let idx = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SchemaNode> {
        self.properties
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.properties.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut node = ObjectNode::new()
            .property("a", SchemaNode::string(""))
            .property("b", SchemaNode::integer(1))
            .property("c", SchemaNode::boolean(false));

        let old = node.insert("b", SchemaNode::boolean(true));
        assert!(matches!(old, Some(SchemaNode::Integer(_))));

        let names: Vec<_> = node.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(node.get("b").map(SchemaNode::type_name), Some("boolean"));
    }

    #[test]
    fn test_object_default_collects_children() {
        let node: SchemaNode = ObjectNode::new()
            .property("port", SchemaNode::integer(8080))
            .property("host", SchemaNode::string("localhost"))
            .into();

        match node.default_value() {
            SettingValue::Object(map) => {
                assert_eq!(map.get("port"), Some(&SettingValue::Integer(8080)));
                assert_eq!(map.get("host"), Some(&SettingValue::from("localhost")));
            }
            other => panic!("expected object default, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_matches_declared_type() {
        let node: SchemaNode = SchemaNode::integer(0).into();
        assert!(node.accepts(&SettingValue::Integer(3)));
        assert!(!node.accepts(&SettingValue::from("3")));
    }
}
