//! The frozen schema and its builder.

use thiserror::Error;

use crate::document::{ConfigDocument, SettingValue};
use crate::schema::node::{ObjectNode, SchemaNode};

/// Errors raised while building a schema. Never raised after startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("section '{0}' must be an object")]
    SectionNotObject(String),

    #[error("unknown type '{type_name}' at '{path}'")]
    UnknownType { path: String, type_name: String },

    #[error("unknown sanitizer '{name}' at '{path}'")]
    UnknownSanitizer { path: String, name: String },

    #[error("default at '{path}' must be of type {expected}")]
    DefaultMismatch { path: String, expected: &'static str },

    #[error("malformed schema at '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse schema file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One-time extension callback applied before the schema is frozen.
///
/// Hooks receive the schema built so far and return the (possibly extended
/// or overridden) schema.
pub type SchemaHook = Box<dyn FnOnce(ObjectNode) -> ObjectNode + Send>;

/// Collects a base schema and extension hooks, then freezes them.
pub struct SchemaBuilder {
    base: ObjectNode,
    hooks: Vec<SchemaHook>,
}

impl SchemaBuilder {
    pub fn new(base: ObjectNode) -> Self {
        Self {
            base,
            hooks: Vec::new(),
        }
    }

    /// Register an extension hook. Hooks run in registration order.
    pub fn extend<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(ObjectNode) -> ObjectNode + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<SchemaModel, SchemaError> {
        SchemaModel::build(self.base, self.hooks)
    }
}

/// A field visited by [`SchemaModel::walk_fields`].
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub section: &'a str,
    pub field: &'a str,
    pub node: &'a SchemaNode,
}

/// The immutable, process-wide settings schema.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    sections: Vec<(String, ObjectNode)>,
}

impl SchemaModel {
    pub fn builder(base: ObjectNode) -> SchemaBuilder {
        SchemaBuilder::new(base)
    }

    /// Apply every hook to `base` once and freeze the result.
    ///
    /// Every top-level property must be an object node (a section).
    pub fn build(
        base: ObjectNode,
        hooks: impl IntoIterator<Item = SchemaHook>,
    ) -> Result<Self, SchemaError> {
        let root = hooks.into_iter().fold(base, |schema, hook| hook(schema));

        let mut sections = Vec::with_capacity(root.len());
        for (name, node) in root.iter() {
            match node {
                SchemaNode::Object(section) => sections.push((name.to_string(), section.clone())),
                _ => return Err(SchemaError::SectionNotObject(name.to_string())),
            }
        }

        tracing::debug!(
            sections = sections.len(),
            fields = sections.iter().map(|(_, s)| s.len()).sum::<usize>(),
            "Settings schema frozen"
        );

        Ok(Self { sections })
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &ObjectNode)> {
        self.sections.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Lazily visit every field of every section. Call again to restart.
    pub fn walk_fields(&self) -> impl Iterator<Item = FieldRef<'_>> + '_ {
        self.sections.iter().flat_map(|(section, node)| {
            node.iter().map(move |(field, node)| FieldRef {
                section: section.as_str(),
                field,
                node,
            })
        })
    }

    pub fn section(&self, name: &str) -> Option<&ObjectNode> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn field(&self, section: &str, field: &str) -> Option<&SchemaNode> {
        self.section(section).and_then(|s| s.get(field))
    }

    /// The all-defaults document.
    pub fn defaults(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for f in self.walk_fields() {
            doc.set(f.section, f.field, f.node.default_value());
        }
        doc
    }

    /// Whether `doc` holds exactly the declared fields, each of its declared type.
    pub fn is_complete(&self, doc: &ConfigDocument) -> bool {
        let all_typed = self.walk_fields().all(|f| {
            doc.get(f.section, f.field)
                .is_some_and(|v: &SettingValue| f.node.accepts(v))
        });
        all_typed && doc.field_count() == self.walk_fields().count()
    }
}
