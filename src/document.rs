//! Configuration documents.
//!
//! A [`ConfigDocument`] maps section name → field name → [`SettingValue`].
//! Documents handed out by the service are always schema-complete: every
//! declared field is present with a value of its declared type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    // Bool before Integer so `true` never reads back as a number.
    Boolean(bool),
    Integer(u64),
    String(String),
    Object(BTreeMap<String, SettingValue>),
}

impl SettingValue {
    /// Emptiness in the "falsy" sense: `""`, `"0"`, `0`, `false` and empty objects.
    pub fn is_empty(&self) -> bool {
        match self {
            SettingValue::Boolean(b) => !b,
            SettingValue::Integer(n) => *n == 0,
            SettingValue::String(s) => s.is_empty() || s == "0",
            SettingValue::Object(map) => map.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::String(_) => "string",
            SettingValue::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            SettingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<u64> for SettingValue {
    fn from(value: u64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

/// Fields of one section, keyed by field name.
pub type SectionValues = BTreeMap<String, SettingValue>;

/// The persisted settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: BTreeMap<String, SectionValues>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single field.
    pub fn get(&self, section: &str, field: &str) -> Option<&SettingValue> {
        self.sections.get(section).and_then(|s| s.get(field))
    }

    /// Set a single field, creating the section when needed.
    pub fn set(&mut self, section: &str, field: &str, value: impl Into<SettingValue>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    pub fn section(&self, section: &str) -> Option<&SectionValues> {
        self.sections.get(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &SectionValues)> {
        self.sections.iter()
    }

    /// Total number of fields across all sections.
    pub fn field_count(&self) -> usize {
        self.sections.values().map(|s| s.len()).sum()
    }

    /// Untyped JSON view, e.g. to feed the document back into validation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
