//! Named, pluggable sanitizers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::document::SettingValue;
use crate::sanitize::builtins;

/// Signature of a sanitizer: raw input → accepted value, or `None` for invalid.
pub type SanitizeFn = dyn Fn(&Value) -> Option<SettingValue> + Send + Sync;

/// A sanitizer function paired with the name schemas refer to it by.
#[derive(Clone)]
pub struct Sanitizer {
    name: Arc<str>,
    func: Arc<SanitizeFn>,
}

impl Sanitizer {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Option<SettingValue> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the sanitizer. `None` is the invalid marker.
    pub fn apply(&self, raw: &Value) -> Option<SettingValue> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sanitizer").field(&self.name).finish()
    }
}

/// Name → sanitizer lookup used when loading schema files.
#[derive(Debug, Clone, Default)]
pub struct SanitizerRegistry {
    sanitizers: HashMap<String, Sanitizer>,
}

impl SanitizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with every builtin sanitizer.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for sanitizer in [
            builtins::email(),
            builtins::text_field(),
            builtins::key(),
            builtins::absint(),
            builtins::boolean(),
        ] {
            registry.register(sanitizer);
        }
        registry
    }

    /// Register a sanitizer, replacing any previous one of the same name.
    pub fn register(&mut self, sanitizer: Sanitizer) -> Option<Sanitizer> {
        tracing::debug!(name = %sanitizer.name(), "Registering sanitizer");
        self.sanitizers.insert(sanitizer.name().to_string(), sanitizer)
    }

    pub fn get(&self, name: &str) -> Option<Sanitizer> {
        self.sanitizers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_registered() {
        let registry = SanitizerRegistry::with_builtins();
        assert_eq!(registry.len(), 5);
        for name in [
            "sanitize_email",
            "sanitize_text_field",
            "sanitize_key",
            "absint",
            "rest_sanitize_boolean",
        ] {
            assert!(registry.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_custom_sanitizer_overrides() {
        let mut registry = SanitizerRegistry::with_builtins();
        let shout = Sanitizer::new("sanitize_key", |raw: &Value| {
            raw.as_str().map(|s| SettingValue::String(s.to_uppercase()))
        });
        assert!(registry.register(shout).is_some());

        let s = registry.get("sanitize_key").unwrap();
        assert_eq!(s.apply(&json!("abc")), Some(SettingValue::from("ABC")));
        assert_eq!(s.apply(&json!(1)), None);
    }
}
