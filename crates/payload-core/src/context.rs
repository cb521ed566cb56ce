//! Per-request variable context for template execution.

use std::collections::HashMap;

/// Flat mapping from variable name to string value.
///
/// A fresh context is built for every generated request and referenced from
/// templates as `{{ .name }}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    vars: HashMap<String, String>,
}

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl From<HashMap<String, String>> for RenderContext {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let ctx = RenderContext::new().with("host", "kupo").with("port", "1442");
        assert_eq!(ctx.get("host"), Some("kupo"));
        assert_eq!(ctx.get("port"), Some("1442"));
        assert_eq!(ctx.get("missing"), None);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut ctx = RenderContext::new();
        assert_eq!(ctx.insert("k", "a"), None);
        assert_eq!(ctx.insert("k", "b"), Some("a".to_string()));
        assert_eq!(ctx.get("k"), Some("b"));
    }

    #[test]
    fn test_from_iterator() {
        let ctx: RenderContext = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(ctx.get("b"), Some("2"));
        assert!(!ctx.is_empty());
    }
}
