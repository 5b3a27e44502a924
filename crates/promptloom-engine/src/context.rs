//! Render context — the named values a template is evaluated against.
//!
//! A [`Context`] carries three independent namespaces: free-form
//! `variables`, plus `conversation_data` and `user_data` side channels.
//! Plain `{name}` and dotted `{a.b.c}` references resolve against
//! `variables` only; the auxiliary namespaces ride along for callers and
//! custom template functions that want them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The set of named values a template is rendered against.
///
/// Built by the caller per render call and never retained by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Free-form bindings, resolvable from templates via dotted paths.
    #[serde(default)]
    variables: HashMap<String, Value>,

    /// Conversation-scoped data. Not reachable from `{name}` lookups.
    #[serde(default)]
    conversation_data: HashMap<String, Value>,

    /// User-scoped data. Not reachable from `{name}` lookups.
    #[serde(default)]
    user_data: HashMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context whose `variables` namespace is taken from a JSON
    /// object. Non-object values yield an empty context.
    pub fn from_json(value: serde_json::Value) -> Self {
        let mut ctx = Self::new();
        if let serde_json::Value::Object(map) = value {
            for (key, v) in map {
                ctx.variables.insert(key, Value::from(v));
            }
        }
        ctx
    }

    /// Builder-style variable binding.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Bind a variable in place.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Look up a top-level variable.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Resolve a dotted path against the `variables` namespace, traversing
    /// nested maps one segment at a time. `None` means the reference does
    /// not resolve and the renderer will preserve its placeholder.
    pub fn resolve_path(&self, path: &[String]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        self.variables.get(head).and_then(|v| v.get_path(rest))
    }

    pub fn set_conversation_data(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.conversation_data.insert(name.into(), value.into());
    }

    pub fn conversation_data(&self, name: &str) -> Option<&Value> {
        self.conversation_data.get(name)
    }

    pub fn set_user_data(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.user_data.insert(name.into(), value.into());
    }

    pub fn user_data(&self, name: &str) -> Option<&Value> {
        self.user_data.get(name)
    }

    /// Merge `overlay` on top of this context.
    ///
    /// Shallow, per-namespace override: keys present in `overlay` replace
    /// those in `self`, keys present only in `self` are preserved. Nested
    /// maps are replaced wholesale, never deep-merged.
    pub fn merge(&self, overlay: &Context) -> Context {
        fn overlaid(
            base: &HashMap<String, Value>,
            overlay: &HashMap<String, Value>,
        ) -> HashMap<String, Value> {
            let mut merged = base.clone();
            for (key, value) in overlay {
                merged.insert(key.clone(), value.clone());
            }
            merged
        }

        Context {
            variables: overlaid(&self.variables, &overlay.variables),
            conversation_data: overlaid(&self.conversation_data, &overlay.conversation_data),
            user_data: overlaid(&self.user_data, &overlay.user_data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(text: &str) -> Vec<String> {
        text.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_resolve_top_level() {
        let ctx = Context::new().with_variable("name", "Alice");
        assert_eq!(ctx.resolve_path(&path("name")), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_resolve_nested_path() {
        let ctx = Context::from_json(serde_json::json!({
            "user": {"name": "Charlie", "role": "admin"}
        }));
        assert_eq!(
            ctx.resolve_path(&path("user.role")),
            Some(&Value::from("admin"))
        );
    }

    #[test]
    fn test_resolve_missing_returns_none() {
        let ctx = Context::new().with_variable("name", "Bob");
        assert_eq!(ctx.resolve_path(&path("status")), None);
        assert_eq!(ctx.resolve_path(&path("name.inner")), None);
    }

    #[test]
    fn test_merge_overlay_wins_per_namespace() {
        let mut base = Context::new()
            .with_variable("kept", "base")
            .with_variable("replaced", "base");
        base.set_user_data("tone", "formal");

        let overlay = Context::new().with_variable("replaced", "overlay");

        let merged = base.merge(&overlay);
        assert_eq!(merged.variable("kept"), Some(&Value::from("base")));
        assert_eq!(merged.variable("replaced"), Some(&Value::from("overlay")));
        // Namespaces merge independently; overlay had no user_data.
        assert_eq!(merged.user_data("tone"), Some(&Value::from("formal")));
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = Context::from_json(serde_json::json!({"user": {"name": "A", "role": "admin"}}));
        let overlay = Context::from_json(serde_json::json!({"user": {"name": "B"}}));

        let merged = base.merge(&overlay);
        // The nested map is replaced wholesale, so "role" is gone.
        assert_eq!(merged.resolve_path(&path("user.name")), Some(&Value::from("B")));
        assert_eq!(merged.resolve_path(&path("user.role")), None);
    }

    #[test]
    fn test_aux_namespaces_not_reachable_from_variables() {
        let mut ctx = Context::new();
        ctx.set_conversation_data("topic", "rust");
        assert_eq!(ctx.resolve_path(&path("topic")), None);
        assert_eq!(ctx.conversation_data("topic"), Some(&Value::from("rust")));
    }
}
