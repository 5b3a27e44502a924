//! Canned render contexts for tests.

use promptloom_engine::Context;

/// A context with no bindings in any namespace.
pub fn empty_context() -> Context {
    Context::new()
}

/// The standard fixture context used across engine and CLI tests.
///
/// Bindings:
/// - `name`: `"Alice"`, `age`: `25`
/// - `user`: a map with `name` / `role`
/// - `users`: a three-element list of maps with a `name` field
/// - `show_details`: `false`, `details`: `"Important info"`
/// - `topics`: a list of plain strings
pub fn sample_context() -> Context {
    Context::from_json(serde_json::json!({
        "name": "Alice",
        "age": 25,
        "user": {"name": "Charlie", "role": "admin"},
        "users": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Charlie"}],
        "show_details": false,
        "details": "Important info",
        "topics": ["parsing", "rendering", "validation"],
    }))
}
