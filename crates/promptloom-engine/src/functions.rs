//! Template function registry and built-in functions.
//!
//! Functions are invoked from templates as `{name(arg, ...)}`. The registry
//! maps names to boxed callables over resolved [`Value`]s; it is seeded with
//! the built-ins and extended by callers before rendering begins.
//!
//! Concurrency contract: registration is a setup-phase operation. Complete
//! all [`FunctionRegistry::register`] calls on one thread before sharing the
//! owning engine across threads; concurrent renders then read the registry
//! without synchronization.

use std::collections::HashMap;

use crate::value::Value;

/// A callable template function over resolved argument values.
///
/// Unresolved references passed as arguments arrive as [`Value::Absent`], so
/// absence-aware functions (`default`, `conditional`) can see them. Returning
/// an error makes the renderer preserve the original call-site text.
pub type TemplateFunction = Box<dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync>;

/// Errors signalled by template functions.
///
/// Never surfaced to render output directly — any error at a call site makes
/// the renderer emit the original `{name(...)}` placeholder verbatim.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("unknown function: {0}")]
    Unknown(String),

    #[error("{function}: missing argument `{name}`")]
    MissingArgument {
        function: &'static str,
        name: &'static str,
    },

    #[error("{function}: expected {expected} for `{name}`, got {actual}")]
    WrongType {
        function: &'static str,
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{function}: {message}")]
    Failed { function: String, message: String },
}

/// Registry of template functions.
pub struct FunctionRegistry {
    functions: HashMap<String, TemplateFunction>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Create a registry seeded with the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register a function. Re-registering a name replaces the previous
    /// entry; entries are never removed.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) {
        self.functions.insert(name.into(), Box::new(function));
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// List all registered function names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a function with already-resolved arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, FunctionError> {
        match self.functions.get(name) {
            Some(function) => function(args),
            None => Err(FunctionError::Unknown(name.to_string())),
        }
    }

    fn register_builtins(&mut self) {
        self.register("today", |_args| {
            Ok(Value::String(
                chrono::Local::now().format("%Y-%m-%d").to_string(),
            ))
        });
        self.register("now", |_args| {
            Ok(Value::String(
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ))
        });
        self.register("upper", |args| {
            let text = require_string("upper", "x", args, 0)?;
            Ok(Value::String(text.to_uppercase()))
        });
        self.register("lower", |args| {
            let text = require_string("lower", "x", args, 0)?;
            Ok(Value::String(text.to_lowercase()))
        });
        self.register("title", |args| {
            let text = require_string("title", "x", args, 0)?;
            Ok(Value::String(title_case(text)))
        });
        self.register("format_list", |args| {
            let items = match args.first() {
                Some(Value::List(items)) => items,
                None | Some(Value::Absent) => {
                    return Err(FunctionError::MissingArgument {
                        function: "format_list",
                        name: "items",
                    });
                }
                Some(other) => {
                    return Err(FunctionError::WrongType {
                        function: "format_list",
                        name: "items",
                        expected: "list",
                        actual: other.type_name(),
                    });
                }
            };
            // Unknown styles fall back to comma-joining.
            let style = args.get(1).and_then(Value::as_str).unwrap_or("");
            let formatted = match style {
                "bullet" => items
                    .iter()
                    .map(|item| format!("• {item}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
                _ => items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            Ok(Value::String(formatted))
        });
        self.register("conditional", |args| {
            let test = args.first().unwrap_or(&Value::Absent);
            let if_truthy = require_arg("conditional", "a", args, 1)?;
            let if_falsy = require_arg("conditional", "b", args, 2)?;
            Ok(if test.truthy() {
                if_truthy.clone()
            } else {
                if_falsy.clone()
            })
        });
        self.register("default", |args| {
            let fallback = require_arg("default", "fallback", args, 1)?;
            // Only absence triggers the fallback; present-but-falsy values
            // (empty string, 0, false) are returned as-is.
            match args.first() {
                None | Some(Value::Absent) => Ok(fallback.clone()),
                Some(value) => Ok(value.clone()),
            }
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_arg<'a>(
    function: &'static str,
    name: &'static str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a Value, FunctionError> {
    match args.get(index) {
        None | Some(Value::Absent) => Err(FunctionError::MissingArgument { function, name }),
        Some(value) => Ok(value),
    }
}

fn require_string<'a>(
    function: &'static str,
    name: &'static str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, FunctionError> {
    match args.get(index) {
        None | Some(Value::Absent) => Err(FunctionError::MissingArgument { function, name }),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(FunctionError::WrongType {
            function,
            name,
            expected: "string",
            actual: other.type_name(),
        }),
    }
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_transforms() {
        let registry = FunctionRegistry::with_builtins();
        let hello = [Value::from("hello world")];
        assert_eq!(
            registry.call("upper", &hello).unwrap(),
            Value::from("HELLO WORLD")
        );
        assert_eq!(
            registry.call("lower", &[Value::from("LOUD")]).unwrap(),
            Value::from("loud")
        );
        assert_eq!(
            registry.call("title", &hello).unwrap(),
            Value::from("Hello World")
        );
    }

    #[test]
    fn test_case_transform_rejects_non_string() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.call("upper", &[Value::from(3)]).is_err());
        assert!(registry.call("upper", &[Value::Absent]).is_err());
        assert!(registry.call("upper", &[]).is_err());
    }

    #[test]
    fn test_format_list_bullet() {
        let registry = FunctionRegistry::with_builtins();
        let items = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(
            registry
                .call("format_list", &[items.clone(), Value::from("bullet")])
                .unwrap(),
            Value::from("• a\n• b")
        );
        // Any other style comma-joins.
        assert_eq!(
            registry
                .call("format_list", &[items, Value::from("fancy")])
                .unwrap(),
            Value::from("a, b")
        );
    }

    #[test]
    fn test_conditional_picks_by_truthiness() {
        let registry = FunctionRegistry::with_builtins();
        let args = [Value::from(true), Value::from("yes"), Value::from("no")];
        assert_eq!(registry.call("conditional", &args).unwrap(), Value::from("yes"));

        let args = [Value::Absent, Value::from("yes"), Value::from("no")];
        assert_eq!(registry.call("conditional", &args).unwrap(), Value::from("no"));
    }

    #[test]
    fn test_default_triggers_on_absence_only() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            registry
                .call("default", &[Value::Absent, Value::from("fallback")])
                .unwrap(),
            Value::from("fallback")
        );
        // Present but falsy: kept as-is.
        assert_eq!(
            registry
                .call("default", &[Value::from(""), Value::from("fallback")])
                .unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::with_builtins();
        assert!(matches!(
            registry.call("nope", &[]),
            Err(FunctionError::Unknown(_))
        ));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = FunctionRegistry::with_builtins();
        registry.register("shout", |args| {
            let text = require_string("shout", "x", args, 0)?;
            Ok(Value::String(format!("{}!", text.to_uppercase())))
        });
        assert_eq!(
            registry.call("shout", &[Value::from("hi")]).unwrap(),
            Value::from("HI!")
        );
        assert!(registry.names().contains(&"shout".to_string()));
    }

    #[test]
    fn test_today_shape() {
        let registry = FunctionRegistry::with_builtins();
        let today = registry.call("today", &[]).unwrap();
        let text = today.as_str().unwrap();
        // YYYY-MM-DD
        assert_eq!(text.len(), 10);
        assert_eq!(text.as_bytes()[4], b'-');
    }
}
