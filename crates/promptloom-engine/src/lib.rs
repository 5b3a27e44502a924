#![deny(unsafe_code)]

//! PromptLoom template rendering engine.
//!
//! A small domain-specific templating language for assembling
//! conversational-AI prompts from structured data: variable interpolation
//! with dotted paths, function calls, `{if}`/`{endif}` conditionals, and
//! `{for}`/`{endfor}` loops over a caller-supplied [`Context`].
//!
//! The engine's defining contract is that **rendering never fails**: a
//! reference or call that cannot be resolved keeps its original `{...}`
//! source text in the output, so partial contexts still produce a usable
//! prompt and the gaps stay visible. Callers that want strict feedback run
//! [`validate_template`] first.
//!
//! ```
//! use promptloom_engine::{Context, TemplateEngine};
//!
//! let engine = TemplateEngine::new();
//! let ctx = Context::new().with_variable("name", "Alice");
//!
//! assert_eq!(engine.render("Hello {name}!", &ctx), "Hello Alice!");
//! // Missing variables stay visible instead of erroring:
//! assert_eq!(engine.render("Status: {status}", &ctx), "Status: {status}");
//! ```

/// Render context: variable, conversation, and user namespaces.
pub mod context;
/// Static extraction of referenced variable names.
pub mod extract;
/// Function registry and built-in template functions.
pub mod functions;
/// Span classification and node-tree construction.
pub mod parser;
/// Tree evaluation against a context.
pub mod render;
/// Literal/span tokenization.
pub mod scanner;
/// Stored template records and thinking-mode prefixes.
pub mod template;
/// Structural validation diagnostics.
pub mod validate;
/// The closed runtime value model.
pub mod value;

pub use context::Context;
pub use extract::extract_variables;
pub use functions::{FunctionError, FunctionRegistry, TemplateFunction};
pub use render::TemplateEngine;
pub use template::{PromptTemplate, ThinkingDepth, ThinkingStyle, ThinkingTemplate};
pub use validate::validate_template;
pub use value::Value;
