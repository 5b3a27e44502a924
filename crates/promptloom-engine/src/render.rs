//! Template evaluator — walks a parsed node tree against a [`Context`].
//!
//! The renderer owns the engine's primary robustness policy: rendering is a
//! total function. A reference that does not resolve, an unknown function,
//! or a function that fails all leave the original `{...}` source text in
//! the output verbatim, so a human reading the rendered prompt can see
//! exactly which placeholders did not resolve. Strict feedback lives in
//! [`validate_template`](crate::validate::validate_template) instead.

use tracing::{debug, trace};

use crate::context::Context;
use crate::functions::{FunctionError, FunctionRegistry};
use crate::parser::{self, Expr, Node};
use crate::template::{PromptTemplate, ThinkingTemplate};
use crate::value::Value;

/// Outcome of evaluating one expression.
///
/// The renderer emits whichever variant it receives: a resolved value is
/// formatted into the output, an unresolved expression keeps its source
/// text. Modelling this as a sum type keeps the fallback policy in one
/// place instead of scattering it across node types.
enum Eval {
    Resolved(Value),
    Unresolved(String),
}

/// The template rendering engine.
///
/// Owns the function registry. Create one, register any custom functions
/// during setup, then share it freely across threads — renders only read.
pub struct TemplateEngine {
    registry: FunctionRegistry,
}

impl TemplateEngine {
    /// Create an engine with the built-in functions registered.
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::with_builtins(),
        }
    }

    /// Create an engine around an existing registry.
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Register a custom template function.
    ///
    /// Call during single-threaded setup, before concurrent rendering
    /// begins.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    ) {
        self.registry.register(name, function);
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Render a template against a context.
    ///
    /// Total over every input string: the tree is parsed fresh per call and
    /// malformed input degrades to literal text rather than failing.
    pub fn render(&self, template: &str, ctx: &Context) -> String {
        let nodes = parser::parse(template);
        debug!(
            template_len = template.len(),
            nodes = nodes.len(),
            "rendering template"
        );
        let mut out = String::with_capacity(template.len());
        self.render_nodes(&nodes, ctx, &mut out);
        out
    }

    /// Render a stored [`PromptTemplate`]'s text.
    pub fn render_template(&self, template: &PromptTemplate, ctx: &Context) -> String {
        self.render(&template.template, ctx)
    }

    /// Compose a thinking-mode prompt: the opaque instruction prefix from
    /// `thinking`, followed by the rendered base template.
    pub fn render_thinking_prompt(
        &self,
        thinking: &ThinkingTemplate,
        base_template: &str,
        ctx: &Context,
    ) -> String {
        let mut out = thinking.to_thinking_prompt();
        out.push_str(&self.render(base_template, ctx));
        out
    }

    fn render_nodes(&self, nodes: &[Node], ctx: &Context, out: &mut String) {
        for node in nodes {
            self.render_node(node, ctx, out);
        }
    }

    fn render_node(&self, node: &Node, ctx: &Context, out: &mut String) {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Variable { path, raw } => match ctx.resolve_path(path) {
                Some(value) => out.push_str(&value.to_string()),
                None => {
                    trace!(placeholder = %raw, "unresolved variable reference");
                    out.push_str(raw);
                }
            },
            Node::Call { name, args, raw } => match self.eval_call(name, args, ctx) {
                Eval::Resolved(value) => out.push_str(&value.to_string()),
                Eval::Unresolved(_) => out.push_str(raw),
            },
            Node::If { test, body } => {
                let truthy = match self.eval_expr(test, ctx) {
                    Eval::Resolved(value) => value.truthy(),
                    Eval::Unresolved(raw) => {
                        // An unresolved test is falsy, not an error.
                        trace!(expr = %raw, "unresolved condition, skipping block");
                        false
                    }
                };
                if truthy {
                    self.render_nodes(body, ctx, out);
                }
            }
            Node::For {
                binding,
                source,
                body,
            } => {
                let items = match self.eval_expr(source, ctx) {
                    Eval::Resolved(Value::List(items)) => items,
                    // Absent or non-list sources render the block empty.
                    _ => return,
                };
                for item in items {
                    let child = ctx.clone().with_variable(binding.as_str(), item);
                    self.render_nodes(body, &child, out);
                }
            }
        }
    }

    fn eval_expr(&self, expr: &Expr, ctx: &Context) -> Eval {
        match expr {
            Expr::Path { segments, raw } => match ctx.resolve_path(segments) {
                Some(value) => Eval::Resolved(value.clone()),
                None => Eval::Unresolved(raw.clone()),
            },
            Expr::Str(s) => Eval::Resolved(Value::String(s.clone())),
            Expr::Num(n) => Eval::Resolved(Value::Number(*n)),
            Expr::Bool(b) => Eval::Resolved(Value::Bool(*b)),
        }
    }

    fn eval_call(&self, name: &str, args: &[Expr], ctx: &Context) -> Eval {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            match self.eval_expr(arg, ctx) {
                Eval::Resolved(value) => resolved.push(value),
                // Functions see unresolved arguments as Absent, so
                // absence-aware built-ins like default() can react.
                Eval::Unresolved(_) => resolved.push(Value::Absent),
            }
        }
        match self.registry.call(name, &resolved) {
            Ok(value) => Eval::Resolved(value),
            Err(err) => {
                trace!(function = name, error = %err, "template function call failed");
                Eval::Unresolved(name.to_string())
            }
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
