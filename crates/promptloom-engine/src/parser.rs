//! Template parser — turns scanned segments into a node tree.
//!
//! Grammar inside a `{...}` span, after trimming:
//!
//! ```text
//! if <expr>            open a conditional block, closed by {endif}
//! for <ident> in <expr>  open a loop block, closed by {endfor}
//! name(arg, ...)       function call; args are paths, quoted strings,
//!                      numbers, or booleans
//! a.b.c                dotted variable reference
//! ```
//!
//! Block tags pair up via a stack. The parse path never fails: a dangling
//! `if`/`for` consumes the rest of the template as its body, a stray
//! `endif`/`endfor` degrades to literal text, and a span interior matching
//! none of the shapes above is kept verbatim as a literal. Strict
//! structural feedback is the validator's job, not the parser's.

use crate::scanner::{self, Segment};

/// An argument or test expression inside a span.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A dotted variable reference (`user.name`). `raw` is the source text.
    Path { segments: Vec<String>, raw: String },
    /// A quoted string literal.
    Str(String),
    /// A numeric literal.
    Num(f64),
    /// A boolean literal.
    Bool(bool),
}

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, emitted unchanged.
    Literal(String),
    /// A variable reference; `raw` is the full `{...}` source for
    /// placeholder preservation.
    Variable { path: Vec<String>, raw: String },
    /// A function call; `raw` as above.
    Call {
        name: String,
        args: Vec<Expr>,
        raw: String,
    },
    /// An `{if expr}...{endif}` block.
    If { test: Expr, body: Vec<Node> },
    /// A `{for name in expr}...{endfor}` block.
    For {
        binding: String,
        source: Expr,
        body: Vec<Node>,
    },
}

/// Block tag kinds, shared with the validator's structural pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockTag {
    OpenIf,
    OpenFor,
    CloseIf,
    CloseFor,
}

/// Classify a span interior as a block tag, looking only at the leading
/// keyword. Expressions are not parsed here — the validator relies on that.
pub(crate) fn block_tag(inner: &str) -> Option<BlockTag> {
    let trimmed = inner.trim();
    if trimmed == "endif" {
        return Some(BlockTag::CloseIf);
    }
    if trimmed == "endfor" {
        return Some(BlockTag::CloseFor);
    }
    if keyword_prefix(trimmed, "if").is_some() {
        return Some(BlockTag::OpenIf);
    }
    if keyword_prefix(trimmed, "for").is_some() {
        return Some(BlockTag::OpenFor);
    }
    None
}

/// Strip a leading keyword followed by whitespace, returning the rest.
fn keyword_prefix<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parse a template into its node tree.
pub fn parse(template: &str) -> Vec<Node> {
    parse_segments(scanner::scan(template).segments)
}

enum SpanKind {
    If(Expr),
    EndIf,
    For { binding: String, source: Expr },
    EndFor,
    Variable(Vec<String>),
    Call { name: String, args: Vec<Expr> },
    /// Interior matched no known shape; kept as literal text.
    Opaque,
}

fn classify(inner: &str) -> SpanKind {
    let trimmed = inner.trim();
    match block_tag(trimmed) {
        Some(BlockTag::CloseIf) => return SpanKind::EndIf,
        Some(BlockTag::CloseFor) => return SpanKind::EndFor,
        Some(BlockTag::OpenIf) => {
            let rest = keyword_prefix(trimmed, "if").unwrap_or("");
            return match parse_expr(rest) {
                Some(test) => SpanKind::If(test),
                None => SpanKind::Opaque,
            };
        }
        Some(BlockTag::OpenFor) => {
            let rest = keyword_prefix(trimmed, "for").unwrap_or("");
            return match parse_for_tag(rest) {
                Some((binding, source)) => SpanKind::For { binding, source },
                None => SpanKind::Opaque,
            };
        }
        None => {}
    }

    if trimmed.contains('(') {
        return match parse_call(trimmed) {
            Some((name, args)) => SpanKind::Call { name, args },
            None => SpanKind::Opaque,
        };
    }

    if is_path(trimmed) {
        return SpanKind::Variable(trimmed.split('.').map(str::to_string).collect());
    }

    SpanKind::Opaque
}

/// Parse `<ident> in <expr>` from a `for` tag.
fn parse_for_tag(rest: &str) -> Option<(String, Expr)> {
    let (binding, rest) = rest.split_once(char::is_whitespace)?;
    if !is_identifier(binding) {
        return None;
    }
    let rest = keyword_prefix(rest.trim_start(), "in")?;
    let source = parse_expr(rest)?;
    Some((binding.to_string(), source))
}

/// Parse `name(arg, ...)`.
fn parse_call(trimmed: &str) -> Option<(String, Vec<Expr>)> {
    let open = trimmed.find('(')?;
    if !trimmed.ends_with(')') {
        return None;
    }
    let name = trimmed[..open].trim();
    if !is_identifier(name) {
        return None;
    }
    let args_text = &trimmed[open + 1..trimmed.len() - 1];
    let mut args = Vec::new();
    for part in split_args(args_text) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        args.push(parse_expr(part)?);
    }
    Some((name.to_string(), args))
}

/// Split an argument list on commas, respecting quoted strings.
fn split_args(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in text.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => parts.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            },
        }
    }
    if !text.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Parse a single expression: quoted string, boolean, number, or path.
fn parse_expr(text: &str) -> Option<Expr> {
    let text = text.trim();
    if text.len() >= 2 {
        for quote in ['"', '\''] {
            if text.starts_with(quote) && text.ends_with(quote) {
                return Some(Expr::Str(text[1..text.len() - 1].to_string()));
            }
        }
    }
    if text == "true" {
        return Some(Expr::Bool(true));
    }
    if text == "false" {
        return Some(Expr::Bool(false));
    }
    let leading_numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if leading_numeric {
        if let Ok(n) = text.parse::<f64>() {
            return Some(Expr::Num(n));
        }
        return None;
    }
    if is_path(text) {
        return Some(Expr::Path {
            segments: text.split('.').map(str::to_string).collect(),
            raw: text.to_string(),
        });
    }
    None
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_path(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

enum OpenBlock {
    If { test: Expr },
    For { binding: String, source: Expr },
}

struct Frame {
    open: OpenBlock,
    body: Vec<Node>,
}

fn parse_segments(segments: Vec<Segment>) -> Vec<Node> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut top: Vec<Node> = Vec::new();

    fn push(stack: &mut [Frame], top: &mut Vec<Node>, node: Node) {
        match stack.last_mut() {
            Some(frame) => frame.body.push(node),
            None => top.push(node),
        }
    }

    fn close(frame: Frame) -> Node {
        match frame.open {
            OpenBlock::If { test } => Node::If {
                test,
                body: frame.body,
            },
            OpenBlock::For { binding, source } => Node::For {
                binding,
                source,
                body: frame.body,
            },
        }
    }

    /// Pop the top frame only when it is the expected block kind.
    fn pop_matching(stack: &mut Vec<Frame>, want_if: bool) -> Option<Frame> {
        let kind_matches = stack
            .last()
            .is_some_and(|frame| matches!(frame.open, OpenBlock::If { .. }) == want_if);
        if kind_matches { stack.pop() } else { None }
    }

    for segment in segments {
        match segment {
            Segment::Text(text) => push(&mut stack, &mut top, Node::Literal(text)),
            Segment::Expr { inner, raw } => match classify(&inner) {
                SpanKind::If(test) => stack.push(Frame {
                    open: OpenBlock::If { test },
                    body: Vec::new(),
                }),
                SpanKind::For { binding, source } => stack.push(Frame {
                    open: OpenBlock::For { binding, source },
                    body: Vec::new(),
                }),
                SpanKind::EndIf => match pop_matching(&mut stack, true) {
                    Some(frame) => {
                        let node = close(frame);
                        push(&mut stack, &mut top, node);
                    }
                    // Stray close tag: preserve it as text.
                    None => push(&mut stack, &mut top, Node::Literal(raw)),
                },
                SpanKind::EndFor => match pop_matching(&mut stack, false) {
                    Some(frame) => {
                        let node = close(frame);
                        push(&mut stack, &mut top, node);
                    }
                    None => push(&mut stack, &mut top, Node::Literal(raw)),
                },
                SpanKind::Variable(path) => {
                    push(&mut stack, &mut top, Node::Variable { path, raw })
                }
                SpanKind::Call { name, args } => {
                    push(&mut stack, &mut top, Node::Call { name, args, raw })
                }
                SpanKind::Opaque => push(&mut stack, &mut top, Node::Literal(raw)),
            },
        }
    }

    // Dangling open blocks consume the remainder of the template.
    while let Some(frame) = stack.pop() {
        let node = close(frame);
        push(&mut stack, &mut top, node);
    }

    top
}
