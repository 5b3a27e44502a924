//! Static variable extraction.
//!
//! Collects the head identifier of every variable reference a template
//! makes, without evaluating anything. Useful for declaring a template's
//! inputs up front or checking a context for completeness before
//! rendering.

use std::collections::BTreeSet;

use crate::parser::{self, Expr, Node};

/// Collect every top-level variable name a template references.
///
/// Reaches into `if` tests, `for` sources, function-call arguments, and
/// arbitrarily nested block bodies. Dotted references contribute their
/// head identifier (`user.name` contributes `user`). Loop bindings are
/// reported like any other reference, so the result is a superset of what
/// a render call would need from the context.
pub fn extract_variables(template: &str) -> BTreeSet<String> {
    let nodes = parser::parse(template);
    let mut names = BTreeSet::new();
    collect(&nodes, &mut names);
    names
}

fn collect(nodes: &[Node], names: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            Node::Literal(_) => {}
            Node::Variable { path, .. } => add_head(path, names),
            Node::Call { args, .. } => {
                for arg in args {
                    add_expr(arg, names);
                }
            }
            Node::If { test, body } => {
                add_expr(test, names);
                collect(body, names);
            }
            Node::For { source, body, .. } => {
                add_expr(source, names);
                collect(body, names);
            }
        }
    }
}

fn add_expr(expr: &Expr, names: &mut BTreeSet<String>) {
    if let Expr::Path { segments, .. } = expr {
        add_head(segments, names);
    }
}

fn add_head(path: &[String], names: &mut BTreeSet<String>) {
    if let Some(head) = path.first() {
        names.insert(head.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(template: &str) -> Vec<String> {
        extract_variables(template).into_iter().collect()
    }

    #[test]
    fn test_plain_references() {
        assert_eq!(names("Hello {name} from {city}!"), vec!["city", "name"]);
    }

    #[test]
    fn test_dotted_reference_contributes_head() {
        assert_eq!(names("{user.name} {user.role}"), vec!["user"]);
    }

    #[test]
    fn test_reaches_into_blocks_and_calls() {
        let template =
            "{if show_details}{upper(greeting)}{for u in users}{u.name}{endfor}{endif}";
        assert_eq!(names(template), vec!["greeting", "show_details", "u", "users"]);
    }

    #[test]
    fn test_literals_contribute_nothing() {
        assert!(names("{conditional(flag, \"yes\", 2)}").contains(&"flag".to_string()));
        assert_eq!(names("{conditional(flag, \"yes\", 2)}").len(), 1);
    }

    #[test]
    fn test_no_references() {
        assert!(extract_variables("plain text, no spans").is_empty());
    }
}
