//! Structural template validation.
//!
//! The strict counterpart to rendering: where
//! [`TemplateEngine::render`](crate::render::TemplateEngine::render)
//! silently degrades on malformed input, `validate_template` reports every
//! structural defect as a human-readable diagnostic. It runs the scanner and a lightweight tag
//! pass only — expressions are never evaluated and no context is needed.

use crate::parser::{self, BlockTag};
use crate::scanner::{self, Segment};

/// Check a template for structural defects.
///
/// Returns one diagnostic per defect, or an empty list for a well-formed
/// template. Checks brace matching and `if`/`endif`, `for`/`endfor`
/// pairing at every nesting depth. Never panics.
pub fn validate_template(template: &str) -> Vec<String> {
    let scan = scanner::scan(template);
    let mut diagnostics = Vec::new();

    if let Some(offset) = scan.unterminated {
        diagnostics.push(format!(
            "unmatched opening brace at byte {offset}: every '{{' needs a closing '}}'"
        ));
    }

    let mut open: Vec<(BlockTag, String)> = Vec::new();
    for segment in &scan.segments {
        let Segment::Expr { inner, raw } = segment else {
            continue;
        };
        match parser::block_tag(inner) {
            Some(tag @ (BlockTag::OpenIf | BlockTag::OpenFor)) => {
                open.push((tag, raw.clone()));
            }
            Some(BlockTag::CloseIf) => {
                if matches!(open.last(), Some((BlockTag::OpenIf, _))) {
                    open.pop();
                } else {
                    diagnostics
                        .push("unmatched {endif} with no corresponding {if ...}".to_string());
                }
            }
            Some(BlockTag::CloseFor) => {
                if matches!(open.last(), Some((BlockTag::OpenFor, _))) {
                    open.pop();
                } else {
                    diagnostics
                        .push("unmatched {endfor} with no corresponding {for ...}".to_string());
                }
            }
            None => {}
        }
    }

    for (tag, raw) in open.into_iter().rev() {
        let closer = match tag {
            BlockTag::OpenIf => "{endif}",
            _ => "{endfor}",
        };
        diagnostics.push(format!("unmatched {raw}: missing {closer}"));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_well_formed_template_is_clean() {
        assert_eq!(
            validate_template("Hello {name}, {if a}{for x in xs}{x}{endfor}{endif}"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_plain_text_is_clean() {
        assert!(validate_template("no braces at all").is_empty());
    }

    #[test]
    fn test_missing_closing_brace() {
        let diagnostics = validate_template("Hello {name! Missing closing brace");
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().any(|d| d.to_lowercase().contains("unmatched")));
    }

    #[test]
    fn test_unclosed_if() {
        let diagnostics = validate_template("{if flag}never closed");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("unmatched"));
        assert!(diagnostics[0].contains("{endif}"));
    }

    #[test]
    fn test_stray_endfor() {
        let diagnostics = validate_template("text {endfor}");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("unmatched"));
    }

    #[test]
    fn test_interleaved_blocks_both_reported() {
        // {if}{endfor}{endif}: endfor doesn't match the open if.
        let diagnostics = validate_template("{if a}{endfor}{endif}");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_multiple_defects_all_reported() {
        let diagnostics = validate_template("{if a}{for x in xs}");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_references_are_not_structural_defects() {
        // Unresolvable references are a rendering concern, not validation.
        assert!(validate_template("{definitely.not.bound} {mystery()}").is_empty());
    }
}
