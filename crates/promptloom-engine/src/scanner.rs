//! Template scanner — splits raw template text into literal runs and
//! `{...}` expression spans.
//!
//! The scanner only delimits spans; it never interprets their interior.
//! Brace matching counts nesting depth, so `{outer {inner} tail}` is one
//! span. An opening `{` with no matching `}` is a tokenization defect: the
//! remainder of the input becomes literal text and the defect is recorded
//! for the validator.

/// One scanned piece of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A literal run, emitted verbatim by the renderer.
    Text(String),
    /// A `{...}` span. `inner` is the interior text, `raw` the exact source
    /// including braces (preserved for placeholder output).
    Expr { inner: String, raw: String },
}

/// Result of scanning a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub segments: Vec<Segment>,
    /// Byte offset of an opening `{` that never closed, if any.
    pub unterminated: Option<usize>,
}

/// Scan a template left-to-right into segments.
///
/// Total over all inputs: malformed text degrades to literal segments.
pub fn scan(template: &str) -> Scan {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut unterminated = None;
    let mut chars = template.char_indices();

    while let Some((offset, ch)) = chars.next() {
        if ch != '{' {
            text.push(ch);
            continue;
        }

        let mut inner = String::new();
        let mut depth = 1usize;
        let mut closed = false;
        for (_, c) in chars.by_ref() {
            match c {
                '{' => {
                    depth += 1;
                    inner.push(c);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                _ => inner.push(c),
            }
        }

        if closed {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            let raw = format!("{{{inner}}}");
            segments.push(Segment::Expr { inner, raw });
        } else {
            // No matching close brace before end of input: keep the tail
            // as literal text and record the defect.
            unterminated = Some(offset);
            text.push('{');
            text.push_str(&inner);
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Scan {
        segments,
        unterminated,
    }
}
