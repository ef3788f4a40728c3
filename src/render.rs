//! Renders a completed [`Node`] tree to JSON text.
//!
//! [`render`] returns `None` for an unresolved node, so a fully canceled
//! root produces no output at all rather than `{}` or `null`. Unresolved
//! children are skipped while rendering containers; the encoder never
//! inserts them in the first place, but the renderer does not rely on that.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prune::{render, Node};
//!
//! let mut node = Node::new();
//! node.insert("a", Node::Int(1)).unwrap();
//! assert_eq!(render(&node), Some(r#"{"a":1}"#.to_string()));
//!
//! assert_eq!(render(&Node::Unset), None);
//! ```

use crate::{Error, Node, Result};

/// Renders one node to its textual form, or `None` if it never resolved.
#[must_use]
pub fn render(node: &Node) -> Option<String> {
    match node {
        Node::Unset => None,
        Node::Null => Some("null".to_string()),
        Node::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        Node::Int(i) => Some(i.to_string()),
        Node::Uint(u) => Some(u.to_string()),
        Node::Double(d) => Some(decimal(d.to_string(), d.is_finite())),
        Node::Float(f) => Some(decimal(f.to_string(), f.is_finite())),
        Node::String(s) => Some(format!("\"{}\"", escape(s))),
        Node::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render).collect();
            Some(format!("[{}]", parts.join(",")))
        }
        Node::Map(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .filter_map(|(key, value)| {
                    render(value).map(|text| format!("\"{}\":{}", escape(key), text))
                })
                .collect();
            Some(format!("{{{}}}", parts.join(",")))
        }
    }
}

// A whole float still reparses as a float, not an integer.
fn decimal(mut repr: String, finite: bool) -> String {
    if finite && !repr.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        repr.push_str(".0");
    }
    repr
}

/// Escapes a string for embedding between quotes.
///
/// Only backspace, form feed, newline, carriage return, tab, `"` and `\`
/// are escaped; other characters pass through verbatim, including high code
/// points. A CR immediately followed by LF is consumed as one unit and
/// emitted as the two-character escape `\r\n`.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\u{8}' => output.push_str("\\b"),
            '\u{c}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    output.push_str("\\r\\n");
                } else {
                    output.push_str("\\r");
                }
            }
            '\t' => output.push_str("\\t"),
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            _ => output.push(ch),
        }
    }
    output
}

/// Reverses [`escape`]. Fails on a dangling backslash or an unknown escape.
pub fn unescape(input: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some('b') => output.push('\u{8}'),
            Some('f') => output.push('\u{c}'),
            Some('n') => output.push('\n'),
            Some('r') => output.push('\r'),
            Some('t') => output.push('\t'),
            Some('"') => output.push('"'),
            Some('\\') => output.push('\\'),
            Some(other) => {
                return Err(Error::custom(format!("unknown escape sequence \\{other}")))
            }
            None => return Err(Error::custom("dangling backslash at end of input")),
        }
    }
    Ok(output)
}
