//! Compact textual form of a filter tree.
//!
//! ```text
//! node  ::= leaf | "[" node ("," node)+ "]"
//! ```
//!
//! A group with one child is written as that child, an empty group as the
//! empty string. Operators are not written: the textual form is for display
//! and export, and the tagged form is what gets persisted.

use super::ast::{ConjunctionNode, FilterNode};

/// Characters a leaf's textual form must escape.
pub const RESERVED: [char; 7] = ['\\', '[', ']', ',', '=', '!', '~'];

/// Backslash-escapes every reserved character.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reverses [`escape`]. A trailing lone backslash is kept literally.
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits an escaped `field<op>value` leaf at its first unescaped operator.
///
/// Recognized operators are `=`, `!=` and `~`. Returns the unescaped field,
/// the operator and the unescaped value, or `None` if there is no operator
/// or the value contains another unescaped operator character.
pub fn split_operator(text: &str) -> Option<(String, &'static str, String)> {
    let mut escaped = false;
    let mut found = None;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' => {
                found = Some((i, "=", i + 1));
                break;
            }
            '~' => {
                found = Some((i, "~", i + 1));
                break;
            }
            '!' => {
                if text[i + 1..].starts_with('=') {
                    found = Some((i, "!=", i + 2));
                }
                break;
            }
            _ => {}
        }
    }

    let (op_start, op, value_start) = found?;
    let field = &text[..op_start];
    let value = &text[value_start..];
    if has_unescaped_operator(value) {
        return None;
    }
    Some((unescape(field), op, unescape(value)))
}

fn has_unescaped_operator(text: &str) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if matches!(c, '=' | '!' | '~') {
            return true;
        }
    }
    false
}

impl FilterNode {
    /// Textual form of this node.
    pub fn to_text(&self) -> String {
        match self {
            FilterNode::Leaf(leaf) => leaf.criterion().to_text(),
            FilterNode::Conjunction(group) => group.to_text(),
        }
    }
}

impl ConjunctionNode {
    /// Textual form of this group; see the module docs for the grammar.
    pub fn to_text(&self) -> String {
        match self.children() {
            [] => String::new(),
            [only] => only.to_text(),
            children => {
                let parts: Vec<String> = children.iter().map(FilterNode::to_text).collect();
                format!("[{}]", parts.join(","))
            }
        }
    }
}
