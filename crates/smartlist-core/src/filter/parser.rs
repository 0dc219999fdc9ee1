//! Recursive descent reader for the textual filter form.

use super::ast::{Conjunction, ConjunctionNode, FilterNode, MAX_DEPTH};
use super::error::{FilterError, FilterResult};
use super::lexer::{Lexer, PositionedToken, TextToken};
use super::registry::TypeRegistry;

/// Reads the textual form back into a tree.
///
/// The textual form does not record operators, so every group is rebuilt with
/// the operator given to [`TextReader::new`]. Use the tagged form when the
/// operator matters.
///
/// # Grammar
///
/// ```text
/// document ::= "" | node
/// node     ::= leaf | "[" element ("," element)* "]"
/// element  ::= node | ""          (empty only when the group has 2+ elements)
/// ```
///
/// An empty element is an empty group, which is what writing a group with an
/// empty child produces.
///
/// # Example
///
/// ```
/// use smartlist_core::filter::{Conjunction, TextReader, TypeRegistry};
///
/// let registry = TypeRegistry::with_builtin();
/// let reader = TextReader::new(&registry, Conjunction::And);
/// let node = reader.parse("[status=open,tag=urgent]").unwrap();
/// assert_eq!(node.to_text(), "[status=open,tag=urgent]");
/// ```
pub struct TextReader<'a> {
    registry: &'a TypeRegistry,
    operator: Conjunction,
}

impl<'a> TextReader<'a> {
    /// Creates a reader that builds groups with `operator`.
    pub fn new(registry: &'a TypeRegistry, operator: Conjunction) -> Self {
        Self { registry, operator }
    }

    /// Parses the textual form.
    ///
    /// Empty input yields an empty group.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MalformedTextPayload` for unbalanced brackets,
    /// stray separators, trailing input, nesting deeper than [`MAX_DEPTH`], or
    /// leaf text no registered kind reads.
    /// A leaf kind that recognizes its text but cannot build the leaf returns
    /// its own error.
    pub fn parse(&self, input: &str) -> FilterResult<FilterNode> {
        let tokens = Lexer::new(input).tokenize();
        if tokens.is_empty() {
            return Ok(ConjunctionNode::empty(self.operator).into());
        }

        let mut cursor = Cursor {
            tokens,
            position: 0,
            end: input.len(),
        };
        let node = self.parse_node(&mut cursor, 1)?;

        if let Some(remaining) = cursor.peek() {
            return Err(FilterError::malformed_text(
                remaining.position,
                "unexpected input after expression",
            ));
        }
        Ok(node)
    }

    /// Parses `leaf | "[" element ("," element)* "]"` found at `depth`.
    fn parse_node(&self, cursor: &mut Cursor, depth: usize) -> FilterResult<FilterNode> {
        let Some(next) = cursor.advance() else {
            return Err(FilterError::malformed_text(cursor.end, "unexpected end of input"));
        };

        match next.token {
            TextToken::Leaf(text) => self.parse_leaf(&text, next.position),
            // A group always has a child one level further down.
            TextToken::OpenBracket if depth >= MAX_DEPTH => Err(FilterError::malformed_text(
                next.position,
                format!("nesting deeper than {MAX_DEPTH} levels"),
            )),
            TextToken::OpenBracket => self.parse_group(cursor, next.position, depth),
            TextToken::CloseBracket => Err(FilterError::malformed_text(next.position, "unexpected ']'")),
            TextToken::Comma => Err(FilterError::malformed_text(next.position, "unexpected ','")),
        }
    }

    fn parse_group(
        &self,
        cursor: &mut Cursor,
        open_position: usize,
        depth: usize,
    ) -> FilterResult<FilterNode> {
        let mut children = Vec::new();
        loop {
            // An element is empty when a separator or the closing bracket follows directly.
            let child = match cursor.peek().map(|t| &t.token) {
                Some(TextToken::Comma) | Some(TextToken::CloseBracket) => {
                    ConjunctionNode::empty(self.operator).into()
                }
                _ => self.parse_node(cursor, depth + 1)?,
            };
            children.push(child);

            match cursor.advance() {
                Some(PositionedToken {
                    token: TextToken::Comma,
                    ..
                }) => continue,
                Some(PositionedToken {
                    token: TextToken::CloseBracket,
                    position,
                }) => {
                    if children.len() == 1 && children[0].to_text().is_empty() {
                        return Err(FilterError::malformed_text(position, "empty group"));
                    }
                    return Ok(ConjunctionNode::new(self.operator, children).into());
                }
                Some(other) => {
                    return Err(FilterError::malformed_text(
                        other.position,
                        "expected ',' or ']'",
                    ))
                }
                None => {
                    return Err(FilterError::malformed_text(
                        open_position,
                        "unclosed '['",
                    ))
                }
            }
        }
    }

    fn parse_leaf(&self, text: &str, position: usize) -> FilterResult<FilterNode> {
        match self.registry.parse_text(text) {
            Some(leaf) => Ok(leaf?.into()),
            None => Err(FilterError::malformed_text(
                position,
                format!("unrecognized criterion '{text}'"),
            )),
        }
    }
}

struct Cursor {
    tokens: Vec<PositionedToken>,
    position: usize,
    end: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&PositionedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}
