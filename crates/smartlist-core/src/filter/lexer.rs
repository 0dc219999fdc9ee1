//! Lexer (tokenizer) for the textual filter form.

/// A token in the textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextToken {
    /// Group start `[`.
    OpenBracket,
    /// Group end `]`.
    CloseBracket,
    /// Child separator `,`.
    Comma,
    /// Raw (still escaped) leaf text.
    Leaf(String),
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: TextToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Lexer for tokenizing the textual form.
///
/// Everything between structural characters is leaf text; a backslash keeps
/// the following character inside the leaf.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(&self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        let mut leaf_start: Option<usize> = None;
        let mut escaped = false;

        for (i, c) in self.input.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            let structural = match c {
                '[' => Some(TextToken::OpenBracket),
                ']' => Some(TextToken::CloseBracket),
                ',' => Some(TextToken::Comma),
                _ => None,
            };
            match structural {
                Some(token) => {
                    if let Some(start) = leaf_start.take() {
                        tokens.push(self.leaf(start, i));
                    }
                    tokens.push(PositionedToken { token, position: i });
                }
                None => {
                    if c == '\\' {
                        escaped = true;
                    }
                    leaf_start.get_or_insert(i);
                }
            }
        }
        if let Some(start) = leaf_start {
            tokens.push(self.leaf(start, self.input.len()));
        }
        tokens
    }

    fn leaf(&self, start: usize, end: usize) -> PositionedToken {
        PositionedToken {
            token: TextToken::Leaf(self.input[start..end].to_string()),
            position: start,
        }
    }
}
