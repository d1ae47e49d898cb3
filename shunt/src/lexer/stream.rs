use crate::token::{Token, TokenKind};

/// Materialized lexer output with a movable cursor.
///
/// The cursor starts before the first token. `advance` hands out the token
/// under the cursor and moves past it; `peek` looks without moving.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    remainder: Option<String>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            remainder: None,
        }
    }

    pub(crate) fn with_remainder(mut self, remainder: Option<String>) -> Self {
        self.remainder = remainder;
        self
    }

    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Step the cursor back by one and return the token it now points at
    pub fn back(&mut self) -> Option<&Token> {
        self.cursor = self.cursor.checked_sub(1)?;
        self.tokens.get(self.cursor)
    }

    /// Rewind to the start so the stream can be evaluated again
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Unscanned input left behind when an interceptor stopped the lexer
    pub fn remainder(&self) -> Option<&str> {
        self.remainder.as_deref()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
