//! Token sequence model
//!
//! A formula is an ordered run of tokens: atomic tags that reference a named
//! variable, and free-text runs typed by the user. The sequence also owns the
//! cursor (an insertion index *between* tokens, not a character offset) and an
//! optional selected tag used for contextual actions.
//!
//! All mutation goes through the edit operations in [`edit`], which keep these
//! invariants after every call:
//! - `tokens[i].position() == i` for every token
//! - `0 <= cursor <= tokens.len()`
//! - `selected_tag`, when set, names a tag token present in the sequence

pub mod edit;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Characters that always form their own text token.
pub const OPERATOR_CHARS: [char; 7] = ['+', '-', '*', '/', '^', '(', ')'];

pub fn is_operator_char(ch: char) -> bool {
    OPERATOR_CHARS.contains(&ch)
}

/// Stable identity of a token, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Atomic reference to a variable or function name
    Tag,
    /// Free-typed literal run (digits, operators, parentheses, ...)
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    kind: TokenKind,
    value: String,
    /// Cached array index, rewritten by the owning sequence after every
    /// structural change.
    position: usize,
}

impl Token {
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Tag, name)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, value)
    }

    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            id: TokenId::new(),
            kind,
            value: value.into(),
            position: 0,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_tag(&self) -> bool {
        self.kind == TokenKind::Tag
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    /// Character count (not byte length) of the token's value
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    cursor: usize,
    selected_tag: Option<TokenId>,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a snapshot as a fresh sequence: positions renumbered, cursor
    /// after the last token, nothing selected.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut seq = Self {
            cursor: tokens.len(),
            tokens,
            selected_tag: None,
        };
        seq.renumber();
        seq
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_tag(&self) -> Option<TokenId> {
        self.selected_tag
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: TokenId) -> Option<usize> {
        self.tokens.iter().position(|t| t.id == id)
    }

    /// The token immediately left of the cursor
    pub fn token_before_cursor(&self) -> Option<&Token> {
        self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Deep copy of the tokens, for archiving
    pub fn snapshot(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    /// Plain rendering of the sequence with `|` at the cursor, tags in brackets.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i == self.cursor {
                out.push('|');
            }
            match token.kind {
                TokenKind::Tag => {
                    out.push('[');
                    out.push_str(&token.value);
                    out.push(']');
                }
                TokenKind::Text => out.push_str(&token.value),
            }
        }
        if self.cursor == self.tokens.len() {
            out.push('|');
        }
        out
    }

    fn renumber(&mut self) {
        for (i, token) in self.tokens.iter_mut().enumerate() {
            token.position = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_renumbers_and_moves_cursor_to_end() {
        let mut a = Token::text("1");
        a.position = 7;
        let seq = TokenSequence::from_tokens(vec![a, Token::tag("Base salary"), Token::text("+")]);

        assert_eq!(seq.cursor(), 3);
        assert_eq!(seq.selected_tag(), None);
        for (i, t) in seq.tokens().iter().enumerate() {
            assert_eq!(t.position(), i);
        }
    }

    #[test]
    fn test_token_before_cursor() {
        let seq = TokenSequence::new();
        assert!(seq.token_before_cursor().is_none());

        let seq = TokenSequence::from_tokens(vec![Token::text("12")]);
        assert_eq!(seq.token_before_cursor().map(|t| t.value()), Some("12"));
    }

    #[test]
    fn test_render_marks_cursor() {
        let seq = TokenSequence::from_tokens(vec![Token::tag("Base salary"), Token::text("*2")]);
        assert_eq!(seq.render(), "[Base salary]*2|");
        assert_eq!(TokenSequence::new().render(), "|");
    }

    #[test]
    fn test_token_id_parse_roundtrip() {
        let id = TokenId::new();
        let parsed: TokenId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<TokenId>().is_err());
    }

    #[test]
    fn test_operator_chars() {
        for ch in "+-*/^()".chars() {
            assert!(is_operator_char(ch));
        }
        assert!(!is_operator_char('.'));
        assert!(!is_operator_char('5'));
        assert!(!is_operator_char(' '));
    }
}
