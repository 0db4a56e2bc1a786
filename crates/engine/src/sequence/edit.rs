//! Edit operations on a [`TokenSequence`].
//!
//! Every operation is total: requests outside the valid range clamp or do
//! nothing, they never fail or panic.

use super::{is_operator_char, Token, TokenId, TokenKind, TokenSequence};

impl TokenSequence {
    /// Insert a tag at the cursor. Tags never merge with their neighbors.
    pub fn insert_tag(&mut self, name: impl Into<String>) {
        self.insert_token(Token::new(TokenKind::Tag, name));
    }

    /// Insert one typed character at the cursor.
    ///
    /// Operator and grouping characters always get a token of their own.
    /// Anything else extends the text run left of the cursor, or starts a new
    /// one when there is no such run (cursor at 0, or right after a tag).
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf));
    }

    /// Insert a string as a single typing unit. A lone operator character is
    /// a separate token; any other non-empty string follows the merge rule of
    /// [`insert_char`](Self::insert_char).
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut chars = text.chars();
        let is_operator = match (chars.next(), chars.next()) {
            (Some(ch), None) => is_operator_char(ch),
            _ => false,
        };
        if is_operator {
            self.insert_token(Token::new(TokenKind::Text, text));
            return;
        }

        let merge = self.token_before_cursor().is_some_and(Token::is_text);
        if merge {
            // In place: no new token, cursor index unchanged
            self.tokens[self.cursor - 1].value.push_str(text);
        } else {
            self.insert_token(Token::new(TokenKind::Text, text));
        }
    }

    /// Remove the token with `id` wherever it sits. The cursor lands at the
    /// removed token's old index (clamped) and any selection is cleared.
    /// Returns false when no such token exists.
    pub fn delete_token(&mut self, id: TokenId) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("delete_token: no token {id}");
            return false;
        };

        self.tokens.remove(index);
        self.renumber();
        self.cursor = index.min(self.tokens.len());
        self.selected_tag = None;
        true
    }

    /// Backspace. A tag or a one-character text run left of the cursor is
    /// removed whole; a longer text run loses its last character.
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let index = self.cursor - 1;
        let shrink = match self.tokens.get(index) {
            Some(token) => token.is_text() && token.char_len() > 1,
            None => return,
        };

        if shrink {
            self.tokens[index].value.pop();
        } else {
            self.tokens.remove(index);
            self.renumber();
            self.cursor = index;
        }
        self.selected_tag = None;
    }

    pub fn move_backward(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.selected_tag = None;
    }

    pub fn move_forward(&mut self) {
        self.cursor = (self.cursor + 1).min(self.tokens.len());
        self.selected_tag = None;
    }

    /// Place the cursor at `index`, clamped to the sequence bounds.
    pub fn move_to(&mut self, index: usize) {
        self.cursor = index.min(self.tokens.len());
        self.selected_tag = None;
    }

    /// Select a tag for contextual actions, or clear the selection with
    /// `None`. The cursor is untouched. Ids that do not name a tag in this
    /// sequence are ignored and return false.
    pub fn select_tag(&mut self, id: Option<TokenId>) -> bool {
        match id {
            None => {
                self.selected_tag = None;
                true
            }
            Some(id) => match self.get(id) {
                Some(token) if token.is_tag() => {
                    self.selected_tag = Some(id);
                    true
                }
                _ => false,
            },
        }
    }

    /// Swap the token at `index` for a new one with a fresh id; the cursor
    /// moves just past it. Out-of-range indices are ignored.
    pub fn replace_token_at(&mut self, index: usize, kind: TokenKind, value: impl Into<String>) -> bool {
        if index >= self.tokens.len() {
            return false;
        }
        let replaced = self.tokens[index].id;
        let mut token = Token::new(kind, value);
        token.position = index;
        self.tokens[index] = token;
        self.cursor = index + 1;
        if self.selected_tag == Some(replaced) {
            self.selected_tag = None;
        }
        true
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.cursor = 0;
        self.selected_tag = None;
    }

    fn insert_token(&mut self, token: Token) {
        self.tokens.insert(self.cursor, token);
        self.renumber();
        self.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TokenSequence {
        let mut seq = TokenSequence::new();
        for ch in s.chars() {
            seq.insert_char(ch);
        }
        seq
    }

    fn values(seq: &TokenSequence) -> Vec<&str> {
        seq.tokens().iter().map(|t| t.value()).collect()
    }

    fn assert_positions(seq: &TokenSequence) {
        for (i, t) in seq.tokens().iter().enumerate() {
            assert_eq!(t.position(), i, "position mismatch at {i}");
        }
        assert!(seq.cursor() <= seq.len());
    }

    #[test]
    fn test_digits_merge_into_one_run() {
        let seq = typed("12.5");
        assert_eq!(values(&seq), vec!["12.5"]);
        assert_eq!(seq.cursor(), 1);
        assert_positions(&seq);
    }

    #[test]
    fn test_operators_are_separate_tokens() {
        let seq = typed("1+2");
        assert_eq!(values(&seq), vec!["1", "+", "2"]);
        assert_eq!(seq.cursor(), 3);

        // Same operator twice: still two tokens
        let seq = typed("((");
        assert_eq!(values(&seq), vec!["(", "("]);
    }

    #[test]
    fn test_operand_after_operator_extends_text_run() {
        // The run left of the cursor is Text, so it is extended
        let seq = typed("(1");
        assert_eq!(values(&seq), vec!["(1"]);
        assert_eq!(seq.cursor(), 1);
    }

    #[test]
    fn test_text_after_tag_starts_new_run() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Base salary");
        seq.insert_char('2');
        seq.insert_char('0');
        assert_eq!(values(&seq), vec!["Base salary", "20"]);
        assert_eq!(seq.tokens()[1].kind(), TokenKind::Text);
        assert_eq!(seq.cursor(), 2);
    }

    #[test]
    fn test_text_at_cursor_zero_starts_new_run() {
        let mut seq = typed("5");
        seq.move_backward();
        seq.insert_char('3');
        assert_eq!(values(&seq), vec!["3", "5"]);
        assert_eq!(seq.cursor(), 1);
        assert_positions(&seq);
    }

    #[test]
    fn test_tags_never_merge() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("A");
        seq.insert_tag("A");
        assert_eq!(seq.len(), 2);
        assert_ne!(seq.tokens()[0].id(), seq.tokens()[1].id());
    }

    #[test]
    fn test_insert_tag_in_middle_shifts_right() {
        let mut seq = typed("1+2");
        seq.move_to(1);
        seq.insert_tag("Vesting period");
        assert_eq!(values(&seq), vec!["1", "Vesting period", "+", "2"]);
        assert_eq!(seq.cursor(), 2);
        assert_positions(&seq);
    }

    #[test]
    fn test_insert_empty_text_is_noop() {
        let mut seq = typed("7");
        seq.insert_text("");
        assert_eq!(values(&seq), vec!["7"]);
        assert_eq!(seq.cursor(), 1);
    }

    #[test]
    fn test_insert_multichar_text_merges() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Base salary");
        seq.insert_text(" ");
        seq.insert_text("0.05");
        assert_eq!(values(&seq), vec!["Base salary", " 0.05"]);
    }

    #[test]
    fn test_delete_backward_shrinks_then_removes() {
        let mut seq = typed("123");
        seq.delete_backward();
        assert_eq!(values(&seq), vec!["12"]);
        assert_eq!(seq.cursor(), 1);
        seq.delete_backward();
        assert_eq!(values(&seq), vec!["1"]);
        seq.delete_backward();
        assert!(seq.is_empty());
        assert_eq!(seq.cursor(), 0);
        // No-op at cursor 0
        seq.delete_backward();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_delete_backward_removes_tag_whole() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Exit valuation");
        seq.insert_char('*');
        seq.move_backward();
        seq.delete_backward();
        assert_eq!(values(&seq), vec!["*"]);
        assert_eq!(seq.cursor(), 0);
        assert_positions(&seq);
    }

    #[test]
    fn test_delete_backward_clears_selection() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Option grant");
        let id = seq.tokens()[0].id();
        assert!(seq.select_tag(Some(id)));
        seq.delete_backward();
        assert_eq!(seq.selected_tag(), None);
    }

    #[test]
    fn test_delete_token_clamps_cursor_and_clears_selection() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Base salary");
        seq.insert_char('+');
        seq.insert_tag("Annual equity comp");
        let first = seq.tokens()[0].id();
        let last = seq.tokens()[2].id();
        seq.select_tag(Some(last));

        assert!(seq.delete_token(first));
        assert_eq!(values(&seq), vec!["+", "Annual equity comp"]);
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.selected_tag(), None);
        assert_positions(&seq);

        assert!(seq.delete_token(last));
        assert_eq!(seq.cursor(), 1);
        assert_positions(&seq);
    }

    #[test]
    fn test_delete_unknown_token_is_noop() {
        let mut seq = typed("1+1");
        let before = seq.clone();
        assert!(!seq.delete_token(TokenId::new()));
        assert_eq!(seq, before);
    }

    #[test]
    fn test_cursor_movement_clamps() {
        let mut seq = typed("1+");
        seq.move_forward();
        assert_eq!(seq.cursor(), 2);
        seq.move_backward();
        seq.move_backward();
        seq.move_backward();
        assert_eq!(seq.cursor(), 0);
        seq.move_to(99);
        assert_eq!(seq.cursor(), 2);
    }

    #[test]
    fn test_navigation_clears_selection() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Future dilution");
        let id = seq.tokens()[0].id();
        seq.select_tag(Some(id));
        seq.move_backward();
        assert_eq!(seq.selected_tag(), None);

        seq.select_tag(Some(id));
        seq.move_forward();
        assert_eq!(seq.selected_tag(), None);
    }

    #[test]
    fn test_select_tag_keeps_cursor_and_rejects_text() {
        let mut seq = TokenSequence::new();
        seq.insert_tag("Base salary");
        seq.insert_char('1');
        let tag = seq.tokens()[0].id();
        let text = seq.tokens()[1].id();

        assert!(seq.select_tag(Some(tag)));
        assert_eq!(seq.selected_tag(), Some(tag));
        assert_eq!(seq.cursor(), 2);

        assert!(!seq.select_tag(Some(text)));
        assert_eq!(seq.selected_tag(), Some(tag));

        assert!(seq.select_tag(None));
        assert_eq!(seq.selected_tag(), None);
    }

    #[test]
    fn test_replace_token_at() {
        let mut seq = typed("1+2");
        let old = seq.tokens()[2].id();
        assert!(seq.replace_token_at(2, TokenKind::Tag, "Base salary"));
        assert_eq!(values(&seq), vec!["1", "+", "Base salary"]);
        assert_ne!(seq.tokens()[2].id(), old);
        assert_eq!(seq.cursor(), 3);
        assert!(!seq.replace_token_at(3, TokenKind::Text, "x"));
        assert_positions(&seq);
    }

    #[test]
    fn test_clear() {
        let mut seq = typed("3*4");
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.selected_tag(), None);
    }
}
