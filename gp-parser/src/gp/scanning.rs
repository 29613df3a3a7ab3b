//! Scanner core
//!
//!     Low-level scanning primitives shared by the condition and program parsers: trivia
//!     (whitespace and comments), error recovery, and category matching through the language's
//!     [PatternTable]. The scanner owns the cursor and the token sequence of the pass in
//!     progress; the parsers layer their grammar on top of it.
//!
//! Forward Progress
//!
//!     Every primitive that reports success has moved the cursor, and error recovery always
//!     consumes at least one character. A parse loop that calls `consume_error` whenever no
//!     production applies therefore terminates on any input.
//!
//! Comments
//!
//!     Comments are `/* ... */` and do not nest. An unterminated comment runs to the end of the
//!     input; the scan still ends cleanly. Multi-line continuity for block-wise highlighting is
//!     tracked by the highlighter's block state, not here: parsers always rescan from offset 0.

pub mod patterns;

pub use patterns::PatternTable;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::gp::token::{Lexeme, Token, TokenSequence};

pub const COMMENT_OPEN: &str = "/*";
pub const COMMENT_CLOSE: &str = "*/";

/// An identifier-shaped run, consumed as a whole by error recovery.
static ERROR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// Cursor plus token sink for one parse pass.
#[derive(Debug)]
pub struct Scanner<L> {
    source: String,
    position: usize,
    tokens: TokenSequence<L>,
}

impl<L: Lexeme> Default for Scanner<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Lexeme> Scanner<L> {
    pub fn new() -> Self {
        Self {
            source: String::new(),
            position: 0,
            tokens: TokenSequence::new(),
        }
    }

    /// Starts a new pass over `source`: cursor to 0, tokens cleared.
    pub fn reset(&mut self, source: &str) {
        self.source.clear();
        self.source.push_str(source);
        self.position = 0;
        self.tokens.clear();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn rest(&self) -> &str {
        &self.source[self.position..]
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn tokens(&self) -> &TokenSequence<L> {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> &Token<L> {
        &self.tokens[index]
    }

    /// Index of the most recently pushed token, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }

    /// Consumes a run of whitespace. Returns `false`, without moving, when the cursor is not on
    /// whitespace.
    pub fn consume_whitespace(&mut self) -> bool {
        let start = self.position;
        let width: usize = self
            .rest()
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .map(char::len_utf8)
            .sum();
        if width == 0 {
            return false;
        }
        self.position += width;
        debug_assert!(self.position > start, "whitespace match must be non-empty");
        true
    }

    /// Consumes a comment, emitting one comment token that includes both delimiters. An
    /// unterminated comment extends to the end of the input.
    pub fn consume_comment(&mut self) -> bool {
        if !self.rest().starts_with(COMMENT_OPEN) {
            return false;
        }
        let body = &self.rest()[COMMENT_OPEN.len()..];
        let len = match body.find(COMMENT_CLOSE) {
            Some(close) => COMMENT_OPEN.len() + close + COMMENT_CLOSE.len(),
            None => self.rest().len(),
        };
        self.push(L::COMMENT, len);
        true
    }

    /// Skips whitespace and comments until neither applies.
    pub fn skip_trivia(&mut self) {
        while self.consume_whitespace() || self.consume_comment() {}
    }

    /// Recovery: consumes an identifier-shaped run, or else exactly one character, as an error
    /// token. `expected` is appended to the description.
    pub fn consume_error(&mut self, expected: &str) {
        let len = match ERROR_RUN.find(self.rest()) {
            Some(run) => run.end(),
            None => self.peek_char().map_or(0, char::len_utf8),
        };
        if len == 0 {
            log::error!("error recovery requested at end of input ({})", expected);
            return;
        }
        let start = self.position;
        let text = &self.source[start..start + len];
        let description = format!("Unexpected token {} at position {}. {}", text, start, expected);
        let token = Token::error(start, text, description);
        self.position += len;
        self.tokens.push(token);
    }

    /// Consumes `category` if its pattern matches at the cursor; returns the token index.
    pub fn consume(&mut self, category: L) -> Option<usize> {
        let len = L::patterns().match_len(category, self.rest())?;
        Some(self.push(category, len))
    }

    /// Consumes the first category of the table accepted by `accept`; returns the token index.
    pub fn consume_any(&mut self, accept: impl Fn(L) -> bool) -> Option<usize> {
        let (category, len) = L::patterns().dispatch(self.rest(), accept)?;
        Some(self.push(category, len))
    }

    /// True if `category` matches at the cursor. Never moves the cursor.
    pub fn peek(&self, category: L) -> bool {
        self.peek_text(category).is_some()
    }

    /// The text `category` would consume at the cursor. Never moves the cursor.
    pub fn peek_text(&self, category: L) -> Option<&str> {
        let len = L::patterns().match_len(category, self.rest())?;
        Some(&self.rest()[..len])
    }

    /// Turns an already emitted token into an error token.
    pub fn mark_error(&mut self, index: usize, description: impl Into<String>) {
        if let Some(token) = self.tokens.get_mut(index) {
            token.category = L::ERROR;
            token.description = Some(description.into());
        }
    }

    /// Changes the category of an already emitted token.
    pub fn recategorize(&mut self, index: usize, category: L) {
        if let Some(token) = self.tokens.get_mut(index) {
            token.category = category;
        }
    }

    fn push(&mut self, category: L, len: usize) -> usize {
        let start = self.position;
        let token = Token::new(category, start, &self.source[start..start + len]);
        self.position += len;
        self.tokens.push(token)
    }
}
