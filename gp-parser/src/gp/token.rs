//! Core token types shared by the scanner, both parsers and the highlighter.
//!
//!     A token is a value: start/end byte offsets into the parsed text, a language-specific
//!     category, the verbatim text and, for errors only, a human readable description. Tokens
//!     live in a [TokenSequence], which is rebuilt by the parser on every pass and lent to the
//!     highlighter as a plain borrow.
//!
//! Ordering
//!
//!     Tokens are produced in strictly increasing start order and never overlap. Whitespace is
//!     not tokenized, so the only gaps between tokens are whitespace runs. Both properties let
//!     lookups by offset use binary search.

use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use std::ops::{Index, Range};

use crate::gp::highlighting::StyleClass;
use crate::gp::scanning::PatternTable;

/// A language-specific token category.
///
/// Each language defines its categories as a plain enum and hands the scanner an ordered
/// pattern table for them. Categories that never come out of a pattern (errors, categories
/// assigned retroactively) simply have no entry in the table.
pub trait Lexeme: Copy + Eq + Hash + fmt::Debug + Serialize + 'static {
    /// Category used for `/* ... */` comments.
    const COMMENT: Self;
    /// Category used for malformed regions.
    const ERROR: Self;

    /// The ordered `(category, matcher)` table for this language.
    fn patterns() -> &'static PatternTable<Self>;

    /// Display name, used in token renderings and CLI output.
    fn name(self) -> &'static str;

    /// Highlight group this category is drawn with.
    fn style_class(self) -> StyleClass;
}

/// A position-tagged lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<L> {
    pub start: usize,
    pub end: usize,
    pub category: L,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl<L: Lexeme> Token<L> {
    pub fn new(category: L, start: usize, text: &str) -> Self {
        Self {
            start,
            end: start + text.len(),
            category,
            text: text.to_string(),
            description: None,
        }
    }

    pub fn error(start: usize, text: &str, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::new(L::ERROR, start, text)
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_error(&self) -> bool {
        self.category == L::ERROR
    }

    /// True if `offset` falls inside the half-open span of this token.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True if this token shares at least one byte with `range`.
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.start < range.end && range.start < self.end
    }
}

impl<L: Lexeme> fmt::Display for Token<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.category.name(), self.text)
    }
}

/// The ordered tokens of one parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence<L> {
    tokens: Vec<Token<L>>,
}

impl<L> Default for TokenSequence<L> {
    fn default() -> Self {
        Self { tokens: Vec::new() }
    }
}

impl<L: Lexeme> TokenSequence<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<L>> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token<L>] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token<L>> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token<L>> {
        self.tokens.last()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Token<L>> {
        self.tokens.get_mut(index)
    }

    /// Appends a token and returns its index.
    pub(crate) fn push(&mut self, token: Token<L>) -> usize {
        debug_assert!(
            self.tokens.last().map_or(true, |last| last.end <= token.start),
            "tokens must not overlap: {:?} after {:?}",
            token,
            self.tokens.last()
        );
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    pub(crate) fn clear(&mut self) {
        self.tokens.clear();
    }

    /// The token covering `offset`, if any. Used for hover diagnostics.
    pub fn token_at(&self, offset: usize) -> Option<&Token<L>> {
        let after = self.tokens.partition_point(|token| token.start <= offset);
        after
            .checked_sub(1)
            .map(|index| &self.tokens[index])
            .filter(|token| token.contains(offset))
    }

    /// All tokens sharing at least one byte with `range`, in order.
    pub fn overlapping(&self, range: Range<usize>) -> &[Token<L>] {
        let first = self.tokens.partition_point(|token| token.end <= range.start);
        let last = self.tokens.partition_point(|token| token.start < range.end);
        if first >= last {
            return &[];
        }
        &self.tokens[first..last]
    }

    /// Error tokens, in source order.
    pub fn errors(&self) -> impl Iterator<Item = &Token<L>> {
        self.tokens.iter().filter(|token| token.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// `(category, text)` pairs, convenient for assertions.
    pub fn summary(&self) -> Vec<(L, &str)> {
        self.tokens
            .iter()
            .map(|token| (token.category, token.text.as_str()))
            .collect()
    }
}

impl<L> Index<usize> for TokenSequence<L> {
    type Output = Token<L>;

    fn index(&self, index: usize) -> &Token<L> {
        &self.tokens[index]
    }
}

impl<'a, L> IntoIterator for &'a TokenSequence<L> {
    type Item = &'a Token<L>;
    type IntoIter = std::slice::Iter<'a, Token<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<L: Lexeme> fmt::Display for TokenSequence<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
            first = false;
        }
        Ok(())
    }
}
