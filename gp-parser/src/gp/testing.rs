//! Test support
//!
//!     Fluent assertions over token sequences, shared by the unit tests and the integration
//!     tests under `tests/`. Failure messages always include the rendered sequence, so a failing
//!     case shows what the parser actually produced.
//!
//!     assert_tokens(parser.tokens())
//!         .count(4)
//!         .no_errors()
//!         .token(0, |t| t.category(ProgramLexeme::Declaration).text("main"));

use crate::gp::parsing::Tokenizer;
use crate::gp::token::{Lexeme, Token, TokenSequence};

/// Tokenizes `text` with a fresh `P` and returns the tokens.
pub fn tokenize<P: Tokenizer + Default>(text: &str) -> TokenSequence<P::Lexeme> {
    let mut parser = P::default();
    parser.parse_text(text);
    parser.tokens().clone()
}

/// One token per line, `start..end Name(text)`, plus the description for errors.
pub fn render<L: Lexeme>(tokens: &TokenSequence<L>) -> String {
    tokens
        .iter()
        .map(|token| match &token.description {
            Some(description) => format!("{}..{} {} {}", token.start, token.end, token, description),
            None => format!("{}..{} {}", token.start, token.end, token),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assert_tokens<L: Lexeme>(tokens: &TokenSequence<L>) -> SequenceAssertion<'_, L> {
    SequenceAssertion { tokens }
}

pub struct SequenceAssertion<'a, L> {
    tokens: &'a TokenSequence<L>,
}

impl<'a, L: Lexeme> SequenceAssertion<'a, L> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.tokens.len(),
            expected,
            "Expected {} tokens, found {}: [{}]",
            expected,
            self.tokens.len(),
            self.tokens
        );
        self
    }

    pub fn no_errors(self) -> Self {
        let errors: Vec<_> = self.tokens.errors().map(|token| token.to_string()).collect();
        assert!(
            errors.is_empty(),
            "Expected no errors, found {:?} in [{}]",
            errors,
            self.tokens
        );
        self
    }

    pub fn error_count(self, expected: usize) -> Self {
        let actual = self.tokens.errors().count();
        assert_eq!(
            actual, expected,
            "Expected {} error tokens, found {}: [{}]",
            expected, actual, self.tokens
        );
        self
    }

    /// Asserts the `(category, text)` pairs of the whole sequence.
    pub fn categories(self, expected: &[(L, &str)]) -> Self {
        assert_eq!(
            self.tokens.summary(),
            expected.to_vec(),
            "Token mismatch in [{}]",
            self.tokens
        );
        self
    }

    pub fn token<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a, L>),
    {
        assert!(
            index < self.tokens.len(),
            "Token index {} out of bounds ({} tokens: [{}])",
            index,
            self.tokens.len(),
            self.tokens
        );
        assertion(TokenAssertion {
            token: &self.tokens[index],
            context: format!("tokens[{}]", index),
        });
        self
    }

    /// Runs `assertion` on the last token.
    pub fn last<F>(self, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a, L>),
    {
        let index = self
            .tokens
            .len()
            .checked_sub(1)
            .unwrap_or_else(|| panic!("Expected at least one token, found none"));
        self.token(index, assertion)
    }
}

pub struct TokenAssertion<'a, L> {
    token: &'a Token<L>,
    context: String,
}

impl<L: Lexeme> TokenAssertion<'_, L> {
    pub fn category(self, expected: L) -> Self {
        assert_eq!(
            self.token.category, expected,
            "{}: expected {:?}, found {}",
            self.context, expected, self.token
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.token.text, expected,
            "{}: expected text {:?}, found {}",
            self.context, expected, self.token
        );
        self
    }

    pub fn span(self, start: usize, end: usize) -> Self {
        assert_eq!(
            self.token.span(),
            start..end,
            "{}: unexpected span for {}",
            self.context,
            self.token
        );
        self
    }

    pub fn is_error(self) -> Self {
        assert!(
            self.token.is_error(),
            "{}: expected an error token, found {}",
            self.context,
            self.token
        );
        self
    }

    pub fn description_starts_with(self, prefix: &str) -> Self {
        let description = self.token.description.as_deref().unwrap_or_default();
        assert!(
            description.starts_with(prefix),
            "{}: expected description starting with {:?}, found {:?}",
            self.context,
            prefix,
            description
        );
        self
    }
}
