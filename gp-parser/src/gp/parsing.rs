//! Parsers
//!
//!     Two tokenizing parsers share the [Scanner](crate::gp::scanning::Scanner) core:
//!
//!         - [condition]: the boolean/arithmetic condition language attached to rules.
//!         - [program]: the control-program language (declarations, command sequences,
//!           if/try, rule sets), as a recursive descent over the grammar.
//!
//!     Neither builds a tree. Their output is the token sequence of the whole buffer, with
//!     structural problems expressed as error tokens carrying a description. A parse never
//!     fails and never stops early.
//!
//! Re-parse Contract
//!
//!     The editor host calls [Tokenizer::set_text] after an edit and [Tokenizer::parse] when
//!     it wants fresh tokens (typically debounced). A parse of text identical to the last
//!     parsed text is a no-op reporting [ParseStatus::Unchanged], which keeps interactive
//!     typing cheap when the host re-requests tokens without an intervening edit.

pub mod condition;
pub mod program;

pub use condition::{ConditionLexeme, ConditionParser};
pub use program::{ProgramLexeme, ProgramParser};

use crate::gp::scanning::Scanner;
use crate::gp::token::{Lexeme, TokenSequence};

/// Outcome of a [Tokenizer::parse] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// The text matched the cache; tokens were left as they were.
    Unchanged,
    /// The whole text was rescanned.
    Reparsed,
}

/// Editor-facing contract shared by both parsers.
pub trait Tokenizer {
    type Lexeme: Lexeme;

    /// Replaces the text to parse. Does not parse.
    fn set_text(&mut self, text: &str);

    /// The text last handed to [Tokenizer::set_text].
    fn text(&self) -> &str;

    /// Re-tokenizes the text unless it equals the last parsed text.
    fn parse(&mut self) -> ParseStatus;

    /// Tokens of the last parse pass.
    fn tokens(&self) -> &TokenSequence<Self::Lexeme>;

    fn parse_text(&mut self, text: &str) -> ParseStatus {
        self.set_text(text);
        self.parse()
    }
}

/// Per-parser state: pending text, the last parsed text, and the scanner.
#[derive(Debug)]
pub struct ParseState<L> {
    text: String,
    cache: Option<String>,
    scanner: Scanner<L>,
    passes: usize,
}

impl<L: Lexeme> Default for ParseState<L> {
    fn default() -> Self {
        Self {
            text: String::new(),
            cache: None,
            scanner: Scanner::new(),
            passes: 0,
        }
    }
}

impl<L: Lexeme> ParseState<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &TokenSequence<L> {
        self.scanner.tokens()
    }

    /// Number of full scans performed so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Runs `grammar` over a freshly reset scanner, unless the text is cached.
    pub fn run(&mut self, grammar: impl FnOnce(&mut Scanner<L>)) -> ParseStatus {
        if self.cache.as_deref() == Some(self.text.as_str()) {
            log::trace!("parse cache hit ({} bytes)", self.text.len());
            return ParseStatus::Unchanged;
        }
        self.scanner.reset(&self.text);
        grammar(&mut self.scanner);
        debug_assert!(self.scanner.at_end(), "grammar stopped before end of input");
        self.cache = Some(self.text.clone());
        self.passes += 1;
        log::trace!(
            "rescanned {} bytes into {} tokens",
            self.text.len(),
            self.scanner.tokens().len()
        );
        ParseStatus::Reparsed
    }
}
