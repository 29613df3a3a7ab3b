//! Condition parser
//!
//!     Tokenizes the condition attached to a rule, e.g. `indeg(n) > 2 and not edge(n, m)`.
//!
//!     The grammar is handled at token level: each step recognises one condition lexeme
//!     (keyword, number, string, identifier, operator, parenthesis). On top of that the parser
//!     tracks two bits of structure:
//!
//!         - parenthesis balance: a `)` without an open `(` becomes an error token, and every
//!           `(` still open at the end of the text is converted into one;
//!         - operand position: a `-` immediately followed by digits is a signed number only
//!           where an operand is expected (start of text, after an operator, a keyword or a
//!           `(`). After an operand it is the subtraction operator.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::gp::highlighting::StyleClass;
use crate::gp::parsing::{ParseState, ParseStatus, Tokenizer};
use crate::gp::scanning::{PatternTable, Scanner};
use crate::gp::token::{Lexeme, TokenSequence};

/// Token categories of the condition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionLexeme {
    Identifier,
    Number,
    QuotedString,
    Keyword,
    Operator,
    OpenParen,
    CloseParen,
    CommentOpen,
    CommentClose,
    Comment,
    Error,
}

pub const CONDITION_KEYWORDS: &[&str] = &[
    "edge", "node", "not", "and", "or", "int", "string", "atom", "empty", "true", "false", "indeg",
    "outdeg",
];

/// Keywords that denote a value rather than introduce one.
const VALUE_KEYWORDS: &[&str] = &["empty", "true", "false"];

static PATTERNS: Lazy<PatternTable<ConditionLexeme>> = Lazy::new(|| {
    use ConditionLexeme::*;
    PatternTable::new(&[
        (CommentOpen, r"/\*"),
        (CommentClose, r"\*/"),
        (
            Keyword,
            r"(?:edge|node|not|and|or|int|string|atom|empty|true|false|indeg|outdeg)\b",
        ),
        (Number, r"-?[0-9]+"),
        (QuotedString, r#""[^"\n]*""#),
        (Identifier, r"[A-Za-z_][A-Za-z0-9_]*"),
        (Operator, r"!=|>=|<=|=|,|>|<|-|\+|/|\*"),
        (OpenParen, r"\("),
        (CloseParen, r"\)"),
    ])
});

impl Lexeme for ConditionLexeme {
    const COMMENT: Self = ConditionLexeme::Comment;
    const ERROR: Self = ConditionLexeme::Error;

    fn patterns() -> &'static PatternTable<Self> {
        &PATTERNS
    }

    fn name(self) -> &'static str {
        match self {
            ConditionLexeme::Identifier => "Identifier",
            ConditionLexeme::Number => "Number",
            ConditionLexeme::QuotedString => "QuotedString",
            ConditionLexeme::Keyword => "Keyword",
            ConditionLexeme::Operator => "Operator",
            ConditionLexeme::OpenParen => "OpenParen",
            ConditionLexeme::CloseParen => "CloseParen",
            ConditionLexeme::CommentOpen => "CommentOpen",
            ConditionLexeme::CommentClose => "CommentClose",
            ConditionLexeme::Comment => "Comment",
            ConditionLexeme::Error => "Error",
        }
    }

    fn style_class(self) -> StyleClass {
        match self {
            ConditionLexeme::Identifier => StyleClass::Identifier,
            ConditionLexeme::Number => StyleClass::Number,
            ConditionLexeme::QuotedString => StyleClass::QuotedString,
            ConditionLexeme::Keyword
            | ConditionLexeme::Operator
            | ConditionLexeme::OpenParen
            | ConditionLexeme::CloseParen => StyleClass::Keyword,
            ConditionLexeme::CommentOpen
            | ConditionLexeme::CommentClose
            | ConditionLexeme::Comment => StyleClass::Comment,
            ConditionLexeme::Error => StyleClass::Error,
        }
    }
}

/// Tokenizer for rule conditions.
#[derive(Debug, Default)]
pub struct ConditionParser {
    state: ParseState<ConditionLexeme>,
}

impl ConditionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full scans performed so far.
    pub fn passes(&self) -> usize {
        self.state.passes()
    }
}

impl Tokenizer for ConditionParser {
    type Lexeme = ConditionLexeme;

    fn set_text(&mut self, text: &str) {
        self.state.set_text(text);
    }

    fn text(&self) -> &str {
        self.state.text()
    }

    fn parse(&mut self) -> ParseStatus {
        self.state.run(|scanner| ConditionGrammar::new(scanner).condition())
    }

    fn tokens(&self) -> &TokenSequence<ConditionLexeme> {
        self.state.tokens()
    }
}

struct ConditionGrammar<'a> {
    scanner: &'a mut Scanner<ConditionLexeme>,
    open_parens: Vec<usize>,
    expect_operand: bool,
}

impl<'a> ConditionGrammar<'a> {
    fn new(scanner: &'a mut Scanner<ConditionLexeme>) -> Self {
        Self {
            scanner,
            open_parens: Vec::new(),
            expect_operand: true,
        }
    }

    fn condition(mut self) {
        while !self.scanner.at_end() {
            let before = self.scanner.position();
            if self.scanner.consume_whitespace() || self.scanner.consume_comment() {
                continue;
            }
            if !self.term() {
                self.scanner.consume_error("Expecting a condition.");
                self.expect_operand = true;
            }
            debug_assert!(self.scanner.position() > before, "condition scan stalled");
        }
        for open in std::mem::take(&mut self.open_parens) {
            self.scanner
                .mark_error(open, "Unmatched parenthesis: expecting ')'.");
        }
    }

    /// Recognises one condition lexeme at the cursor.
    fn term(&mut self) -> bool {
        use ConditionLexeme::*;

        if let Some(index) = self.scanner.consume(CommentClose) {
            self.scanner.mark_error(
                index,
                "Unmatched comment close marker. Expecting a condition.",
            );
            return true;
        }
        if let Some(index) = self.scanner.consume(OpenParen) {
            self.open_parens.push(index);
            self.expect_operand = true;
            return true;
        }
        if let Some(index) = self.scanner.consume(CloseParen) {
            if self.open_parens.pop().is_none() {
                self.scanner.mark_error(
                    index,
                    "Unmatched parenthesis: no open '(' to close.",
                );
            }
            self.expect_operand = false;
            return true;
        }

        let signed_allowed = self.expect_operand || !self.scanner.rest().starts_with('-');
        let consumed = self.scanner.consume_any(|category| match category {
            Number => signed_allowed,
            Keyword | QuotedString | Identifier | Operator => true,
            _ => false,
        });
        match consumed {
            Some(index) => {
                let token = self.scanner.token(index);
                self.expect_operand = match token.category {
                    Operator => true,
                    Keyword => !VALUE_KEYWORDS.contains(&token.text.as_str()),
                    _ => false,
                };
                true
            }
            None => false,
        }
    }
}
