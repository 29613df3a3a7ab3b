//! Program parser
//!
//!     Tokenizes a GP control program. Each production of the grammar is one method of
//!     [Grammar]; every method skips trivia itself before looking at the cursor and leaves the
//!     cursor right after the last token it consumed.
//!
//!         Declarations    := ( Name "=" CommandSequence "." )*
//!         CommandSequence := Command ( ";" Command )*
//!         Command         := "if" Block "then" Block [ "else" Block ]
//!                          | "try" Block [ "then" Block [ "else" Block ] ]
//!                          | Block [ "!" | "or" Block ]
//!         Block           := "skip" | "fail" | Name
//!                          | "(" [ Declarations ] CommandSequence ")"
//!                          | "{" [ Name ( "," Name )* ] "}"
//!
//!     A parenthesised block may open with local declarations, so `Declarations` is entered
//!     recursively with a scope depth. A `)` ends the innermost open scope; at depth 0 there is
//!     nothing to return to and the `)` becomes an error token.
//!
//! Recovery
//!
//!     Problems never stop the scan. Where a required token is missing, the token that opened the
//!     construct is converted into an error after the fact (an unclosed `(` or `{`, an `if`
//!     without `then`, a separator with nothing after it). Where the text at the cursor fits no
//!     production, it is consumed through [Scanner::consume_error], which always moves forward.
//!     A `(` nested more than [MAX_NESTING] levels deep becomes an error token and its contents
//!     are scanned at the current level.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::gp::highlighting::StyleClass;
use crate::gp::parsing::{ParseState, ParseStatus, Tokenizer};
use crate::gp::scanning::{PatternTable, Scanner};
use crate::gp::token::{Lexeme, TokenSequence};

/// Token categories of the program language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProgramLexeme {
    Identifier,
    Keyword,
    /// An identifier upgraded once it turns out to be followed by `=`.
    Declaration,
    DeclarationOperator,
    DeclarationSeparator,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Repeat,
    StatementSeparator,
    RuleSeparator,
    Comment,
    Error,
}

/// Words that can never name a rule, macro or declaration.
pub const RESERVED_WORDS: &[&str] = &["if", "then", "else", "try", "or", "skip", "fail"];

static PATTERNS: Lazy<PatternTable<ProgramLexeme>> = Lazy::new(|| {
    use ProgramLexeme::*;
    PatternTable::new(&[
        (Keyword, r"(?:if|then|else|try|or|skip|fail)\b"),
        (Identifier, r"[A-Za-z_][A-Za-z0-9_]*"),
        (DeclarationOperator, r"="),
        (DeclarationSeparator, r"\."),
        (OpenParen, r"\("),
        (CloseParen, r"\)"),
        (OpenBrace, r"\{"),
        (CloseBrace, r"\}"),
        (Repeat, r"!"),
        (StatementSeparator, r";"),
        (RuleSeparator, r","),
    ])
});

/// Parenthesised blocks nested deeper than this are not descended into.
pub const MAX_NESTING: usize = 64;

/// `name =` at the cursor, possibly with whitespace in between.
static DECLARATION_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=").unwrap());

impl Lexeme for ProgramLexeme {
    const COMMENT: Self = ProgramLexeme::Comment;
    const ERROR: Self = ProgramLexeme::Error;

    fn patterns() -> &'static PatternTable<Self> {
        &PATTERNS
    }

    fn name(self) -> &'static str {
        match self {
            ProgramLexeme::Identifier => "Identifier",
            ProgramLexeme::Keyword => "Keyword",
            ProgramLexeme::Declaration => "Declaration",
            ProgramLexeme::DeclarationOperator => "DeclarationOperator",
            ProgramLexeme::DeclarationSeparator => "DeclarationSeparator",
            ProgramLexeme::OpenParen => "OpenParen",
            ProgramLexeme::CloseParen => "CloseParen",
            ProgramLexeme::OpenBrace => "OpenBrace",
            ProgramLexeme::CloseBrace => "CloseBrace",
            ProgramLexeme::Repeat => "Repeat",
            ProgramLexeme::StatementSeparator => "StatementSeparator",
            ProgramLexeme::RuleSeparator => "RuleSeparator",
            ProgramLexeme::Comment => "Comment",
            ProgramLexeme::Error => "Error",
        }
    }

    fn style_class(self) -> StyleClass {
        match self {
            ProgramLexeme::Identifier => StyleClass::Identifier,
            ProgramLexeme::Declaration => StyleClass::Declaration,
            ProgramLexeme::Comment => StyleClass::Comment,
            ProgramLexeme::Error => StyleClass::Error,
            ProgramLexeme::Keyword
            | ProgramLexeme::DeclarationOperator
            | ProgramLexeme::DeclarationSeparator
            | ProgramLexeme::OpenParen
            | ProgramLexeme::CloseParen
            | ProgramLexeme::OpenBrace
            | ProgramLexeme::CloseBrace
            | ProgramLexeme::Repeat
            | ProgramLexeme::StatementSeparator
            | ProgramLexeme::RuleSeparator => StyleClass::Keyword,
        }
    }
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Whether `text` opens with `name =` for a name that is not reserved.
fn declaration_head(text: &str) -> bool {
    DECLARATION_HEAD
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or(false, |name| !is_reserved(name.as_str()))
}

/// Tokenizer for control programs.
#[derive(Debug, Default)]
pub struct ProgramParser {
    state: ParseState<ProgramLexeme>,
}

impl ProgramParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full scans performed so far.
    pub fn passes(&self) -> usize {
        self.state.passes()
    }
}

impl Tokenizer for ProgramParser {
    type Lexeme = ProgramLexeme;

    fn set_text(&mut self, text: &str) {
        self.state.set_text(text);
    }

    fn text(&self) -> &str {
        self.state.text()
    }

    fn parse(&mut self) -> ParseStatus {
        self.state.run(|scanner| Grammar { scanner }.declarations(0))
    }

    fn tokens(&self) -> &TokenSequence<ProgramLexeme> {
        self.state.tokens()
    }
}

/// Recursive-descent productions over one scanner pass.
struct Grammar<'a> {
    scanner: &'a mut Scanner<ProgramLexeme>,
}

impl Grammar<'_> {
    /// Declarations of one scope. At depth 0 this runs to the end of the input.
    fn declarations(&mut self, depth: usize) {
        loop {
            self.scanner.skip_trivia();
            if self.scanner.at_end() {
                return;
            }
            if self.scanner.peek(ProgramLexeme::CloseParen) {
                if self.exit_scope(depth) {
                    return;
                }
                continue;
            }
            if depth > 0 && !self.starts_declaration() {
                return;
            }
            self.declaration(depth);
        }
    }

    fn declaration(&mut self, depth: usize) {
        self.scanner.skip_trivia();
        let Some(name) = self.scanner.consume(ProgramLexeme::Identifier) else {
            self.scanner.consume_error("Expecting a declaration.");
            return;
        };
        let name_text = self.scanner.token(name).text.clone();

        self.scanner.skip_trivia();
        let has_operator = self.scanner.consume(ProgramLexeme::DeclarationOperator).is_some();
        if !has_operator {
            self.scanner.mark_error(
                name,
                format!("Expecting '=' after declaration name '{}'.", name_text),
            );
        } else if is_reserved(&name_text) {
            self.scanner.mark_error(
                name,
                format!(
                    "Reserved keyword '{}' cannot be used as a declaration name.",
                    name_text
                ),
            );
        } else {
            self.scanner.recategorize(name, ProgramLexeme::Declaration);
        }

        let commands = self.command_sequence(depth);
        self.scanner.skip_trivia();
        if let Some(separator) = self.scanner.consume(ProgramLexeme::DeclarationSeparator) {
            if has_operator && commands == 0 {
                self.scanner.mark_error(
                    separator,
                    format!("Empty declaration '{}': expecting a command before '.'.", name_text),
                );
            }
        }
    }

    /// Commands separated by `;`. Returns how many commands were parsed.
    fn command_sequence(&mut self, depth: usize) -> usize {
        let mut commands = 0;
        loop {
            self.scanner.skip_trivia();
            if self.scanner.at_end() || self.scanner.peek(ProgramLexeme::DeclarationSeparator) {
                return commands;
            }
            if self.scanner.peek(ProgramLexeme::CloseParen) {
                if self.exit_scope(depth) {
                    return commands;
                }
                continue;
            }
            if let Some(separator) = self.scanner.consume(ProgramLexeme::StatementSeparator) {
                self.scanner
                    .mark_error(separator, "Expecting a command before ';'.");
                continue;
            }

            self.command(depth);
            commands += 1;

            self.scanner.skip_trivia();
            if let Some(separator) = self.scanner.consume(ProgramLexeme::StatementSeparator) {
                self.scanner.skip_trivia();
                if self.at_sequence_end() {
                    self.scanner.mark_error(
                        separator,
                        "Dangling ';': expecting a command after the separator.",
                    );
                }
                continue;
            }
            if !self.at_sequence_end() {
                self.scanner
                    .consume_error("Expecting ';' or '.' after a command.");
            }
        }
    }

    fn command(&mut self, depth: usize) {
        self.scanner.skip_trivia();

        if let Some(keyword) = self.consume_keyword("if") {
            if !self.block(depth) {
                self.scanner
                    .mark_error(keyword, "Expecting a condition after 'if'.");
                return;
            }
            self.scanner.skip_trivia();
            let Some(then) = self.consume_keyword("then") else {
                self.scanner
                    .mark_error(keyword, "Expecting 'then' after the 'if' condition.");
                return;
            };
            if !self.block(depth) {
                self.scanner
                    .mark_error(then, "Expecting a command after 'then'.");
                return;
            }
            self.else_branch(depth);
            return;
        }

        if let Some(keyword) = self.consume_keyword("try") {
            if !self.block(depth) {
                self.scanner
                    .mark_error(keyword, "Expecting a command after 'try'.");
                return;
            }
            self.scanner.skip_trivia();
            if let Some(then) = self.consume_keyword("then") {
                if !self.block(depth) {
                    self.scanner
                        .mark_error(then, "Expecting a command after 'then'.");
                    return;
                }
                self.else_branch(depth);
            }
            return;
        }

        if !self.block(depth) {
            self.scanner.consume_error("Expecting a command.");
            return;
        }
        self.scanner.skip_trivia();
        if self.scanner.consume(ProgramLexeme::Repeat).is_some() {
            return;
        }
        if let Some(or) = self.consume_keyword("or") {
            if !self.block(depth) {
                self.scanner
                    .mark_error(or, "Expecting a command after 'or'.");
            }
        }
    }

    fn else_branch(&mut self, depth: usize) {
        self.scanner.skip_trivia();
        if let Some(keyword) = self.consume_keyword("else") {
            if !self.block(depth) {
                self.scanner
                    .mark_error(keyword, "Expecting a command after 'else'.");
            }
        }
    }

    /// Returns `false`, without consuming anything, when no block starts at the cursor.
    fn block(&mut self, depth: usize) -> bool {
        self.scanner.skip_trivia();
        if self.scanner.at_end() {
            return false;
        }

        let keyword = self
            .scanner
            .peek_text(ProgramLexeme::Keyword)
            .map(str::to_string);
        if let Some(word) = keyword {
            match word.as_str() {
                "skip" | "fail" => {
                    self.scanner.consume(ProgramLexeme::Keyword);
                }
                "if" | "try" => {
                    let message = format!(
                        "Reserved keyword '{}' cannot be used as a rule or macro name.",
                        word
                    );
                    if let Some(index) = self.scanner.consume(ProgramLexeme::Keyword) {
                        self.scanner.mark_error(index, message);
                    }
                }
                // then / else / or belong to the enclosing command.
                _ => return false,
            }
            return true;
        }

        if let Some(open) = self.scanner.consume(ProgramLexeme::OpenParen) {
            if depth >= MAX_NESTING {
                self.scanner.mark_error(
                    open,
                    format!("Nesting too deep: blocks may nest at most {} levels.", MAX_NESTING),
                );
                return true;
            }
            let inner = depth + 1;
            if self.starts_declaration() {
                self.declarations(inner);
            }
            let mut commands = self.command_sequence(inner);
            while self.stray_separator() {
                commands += self.command_sequence(inner);
            }
            self.scanner.skip_trivia();
            match self.scanner.consume(ProgramLexeme::CloseParen) {
                Some(close) if commands == 0 => {
                    self.scanner
                        .mark_error(close, "Empty block: expecting a command before ')'.");
                }
                Some(_) => {}
                None => {
                    self.scanner.mark_error(
                        open,
                        "Unmatched parenthesis: expecting ')' to close this block.",
                    );
                }
            }
            return true;
        }

        if let Some(open) = self.scanner.consume(ProgramLexeme::OpenBrace) {
            self.rule_set();
            self.scanner.skip_trivia();
            if self.scanner.consume(ProgramLexeme::CloseBrace).is_none() {
                self.scanner.mark_error(
                    open,
                    "Unmatched brace: expecting '}' to close this rule set.",
                );
            }
            return true;
        }

        self.scanner.consume(ProgramLexeme::Identifier).is_some()
    }

    /// Comma-separated rule names, up to (not including) the closing brace.
    fn rule_set(&mut self) {
        loop {
            self.scanner.skip_trivia();
            if self.at_rule_set_end() {
                return;
            }
            let Some(rule) = self.scanner.consume(ProgramLexeme::Identifier) else {
                self.scanner.consume_error("Expecting a rule name.");
                continue;
            };
            let rule_text = self.scanner.token(rule).text.clone();
            if is_reserved(&rule_text) {
                self.scanner.mark_error(
                    rule,
                    format!(
                        "Reserved keyword '{}' cannot be used as a rule name.",
                        rule_text
                    ),
                );
            }

            self.scanner.skip_trivia();
            if let Some(separator) = self.scanner.consume(ProgramLexeme::RuleSeparator) {
                self.scanner.skip_trivia();
                if !self.scanner.peek(ProgramLexeme::Identifier) {
                    self.scanner.mark_error(
                        separator,
                        "Dangling ',': expecting a rule name after the separator.",
                    );
                }
                continue;
            }
            if !self.at_rule_set_end() {
                self.scanner
                    .consume_error("Expecting ',' or '}' in a rule set.");
            }
        }
    }

    /// Consumes a `.` that sits inside an open block as an error and returns `true`. A `.`
    /// followed by another declaration, or by the end of the input, is left alone: it ends the
    /// enclosing declaration and the block stays unclosed.
    fn stray_separator(&mut self) -> bool {
        self.scanner.skip_trivia();
        if !self.scanner.peek(ProgramLexeme::DeclarationSeparator) {
            return false;
        }
        let after = self.scanner.rest()[1..].trim_start();
        if after.is_empty() || declaration_head(after) {
            return false;
        }
        if let Some(separator) = self.scanner.consume(ProgramLexeme::DeclarationSeparator) {
            self.scanner
                .mark_error(separator, "Unexpected '.' inside a block: expecting ')'.");
        }
        true
    }

    /// Handles a `)` at the cursor. Returns `true` when it closes an open scope (the caller
    /// returns and leaves it to the block); otherwise consumes it as an error.
    fn exit_scope(&mut self, depth: usize) -> bool {
        if depth > 0 {
            return true;
        }
        if let Some(index) = self.scanner.consume(ProgramLexeme::CloseParen) {
            self.scanner
                .mark_error(index, "Unmatched parenthesis: no parent scope to exit to.");
        }
        false
    }

    fn consume_keyword(&mut self, word: &str) -> Option<usize> {
        if self.scanner.peek_text(ProgramLexeme::Keyword) == Some(word) {
            self.scanner.consume(ProgramLexeme::Keyword)
        } else {
            None
        }
    }

    fn starts_declaration(&self) -> bool {
        declaration_head(self.scanner.rest())
    }

    fn at_sequence_end(&self) -> bool {
        self.scanner.at_end()
            || self.scanner.peek(ProgramLexeme::DeclarationSeparator)
            || self.scanner.peek(ProgramLexeme::CloseParen)
    }

    fn at_rule_set_end(&self) -> bool {
        self.at_sequence_end()
            || self.scanner.peek(ProgramLexeme::CloseBrace)
            || self.scanner.peek(ProgramLexeme::StatementSeparator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProgramLexeme::*;

    fn parse(text: &str) -> TokenSequence<ProgramLexeme> {
        let mut parser = ProgramParser::new();
        parser.parse_text(text);
        parser.tokens().clone()
    }

    fn categories(text: &str) -> Vec<ProgramLexeme> {
        parse(text).iter().map(|token| token.category).collect()
    }

    #[test]
    fn test_declaration_is_upgraded_from_identifier() {
        assert_eq!(
            categories("main = skip."),
            vec![Declaration, DeclarationOperator, Keyword, DeclarationSeparator]
        );
    }

    #[test]
    fn test_local_declarations_inside_block() {
        let tokens = parse("main = (m = r1. m!).");
        assert!(!tokens.has_errors(), "{}", tokens);
        assert_eq!(tokens[3].category, Declaration);
        assert_eq!(tokens[3].text, "m");
    }

    #[test]
    fn test_unmatched_close_at_top_level() {
        let tokens = parse("main = skip).");
        let error = tokens.errors().next().unwrap();
        assert_eq!(error.text, ")");
        assert_eq!(
            error.description.as_deref(),
            Some("Unmatched parenthesis: no parent scope to exit to.")
        );
        assert_eq!(tokens.last().unwrap().category, DeclarationSeparator);
    }

    #[test]
    fn test_missing_operator_keeps_parsing_body() {
        let tokens = parse("main skip.");
        assert!(tokens[0].is_error());
        assert_eq!(tokens[1].category, Keyword);
        assert_eq!(tokens.errors().count(), 1);
    }

    #[test]
    fn test_empty_declaration_marks_separator() {
        let tokens = parse("main = .");
        assert!(tokens[2].is_error());
        assert_eq!(tokens[2].text, ".");
    }

    #[test]
    fn test_reserved_word_as_declaration_name() {
        let tokens = parse("try = skip.");
        assert!(tokens[0].is_error());
        assert!(tokens[0]
            .description
            .as_deref()
            .unwrap()
            .contains("Reserved keyword 'try'"));
    }

    #[test]
    fn test_reserved_helpers() {
        assert!(is_reserved("skip"));
        assert!(!is_reserved("main"));
    }
}
