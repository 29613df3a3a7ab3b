//! Editor binding
//!
//!     [EditorBuffer] is what an editor widget holds per open document: one tokenizer and one
//!     highlighter. The host pushes text with `set_text`, asks for a `reparse` when it wants
//!     fresh tokens, then highlights its visible blocks. Hover diagnostics are answered from
//!     the same token sequence.
//!
//!     Parsing always completes before highlighting starts; the highlighter only ever sees a
//!     shared borrow of the tokens the last parse produced.

use crate::gp::highlighting::{BlockHighlight, BlockState, HighlightStyles, Highlighter};
use crate::gp::parsing::{ParseStatus, Tokenizer};
use crate::gp::token::{Token, TokenSequence};

#[derive(Debug, Default)]
pub struct EditorBuffer<P> {
    parser: P,
    highlighter: Highlighter,
}

impl<P: Tokenizer> EditorBuffer<P> {
    pub fn new(parser: P, styles: HighlightStyles) -> Self {
        Self {
            parser,
            highlighter: Highlighter::new(styles),
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.parser.set_text(text);
    }

    pub fn text(&self) -> &str {
        self.parser.text()
    }

    pub fn reparse(&mut self) -> ParseStatus {
        let status = self.parser.parse();
        if status == ParseStatus::Reparsed {
            log::debug!(
                "reparsed buffer: {} tokens, {} errors",
                self.parser.tokens().len(),
                self.parser.tokens().errors().count()
            );
        }
        status
    }

    pub fn tokens(&self) -> &TokenSequence<P::Lexeme> {
        self.parser.tokens()
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn set_styles(&mut self, styles: HighlightStyles) {
        self.highlighter.set_styles(styles);
    }

    pub fn highlight_block(
        &self,
        block_text: &str,
        block_start: usize,
        previous: BlockState,
    ) -> BlockHighlight {
        self.highlighter
            .highlight_block(self.parser.tokens(), block_text, block_start, previous)
    }

    /// The error token under `offset`, if any. Used for hover tooltips.
    pub fn diagnostic_at(&self, offset: usize) -> Option<&Token<P::Lexeme>> {
        self.parser
            .tokens()
            .token_at(offset)
            .filter(|token| token.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::parsing::ProgramParser;

    #[test]
    fn test_edit_cycle() {
        let mut buffer = EditorBuffer::new(ProgramParser::new(), HighlightStyles::default());
        buffer.set_text("main = skip.");
        assert_eq!(buffer.reparse(), ParseStatus::Reparsed);
        assert_eq!(buffer.reparse(), ParseStatus::Unchanged);
        assert!(buffer.diagnostic_at(0).is_none());

        buffer.set_text("main = (");
        assert_eq!(buffer.reparse(), ParseStatus::Reparsed);
        let diagnostic = buffer.diagnostic_at(7).unwrap();
        assert!(diagnostic
            .description
            .as_deref()
            .unwrap()
            .starts_with("Unmatched parenthesis"));
    }

    #[test]
    fn test_highlight_uses_last_parse() {
        let mut buffer: EditorBuffer<ProgramParser> = EditorBuffer::default();
        buffer.set_text("main = skip.");
        let before = buffer.highlight_block("main = skip.", 0, BlockState::Normal);
        assert!(before.ranges.is_empty());
        buffer.reparse();
        let after = buffer.highlight_block("main = skip.", 0, BlockState::Normal);
        assert_eq!(after.ranges.len(), 4);
    }
}
