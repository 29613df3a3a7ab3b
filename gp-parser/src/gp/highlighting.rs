//! Highlighting adapter
//!
//!     Editors highlight text one block at a time (usually one line), in document order, and
//!     carry a small integer of state from each block to the next. The [Highlighter] maps the
//!     current [TokenSequence] onto such a block: every token overlapping the block contributes
//!     one [FormatRange], clipped to the block, styled by the token's [StyleClass].
//!
//! Block State
//!
//!     The state handed from block to block is [BlockState]. When the previous block ended
//!     inside an unterminated comment the next one starts in [BlockState::InComment]: the
//!     adapter first looks for the closing `*/` in the block text and styles everything up to
//!     it as comment, before falling back to the tokens. This keeps multi-line comments right
//!     even while the token sequence lags behind the latest edit.
//!
//! Offsets
//!
//!     Token offsets are byte offsets into the whole text; `block_start` is the byte offset of
//!     the block in that text. Ranges come back relative to the block start, in bytes.

pub mod styles;

pub use styles::{Color, HighlightStyles, Style, StyleClass, STYLE_CLASSES};

use serde::Serialize;

use crate::gp::scanning::COMMENT_CLOSE;
use crate::gp::token::{Lexeme, TokenSequence};

/// Per-block state carried from one block to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BlockState {
    #[default]
    Normal,
    InComment,
}

/// A styled sub-range of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRange {
    /// Byte offset relative to the block start.
    pub start: usize,
    pub len: usize,
    pub class: StyleClass,
    pub style: Style,
}

impl FormatRange {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Result of highlighting one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BlockHighlight {
    pub ranges: Vec<FormatRange>,
    pub state: BlockState,
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    styles: HighlightStyles,
}

impl Highlighter {
    pub fn new(styles: HighlightStyles) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &HighlightStyles {
        &self.styles
    }

    pub fn set_styles(&mut self, styles: HighlightStyles) {
        self.styles = styles;
    }

    pub fn style_for(&self, class: StyleClass) -> Style {
        self.styles.style_for(class)
    }

    /// Computes the styled ranges of the block `block_text` starting at byte `block_start`.
    pub fn highlight_block<L: Lexeme>(
        &self,
        tokens: &TokenSequence<L>,
        block_text: &str,
        block_start: usize,
        previous: BlockState,
    ) -> BlockHighlight {
        let block_end = block_start + block_text.len();
        let mut result = BlockHighlight::default();

        // Bytes at the start of the block already styled by the comment carried in.
        let mut covered = 0;
        if previous == BlockState::InComment {
            match block_text.find(COMMENT_CLOSE) {
                Some(close) => covered = close + COMMENT_CLOSE.len(),
                None => {
                    if !block_text.is_empty() {
                        result.ranges.push(self.range(0, block_text.len(), StyleClass::Comment));
                    }
                    result.state = BlockState::InComment;
                    return result;
                }
            }
            result.ranges.push(self.range(0, covered, StyleClass::Comment));
        }

        for token in tokens.overlapping(block_start..block_end) {
            let class = token.category.style_class();
            let runs_past_end = token.category == L::COMMENT && token.end > block_end;

            if covered == 0 && token.start <= block_start && token.end >= block_end {
                result.ranges.clear();
                if !block_text.is_empty() {
                    result.ranges.push(self.range(0, block_text.len(), class));
                }
                if runs_past_end {
                    result.state = BlockState::InComment;
                }
                return result;
            }

            let start = (token.start.max(block_start) - block_start).max(covered);
            let end = token.end.min(block_end) - block_start;
            if start < end {
                result.ranges.push(self.range(start, end - start, class));
            }
            if runs_past_end {
                result.state = BlockState::InComment;
            }
        }
        result
    }

    fn range(&self, start: usize, len: usize, class: StyleClass) -> FormatRange {
        FormatRange {
            start,
            len,
            class,
            style: self.styles.style_for(class),
        }
    }
}

/// Splits `text` into lines, pairing each with its byte offset. Line terminators are not part
/// of the returned blocks.
pub fn line_blocks(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line.strip_suffix('\r').unwrap_or(line))
    })
}

/// Highlights every line of `text` in order, threading the block state through.
pub fn highlight_lines<L: Lexeme>(
    highlighter: &Highlighter,
    tokens: &TokenSequence<L>,
    text: &str,
) -> Vec<BlockHighlight> {
    let mut state = BlockState::Normal;
    line_blocks(text)
        .map(|(start, line)| {
            let block = highlighter.highlight_block(tokens, line, start, state);
            state = block.state;
            block
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::parsing::{ConditionParser, ProgramParser, Tokenizer};

    fn program_tokens(text: &str) -> ProgramParser {
        let mut parser = ProgramParser::new();
        parser.parse_text(text);
        parser
    }

    fn classes(block: &BlockHighlight) -> Vec<(usize, usize, StyleClass)> {
        block
            .ranges
            .iter()
            .map(|range| (range.start, range.len, range.class))
            .collect()
    }

    #[test]
    fn test_ranges_are_clipped_and_relative() {
        let parser = program_tokens("main = skip.");
        let highlighter = Highlighter::default();
        // block "= ski"
        let block = highlighter.highlight_block(parser.tokens(), "= ski", 5, BlockState::Normal);
        assert_eq!(
            classes(&block),
            vec![(0, 1, StyleClass::Keyword), (2, 3, StyleClass::Keyword)]
        );
        assert_eq!(block.state, BlockState::Normal);
    }

    #[test]
    fn test_token_covering_block_returns_single_range() {
        let text = "/* one\ntwo\nthree */ main = skip.";
        let parser = program_tokens(text);
        let highlighter = Highlighter::default();
        let block = highlighter.highlight_block(parser.tokens(), "two", 7, BlockState::InComment);
        assert_eq!(classes(&block), vec![(0, 3, StyleClass::Comment)]);
        assert_eq!(block.state, BlockState::InComment);
    }

    #[test]
    fn test_comment_state_threads_through_lines() {
        let text = "/* one\ntwo */ main = skip.";
        let parser = program_tokens(text);
        let blocks = highlight_lines(&Highlighter::default(), parser.tokens(), text);
        assert_eq!(blocks[0].state, BlockState::InComment);
        assert_eq!(blocks[1].state, BlockState::Normal);
        assert_eq!(blocks[1].ranges[0].class, StyleClass::Comment);
        assert_eq!(blocks[1].ranges[0].len, 6);
        assert_eq!(
            blocks[1].ranges[1..].iter().map(|r| r.class).collect::<Vec<_>>(),
            vec![
                StyleClass::Declaration,
                StyleClass::Keyword,
                StyleClass::Keyword,
                StyleClass::Keyword
            ]
        );
    }

    #[test]
    fn test_carried_comment_wins_over_stale_tokens() {
        // Tokens for an older text where the block held no comment at all.
        let parser = program_tokens("main = skip.");
        let highlighter = Highlighter::default();
        let block = highlighter.highlight_block(parser.tokens(), "xx */ ma", 0, BlockState::InComment);
        assert_eq!(block.ranges[0].class, StyleClass::Comment);
        assert_eq!(block.ranges[0].len, 5);
        assert!(block.ranges[1..].iter().all(|range| range.start >= 5));
    }

    #[test]
    fn test_empty_line_inside_comment_keeps_state() {
        let highlighter = Highlighter::default();
        let parser = program_tokens("/*\n\n*/");
        let block = highlighter.highlight_block(parser.tokens(), "", 3, BlockState::InComment);
        assert!(block.ranges.is_empty());
        assert_eq!(block.state, BlockState::InComment);
    }

    #[test]
    fn test_operators_share_keyword_style() {
        let mut parser = ConditionParser::new();
        parser.parse_text("a >= 1");
        let highlighter = Highlighter::default();
        let block = highlighter.highlight_block(parser.tokens(), "a >= 1", 0, BlockState::Normal);
        assert_eq!(block.ranges[1].style, highlighter.style_for(StyleClass::Keyword));
        assert_eq!(block.ranges[2].class, StyleClass::Number);
    }

    #[test]
    fn test_line_blocks_offsets() {
        let lines: Vec<_> = line_blocks("ab\r\ncd\n").collect();
        assert_eq!(lines, vec![(0, "ab"), (4, "cd"), (7, "")]);
    }
}
