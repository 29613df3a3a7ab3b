//! Block highlighting driven through the editor binding

use gp_parser::gp::highlighting::{line_blocks, BlockState, HighlightStyles, StyleClass};
use gp_parser::gp::{ConditionParser, EditorBuffer, ParseStatus, ProgramParser, Tokenizer};
use indoc::indoc;

fn render_lines<P: Tokenizer>(buffer: &EditorBuffer<P>) -> String {
    let text = buffer.text().to_string();
    let mut state = BlockState::Normal;
    let mut lines = Vec::new();
    for (start, line) in line_blocks(&text) {
        let block = buffer.highlight_block(line, start, state);
        let ranges: Vec<_> = block
            .ranges
            .iter()
            .map(|range| format!("{}+{}:{}", range.start, range.len, range.class))
            .collect();
        lines.push(format!("[{}] {:?}", ranges.join(" "), block.state));
        state = block.state;
    }
    lines.join(" / ")
}

#[test]
fn test_multiline_comment_program() {
    let mut buffer = EditorBuffer::new(ProgramParser::new(), HighlightStyles::default());
    buffer.set_text(indoc! {"
        main = r1; /* first
        second */ r2."});
    assert_eq!(buffer.reparse(), ParseStatus::Reparsed);
    insta::assert_snapshot!(render_lines(&buffer), @"[0+4:declaration 5+1:keyword 7+2:identifier 9+1:keyword 11+8:comment] InComment / [0+9:comment 10+2:identifier 12+1:keyword] Normal");
}

#[test]
fn test_error_tokens_get_error_style() {
    let mut buffer = EditorBuffer::new(ConditionParser::new(), HighlightStyles::default());
    buffer.set_text("x = 1 # 2");
    buffer.reparse();
    insta::assert_snapshot!(render_lines(&buffer), @"[0+1:identifier 2+1:keyword 4+1:number 6+1:error 8+1:number] Normal");

    let block = buffer.highlight_block("x = 1 # 2", 0, BlockState::Normal);
    let error = &block.ranges[3];
    assert_eq!(error.class, StyleClass::Error);
    assert_eq!(error.style, buffer.highlighter().style_for(StyleClass::Error));
    assert!(error.style.underline);
}

#[test]
fn test_custom_styles_are_applied() {
    let mut styles = HighlightStyles::default();
    styles.keyword = styles.error;
    let mut buffer = EditorBuffer::new(ProgramParser::new(), styles.clone());
    buffer.set_text("main = skip.");
    buffer.reparse();
    let block = buffer.highlight_block("main = skip.", 0, BlockState::Normal);
    assert_eq!(block.ranges[2].class, StyleClass::Keyword);
    assert_eq!(block.ranges[2].style, styles.error);
}
