//! Program parser: token output and structural recovery

use gp_parser::gp::parsing::ProgramLexeme::{self, *};
use gp_parser::gp::parsing::program::MAX_NESTING;
use gp_parser::gp::parsing::ProgramParser;
use gp_parser::gp::testing::{assert_tokens, render, tokenize};
use indoc::indoc;
use rstest::rstest;

fn parse(text: &str) -> gp_parser::gp::TokenSequence<ProgramLexeme> {
    tokenize::<ProgramParser>(text)
}

#[test]
fn test_minimal_declaration() {
    let tokens = parse("main = skip.");
    assert_tokens(&tokens).count(4).no_errors().categories(&[
        (Declaration, "main"),
        (DeclarationOperator, "="),
        (Keyword, "skip"),
        (DeclarationSeparator, "."),
    ]);
}

#[test]
fn test_repeat_after_rule_call() {
    let tokens = parse("main = foo ! .");
    assert_tokens(&tokens).no_errors().categories(&[
        (Declaration, "main"),
        (DeclarationOperator, "="),
        (Identifier, "foo"),
        (Repeat, "!"),
        (DeclarationSeparator, "."),
    ]);
}

#[test]
fn test_unterminated_block() {
    let tokens = parse("main = (");
    assert_tokens(&tokens)
        .count(3)
        .error_count(1)
        .token(0, |t| {
            t.category(Declaration).text("main");
        })
        .token(1, |t| {
            t.category(DeclarationOperator);
        })
        .token(2, |t| {
            t.is_error()
                .text("(")
                .span(7, 8)
                .description_starts_with("Unmatched parenthesis");
        });
}

#[rstest]
#[case::if_then_else("main = if r1 then r2 else r3.")]
#[case::try_then_else("main = try r1 then r2 else r3.")]
#[case::try_alone("main = try r1.")]
#[case::or_choice("main = r1 or r2.")]
#[case::rule_set("main = {r1, r2, r3}!.")]
#[case::sequence("main = r1; r2; fail.")]
#[case::nested_blocks("main = (r1; (r2!; r3))!.")]
#[case::local_declaration("main = (m = r1. m!; r2).")]
#[case::several_declarations("main = m!. m = {a, b}. n = skip.")]
#[case::with_comments("/* header */ main = r1 /* inline */ ; r2.")]
fn test_valid_programs_have_no_errors(#[case] text: &str) {
    let tokens = parse(text);
    assert_tokens(&tokens).no_errors();
}

#[rstest]
#[case::dangling_separator("main = r1;.", ";", "Dangling ';'")]
#[case::leading_separator("main = ; r1.", ";", "Expecting a command before ';'")]
#[case::dangling_comma("main = {r1,}.", ",", "Dangling ','")]
#[case::unclosed_brace("main = {r1, r2.", "{", "Unmatched brace")]
#[case::stray_close("main = r1. )", ")", "Unmatched parenthesis: no parent scope")]
#[case::missing_then("main = if r1.", "if", "Expecting 'then'")]
#[case::reserved_block("main = then.", "then", "Unexpected token then at position 7. Expecting a command.")]
#[case::reserved_rule("main = {r1, skip}.", "skip", "Reserved keyword 'skip'")]
#[case::missing_separator("main = r1 r2.", "r2", "Unexpected token r2 at position 10.")]
#[case::empty_body("main = .", ".", "Empty declaration 'main'")]
#[case::empty_block("main = ().", ")", "Empty block")]
#[case::separator_inside_block("main = (r1. r2).", ".", "Unexpected '.' inside a block")]
fn test_single_structural_error(#[case] text: &str, #[case] culprit: &str, #[case] message: &str) {
    let tokens = parse(text);
    assert_tokens(&tokens).error_count(1);
    let error = tokens.errors().next().unwrap();
    assert_eq!(error.text, culprit, "{}", render(&tokens));
    assert!(
        error.description.as_deref().unwrap().starts_with(message),
        "{:?}",
        error.description
    );
}

#[test]
fn test_block_left_open_before_next_declaration() {
    let tokens = parse("main = (r1.\nnext = skip.");
    assert_tokens(&tokens).error_count(1).token(2, |t| {
        t.is_error().text("(").description_starts_with("Unmatched parenthesis");
    });
    let next = tokens.iter().find(|token| token.text == "next").unwrap();
    assert_eq!(next.category, Declaration);
}

#[test]
fn test_deepest_allowed_nesting() {
    let text = format!("main = {}skip{}.", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_tokens(&parse(&text)).no_errors();
}

#[test]
fn test_deeply_nested_open_parens_terminate() {
    let opens = 100_000;
    let tokens = parse(&format!("main = {}", "(".repeat(opens)));
    assert_tokens(&tokens)
        .count(opens + 2)
        .error_count(opens)
        .token(2, |t| {
            t.description_starts_with("Unmatched parenthesis");
        })
        .token(MAX_NESTING + 1, |t| {
            t.description_starts_with("Unmatched parenthesis");
        })
        .token(MAX_NESTING + 2, |t| {
            t.text("(").description_starts_with("Nesting too deep");
        });
}

#[test]
fn test_multiline_program() {
    let text = indoc! {"
        /* Colour every node reachable from the root. */
        main = init; propagate!; if check then skip else fail.
        propagate = {grow, mark}.
    "};
    let tokens = parse(text);
    assert_tokens(&tokens)
        .no_errors()
        .token(0, |t| {
            t.category(Comment);
        })
        .token(1, |t| {
            t.category(Declaration).text("main");
        })
        .last(|t| {
            t.category(DeclarationSeparator);
        });
    let declarations: Vec<_> = tokens
        .iter()
        .filter(|token| token.category == Declaration)
        .map(|token| token.text.as_str())
        .collect();
    assert_eq!(declarations, vec!["main", "propagate"]);
}

#[test]
fn test_recovery_resumes_after_error() {
    let tokens = parse("main = r1 ? r2.\nnext = skip.");
    assert_tokens(&tokens).error_count(1);
    let next = tokens.iter().find(|token| token.text == "next").unwrap();
    assert_eq!(next.category, Declaration);
    assert_eq!(tokens.last().unwrap().category, DeclarationSeparator);
}

#[test]
fn test_unterminated_comment_is_one_token() {
    let tokens = parse("main = skip. /* to be continued");
    assert_tokens(&tokens).count(5).no_errors().last(|t| {
        t.category(Comment).text("/* to be continued");
    });
}

#[test]
fn test_render_snapshot() {
    let tokens = parse("main = (r1");
    insta::assert_snapshot!(render(&tokens).replace('\n', " | "), @"0..4 Declaration(main) | 5..6 DeclarationOperator(=) | 7..8 Error(() Unmatched parenthesis: expecting ')' to close this block. | 8..10 Identifier(r1)");
}
