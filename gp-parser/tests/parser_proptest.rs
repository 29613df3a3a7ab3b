//! Property-based tests for both parsers
//!
//! These check the scanning guarantees that hold for any input, valid or not:
//! - every parse terminates and ends at the end of the text
//! - tokens are ordered, non-overlapping and quote the source verbatim
//! - every non-whitespace character belongs to exactly one token
//! - parsing the same text twice is a no-op the second time
//! - a malformed character between valid tokens yields exactly one error token

use gp_parser::gp::highlighting::{highlight_lines, Highlighter};
use gp_parser::gp::parsing::{ConditionParser, ParseStatus, ProgramParser, Tokenizer};
use gp_parser::gp::token::{Lexeme, TokenSequence};
use proptest::prelude::*;

/// Text made mostly of GP fragments, with arbitrary characters mixed in.
fn gp_text_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("main".to_string()),
        Just("=".to_string()),
        Just(".".to_string()),
        Just(";".to_string()),
        Just(",".to_string()),
        Just("!".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("/*".to_string()),
        Just("*/".to_string()),
        Just("if".to_string()),
        Just("then".to_string()),
        Just("else".to_string()),
        Just("try".to_string()),
        Just("or".to_string()),
        Just("skip".to_string()),
        Just("-12".to_string()),
        Just("\"str\"".to_string()),
        Just("\n".to_string()),
        "[a-z][a-z0-9_]{0,5}",
        "[ \t]{1,3}",
        any::<char>().prop_map(|ch| ch.to_string()),
    ];
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

fn check_well_formed<L: Lexeme>(text: &str, tokens: &TokenSequence<L>) -> Result<(), TestCaseError> {
    let mut previous_end = 0;
    for token in tokens {
        prop_assert!(token.start >= previous_end, "overlap at {}", token);
        prop_assert!(token.start < token.end, "empty token {}", token);
        prop_assert_eq!(&text[token.start..token.end], token.text.as_str());
        prop_assert_eq!(token.description.is_some(), token.is_error());
        previous_end = token.end;
    }
    prop_assert!(previous_end <= text.len());

    // Gaps between tokens are whitespace only.
    let mut cursor = 0;
    for token in tokens {
        prop_assert!(
            text[cursor..token.start].chars().all(char::is_whitespace),
            "uncovered text {:?}",
            &text[cursor..token.start]
        );
        cursor = token.end;
    }
    prop_assert!(text[cursor..].chars().all(char::is_whitespace));
    Ok(())
}

proptest! {
    #[test]
    fn program_parse_covers_input(text in gp_text_strategy()) {
        let mut parser = ProgramParser::new();
        prop_assert_eq!(parser.parse_text(&text), ParseStatus::Reparsed);
        check_well_formed(&text, parser.tokens())?;
    }

    #[test]
    fn condition_parse_covers_input(text in gp_text_strategy()) {
        let mut parser = ConditionParser::new();
        parser.parse_text(&text);
        check_well_formed(&text, parser.tokens())?;
    }

    #[test]
    fn second_parse_is_a_no_op(text in gp_text_strategy()) {
        let mut parser = ProgramParser::new();
        parser.parse_text(&text);
        let first = parser.tokens().clone();
        prop_assert_eq!(parser.parse_text(&text), ParseStatus::Unchanged);
        prop_assert_eq!(parser.tokens(), &first);
        prop_assert_eq!(parser.passes(), 1);
    }

    #[test]
    fn highlight_ranges_stay_inside_their_line(text in gp_text_strategy()) {
        let mut parser = ProgramParser::new();
        parser.parse_text(&text);
        let blocks = highlight_lines(&Highlighter::default(), parser.tokens(), &text);
        for (block, line) in blocks.iter().zip(text.split('\n')) {
            let mut previous_end = 0;
            for range in &block.ranges {
                prop_assert!(range.start >= previous_end);
                prop_assert!(range.len > 0);
                prop_assert!(range.end() <= line.len());
                previous_end = range.end();
            }
        }
    }

    #[test]
    fn malformed_character_is_local(
        words in prop::collection::vec(
            prop_oneof![
                "v[a-z0-9_]{0,5}",
                "[0-9]{1,4}",
                Just("=".to_string()),
                Just("!=".to_string()),
                Just(">=".to_string()),
                Just("+".to_string()),
                Just(",".to_string()),
                Just("and".to_string()),
            ],
            1..12,
        ),
        position in any::<prop::sample::Index>(),
    ) {
        let valid = words.join(" ");
        let mut parser = ConditionParser::new();
        parser.parse_text(&valid);
        let expected: Vec<_> = parser
            .tokens()
            .iter()
            .map(|token| (token.category, token.text.clone()))
            .collect();
        prop_assert!(!parser.tokens().has_errors());

        let at = position.index(words.len() + 1);
        let mut broken = words.clone();
        broken.insert(at, "#".to_string());
        parser.parse_text(&broken.join(" "));

        let errors: Vec<_> = parser.tokens().errors().collect();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].text.as_str(), "#");
        let rest: Vec<_> = parser
            .tokens()
            .iter()
            .filter(|token| !token.is_error())
            .map(|token| (token.category, token.text.clone()))
            .collect();
        prop_assert_eq!(rest, expected);
    }
}
