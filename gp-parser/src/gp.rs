//! Main module for gp parser functionality

pub mod editing;
pub mod highlighting;
pub mod parsing;
pub mod scanning;
pub mod testing;
pub mod token;

pub use editing::EditorBuffer;
pub use highlighting::{
    BlockHighlight, BlockState, Color, FormatRange, HighlightStyles, Highlighter, Style,
    StyleClass,
};
pub use parsing::{
    ConditionLexeme, ConditionParser, ParseStatus, ProgramLexeme, ProgramParser, Tokenizer,
};
pub use token::{Lexeme, Token, TokenSequence};
