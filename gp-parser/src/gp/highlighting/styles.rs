//! Highlight styles
//!
//!     Two layers, kept apart so that the grouping of categories survives any colour scheme:
//!
//!         - Semantic layer: [StyleClass]. Every lexeme of every language maps to exactly one
//!           class (see `Lexeme::style_class`). Categories that must look alike share a class;
//!           all operators, parentheses, braces and separators use [StyleClass::Keyword].
//!         - Presentation layer: [HighlightStyles], one [Style] per class. This is the part the
//!           user configures; the defaults below are only a starting point.
//!
//!     Defaults:
//!
//!         default         no colour
//!         identifier      #000080
//!         keyword         #7f0055 bold
//!         number          #098658
//!         quoted_string   #a31515
//!         comment         #3f7f5f italic
//!         declaration     #0000c0 bold
//!         error           #c00000 on #ffe0e0, underlined

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic highlight group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    Default,
    Identifier,
    Keyword,
    Number,
    QuotedString,
    Comment,
    Declaration,
    Error,
}

pub const STYLE_CLASSES: &[StyleClass] = &[
    StyleClass::Default,
    StyleClass::Identifier,
    StyleClass::Keyword,
    StyleClass::Number,
    StyleClass::QuotedString,
    StyleClass::Comment,
    StyleClass::Declaration,
    StyleClass::Error,
];

impl StyleClass {
    /// Configuration key of this class.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::Default => "default",
            StyleClass::Identifier => "identifier",
            StyleClass::Keyword => "keyword",
            StyleClass::Number => "number",
            StyleClass::QuotedString => "quoted_string",
            StyleClass::Comment => "comment",
            StyleClass::Declaration => "declaration",
            StyleClass::Error => "error",
        }
    }
}

impl FromStr for StyleClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STYLE_CLASSES
            .iter()
            .copied()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| format!("unknown style class '{}'", s))
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RGB colour, written `#rrggbb` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("invalid colour '{}': expected #rrggbb", s))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("invalid colour '{}': expected #rrggbb", s))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Visual attributes applied to a text range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub const fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            background: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn on(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }
}

/// Presentation layer: the style drawn for each [StyleClass].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyles {
    pub default: Style,
    pub identifier: Style,
    pub keyword: Style,
    pub number: Style,
    pub quoted_string: Style,
    pub comment: Style,
    pub declaration: Style,
    pub error: Style,
}

impl Default for HighlightStyles {
    fn default() -> Self {
        Self {
            default: Style::default(),
            identifier: Style::fg(Color::rgb(0x00, 0x00, 0x80)),
            keyword: Style::fg(Color::rgb(0x7f, 0x00, 0x55)).bold(),
            number: Style::fg(Color::rgb(0x09, 0x86, 0x58)),
            quoted_string: Style::fg(Color::rgb(0xa3, 0x15, 0x15)),
            comment: Style::fg(Color::rgb(0x3f, 0x7f, 0x5f)).italic(),
            declaration: Style::fg(Color::rgb(0x00, 0x00, 0xc0)).bold(),
            error: Style::fg(Color::rgb(0xc0, 0x00, 0x00))
                .on(Color::rgb(0xff, 0xe0, 0xe0))
                .underline(),
        }
    }
}

impl HighlightStyles {
    pub fn style_for(&self, class: StyleClass) -> Style {
        match class {
            StyleClass::Default => self.default,
            StyleClass::Identifier => self.identifier,
            StyleClass::Keyword => self.keyword,
            StyleClass::Number => self.number,
            StyleClass::QuotedString => self.quoted_string,
            StyleClass::Comment => self.comment,
            StyleClass::Declaration => self.declaration,
            StyleClass::Error => self.error,
        }
    }

    /// Lookup by configuration key. Unknown keys are reported and get the default style.
    pub fn style_named(&self, name: &str) -> Style {
        match name.parse::<StyleClass>() {
            Ok(class) => self.style_for(class),
            Err(e) => {
                log::warn!("{}; using the default style", e);
                self.default
            }
        }
    }

    pub fn set(&mut self, class: StyleClass, style: Style) {
        let slot = match class {
            StyleClass::Default => &mut self.default,
            StyleClass::Identifier => &mut self.identifier,
            StyleClass::Keyword => &mut self.keyword,
            StyleClass::Number => &mut self.number,
            StyleClass::QuotedString => &mut self.quoted_string,
            StyleClass::Comment => &mut self.comment,
            StyleClass::Declaration => &mut self.declaration,
            StyleClass::Error => &mut self.error,
        };
        *slot = style;
    }
}
