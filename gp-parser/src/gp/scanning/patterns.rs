//! Table-driven pattern dispatch
//!
//!     Every language lists its categories together with the regular expression that
//!     recognises them, in the order they must be tried. The scanner walks this table through a
//!     single dispatch loop instead of each parser carrying its own `match` over categories.
//!
//!     All patterns are anchored at the scanner cursor. A pattern that matches the empty
//!     string never counts as a match: every successful match must move the cursor.

use regex::Regex;

use crate::gp::token::Lexeme;

/// Ordered `(category, matcher)` pairs for one language.
pub struct PatternTable<L> {
    entries: Vec<(L, Regex)>,
}

impl<L: Lexeme> PatternTable<L> {
    /// Builds a table from unanchored pattern sources, in priority order.
    ///
    /// Tables are built once into statics from hard-coded sources, so an invalid pattern is a
    /// programming error and panics on first use.
    pub fn new(entries: &[(L, &str)]) -> Self {
        let entries = entries
            .iter()
            .map(|(category, source)| {
                let anchored = format!("^(?:{})", source);
                let regex = Regex::new(&anchored)
                    .unwrap_or_else(|e| panic!("invalid pattern for {:?}: {}", category, e));
                (*category, regex)
            })
            .collect();
        Self { entries }
    }

    /// The matcher registered for `category`.
    ///
    /// Categories without a pattern are reported: callers asking for them have a logic error,
    /// and answering "no match" keeps it from turning into a false positive.
    pub fn matcher(&self, category: L) -> Option<&Regex> {
        let found = self
            .entries
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map(|(_, regex)| regex);
        if found.is_none() {
            log::error!("no pattern registered for lexeme {:?}", category);
        }
        found
    }

    /// Length of the match of `category` at the start of `text`, if non-empty.
    pub fn match_len(&self, category: L, text: &str) -> Option<usize> {
        self.matcher(category)
            .and_then(|regex| regex.find(text))
            .map(|found| found.end())
            .filter(|len| *len > 0)
    }

    /// First category (in table order) accepted by `accept` that matches at the start of
    /// `text`, with the match length.
    pub fn dispatch(&self, text: &str, accept: impl Fn(L) -> bool) -> Option<(L, usize)> {
        self.entries
            .iter()
            .filter(|(category, _)| accept(*category))
            .find_map(|(category, regex)| {
                regex
                    .find(text)
                    .map(|found| found.end())
                    .filter(|len| *len > 0)
                    .map(|len| (*category, len))
            })
    }

    pub fn categories(&self) -> impl Iterator<Item = L> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }
}
