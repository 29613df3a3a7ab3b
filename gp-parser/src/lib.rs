//! # gp-parser
//!
//! Tokenizing parsers for the GP graph-programming language, as used by the GP editor.
//!
//! File Layout
//!
//!     The editor needs tokens, not trees: every pass produces a flat, position-tagged token
//!     sequence that drives syntax highlighting and inline error marking. Both languages
//!     (control programs and rule conditions) share one scanner core, so the layout is:
//!
//!     src/gp
//!       ├── token        Token values and the token sequence
//!       ├── scanning     Scanner core and the table-driven pattern dispatch
//!       ├── parsing      Condition and program parsers (recursive descent)
//!       ├── highlighting Block-wise styling of a token sequence
//!       └── editing      Binding of a parser and a highlighter for an editor host
//!
//! For test helpers see the [testing module](gp::testing).

pub mod gp;
