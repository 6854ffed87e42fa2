//! Lexer module for gesture files
//!
//! Classifies raw lines into control keywords, blank lines and point lines,
//! and decodes point lines into coordinate pairs. The parser drives these one
//! line at a time.

pub mod point;
pub mod tokens;

pub use point::{decode_point, DecodeError, DecodeFailure};
pub use tokens::{Keyword, LineKind, TokenSet};
