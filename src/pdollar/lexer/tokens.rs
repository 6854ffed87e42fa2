//! Control keywords and line classification
//!
//! Both gesture grammars share the same shape: a start keyword opens a stroke,
//! an end keyword closes it, and event streams add a completion keyword that
//! asks for the buffered gesture to be recognized. [`TokenSet`] names which
//! keywords play which role, so a single state machine serves both formats.
//!
//! Keywords are recognized with a logos lexer. A line is a keyword only when
//! the keyword spans the whole trimmed line; `BEGINX` or `END 1` are point
//! lines (and will fail to decode).

use logos::Logos;
use std::fmt;

/// Every control keyword understood by either grammar
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    #[token("BEGIN")]
    Begin,
    #[token("END")]
    End,
    #[token("MOUSEDOWN")]
    MouseDown,
    #[token("MOUSEUP")]
    MouseUp,
    #[token("RECOGNIZE")]
    Recognize,
}

impl Keyword {
    /// Match a trimmed line against the keyword table.
    pub fn from_line(line: &str) -> Option<Keyword> {
        let mut lexer = Keyword::lexer(line);
        let keyword = lexer.next()?.ok()?;
        if lexer.span().end != line.len() {
            return None;
        }
        Some(keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Begin => "BEGIN",
            Keyword::End => "END",
            Keyword::MouseDown => "MOUSEDOWN",
            Keyword::MouseUp => "MOUSEUP",
            Keyword::Recognize => "RECOGNIZE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single input line means under a given [`TokenSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty after trimming
    Blank,
    /// Opens a stroke
    Start,
    /// Closes a stroke
    End,
    /// Requests recognition of the buffered gesture
    Complete,
    /// Anything else: the trimmed text, to be decoded as a point
    Point(&'a str),
}

/// The keyword grammar a parse runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSet {
    pub start: Keyword,
    pub end: Keyword,
    pub completion: Option<Keyword>,
}

impl TokenSet {
    /// `BEGIN` / `END`, no completion marker
    pub const TEMPLATE: TokenSet = TokenSet {
        start: Keyword::Begin,
        end: Keyword::End,
        completion: None,
    };

    /// `MOUSEDOWN` / `MOUSEUP` / `RECOGNIZE`
    pub const EVENT_STREAM: TokenSet = TokenSet {
        start: Keyword::MouseDown,
        end: Keyword::MouseUp,
        completion: Some(Keyword::Recognize),
    };

    /// Classify one raw line. Keywords that belong to the other grammar are
    /// treated as point lines.
    pub fn classify<'a>(&self, raw: &'a str) -> LineKind<'a> {
        let line = raw.trim();
        if line.is_empty() {
            return LineKind::Blank;
        }

        match Keyword::from_line(line) {
            Some(k) if k == self.start => LineKind::Start,
            Some(k) if k == self.end => LineKind::End,
            Some(k) if Some(k) == self.completion => LineKind::Complete,
            _ => LineKind::Point(line),
        }
    }
}
