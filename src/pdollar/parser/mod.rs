//! Stroke-assembly parser
//!
//! Both gesture formats are read line by line, forward only, by one state
//! machine ([`StrokeAssembler`]) configured with a [`TokenSet`]:
//!
//! - [`template`] reads a named gesture definition to end of input.
//! - [`event_stream`] reads a live session and yields a query gesture at every
//!   `RECOGNIZE` marker.
//!
//! Line numbers are carried explicitly by [`NumberedLines`] and handed to each
//! step, so every error reports the 1-based line it happened on.
//!
//! [`TokenSet`]: crate::pdollar::lexer::TokenSet

pub mod event_stream;
pub mod lines;
pub mod state;
pub mod template;

pub use event_stream::{recognize_stream, EventStream};
pub use lines::NumberedLines;
pub use state::{Step, StrokeAssembler, StrokeState};
pub use template::{
    parse_template, parse_template_str, SkippedTemplate, TemplateParser, TemplateSet,
};

use crate::pdollar::lexer::{DecodeError, Keyword};
use std::io;
use std::path::PathBuf;

/// Fatal errors that abort the current template or stream
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A line that is neither a keyword nor a valid point
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("line {line}: `{keyword}` started a stroke while another is open")]
    StrokeAlreadyOpen { line: usize, keyword: Keyword },

    #[error("line {line}: `{keyword}` ended a stroke that was never opened")]
    StrokeNotOpen { line: usize, keyword: Keyword },

    /// End of input reached with a stroke still open; `line` is where it opened
    #[error("line {line}: stroke is never closed before end of input")]
    UnterminatedStroke { line: usize },

    #[error("template is empty")]
    EmptyTemplate,

    #[error("line 1: template name is blank")]
    MissingName,

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: read failed: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// The 1-based line the error refers to, when there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Decode(err) => Some(err.line),
            ParseError::StrokeAlreadyOpen { line, .. }
            | ParseError::StrokeNotOpen { line, .. }
            | ParseError::UnterminatedStroke { line }
            | ParseError::Io { line, .. } => Some(*line),
            ParseError::MissingName => Some(1),
            ParseError::EmptyTemplate | ParseError::Open { .. } => None,
        }
    }

    /// True for start-while-open, end-while-idle and unterminated strokes
    pub fn is_sequencing(&self) -> bool {
        matches!(
            self,
            ParseError::StrokeAlreadyOpen { .. }
                | ParseError::StrokeNotOpen { .. }
                | ParseError::UnterminatedStroke { .. }
        )
    }
}
