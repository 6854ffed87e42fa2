//! Stroke Assembly State Machine
//!
//!     Idle --start--> InStroke --end--> Idle
//!
//! Each input line drives exactly one transition:
//!
//!     start while Idle        open stroke counter + 1
//!     start while InStroke    error: stroke already open
//!     end while InStroke      back to Idle
//!     end while Idle          error: stroke not open
//!     point while InStroke    buffered with the current stroke index
//!     point while Idle        buffered with stroke index 0
//!     completion (any state)  buffer drained into a query gesture, state reset
//!     blank line              ignored
//!
//! The machine never looks back at a previous line. What happens at end of
//! input is up to the caller (see the template and event stream parsers).

use super::ParseError;
use crate::pdollar::geometry::{Gesture, Point, NO_STROKE};
use crate::pdollar::lexer::{decode_point, LineKind, TokenSet};
use std::mem;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    /// A stroke is open; `opened_at` is the line of its start keyword
    InStroke { opened_at: usize },
}

/// Outcome of feeding one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// A completion keyword drained the buffer into this query gesture
    Complete(Gesture),
}

#[derive(Debug, Clone)]
pub struct StrokeAssembler {
    tokens: TokenSet,
    state: StrokeState,
    strokes_opened: u32,
    buffer: Vec<Point>,
}

impl StrokeAssembler {
    pub fn new(tokens: TokenSet) -> Self {
        StrokeAssembler {
            tokens,
            state: StrokeState::Idle,
            strokes_opened: 0,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn strokes_opened(&self) -> u32 {
        self.strokes_opened
    }

    pub fn points(&self) -> &[Point] {
        &self.buffer
    }

    /// Line of the start keyword of the stroke still open, if any
    pub fn open_stroke(&self) -> Option<usize> {
        match self.state {
            StrokeState::InStroke { opened_at } => Some(opened_at),
            StrokeState::Idle => None,
        }
    }

    /// Process one raw line. `line` is its 1-based number.
    pub fn feed(&mut self, raw: &str, line: usize) -> Result<Step, ParseError> {
        trace!(line, raw, "feed");
        match self.tokens.classify(raw) {
            LineKind::Blank => Ok(Step::Continue),
            LineKind::Start => self.open(line).map(|_| Step::Continue),
            LineKind::End => self.close(line).map(|_| Step::Continue),
            LineKind::Complete => Ok(Step::Complete(self.drain())),
            LineKind::Point(content) => {
                let (x, y) = decode_point(content, line)?;
                self.push(x, y, line);
                Ok(Step::Continue)
            }
        }
    }

    /// Empty the buffer into an unnamed gesture and return to the initial state.
    pub fn drain(&mut self) -> Gesture {
        if let StrokeState::InStroke { opened_at } = self.state {
            debug!(opened_at, "completion reached with a stroke still open");
        }
        let points = mem::take(&mut self.buffer);
        self.reset();
        Gesture::unnamed(points)
    }

    pub fn reset(&mut self) {
        self.state = StrokeState::Idle;
        self.strokes_opened = 0;
        self.buffer.clear();
    }

    /// Consume the machine, returning the buffered points
    pub fn into_points(self) -> Vec<Point> {
        self.buffer
    }

    fn open(&mut self, line: usize) -> Result<(), ParseError> {
        match self.state {
            StrokeState::InStroke { .. } => Err(ParseError::StrokeAlreadyOpen {
                line,
                keyword: self.tokens.start,
            }),
            StrokeState::Idle => {
                self.strokes_opened += 1;
                self.state = StrokeState::InStroke { opened_at: line };
                debug!(line, stroke = self.strokes_opened, "stroke opened");
                Ok(())
            }
        }
    }

    fn close(&mut self, line: usize) -> Result<(), ParseError> {
        match self.state {
            StrokeState::Idle => Err(ParseError::StrokeNotOpen {
                line,
                keyword: self.tokens.end,
            }),
            StrokeState::InStroke { .. } => {
                self.state = StrokeState::Idle;
                debug!(line, stroke = self.strokes_opened, "stroke closed");
                Ok(())
            }
        }
    }

    fn push(&mut self, x: i32, y: i32, line: usize) {
        let stroke = match self.state {
            StrokeState::InStroke { .. } => self.strokes_opened,
            StrokeState::Idle => {
                warn!(line, x, y, "point outside any stroke, tagged as stroke 0");
                NO_STROKE
            }
        };
        self.buffer.push(Point::new(x, y, stroke));
    }
}
