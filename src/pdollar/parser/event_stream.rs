//! Event-Stream Parser
//!
//! An event stream is a live session: strokes arrive as `MOUSEDOWN` ...
//! `MOUSEUP` blocks, and every `RECOGNIZE` asks for the strokes seen since the
//! previous `RECOGNIZE` to be classified.
//!
//!     MOUSEDOWN
//!     0,0
//!     MOUSEUP
//!     RECOGNIZE      <- query 1: [(0,0,#1)]
//!     MOUSEDOWN
//!     5,5
//!     MOUSEUP
//!     RECOGNIZE      <- query 2: [(5,5,#1)]
//!
//! Unlike templates there is no recovery: the first fatal error ends the
//! whole stream.

use super::lines::NumberedLines;
use super::state::{Step, StrokeAssembler};
use super::ParseError;
use crate::pdollar::geometry::Gesture;
use crate::pdollar::lexer::TokenSet;
use crate::pdollar::recognizer::{Classifier, RecognitionResult};
use std::io::BufRead;
use tracing::debug;

/// Iterator over the query gestures of an event stream.
///
/// Yields one gesture per `RECOGNIZE`. After the first error, or at end of
/// input, it yields `None` forever.
pub struct EventStream<R> {
    lines: NumberedLines<R>,
    machine: StrokeAssembler,
    finished: bool,
}

impl<R: BufRead> EventStream<R> {
    pub fn new(reader: R) -> Self {
        EventStream {
            lines: NumberedLines::new(reader),
            machine: StrokeAssembler::new(TokenSet::EVENT_STREAM),
            finished: false,
        }
    }

    /// Number of the last line read
    pub fn line(&self) -> usize {
        self.lines.line()
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<Gesture, ParseError>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl<R: BufRead> Iterator for EventStream<R> {
    type Item = Result<Gesture, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(item) = self.lines.next() {
            let (line, text) = match item {
                Ok(read) => read,
                Err(error) => return self.fail(error),
            };
            match self.machine.feed(&text, line) {
                Ok(Step::Continue) => {}
                Ok(Step::Complete(query)) => {
                    debug!(line, points = query.len(), "recognition requested");
                    return Some(Ok(query));
                }
                Err(error) => return self.fail(error),
            }
        }

        self.finished = true;
        if !self.machine.points().is_empty() {
            debug!(
                points = self.machine.points().len(),
                "end of stream, discarding strokes never recognized"
            );
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for EventStream<R> {}

/// Classify every query in a stream against `templates`, handing each result
/// to `sink` as soon as it is available.
///
/// Returns the number of recognitions performed. A fatal error stops the
/// stream; results already passed to `sink` stand.
pub fn recognize_stream<R, C, F>(
    reader: R,
    classifier: &C,
    templates: &[Gesture],
    mut sink: F,
) -> Result<usize, ParseError>
where
    R: BufRead,
    C: Classifier + ?Sized,
    F: FnMut(&Gesture, RecognitionResult),
{
    let mut count = 0;
    for query in EventStream::new(reader) {
        let query = query?;
        let result = classifier.classify(&query, templates);
        sink(&query, result);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdollar::geometry::Point;

    #[test]
    fn test_recognize_resets_buffer() {
        let source = "MOUSEDOWN\n0,0\nMOUSEUP\nRECOGNIZE\nMOUSEDOWN\n5,5\nMOUSEUP\nRECOGNIZE\n";
        let queries: Vec<Gesture> = EventStream::new(source.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            queries,
            vec![
                Gesture::unnamed(vec![Point::new(0, 0, 1)]),
                Gesture::unnamed(vec![Point::new(5, 5, 1)]),
            ]
        );
    }

    #[test]
    fn test_error_fuses_stream() {
        let source = "MOUSEDOWN\n1,1\nMOUSEUP\nRECOGNIZE\nMOUSEDOWN\nMOUSEDOWN\nRECOGNIZE\n";
        let mut stream = EventStream::new(source.as_bytes());
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, ParseError::StrokeAlreadyOpen { line: 6, .. }));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_trailing_strokes_are_not_emitted() {
        let source = "MOUSEDOWN\n1,1\nMOUSEUP\n";
        let mut stream = EventStream::new(source.as_bytes());
        assert!(stream.next().is_none());
        assert_eq!(stream.line(), 3);
    }

    #[test]
    fn test_recognize_on_empty_buffer() {
        let queries: Vec<Gesture> = EventStream::new("RECOGNIZE\n".as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(queries, vec![Gesture::unnamed(vec![])]);
    }

    struct Echo;

    impl Classifier for Echo {
        fn classify(&self, query: &Gesture, _templates: &[Gesture]) -> RecognitionResult {
            RecognitionResult {
                name: format!("{} points", query.len()),
                score: 1.0,
            }
        }
    }

    #[test]
    fn test_recognize_stream_feeds_classifier() {
        let source = "MOUSEDOWN\n1,1\n2,2\nMOUSEUP\nRECOGNIZE\nRECOGNIZE\n";
        let mut names = Vec::new();
        let count = recognize_stream(source.as_bytes(), &Echo, &[], |_, result| {
            names.push(result.name)
        })
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(names, vec!["2 points", "0 points"]);
    }

    #[test]
    fn test_recognize_stream_keeps_results_before_error() {
        let source = "MOUSEDOWN\n1,1\nMOUSEUP\nRECOGNIZE\nMOUSEUP\n";
        let mut seen = 0;
        let err = recognize_stream(source.as_bytes(), &Echo, &[], |_, _| seen += 1).unwrap_err();
        assert_eq!(seen, 1);
        assert!(matches!(err, ParseError::StrokeNotOpen { line: 5, .. }));
    }
}
