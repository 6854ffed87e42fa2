//! Output formats for gestures
//!
//! [`to_template_string`] writes a gesture back in the template format, so
//! that parsing the result gives the same points back.
//! [`RecognitionRecord`] is the one-line JSON form of a recognition.

use crate::pdollar::geometry::Gesture;
use crate::pdollar::lexer::{Keyword, TokenSet};
use crate::pdollar::recognizer::RecognitionResult;
use serde::Serialize;

/// Name written for gestures that don't have one
pub const UNNAMED: &str = "unnamed";

/// Serialize a gesture in the template format.
///
/// Each run of consecutive points sharing a stroke index becomes one
/// `BEGIN` / `END` block. Points outside any stroke are written bare.
pub fn to_template_string(gesture: &Gesture) -> String {
    let TokenSet { start, end, .. } = TokenSet::TEMPLATE;
    let mut out = String::new();
    out.push_str(gesture.name().unwrap_or(UNNAMED));
    out.push('\n');

    let mut open: Option<u32> = None;
    for point in gesture.points() {
        if open != Some(point.stroke) {
            if open.is_some() {
                push_keyword(&mut out, end);
            }
            open = None;
            if !point.is_outside_stroke() {
                push_keyword(&mut out, start);
                open = Some(point.stroke);
            }
        }
        out.push_str(&format!("{},{}\n", point.x, point.y));
    }
    if open.is_some() {
        push_keyword(&mut out, end);
    }
    out
}

/// A recognition together with the size of the query it was made for
#[derive(Debug, Serialize)]
pub struct RecognitionRecord<'a> {
    #[serde(flatten)]
    pub result: &'a RecognitionResult,
    pub points: usize,
    pub strokes: u32,
}

impl<'a> RecognitionRecord<'a> {
    pub fn new(query: &Gesture, result: &'a RecognitionResult) -> Self {
        RecognitionRecord {
            result,
            points: query.len(),
            strokes: query.stroke_count(),
        }
    }

    /// Compact single-line JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn push_keyword(out: &mut String, keyword: Keyword) {
    out.push_str(keyword.as_str());
    out.push('\n');
}
