//! # pdollar
//!
//! A stroke-assembly parser for pen gesture files, plus the point-cloud
//! recognizer that consumes the gestures it builds.
//!
//! Two line-oriented formats are understood:
//!
//! - template files: a name line followed by `BEGIN` ... `END` stroke blocks
//! - event streams: `MOUSEDOWN` ... `MOUSEUP` blocks with `RECOGNIZE` markers
//!
//! Both are driven by the same state machine, see [parser](pdollar::parser).

pub mod pdollar;

pub use pdollar::geometry::{Gesture, Point};
pub use pdollar::parser::{parse_template, parse_template_str, EventStream, ParseError};
pub use pdollar::recognizer::{Classifier, PointCloudRecognizer, RecognitionResult};
