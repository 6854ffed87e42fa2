//! Point and gesture types
//!
//! A [`Gesture`] is an ordered run of [`Point`]s, each tagged with the stroke it
//! was drawn in. Stroke indices start at 1 for the first stroke of a gesture.
//! Index 0 is reserved for points that arrived while no stroke was open.

use std::fmt;

/// Stroke index given to points observed outside any stroke.
pub const NO_STROKE: u32 = 0;

/// A single sampled position, tagged with the stroke it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub stroke: u32,
}

impl Point {
    pub fn new(x: i32, y: i32, stroke: u32) -> Self {
        Point { x, y, stroke }
    }

    /// True when the point was recorded while no stroke was open
    pub fn is_outside_stroke(&self) -> bool {
        self.stroke == NO_STROKE
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, #{})", self.x, self.y, self.stroke)
    }
}

/// A multi-stroke drawing.
///
/// Templates carry a name; live queries built from an event stream don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    name: Option<String>,
    points: Vec<Point>,
}

impl Gesture {
    /// Build a named template gesture
    pub fn named<S: Into<String>>(name: S, points: Vec<Point>) -> Self {
        Gesture {
            name: Some(name.into()),
            points,
        }
    }

    /// Build an unnamed query gesture
    pub fn unnamed(points: Vec<Point>) -> Self {
        Gesture { name: None, points }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Highest stroke index seen, which equals the number of strokes opened
    /// for gestures built by the parser.
    pub fn stroke_count(&self) -> u32 {
        self.points
            .iter()
            .map(|p| p.stroke)
            .max()
            .unwrap_or(NO_STROKE)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} points, {} strokes)",
            self.name().unwrap_or("<query>"),
            self.len(),
            self.stroke_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_count_uses_highest_index() {
        let gesture = Gesture::named(
            "T",
            vec![
                Point::new(0, 0, 1),
                Point::new(1, 0, 1),
                Point::new(5, 5, 2),
            ],
        );
        assert_eq!(gesture.stroke_count(), 2);
        assert_eq!(gesture.len(), 3);
    }

    #[test]
    fn test_empty_gesture_has_no_strokes() {
        let gesture = Gesture::unnamed(vec![]);
        assert!(gesture.is_empty());
        assert_eq!(gesture.stroke_count(), 0);
        assert_eq!(gesture.name(), None);
    }

    #[test]
    fn test_display() {
        let gesture = Gesture::named("Circle", vec![Point::new(0, 0, 1)]);
        assert_eq!(gesture.to_string(), "Circle (1 points, 1 strokes)");
        assert!(Point::new(3, 4, 0).is_outside_stroke());
        assert_eq!(Point::new(3, -4, 2).to_string(), "(3, -4, #2)");
    }
}
