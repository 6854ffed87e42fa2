//! Point-cloud gesture recognizer
//!
//! Implements the $P recognizer: gestures are treated as unordered clouds of
//! points, so stroke order and direction don't matter. Every gesture is first
//! normalized:
//!
//! 1. resampled to `n` points spaced evenly along its strokes
//! 2. scaled uniformly so its larger side spans 1.0
//! 3. translated so its centroid sits at the origin
//!
//! Matching then pairs each point of one cloud greedily with its nearest
//! unmatched point in the other, starting from several offsets and weighting
//! early matches more. The template with the smallest such distance wins.

use crate::pdollar::geometry::Gesture;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Number of points gestures are resampled to
pub const DEFAULT_SAMPLING_RESOLUTION: usize = 32;

/// Name reported when nothing could be compared
pub const NO_MATCH: &str = "No match";

const EPSILON: f64 = 0.50;

/// The best template for a query, with a score in `[0, 1]` (1 is identical)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionResult {
    pub name: String,
    pub score: f64,
}

impl RecognitionResult {
    pub fn no_match() -> Self {
        RecognitionResult {
            name: NO_MATCH.to_string(),
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.name != NO_MATCH
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.name, self.score)
    }
}

/// Picks the template a query gesture looks most like.
pub trait Classifier {
    fn classify(&self, query: &Gesture, templates: &[Gesture]) -> RecognitionResult;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CloudPoint {
    x: f64,
    y: f64,
    stroke: u32,
}

impl CloudPoint {
    fn distance(&self, other: &CloudPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A gesture normalized for matching
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<CloudPoint>,
}

impl PointCloud {
    /// Normalize a gesture. Returns `None` for a gesture without points.
    pub fn from_gesture(gesture: &Gesture, n: usize) -> Option<Self> {
        let raw: Vec<CloudPoint> = gesture
            .points()
            .iter()
            .map(|p| CloudPoint {
                x: f64::from(p.x),
                y: f64::from(p.y),
                stroke: p.stroke,
            })
            .collect();
        if raw.is_empty() || n == 0 {
            return None;
        }

        let mut points = resample(raw, n);
        scale(&mut points);
        translate_to_origin(&mut points);
        Some(PointCloud { points })
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    /// Greedy cloud distance, the smaller of both matching directions
    pub fn distance(&self, other: &PointCloud) -> f64 {
        let n = self.len().min(other.len());
        if n == 0 {
            return f64::INFINITY;
        }
        let step = ((n as f64).powf(1.0 - EPSILON).floor() as usize).max(1);

        (0..n)
            .step_by(step)
            .map(|start| {
                let forward = cloud_distance(&self.points, &other.points, n, start);
                let backward = cloud_distance(&other.points, &self.points, n, start);
                forward.min(backward)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

/// The $P recognizer
#[derive(Debug, Clone, Copy)]
pub struct PointCloudRecognizer {
    sampling_resolution: usize,
}

impl Default for PointCloudRecognizer {
    fn default() -> Self {
        PointCloudRecognizer {
            sampling_resolution: DEFAULT_SAMPLING_RESOLUTION,
        }
    }
}

impl PointCloudRecognizer {
    pub fn new(sampling_resolution: usize) -> Self {
        PointCloudRecognizer {
            sampling_resolution: sampling_resolution.max(1),
        }
    }
}

impl Classifier for PointCloudRecognizer {
    fn classify(&self, query: &Gesture, templates: &[Gesture]) -> RecognitionResult {
        let n = self.sampling_resolution;
        let Some(candidate) = PointCloud::from_gesture(query, n) else {
            debug!("empty query gesture, nothing to recognize");
            return RecognitionResult::no_match();
        };

        let mut best: Option<(&Gesture, f64)> = None;
        for template in templates {
            let Some(cloud) = PointCloud::from_gesture(template, n) else {
                continue;
            };
            let distance = candidate.distance(&cloud);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((template, distance));
            }
        }

        match best {
            Some((template, distance)) => {
                let result = RecognitionResult {
                    name: template.name().unwrap_or(NO_MATCH).to_string(),
                    score: ((2.0 - distance) / 2.0).max(0.0),
                };
                debug!(%result, distance, "query recognized");
                result
            }
            None => RecognitionResult::no_match(),
        }
    }
}

fn cloud_distance(a: &[CloudPoint], b: &[CloudPoint], n: usize, start: usize) -> f64 {
    let mut matched = vec![false; n];
    let mut sum = 0.0;
    let mut i = start;
    loop {
        let (index, min) = b[..n]
            .iter()
            .enumerate()
            .filter(|(j, _)| !matched[*j])
            .map(|(j, q)| (j, a[i].distance(q)))
            .fold((usize::MAX, f64::INFINITY), |acc, cur| {
                if cur.1 < acc.1 {
                    cur
                } else {
                    acc
                }
            });
        if index != usize::MAX {
            matched[index] = true;
        }
        let weight = 1.0 - ((i + n - start) % n) as f64 / n as f64;
        sum += weight * min;
        i = (i + 1) % n;
        if i == start {
            break;
        }
    }
    sum
}

fn path_length(points: &[CloudPoint]) -> f64 {
    points
        .windows(2)
        .filter(|w| w[0].stroke == w[1].stroke)
        .map(|w| w[0].distance(&w[1]))
        .sum()
}

/// Spread `n` points evenly along the strokes. Distance is only accumulated
/// between consecutive points of the same stroke.
fn resample(mut points: Vec<CloudPoint>, n: usize) -> Vec<CloudPoint> {
    let interval = path_length(&points) / (n.saturating_sub(1)).max(1) as f64;
    let mut resampled = Vec::with_capacity(n);
    resampled.push(points[0]);

    if interval > 0.0 {
        let mut accumulated = 0.0;
        let mut i = 1;
        while i < points.len() && resampled.len() < n {
            let (prev, cur) = (points[i - 1], points[i]);
            if cur.stroke == prev.stroke {
                let d = prev.distance(&cur);
                if accumulated + d >= interval && d > 0.0 {
                    let t = (interval - accumulated) / d;
                    let q = CloudPoint {
                        x: prev.x + t * (cur.x - prev.x),
                        y: prev.y + t * (cur.y - prev.y),
                        stroke: cur.stroke,
                    };
                    resampled.push(q);
                    // q becomes the start of the next segment
                    points.insert(i, q);
                    accumulated = 0.0;
                } else {
                    accumulated += d;
                }
            }
            i += 1;
        }
    }

    // rounding can leave us one short; degenerate gestures need padding
    let last = points[points.len() - 1];
    while resampled.len() < n {
        resampled.push(last);
    }
    resampled
}

fn scale(points: &mut [CloudPoint]) {
    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
        },
    );
    let size = (max_x - min_x).max(max_y - min_y);
    if size <= 0.0 {
        return;
    }
    for p in points.iter_mut() {
        p.x = (p.x - min_x) / size;
        p.y = (p.y - min_y) / size;
    }
}

fn translate_to_origin(points: &mut [CloudPoint]) {
    let count = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (cx, cy) = (sx / count, sy / count);
    for p in points.iter_mut() {
        p.x -= cx;
        p.y -= cy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdollar::geometry::Point;

    fn line(name: &str, from: (i32, i32), to: (i32, i32)) -> Gesture {
        let points = (0..=10)
            .map(|i| {
                Point::new(
                    from.0 + (to.0 - from.0) * i / 10,
                    from.1 + (to.1 - from.1) * i / 10,
                    1,
                )
            })
            .collect();
        Gesture::named(name, points)
    }

    fn plus(name: &str) -> Gesture {
        let mut points: Vec<Point> = (0..=10).map(|i| Point::new(i * 10, 50, 1)).collect();
        points.extend((0..=10).map(|i| Point::new(50, i * 10, 2)));
        Gesture::named(name, points)
    }

    #[test]
    fn test_resample_yields_requested_count() {
        let cloud = PointCloud::from_gesture(&plus("plus"), 32).unwrap();
        assert_eq!(cloud.len(), 32);
        let cloud = PointCloud::from_gesture(&line("l", (0, 0), (3, 0)), 64).unwrap();
        assert_eq!(cloud.len(), 64);
    }

    #[test]
    fn test_single_point_gesture_normalizes() {
        let gesture = Gesture::unnamed(vec![Point::new(5, 5, 1)]);
        let cloud = PointCloud::from_gesture(&gesture, 8).unwrap();
        assert_eq!(cloud.len(), 8);
        assert!(cloud.points.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }

    #[test]
    fn test_empty_gesture_has_no_cloud() {
        assert!(PointCloud::from_gesture(&Gesture::unnamed(vec![]), 32).is_none());
    }

    #[test]
    fn test_identical_gesture_scores_one() {
        let template = plus("plus");
        let query = Gesture::unnamed(template.points().to_vec());
        let result = PointCloudRecognizer::default().classify(&query, &[template]);
        assert_eq!(result.name, "plus");
        assert!((result.score - 1.0).abs() < 1e-9, "score {}", result.score);
    }

    #[test]
    fn test_picks_closest_template() {
        let templates = vec![line("horizontal", (0, 0), (100, 0)), plus("plus")];
        // a plus drawn larger and shifted still matches the plus
        let query: Vec<Point> = plus("q")
            .points()
            .iter()
            .map(|p| Point::new(p.x * 3 + 400, p.y * 3 - 20, p.stroke))
            .collect();
        let result = PointCloudRecognizer::default().classify(&Gesture::unnamed(query), &templates);
        assert_eq!(result.name, "plus");
        assert!(result.is_match());
    }

    #[test]
    fn test_no_templates_is_no_match() {
        let result = PointCloudRecognizer::default().classify(&plus("q"), &[]);
        assert_eq!(result, RecognitionResult::no_match());
        assert!(!result.is_match());
    }

    #[test]
    fn test_empty_query_is_no_match() {
        let result =
            PointCloudRecognizer::default().classify(&Gesture::unnamed(vec![]), &[plus("plus")]);
        assert_eq!(result.name, NO_MATCH);
    }

    #[test]
    fn test_display() {
        let result = RecognitionResult {
            name: "circle".to_string(),
            score: 0.876,
        };
        assert_eq!(result.to_string(), "circle (0.88)");
    }
}
