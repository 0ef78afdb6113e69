use imageproc::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive per-channel HSV range, channels in (hue, saturation, value) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBounds {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBounds {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Check whether an HSV triple lies inside every channel interval
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

impl fmt::Display for HsvBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lower: {:?}, upper: {:?}", self.lower, self.upper)
    }
}

/// Outer boundary of one connected foreground region
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed polygon area (magnitude of the signed shoelace area)
    pub fn area(&self) -> f64 {
        crate::detection::geometry::contour_area(&self.points)
    }

    /// Centroid from the polygon moments, `(-1, -1)` for degenerate contours
    pub fn centroid(&self) -> (i32, i32) {
        crate::detection::geometry::contour_center(&self.points)
    }

    pub fn enclosing_circle(&self) -> Option<Circle> {
        crate::detection::geometry::min_enclosing_circle(&self.points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        // Relative slack so points on the rim survive float error
        (dx * dx + dy * dy).sqrt() <= self.radius * (1.0 + 1e-9) + 1e-9
    }
}

/// The largest contour of a frame and where its marker was drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Index into the extractor's output
    pub index: usize,
    pub area: f64,
    pub circle: Circle,
    pub centroid: (i32, i32),
}

/// What happened to one frame on its way through the loop
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_number: u64,
    pub contour_count: usize,
    pub outlined: usize,
    pub detection: Option<Detection>,
    /// Playback wrapped around to frame 0 after this frame
    pub looped: bool,
    /// Operator asked for a restart during this iteration
    pub restarted: bool,
}
