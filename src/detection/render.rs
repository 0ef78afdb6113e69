use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use crate::models::{Contour, Detection};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([150, 250, 150]);
pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const DEFAULT_MIN_OUTLINE_AREA: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Hollow { thickness: u32 },
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Contours strictly larger than this are outlined
    pub min_outline_area: f64,
    pub outline_thickness: u32,
    pub marker: Marker,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            min_outline_area: DEFAULT_MIN_OUTLINE_AREA,
            outline_thickness: 2,
            marker: Marker::Hollow { thickness: 2 },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub outlined: usize,
    pub detection: Option<Detection>,
}

/// Index and area of the largest contour
///
/// Only a strictly larger area replaces the running maximum, so the first
/// contour wins ties and contours without area are never picked.
pub fn select_largest(contours: &[Contour]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut max_area = 0.0;
    for (i, contour) in contours.iter().enumerate() {
        let area = contour.area();
        if area > max_area {
            max_area = area;
            best = Some((i, area));
        }
    }
    best
}

/// Outline the large contours and mark the largest one on the frame
pub fn draw_ball_contour(frame: &mut RgbImage, contours: &[Contour], style: &RenderStyle) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for contour in contours {
        if contour.area() > style.min_outline_area {
            draw_contour(frame, contour, OUTLINE_COLOR, style.outline_thickness);
            summary.outlined += 1;
        }
    }

    let Some((index, area)) = select_largest(contours) else {
        return summary;
    };
    let largest = &contours[index];
    let Some(circle) = largest.enclosing_circle() else {
        return summary;
    };

    draw_contour(frame, largest, OUTLINE_COLOR, style.outline_thickness);
    let centroid = largest.centroid();
    draw_marker(frame, centroid, circle.radius as i32, style.marker);

    summary.detection = Some(Detection { index, area, circle, centroid });
    summary
}

/// Draw a closed polyline through the contour points
pub fn draw_contour(frame: &mut RgbImage, contour: &Contour, color: Rgb<u8>, thickness: u32) {
    let points = &contour.points;
    if points.is_empty() {
        return;
    }
    let thickness = thickness.max(1) as i32;
    let n = points.len();

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        for dy in 0..thickness {
            for dx in 0..thickness {
                draw_line_segment_mut(
                    frame,
                    ((a.x + dx) as f32, (a.y + dy) as f32),
                    ((b.x + dx) as f32, (b.y + dy) as f32),
                    color,
                );
            }
        }
    }
}

fn draw_marker(frame: &mut RgbImage, center: (i32, i32), radius: i32, marker: Marker) {
    match marker {
        Marker::Filled => draw_filled_circle_mut(frame, center, radius, MARKER_COLOR),
        Marker::Hollow { thickness } => {
            for t in 0..thickness.max(1) as i32 {
                let r = radius - t;
                if r < 0 {
                    break;
                }
                draw_hollow_circle_mut(frame, center, r, MARKER_COLOR);
            }
        }
    }
}
