use imageproc::point::Point;
use crate::models::Circle;

/// Returned by [`contour_center`] when the contour encloses no area
pub const NO_CENTER: (i32, i32) = (-1, -1);

/// Zeroth and first order moments of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Polygon moments by Green's theorem; m00 is the signed area
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut m = Self::default();
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (x0, y0) = (p.x as f64, p.y as f64);
            let (x1, y1) = (q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            m.m00 += cross;
            m.m10 += (x0 + x1) * cross;
            m.m01 += (y0 + y1) * cross;
        }
        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m
    }

    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

pub fn contour_area(points: &[Point<i32>]) -> f64 {
    Moments::of_polygon(points).m00.abs()
}

/// Integer centroid of a contour, truncated toward zero
pub fn contour_center(points: &[Point<i32>]) -> (i32, i32) {
    match Moments::of_polygon(points).centroid() {
        Some((cx, cy)) => (cx as i32, cy as i32),
        None => NO_CENTER,
    }
}

/// Smallest circle containing every point (Welzl, iterative form)
///
/// Expected linear time on shuffled input; contour chains are short after
/// compression so they are scanned in their natural order.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let first = *pts.first()?;

    let mut circle = Circle { center: first, radius: 0.0 };
    for i in 1..pts.len() {
        if circle.contains(pts[i].0, pts[i].1) {
            continue;
        }
        circle = Circle { center: pts[i], radius: 0.0 };
        for j in 0..i {
            if circle.contains(pts[j].0, pts[j].1) {
                continue;
            }
            circle = circle_from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k].0, pts[k].1) {
                    circle = circle_from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}

fn circle_from_two(a: (f64, f64), b: (f64, f64)) -> Circle {
    let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
    Circle { center, radius: distance(a, center) }
}

fn circle_from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    let (bx, by) = (b.0 - a.0, b.1 - a.1);
    let (cx, cy) = (c.0 - a.0, c.1 - a.1);
    let d = 2.0 * (bx * cy - by * cx);

    if d.abs() < 1e-12 {
        // Collinear: the circle on the two farthest points covers the third
        let candidates = [circle_from_two(a, b), circle_from_two(a, c), circle_from_two(b, c)];
        return candidates
            .into_iter()
            .fold(Circle { center: a, radius: 0.0 }, |best, cand| {
                if cand.radius > best.radius { cand } else { best }
            });
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let center = (a.0 + ux, a.1 + uy);
    Circle { center, radius: distance(a, center) }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
