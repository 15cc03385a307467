//! Convex polygon clipping and polygon areas.

use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, ReductionError};

/// A vertex in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Point {
    /// Creates a vertex.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Shoelace area, positive for counter-clockwise vertex order.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (idx, p) in points.iter().enumerate() {
        let q = points[(idx + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice
}

/// Unsigned area of a simple polygon.
pub fn calc_area_2d_polygon(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

fn check_finite(points: &[Point], label: &str) -> Result<(), ReductionError> {
    if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
        return Err(ReductionError::DegenerateGeometry(
            ErrorInfo::new("non-finite-vertex", "polygon vertices must be finite")
                .with_context("polygon", label)
                .with_context("index", idx),
        ));
    }
    Ok(())
}

fn cross(origin: Point, a: Point, b: Point) -> f64 {
    (a.x - origin.x) * (b.y - origin.y) - (a.y - origin.y) * (b.x - origin.x)
}

fn segment_line_intersection(p: Point, q: Point, c1: Point, c2: Point) -> Point {
    let dp = cross(c1, c2, p);
    let dq = cross(c1, c2, q);
    let t = dp / (dp - dq);
    Point::new(p.x + t * (q.x - p.x), p.y + t * (q.y - p.y))
}

/// Intersects two convex polygons (Sutherland-Hodgman clipping of `subject` by `clip`).
///
/// Either winding is accepted. The returned polygon is empty when the overlap
/// has fewer than three vertices, which callers treat as "no overlap".
pub fn convex_polygon_intersect(
    subject: &[Point],
    clip: &[Point],
) -> Result<Vec<Point>, ReductionError> {
    check_finite(subject, "subject")?;
    check_finite(clip, "clip")?;
    if subject.len() < 3 || clip.len() < 3 {
        return Ok(Vec::new());
    }

    let clip_ccw: Vec<Point> = if signed_area(clip) < 0.0 {
        clip.iter().rev().copied().collect()
    } else {
        clip.to_vec()
    };

    let mut output = subject.to_vec();
    for idx in 0..clip_ccw.len() {
        if output.is_empty() {
            break;
        }
        let c1 = clip_ccw[idx];
        let c2 = clip_ccw[(idx + 1) % clip_ccw.len()];
        let input = std::mem::take(&mut output);
        for (k, &current) in input.iter().enumerate() {
            let previous = input[(k + input.len() - 1) % input.len()];
            let current_in = cross(c1, c2, current) >= 0.0;
            let previous_in = cross(c1, c2, previous) >= 0.0;
            if current_in {
                if !previous_in {
                    output.push(segment_line_intersection(previous, current, c1, c2));
                }
                output.push(current);
            } else if previous_in {
                output.push(segment_line_intersection(previous, current, c1, c2));
            }
        }
    }

    if output.len() < 3 {
        output.clear();
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ]
    }

    #[test]
    fn overlapping_squares_share_quarter() {
        let overlap = convex_polygon_intersect(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0))
            .unwrap();
        assert!((calc_area_2d_polygon(&overlap) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_clip_is_accepted() {
        let mut clip = square(0.5, 0.0, 1.0);
        clip.reverse();
        let overlap = convex_polygon_intersect(&square(0.0, 0.0, 1.0), &clip).unwrap();
        assert!((calc_area_2d_polygon(&overlap) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn disjoint_squares_have_no_overlap() {
        let overlap = convex_polygon_intersect(&square(0.0, 0.0, 1.0), &square(3.0, 3.0, 1.0))
            .unwrap();
        assert!(overlap.is_empty());
    }

    #[test]
    fn nan_vertex_is_an_error() {
        let mut subject = square(0.0, 0.0, 1.0);
        subject[2].y = f64::NAN;
        let err = convex_polygon_intersect(&subject, &square(0.0, 0.0, 1.0)).unwrap_err();
        assert_eq!(err.info().code, "non-finite-vertex");
    }
}
