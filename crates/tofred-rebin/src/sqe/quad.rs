//! Quadrilateral footprint of one input bin in the (Q, E) plane.

use tofred_core::{ErrorInfo, ReductionError};
use tofred_num::{signed_area, Point};

use super::jacobian::{JacobianCoefficients, Kinematics};

/// Convex, counter-clockwise quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    vertices: [Point; 4],
    area: f64,
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

impl Quad {
    /// Builds a quadrilateral from four vertices given in either winding.
    ///
    /// Fails with [`ReductionError::DegenerateGeometry`] when a vertex is not
    /// finite, the area is not above `min_area`, or the outline is not convex.
    pub fn new(vertices: [Point; 4], min_area: f64) -> Result<Self, ReductionError> {
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ReductionError::DegenerateGeometry(
                ErrorInfo::new("non-finite-vertex", "footprint vertex is not finite")
                    .with_context("vertices", format!("{vertices:?}")),
            ));
        }
        let mut vertices = vertices;
        let signed = signed_area(&vertices);
        if signed < 0.0 {
            vertices.reverse();
        }
        let area = signed.abs();
        if area <= min_area {
            return Err(ReductionError::DegenerateGeometry(
                ErrorInfo::new("zero-area", "footprint has no area")
                    .with_context("area", area)
                    .with_context("min_area", min_area),
            ));
        }
        let convex = (0..4).all(|k| {
            cross(vertices[k], vertices[(k + 1) % 4], vertices[(k + 2) % 4]) >= 0.0
        });
        if !convex {
            return Err(ReductionError::DegenerateGeometry(
                ErrorInfo::new("non-convex", "footprint vertices do not form a convex outline")
                    .with_context("vertices", format!("{vertices:?}")),
            ));
        }
        Ok(Self { vertices, area })
    }

    /// Parallelogram spanned by the polar and energy bin widths around `center`.
    ///
    /// With `a = (x1, x3) * polar_width / 2` and `b = (x2, x4) * energy_width / 2`
    /// the corners are `c-a-b, c+a-b, c+a+b, c-a+b`.
    pub fn from_jacobian(
        center: Point,
        coeffs: &JacobianCoefficients,
        polar_width: f64,
        energy_width: f64,
        min_area: f64,
    ) -> Result<Self, ReductionError> {
        let a = Point::new(0.5 * coeffs.x1 * polar_width, 0.5 * coeffs.x3 * polar_width);
        let b = Point::new(0.5 * coeffs.x2 * energy_width, 0.5 * coeffs.x4 * energy_width);
        let corner = |sa: f64, sb: f64| {
            Point::new(center.x + sa * a.x + sb * b.x, center.y + sa * a.y + sb * b.y)
        };
        Self::new(
            [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ],
            min_area,
        )
    }

    /// Quadrilateral whose corners are the exact (Q, E) images of the bin corners.
    ///
    /// `polar` and `energy` are the `(low, high)` edges of the pixel and of the
    /// energy-transfer bin. Corners are visited low/low, high/low, high/high,
    /// low/high so that the outline runs counter-clockwise while |Q| grows
    /// with the polar angle.
    pub fn from_kinematics(
        kinematics: &Kinematics,
        polar: (f64, f64),
        energy: (f64, f64),
        min_area: f64,
    ) -> Result<Self, ReductionError> {
        let corner = |angle: f64, e: f64| -> Result<Point, ReductionError> {
            Ok(Point::new(kinematics.point(angle, e)?.q, e))
        };
        Self::new(
            [
                corner(polar.0, energy.0)?,
                corner(polar.1, energy.0)?,
                corner(polar.1, energy.1)?,
                corner(polar.0, energy.1)?,
            ],
            min_area,
        )
    }

    /// Vertices in counter-clockwise order.
    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// `(q_min, q_max, e_min, e_max)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.vertices.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(q0, q1, e0, e1), p| (q0.min(p.x), q1.max(p.x), e0.min(p.y), e1.max(p.y)),
        )
    }
}
