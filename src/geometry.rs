//! Per-segment geometry shared by every builder.
//!
//! Paths arrive in geographic `f64` coordinates and are converted to tile-local `f32` shape
//! coordinates before any vertex is emitted, so precision loss happens once per point and
//! never accumulates along the path.

use lyon::geom::euclid::default::Point2D;
use lyon::math::{Point, Vector};

/// A point of a [`Spline`](crate::Spline), in ground units.
pub type GeoPoint = Point2D<f64>;

/// Unit tangent of a segment and the two unit normals perpendicular to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentFrame {
    pub tangent: Vector,
    pub left_normal: Vector,
    pub right_normal: Vector,
}

impl SegmentFrame {
    /// Frame of the segment from `p1` to `p2`. The points must not be equal.
    pub fn new(p1: Point, p2: Point) -> Self {
        let tangent = (p2 - p1).normalize();
        let left_normal = Vector::new(-tangent.y, tangent.x);
        Self {
            tangent,
            left_normal,
            right_normal: -left_normal,
        }
    }

    #[inline]
    pub fn normal(&self, is_left: bool) -> Vector {
        if is_left {
            self.left_normal
        } else {
            self.right_normal
        }
    }
}

/// True if `a` and `b` are within `eps` of each other on both axes.
#[inline]
pub fn equal_dx_dy(a: GeoPoint, b: GeoPoint, eps: f64) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

/// Maps a geographic point into shape coordinates relative to `tile_center`.
#[inline]
pub fn to_shape_vertex(point: GeoPoint, tile_center: GeoPoint, scale: f32) -> Point {
    ((point - tile_center) * scale as f64).to_f32().to_point()
}

/// Vertex-shader side sign: left vertices push outward along +normal, right along -normal.
#[inline]
pub fn side(is_left: bool) -> f32 {
    if is_left {
        1.0
    } else {
        -1.0
    }
}
