//! Planar geometry: the point-in-polygon test and axis-aligned boxes.
//!
//! `point_in_polygon` is the single geometry primitive the whole simulator
//! leans on: the boundary rasterizer classifies every grid cell with it, and
//! source admission checks run it directly against the authored polygon.

use glam::DVec2;

/// Even-odd ray-casting point-in-polygon test.
///
/// The polygon must be pre-closed (last vertex equal to the first); edges are
/// taken from consecutive vertex pairs. For each edge whose endpoints straddle
/// the test point's y, the parity flips when the point lies left of the
/// edge/horizontal-ray intersection.
///
/// Fewer than 2 vertices means there is no domain: every point is outside.
pub fn point_in_polygon(point: DVec2, polygon: &[DVec2]) -> bool {
    if polygon.len() < 2 {
        return false;
    }
    let mut inside = false;
    for edge in polygon.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Closes a polygon ring by repeating the first vertex, if not already closed.
///
/// Rings with fewer than 2 vertices are returned unchanged; they denote an
/// empty domain either way.
pub fn close_polygon(mut polygon: Vec<DVec2>) -> Vec<DVec2> {
    if polygon.len() >= 2 && polygon.first() != polygon.last() {
        polygon.push(polygon[0]);
    }
    polygon
}

/// An axis-aligned rectangle given by its minimum and maximum corners.
///
/// Used for the authoring viewbox and for bounding boxes during
/// rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    /// Creates a rectangle from two corners, normalizing so `min <= max`
    /// per component.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether `point` lies inside the rectangle (inclusive of edges).
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Grows the rectangle to include `point`.
    pub fn union_point(&self, point: DVec2) -> Rect {
        Rect {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Clamps `point` to lie inside the rectangle.
    pub fn clamp_point(&self, point: DVec2) -> DVec2 {
        point.clamp(self.min, self.max)
    }
}
