//! Obstacle shapes and the primitive hit tests the collision resolver is built from
//!
//! Screen coordinates: +x right, +y down. "Clockwise" below means clockwise
//! as seen on screen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::wrap_angle;

/// A line segment obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
}

impl Line {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Direction from start to end
    #[inline]
    pub fn vector(&self) -> DVec2 {
        self.end - self.start
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.start * scale, self.end * scale)
    }
}

/// An axis-aligned box obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(
            self.left * scale,
            self.top * scale,
            self.right * scale,
            self.bottom * scale,
        )
    }
}

/// A circle obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.center * scale, self.radius * scale)
    }
}

/// A closed convex polygon obstacle, vertices in clockwise order
///
/// The closing edge (last vertex back to the first) is implicit.
/// Concave or counter-clockwise input is not rejected; hit tests on it are
/// simply unreliable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    /// Returns `None` for fewer than three vertices
    pub fn new(vertices: &[DVec2]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self {
            vertices: vertices.to_vec(),
        })
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Every edge including the closing one
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Line::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point_in_convex_polygon(point, &self.vertices)
    }

    /// Mean of the vertices (inside for any convex polygon)
    pub fn centroid(&self) -> DVec2 {
        self.vertices.iter().copied().sum::<DVec2>() / self.vertices.len() as f64
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v * scale).collect(),
        }
    }
}

/// An open chain of line segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    vertices: Vec<DVec2>,
}

impl Polyline {
    /// Returns `None` for fewer than two vertices
    pub fn new(vertices: &[DVec2]) -> Option<Self> {
        if vertices.len() < 2 {
            return None;
        }
        Some(Self {
            vertices: vertices.to_vec(),
        })
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.vertices.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v * scale).collect(),
        }
    }
}

/// 2D cross product (z of the 3D cross)
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - b.x * a.y
}

/// Signed angle of a vector in (-π, π]; 0 for a zero-length vector
#[inline]
pub fn direction(v: DVec2) -> f64 {
    if v.length_squared() < EPSILON * EPSILON {
        return 0.0;
    }
    v.y.atan2(v.x)
}

/// Outgoing angle for a particle travelling at `incidence` that strikes a
/// surface whose own direction is `axis`. Result in [0, 2π).
#[inline]
pub fn reflection_angle(incidence: f64, axis: f64) -> f64 {
    wrap_angle(axis * 2.0 - incidence)
}

/// Strict segment intersection test: segments AB and CD properly cross.
/// Touching or collinear segments do not count.
pub fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let ab = b - a;
    let cd = d - c;
    cross(ab, c - a) * cross(ab, d - a) < 0.0 && cross(cd, a - c) * cross(cd, b - c) < 0.0
}

/// Whether a vertical travel from `start_y` to `end_y` crosses the horizontal line `y`
#[inline]
pub fn segment_crosses_horizontal(start_y: f64, end_y: f64, y: f64) -> bool {
    (y - start_y) * (y - end_y) < 0.0
}

/// Whether a horizontal travel from `start_x` to `end_x` crosses the vertical line `x`
#[inline]
pub fn segment_crosses_vertical(start_x: f64, end_x: f64, x: f64) -> bool {
    (x - start_x) * (x - end_x) < 0.0
}

/// Half-open box test: left/top inclusive, right/bottom exclusive
#[inline]
pub fn point_in_box(point: DVec2, rect: &Rect) -> bool {
    point.x >= rect.left && point.y >= rect.top && point.x < rect.right && point.y < rect.bottom
}

/// Point inside (or on) a convex polygon given in clockwise screen order.
/// Bails out on the first edge the point lies outside of.
pub fn point_in_convex_polygon(point: DVec2, vertices: &[DVec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| {
        let start = vertices[i];
        let end = vertices[(i + 1) % n];
        cross(end - start, point - start) >= 0.0
    })
}
