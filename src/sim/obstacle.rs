//! Per-tick obstacle registry
//!
//! Obstacles are registered by the host before each tick, consulted once by
//! the collision pass, and then cleared.

use glam::DVec2;
use rand::Rng;

use super::geometry::{Circle, Line, Polygon, Polyline, Rect};

/// Obstacles for one tick, grouped by shape class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet {
    pub lines: Vec<Line>,
    pub rects: Vec<Rect>,
    pub circles: Vec<Circle>,
    pub polygons: Vec<Polygon>,
    pub polylines: Vec<Polyline>,
}

impl ObstacleSet {
    pub fn add_line(&mut self, start: DVec2, end: DVec2) {
        self.lines.push(Line::new(start, end));
    }

    pub fn add_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.rects.push(Rect::new(left, top, right, bottom));
    }

    pub fn add_circle(&mut self, center: DVec2, radius: f64) {
        self.circles.push(Circle::new(center, radius));
    }

    /// Returns false when fewer than three vertices were given
    pub fn add_polygon(&mut self, vertices: &[DVec2]) -> bool {
        match Polygon::new(vertices) {
            Some(polygon) => {
                self.polygons.push(polygon);
                true
            }
            None => {
                log::trace!("ignoring polygon with {} vertices", vertices.len());
                false
            }
        }
    }

    /// Returns false when fewer than two vertices were given
    pub fn add_polyline(&mut self, vertices: &[DVec2]) -> bool {
        match Polyline::new(vertices) {
            Some(polyline) => {
                self.polylines.push(polyline);
                true
            }
            None => {
                log::trace!("ignoring polyline with {} vertices", vertices.len());
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
            + self.rects.len()
            + self.circles.len()
            + self.polygons.len()
            + self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.rects.clear();
        self.circles.clear();
        self.polygons.clear();
        self.polylines.clear();
    }

    /// Multiply every coordinate (and radius) by `scale`
    pub fn scale(&mut self, scale: f64) {
        for line in &mut self.lines {
            *line = line.scaled(scale);
        }
        for rect in &mut self.rects {
            *rect = rect.scaled(scale);
        }
        for circle in &mut self.circles {
            *circle = circle.scaled(scale);
        }
        for polygon in &mut self.polygons {
            *polygon = polygon.scaled(scale);
        }
        for polyline in &mut self.polylines {
            *polyline = polyline.scaled(scale);
        }
    }

    /// Rotate each class by a random offset so no obstacle always wins ties
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        rotate_random(&mut self.lines, rng);
        rotate_random(&mut self.rects, rng);
        rotate_random(&mut self.circles, rng);
        rotate_random(&mut self.polygons, rng);
        rotate_random(&mut self.polylines, rng);
    }
}

fn rotate_random<T, R: Rng>(items: &mut [T], rng: &mut R) {
    if items.len() > 1 {
        let offset = rng.random_range(0..items.len());
        items.rotate_left(offset);
    }
}
