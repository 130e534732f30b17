//! Collision detection and response for particles against obstacles
//!
//! Each particle is tested as a swept segment from `previous_position` to
//! `position`, so fast particles cannot skip over thin obstacles. On a hit the
//! particle is put back where it started the tick and sent off along the
//! mirrored direction of its actual movement.
//!
//! Classes are checked in a fixed order (lines, rects, circles, polygons,
//! polylines). Within a class the first obstacle that reports a hit wins.

use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

use super::geometry::{
    Circle, Line, Polygon, Polyline, Rect, point_in_box, reflection_angle,
    segment_crosses_horizontal, segments_intersect,
};
use super::obstacle::ObstacleSet;
use super::state::Element;
use super::trig::Trig;
use crate::consts::EPSILON;

/// Outcome of testing one particle against one obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// No contact
    Miss,
    /// Struck a surface whose direction is the given angle (radians)
    Bounce(f64),
    /// Sits inside a solid shape without having crossed its boundary this tick
    Embedded,
}

impl Contact {
    #[inline]
    fn is_miss(&self) -> bool {
        matches!(self, Contact::Miss)
    }
}

/// Tuning shared by every bounce in one resolve pass
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    pub trig: &'a Trig,
    pub time_scale: f64,
    /// Fraction of speed kept on a bounce
    pub damping: f64,
}

impl Response<'_> {
    /// Mirror the particle's last movement about `axis` and rewind it.
    ///
    /// The new speed is the movement length brought back to per-reference-frame
    /// units, damped. Gravity drift is folded into the new direction, so the
    /// accumulator restarts from zero.
    pub fn bounce(&self, e: &mut Element, axis: f64) {
        let movement = e.movement();
        e.travel_angle = reflection_angle(self.trig.direction(movement), axis);

        let time_scale = if self.time_scale > EPSILON { self.time_scale } else { 1.0 };
        e.speed = movement.length() / time_scale * self.damping;
        e.gravity_accumulator = 0.0;

        e.position = e.previous_position;
        e.fading_out = true;
    }
}

pub fn line_contact(line: &Line, from: DVec2, to: DVec2, trig: &Trig) -> Contact {
    if segments_intersect(line.start, line.end, from, to) {
        Contact::Bounce(trig.direction(line.vector()))
    } else {
        Contact::Miss
    }
}

/// Only the end point must be inside; the travel then decides which face was hit
pub fn rect_contact(rect: &Rect, from: DVec2, to: DVec2) -> Contact {
    if !point_in_box(to, rect) {
        return Contact::Miss;
    }
    if segment_crosses_horizontal(from.y, to.y, rect.top)
        || segment_crosses_horizontal(from.y, to.y, rect.bottom)
    {
        Contact::Bounce(0.0)
    } else {
        Contact::Bounce(FRAC_PI_2)
    }
}

/// Axis is the tangent at the particle's bearing from the center
pub fn circle_contact(circle: &Circle, to: DVec2, trig: &Trig) -> Contact {
    if circle.contains(to) {
        Contact::Bounce(trig.direction(circle.center - to) + FRAC_PI_2)
    } else {
        Contact::Miss
    }
}

pub fn polygon_contact(polygon: &Polygon, from: DVec2, to: DVec2, trig: &Trig) -> Contact {
    if !polygon.contains(to) {
        return Contact::Miss;
    }
    polygon
        .edges()
        .find(|edge| segments_intersect(edge.start, edge.end, from, to))
        .map_or(Contact::Embedded, |edge| {
            Contact::Bounce(trig.direction(edge.vector()))
        })
}

/// A polyline has no interior, so it behaves like a chain of lines
pub fn polyline_contact(polyline: &Polyline, from: DVec2, to: DVec2, trig: &Trig) -> Contact {
    polyline
        .segments()
        .map(|segment| line_contact(&segment, from, to, trig))
        .find(|contact| !contact.is_miss())
        .unwrap_or(Contact::Miss)
}

/// Test every enabled particle against every obstacle.
///
/// Returns the number of contacts applied (bounces plus embedded removals).
pub fn resolve(elements: &mut [Element], obstacles: &ObstacleSet, response: Response<'_>) -> usize {
    if obstacles.is_empty() {
        return 0;
    }
    let trig = response.trig;

    let mut contacts = 0;
    contacts += resolve_class(elements, &obstacles.lines, response, |line, e| {
        line_contact(line, e.previous_position, e.position, trig)
    });
    contacts += resolve_class(elements, &obstacles.rects, response, |rect, e| {
        rect_contact(rect, e.previous_position, e.position)
    });
    contacts += resolve_class(elements, &obstacles.circles, response, |circle, e| {
        circle_contact(circle, e.position, trig)
    });
    contacts += resolve_class(elements, &obstacles.polygons, response, |polygon, e| {
        polygon_contact(polygon, e.previous_position, e.position, trig)
    });
    contacts += resolve_class(elements, &obstacles.polylines, response, |polyline, e| {
        polyline_contact(polyline, e.previous_position, e.position, trig)
    });

    if contacts > 0 {
        log::trace!("resolved {contacts} contacts against {} obstacles", obstacles.len());
    }
    contacts
}

fn resolve_class<T, F>(
    elements: &mut [Element],
    shapes: &[T],
    response: Response<'_>,
    test: F,
) -> usize
where
    F: Fn(&T, &Element) -> Contact,
{
    if shapes.is_empty() {
        return 0;
    }

    let mut contacts = 0;
    for e in elements.iter_mut() {
        // A particle may bounce once per class, never twice within one
        for shape in shapes {
            if !e.enabled {
                break;
            }
            match test(shape, &*e) {
                Contact::Miss => continue,
                Contact::Bounce(axis) => response.bounce(e, axis),
                Contact::Embedded => e.enabled = false,
            }
            contacts += 1;
            break;
        }
    }
    contacts
}
