//! Per-tick kinematics
//!
//! Every rate in a `Property` is expressed per reference frame (1/60 s by
//! default). A tick of `delta` seconds scales them by `delta / reference`,
//! so trajectories do not depend on the caller's frame rate.

use glam::DVec2;
use std::f64::consts::TAU;

use super::state::{Element, ParticleKind, Property};
use super::trig::Trig;
use crate::consts::EPSILON;

/// Duration of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Wall-clock seconds elapsed
    pub delta_secs: f64,
    /// `delta_secs` in reference frames
    pub time_scale: f64,
}

impl Step {
    /// Negative deltas are treated as zero; a non-positive reference frame as 1/60 s
    pub fn new(delta_secs: f64, reference_frame_secs: f64) -> Self {
        let delta_secs = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };
        let reference = if reference_frame_secs > EPSILON {
            reference_frame_secs
        } else {
            crate::consts::REFERENCE_FRAME_SECS
        };
        Self {
            delta_secs,
            time_scale: delta_secs / reference,
        }
    }
}

/// Area outside of which particles are culled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Viewport grown by the particle's size plus a fixed margin
    Padded { width: f64, height: f64, margin: f64 },
    /// Raster grid [0, width) x [0, height), no margin
    Raster { width: f64, height: f64 },
}

impl Bounds {
    #[inline]
    pub fn contains(&self, position: DVec2, size: f64) -> bool {
        match *self {
            Bounds::Padded {
                width,
                height,
                margin,
            } => {
                let m = size + margin;
                position.x >= -m
                    && position.x <= width + m
                    && position.y >= -m
                    && position.y <= height + m
            }
            Bounds::Raster { width, height } => {
                position.x >= 0.0 && position.x < width && position.y >= 0.0 && position.y < height
            }
        }
    }
}

/// Everything the integrator reads besides the particles themselves
pub struct Integrator<'a> {
    pub property: &'a Property,
    pub kind: ParticleKind,
    pub bounds: Bounds,
    pub fade_out_limit: f64,
    pub trig: &'a Trig,
}

impl Integrator<'_> {
    /// Advance every enabled particle by one step.
    ///
    /// Returns how many particles were disabled this step. Disabled particles
    /// skip the rest of their update and wait for compaction.
    pub fn advance(&self, elements: &mut [Element], step: Step) -> usize {
        let property = self.property;
        let ts = step.time_scale;
        let gravity_step = self.trig.unit(property.gravity_angle) * ts;
        let has_size = self.kind.has_size();
        let rotates = self.kind.rotates();

        let mut disabled = 0;
        for e in elements.iter_mut().filter(|e| e.enabled) {
            if !self.advance_one(e, step, gravity_step, has_size, rotates) {
                e.enabled = false;
                disabled += 1;
            }
        }
        disabled
    }

    /// Returns false when the particle should be removed
    #[inline]
    fn advance_one(
        &self,
        e: &mut Element,
        step: Step,
        gravity_step: DVec2,
        has_size: bool,
        rotates: bool,
    ) -> bool {
        let property = self.property;
        let ts = step.time_scale;

        // Alpha: geometric decay once fading, configured delta before that
        if e.fading_out {
            e.color.a *= property.fade_out_rate;
            if e.color.a < self.fade_out_limit {
                return false;
            }
        } else {
            e.color.a += property.accel_color.a * ts;
            if e.color.a < self.fade_out_limit && property.accel_color.a < 0.0 {
                return false;
            }
            e.live_time += step.delta_secs;
            if e.live_time > property.fade_out_time {
                e.fading_out = true;
            }
        }

        e.color.shift_rgb(&property.accel_color, ts);

        if has_size {
            e.size += property.accel_size * ts;
            if e.size <= 0.0 {
                return false;
            }
        }

        e.previous_position = e.position;
        e.position += self.trig.unit(e.travel_angle) * (e.speed * ts);

        // Gravity drifts along a fixed axis and only merges into speed on a bounce
        e.gravity_accumulator += property.gravity_power * ts;
        e.position += gravity_step * e.gravity_accumulator;

        if !self.bounds.contains(e.position, if has_size { e.size } else { 0.0 }) {
            return false;
        }

        e.speed = (e.speed + property.accel_speed * ts).max(0.0);

        if rotates {
            e.rotation += e.rotation_speed * ts;
            if !(0.0..TAU).contains(&e.rotation) {
                e.rotation = crate::wrap_angle(e.rotation);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FADE_OUT_LIMIT, REFERENCE_FRAME_SECS, WORLD_MARGIN};
    use crate::sim::state::Rgba;
    use std::f64::consts::{FRAC_PI_2, PI};

    const FRAME: f64 = REFERENCE_FRAME_SECS;

    fn still_property() -> Property {
        let mut property = Property::default();
        property.accel_speed = 0.0;
        property.accel_size = 0.0;
        property.accel_color = Rgba::default();
        property.gravity_power = 0.0;
        property.fade_out_time = 100.0;
        property
    }

    fn bounds() -> Bounds {
        Bounds::Padded {
            width: 800.0,
            height: 600.0,
            margin: WORLD_MARGIN,
        }
    }

    fn advance(property: &Property, kind: ParticleKind, elements: &mut [Element], delta: f64) -> usize {
        let trig = Trig::Exact;
        let integrator = Integrator {
            property,
            kind,
            bounds: bounds(),
            fade_out_limit: FADE_OUT_LIMIT,
            trig: &trig,
        };
        integrator.advance(elements, Step::new(delta, FRAME))
    }

    fn element_at(x: f64, y: f64, angle: f64, speed: f64) -> Element {
        Element::new(DVec2::new(x, y), angle, speed, Rgba::new(1.0, 1.0, 1.0, 1.0)).with_size(5.0)
    }

    #[test]
    fn test_step_time_scale() {
        let step = Step::new(FRAME * 2.0, FRAME);
        assert!((step.time_scale - 2.0).abs() < 1e-12);
        assert_eq!(Step::new(-1.0, FRAME).time_scale, 0.0);
        assert_eq!(Step::new(f64::NAN, FRAME).delta_secs, 0.0);
    }

    #[test]
    fn test_movement_records_previous_position() {
        let property = still_property();
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 5.0)];
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);

        let e = &elements[0];
        assert_eq!(e.previous_position, DVec2::new(100.0, 100.0));
        assert!((e.position.x - 105.0).abs() < 1e-9);
        assert!((e.position.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_delta_moves_twice_as_far() {
        let property = still_property();
        let mut one = vec![element_at(100.0, 100.0, FRAC_PI_2, 3.0)];
        let mut two = vec![element_at(100.0, 100.0, FRAC_PI_2, 3.0)];
        advance(&property, ParticleKind::Circle, &mut one, FRAME);
        advance(&property, ParticleKind::Circle, &mut two, FRAME * 2.0);
        assert!((two[0].movement().y - 2.0 * one[0].movement().y).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_accumulates_along_fixed_axis() {
        let mut property = still_property();
        property.gravity_power = 0.5;
        property.gravity_angle = FRAC_PI_2;
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0)];

        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!((elements[0].gravity_accumulator - 0.5).abs() < 1e-12);
        assert!((elements[0].position.y - 100.5).abs() < 1e-9);

        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!((elements[0].gravity_accumulator - 1.0).abs() < 1e-12);
        // Travel angle is untouched by gravity
        assert_eq!(elements[0].travel_angle, 0.0);
        assert!((elements[0].position.y - 101.5).abs() < 1e-9);
    }

    #[test]
    fn test_speed_decays_and_clamps_at_zero() {
        let mut property = still_property();
        property.accel_speed = -2.0;
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 3.0)];
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!((elements[0].speed - 1.0).abs() < 1e-12);
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert_eq!(elements[0].speed, 0.0);
    }

    #[test]
    fn test_fade_transition_is_one_way() {
        let mut property = still_property();
        property.fade_out_time = 0.03;
        property.fade_out_rate = 0.5;
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0)];

        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!(!elements[0].fading_out);
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!(elements[0].fading_out);
        assert_eq!(elements[0].color.a, 1.0);

        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!(elements[0].fading_out);
        assert_eq!(elements[0].color.a, 0.5);
    }

    #[test]
    fn test_fading_particle_is_removed_below_limit() {
        let mut property = still_property();
        property.fade_out_rate = 0.1;
        let mut e = element_at(100.0, 100.0, 0.0, 0.0);
        e.fading_out = true;
        e.color.a = 0.05;
        let mut elements = vec![e];
        assert_eq!(advance(&property, ParticleKind::Circle, &mut elements, FRAME), 1);
        assert!(!elements[0].enabled);
    }

    #[test]
    fn test_alpha_delta_only_before_fading() {
        let mut property = still_property();
        property.accel_color = Rgba::new(-0.1, 0.0, 0.0, -0.2);
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0)];
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert!((elements[0].color.a - 0.8).abs() < 1e-12);
        assert!((elements[0].color.r - 0.9).abs() < 1e-12);

        let mut e = element_at(100.0, 100.0, 0.0, 0.0);
        e.fading_out = true;
        property.fade_out_rate = 1.0;
        let mut elements = vec![e];
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert_eq!(elements[0].color.a, 1.0);
        // RGB still shifts while fading
        assert!((elements[0].color.r - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_shrinking_to_zero_disables() {
        let mut property = still_property();
        property.accel_size = -5.0;
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0)];
        assert_eq!(advance(&property, ParticleKind::Circle, &mut elements, FRAME), 1);
        assert!(!elements[0].enabled);
    }

    #[test]
    fn test_dot_has_no_size_decay() {
        let mut property = still_property();
        property.accel_size = -5.0;
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0)];
        assert_eq!(advance(&property, ParticleKind::Dot, &mut elements, FRAME), 0);
        assert_eq!(elements[0].size, 5.0);
    }

    #[test]
    fn test_out_of_bounds_culled_with_margin() {
        let property = still_property();
        // size 5 + margin 10: x = -14 survives, x = -16 does not
        let mut elements = vec![
            element_at(-14.0, 100.0, 0.0, 0.0),
            element_at(-16.0, 100.0, 0.0, 0.0),
        ];
        assert_eq!(advance(&property, ParticleKind::Circle, &mut elements, FRAME), 1);
        assert!(elements[0].enabled);
        assert!(!elements[1].enabled);
    }

    #[test]
    fn test_raster_bounds_have_no_margin() {
        let bounds = Bounds::Raster {
            width: 200.0,
            height: 150.0,
        };
        assert!(bounds.contains(DVec2::new(0.0, 0.0), 0.0));
        assert!(!bounds.contains(DVec2::new(200.0, 10.0), 0.0));
        assert!(!bounds.contains(DVec2::new(-0.1, 10.0), 0.0));
    }

    #[test]
    fn test_rotation_wraps() {
        let property = still_property();
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0).with_rotation(TAU - 0.1, 0.3)];
        advance(&property, ParticleKind::Star, &mut elements, FRAME);
        assert!((elements[0].rotation - 0.2).abs() < 1e-9);

        // Circles don't spin
        let mut elements = vec![element_at(100.0, 100.0, 0.0, 0.0).with_rotation(1.0, 0.3)];
        advance(&property, ParticleKind::Circle, &mut elements, FRAME);
        assert_eq!(elements[0].rotation, 1.0);
    }

    #[test]
    fn test_disabled_particles_are_not_touched() {
        let property = still_property();
        let mut e = element_at(100.0, 100.0, PI, 5.0);
        e.enabled = false;
        let mut elements = vec![e.clone()];
        assert_eq!(advance(&property, ParticleKind::Circle, &mut elements, FRAME), 0);
        assert_eq!(elements[0], e);
    }
}
