//! Particle state and emission templates
//!
//! `Element` is one live particle. `Property` is the template a batch of
//! particles is stamped from, plus the per-tick rates the integrator applies
//! to every particle of the system.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::consts::MIN_SIZE;
use crate::error::Result;
use crate::{degree_range_to_radians, degrees_to_radians};

/// RGBA color with unclamped f64 channels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Add `delta * scale` to the color channels, leaving alpha alone
    #[inline]
    pub fn shift_rgb(&mut self, delta: &Rgba, scale: f64) {
        self.r += delta.r * scale;
        self.g += delta.g * scale;
        self.b += delta.b * scale;
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }
}

/// Compositing mode for the renderer. The core never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Additive,
    Alpha,
    Subtractive,
    Multiplicative,
}

/// Visual family of a particle system
///
/// Decides which per-particle extensions are simulated and which defaults
/// a fresh template gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Single raster pixels, simulated in down-scaled raster space
    Dot,
    #[default]
    Circle,
    Star,
    Rect,
    Pentagon,
    Texture,
}

impl ParticleKind {
    /// Whether particles carry a size that grows or shrinks
    pub fn has_size(&self) -> bool {
        !matches!(self, ParticleKind::Dot)
    }

    /// Whether particles spin
    pub fn rotates(&self) -> bool {
        matches!(
            self,
            ParticleKind::Star | ParticleKind::Rect | ParticleKind::Pentagon | ParticleKind::Texture
        )
    }

    /// Whether the system simulates in scaled raster space
    pub fn is_raster(&self) -> bool {
        matches!(self, ParticleKind::Dot)
    }

    /// Initial pool capacity
    pub fn default_reserve(&self) -> usize {
        match self {
            ParticleKind::Dot => 10_000,
            ParticleKind::Circle => 3_000,
            _ => 2_000,
        }
    }
}

/// One live particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub position: DVec2,
    /// Position before this tick's movement; the swept collision segment starts here
    pub previous_position: DVec2,
    /// Direction of self-propelled motion (radians)
    pub travel_angle: f64,
    /// Self-propelled speed in world units per reference frame, never negative
    pub speed: f64,
    pub color: Rgba,
    /// Scalar gravity drift, re-projected along the fixed gravity angle every tick
    pub gravity_accumulator: f64,
    /// Seconds since creation
    pub live_time: f64,
    /// Once set, alpha decays geometrically instead of by the configured delta
    pub fading_out: bool,
    /// Cleared to mark the particle for removal at the next compaction
    pub enabled: bool,
    pub size: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
}

impl Element {
    pub fn new(position: DVec2, travel_angle: f64, speed: f64, color: Rgba) -> Self {
        Self {
            position,
            previous_position: position,
            travel_angle,
            speed,
            color,
            gravity_accumulator: 0.0,
            live_time: 0.0,
            fading_out: false,
            enabled: true,
            size: MIN_SIZE,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_rotation(mut self, rotation: f64, rotation_speed: f64) -> Self {
        self.rotation = rotation;
        self.rotation_speed = rotation_speed;
        self
    }

    /// Movement applied during the last tick
    #[inline]
    pub fn movement(&self) -> DVec2 {
        self.position - self.previous_position
    }
}

/// Emission template and per-tick rates for a particle system
///
/// Spawn fields (`position` .. `rotation_speed`) are read when particles are
/// created. Rate fields (`accel_*`, gravity, fade) are read every tick and
/// apply to every particle in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    pub position: DVec2,
    /// Base travel direction (radians)
    pub angle: f64,
    pub speed: f64,
    pub size: f64,
    pub color: Rgba,
    /// Base spin per reference frame (radians)
    pub rotation_speed: f64,

    /// Full angular spread around `angle`, in [0, 2π]
    pub angle_range: f64,
    /// Jitter strength for size, angle, speed and spin
    pub random_power: f64,

    pub accel_speed: f64,
    pub accel_size: f64,
    /// Per-frame color delta; alpha only applies while not fading
    pub accel_color: Rgba,

    /// Growth of the gravity accumulator per reference frame
    pub gravity_power: f64,
    /// Fixed direction gravity pulls along (radians)
    pub gravity_angle: f64,

    /// Seconds before a particle starts fading
    pub fade_out_time: f64,
    /// Alpha multiplier per tick while fading
    pub fade_out_rate: f64,

    pub blend_mode: BlendMode,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            angle: 0.0,
            speed: 5.0,
            size: 20.0,
            color: Rgba::new(1.0, 0.9, 0.6, 0.8),
            rotation_speed: 0.0,

            angle_range: TAU,
            random_power: 3.0,

            accel_speed: -0.1,
            accel_size: -0.01,
            accel_color: Rgba::new(-0.01, -0.02, -0.03, -0.001),

            gravity_power: 0.2,
            gravity_angle: FRAC_PI_2,

            fade_out_time: 1.0,
            fade_out_rate: 0.975,

            blend_mode: BlendMode::Additive,
        }
    }
}

impl Property {
    /// Template defaults for a particle family
    pub fn for_kind(kind: ParticleKind) -> Self {
        let mut property = Self::default();
        match kind {
            ParticleKind::Dot | ParticleKind::Circle => {}
            ParticleKind::Star | ParticleKind::Rect | ParticleKind::Pentagon => {
                property.accel_size = 1.3;
                property.gravity_power = 0.0;
            }
            ParticleKind::Texture => {
                property.accel_size = 1.3;
                property.gravity_power = 0.0;
                property.color = Rgba::WHITE;
                property.accel_color = Rgba::new(0.0, 0.0, 0.0, -0.005);
            }
        }
        property
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let property: Property = serde_json::from_str(json)?;
        Ok(property.sanitized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy with every clamped field forced back into range
    pub fn sanitized(mut self) -> Self {
        self.set_size(self.size);
        self.set_speed(self.speed);
        self.set_gravity_power(self.gravity_power);
        self.set_random_power(self.random_power);
        self.angle_range = if self.angle_range.is_nan() {
            0.0
        } else {
            self.angle_range.clamp(0.0, TAU)
        };
        self
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Sizes below 1 are raised to 1
    pub fn set_size(&mut self, size: f64) {
        self.size = size.max(MIN_SIZE);
    }

    /// Negative speeds are raised to 0
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn set_angle_degrees(&mut self, degrees: f64) {
        self.angle = degrees_to_radians(degrees);
    }

    /// Spread is clamped to [0°, 360°]
    pub fn set_angle_range_degrees(&mut self, degrees: f64) {
        self.angle_range = degree_range_to_radians(degrees);
    }

    pub fn set_accel_speed(&mut self, accel: f64) {
        self.accel_speed = accel;
    }

    pub fn set_accel_size(&mut self, accel: f64) {
        self.accel_size = accel;
    }

    pub fn set_accel_color(&mut self, accel: Rgba) {
        self.accel_color = accel;
    }

    /// Negative gravity is raised to 0; flip `gravity_angle` instead
    pub fn set_gravity_power(&mut self, power: f64) {
        self.gravity_power = power.max(0.0);
    }

    pub fn set_gravity_angle_degrees(&mut self, degrees: f64) {
        self.gravity_angle = degrees_to_radians(degrees);
    }

    /// Negative jitter is raised to 0
    pub fn set_random_power(&mut self, power: f64) {
        self.random_power = power.max(0.0);
    }

    pub fn set_rotation_speed(&mut self, speed: f64) {
        self.rotation_speed = speed;
    }

    pub fn set_fade_out(&mut self, time_secs: f64, rate: f64) {
        self.fade_out_time = time_secs.max(0.0);
        self.fade_out_rate = rate.clamp(0.0, 1.0);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }
}
