//! Motes - real-time 2D particle simulation core
//!
//! Core modules:
//! - `sim`: Particle state, emission, integration, swept obstacle collision, pool compaction
//! - `snapshot`: Per-tick read-only view handed to an external renderer
//! - `settings`: Viewport, timing and quality configuration
//! - `error`: Configuration I/O errors
//!
//! Nothing in this crate draws. A renderer reads [`Snapshot`] after each tick.

pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::{MotesError, Result};
pub use settings::{QualityPreset, Settings, Viewport};
pub use sim::{
    BlendMode, Element, ParticleKind, ParticleSystem, Property, Rgba, TickReport, Trig, TrigTable,
};
pub use snapshot::{ParticleInstance, ParticleView, Shape, Snapshot};

use std::f64::consts::TAU;

/// Simulation constants
pub mod consts {
    /// Nominal tick duration all per-tick rates are tuned against (60 FPS)
    pub const REFERENCE_FRAME_SECS: f64 = 1.0 / 60.0;

    /// Fraction of the impact speed kept after a bounce
    pub const REFLECTION_DAMPING: f64 = 0.8;
    /// Alpha below which a particle is removed
    pub const FADE_OUT_LIMIT: f64 = 0.01;
    /// Extra distance past the viewport edge before a particle is culled
    pub const WORLD_MARGIN: f64 = 10.0;

    /// Values smaller than this are treated as zero
    pub const EPSILON: f64 = 0.00001;

    /// Raster resolution range for dot particles
    pub const MIN_RESOLUTION: f64 = 1.0;
    pub const MAX_RESOLUTION: f64 = 8.0;
    pub const DEFAULT_RESOLUTION: f64 = 3.0;

    /// Smallest size a template may carry
    pub const MIN_SIZE: f64 = 1.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Degrees to radians, wrapped into [0, 2π); NaN maps to 0
pub fn degrees_to_radians(degrees: f64) -> f64 {
    if degrees.is_nan() {
        return 0.0;
    }
    wrap_angle(degrees.to_radians())
}

/// An angular spread in degrees to radians, clamped to [0, 2π]; NaN maps to 0
pub fn degree_range_to_radians(degrees: f64) -> f64 {
    if degrees.is_nan() {
        return 0.0;
    }
    degrees.clamp(0.0, 360.0).to_radians()
}
