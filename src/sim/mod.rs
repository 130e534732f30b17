//! Particle simulation
//!
//! A tick runs to completion in a fixed order:
//! - integrate: fade, recolor, resize, move, apply gravity, cull, decay speed, spin
//! - collide: swept tests against this tick's obstacles, then clear them
//! - compact: swap-remove every disabled particle
//!
//! No rendering or platform dependencies. Randomness comes only from the
//! system's seeded RNG.

pub mod collision;
pub mod emitter;
pub mod geometry;
pub mod obstacle;
pub mod pool;
pub mod state;
pub mod system;
pub mod tick;
pub mod trig;

pub use collision::{Contact, Response, resolve};
pub use emitter::SpawnSpace;
pub use geometry::{Circle, Line, Polygon, Polyline, Rect, direction, reflection_angle};
pub use obstacle::ObstacleSet;
pub use pool::ParticlePool;
pub use state::{BlendMode, Element, ParticleKind, Property, Rgba};
pub use system::{ParticleSystem, TickReport};
pub use tick::{Bounds, Integrator, Step};
pub use trig::{Trig, TrigTable};
