//! Read-only particle views handed to a renderer after each tick

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BlendMode, Element, ParticleKind, Rgba};

/// What to draw for one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A single raster cell
    Dot,
    Circle { size: f64 },
    Star { size: f64, rotation: f64 },
    Rect { size: f64, rotation: f64 },
    Pentagon { size: f64, rotation: f64 },
    Textured { size: f64, rotation: f64 },
}

impl Shape {
    fn of(kind: ParticleKind, e: &Element) -> Self {
        match kind {
            ParticleKind::Dot => Shape::Dot,
            ParticleKind::Circle => Shape::Circle { size: e.size },
            ParticleKind::Star => Shape::Star {
                size: e.size,
                rotation: e.rotation,
            },
            ParticleKind::Rect => Shape::Rect {
                size: e.size,
                rotation: e.rotation,
            },
            ParticleKind::Pentagon => Shape::Pentagon {
                size: e.size,
                rotation: e.rotation,
            },
            ParticleKind::Texture => Shape::Textured {
                size: e.size,
                rotation: e.rotation,
            },
        }
    }

    pub fn size(&self) -> Option<f64> {
        match *self {
            Shape::Dot => None,
            Shape::Circle { size }
            | Shape::Star { size, .. }
            | Shape::Rect { size, .. }
            | Shape::Pentagon { size, .. }
            | Shape::Textured { size, .. } => Some(size),
        }
    }

    pub fn rotation(&self) -> Option<f64> {
        match *self {
            Shape::Dot | Shape::Circle { .. } => None,
            Shape::Star { rotation, .. }
            | Shape::Rect { rotation, .. }
            | Shape::Pentagon { rotation, .. }
            | Shape::Textured { rotation, .. } => Some(rotation),
        }
    }

    /// Small integer tag for shaders
    pub fn tag(&self) -> u32 {
        match self {
            Shape::Dot => 0,
            Shape::Circle { .. } => 1,
            Shape::Star { .. } => 2,
            Shape::Rect { .. } => 3,
            Shape::Pentagon { .. } => 4,
            Shape::Textured { .. } => 5,
        }
    }
}

/// One particle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: DVec2,
    /// Where the particle was before the last tick (for trails)
    pub previous_position: DVec2,
    pub color: Rgba,
    pub shape: Shape,
}

impl ParticleView {
    pub fn size(&self) -> Option<f64> {
        self.shape.size()
    }

    pub fn rotation(&self) -> Option<f64> {
        self.shape.rotation()
    }
}

/// Every live particle of one system after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blend_mode: BlendMode,
    pub kind: ParticleKind,
    /// Edge length of a raster cell in world units (1 outside raster kinds)
    pub cell_size: f64,
    pub particles: Vec<ParticleView>,
}

impl Snapshot {
    /// Capture `elements`, multiplying positions by `scale` to get world coordinates.
    /// Disabled elements are left out.
    pub fn capture(
        kind: ParticleKind,
        blend_mode: BlendMode,
        elements: &[Element],
        scale: f64,
    ) -> Self {
        let particles = elements
            .iter()
            .filter(|e| e.enabled)
            .map(|e| ParticleView {
                position: e.position * scale,
                previous_position: e.previous_position * scale,
                color: e.color,
                shape: Shape::of(kind, e),
            })
            .collect();
        Self {
            blend_mode,
            kind,
            cell_size: scale,
            particles,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Pack the particles for an instanced draw call
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .map(|p| ParticleInstance::new(p, self.cell_size))
            .collect()
    }
}

/// GPU instance data, one per particle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// x, y, size, unused
    pub pos_size: [f32; 4],
    pub color: [f32; 4],
    /// sin, cos, angle, shape tag
    pub rotation: [f32; 4],
}

impl ParticleInstance {
    /// Dots take the raster cell size as their size
    pub fn new(view: &ParticleView, cell_size: f64) -> Self {
        let size = view.size().unwrap_or(cell_size);
        let angle = view.rotation().unwrap_or(0.0);
        Self {
            pos_size: [view.position.x as f32, view.position.y as f32, size as f32, 0.0],
            color: view.color.to_array(),
            rotation: [
                angle.sin() as f32,
                angle.cos() as f32,
                angle as f32,
                view.shape.tag() as f32,
            ],
        }
    }
}
