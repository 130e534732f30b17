//! Particle system facade
//!
//! Owns the pool, the emission template, the per-tick obstacle registry and
//! the RNG. One `tick` runs integrate, collide and compact to completion.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{self, Response};
use super::emitter::{self, SpawnSpace};
use super::obstacle::ObstacleSet;
use super::pool::ParticlePool;
use super::state::{Element, ParticleKind, Property};
use super::tick::{Bounds, Integrator, Step};
use super::trig::Trig;
use crate::settings::{Settings, Viewport, clamp_resolution};
use crate::snapshot::Snapshot;

/// Counts from one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Particles left after compaction
    pub alive: usize,
    /// Bounces and embedded removals applied by the collision pass
    pub collisions: usize,
    /// Particles compacted away this tick
    pub removed: usize,
}

/// A population of particles of one kind sharing one template
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    kind: ParticleKind,
    property: Property,
    pool: ParticlePool,
    obstacles: ObstacleSet,
    settings: Settings,
    trig: Trig,
    rng: Pcg32,
    /// Resolution the pool's raster coordinates are expressed in
    previous_resolution: f64,
    resolution_changed: bool,
}

impl ParticleSystem {
    pub fn new(kind: ParticleKind, settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let trig = Trig::from_fast_flag(settings.fast_trig);
        log::info!(
            "{:?} particle system: viewport {}x{}, quality {}, fast trig {}",
            kind,
            settings.viewport.width,
            settings.viewport.height,
            settings.quality.as_str(),
            settings.fast_trig
        );
        Self {
            kind,
            property: Property::for_kind(kind),
            pool: ParticlePool::with_capacity(kind.default_reserve()),
            obstacles: ObstacleSet::default(),
            previous_resolution: settings.resolution,
            resolution_changed: false,
            settings,
            trig,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Edits apply to the next `create` and, for rate fields, the next `tick`.
    ///
    /// Fields written directly are unchecked; spawn fields are clamped again
    /// each time particles are created.
    pub fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }

    pub fn set_property(&mut self, property: Property) {
        self.property = property.sanitized();
    }

    pub fn elements(&self) -> &[Element] {
        self.pool.as_slice()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Drop every particle and any pending obstacles
    pub fn clear(&mut self) {
        self.pool.clear();
        self.obstacles.clear();
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.settings.viewport = Viewport::new(width, height);
    }

    /// Raster cell size for dot systems, clamped to [1, 8].
    ///
    /// Live dots are rescaled so they keep their world position.
    pub fn set_resolution(&mut self, resolution: f64) {
        let resolution = clamp_resolution(resolution);
        self.settings.resolution = resolution;
        if resolution == self.previous_resolution {
            return;
        }

        log::info!("resolution {} -> {}", self.previous_resolution, resolution);
        if self.kind.is_raster() {
            let factor = self.previous_resolution / resolution;
            for e in self.pool.as_mut_slice() {
                e.position *= factor;
                e.previous_position *= factor;
            }
        }
        self.previous_resolution = resolution;
        self.resolution_changed = true;
    }

    /// True once after each resolution change; a renderer reallocates its raster then
    pub fn take_resolution_change(&mut self) -> bool {
        std::mem::take(&mut self.resolution_changed)
    }

    /// Spawn `quantity` particles from this system's own template
    pub fn create(&mut self, quantity: i32) -> usize {
        let property = self.property.clone();
        self.emit(&property, quantity)
    }

    /// Spawn `quantity` particles from `property`.
    ///
    /// Spawn fields come from a clamped copy of `property`; the system's own
    /// template still drives the per-tick rates.
    pub fn emit(&mut self, property: &Property, quantity: i32) -> usize {
        let property = property.clone().sanitized();
        let space = self.spawn_space();
        emitter::create(&mut self.pool, &property, self.kind, space, quantity, &mut self.rng)
    }

    pub fn register_line(&mut self, start: DVec2, end: DVec2) {
        self.obstacles.add_line(start, end);
    }

    pub fn register_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.obstacles.add_rect(left, top, right, bottom);
    }

    pub fn register_circle(&mut self, center: DVec2, radius: f64) {
        self.obstacles.add_circle(center, radius);
    }

    /// Fewer than three vertices is ignored
    pub fn register_polygon(&mut self, vertices: &[DVec2]) {
        self.obstacles.add_polygon(vertices);
    }

    /// Fewer than two vertices is ignored
    pub fn register_polyline(&mut self, vertices: &[DVec2]) {
        self.obstacles.add_polyline(vertices);
    }

    /// Obstacles registered for the next tick
    pub fn pending_obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Advance the simulation by `delta_secs`.
    ///
    /// Obstacles registered since the last tick are used once and discarded.
    pub fn tick(&mut self, delta_secs: f64) -> TickReport {
        let step = Step::new(delta_secs, self.settings.reference_frame_secs);

        let integrator = Integrator {
            property: &self.property,
            kind: self.kind,
            bounds: self.bounds(),
            fade_out_limit: self.settings.fade_out_limit,
            trig: &self.trig,
        };
        integrator.advance(self.pool.as_mut_slice(), step);

        if self.kind.is_raster() {
            self.obstacles.scale(1.0 / self.previous_resolution);
        }
        if self.settings.shuffle_obstacles {
            self.obstacles.shuffle(&mut self.rng);
        }
        let response = Response {
            trig: &self.trig,
            time_scale: step.time_scale,
            damping: self.settings.reflection_damping,
        };
        let collisions = collision::resolve(self.pool.as_mut_slice(), &self.obstacles, response);
        self.obstacles.clear();

        let removed = self.pool.compact();
        let report = TickReport {
            alive: self.pool.len(),
            collisions,
            removed,
        };
        if report.collisions > 0 || report.removed > 0 {
            log::debug!(
                "tick {:.4}s (x{:.2}): {} alive, {} collisions, {} removed",
                step.delta_secs,
                step.time_scale,
                report.alive,
                report.collisions,
                report.removed
            );
        }
        report
    }

    /// Live particles in world coordinates
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.kind,
            self.property.blend_mode,
            self.pool.as_slice(),
            self.world_scale(),
        )
    }

    fn world_scale(&self) -> f64 {
        if self.kind.is_raster() { self.previous_resolution } else { 1.0 }
    }

    fn spawn_space(&self) -> SpawnSpace {
        if self.kind.is_raster() {
            SpawnSpace::Raster {
                viewport: self.settings.viewport,
                resolution: self.previous_resolution,
            }
        } else {
            SpawnSpace::World
        }
    }

    fn bounds(&self) -> Bounds {
        let viewport = self.settings.viewport;
        if self.kind.is_raster() {
            Bounds::Raster {
                width: viewport.width / self.previous_resolution,
                height: viewport.height / self.previous_resolution,
            }
        } else {
            Bounds::Padded {
                width: viewport.width,
                height: viewport.height,
                margin: self.settings.world_margin,
            }
        }
    }
}
