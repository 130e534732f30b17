//! Stamping new particles out of a template
//!
//! Jitter shapes:
//! - size: flat, half-range `size * random_power * 0.03`
//! - angle: flat over the spread plus a bell-shaped shake (product of three samples)
//! - speed: skewed upward, `[-random_power / 2, random_power)`
//! - spin: flat, half-range `random_power * 0.002`

use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

use super::pool::ParticlePool;
use super::state::{Element, ParticleKind, Property};
use crate::consts::MIN_SIZE;
use crate::settings::Viewport;
use crate::wrap_angle;

const SIZE_JITTER: f64 = 0.03;
const SHAKE_JITTER: f64 = 0.05;
const SPIN_JITTER: f64 = 0.002;

/// Coordinate space new particles are placed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnSpace {
    /// Particles live in world coordinates
    World,
    /// Particles live in world / resolution; spawns off screen are skipped
    Raster { viewport: Viewport, resolution: f64 },
}

/// Uniform sample in [lo, hi); `lo` when the range is empty, NaN or unbounded
#[inline]
pub(crate) fn uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Append `quantity` particles derived from `property` to the pool.
///
/// Returns the number created. Non-positive quantities are a no-op.
pub fn create<R: Rng>(
    pool: &mut ParticlePool,
    property: &Property,
    kind: ParticleKind,
    space: SpawnSpace,
    quantity: i32,
    rng: &mut R,
) -> usize {
    if quantity <= 0 {
        return 0;
    }

    let Some(origin) = spawn_origin(property, space) else {
        return 0;
    };

    let power = property.random_power;
    let size_range = property.size * power * SIZE_JITTER;
    let shake_range = (property.angle_range * power + power) * SHAKE_JITTER;
    let spread_half = property.angle_range * 0.5;
    let speed_lower = -power * 0.5;
    let spin_range = power * SPIN_JITTER;

    for _ in 0..quantity {
        let shake = uniform(rng, -shake_range, shake_range)
            * rng.random::<f64>()
            * rng.random::<f64>();
        let spread = uniform(rng, -spread_half, spread_half);
        let angle = wrap_angle(property.angle + spread + shake);

        let speed = (property.speed + uniform(rng, speed_lower, power)).max(0.0);

        let mut element = Element::new(origin, angle, speed, property.color);

        if kind.has_size() {
            let size = property.size + uniform(rng, -size_range, size_range);
            element = element.with_size(size.max(MIN_SIZE));
        }

        if kind.rotates() {
            let rotation = uniform(rng, 0.0, TAU);
            let spin = property.rotation_speed + uniform(rng, -spin_range, spin_range);
            element = element.with_rotation(rotation, spin);
        }

        pool.push(element);
    }

    quantity as usize
}

/// Spawn origin for a template in the given space (None when skipped)
pub fn spawn_origin(property: &Property, space: SpawnSpace) -> Option<DVec2> {
    match space {
        SpawnSpace::World => Some(property.position),
        SpawnSpace::Raster {
            viewport,
            resolution,
        } => viewport
            .contains(property.position.x, property.position.y)
            .then(|| property.position / resolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_zero_random_power_gives_exact_speed() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_speed(4.25);
        property.set_random_power(0.0);

        create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 50, &mut rng());
        assert_eq!(pool.len(), 50);
        assert!(pool.as_slice().iter().all(|e| e.speed == 4.25));
        assert!(pool.as_slice().iter().all(|e| e.size == property.size));
    }

    #[test]
    fn test_non_positive_quantity_is_noop() {
        let mut pool = ParticlePool::default();
        let property = Property::default();
        assert_eq!(create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 0, &mut rng()), 0);
        assert_eq!(create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, -3, &mut rng()), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_jitter_bounds() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_speed(5.0);
        property.set_size(10.0);
        property.set_random_power(4.0);
        property.set_angle_degrees(90.0);
        property.set_angle_range_degrees(0.0);

        create(&mut pool, &property, ParticleKind::Star, SpawnSpace::World, 500, &mut rng());

        let shake = (0.0 * 4.0 + 4.0) * SHAKE_JITTER;
        for e in pool.as_slice() {
            assert!(e.speed >= 5.0 - 2.0 - 1e-9 && e.speed < 5.0 + 4.0);
            assert!((e.size - 10.0).abs() <= 10.0 * 4.0 * SIZE_JITTER + 1e-9);
            let mut diff = (e.travel_angle - std::f64::consts::FRAC_PI_2).abs();
            if diff > std::f64::consts::PI {
                diff = TAU - diff;
            }
            assert!(diff <= shake + 1e-12);
            assert!((0.0..TAU).contains(&e.rotation));
            assert!((e.rotation_speed).abs() <= 4.0 * SPIN_JITTER);
        }
    }

    #[test]
    fn test_speed_skews_faster() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_speed(10.0);
        property.set_random_power(6.0);
        create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 2000, &mut rng());

        let faster = pool.as_slice().iter().filter(|e| e.speed > 10.0).count();
        assert!(faster > 1000, "only {faster} of 2000 faster than base");
    }

    #[test]
    fn test_template_is_not_mutated() {
        let mut pool = ParticlePool::default();
        let property = Property::default();
        let before = property.clone();
        create(&mut pool, &property, ParticleKind::Texture, SpawnSpace::World, 10, &mut rng());
        assert_eq!(property, before);
    }

    #[test]
    fn test_raster_space_scales_and_skips_off_screen() {
        let space = SpawnSpace::Raster {
            viewport: Viewport::new(800.0, 600.0),
            resolution: 4.0,
        };
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_position(DVec2::new(400.0, 200.0));

        assert_eq!(create(&mut pool, &property, ParticleKind::Dot, space, 3, &mut rng()), 3);
        assert!(pool.as_slice().iter().all(|e| e.position == DVec2::new(100.0, 50.0)));
        assert!(pool.as_slice().iter().all(|e| e.size == MIN_SIZE));

        property.set_position(DVec2::new(-1.0, 200.0));
        assert_eq!(create(&mut pool, &property, ParticleKind::Dot, space, 3, &mut rng()), 0);
        assert_eq!(spawn_origin(&property, space), None);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_jittered_size_never_below_minimum() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_size(1.0);
        property.set_random_power(3.0);
        create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 500, &mut rng());
        assert!(pool.as_slice().iter().all(|e| e.size >= MIN_SIZE));
    }

    #[test]
    fn test_huge_random_power_does_not_panic() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_random_power(1e308);
        assert_eq!(create(&mut pool, &property, ParticleKind::Star, SpawnSpace::World, 4, &mut rng()), 4);
        assert!(pool.as_slice().iter().all(|e| e.speed >= 0.0 && e.size >= MIN_SIZE));
    }

    #[test]
    fn test_nan_spread_does_not_panic() {
        let mut pool = ParticlePool::default();
        let mut property = Property::default();
        property.set_angle_range_degrees(f64::NAN);
        assert_eq!(property.angle_range, 0.0);
        assert_eq!(create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 3, &mut rng()), 3);

        // Unchecked field write
        property.angle_range = f64::NAN;
        assert_eq!(create(&mut pool, &property, ParticleKind::Circle, SpawnSpace::World, 3, &mut rng()), 3);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_uniform_degenerate_ranges() {
        let mut r = rng();
        assert_eq!(uniform(&mut r, 2.0, 2.0), 2.0);
        assert_eq!(uniform(&mut r, 3.0, 1.0), 3.0);
        assert!(uniform(&mut r, f64::NAN, 1.0).is_nan());
        assert_eq!(uniform(&mut r, -f64::MAX, f64::MAX), -f64::MAX);
        let x = uniform(&mut r, -1.0, 1.0);
        assert!((-1.0..1.0).contains(&x));
    }
}
