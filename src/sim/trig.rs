//! Trigonometry source for the hot loops
//!
//! `Trig::Exact` calls libm. `Trig::Table` trades a few thousandths of a
//! radian of accuracy for table lookups. Both are plain values passed into the
//! integrator and collision resolver; there is no global instance.

use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::consts::EPSILON;

/// Sine samples per radian
const SIN_RESOLUTION: f64 = 2000.0;
/// Sine table covers [0, π)
const SIN_TABLE_LEN: usize = (PI * SIN_RESOLUTION) as usize;
/// Index span of one full turn
const SIN_SCALED_TAU: usize = (TAU * SIN_RESOLUTION) as usize;
/// Arcsine table is indexed by ratio² in [0, 1]
const ASIN_TABLE_LEN: usize = 3000;

/// Precomputed sine and arcsine tables
#[derive(Debug, Clone)]
pub struct TrigTable {
    sin: Vec<f64>,
    asin: Vec<f64>,
}

impl Default for TrigTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TrigTable {
    pub fn new() -> Self {
        let sin = (0..SIN_TABLE_LEN)
            .map(|i| {
                let n = (i as f64 / SIN_RESOLUTION).sin();
                if n < EPSILON { 0.0 } else { n }
            })
            .collect();

        let max = (ASIN_TABLE_LEN - 1) as f64;
        let asin = (0..ASIN_TABLE_LEN)
            .map(|i| {
                let n = (i as f64 / max).sqrt().asin();
                if n < EPSILON { 0.0 } else { n }
            })
            .collect();

        Self { sin, asin }
    }

    pub fn sin(&self, radians: f64) -> f64 {
        let id = ((radians * SIN_RESOLUTION) as i64).unsigned_abs() as usize % SIN_SCALED_TAU;
        let negative = radians < 0.0;

        // Second half-turn mirrors the first with the sign flipped
        if id < SIN_TABLE_LEN {
            let v = self.sin[id];
            if negative { -v } else { v }
        } else {
            let v = self.sin[(id - SIN_TABLE_LEN).min(SIN_TABLE_LEN - 1)];
            if negative { v } else { -v }
        }
    }

    pub fn cos(&self, radians: f64) -> f64 {
        self.sin(radians + FRAC_PI_2)
    }

    pub fn asin(&self, ratio: f64) -> f64 {
        let id = ((ratio * ratio * ASIN_TABLE_LEN as f64 + 0.5) as usize).min(ASIN_TABLE_LEN - 1);
        let v = self.asin[id];
        if ratio < 0.0 { -v } else { v }
    }

    pub fn acos(&self, ratio: f64) -> f64 {
        FRAC_PI_2 - self.asin(ratio)
    }

    /// Signed angle of a vector in (-π, π], from the cosine against +x and the sign of y
    pub fn direction(&self, v: DVec2) -> f64 {
        let len = v.length();
        if len < EPSILON {
            return 0.0;
        }
        let cos = v.x / len;
        if v.y < 0.0 { -self.acos(cos) } else { self.acos(cos) }
    }
}

/// Where the simulation gets its sine, cosine and direction from
#[derive(Debug, Clone, Default)]
pub enum Trig {
    #[default]
    Exact,
    Table(Box<TrigTable>),
}

impl Trig {
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast {
            Trig::Table(Box::new(TrigTable::new()))
        } else {
            Trig::Exact
        }
    }

    #[inline]
    pub fn sin(&self, radians: f64) -> f64 {
        match self {
            Trig::Exact => radians.sin(),
            Trig::Table(table) => table.sin(radians),
        }
    }

    #[inline]
    pub fn cos(&self, radians: f64) -> f64 {
        match self {
            Trig::Exact => radians.cos(),
            Trig::Table(table) => table.cos(radians),
        }
    }

    /// Unit vector pointing along `radians`
    #[inline]
    pub fn unit(&self, radians: f64) -> DVec2 {
        DVec2::new(self.cos(radians), self.sin(radians))
    }

    /// Signed angle of a vector in (-π, π]; 0 for a zero-length vector
    #[inline]
    pub fn direction(&self, v: DVec2) -> f64 {
        match self {
            Trig::Exact => super::geometry::direction(v),
            Trig::Table(table) => table.direction(v),
        }
    }
}
