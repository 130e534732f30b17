//! Simulation settings
//!
//! Loaded from and saved to JSON. Out-of-range values are clamped, never rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Raster resolution for dot particles (higher is coarser and cheaper)
    pub fn resolution(&self) -> f64 {
        match self {
            QualityPreset::Low => 4.0,
            QualityPreset::Medium => DEFAULT_RESOLUTION,
            QualityPreset::High => MIN_RESOLUTION,
        }
    }

    /// Whether to use lookup-table trigonometry
    pub fn fast_trig(&self) -> bool {
        matches!(self, QualityPreset::Low)
    }
}

/// Visible area particles live in, in world units (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Whether a world-space point lies on screen
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quality preset the remaining fields were derived from
    pub quality: QualityPreset,

    /// Visible area; particles leaving it are culled
    pub viewport: Viewport,
    /// Nominal tick duration all per-tick rates are expressed in
    pub reference_frame_secs: f64,

    /// Fraction of impact speed kept after a bounce
    pub reflection_damping: f64,
    /// Alpha below which particles are removed
    pub fade_out_limit: f64,
    /// Cull distance past the viewport edge (added to particle size)
    pub world_margin: f64,
    /// Rotate each obstacle list by a random offset every tick
    pub shuffle_obstacles: bool,

    /// Lookup-table trigonometry instead of libm
    pub fast_trig: bool,
    /// Dot raster resolution (1.0 = full, 8.0 = coarsest)
    pub resolution: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            viewport: Viewport::default(),
            reference_frame_secs: REFERENCE_FRAME_SECS,

            reflection_damping: REFLECTION_DAMPING,
            fade_out_limit: FADE_OUT_LIMIT,
            world_margin: WORLD_MARGIN,
            shuffle_obstacles: true,

            fast_trig: false,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.resolution = preset.resolution();
        self.fast_trig = preset.fast_trig();
    }

    /// Copy with every numeric field clamped into its valid range
    pub fn sanitized(mut self) -> Self {
        self.viewport = Viewport::new(self.viewport.width, self.viewport.height);
        if self.reference_frame_secs.is_nan() || self.reference_frame_secs <= EPSILON {
            self.reference_frame_secs = REFERENCE_FRAME_SECS;
        }
        self.reflection_damping = self.reflection_damping.clamp(0.0, 1.0);
        self.fade_out_limit = self.fade_out_limit.max(0.0);
        self.world_margin = self.world_margin.max(0.0);
        self.resolution = clamp_resolution(self.resolution);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

/// Clamp a raster resolution into [1, 8]; NaN falls back to the default
pub fn clamp_resolution(resolution: f64) -> f64 {
    if resolution.is_nan() {
        return DEFAULT_RESOLUTION;
    }
    resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::parse(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_apply_low_preset() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(settings.fast_trig);
        assert_eq!(settings.resolution, 4.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "viewport": { "width": 1280, "height": 720 } }"#)
            .unwrap();
        assert_eq!(settings.viewport, Viewport::new(1280.0, 720.0));
        assert_eq!(settings.reference_frame_secs, REFERENCE_FRAME_SECS);
        assert!(settings.shuffle_obstacles);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = Settings::from_json(
            r#"{ "reference_frame_secs": 0.0, "reflection_damping": 3.0, "resolution": 20.0,
                 "viewport": { "width": -5, "height": 0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.reference_frame_secs, REFERENCE_FRAME_SECS);
        assert_eq!(settings.reflection_damping, 1.0);
        assert_eq!(settings.resolution, MAX_RESOLUTION);
        assert_eq!(settings.viewport.width, 1.0);
        assert_eq!(settings.viewport.height, 1.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("motes_settings_{}.json", std::process::id()));
        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.viewport = Viewport::new(320.0, 240.0);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.quality, QualityPreset::High);
        assert_eq!(loaded.viewport, settings.viewport);
        assert_eq!(loaded.resolution, MIN_RESOLUTION);
        assert!((loaded.reference_frame_secs - REFERENCE_FRAME_SECS).abs() < 1e-12);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/nonexistent/motes/settings.json").unwrap_err();
        assert!(matches!(err, crate::MotesError::Io(_)));
    }

    #[test]
    fn test_clamp_resolution_nan() {
        assert_eq!(clamp_resolution(f64::NAN), DEFAULT_RESOLUTION);
        assert_eq!(clamp_resolution(0.5), MIN_RESOLUTION);
    }
}
