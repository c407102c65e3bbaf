//! Player preferences
//!
//! Persisted separately from progression under its own storage key.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Particle cap for a single combo burst
    pub fn max_combo_particles(&self) -> u32 {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 5,
            QualityPreset::High => 8,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Combo particle bursts
    pub particles: bool,
    /// Speed scalar used for new battles
    pub speed: f32,
    /// Audio muted
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            speed: DEFAULT_SPEED,
            muted: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "rps_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap per combo burst
    pub fn max_combo_particles(&self) -> u32 {
        if !self.particles {
            0
        } else {
            self.quality.max_combo_particles()
        }
    }

    /// Set the battle speed, clamped to the slider range
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }
}
