//! Game settings and preferences
//!
//! Persisted as JSON in the key-value store, separately from the best score.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Next preset in the Low, Medium, High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// `quality=` parameter of a URL query string such as `?quality=low&x=1`
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "quality")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Triangles per circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 40,
        }
    }

    /// Whether to draw clouds, sun rays and grass
    pub fn scenery_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Merge splashes and score popups
    pub particles: bool,
    /// Sound cues on drop, merge, win and game over
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            sound_enabled: true,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "watermelon-settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Flip the sound toggle, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Advance to the next quality preset
    pub fn cycle_quality(&mut self) -> QualityPreset {
        self.quality = self.quality.next();
        self.quality
    }

    /// Flip merge splashes on or off, returning the new state
    pub fn toggle_particles(&mut self) -> bool {
        self.particles = !self.particles;
        self.particles
    }

    /// Nudge the master volume, clamped to 0.0 - 1.0
    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
        self.master_volume
    }

    /// Load settings, falling back to defaults on missing or bad data
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
