//! Loader configuration

use serde::{Deserialize, Serialize};

use crate::LoaderError;

/// Whether the placeholder pulses while waiting for the real image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderEffect {
    #[default]
    Enabled,
    Disabled,
}

impl PlaceholderEffect {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, PlaceholderEffect::Enabled)
    }
}

/// Placeholder pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulseConfig {
    /// One brightness cycle, in milliseconds
    pub duration_ms: f64,
    /// Brightness at the middle of the cycle
    pub peak_brightness: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
            peak_brightness: 1.5,
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Pulse for the single-image variant
    pub image_effect: PlaceholderEffect,
    /// Pulse for the picture variant
    pub picture_effect: PlaceholderEffect,
    pub pulse: PulseConfig,
    /// Margin around the viewport that still counts as visible
    pub root_margin: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            image_effect: PlaceholderEffect::Enabled,
            picture_effect: PlaceholderEffect::Enabled,
            pulse: PulseConfig::default(),
            root_margin: "0px".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Parse from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same effect for both variants
    pub fn with_placeholder_effect(mut self, effect: PlaceholderEffect) -> Self {
        self.image_effect = effect;
        self.picture_effect = effect;
        self
    }

    pub fn with_image_effect(mut self, effect: PlaceholderEffect) -> Self {
        self.image_effect = effect;
        self
    }

    pub fn with_picture_effect(mut self, effect: PlaceholderEffect) -> Self {
        self.picture_effect = effect;
        self
    }

    pub fn with_root_margin(mut self, margin: &str) -> Self {
        self.root_margin = margin.to_string();
        self
    }
}
