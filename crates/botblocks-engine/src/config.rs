//! Game configuration, read from JSON.
//!
//! ```json
//! {"step_delay_ms": 300, "font_size": 24, "debug_outlines": true}
//! ```
//!
//! Every field is optional. Numbers that earlier revisions of the game
//! disagreed on (pitch clamp, click-vs-drag threshold) live here.

use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;
use std::time::Duration;

use botblocks_common::Font;
use botblocks_program::BlockStyle;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for this shape.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pause between executed moves.
    pub step_delay_ms: u64,
    /// A press held at least this long becomes a drag.
    pub drag_threshold_ms: u64,
    /// Lowest camera pitch, in radians.
    pub pitch_min: f32,
    /// Highest camera pitch, in radians.
    pub pitch_max: f32,
    /// Default font family for markup text.
    pub font_family: String,
    /// Default font size for markup text.
    pub font_size: f32,
    /// Outline containers when painting.
    pub debug_outlines: bool,
    /// `id` of the element the program is drawn in.
    pub program_area: String,
    /// `id` of the element the block palette is drawn in.
    pub palette_area: String,
    /// Block geometry for the program and the palette.
    pub blocks: BlockStyle,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 500,
            drag_threshold_ms: 200,
            pitch_min: 0.1,
            pitch_max: FRAC_PI_2,
            font_family: "sans".to_string(),
            font_size: 30.0,
            debug_outlines: false,
            program_area: "program".to_string(),
            palette_area: "palette".to_string(),
            blocks: BlockStyle::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Malformed JSON, or values rejected by [`GameConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// I/O failures, plus everything [`GameConfig::from_json`] rejects.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// A non-positive or non-finite font size, or an empty or inverted
    /// pitch range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if !(self.pitch_min.is_finite() && self.pitch_max.is_finite())
            || self.pitch_min > self.pitch_max
        {
            return Err(ConfigError::Invalid(format!(
                "pitch range {}..{} is empty",
                self.pitch_min, self.pitch_max
            )));
        }
        Ok(())
    }

    /// [`GameConfig::step_delay_ms`] as a duration.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// [`GameConfig::drag_threshold_ms`] as a duration.
    #[must_use]
    pub const fn drag_threshold(&self) -> Duration {
        Duration::from_millis(self.drag_threshold_ms)
    }

    /// Default markup font.
    #[must_use]
    pub fn font(&self) -> Font {
        Font::new(self.font_family.clone(), self.font_size)
    }

    /// Clamp a pitch into the configured range.
    ///
    /// The range must have passed [`GameConfig::validate`].
    #[must_use]
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(self.pitch_min, self.pitch_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.step_delay(), Duration::from_millis(500));
        assert_eq!(config.drag_threshold(), Duration::from_millis(200));
        assert_eq!(config.font(), Font::new("sans", 30.0));
        assert!(!config.debug_outlines);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{"step_delay_ms": 250, "debug_outlines": true}"#)
            .expect("valid config");
        assert_eq!(config.step_delay_ms, 250);
        assert!(config.debug_outlines);
        assert_eq!(config.drag_threshold_ms, 200);
        assert_eq!(config.program_area, "program");
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(matches!(
            GameConfig::from_json(r#"{"font_size": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"pitch_min": 1.0, "pitch_max": 0.5}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_pitch_clamp() {
        let config = GameConfig::default();
        assert!((config.clamp_pitch(0.0) - 0.1).abs() < f32::EPSILON);
        assert!((config.clamp_pitch(3.0) - FRAC_PI_2).abs() < f32::EPSILON);
        assert!((config.clamp_pitch(0.5) - 0.5).abs() < f32::EPSILON);
    }
}
