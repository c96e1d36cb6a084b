//! View parameters of the level scene.
//!
//! The scene renderer belongs to the host; the session only keeps the
//! numbers it projects with, so they survive page switches and stay inside
//! the configured pitch range.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

use crate::config::GameConfig;

/// Yaw, pitch and zoom of the level view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Rotation around the vertical axis, in radians.
    pub yaw: f32,
    /// Tilt above the ground plane, in radians.
    pub pitch: f32,
    /// Scale factor; always positive.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: FRAC_PI_4,
            pitch: FRAC_PI_6,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Change any of the three parameters. Pitch is clamped to the
    /// configured range; a zoom that is not positive is ignored.
    pub fn update_position(
        &mut self,
        config: &GameConfig,
        yaw: Option<f32>,
        pitch: Option<f32>,
        zoom: Option<f32>,
    ) {
        if let Some(yaw) = yaw.filter(|y| y.is_finite()) {
            self.yaw = yaw;
        }
        if let Some(pitch) = pitch.filter(|p| p.is_finite()) {
            self.pitch = config.clamp_pitch(pitch);
        }
        if let Some(zoom) = zoom.filter(|z| z.is_finite() && *z > 0.0) {
            self.zoom = zoom;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped_zoom_guarded() {
        let config = GameConfig::default();
        let mut camera = Camera::default();
        camera.update_position(&config, None, Some(-1.0), Some(0.0));
        assert!((camera.pitch - config.pitch_min).abs() < f32::EPSILON);
        assert!((camera.zoom - 1.0).abs() < f32::EPSILON);
        camera.update_position(&config, Some(1.0), None, Some(2.0));
        assert!((camera.yaw - 1.0).abs() < f32::EPSILON);
        assert!((camera.zoom - 2.0).abs() < f32::EPSILON);
        assert!((camera.pitch - config.pitch_min).abs() < f32::EPSILON);
    }
}
