//! Runtime configuration for the scene and its orbit view.

use std::path::PathBuf;

/// Scene settings with builder-style overrides.
///
/// ```
/// use strata::config::SceneConfig;
///
/// let config = SceneConfig::default()
///     .with_asset_dir("demo_assets")
///     .with_zoom(10.0);
/// assert_eq!(config.initial_zoom, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub asset_dir: PathBuf,
    pub initial_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom units per scroll line
    pub scroll_sensitivity: f32,
    /// Degrees of orbit per pixel of cursor motion
    pub cursor_sensitivity: f32,
    /// Pitch limit in degrees, applied symmetrically
    pub pitch_limit: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub viewport: (u32, u32),
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            initial_zoom: 7.0,
            min_zoom: 2.0,
            max_zoom: 30.0,
            scroll_sensitivity: 1.0,
            cursor_sensitivity: 1.0 / std::f32::consts::PI,
            pitch_limit: 89.99,
            fov_y: 75.0,
            z_near: 0.01,
            z_far: 100.0,
            viewport: (1280, 720),
        }
    }
}

impl SceneConfig {
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.initial_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn with_zoom_limits(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self.initial_zoom = self.initial_zoom.clamp(min, max);
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn with_fov(mut self, degrees: f32) -> Self {
        self.fov_y = degrees;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.z_near = near;
        self.z_far = far;
        self
    }

    pub fn with_sensitivity(mut self, cursor: f32, scroll: f32) -> Self {
        self.cursor_sensitivity = cursor;
        self.scroll_sensitivity = scroll;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.viewport;
        width as f32 / height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.initial_zoom, 7.0);
        assert_eq!((config.min_zoom, config.max_zoom), (2.0, 30.0));
        assert_eq!(config.fov_y, 75.0);
        assert_eq!((config.z_near, config.z_far), (0.01, 100.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(SceneConfig::default().with_zoom(100.0).initial_zoom, 30.0);
        let narrowed = SceneConfig::default().with_zoom_limits(8.0, 9.0);
        assert_eq!(narrowed.initial_zoom, 8.0);
    }

    #[test]
    fn test_aspect_ratio_survives_zero_height() {
        let config = SceneConfig::default().with_viewport(800, 0);
        assert_eq!(config.aspect_ratio(), 800.0);
    }
}
