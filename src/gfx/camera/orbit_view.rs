use cgmath::*;

use crate::config::SceneConfig;
use crate::gfx::uniforms::WorldInfo;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera orbiting the origin, driven by cursor motion and scroll.
///
/// Yaw wraps freely, pitch is clamped short of the poles so the y-up look-at
/// never degenerates, and zoom is the distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitView {
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub zoom: f32,
    pub bounds: OrbitViewBounds,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitViewBounds {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub pitch_limit: Rad<f32>,
    /// Degrees per pixel
    pub cursor_sensitivity: f32,
    /// Zoom units per scroll line
    pub scroll_sensitivity: f32,
}

impl OrbitView {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            zoom: config.initial_zoom,
            bounds: OrbitViewBounds {
                min_zoom: config.min_zoom,
                max_zoom: config.max_zoom,
                pitch_limit: Deg(config.pitch_limit).into(),
                cursor_sensitivity: config.cursor_sensitivity,
                scroll_sensitivity: config.scroll_sensitivity,
            },
            fovy: Deg(config.fov_y),
            aspect: config.aspect_ratio(),
            znear: config.z_near,
            zfar: config.z_far,
        }
    }

    /// Orbits by a cursor movement in pixels.
    pub fn apply_cursor(&mut self, delta: (f32, f32)) {
        let sensitivity = self.bounds.cursor_sensitivity;
        self.yaw += Rad::from(Deg(delta.0 * sensitivity));
        let limit = self.bounds.pitch_limit.0;
        let pitch = self.pitch.0 + Rad::from(Deg(delta.1 * sensitivity)).0;
        self.pitch = Rad(pitch.clamp(-limit, limit));
    }

    /// Scrolling up moves closer.
    pub fn apply_scroll(&mut self, lines: f32) {
        self.zoom = (self.zoom - lines * self.bounds.scroll_sensitivity)
            .clamp(self.bounds.min_zoom, self.bounds.max_zoom);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn eye(&self) -> Point3<f32> {
        let (yaw, pitch) = (self.yaw.0, self.pitch.0);
        let direction = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        Point3::from_vec(direction.normalize() * self.zoom)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), Point3::origin(), Vector3::unit_y())
    }

    pub fn perspective_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Writes view and projection into the scene block.
    pub fn update_world(&self, world: &mut WorldInfo) {
        world.set_view(self.view_matrix());
        world.set_perspective(self.perspective_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> OrbitView {
        OrbitView::new(&SceneConfig::default())
    }

    #[test]
    fn test_initial_eye_on_x_axis() {
        let eye = view().eye();
        assert!((eye.to_vec() - Vector3::new(7.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut view = view();
        view.apply_cursor((0.0, 1.0e6));
        let limit: Rad<f32> = Deg(89.99).into();
        assert_eq!(view.pitch, limit);
        view.apply_cursor((0.0, -1.0e7));
        assert_eq!(view.pitch, -limit);
    }

    #[test]
    fn test_yaw_follows_cursor() {
        let mut view = view();
        // 180 px at 1/pi degrees per pixel
        view.apply_cursor((180.0, 0.0));
        let expected: Rad<f32> = Deg(180.0 / std::f32::consts::PI).into();
        assert!((view.yaw.0 - expected.0).abs() < 1e-5);
        assert!((view.eye().to_vec().magnitude() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_limits() {
        let mut view = view();
        view.apply_scroll(100.0);
        assert_eq!(view.zoom, 2.0);
        view.apply_scroll(-100.0);
        assert_eq!(view.zoom, 30.0);
    }

    #[test]
    fn test_world_update_writes_both_matrices() {
        let mut world = WorldInfo::default();
        let view = view();
        view.update_world(&mut world);
        assert_eq!(Matrix4::from(world.view), view.view_matrix());
        assert_eq!(Matrix4::from(world.perspective), view.perspective_matrix());
    }
}
