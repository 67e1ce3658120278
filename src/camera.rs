//! The fixed scene camera.
//!
//! The eye sits at `(0, 0, 10)` looking at the origin through a 45° lens.
//! [`Camera::view_matrix`] and [`Camera::projection_matrix`] are evaluated once
//! when the [`Scene`](crate::Scene) is built.

use glam::{Mat4, Vec3};

/// A fixed look-at camera with a perspective lens.
///
/// Both matrices are built once at startup; the scene never moves the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians, vertical
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, target_x: f32, target_y: f32, target_z: f32) -> Self {
        self.target = Vec3::new(target_x, target_y, target_z);
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// World-to-camera transform (right-handed look-at).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-clip transform for the given aspect ratio (width / height).
    ///
    /// Clip depth is in wgpu's `[0, 1]` range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_scene_setup() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.fov - 45f32.to_radians()).abs() < 1e-6);
        assert_eq!((camera.near, camera.far), (0.1, 100.0));
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let view = Camera::default().view_matrix();
        let eye = view.transform_point3(Vec3::new(0.0, 0.0, 10.0));
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));

        // the origin lies ten units down -Z in camera space
        let origin = view.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn builder_overrides() {
        let camera = Camera::new()
            .at(1.0, 2.0, 3.0)
            .looking_at(1.0, 2.0, 0.0)
            .with_fov(90.0)
            .with_clip(0.5, 50.0);

        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.target, Vec3::new(1.0, 2.0, 0.0));
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(camera.far, 50.0);
    }

    #[test]
    fn projection_depth_range() {
        let camera = Camera::default();
        let proj = camera.projection_matrix(4.0 / 3.0);

        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
