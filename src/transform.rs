//! Model and model-view-projection matrices for the scene objects.
//!
//! Each renderable object implements [`ModelSource`]: given the accumulated
//! [`RotationState`], it produces that object's model matrix. The render loop
//! only ever talks to this trait, so the list of objects can change without
//! touching the loop body.
//!
//! # Rotation Order
//!
//! [`rotation_matrix`] starts from identity and post-multiplies a rotation about
//! X, then Y, then Z:
//!
//! ```text
//! R = I · Rx(x) · Ry(y) · Rz(z)
//! ```
//!
//! The order is observable and must not be rearranged.
//!
//! # Satellite Composition
//!
//! The secondary cube is scaled *outside* its translate-rotate composite:
//!
//! ```text
//! M = S · (T · R)
//! ```
//!
//! so the scale also shrinks its offset from the origin.

use glam::{Mat4, Vec3};

/// Accumulated rotation angles in radians.
///
/// Only the input controller writes these; the transform engine only reads them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// `I · Rx(x) · Ry(y) · Rz(z)`.
pub fn rotation_matrix(rotation: &RotationState) -> Mat4 {
    let mut model = Mat4::IDENTITY;
    model *= Mat4::from_rotation_x(rotation.x);
    model *= Mat4::from_rotation_y(rotation.y);
    model *= Mat4::from_rotation_z(rotation.z);
    model
}

/// `projection · view · model`.
pub fn compute_mvp(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}

/// Produces an object's model matrix from the current rotation state.
pub trait ModelSource {
    fn model_matrix(&self, rotation: &RotationState) -> Mat4;
}

/// The primary cube: rotation only, centered on the origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimaryCube;

impl ModelSource for PrimaryCube {
    fn model_matrix(&self, rotation: &RotationState) -> Mat4 {
        rotation_matrix(rotation)
    }
}

/// A smaller cube offset from the origin, rotating with the same angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SatelliteCube {
    pub scale: f32,
    pub translation: Vec3,
}

impl Default for SatelliteCube {
    fn default() -> Self {
        Self {
            scale: 0.7,
            translation: Vec3::new(2.0, 2.0, -3.5),
        }
    }
}

impl ModelSource for SatelliteCube {
    fn model_matrix(&self, rotation: &RotationState) -> Mat4 {
        let scale = Mat4::from_scale(Vec3::splat(self.scale));
        let translation = Mat4::from_translation(self.translation);
        let placed = translation * rotation_matrix(rotation);
        scale * placed
    }
}
