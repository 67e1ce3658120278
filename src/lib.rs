//! # Twincube
//!
//! **Two bicolored cubes, drag to rotate, depth-tested on wgpu.**
//!
//! The crate is split the way data flows through a frame:
//!
//! - [`InputState`] turns pointer drags into accumulated [`RotationState`]
//! - [`ModelSource`] implementations turn rotation into model matrices
//! - [`RenderLoop`] combines them with the fixed [`Camera`] into a [`FramePlan`]
//! - [`MeshPass`] replays the plan on the GPU against the meshes built by
//!   [`build_cube`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use twincube::{AppConfig, run};
//!
//! fn main() -> Result<(), twincube::AppError> {
//!     run(AppConfig::new().title("Cubes").size(1024, 768).seed(Some(7)))
//! }
//! ```
//!
//! Everything above the GPU layer is plain data and can be driven without a
//! window:
//!
//! ```
//! use twincube::{Camera, InputState, RenderLoop, RenderTrigger, Scene, SatelliteCube, Vec2};
//! # use twincube::MeshId;
//! # fn demo(primary: MeshId, secondary: MeshId) {
//! let scene = Scene::two_cubes(&Camera::default(), 4.0 / 3.0, primary, secondary, SatelliteCube::default());
//! let mut input = InputState::default();
//! input.pointer_down(Vec2::ZERO);
//! input.pointer_moved(Vec2::new(100.0, 0.0));
//!
//! let tick = RenderLoop::new().tick(RenderTrigger::Scheduled, &scene, &input);
//! assert_eq!(tick.plan.draws.len(), 2);
//! # }
//! ```

mod app;
mod camera;
mod error;
mod geometry;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod render;
mod transform;

pub use app::{AppConfig, SceneConfig, run};
pub use camera::Camera;
pub use error::{AppError, GpuError, RenderError};
pub use geometry::{
    CUBE_INDEX_COUNT, CUBE_VERTEX_COUNT, ColorVertex, CubeGeometry, FLOATS_PER_VERTEX,
    build_cube, cube_indices, random_color,
};
pub use gpu::GpuContext;
pub use input::{DEFAULT_SENSITIVITY, InputResponse, InputState};
pub use mesh::{MeshId, MeshSet};
pub use mesh_pass::{DEPTH_FORMAT, MeshPass, TransformUniforms};
pub use render::{
    DrawCall, FramePlan, LoopState, RenderLoop, RenderTrigger, Scene, SceneObject, Tick,
    plan_frame,
};
pub use transform::{
    ModelSource, PrimaryCube, RotationState, SatelliteCube, compute_mvp, rotation_matrix,
};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
