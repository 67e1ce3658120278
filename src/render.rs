//! Frame planning: what to clear and what to draw, in which order.
//!
//! A tick of the [`RenderLoop`] turns the current [`InputState`] and the
//! [`Scene`] into a [`FramePlan`]. The plan is plain data; the GPU side
//! ([`MeshPass::execute`](crate::MeshPass::execute)) replays it. Keeping the two
//! apart means a tick has no side effects besides the scheduling flag, so two
//! ticks with the same rotation yield equal plans.
//!
//! # Triggers
//!
//! - [`RenderTrigger::Scheduled`] comes from the host's frame callback and asks
//!   for exactly one follow-up frame.
//! - [`RenderTrigger::OutOfBand`] comes straight from a pointer drag. It draws
//!   immediately but never queues another frame, so at most one scheduled frame
//!   is ever pending.

use glam::Mat4;

use crate::camera::Camera;
use crate::input::InputState;
use crate::mesh::MeshId;
use crate::transform::{ModelSource, PrimaryCube, SatelliteCube, compute_mvp};

/// One object in the scene: which mesh to draw and how to place it.
pub struct SceneObject {
    pub mesh: MeshId,
    pub model: Box<dyn ModelSource>,
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObject")
            .field("mesh", &self.mesh)
            .finish_non_exhaustive()
    }
}

/// Ordered renderable objects plus the fixed camera matrices.
#[derive(Debug)]
pub struct Scene {
    projection: Mat4,
    view: Mat4,
    objects: Vec<SceneObject>,
}

impl Scene {
    /// Creates an empty scene. Projection and view are frozen here.
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        Self {
            projection: camera.projection_matrix(aspect),
            view: camera.view_matrix(),
            objects: Vec::new(),
        }
    }

    /// The standard two-cube scene: a primary cube at the origin and a
    /// satellite cube drawn second.
    pub fn two_cubes(
        camera: &Camera,
        aspect: f32,
        primary: MeshId,
        secondary: MeshId,
        satellite: SatelliteCube,
    ) -> Self {
        let mut scene = Self::new(camera, aspect);
        scene.push(primary, PrimaryCube);
        scene.push(secondary, satellite);
        scene
    }

    /// Appends an object; objects draw in insertion order.
    pub fn push(&mut self, mesh: MeshId, model: impl ModelSource + 'static) -> &mut Self {
        self.objects.push(SceneObject {
            mesh,
            model: Box::new(model),
        });
        self
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }
}

/// A single indexed draw with its final transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshId,
    pub mvp: Mat4,
}

/// Everything one frame needs, in submission order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
    pub draws: Vec<DrawCall>,
}

/// Why a tick is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTrigger {
    Scheduled,
    OutOfBand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
}

/// Result of a tick: the plan to execute and whether to ask the host for
/// another frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub plan: FramePlan,
    pub reschedule: bool,
}

/// Self-rescheduling render loop state.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    frame_pending: bool,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frame_pending: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames planned so far, both triggers included.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Leaves `Idle`. Returns true if the caller should request the first frame.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Rendering {
            return false;
        }
        self.state = LoopState::Rendering;
        self.frame_pending = true;
        true
    }

    /// Plans one frame.
    pub fn tick(&mut self, trigger: RenderTrigger, scene: &Scene, input: &InputState) -> Tick {
        self.state = LoopState::Rendering;

        let reschedule = match trigger {
            RenderTrigger::Scheduled => true,
            RenderTrigger::OutOfBand => !self.frame_pending,
        };
        if reschedule {
            self.frame_pending = true;
        }
        self.frames += 1;

        Tick {
            plan: plan_frame(scene, input),
            reschedule,
        }
    }
}

/// Clear to opaque black and the far depth plane, then one draw per object.
pub fn plan_frame(scene: &Scene, input: &InputState) -> FramePlan {
    let draws = scene
        .objects
        .iter()
        .map(|object| DrawCall {
            mesh: object.mesh,
            mvp: compute_mvp(
                scene.projection,
                scene.view,
                object.model.model_matrix(&input.rotation),
            ),
        })
        .collect();

    FramePlan {
        clear_color: wgpu::Color::BLACK,
        clear_depth: 1.0,
        draws,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{RotationState, rotation_matrix};
    use glam::Vec2;

    fn scene() -> Scene {
        Scene::two_cubes(
            &Camera::default(),
            800.0 / 600.0,
            MeshId(0),
            MeshId(1),
            SatelliteCube::default(),
        )
    }

    #[test]
    fn starts_idle_and_enters_rendering_once() {
        let mut render_loop = RenderLoop::new();
        assert_eq!(render_loop.state(), LoopState::Idle);

        assert!(render_loop.start());
        assert_eq!(render_loop.state(), LoopState::Rendering);
        assert!(!render_loop.start());
    }

    #[test]
    fn frame_clears_black_and_far() {
        let plan = plan_frame(&scene(), &InputState::default());

        assert_eq!(plan.clear_color, wgpu::Color::BLACK);
        assert_eq!(plan.clear_depth, 1.0);
    }

    #[test]
    fn draws_objects_in_order() {
        let scene = scene();
        let plan = plan_frame(&scene, &InputState::default());

        let meshes: Vec<_> = plan.draws.iter().map(|d| d.mesh).collect();
        assert_eq!(meshes, vec![MeshId(0), MeshId(1)]);
        assert_eq!(plan.draws[0].mvp, scene.projection() * scene.view());
    }

    #[test]
    fn repeated_ticks_are_identical() {
        let scene = scene();
        let mut input = InputState::default();
        input.pointer_down(Vec2::ZERO);
        input.pointer_moved(Vec2::new(37.0, -12.0));

        let mut render_loop = RenderLoop::new();
        let first = render_loop.tick(RenderTrigger::Scheduled, &scene, &input);
        let second = render_loop.tick(RenderTrigger::Scheduled, &scene, &input);

        assert_eq!(first.plan, second.plan);
        assert_eq!(render_loop.frames(), 2);
    }

    #[test]
    fn draws_follow_rotation() {
        let scene = scene();
        let mut input = InputState::default();
        input.rotation = RotationState::new(0.2, 0.4, 0.0);

        let plan = plan_frame(&scene, &input);
        let expected = scene.projection() * scene.view() * rotation_matrix(&input.rotation);
        assert!(plan.draws[0].mvp.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn scheduled_ticks_request_one_followup() {
        let scene = scene();
        let input = InputState::default();
        let mut render_loop = RenderLoop::new();
        render_loop.start();

        assert!(render_loop.tick(RenderTrigger::Scheduled, &scene, &input).reschedule);
        assert!(render_loop.tick(RenderTrigger::Scheduled, &scene, &input).reschedule);
    }

    #[test]
    fn out_of_band_ticks_do_not_pile_up_frames() {
        let scene = scene();
        let input = InputState::default();
        let mut render_loop = RenderLoop::new();
        render_loop.start();

        for _ in 0..5 {
            let tick = render_loop.tick(RenderTrigger::OutOfBand, &scene, &input);
            assert!(!tick.reschedule);
        }
        assert_eq!(render_loop.frames(), 5);
    }

    #[test]
    fn out_of_band_before_start_requests_a_frame() {
        let mut render_loop = RenderLoop::new();
        let tick = render_loop.tick(RenderTrigger::OutOfBand, &scene(), &InputState::default());

        assert!(tick.reschedule);
        assert_eq!(render_loop.state(), LoopState::Rendering);
    }

    #[test]
    fn new_objects_extend_the_plan() {
        let mut scene = scene();
        scene.push(MeshId(0), SatelliteCube {
            scale: 0.25,
            translation: glam::Vec3::new(-3.0, 0.0, 0.0),
        });

        let plan = plan_frame(&scene, &InputState::default());
        assert_eq!(plan.draws.len(), 3);
    }
}
