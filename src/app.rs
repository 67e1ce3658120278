//! Window, event loop and app configuration.
//!
//! [`run`] opens the window, builds the GPU resources and the two-cube
//! [`Scene`], then drives [`RenderLoop`] from winit: redraw requests are
//! scheduled frames, drags render out of band.

use std::sync::Arc;

use glam::Vec4;
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::error::AppError;
use crate::geometry::{build_cube, cube_indices};
use crate::gpu::GpuContext;
use crate::input::{DEFAULT_SENSITIVITY, InputResponse, InputState};
use crate::mesh::MeshSet;
use crate::mesh_pass::MeshPass;
use crate::render::{RenderLoop, RenderTrigger, Scene};
use crate::transform::SatelliteCube;

/// Fixed scene constants.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub camera: Camera,
    pub satellite: SatelliteCube,
    /// Template tint of the primary cube (replaced by random face colors).
    pub primary_tint: Vec4,
    /// Template tint of the satellite cube (replaced by random face colors).
    pub satellite_tint: Vec4,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            satellite: SatelliteCube::default(),
            primary_tint: Vec4::new(0.0, 1.0, 0.0, 1.0),
            satellite_tint: Vec4::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

/// Configuration for the app window and scene.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Radians of rotation per pixel dragged.
    pub sensitivity: f32,
    /// Seed for the face colors. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub scene: SceneConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Twincube".to_string(),
            width: 800,
            height: 600,
            sensitivity: DEFAULT_SENSITIVITY,
            seed: None,
            scene: SceneConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Open the window and run the two-cube viewer until it is closed.
///
/// Returns an error if the window, the GPU context or the cube pipeline
/// cannot be created; no frame is drawn in that case.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = TwincubeApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        TwincubeApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    mesh_pass: MeshPass,
    meshes: MeshSet,
    scene: Scene,
    input: InputState,
    render_loop: RenderLoop,
}

enum TwincubeApp {
    Pending { config: AppConfig },
    Running(Box<Running>),
    Failed(AppError),
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let mesh_pass = MeshPass::new(&gpu)?;

        // Face colors are drawn once here and never regenerated.
        let mut rng = config.rng();
        let primary_cube = build_cube(config.scene.primary_tint, &mut rng);
        let satellite_cube = build_cube(config.scene.satellite_tint, &mut rng);

        let mut meshes = MeshSet::new(&gpu, &cube_indices());
        let primary = meshes.add(&gpu, &primary_cube);
        let secondary = meshes.add(&gpu, &satellite_cube);

        let scene = Scene::two_cubes(
            &config.scene.camera,
            gpu.aspect(),
            primary,
            secondary,
            config.scene.satellite,
        );

        tracing::info!(
            width = gpu.width(),
            height = gpu.height(),
            objects = scene.objects().len(),
            "scene ready"
        );

        Ok(Self {
            window,
            gpu,
            mesh_pass,
            meshes,
            scene,
            input: InputState::new(config.sensitivity),
            render_loop: RenderLoop::new(),
        })
    }

    /// Shared by scheduled and out-of-band renders.
    fn render_frame(&mut self, trigger: RenderTrigger) {
        let tick = self.render_loop.tick(trigger, &self.scene, &self.input);
        self.mesh_pass.execute(&self.gpu, &self.meshes, &tick.plan);

        if tick.reschedule {
            self.window.request_redraw();
        }
    }
}

impl ApplicationHandler for TwincubeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let TwincubeApp::Pending { config } = self else {
            return;
        };

        match Running::new(event_loop, config) {
            Ok(mut running) => {
                if running.render_loop.start() {
                    running.window.request_redraw();
                }
                *self = TwincubeApp::Running(Box::new(running));
            }
            Err(err) => {
                tracing::error!(%err, "initialization failed");
                *self = TwincubeApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let TwincubeApp::Running(app) = self else {
            return;
        };

        if app.input.handle_event(&event) == InputResponse::RenderNow {
            tracing::debug!(rotation = ?app.input.rotation, "out-of-band render");
            app.render_frame(RenderTrigger::OutOfBand);
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                tracing::info!(frames = app.render_loop.frames(), "closing");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
                app.mesh_pass.ensure_depth_size(&app.gpu);
            }
            WindowEvent::RedrawRequested => {
                app.render_frame(RenderTrigger::Scheduled);
            }
            _ => {}
        }
    }
}
