//! Error types for startup failures.
//!
//! Nothing in the per-frame path returns an error; everything here happens
//! before the first frame is drawn.

use thiserror::Error;

/// The cube shader pipeline could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("shader compilation failed ({stage} stage): {diagnostic}")]
    ShaderCompile {
        stage: &'static str,
        diagnostic: String,
    },
    #[error("pipeline link failed: {diagnostic}")]
    ProgramLink { diagnostic: String },
}

/// The graphics device or surface could not be set up.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Top-level application failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_error_names_stage() {
        let err = RenderError::ShaderCompile {
            stage: "vertex",
            diagnostic: "unknown identifier `postion`".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("vertex"));
        assert!(text.contains("postion"));
    }

    #[test]
    fn render_error_converts_to_app_error() {
        let err: AppError = RenderError::ProgramLink {
            diagnostic: "location 1 mismatch".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "pipeline link failed: location 1 mismatch");
    }
}
