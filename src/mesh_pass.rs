//! Depth-tested rendering of colored cube meshes.
//!
//! [`MeshPass`] owns the cube pipeline, the per-draw transform uniforms and the
//! depth buffer. It replays a [`FramePlan`]: clear, then one indexed draw per
//! [`DrawCall`](crate::DrawCall), each with its own MVP.
//!
//! # Pipeline Construction
//!
//! The vertex and fragment stages live in separate WGSL modules. Each is
//! parsed and validated with naga first, then compiled inside a wgpu validation
//! error scope, so a failure is reported against its stage
//! ([`RenderError::ShaderCompile`]). A stage without its entry point, or a
//! pipeline whose stage interfaces disagree, fails as
//! [`RenderError::ProgramLink`].
//!
//! # Uniforms
//!
//! One uniform buffer holds every draw's matrix, each in its own slot aligned to
//! the device's `min_uniform_buffer_offset_alignment`. Draws select their slot
//! with a dynamic offset, so all matrices are written with a single
//! `write_buffer` before the pass starts.
//!
//! # Depth Buffer
//!
//! A `Depth32Float` texture matching the surface size. Call
//! [`MeshPass::ensure_depth_size`] after the surface is resized.

use wgpu::naga;

use crate::error::RenderError;
use crate::geometry::ColorVertex;
use crate::gpu::GpuContext;
use crate::mesh::MeshSet;
use crate::render::FramePlan;

const VERTEX_SHADER: &str = include_str!("shaders/cube_vertex.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/cube_fragment.wgsl");

/// Depth attachment format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Nearer fragments win; the buffer is cleared to the far plane.
pub const DEPTH_COMPARE: wgpu::CompareFunction = wgpu::CompareFunction::Less;

/// One programmable stage of the cube pipeline.
#[derive(Clone, Copy, Debug)]
struct Stage {
    name: &'static str,
    entry_point: &'static str,
    kind: naga::ShaderStage,
}

const VERTEX_STAGE: Stage = Stage {
    name: "vertex",
    entry_point: "vs",
    kind: naga::ShaderStage::Vertex,
};

const FRAGMENT_STAGE: Stage = Stage {
    name: "fragment",
    entry_point: "fs",
    kind: naga::ShaderStage::Fragment,
};

/// Per-draw transform uniform.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniforms {
    /// Column-major model-view-projection matrix.
    pub mvp: [[f32; 4]; 4],
}

/// Renders cube meshes with depth testing.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_slots: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    /// Creates the pass with the built-in cube shaders.
    pub fn new(gpu: &GpuContext) -> Result<Self, RenderError> {
        Self::with_shaders(gpu, VERTEX_SHADER, FRAGMENT_SHADER)
    }

    /// Creates the pass from custom WGSL stages.
    ///
    /// The vertex stage must export `vs` and read `ColorVertex` attributes plus a
    /// `mat4x4<f32>` uniform at group 0, binding 0. The fragment stage must
    /// export `fs`.
    pub fn with_shaders(
        gpu: &GpuContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RenderError> {
        let device = &gpu.device;

        let vertex_module = compile_stage(device, VERTEX_STAGE, vertex_source)?;
        let fragment_module = compile_stage(device, FRAGMENT_STAGE, fragment_source)?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<TransformUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_STAGE.entry_point),
                buffers: &[ColorVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_STAGE.entry_point),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: DEPTH_COMPARE,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            tracing::error!(%err, "cube pipeline failed to link");
            return Err(RenderError::ProgramLink {
                diagnostic: err.to_string(),
            });
        }

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride =
            wgpu::util::align_to(std::mem::size_of::<TransformUniforms>() as u64, alignment);
        let uniform_slots = 2;
        let (uniform_buffer, uniform_bind_group) =
            create_uniforms(device, &uniform_layout, uniform_stride, uniform_slots);

        let depth_view = create_depth_view(gpu);

        tracing::info!(format = ?gpu.config.format, "cube pipeline ready");

        Ok(Self {
            pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    /// Ensures the depth buffer matches the current screen size.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
            tracing::debug!(width = gpu.width(), height = gpu.height(), "resized depth buffer");
        }
    }

    /// Acquires the next surface texture, draws `plan` into it and presents it.
    ///
    /// A surface that is outdated or lost is reconfigured and the frame is
    /// skipped.
    pub fn execute(&mut self, gpu: &GpuContext, meshes: &MeshSet, plan: &FramePlan) {
        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                tracing::warn!(%err, "surface unavailable, reconfiguring");
                gpu.reconfigure();
                return;
            }
            Err(err) => {
                tracing::warn!(%err, "skipping frame");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_transforms(gpu, plan);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.render(&mut render_pass, meshes, plan);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Records the plan's draws into an active pass that has this pass's depth
    /// attachment. Transforms must already be uploaded.
    fn render(&self, render_pass: &mut wgpu::RenderPass, meshes: &MeshSet, plan: &FramePlan) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_index_buffer(meshes.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for (slot, call) in plan.draws.iter().enumerate() {
            let offset = (slot as u64 * self.uniform_stride) as wgpu::DynamicOffset;
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, meshes.vertex_buffer(call.mesh).slice(..));
            render_pass.draw_indexed(0..meshes.index_count, 0, 0..1);
        }
    }

    fn upload_transforms(&mut self, gpu: &GpuContext, plan: &FramePlan) {
        if plan.draws.len() > self.uniform_slots {
            self.uniform_slots = plan.draws.len().next_power_of_two();
            let (buffer, bind_group) = create_uniforms(
                &gpu.device,
                &self.uniform_layout,
                self.uniform_stride,
                self.uniform_slots,
            );
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
        }

        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * plan.draws.len()];
        for (slot, call) in plan.draws.iter().enumerate() {
            let uniforms = TransformUniforms {
                mvp: call.mvp.to_cols_array_2d(),
            };
            let start = slot * stride;
            bytes[start..start + std::mem::size_of::<TransformUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }

        if !bytes.is_empty() {
            gpu.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }
    }
}

/// Parses and validates one WGSL stage and checks that it exports the
/// stage's entry point.
fn check_stage(stage: Stage, source: &str) -> Result<(), RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| {
        RenderError::ShaderCompile {
            stage: stage.name,
            diagnostic: err.emit_to_string(source),
        }
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|err| RenderError::ShaderCompile {
        stage: stage.name,
        diagnostic: err.emit_to_string(source),
    })?;

    let exported = module
        .entry_points
        .iter()
        .any(|ep| ep.name == stage.entry_point && ep.stage == stage.kind);
    if !exported {
        return Err(RenderError::ProgramLink {
            diagnostic: format!(
                "{} stage has no `{}` entry point",
                stage.name, stage.entry_point
            ),
        });
    }

    Ok(())
}

/// Compiles one WGSL stage, turning validation failures into a diagnostic.
fn compile_stage(
    device: &wgpu::Device,
    stage: Stage,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    if let Err(err) = check_stage(stage, source) {
        tracing::error!(stage = stage.name, %err, "shader rejected");
        return Err(err);
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => {
            tracing::error!(stage = stage.name, %err, "shader failed to compile");
            Err(RenderError::ShaderCompile {
                stage: stage.name,
                diagnostic: err.to_string(),
            })
        }
        None => Ok(module),
    }
}

fn create_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Transform Uniforms"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Transform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<TransformUniforms>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}

fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_uniform_is_one_matrix() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 64);
    }

    #[test]
    fn bundled_shaders_validate() {
        check_stage(VERTEX_STAGE, VERTEX_SHADER).unwrap();
        check_stage(FRAGMENT_STAGE, FRAGMENT_SHADER).unwrap();
    }

    #[test]
    fn syntax_error_names_the_stage() {
        let err = check_stage(VERTEX_STAGE, "fn vs( -> {").unwrap_err();
        match err {
            RenderError::ShaderCompile { stage, diagnostic } => {
                assert_eq!(stage, "vertex");
                assert!(!diagnostic.is_empty());
            }
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_fails_validation() {
        let source = "@fragment fn fs() -> @location(0) vec4<f32> { return 1.0; }";
        let err = check_stage(FRAGMENT_STAGE, source).unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompile { stage: "fragment", .. }));
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        // a valid fragment module offered as the vertex stage
        let err = check_stage(VERTEX_STAGE, FRAGMENT_SHADER).unwrap_err();
        assert!(matches!(err, RenderError::ProgramLink { .. }));
    }

    #[test]
    fn depth_test_keeps_nearer_fragments() {
        assert_eq!(DEPTH_COMPARE, wgpu::CompareFunction::Less);
    }
}
