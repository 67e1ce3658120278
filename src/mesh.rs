//! GPU-resident cube meshes.
//!
//! Every cube uses the same triangle topology, so a [`MeshSet`] holds one shared
//! index buffer and one vertex buffer per palette. Meshes are addressed by
//! [`MeshId`], handed out in upload order.
//!
//! ```ignore
//! let mut meshes = MeshSet::new(&gpu, &cube_indices());
//! let green = meshes.add(&gpu, &green_cube);
//! let yellow = meshes.add(&gpu, &yellow_cube);
//! ```

use wgpu::util::DeviceExt;

use crate::geometry::{ColorVertex, CubeGeometry};
use crate::gpu::GpuContext;

/// Type-safe handle to a vertex buffer stored in a [`MeshSet`].
///
/// Obtained from [`MeshSet::add`]; keeps plain indices from being mixed up
/// with other counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Vertex buffers sharing a single index buffer.
#[derive(Debug)]
pub struct MeshSet {
    /// One buffer per mesh, indexed by [`MeshId`].
    pub(crate) vertex_buffers: Vec<wgpu::Buffer>,
    /// Shared u16 triangle indices.
    pub(crate) index_buffer: wgpu::Buffer,
    /// Number of indices drawn per mesh.
    pub(crate) index_count: u32,
}

impl MeshSet {
    /// Uploads the shared topology. Vertex data is added with [`MeshSet::add`].
    pub fn new(gpu: &GpuContext, indices: &[u16]) -> Self {
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffers: Vec::new(),
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Uploads a cube's vertices and returns its handle.
    ///
    /// The cube's indices must match the shared topology; only its vertices
    /// are uploaded.
    pub fn add(&mut self, gpu: &GpuContext, cube: &CubeGeometry) -> MeshId {
        debug_assert_eq!(cube.indices.len() as u32, self.index_count);
        self.add_vertices(gpu, &cube.vertices)
    }

    fn add_vertices(&mut self, gpu: &GpuContext, vertices: &[ColorVertex]) -> MeshId {
        let label = format!("Cube Vertex Buffer {}", self.vertex_buffers.len());
        let buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label.as_str()),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let id = MeshId(self.vertex_buffers.len());
        self.vertex_buffers.push(buffer);
        id
    }

    pub(crate) fn vertex_buffer(&self, id: MeshId) -> &wgpu::Buffer {
        &self.vertex_buffers[id.0]
    }
}
