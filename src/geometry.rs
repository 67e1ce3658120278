//! CPU-side cube geometry with per-face bicolored vertices.
//!
//! This module builds the static data that every frame draws:
//!
//! - [`ColorVertex`] — interleaved position + RGBA color (7 floats, 28 bytes)
//! - [`CubeGeometry`] — 24 vertices and the 36 shared triangle indices
//! - [`build_cube`] — fills a cube template with freshly randomized face colors
//!
//! # Face Coloring
//!
//! Every face owns four vertices. Two random colors are drawn per face: corners
//! 0 and 1 take the first, corners 2 and 3 take the second. Because each face is
//! split into the triangles `(0, 1, 2)` and `(0, 2, 3)`, the two halves blend
//! across the diagonal and the split stays visible.
//!
//! ```
//! use rand::SeedableRng;
//! use twincube::{build_cube, Vec4};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let cube = build_cube(Vec4::new(0.0, 1.0, 0.0, 1.0), &mut rng);
//! assert_eq!(cube.as_floats().len(), 24 * 7);
//! assert_eq!(cube.indices.len(), 36);
//! ```
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | color     | Float32x4 | 12     | 1               |

use glam::Vec4;
use rand::Rng;

/// Number of faces on a cube.
pub const FACE_COUNT: usize = 6;
/// Vertices per face. Faces do not share corners so each can carry its own colors.
pub const VERTICES_PER_FACE: usize = 4;
/// Total vertex count of a cube mesh.
pub const CUBE_VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;
/// Total index count of a cube mesh (two triangles per face).
pub const CUBE_INDEX_COUNT: usize = FACE_COUNT * 6;
/// Floats per interleaved vertex.
pub const FLOATS_PER_VERTEX: usize = 7;

/// An interleaved vertex carrying a position and an RGBA color.
///
/// `#[repr(C)]` plus [`bytemuck::Pod`] lets a vertex slice be uploaded to the
/// GPU as raw bytes, or viewed as a flat `f32` slice with stride 7.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// RGBA color, each channel in `[0, 1]`.
    pub color: [f32; 4],
}

impl ColorVertex {
    /// The wgpu vertex buffer layout for this vertex type.
    ///
    /// Location 0 is the 3-float position at offset 0, location 1 the 4-float
    /// color at offset 12 (three floats in).
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ColorVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Corner positions of the cube, four per face.
///
/// Face order is front (Z+), back (Z-), top (Y+), bottom (Y-), right (X+),
/// left (X-). The cube spans -1 to 1 on every axis.
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; CUBE_VERTEX_COUNT] = [
    // Front face (Z+)
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // Back face (Z-)
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // Top face (Y+)
    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // Bottom face (Y-)
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // Right face (X+)
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // Left face (X-)
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
];

/// Triangle indices shared by every cube mesh.
///
/// Face `k` contributes `4k + [0, 1, 2, 0, 2, 3]`.
pub fn cube_indices() -> [u16; CUBE_INDEX_COUNT] {
    let mut indices = [0u16; CUBE_INDEX_COUNT];
    for face in 0..FACE_COUNT {
        let base = (face * VERTICES_PER_FACE) as u16;
        let quad = [0, 1, 2, 0, 2, 3].map(|i| base + i);
        indices[face * 6..face * 6 + 6].copy_from_slice(&quad);
    }
    indices
}

/// An opaque color with each RGB channel drawn uniformly from `[0, 1)`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 4] {
    [rng.random(), rng.random(), rng.random(), 1.0]
}

/// Immutable CPU geometry for one cube: 24 colored vertices, 36 indices.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeGeometry {
    pub vertices: Vec<ColorVertex>,
    pub indices: [u16; CUBE_INDEX_COUNT],
}

impl CubeGeometry {
    /// Flat view of the vertex data, 7 floats per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The four vertices belonging to face `face`.
    pub fn face(&self, face: usize) -> &[ColorVertex] {
        let start = face * VERTICES_PER_FACE;
        &self.vertices[start..start + VERTICES_PER_FACE]
    }
}

/// Builds a cube whose faces are bicolored with fresh random colors.
///
/// `base_color` only seeds the template; every vertex color is replaced by the
/// face coloring pass, which draws two colors per face from `rng`.
pub fn build_cube<R: Rng + ?Sized>(base_color: Vec4, rng: &mut R) -> CubeGeometry {
    let mut vertices: Vec<ColorVertex> = CUBE_POSITIONS
        .iter()
        .map(|&position| ColorVertex::new(position, base_color.to_array()))
        .collect();

    paint_faces(&mut vertices, rng);

    CubeGeometry {
        vertices,
        indices: cube_indices(),
    }
}

/// Assigns two random colors per face: corners 0-1 get the first, 2-3 the second.
fn paint_faces<R: Rng + ?Sized>(vertices: &mut [ColorVertex], rng: &mut R) {
    for face in vertices.chunks_exact_mut(VERTICES_PER_FACE) {
        let first = random_color(rng);
        let second = random_color(rng);
        for (corner, vertex) in face.iter_mut().enumerate() {
            vertex.color = if corner < 2 { first } else { second };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_cube(seed: u64) -> CubeGeometry {
        let mut rng = StdRng::seed_from_u64(seed);
        build_cube(Vec4::new(0.0, 1.0, 0.0, 1.0), &mut rng)
    }

    #[test]
    fn vertex_is_seven_floats() {
        assert_eq!(std::mem::size_of::<ColorVertex>(), 7 * 4);
        assert_eq!(ColorVertex::LAYOUT.array_stride, 28);
        assert_eq!(ColorVertex::LAYOUT.attributes[1].offset, 12);
    }

    #[test]
    fn vertex_buffer_has_168_floats() {
        for seed in 0..4 {
            let cube = seeded_cube(seed);
            assert_eq!(cube.vertices.len(), CUBE_VERTEX_COUNT);
            assert_eq!(cube.as_floats().len(), 168);
        }
    }

    #[test]
    fn indices_follow_quad_pattern() {
        let indices = cube_indices();
        assert_eq!(&indices[..12], &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);

        for (face, group) in indices.chunks_exact(6).enumerate() {
            let base = (face * 4) as u16;
            assert_eq!(group, &[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        assert_eq!(*indices.last().unwrap(), 23);
    }

    #[test]
    fn both_palettes_share_topology() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = build_cube(Vec4::new(0.0, 1.0, 0.0, 1.0), &mut rng);
        let b = build_cube(Vec4::new(1.0, 1.0, 0.0, 1.0), &mut rng);

        assert_eq!(a.indices, b.indices);
        assert_ne!(a.vertices, b.vertices);
    }

    #[test]
    fn faces_are_split_into_two_colors() {
        let cube = seeded_cube(42);

        for face in 0..FACE_COUNT {
            let v = cube.face(face);
            assert_eq!(v[0].color, v[1].color);
            assert_eq!(v[2].color, v[3].color);
            assert_ne!(v[0].color, v[2].color);
        }
    }

    #[test]
    fn colors_are_opaque_and_in_range() {
        let cube = seeded_cube(3);

        for vertex in &cube.vertices {
            assert_eq!(vertex.color[3], 1.0);
            assert!(vertex.color[..3].iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn base_color_is_overwritten() {
        let cube = seeded_cube(5);
        let base = [0.0, 1.0, 0.0, 1.0];
        assert!(cube.vertices.iter().all(|v| v.color != base));
    }

    #[test]
    fn positions_span_unit_cube() {
        let cube = seeded_cube(9);

        for vertex in &cube.vertices {
            assert!(vertex.position.iter().all(|p| p.abs() == 1.0));
        }
        // front face sits at z = +1
        assert!(cube.face(0).iter().all(|v| v.position[2] == 1.0));
    }

    #[test]
    fn same_seed_same_colors() {
        assert_eq!(seeded_cube(21), seeded_cube(21));
    }
}
