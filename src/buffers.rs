//! Flat `f32` output for renderers.
//!
//! A renderer needs the per-vertex curvature data interleaved in a single
//! vertex buffer plus a `u32` index buffer. Both cast to bytes with
//! `bytemuck` and can be uploaded as-is.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix2, Vector3};

use crate::geometry::Geometry;

/// One interleaved vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CurvatureVertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// First tangent axis of the vertex frame.
    pub tangent_u: [f32; 3],
    /// Second tangent axis of the vertex frame.
    pub tangent_v: [f32; 3],
    /// Direction of maximum curvature.
    pub t1: [f32; 3],
    /// Direction of minimum curvature.
    pub t2: [f32; 3],
    /// Maximum principal curvature.
    pub k1: f32,
    /// Minimum principal curvature.
    pub k2: f32,
    /// First C-tensor slice, column-major.
    pub c_first: [f32; 4],
    /// Second C-tensor slice, column-major.
    pub c_second: [f32; 4],
}

impl CurvatureVertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

/// Vertex and index buffers plus the curvature range used for color mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffers {
    /// One entry per vertex, in vertex order.
    pub vertices: Vec<CurvatureVertex>,
    /// Three indices per face, in face order.
    pub indices: Vec<u32>,
    /// `[min_gaussian, max_gaussian, min_mean, max_mean]`.
    pub extrema: [f32; 4],
}

fn vec3(v: &Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

fn mat2(m: &Matrix2<f64>) -> [f32; 4] {
    [m[(0, 0)] as f32, m[(1, 0)] as f32, m[(0, 1)] as f32, m[(1, 1)] as f32]
}

impl RenderBuffers {
    /// Gather the current state of a geometry.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let vertices = geometry
            .vertex_ids()
            .map(|v| {
                let frame = geometry.vertex_frame(v);
                let curvature = geometry.curvature(v);
                let c = geometry.c_tensor(v);
                CurvatureVertex {
                    position: vec3(&geometry.position(v).coords),
                    normal: vec3(&frame.w),
                    tangent_u: vec3(&frame.u),
                    tangent_v: vec3(&frame.v),
                    t1: vec3(&curvature.t1),
                    t2: vec3(&curvature.t2),
                    k1: curvature.k1 as f32,
                    k2: curvature.k2 as f32,
                    c_first: mat2(&c.first()),
                    c_second: mat2(&c.second()),
                }
            })
            .collect();

        // Vertex counts were checked against u32 at build
        let indices = geometry
            .faces()
            .iter()
            .flat_map(|face| face.iter().map(|&i| i as u32))
            .collect();

        let e = geometry.frequencies();
        Self {
            vertices,
            indices,
            extrema: [
                e.min_gaussian as f32,
                e.max_gaussian as f32,
                e.min_mean as f32,
                e.max_mean as f32,
            ],
        }
    }

    /// The vertex buffer as a flat float array.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The vertex buffer as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Number of indices.
    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::icosphere;

    #[test]
    fn test_stride_has_no_padding() {
        assert_eq!(CurvatureVertex::STRIDE, 28 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_buffers_match_geometry() {
        let (vertices, faces) = icosphere(1);
        let geometry = Geometry::build(&vertices, &faces).unwrap();
        let buffers = geometry.render_buffers();

        assert_eq!(buffers.vertices.len(), 42);
        assert_eq!(buffers.num_indices(), 240);
        assert_eq!(buffers.vertex_floats().len(), 42 * 28);
        assert_eq!(buffers.vertex_bytes().len(), 42 * CurvatureVertex::STRIDE);
        assert_eq!(buffers.index_bytes().len(), 240 * 4);
        assert_eq!(&buffers.indices[..3], &[0, 12, 14]);

        // k1 sits after six 3-vectors
        let floats = buffers.vertex_floats();
        assert_eq!(floats[18], buffers.vertices[0].k1);
        assert!((floats[18] - geometry.curvature(crate::mesh::VertexId::new(0)).k1 as f32).abs() < 1e-6);

        let e = geometry.frequencies();
        assert_eq!(buffers.extrema[3], e.max_mean as f32);
    }
}
