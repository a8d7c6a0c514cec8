//! The curvature-annotated mesh.
//!
//! [`Geometry`] owns the vertex positions, the face list, the topology, every
//! per-face and per-vertex quantity derived from them, and the smoothing
//! operator. It is built once from a face-vertex list; [`Geometry::smooth`]
//! moves the vertices and recomputes everything else.
//!
//! # Example
//!
//! ```
//! use weingarten::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let geometry = Geometry::build(&vertices, &faces).unwrap();
//! for v in geometry.vertex_ids() {
//!     let c = geometry.curvature(v);
//!     assert!(c.k1.abs() < 1e-12 && c.k2.abs() < 1e-12);
//! }
//! ```

mod estimate;
mod frame;
mod tensor;

pub use frame::{Frame, TangentBasis};
pub use tensor::{CTensor, CurvatureTensor, Principal};

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};
use tracing::{info, instrument};

use crate::algo::curvature::PrincipalCurvature;
use crate::algo::extrema::CurvatureExtrema;
use crate::algo::smooth::{matrix_to_positions, positions_to_matrix, DiffusionOperator, TaubinFilter};
use crate::buffers::RenderBuffers;
use crate::config::GeometryConfig;
use crate::error::{Degeneracy, DegeneracyKind, GeometryError, Result};
use crate::mesh::{FaceId, Topology, VertexId};

use estimate::{estimate, DegeneracyLog, Estimate};

/// A triangle mesh annotated with curvature, curvature derivatives and a
/// smoothing operator.
#[derive(Debug, Clone)]
pub struct Geometry {
    config: GeometryConfig,
    positions: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    topology: Topology,
    operator: DiffusionOperator,
    filter: TaubinFilter,
    /// Reported while building the operator; it never changes afterwards.
    operator_degeneracies: Vec<Degeneracy>,
    degeneracies: Vec<Degeneracy>,
    estimate: Estimate,
}

impl Geometry {
    /// Build with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`Geometry::build_with_config`].
    pub fn build(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Self> {
        Self::build_with_config(vertices, faces, GeometryConfig::default())
    }

    /// Validate the input, derive topology and estimate all curvature quantities.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidParameter`] if `config` is out of range
    /// - [`GeometryError::NoVertices`] / [`GeometryError::EmptyMesh`] for empty input
    /// - [`GeometryError::TooManyElements`] if a count overflows a 32-bit index
    /// - [`GeometryError::NonFiniteCoordinate`] for NaN or infinite positions
    /// - [`GeometryError::InvalidVertexIndex`] for an out-of-range face index
    /// - [`GeometryError::Degenerate`] on the first degenerate element, only
    ///   under [`DegeneracyPolicy::Fail`](crate::config::DegeneracyPolicy::Fail)
    #[instrument(skip_all, fields(vertices = vertices.len(), faces = faces.len()))]
    pub fn build_with_config(vertices: &[Point3<f64>], faces: &[[usize; 3]], config: GeometryConfig) -> Result<Self> {
        config.validate()?;

        if vertices.is_empty() {
            return Err(GeometryError::NoVertices);
        }
        if faces.is_empty() {
            return Err(GeometryError::EmptyMesh);
        }
        for (what, count) in [("vertices", vertices.len()), ("faces", faces.len())] {
            if count > u32::MAX as usize {
                return Err(GeometryError::TooManyElements { what, count });
            }
        }
        if let Some(vertex) = vertices
            .iter()
            .position(|p| !p.coords.iter().all(|x| x.is_finite()))
        {
            return Err(GeometryError::NonFiniteCoordinate { vertex });
        }

        let topology = Topology::build(vertices.len(), faces)?;

        let mut log = DegeneracyLog::new(config.degeneracy);
        let estimate = estimate(vertices, faces, &topology, &config, &mut log)?;

        let (operator, zero_length) = DiffusionOperator::build(vertices, &topology);
        let mut operator_log = DegeneracyLog::new(config.degeneracy);
        for v in zero_length {
            operator_log.report(Degeneracy::vertex(v, DegeneracyKind::ZeroLengthEdge))?;
        }
        let operator_degeneracies = operator_log.into_vec();

        let mut degeneracies = log.into_vec();
        degeneracies.extend_from_slice(&operator_degeneracies);

        let geometry = Self {
            filter: TaubinFilter::from_params(&config.taubin),
            config,
            positions: vertices.to_vec(),
            faces: faces.to_vec(),
            topology,
            operator,
            operator_degeneracies,
            degeneracies,
            estimate,
        };
        geometry.log_summary("built");
        Ok(geometry)
    }

    /// Apply the Taubin filter to the vertex positions and recompute all
    /// derived quantities.
    ///
    /// The diffusion operator built at load time is reused. On error the
    /// geometry is left untouched.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Degenerate`] if smoothing produced a degenerate
    /// element under [`DegeneracyPolicy::Fail`](crate::config::DegeneracyPolicy::Fail).
    #[instrument(skip_all, fields(vertices = self.positions.len(), faces = self.faces.len()))]
    pub fn smooth(&mut self) -> Result<()> {
        let x = positions_to_matrix(&self.positions);
        let smoothed = self.filter.apply(&self.operator, &x, self.config.parallel);
        let positions = matrix_to_positions(&smoothed);

        let mut log = DegeneracyLog::new(self.config.degeneracy);
        let estimate = estimate(&positions, &self.faces, &self.topology, &self.config, &mut log)?;

        let mut degeneracies = log.into_vec();
        degeneracies.extend_from_slice(&self.operator_degeneracies);

        self.positions = positions;
        self.estimate = estimate;
        self.degeneracies = degeneracies;
        self.log_summary("smoothed");
        Ok(())
    }

    /// Range of Gaussian and mean curvature over all vertices.
    pub fn frequencies(&self) -> CurvatureExtrema {
        CurvatureExtrema::from_curvatures(&self.estimate.curvatures)
    }

    fn log_summary(&self, action: &str) {
        let extrema = self.frequencies();
        info!(
            action,
            min_gaussian = extrema.min_gaussian,
            max_gaussian = extrema.max_gaussian,
            min_mean = extrema.min_mean,
            max_mean = extrema.max_mean,
            degeneracies = self.degeneracies.len(),
            "curvature estimated"
        );
    }

    // ==================== Mesh ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.num_vertices()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Current vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// The triangle list, unchanged since build.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Corner indices of a face.
    #[inline]
    pub fn face(&self, f: FaceId) -> [usize; 3] {
        self.faces[f.index()]
    }

    /// Vertex adjacency.
    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The configuration the geometry was built with.
    #[inline]
    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Degeneracies reported by the last build or smoothing pass.
    ///
    /// Always empty under [`DegeneracyPolicy::Fail`](crate::config::DegeneracyPolicy::Fail).
    #[inline]
    pub fn degeneracies(&self) -> &[Degeneracy] {
        &self.degeneracies
    }

    // ==================== Per face ====================

    /// Tangent frame of a face, anchored on its first edge.
    #[inline]
    pub fn face_frame(&self, f: FaceId) -> &Frame {
        &self.estimate.face_frames[f.index()]
    }

    /// Unit normal of a face.
    #[inline]
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        self.estimate.face_frames[f.index()].w
    }

    /// Mixed Voronoi weight of each corner of a face.
    #[inline]
    pub fn face_weights(&self, f: FaceId) -> [f64; 3] {
        self.estimate.face_weights[f.index()]
    }

    /// Curvature tensor of a face in its own frame.
    #[inline]
    pub fn face_tensor(&self, f: FaceId) -> &CurvatureTensor {
        &self.estimate.face_tensors[f.index()]
    }

    /// C-tensor of a face in its own frame.
    #[inline]
    pub fn face_c_tensor(&self, f: FaceId) -> &CTensor {
        &self.estimate.face_c_tensors[f.index()]
    }

    // ==================== Per vertex ====================

    /// Tangent frame of a vertex.
    #[inline]
    pub fn vertex_frame(&self, v: VertexId) -> &Frame {
        &self.estimate.vertex_frames[v.index()]
    }

    /// Unit normal of a vertex.
    #[inline]
    pub fn vertex_normal(&self, v: VertexId) -> Vector3<f64> {
        self.estimate.vertex_frames[v.index()].w
    }

    /// Curvature tensor of a vertex in its own frame.
    #[inline]
    pub fn curvature_tensor(&self, v: VertexId) -> &CurvatureTensor {
        &self.estimate.vertex_tensors[v.index()]
    }

    /// Principal curvatures and directions of a vertex.
    #[inline]
    pub fn curvature(&self, v: VertexId) -> &PrincipalCurvature {
        &self.estimate.curvatures[v.index()]
    }

    /// Principal curvatures and directions of all vertices.
    #[inline]
    pub fn curvatures(&self) -> &[PrincipalCurvature] {
        &self.estimate.curvatures
    }

    /// C-tensor of a vertex in its own frame.
    #[inline]
    pub fn c_tensor(&self, v: VertexId) -> &CTensor {
        &self.estimate.c_tensors[v.index()]
    }

    /// C-tensors of all vertices.
    #[inline]
    pub fn c_tensors(&self) -> &[CTensor] {
        &self.estimate.c_tensors
    }

    /// Gaussian curvature `k1 · k2`.
    #[inline]
    pub fn gaussian(&self, v: VertexId) -> f64 {
        self.curvature(v).gaussian()
    }

    /// Mean curvature `(k1 + k2) / 2`.
    #[inline]
    pub fn mean(&self, v: VertexId) -> f64 {
        self.curvature(v).mean()
    }

    /// Compute shape index at a vertex.
    ///
    /// Shape index is a scale-invariant measure: (2/π) * atan((k1+k2)/(k1-k2))
    /// Range: [-1, 1], where -1 = cup, 0 = saddle, 1 = cap
    pub fn shape_index(&self, v: VertexId) -> f64 {
        let PrincipalCurvature { k1, k2, .. } = *self.curvature(v);
        let diff = k1 - k2;
        if diff.abs() < 1e-10 {
            0.0 // Umbilical point
        } else {
            (2.0 / PI) * ((k1 + k2) / diff).atan()
        }
    }

    /// Compute curvedness at a vertex.
    ///
    /// Curvedness measures the magnitude of curvature: sqrt((k1² + k2²) / 2)
    pub fn curvedness(&self, v: VertexId) -> f64 {
        let PrincipalCurvature { k1, k2, .. } = *self.curvature(v);
        ((k1 * k1 + k2 * k2) / 2.0).sqrt()
    }

    // ==================== Smoothing ====================

    /// The inverse-distance diffusion operator built at load time.
    #[inline]
    pub fn diffusion_operator(&self) -> &DiffusionOperator {
        &self.operator
    }

    /// The Taubin filter applied by [`Geometry::smooth`].
    #[inline]
    pub fn filter(&self) -> &TaubinFilter {
        &self.filter
    }

    // ==================== Output ====================

    /// Flat `f32` arrays for upload to a renderer.
    pub fn render_buffers(&self) -> RenderBuffers {
        RenderBuffers::from_geometry(self)
    }
}
