//! Error types for weingarten.
//!
//! This module defines the fatal errors returned by [`Geometry`](crate::Geometry)
//! operations and the per-element [`Degeneracy`] reports produced while
//! estimating curvature.

use std::fmt;

use thiserror::Error;

use crate::mesh::{FaceId, VertexId};

/// Result type alias using [`GeometryError`].
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors that can occur while building or smoothing a [`Geometry`](crate::Geometry).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The mesh has no vertices.
    #[error("mesh has no vertices")]
    NoVertices,

    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex} (mesh has {num_vertices} vertices)")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// The vertex index.
        vertex: usize,
    },

    /// The mesh has more elements than a 32-bit index can address.
    #[error("mesh has {count} {what}, more than a 32-bit index can address")]
    TooManyElements {
        /// Which element kind overflowed ("vertices" or "faces").
        what: &'static str,
        /// The element count.
        count: usize,
    },

    /// Degenerate geometry was found and the configuration asks to fail on it.
    #[error("degenerate geometry: {0}")]
    Degenerate(#[from] Degeneracy),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl GeometryError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: fmt::Display>(name: &'static str, value: T, reason: &'static str) -> Self {
        GeometryError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns `true` if the error comes from malformed input arrays
    /// (empty lists, bad indices, non-finite coordinates).
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            GeometryError::NoVertices
                | GeometryError::EmptyMesh
                | GeometryError::InvalidVertexIndex { .. }
                | GeometryError::NonFiniteCoordinate { .. }
                | GeometryError::TooManyElements { .. }
        )
    }

    /// Returns `true` if the error is a degeneracy reported under
    /// [`DegeneracyPolicy::Fail`](crate::config::DegeneracyPolicy::Fail).
    pub fn is_degenerate(&self) -> bool {
        matches!(self, GeometryError::Degenerate(_))
    }
}

/// The mesh element a [`Degeneracy`] was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// A vertex.
    Vertex(VertexId),
    /// A triangle.
    Face(FaceId),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Vertex(v) => write!(f, "vertex {}", v.index()),
            Element::Face(face) => write!(f, "face {}", face.index()),
        }
    }
}

/// What went wrong on a degenerate element.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegeneracyKind {
    /// Triangle with zero area (collinear corners, zero-length edge or repeated index).
    #[error("triangle has zero area")]
    ZeroArea,

    /// Vertex referenced by no face.
    #[error("vertex is not referenced by any face")]
    IsolatedVertex,

    /// Incident face normals cancel out, so the vertex normal is undefined.
    #[error("incident face normals sum to zero")]
    VanishingNormal,

    /// Sum of the mixed Voronoi weights around a vertex is zero.
    #[error("total incident area weight is zero")]
    ZeroWeight,

    /// The least-squares system has no unique solution.
    #[error("least-squares fit is singular")]
    SingularFit,

    /// Tensor entries are not finite or the eigen-decomposition is not real.
    #[error("numerically unstable tensor")]
    NumericInstability,

    /// Two adjacent vertices coincide, so inverse-distance weights are undefined.
    #[error("zero-length edge in the diffusion operator")]
    ZeroLengthEdge,
}

/// A degenerate mesh element found during estimation or smoothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{element}: {kind}")]
pub struct Degeneracy {
    /// The element the problem was found on.
    pub element: Element,
    /// What went wrong.
    pub kind: DegeneracyKind,
}

impl Degeneracy {
    /// Degeneracy on a vertex.
    pub fn vertex(v: VertexId, kind: DegeneracyKind) -> Self {
        Self {
            element: Element::Vertex(v),
            kind,
        }
    }

    /// Degeneracy on a face.
    pub fn face(f: FaceId, kind: DegeneracyKind) -> Self {
        Self {
            element: Element::Face(f),
            kind,
        }
    }
}
