//! # Weingarten
//!
//! Discrete curvature on triangle meshes.
//!
//! Weingarten estimates, for every vertex of a triangle mesh, the shape
//! operator (Weingarten matrix), its principal curvatures and directions, and
//! the curvature derivative tensor. It also provides the Taubin λ|μ filter to
//! smooth noisy meshes before estimating curvature.
//!
//! ## Features
//!
//! - **Per-face tensor fit**: least-squares shape operator from the variation
//!   of vertex normals along the triangle edges
//! - **Mixed Voronoi weighting**: area-weighted aggregation to vertices, robust
//!   to obtuse triangles
//! - **Parallel transport**: tensors move between tangent frames by rotating
//!   one frame onto the other's normal
//! - **Curvature derivative**: the rank-3 C-tensor, estimated the same way one
//!   order higher
//! - **Taubin smoothing**: shrink-free low-pass filtering over an
//!   inverse-distance diffusion operator
//! - **Explicit degeneracy handling**: sentinel values or hard failure, per
//!   configuration
//!
//! ## Quick Start
//!
//! ```
//! use weingarten::prelude::*;
//! use nalgebra::Point3;
//!
//! // An octahedron
//! let vertices = vec![
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, -1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!     [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//! ];
//!
//! let mut geometry = weingarten::build(&vertices, &faces).unwrap();
//!
//! for v in geometry.vertex_ids() {
//!     let c = geometry.curvature(v);
//!     assert!(c.k1 >= c.k2);
//! }
//!
//! let range = geometry.frequencies();
//! assert!(range.min_gaussian <= range.max_gaussian);
//!
//! // Smooth in place; every curvature quantity is recomputed
//! geometry.smooth().unwrap();
//! ```
//!
//! ## Configuration
//!
//! ```
//! use weingarten::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! let config = GeometryConfig::default()
//!     .with_degeneracy_policy(DegeneracyPolicy::Fail)
//!     .sequential();
//! let geometry = Geometry::build_with_config(&vertices, &faces, config).unwrap();
//! assert!(geometry.degeneracies().is_empty());
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: an `info`
//! summary per build and smoothing pass, `debug` events per pipeline stage and
//! a `warn` per degenerate element. Install a subscriber to see them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod buffers;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;

#[cfg(test)]
mod test_fixtures;

pub use geometry::Geometry;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use weingarten::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::curvature::PrincipalCurvature;
    pub use crate::algo::extrema::CurvatureExtrema;
    pub use crate::buffers::RenderBuffers;
    pub use crate::config::{DegeneracyPolicy, GeometryConfig, TaubinParams};
    pub use crate::error::{Degeneracy, DegeneracyKind, GeometryError, Result};
    pub use crate::geometry::{CTensor, CurvatureTensor, Frame, Geometry};
    pub use crate::mesh::{FaceId, Topology, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

/// Build a [`Geometry`] with the default configuration.
///
/// Shorthand for [`Geometry::build`].
pub fn build(vertices: &[nalgebra::Point3<f64>], faces: &[[usize; 3]]) -> error::Result<Geometry> {
    Geometry::build(vertices, faces)
}
