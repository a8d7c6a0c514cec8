//! Mesh connectivity.
//!
//! A mesh enters the crate as a face-vertex list: positions plus `[usize; 3]`
//! index triples. This module turns the triples into the adjacency queries the
//! estimators need.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//!
//! # Example
//!
//! ```
//! use weingarten::mesh::{Topology, VertexId};
//!
//! let faces = [[0, 1, 2], [0, 2, 3]];
//! let topology = Topology::build(4, &faces).unwrap();
//!
//! for f in topology.vertex_faces(VertexId::new(2)) {
//!     println!("vertex 2 touches face {}", f);
//! }
//! ```

mod index;
mod topology;

pub use index::{FaceId, VertexId};
pub use topology::Topology;
