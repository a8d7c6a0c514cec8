//! Vertex-to-face and vertex-to-vertex adjacency.
//!
//! [`Topology`] is derived once from the face list and never changes for the
//! lifetime of a [`Geometry`](crate::Geometry): smoothing moves vertices but
//! does not touch connectivity.

use crate::error::{GeometryError, Result};

use super::index::{FaceId, VertexId};

/// Incident faces and adjacent vertices of every vertex.
///
/// Neighbor lists carry no ordering guarantee and contain no duplicates. A
/// vertex is never listed as its own neighbor, even if a malformed face
/// repeats it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    vertex_faces: Vec<Vec<FaceId>>,
    vertex_neighbors: Vec<Vec<VertexId>>,
}

impl Topology {
    /// Build the adjacency index for `num_vertices` vertices from a triangle list.
    ///
    /// Runs in O(F) over the faces, then deduplicates each neighbor list.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidVertexIndex`] if a face references a
    /// vertex index `>= num_vertices`.
    ///
    /// # Example
    ///
    /// ```
    /// use weingarten::mesh::{Topology, VertexId};
    ///
    /// let topology = Topology::build(4, &[[0, 1, 2], [0, 2, 3]]).unwrap();
    /// assert_eq!(topology.vertex_faces(VertexId::new(0)).len(), 2);
    /// assert_eq!(topology.vertex_neighbors(VertexId::new(0)).len(), 3);
    /// ```
    pub fn build(num_vertices: usize, faces: &[[usize; 3]]) -> Result<Self> {
        let mut vertex_faces: Vec<Vec<FaceId>> = vec![Vec::new(); num_vertices];
        let mut vertex_neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); num_vertices];

        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= num_vertices {
                    return Err(GeometryError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi,
                        num_vertices,
                    });
                }
            }

            let face_id = FaceId::new(fi);
            for (corner, &vi) in face.iter().enumerate() {
                // A repeated index must not register the face twice
                if face[..corner].contains(&vi) {
                    continue;
                }
                vertex_faces[vi].push(face_id);
                for &other in face {
                    if other != vi {
                        vertex_neighbors[vi].push(VertexId::new(other));
                    }
                }
            }
        }

        for neighbors in &mut vertex_neighbors {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        Ok(Self {
            vertex_faces,
            vertex_neighbors,
        })
    }

    /// Number of vertices covered by the index.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertex_faces.len()
    }

    /// Faces incident to `v`.
    #[inline]
    pub fn vertex_faces(&self, v: VertexId) -> &[FaceId] {
        &self.vertex_faces[v.index()]
    }

    /// Vertices sharing an edge with `v`.
    #[inline]
    pub fn vertex_neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.vertex_neighbors[v.index()]
    }

    /// Number of edge-adjacent vertices.
    #[inline]
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex_neighbors[v.index()].len()
    }

    /// Returns `true` if no face references `v`.
    #[inline]
    pub fn is_isolated(&self, v: VertexId) -> bool {
        self.vertex_faces[v.index()].is_empty()
    }
}
