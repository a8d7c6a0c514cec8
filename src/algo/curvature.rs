//! Curvature tensor estimation on triangle meshes.
//!
//! The estimator works in two passes:
//!
//! 1. **Per face**: fit a 2×2 tensor `S` such that for every edge `e` of the
//!    triangle, the change of the vertex normals along it satisfies
//!    `Δn ≈ S e` (both in face coordinates). Three edges give six equations
//!    for four unknowns, solved in the least-squares sense.
//! 2. **Per vertex**: transport the tensors of the incident faces into the
//!    vertex frame and average them with the mixed Voronoi weights of the
//!    vertex in each face.
//!
//! The eigen-decomposition of the vertex tensor gives the principal
//! curvatures `k1 ≥ k2` and their directions.
//!
//! # Example
//!
//! ```
//! use weingarten::algo::curvature::{fit_face_tensor, principal_curvature};
//! use weingarten::geometry::Frame;
//! use nalgebra::{Point3, Vector3};
//!
//! // A triangle on the unit sphere with exact radial normals
//! let p = [
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! let n = [p[0].coords, p[1].coords, p[2].coords];
//!
//! let frame = Frame::from_triangle(&p[0], &p[1], &p[2]).unwrap();
//! let tensor = fit_face_tensor(&frame, [&p[0], &p[1], &p[2]], [&n[0], &n[1], &n[2]]).unwrap();
//! let curvature = principal_curvature(&frame, &tensor).unwrap();
//! assert!((curvature.k1 - 1.0).abs() < 1e-9);
//! assert!((curvature.k2 - 1.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! - Rusinkiewicz, S. (2004). "Estimating Curvatures and Their Derivatives on
//!   Triangle Meshes." 3DPVT.

use nalgebra::{Matrix2, Point3, Vector3};

use crate::geometry::{CurvatureTensor, Frame};

use super::lstsq::solve4;

/// Principal curvatures and world-space principal directions at a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalCurvature {
    /// Maximum principal curvature.
    pub k1: f64,
    /// Minimum principal curvature.
    pub k2: f64,
    /// Unit direction of `k1`, tangent to the surface.
    pub t1: Vector3<f64>,
    /// Unit direction of `k2`, tangent to the surface.
    pub t2: Vector3<f64>,
}

impl PrincipalCurvature {
    /// Zero curvature with directions along the frame's tangent axes.
    pub fn flat(frame: &Frame) -> Self {
        Self {
            k1: 0.0,
            k2: 0.0,
            t1: frame.u,
            t2: frame.v,
        }
    }

    /// Gaussian curvature `k1 · k2`.
    #[inline]
    pub fn gaussian(&self) -> f64 {
        self.k1 * self.k2
    }

    /// Mean curvature `(k1 + k2) / 2`.
    #[inline]
    pub fn mean(&self) -> f64 {
        0.5 * (self.k1 + self.k2)
    }
}

/// Unit vertex normal from the corners of its incident faces.
///
/// Each corner is given by its two outgoing edges `(a, b)` in face order and
/// contributes `(a × b) / (|a|² |b|²)` (Max, 1999). The weighting recovers
/// the exact normal when the vertex and its neighbours lie on a sphere.
/// Corners with a zero-length edge are ignored. Returns `None` if nothing
/// contributes or the contributions cancel out.
///
/// # Reference
///
/// Max, N. (1999). "Weights for Computing Vertex Normals from Facet Normals."
/// Journal of Graphics Tools 4(2).
pub fn vertex_normal<I>(corners: I) -> Option<Vector3<f64>>
where
    I: IntoIterator<Item = (Vector3<f64>, Vector3<f64>)>,
{
    let mut sum = Vector3::zeros();
    let mut scale = 0.0_f64;
    for (a, b) in corners {
        let denom = a.norm_squared() * b.norm_squared();
        if !(denom > 0.0) {
            continue;
        }
        let n = a.cross(&b) / denom;
        if !n.iter().all(|x| x.is_finite()) {
            continue;
        }
        sum += n;
        scale += n.norm();
    }
    if !(scale > 0.0) || sum.norm() <= 1e-12 * scale {
        return None;
    }
    Some(sum.normalize())
}

/// Least-squares fit of the curvature tensor of one triangle.
///
/// `positions` and `normals` are the corners in face order; `normals` are the
/// unit vertex normals. Returns the (possibly asymmetric) tensor in `frame`
/// coordinates, or `None` if the system is singular.
pub fn fit_face_tensor(
    frame: &Frame,
    positions: [&Point3<f64>; 3],
    normals: [&Vector3<f64>; 3],
) -> Option<CurvatureTensor> {
    let mut rows = [[0.0; 4]; 6];
    let mut rhs = [0.0; 6];

    for i in 0..3 {
        let j = (i + 1) % 3;
        let e = frame.to_local(&(positions[j] - positions[i]));
        let dn = frame.to_local(&(normals[j] - normals[i]));

        rows[2 * i] = [e.x, e.y, 0.0, 0.0];
        rhs[2 * i] = dn.x;
        rows[2 * i + 1] = [0.0, 0.0, e.x, e.y];
        rhs[2 * i + 1] = dn.y;
    }

    let x = solve4(&rows, &rhs)?;
    Some(CurvatureTensor::from_matrix(Matrix2::new(x[0], x[1], x[2], x[3])))
}

/// Weighted average of face tensors transported into a vertex frame.
///
/// Each item is `(face_frame, face_tensor, weight)`. Returns `None` if the
/// weights sum to zero.
pub fn average_vertex_tensor<I>(vertex_frame: &Frame, faces: I, parallel_threshold: f64) -> Option<CurvatureTensor>
where
    I: IntoIterator<Item = (Frame, CurvatureTensor, f64)>,
{
    let mut sum = CurvatureTensor::zeros();
    let mut total_weight = 0.0;

    for (face_frame, tensor, weight) in faces {
        let basis = face_frame.transport_basis(vertex_frame, parallel_threshold);
        sum += tensor.transported(&basis) * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        Some(sum / total_weight)
    } else {
        None
    }
}

/// Principal curvatures of a vertex tensor, with directions mapped to world space.
///
/// Returns `None` if the tensor is not finite or has complex eigenvalues.
pub fn principal_curvature(frame: &Frame, tensor: &CurvatureTensor) -> Option<PrincipalCurvature> {
    let p = tensor.principal()?;
    let t1 = frame.to_world(&p.d1).normalize();
    let t2 = frame.to_world(&p.d2).normalize();
    Some(PrincipalCurvature {
        k1: p.k1,
        k2: p.k2,
        t1,
        t2,
    })
}
