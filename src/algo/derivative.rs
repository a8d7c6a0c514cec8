//! Curvature derivative (C-tensor) estimation.
//!
//! Mirrors the two-pass scheme of [`curvature`](super::curvature) one order
//! higher: per face, fit a rank-3 tensor `C` to the differences of the vertex
//! curvature tensors along the edges (`ΔS ≈ Σ Cᵢ eᵢ`); per vertex, average the
//! transported face tensors with the same mixed Voronoi weights.
//!
//! Vertex tensors live in their own vertex frames, so they are transported
//! into the face frame before being differenced.

use nalgebra::Point3;

use crate::geometry::{CTensor, CurvatureTensor, Frame};

use super::lstsq::solve4;

/// Least-squares fit of the C-tensor of one triangle.
///
/// Each edge `i → j` contributes three equations, one per independent entry
/// of `ΔS = S_j - S_i`:
///
/// ```text
/// [eu ev  0  0] · (a, b, c, d) = ΔS₁₁
/// [ 0 eu ev  0] · (a, b, c, d) = ΔS₁₂
/// [ 0  0 eu ev] · (a, b, c, d) = ΔS₂₂
/// ```
///
/// Returns `None` if the system is singular.
pub fn fit_face_c_tensor(
    face_frame: &Frame,
    positions: [&Point3<f64>; 3],
    vertex_frames: [&Frame; 3],
    vertex_tensors: [&CurvatureTensor; 3],
    parallel_threshold: f64,
) -> Option<CTensor> {
    let local: [CurvatureTensor; 3] = std::array::from_fn(|i| {
        let basis = vertex_frames[i].transport_basis(face_frame, parallel_threshold);
        vertex_tensors[i].transported(&basis)
    });

    let mut rows = [[0.0; 4]; 9];
    let mut rhs = [0.0; 9];

    for i in 0..3 {
        let j = (i + 1) % 3;
        let e = face_frame.to_local(&(positions[j] - positions[i]));
        let ds = local[j].matrix() - local[i].matrix();

        rows[3 * i] = [e.x, e.y, 0.0, 0.0];
        rhs[3 * i] = ds[(0, 0)];
        rows[3 * i + 1] = [0.0, e.x, e.y, 0.0];
        rhs[3 * i + 1] = ds[(0, 1)];
        rows[3 * i + 2] = [0.0, 0.0, e.x, e.y];
        rhs[3 * i + 2] = ds[(1, 1)];
    }

    solve4(&rows, &rhs).map(CTensor::from_coefficients)
}

/// Weighted average of face C-tensors transported into a vertex frame.
///
/// Each item is `(face_frame, face_c_tensor, weight)`. A zero total weight
/// yields the zero tensor.
pub fn average_vertex_c_tensor<I>(vertex_frame: &Frame, faces: I, parallel_threshold: f64) -> CTensor
where
    I: IntoIterator<Item = (Frame, CTensor, f64)>,
{
    let mut sum = CTensor::zeros();
    let mut total_weight = 0.0;

    for (face_frame, c, weight) in faces {
        let basis = face_frame.transport_basis(vertex_frame, parallel_threshold);
        sum += c.transported(&basis) * weight;
        total_weight += weight;
    }

    if total_weight != 0.0 {
        sum / total_weight
    } else {
        sum
    }
}
