//! Numerical kernels.
//!
//! - **Voronoi**: mixed Voronoi area weights per triangle corner
//! - **Curvature**: per-face tensor fit, per-vertex averaging, principal curvatures
//! - **Derivative**: the same two passes for the curvature derivative (C-tensor)
//! - **Extrema**: curvature range over a mesh
//! - **Smoothing**: inverse-distance diffusion operator and Taubin filter
//!
//! The kernels work on single elements or plain arrays; [`Geometry`](crate::Geometry)
//! drives them over a whole mesh.

pub mod curvature;
pub mod derivative;
pub mod extrema;
pub mod smooth;
pub mod sparse;
pub mod voronoi;

mod lstsq;

use rayon::prelude::*;

/// Evaluate `f` for every index in `0..n`, in parallel or sequentially.
pub(crate) fn map_indices<T, F>(n: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}
