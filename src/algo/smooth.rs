//! Taubin λ|μ smoothing with an inverse-distance diffusion operator.
//!
//! The diffusion operator `W` averages each vertex over its edge neighbours
//! with weights proportional to the inverse edge length. With `K = I - W`,
//! the Taubin filter is the polynomial transfer function
//!
//! ```text
//! f(K) = ((I - λK)(I - μK))^N,      1/λ + 1/μ = k_pb
//! ```
//!
//! which passes frequencies below `k_pb` and damps the ones above it without
//! the shrinkage of plain Laplacian smoothing.
//!
//! # Reference
//!
//! Taubin, G. (1995). "A signal processing approach to fair surface design."
//! SIGGRAPH '95.
//!
//! # Example
//!
//! ```
//! use weingarten::algo::smooth::TaubinFilter;
//! use weingarten::config::TaubinParams;
//!
//! let filter = TaubinFilter::from_params(&TaubinParams::default());
//! assert!((filter.response(0.0) - 1.0).abs() < 1e-12);
//! assert!(filter.response(1.0) < 1e-3);
//! ```

use nalgebra::{DMatrix, Point3};

use crate::config::TaubinParams;
use crate::mesh::{Topology, VertexId};

use super::sparse::CsrMatrix;

/// Row-stochastic diffusion matrix `W` over the mesh graph.
///
/// `W(i, j) = φ(i, j) / Σₖ φ(i, k)` with `φ(i, j) = |xᵢ - xⱼ|⁻¹` for every
/// neighbour `j` of `i`. A vertex without neighbours keeps its own value
/// (`W(i, i) = 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionOperator {
    weights: CsrMatrix,
}

impl DiffusionOperator {
    /// Build the operator from vertex positions and their adjacency.
    ///
    /// Returns the operator together with the vertices that have a
    /// zero-length edge to a neighbour. Inverse-distance weights are undefined
    /// there, so those rows fall back to uniform weights over the neighbours.
    pub fn build(positions: &[Point3<f64>], topology: &Topology) -> (Self, Vec<VertexId>) {
        let n = positions.len();
        let mut triplets = Vec::new();
        let mut zero_length = Vec::new();

        for (i, p) in positions.iter().enumerate() {
            let vid = VertexId::new(i);
            let neighbors = topology.vertex_neighbors(vid);

            if neighbors.is_empty() {
                triplets.push((i, i, 1.0));
                continue;
            }

            let phi: Vec<f64> = neighbors
                .iter()
                .map(|&j| 1.0 / (positions[j.index()] - p).norm())
                .collect();

            if phi.iter().all(|w| w.is_finite()) {
                let total: f64 = phi.iter().sum();
                for (&j, &w) in neighbors.iter().zip(&phi) {
                    triplets.push((i, j.index(), w / total));
                }
            } else {
                zero_length.push(vid);
                let w = 1.0 / neighbors.len() as f64;
                for &j in neighbors {
                    triplets.push((i, j.index(), w));
                }
            }
        }

        let weights = CsrMatrix::from_triplets(n, n, triplets);
        (Self { weights }, zero_length)
    }

    /// Number of vertices the operator acts on.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.weights.nrows()
    }

    /// The sparse matrix `W`.
    #[inline]
    pub fn matrix(&self) -> &CsrMatrix {
        &self.weights
    }

    /// Weight `W(i, j)`, zero if `j` is not a neighbour of `i`.
    pub fn weight(&self, i: VertexId, j: VertexId) -> f64 {
        self.weights.get(i.index(), j.index())
    }

    /// `W X` for a signal with one row per vertex.
    pub fn apply(&self, x: &DMatrix<f64>, parallel: bool) -> DMatrix<f64> {
        self.weights.mul_dense(x, parallel)
    }
}

/// The Taubin λ|μ low-pass filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaubinFilter {
    lambda: f64,
    mu: f64,
    iterations: usize,
}

impl TaubinFilter {
    /// Filter with explicit factors.
    pub fn new(lambda: f64, mu: f64, iterations: usize) -> Self {
        Self { lambda, mu, iterations }
    }

    /// Filter with μ derived from the pass-band frequency.
    pub fn from_params(params: &TaubinParams) -> Self {
        Self::new(params.lambda, params.mu(), params.iterations)
    }

    /// Shrink factor λ.
    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Inflate factor μ.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Number of (λ, μ) pass pairs.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Transfer function `((1 - λk)(1 - μk))^N` at frequency `k`.
    pub fn response(&self, k: f64) -> f64 {
        ((1.0 - self.lambda * k) * (1.0 - self.mu * k)).powi(self.iterations as i32)
    }

    /// Apply the filter to a signal with one row per vertex.
    ///
    /// Each pass computes `X ← (1 - f) X + f W X`, alternating `f = λ` and
    /// `f = μ`, which is `(I - fK) X` without forming `K`.
    pub fn apply(&self, operator: &DiffusionOperator, x: &DMatrix<f64>, parallel: bool) -> DMatrix<f64> {
        let mut x = x.clone();
        for _ in 0..self.iterations {
            for factor in [self.lambda, self.mu] {
                let wx = operator.apply(&x, parallel);
                x = x * (1.0 - factor) + wx * factor;
            }
        }
        x
    }
}

/// Stack positions into a `V×3` matrix.
pub fn positions_to_matrix(positions: &[Point3<f64>]) -> DMatrix<f64> {
    DMatrix::from_fn(positions.len(), 3, |i, j| positions[i][j])
}

/// Split a `V×3` matrix back into positions.
pub fn matrix_to_positions(x: &DMatrix<f64>) -> Vec<Point3<f64>> {
    debug_assert_eq!(x.ncols(), 3);
    x.row_iter()
        .map(|r| Point3::new(r[0], r[1], r[2]))
        .collect()
}
