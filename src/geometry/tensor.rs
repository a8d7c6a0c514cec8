//! Curvature tensors in local tangent coordinates.
//!
//! - [`CurvatureTensor`]: the 2×2 Weingarten (shape-operator) matrix.
//! - [`CTensor`]: its derivative, a totally symmetric rank-3 tensor over the
//!   tangent plane, stored as its four independent coefficients.

use std::ops::{Add, AddAssign, Div, Mul};

use nalgebra::{Matrix2, SymmetricEigen, Vector2, Vector4};

use super::frame::TangentBasis;

/// A 2×2 curvature tensor.
///
/// Maps a tangent displacement (local coordinates) to the change of the unit
/// normal along it. Per-face tensors come out of a least-squares fit and may
/// be slightly asymmetric; transported tensors are always symmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureTensor(Matrix2<f64>);

impl Default for CurvatureTensor {
    fn default() -> Self {
        Self::zeros()
    }
}

impl CurvatureTensor {
    /// The zero tensor.
    pub fn zeros() -> Self {
        Self(Matrix2::zeros())
    }

    /// Wrap a matrix.
    pub fn from_matrix(m: Matrix2<f64>) -> Self {
        Self(m)
    }

    /// Symmetric tensor `[[e, f], [f, g]]`.
    pub fn symmetric(e: f64, f: f64, g: f64) -> Self {
        Self(Matrix2::new(e, f, f, g))
    }

    /// The underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix2<f64> {
        &self.0
    }

    /// Apply the tensor to a tangent vector.
    #[inline]
    pub fn apply(&self, x: &Vector2<f64>) -> Vector2<f64> {
        self.0 * x
    }

    /// Express this tensor in another frame.
    ///
    /// Computes `e = aᵀSa`, `f = ½(aᵀSb + bᵀSa)`, `g = bᵀSb`, which is the
    /// change of basis of the symmetric part of `S`.
    pub fn transported(&self, basis: &TangentBasis) -> Self {
        let sa = self.0 * basis.a;
        let sb = self.0 * basis.b;
        let e = basis.a.dot(&sa);
        let f = 0.5 * (basis.a.dot(&sb) + basis.b.dot(&sa));
        let g = basis.b.dot(&sb);
        Self::symmetric(e, f, g)
    }

    /// Returns `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /// Eigen-decomposition into principal curvatures and directions.
    ///
    /// Returns `None` if the tensor has non-finite entries or complex
    /// eigenvalues. The larger eigenvalue is always `k1`.
    pub fn principal(&self) -> Option<Principal> {
        if !self.is_finite() {
            return None;
        }

        let m = &self.0;
        let trace_gap = m[(0, 0)] - m[(1, 1)];
        let discriminant = trace_gap * trace_gap + 4.0 * m[(0, 1)] * m[(1, 0)];
        let scale = m.norm_squared().max(f64::MIN_POSITIVE);
        if discriminant < -1e-12 * scale {
            return None;
        }

        let symmetric = (m + m.transpose()) * 0.5;
        let eigen = SymmetricEigen::new(symmetric);
        let (i1, i2) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
            (0, 1)
        } else {
            (1, 0)
        };

        Some(Principal {
            k1: eigen.eigenvalues[i1],
            k2: eigen.eigenvalues[i2],
            d1: eigen.eigenvectors.column(i1).into_owned(),
            d2: eigen.eigenvectors.column(i2).into_owned(),
        })
    }
}

impl Add for CurvatureTensor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for CurvatureTensor {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<f64> for CurvatureTensor {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for CurvatureTensor {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// Principal curvatures and directions in local tangent coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Principal {
    /// Maximum principal curvature.
    pub k1: f64,
    /// Minimum principal curvature.
    pub k2: f64,
    /// Unit direction of `k1`.
    pub d1: Vector2<f64>,
    /// Unit direction of `k2`.
    pub d2: Vector2<f64>,
}

/// Totally symmetric rank-3 tensor over the tangent plane.
///
/// With coefficients `(a, b, c, d) = (C₁₁₁, C₁₁₂, C₁₂₂, C₂₂₂)` the tensor is
/// stored as two symmetric matrices sharing entries:
///
/// ```text
/// first  = C₁ⱼₖ = [[a, b], [b, c]]
/// second = C₂ⱼₖ = [[b, c], [c, d]]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CTensor {
    coefficients: Vector4<f64>,
}

impl CTensor {
    /// Tensor with coefficients `(a, b, c, d)`.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            coefficients: Vector4::new(a, b, c, d),
        }
    }

    /// The zero tensor.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Tensor from a coefficient vector `(a, b, c, d)`.
    pub fn from_coefficients(coefficients: Vector4<f64>) -> Self {
        Self { coefficients }
    }

    /// The four independent coefficients `(a, b, c, d)`.
    #[inline]
    pub fn coefficients(&self) -> &Vector4<f64> {
        &self.coefficients
    }

    /// First slice `C₁ⱼₖ`.
    pub fn first(&self) -> Matrix2<f64> {
        let [a, b, c, _] = self.coefficients.into();
        Matrix2::new(a, b, b, c)
    }

    /// Second slice `C₂ⱼₖ`.
    pub fn second(&self) -> Matrix2<f64> {
        let [_, b, c, d] = self.coefficients.into();
        Matrix2::new(b, c, c, d)
    }

    /// Full contraction `Σ Cᵢⱼₖ xᵢ yⱼ zₖ`.
    pub fn contract(&self, x: &Vector2<f64>, y: &Vector2<f64>, z: &Vector2<f64>) -> f64 {
        x.x * y.dot(&(self.first() * z)) + x.y * y.dot(&(self.second() * z))
    }

    /// Change of the curvature tensor along tangent direction `e`: `Σ Cᵢⱼₖ eᵢ`.
    pub fn derivative_along(&self, e: &Vector2<f64>) -> Matrix2<f64> {
        self.first() * e.x + self.second() * e.y
    }

    /// Express this tensor in another frame.
    pub fn transported(&self, basis: &TangentBasis) -> Self {
        let (a, b) = (&basis.a, &basis.b);
        Self::new(
            self.contract(a, a, a),
            self.contract(a, a, b),
            self.contract(a, b, b),
            self.contract(b, b, b),
        )
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coefficients.iter().all(|x| x.is_finite())
    }

    /// Frobenius norm of the coefficient vector.
    pub fn norm(&self) -> f64 {
        self.coefficients.norm()
    }
}

impl Add for CTensor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_coefficients(self.coefficients + rhs.coefficients)
    }
}

impl AddAssign for CTensor {
    fn add_assign(&mut self, rhs: Self) {
        self.coefficients += rhs.coefficients;
    }
}

impl Mul<f64> for CTensor {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::from_coefficients(self.coefficients * rhs)
    }
}

impl Div<f64> for CTensor {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::from_coefficients(self.coefficients / rhs)
    }
}
