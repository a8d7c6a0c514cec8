//! Orthonormal tangent frames and their parallel transport.
//!
//! Every vertex and every face carries a [`Frame`] `(u, v, w)` where `w` is the
//! unit normal and `(u, v)` span the tangent plane. Tensors are stored in
//! these local 2D coordinates; moving a tensor from one frame to another goes
//! through a [`TangentBasis`].

use std::f64::consts::PI;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector2, Vector3};

/// Relative tolerance below which a cross product is considered zero.
const DEGENERATE_EPS: f64 = 1e-12;

/// A right-handed orthonormal frame: `u × v = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// First tangent axis.
    pub u: Vector3<f64>,
    /// Second tangent axis.
    pub v: Vector3<f64>,
    /// Unit normal.
    pub w: Vector3<f64>,
}

impl Frame {
    /// The world frame `(x, y, z)`. Used as the sentinel frame of degenerate elements.
    pub fn canonical() -> Self {
        Self {
            u: Vector3::x(),
            v: Vector3::y(),
            w: Vector3::z(),
        }
    }

    /// Complete a normal into a frame.
    ///
    /// `u` is the world X axis made orthogonal to the normal (Gram-Schmidt);
    /// when the normal is close to X, the world Y axis is used instead. The
    /// rule is deterministic, so repeated builds give identical frames.
    ///
    /// Returns `None` if `normal` has zero length.
    ///
    /// # Example
    ///
    /// ```
    /// use weingarten::geometry::Frame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = Frame::from_normal(&Vector3::new(0.0, 0.0, 2.0)).unwrap();
    /// assert!((frame.w - Vector3::z()).norm() < 1e-12);
    /// assert!((frame.u - Vector3::x()).norm() < 1e-12);
    /// ```
    pub fn from_normal(normal: &Vector3<f64>) -> Option<Self> {
        let w = normal.try_normalize(f64::MIN_POSITIVE)?;
        let reference = if w.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = (reference - w * w.dot(&reference)).normalize();
        let v = w.cross(&u);
        Some(Self { u, v, w })
    }

    /// Frame of triangle `(p0, p1, p2)`, anchored on the edge `p0 → p1`.
    ///
    /// `w` points to the side from which the corners appear counter-clockwise.
    /// Returns `None` for a zero-area triangle.
    pub fn from_triangle(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Self> {
        let e0 = p1 - p0;
        let e1 = p2 - p1;
        let cross = e1.cross(&(-e0));
        let scale = e0.norm() * e1.norm();
        if !(scale > 0.0) || cross.norm() <= DEGENERATE_EPS * scale {
            return None;
        }

        let u = e0.normalize();
        let w = cross.normalize();
        let v = w.cross(&u);
        Some(Self { u, v, w })
    }

    /// Local `(u, v)` coordinates of a 3D vector projected onto the tangent plane.
    #[inline]
    pub fn to_local(&self, x: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(x.dot(&self.u), x.dot(&self.v))
    }

    /// 3D vector of local tangent coordinates.
    #[inline]
    pub fn to_world(&self, x: &Vector2<f64>) -> Vector3<f64> {
        self.u * x.x + self.v * x.y
    }

    /// Rotate this frame so that its normal coincides with `normal`.
    ///
    /// If the normals are already parallel (cosine above `parallel_threshold`)
    /// the frame is returned unchanged. Otherwise it is rotated about
    /// `w × normal` by the angle between the normals; antiparallel normals
    /// rotate by π about `u`.
    pub fn rotated_onto(&self, normal: &Vector3<f64>, parallel_threshold: f64) -> Self {
        if self.w.dot(normal) > parallel_threshold {
            return *self;
        }

        let rotation = UnitQuaternion::rotation_between(&self.w, normal)
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Unit::new_normalize(self.u), PI));

        Self {
            u: rotation * self.u,
            v: rotation * self.v,
            w: rotation * self.w,
        }
    }

    /// Express `target`'s tangent axes in this frame's tangent coordinates,
    /// after transporting this frame onto `target`'s normal.
    ///
    /// Both basis vectors are normalized. The result is what
    /// [`CurvatureTensor::transported`](super::CurvatureTensor::transported)
    /// and [`CTensor::transported`](super::CTensor::transported) need to move a
    /// tensor stored in `self` into `target`.
    pub fn transport_basis(&self, target: &Frame, parallel_threshold: f64) -> TangentBasis {
        let source = self.rotated_onto(&target.w, parallel_threshold);
        let a = source.to_local(&target.u);
        let b = source.to_local(&target.v);
        TangentBasis {
            a: a.try_normalize(f64::MIN_POSITIVE).unwrap_or(a),
            b: b.try_normalize(f64::MIN_POSITIVE).unwrap_or(b),
        }
    }

    /// Returns `true` if all axes are unit length and pairwise orthogonal within `tolerance`.
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.u.norm() - 1.0).abs() < tolerance
            && (self.v.norm() - 1.0).abs() < tolerance
            && (self.w.norm() - 1.0).abs() < tolerance
            && self.u.dot(&self.v).abs() < tolerance
            && self.v.dot(&self.w).abs() < tolerance
            && self.w.dot(&self.u).abs() < tolerance
    }
}

/// The tangent axes of a target frame written in a source frame's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentBasis {
    /// Target `u` in source `(u, v)` coordinates.
    pub a: Vector2<f64>,
    /// Target `v` in source `(u, v)` coordinates.
    pub b: Vector2<f64>,
}

impl TangentBasis {
    /// The basis that leaves coordinates unchanged.
    pub fn identity() -> Self {
        Self {
            a: Vector2::x(),
            b: Vector2::y(),
        }
    }
}
