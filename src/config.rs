//! Build-time configuration.
//!
//! Everything that influences the numbers a [`Geometry`](crate::Geometry)
//! produces is passed in through [`GeometryConfig`] when the geometry is
//! built and stays fixed afterwards.
//!
//! # Example
//!
//! ```
//! use weingarten::config::{DegeneracyPolicy, GeometryConfig, TaubinParams};
//!
//! let config = GeometryConfig::default()
//!     .with_taubin(TaubinParams::default().with_iterations(10))
//!     .with_degeneracy_policy(DegeneracyPolicy::Fail)
//!     .sequential();
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{GeometryError, Result};

/// Parameters of the Taubin λ|μ low-pass filter.
///
/// `μ` is not stored: it follows from the pass-band frequency through
/// `1/λ + 1/μ = k_pb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaubinParams {
    /// Positive shrink factor λ.
    pub lambda: f64,

    /// Pass-band frequency `k_pb`. Components of the diffusion spectrum below
    /// it are preserved or slightly amplified, components above are damped.
    pub pass_band: f64,

    /// Number `N` of (λ, μ) pass pairs.
    pub iterations: usize,
}

impl Default for TaubinParams {
    fn default() -> Self {
        Self {
            lambda: 0.6307,
            pass_band: 0.095,
            iterations: 25,
        }
    }
}

impl TaubinParams {
    /// Set the shrink factor λ.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the pass-band frequency.
    pub fn with_pass_band(mut self, pass_band: f64) -> Self {
        self.pass_band = pass_band;
        self
    }

    /// Set the number of pass pairs.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// The negative inflate factor μ solved from `1/λ + 1/μ = k_pb`.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.lambda / (self.lambda * self.pass_band - 1.0)
    }

    /// Check that λ and `k_pb` produce a valid low-pass filter.
    pub fn validate(&self) -> Result<()> {
        if !(self.lambda > 0.0) || !self.lambda.is_finite() {
            return Err(GeometryError::invalid_param("lambda", self.lambda, "must be positive and finite"));
        }
        if !(self.pass_band > 0.0) || !self.pass_band.is_finite() {
            return Err(GeometryError::invalid_param(
                "pass_band",
                self.pass_band,
                "must be positive and finite",
            ));
        }
        if self.lambda * self.pass_band >= 1.0 {
            return Err(GeometryError::invalid_param(
                "pass_band",
                self.pass_band,
                "must be below 1/lambda so that mu is negative",
            ));
        }
        Ok(())
    }
}

/// What to do when an element has degenerate geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicy {
    /// Give the element a sentinel value (zero tensor, zero weight, canonical
    /// frame), record the problem on the geometry and keep going.
    #[default]
    Sentinel,

    /// Abort the operation with [`GeometryError::Degenerate`] on the first
    /// degenerate element.
    Fail,
}

/// Options for building and smoothing a [`Geometry`](crate::Geometry).
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    /// Smoothing filter parameters.
    pub taubin: TaubinParams,

    /// Handling of degenerate faces and vertices.
    pub degeneracy: DegeneracyPolicy,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,

    /// Cosine above which a face normal and a vertex normal are treated as
    /// parallel, so the face frame is used without rotation.
    pub parallel_threshold: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            taubin: TaubinParams::default(),
            degeneracy: DegeneracyPolicy::Sentinel,
            parallel: true,
            parallel_threshold: 0.998,
        }
    }
}

impl GeometryConfig {
    /// Set the smoothing filter parameters.
    pub fn with_taubin(mut self, taubin: TaubinParams) -> Self {
        self.taubin = taubin;
        self
    }

    /// Set the degeneracy policy.
    pub fn with_degeneracy_policy(mut self, policy: DegeneracyPolicy) -> Self {
        self.degeneracy = policy;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the parallel-normals cosine threshold.
    pub fn with_parallel_threshold(mut self, threshold: f64) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        self.taubin.validate()?;
        if !(self.parallel_threshold > 0.0 && self.parallel_threshold <= 1.0) {
            return Err(GeometryError::invalid_param(
                "parallel_threshold",
                self.parallel_threshold,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
