//! Range of Gaussian and mean curvature over a mesh.
//!
//! Colormaps need a fixed interval to map curvature onto; [`CurvatureExtrema`]
//! provides it and the normalization helpers that go with it.

use super::curvature::PrincipalCurvature;

/// Minimum and maximum Gaussian (`k1·k2`) and mean (`(k1+k2)/2`) curvature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureExtrema {
    /// Smallest Gaussian curvature.
    pub min_gaussian: f64,
    /// Largest Gaussian curvature.
    pub max_gaussian: f64,
    /// Smallest mean curvature.
    pub min_mean: f64,
    /// Largest mean curvature.
    pub max_mean: f64,
}

impl CurvatureExtrema {
    /// Extrema over a sequence of vertex curvatures.
    ///
    /// Returns all zeros for an empty sequence.
    pub fn from_curvatures<'a, I>(curvatures: I) -> Self
    where
        I: IntoIterator<Item = &'a PrincipalCurvature>,
    {
        let mut iter = curvatures.into_iter();
        let Some(first) = iter.next() else {
            return Self {
                min_gaussian: 0.0,
                max_gaussian: 0.0,
                min_mean: 0.0,
                max_mean: 0.0,
            };
        };

        let seed = Self {
            min_gaussian: first.gaussian(),
            max_gaussian: first.gaussian(),
            min_mean: first.mean(),
            max_mean: first.mean(),
        };

        iter.fold(seed, |acc, c| {
            let (kg, h) = (c.gaussian(), c.mean());
            Self {
                min_gaussian: acc.min_gaussian.min(kg),
                max_gaussian: acc.max_gaussian.max(kg),
                min_mean: acc.min_mean.min(h),
                max_mean: acc.max_mean.max(h),
            }
        })
    }

    /// Map a Gaussian curvature into `[0, 1]` over the observed range.
    ///
    /// Returns `0.5` when the range is empty.
    pub fn normalize_gaussian(&self, value: f64) -> f64 {
        normalize(value, self.min_gaussian, self.max_gaussian)
    }

    /// Map a mean curvature into `[0, 1]` over the observed range.
    ///
    /// Returns `0.5` when the range is empty.
    pub fn normalize_mean(&self, value: f64) -> f64 {
        normalize(value, self.min_mean, self.max_mean)
    }
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range > 0.0 {
        ((value - min) / range).clamp(0.0, 1.0)
    } else {
        0.5
    }
}
