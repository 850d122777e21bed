//! # Contour Levels
//!
//! Mapping of sigma levels to contour thresholds, and the interface to the
//! contour tracing primitive.
//!
//! Chi-square surfaces are traced after the hill transform, so their
//! thresholds are `offset - Δχ²`. Two conventions exist for the `Δχ²` of an
//! `n` sigma contour:
//!
//! - [`ChiSquareConvention::OneDimensional`]: `Δχ² = n²`, the contour whose
//!   projection on either axis gives the `n` sigma interval,
//! - [`ChiSquareConvention::TwoDimensional`]: the two degree of freedom
//!   quantile of the `n` sigma probability content, so the region covers
//!   that content in the plane.
//!
//! p-value surfaces are traced directly, at `Prob(n², 2)` and `Prob(n², 1)`
//! respectively.

use super::geometry::Polyline;
use crate::error::Result;
use crate::probability::{chi2_prob_1dof, chi2_prob_2dof, chi2_quantile_2dof};
use crate::sampled::SampledSurface;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maximum number of sigma levels traced.
pub const MAX_SIGMA_LEVELS: usize = 5;

/// Statistic held by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramType {
    /// Chi-square values, lower is better.
    Chi2,
    /// p-values, higher is better.
    PValue,
}

/// Which probability content an `n` sigma contour encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChiSquareConvention {
    #[default]
    OneDimensional,
    TwoDimensional,
}

/// Threshold of the `sigma` contour on a surface of the given type. For
/// chi-square surfaces the value refers to the hill-transformed surface.
pub fn threshold(kind: HistogramType, convention: ChiSquareConvention, sigma: usize, offset: f64) -> f64 {
    let n2 = (sigma * sigma) as f64;
    match (kind, convention) {
        (HistogramType::Chi2, ChiSquareConvention::OneDimensional) => offset - n2,
        (HistogramType::Chi2, ChiSquareConvention::TwoDimensional) => {
            offset - chi2_quantile_2dof(1.0 - chi2_prob_1dof(n2))
        }
        (HistogramType::PValue, ChiSquareConvention::OneDimensional) => chi2_prob_2dof(n2),
        (HistogramType::PValue, ChiSquareConvention::TwoDimensional) => chi2_prob_1dof(n2),
    }
}

/// A contour tracing primitive: returns the polylines along which `surface`
/// crosses `threshold`, possibly none.
///
/// Any closure with the same signature is a tracer.
pub trait ContourTracer {
    fn trace(&self, surface: &SampledSurface, threshold: f64) -> Result<Vec<Polyline>>;
}

impl<F> ContourTracer for F
where
    F: Fn(&SampledSurface, f64) -> Result<Vec<Polyline>>,
{
    fn trace(&self, surface: &SampledSurface, threshold: f64) -> Result<Vec<Polyline>> {
        self(surface, threshold)
    }
}

/// Traced fragments of one non-empty sigma level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelFragments {
    /// Sigma index after skipping empty levels.
    pub sigma: usize,
    /// Sigma level the threshold was computed for.
    pub nominal_sigma: usize,
    pub threshold: f64,
    pub fragments: Vec<Polyline>,
}

/// Output of [`ContourLeveler::trace_levels`].
#[derive(Debug, Clone, PartialEq)]
pub struct TracedLevels {
    /// Non-empty levels, highest sigma first.
    pub levels: Vec<LevelFragments>,
    /// Number of requested levels without any fragment.
    pub n_empty: usize,
}

/// Traces a surface at the thresholds of the first `n_sigma` sigma levels.
#[derive(Debug, Clone, Copy)]
pub struct ContourLeveler {
    kind: HistogramType,
    convention: ChiSquareConvention,
    n_sigma: usize,
    offset: f64,
}

impl ContourLeveler {
    /// `n_sigma` is clamped to [`MAX_SIGMA_LEVELS`]; validate it beforehand to
    /// report an error instead.
    pub fn new(kind: HistogramType, convention: ChiSquareConvention, n_sigma: usize, offset: f64) -> Self {
        Self {
            kind,
            convention,
            n_sigma: n_sigma.min(MAX_SIGMA_LEVELS),
            offset,
        }
    }

    /// `(sigma, threshold)` pairs in decreasing sigma order.
    pub fn thresholds(&self) -> Vec<(usize, f64)> {
        (1..=self.n_sigma)
            .rev()
            .map(|sigma| (sigma, threshold(self.kind, self.convention, sigma, self.offset)))
            .collect()
    }

    /// Call `tracer` at every threshold, highest sigma first, and group the
    /// fragments per level.
    ///
    /// Empty levels are dropped and do not take a sigma index: the `p`-th
    /// non-empty level in call order gets `n_sigma - n_empty - p`, so the
    /// remaining levels are renumbered from 1 upwards.
    pub fn trace_levels<T>(&self, tracer: &T, surface: &SampledSurface) -> Result<TracedLevels>
    where
        T: ContourTracer + ?Sized,
    {
        let mut traced = Vec::with_capacity(self.n_sigma);
        for (sigma, thr) in self.thresholds() {
            let fragments = tracer.trace(surface, thr)?;
            debug!(sigma, threshold = thr, fragments = fragments.len(), "traced contour level");
            traced.push((sigma, thr, fragments));
        }

        let n_empty = traced.iter().filter(|(_, _, f)| f.is_empty()).count();
        let mut levels = Vec::with_capacity(traced.len() - n_empty);
        for (nominal_sigma, threshold, fragments) in traced {
            if fragments.is_empty() {
                warn!(sigma = nominal_sigma, threshold, "no contour at this level");
                continue;
            }
            let sigma = self.n_sigma - n_empty - levels.len();
            levels.push(LevelFragments {
                sigma,
                nominal_sigma,
                threshold,
                fragments,
            });
        }
        Ok(TracedLevels { levels, n_empty })
    }
}
