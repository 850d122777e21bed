//! # Confidence Interval Engine
//!
//! Turns a sampled `1 - CL` curve into intervals at each requested confidence
//! level. Per level the engine
//!
//! 1. seeds one interval per solution by walking outward from it,
//! 2. adds raw intervals for regions no solution accounts for,
//! 3. refines closed bounds (quadratic fit with straight-line fallback on
//!    fine curves).
//!
//! then widens the intervals of each level to contain those of the lower
//! levels and optionally appends the envelope of all intervals.
//!
//! Without any solution a monotone scan in from both edges of the range
//! replaces steps 1 and 2. Such a scan cannot tell disjoint regions apart and
//! returns their envelope.

use super::cl_interval::{CentralMethod, ClInterval};
use super::config::IntervalConfig;
use super::interpolate::{refine_boundary, Refinement};
use super::raw::{find_interval_around, find_maxima, find_raw_intervals, scan_from_boundaries};
use super::set::ClIntervalSet;
use super::solution::{Solution, SolutionMatcher};
use crate::error::{ClRegionError, Result};
use crate::sampled::SampledCurve;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Counters describing how the bounds were obtained.
///
/// A high `linear_fallback` or `unrefined` count hints at a curve that is too
/// coarse or too noisy for the quadratic refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementStats {
    /// Bounds refined by the quadratic fit.
    pub quadratic: usize,
    /// Bounds where the quadratic fit failed and the straight line was used.
    pub linear_fallback: usize,
    /// Bounds refined by the straight line only.
    pub linear: usize,
    /// Bounds left at bin granularity.
    pub unrefined: usize,
    /// Refined bounds that crossed the central value and were put back to
    /// bin granularity.
    #[serde(default)]
    pub reverted: usize,
    /// Intervals widened to contain an interval of a lower confidence level.
    #[serde(default)]
    pub widened: usize,
    /// Solution seeds that did not yield a closed interval.
    pub bad_intervals: usize,
}

impl RefinementStats {
    fn record(&mut self, refinement: Refinement) {
        match refinement {
            Refinement::Quadratic => self.quadratic += 1,
            Refinement::LinearFallback => self.linear_fallback += 1,
            Refinement::Linear => self.linear += 1,
            Refinement::Unrefined => self.unrefined += 1,
        }
    }
}

/// Output of [`ClIntervalEngine::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalResult {
    /// One set per confidence level, in the order the levels were given.
    pub sets: Vec<ClIntervalSet>,
    pub stats: RefinementStats,
    /// Supplied solutions that are not contained in any interval.
    pub uncontained_solutions: Vec<Solution>,
}

impl IntervalResult {
    /// The set whose confidence level is closest to `level`.
    pub fn set_for_level(&self, level: f64) -> Option<&ClIntervalSet> {
        self.sets.iter().min_by(|a, b| {
            (a.confidence_level() - level)
                .abs()
                .total_cmp(&(b.confidence_level() - level).abs())
        })
    }
}

/// Computes confidence intervals from sampled curves.
#[derive(Debug, Clone, Default)]
pub struct ClIntervalEngine {
    config: IntervalConfig,
}

impl ClIntervalEngine {
    /// Create an engine, validating the configuration.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::InvalidConfidenceLevel` for a level outside (0, 1)
    pub fn new(config: IntervalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    /// Compute the intervals of `curve` at every configured confidence level.
    ///
    /// `solutions` are known local optima, best first. They seed intervals and
    /// provide central values; they may be empty.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::InvalidInput` for a non-finite solution, or in CLs
    ///   mode when the first bin cannot be normalized to
    pub fn compute(&self, curve: &SampledCurve, solutions: &[Solution]) -> Result<IntervalResult> {
        if let Some(bad) = solutions.iter().find(|s| !s.value.is_finite()) {
            return Err(ClRegionError::InvalidInput(format!(
                "solution '{}' has non-finite value {}",
                bad.label, bad.value
            )));
        }

        let normalized;
        let curve = if self.config.cls {
            normalized = curve.normalized_to_first()?;
            &normalized
        } else {
            curve
        };

        let seeds = self.seeds(curve, solutions);
        let mut stats = RefinementStats::default();
        let mut sets = Vec::new();
        let mut n_seeded = Vec::new();

        for level in self.config.effective_levels() {
            let pvalue = 1.0 - level;
            debug!(level, pvalue, seeds = seeds.len(), "computing intervals");
            let (set, n) = if seeds.is_empty() {
                (self.boundary_scan_set(curve, pvalue, &mut stats), 0)
            } else {
                self.seeded_set(curve, pvalue, &seeds, &mut stats)
            };
            sets.push(set);
            n_seeded.push(n);
        }

        nest_levels(curve, &mut sets, &mut stats);
        if self.config.largest {
            for (set, &n) in sets.iter_mut().zip(&n_seeded) {
                append_envelopes(set, n);
            }
        }

        let uncontained_solutions: Vec<Solution> = solutions
            .iter()
            .filter(|s| !sets.iter().any(|set| set.contains(s.value)))
            .cloned()
            .collect();
        for s in &uncontained_solutions {
            warn!(
                value = s.value,
                label = %s.label,
                "solution is not contained in any interval"
            );
        }

        Ok(IntervalResult {
            sets,
            stats,
            uncontained_solutions,
        })
    }

    /// Supplied solutions, plus local maxima when maxima seeding is enabled.
    fn seeds(&self, curve: &SampledCurve, solutions: &[Solution]) -> Vec<Solution> {
        let mut seeds = solutions.to_vec();
        if self.config.seed_from_maxima {
            let w = curve.bin_width();
            for bin in find_maxima(curve, self.config.maxima_pvalue_floor) {
                let x = curve.center(bin);
                if seeds.iter().all(|s| (s.value - x).abs() >= w) {
                    debug!(bin, x, "seeding interval from local maximum");
                    seeds.push(Solution::from_maximum(x));
                }
            }
        }
        seeds
    }

    /// Intervals seeded by `seeds` followed by the unassociated raw ones.
    /// Also returns the number of seeded intervals, which come first.
    fn seeded_set(
        &self,
        curve: &SampledCurve,
        pvalue: f64,
        seeds: &[Solution],
        stats: &mut RefinementStats,
    ) -> (ClIntervalSet, usize) {
        let mut seeded: Vec<ClInterval> = Vec::new();
        for seed in seeds {
            if seeded.iter().any(|cli| cli.contains(seed.value)) {
                debug!(value = seed.value, "solution already inside a seeded interval");
                continue;
            }
            match find_interval_around(curve, seed.value, pvalue) {
                None => {
                    warn!(
                        value = seed.value,
                        pvalue,
                        "bad interval: solution bin is not above the threshold"
                    );
                    stats.bad_intervals += 1;
                }
                Some(cli) if !cli.is_closed() => {
                    warn!(
                        value = seed.value,
                        pvalue,
                        "bad interval: walk from solution reached the scan boundary"
                    );
                    stats.bad_intervals += 1;
                }
                Some(mut cli) => {
                    cli.central_method = CentralMethod::Solution(seed.label.clone());
                    seeded.push(cli);
                }
            }
        }

        let matcher =
            SolutionMatcher::new(self.config.solution_tolerance * curve.bin_width());
        let mut unassociated: Vec<ClInterval> = find_raw_intervals(curve, pvalue)
            .into_iter()
            .filter(|raw| !seeded.iter().any(|cli| raw.contains(cli.central)))
            .collect();
        matcher.apply_with_containment(&mut unassociated, seeds);

        let n_seeded = seeded.len();
        let mut set = ClIntervalSet::new(pvalue);
        for mut cli in seeded.into_iter().chain(unassociated) {
            self.refine(curve, &mut cli, stats);
            set.push(cli);
        }
        (set, n_seeded)
    }

    fn boundary_scan_set(
        &self,
        curve: &SampledCurve,
        pvalue: f64,
        stats: &mut RefinementStats,
    ) -> ClIntervalSet {
        let mut set = ClIntervalSet::new(pvalue);
        match scan_from_boundaries(curve, pvalue) {
            Some(mut cli) => {
                self.refine(curve, &mut cli, stats);
                set.push(cli);
            }
            None => debug!(pvalue, "curve never rises above the threshold"),
        }
        set
    }

    /// Refine the closed bounds of `cli` in place and update a midpoint
    /// central value to the refined bounds.
    ///
    /// A refined bound that ends up on the wrong side of a solution central
    /// value is put back to its bin granularity value.
    fn refine(&self, curve: &SampledCurve, cli: &mut ClInterval, stats: &mut RefinementStats) {
        let raw = (cli.min, cli.min_method, cli.max, cli.max_method);
        let try_quadratic = curve.len() > self.config.quadratic_min_bins;
        if try_quadratic || self.config.refine_coarse_with_line {
            if cli.min_closed {
                let bin = curve.find_bin(cli.min);
                let (found, how) =
                    refine_boundary(curve, bin, cli.pvalue, cli.central, false, try_quadratic);
                stats.record(how);
                if let Some((x, method)) = found {
                    cli.min = x;
                    cli.min_method = method;
                }
            }
            if cli.max_closed {
                let bin = curve.find_bin(cli.max);
                let (found, how) =
                    refine_boundary(curve, bin, cli.pvalue, cli.central, true, try_quadratic);
                stats.record(how);
                if let Some((x, method)) = found {
                    cli.max = x;
                    cli.max_method = method;
                }
            }
        }

        if cli.central_method == CentralMethod::RawMid {
            cli.central = cli.min + (cli.max - cli.min) / 2.0;
            cli.pvalue_at_central = curve.value_at(cli.central);
            return;
        }
        if cli.min_closed && cli.min > cli.central {
            warn!(
                min = cli.min,
                central = cli.central,
                "refined lower bound above the central value, reverting"
            );
            (cli.min, cli.min_method) = (raw.0, raw.1);
            stats.reverted += 1;
        }
        if cli.max_closed && cli.max < cli.central {
            warn!(
                max = cli.max,
                central = cli.central,
                "refined upper bound below the central value, reverting"
            );
            (cli.max, cli.max_method) = (raw.2, raw.3);
            stats.reverted += 1;
        }
    }
}

/// Widen intervals so that every interval lies inside the interval
/// containing its central value at each higher confidence level, or failing
/// that the first one it overlaps.
///
/// Bounds are refined per level, and on peaks a bin or two wide a reverted
/// bound can end up outside the refined bound of the next level.
fn nest_levels(curve: &SampledCurve, sets: &mut [ClIntervalSet], stats: &mut RefinementStats) {
    let mut order: Vec<usize> = (0..sets.len()).collect();
    order.sort_by(|&a, &b| {
        sets[a]
            .confidence_level()
            .total_cmp(&sets[b].confidence_level())
    });
    for pair in order.windows(2) {
        let inner: Vec<ClInterval> = sets[pair[0]].intervals().to_vec();
        for cli in &inner {
            let outer_set = &mut sets[pair[1]];
            let k = outer_set
                .iter()
                .position(|o| o.contains(cli.central))
                .or_else(|| outer_set.iter().position(|o| o.min <= cli.max && cli.min <= o.max));
            let Some(outer) = k.and_then(|k| outer_set.get_mut(k)) else {
                debug!(
                    min = cli.min,
                    max = cli.max,
                    "no interval at the higher level overlaps the interval"
                );
                continue;
            };
            if widen_to_contain(outer, cli) {
                debug!(
                    min = outer.min,
                    max = outer.max,
                    "widened interval to nest the lower level"
                );
                stats.widened += 1;
                if outer.central_method == CentralMethod::RawMid {
                    outer.central = outer.min + (outer.max - outer.min) / 2.0;
                    outer.pvalue_at_central = curve.value_at(outer.central);
                }
            }
        }
    }
}

/// Move the bounds of `outer` out to those of `inner` where needed.
fn widen_to_contain(outer: &mut ClInterval, inner: &ClInterval) -> bool {
    let mut widened = false;
    if inner.min < outer.min {
        outer.min = inner.min;
        outer.min_method = inner.min_method;
        outer.min_closed = inner.min_closed;
        widened = true;
    }
    if inner.max > outer.max {
        outer.max = inner.max;
        outer.max_method = inner.max_method;
        outer.max_closed = inner.max_closed;
        widened = true;
    }
    widened
}

/// Append the envelope of the set once per seeded interval, carrying that
/// interval's central value. The first `n_seeded` intervals are the seeded
/// ones; without any, a single envelope is appended.
fn append_envelopes(set: &mut ClIntervalSet, n_seeded: usize) {
    if n_seeded == 0 {
        set.append_largest();
        return;
    }
    let Some(envelope) = set.largest() else {
        return;
    };
    let seeded: Vec<ClInterval> = set.intervals()[..n_seeded].to_vec();
    for cli in seeded {
        let mut e = envelope.clone();
        e.central = cli.central;
        e.central_method = cli.central_method;
        e.pvalue_at_central = cli.pvalue_at_central;
        set.push(e);
    }
}
