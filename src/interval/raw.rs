//! # Raw Interval Finding
//!
//! Bin-granularity interval finding on a `1 - CL` curve. A bin belongs to an
//! interval at p-value `p` when its value is above `p`. Three ways of turning
//! that into intervals are provided:
//!
//! - [`find_raw_intervals`]: every maximal run of bins above `p`,
//! - [`find_interval_around`]: the run containing a given seed value,
//! - [`scan_from_boundaries`]: the envelope found by walking in from both
//!   edges of the scan range.
//!
//! All bounds found here sit on bin centers (or on the scan range edge for
//! open sides) and are meant to be refined afterwards.

use super::cl_interval::{BoundMethod, CentralMethod, ClInterval};
use crate::sampled::SampledCurve;

/// Checks if a bin is inside a CL interval, i.e. its value is above `pvalue`.
pub fn is_in_interval(curve: &SampledCurve, bin: usize, pvalue: f64) -> bool {
    curve.value(bin) > pvalue
}

/// Find all maximal runs of bins lying above `pvalue`.
///
/// A run starting at the first bin or ending at the last bin is open on that
/// side and bounded by the scan range edge. Otherwise the bound is the center
/// of the first bin outside the run. The central value is the midpoint of the
/// two bounds.
pub fn find_raw_intervals(curve: &SampledCurve, pvalue: f64) -> Vec<ClInterval> {
    let n = curve.len();
    let mut intervals = Vec::new();
    let mut run_start: Option<usize> = None;

    for j in 0..n {
        let inside = is_in_interval(curve, j, pvalue);
        match (run_start, inside) {
            (None, true) => run_start = Some(j),
            (Some(lo), false) => {
                intervals.push(raw_interval(curve, lo, j - 1, pvalue));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(lo) = run_start {
        intervals.push(raw_interval(curve, lo, n - 1, pvalue));
    }
    intervals
}

/// Build the interval for the run of in-interval bins `lo..=hi`.
fn raw_interval(curve: &SampledCurve, lo: usize, hi: usize, pvalue: f64) -> ClInterval {
    let n = curve.len();
    let mut cli = ClInterval::new(pvalue);

    if lo == 0 {
        cli.min = curve.xmin();
        cli.min_method = BoundMethod::Border;
        cli.min_closed = false;
    } else {
        cli.min = curve.center(lo - 1);
        cli.min_method = BoundMethod::Raw;
        cli.min_closed = true;
    }

    if hi == n - 1 {
        cli.max = curve.xmax();
        cli.max_method = BoundMethod::Border;
        cli.max_closed = false;
    } else {
        cli.max = curve.center(hi + 1);
        cli.max_method = BoundMethod::Raw;
        cli.max_closed = true;
    }

    cli.central = cli.min + (cli.max - cli.min) / 2.0;
    cli.central_method = CentralMethod::RawMid;
    cli.pvalue_at_central = curve.value_at(cli.central);
    cli
}

/// Find the interval around a seed value by walking outward bin by bin until
/// the curve drops out of the interval on each side.
///
/// Returns `None` if the seed's own bin is not above `pvalue`, i.e. the seed
/// is not contained in any interval at this p-value. A walk that runs into
/// the edge of the scan range leaves that side open.
pub fn find_interval_around(curve: &SampledCurve, seed: f64, pvalue: f64) -> Option<ClInterval> {
    let n = curve.len();
    let seed_bin = curve.find_bin(seed);
    if !is_in_interval(curve, seed_bin, pvalue) {
        return None;
    }

    let mut cli = ClInterval::new(pvalue);
    cli.central = seed;
    cli.pvalue_at_central = curve.value(seed_bin);

    match (0..seed_bin).rev().find(|&j| !is_in_interval(curve, j, pvalue)) {
        Some(j) => {
            cli.min = curve.center(j);
            cli.min_method = BoundMethod::Bins;
            cli.min_closed = true;
        }
        None => {
            cli.min = curve.xmin();
            cli.min_method = BoundMethod::Border;
            cli.min_closed = false;
        }
    }

    match (seed_bin + 1..n).find(|&j| !is_in_interval(curve, j, pvalue)) {
        Some(j) => {
            cli.max = curve.center(j);
            cli.max_method = BoundMethod::Bins;
            cli.max_closed = true;
        }
        None => {
            cli.max = curve.xmax();
            cli.max_method = BoundMethod::Border;
            cli.max_closed = false;
        }
    }

    Some(cli)
}

/// Monotone boundary scan: walk from the lower edge upwards and from the upper
/// edge downwards until the curve rises above `pvalue`.
///
/// This yields at most one interval, the envelope of everything above the
/// threshold, so disjoint regions cannot be told apart. Returns `None` when no
/// bin is above `pvalue`.
pub fn scan_from_boundaries(curve: &SampledCurve, pvalue: f64) -> Option<ClInterval> {
    let n = curve.len();
    let first = (0..n).find(|&j| is_in_interval(curve, j, pvalue))?;
    let last = (0..n).rev().find(|&j| is_in_interval(curve, j, pvalue))?;
    Some(raw_interval(curve, first, last, pvalue))
}

/// Bins that are strict local maxima with a value above `pvalue_threshold`.
///
/// The threshold rejects maxima of low-statistics curves that are mere
/// fluctuations.
pub fn find_maxima(curve: &SampledCurve, pvalue_threshold: f64) -> Vec<usize> {
    let n = curve.len();
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .filter(|&i| {
            let v = curve.value(i);
            curve.value(i - 1) < v && v > curve.value(i + 1) && v > pvalue_threshold
        })
        .collect()
}
