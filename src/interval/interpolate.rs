//! # Boundary Interpolation
//!
//! Refinement of interval boundaries below bin granularity. Given a bin `i`
//! such that bins `i` and `i+1` lie on different sides of a target value `y`,
//! these functions estimate the `x` where the sampled curve crosses `y`:
//!
//! - [`linear`] intersects the straight line through the two bin centers
//!   with the horizontal at `y`.
//! - [`quadratic`] fits a second order polynomial to three to five adjacent
//!   bins and solves it for `y`.
//!
//! Callers are expected to fall back to [`linear`] whenever [`quadratic`]
//! fails, see [`refine_boundary`].

use crate::sampled::SampledCurve;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use super::cl_interval::BoundMethod;

/// Result of a quadratic boundary interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCrossing {
    /// Interpolated crossing point.
    pub x: f64,
    /// Estimated interpolation error.
    ///
    /// Always zero: propagating the fit parameter uncertainties through the
    /// root formula is not implemented.
    pub error: f64,
}

/// Check if bins `i` and `i+1` are on the same side of `y`.
///
/// A bin exactly at `y` is on neither side.
pub fn bins_on_same_side(curve: &SampledCurve, i: usize, y: f64) -> bool {
    let a = curve.value(i);
    let b = curve.value(i + 1);
    (a > y && b > y) || (a < y && b < y)
}

/// Find a bin near `i` such that it and its right neighbour straddle `y`.
///
/// Returns `i` if it already satisfies the requirement, else the right or the
/// left neighbour if one of them does. If none does, `i` is returned and a
/// warning is logged; the subsequent interpolation will then refuse to work.
pub fn straddling_bin(curve: &SampledCurve, i: usize, y: f64) -> usize {
    let n = curve.len();
    if n < 2 {
        return i;
    }
    let last = n - 2;
    let i = i.min(last);
    if !bins_on_same_side(curve, i, y) {
        return i;
    }
    if i + 1 <= last && !bins_on_same_side(curve, i + 1, y) {
        return i + 1;
    }
    if i >= 1 && !bins_on_same_side(curve, i - 1, y) {
        return i - 1;
    }
    warn!(
        bin = i,
        y, "no direct neighbour of the bin lies on a different side of the threshold"
    );
    i
}

/// Interpolate the crossing of `y` between bins `i` and `i+1` with a straight line.
///
/// Returns `None` if `i+1` is outside the curve, or if both bins lie on the
/// same side of `y`.
pub fn linear(curve: &SampledCurve, i: usize, y: f64) -> Option<f64> {
    if i + 1 >= curve.len() {
        return None;
    }
    if bins_on_same_side(curve, i, y) {
        debug!(bin = i, y, "linear interpolation: bins i and i+1 on same side of y");
        return None;
    }
    let (p1x, p1y) = (curve.center(i), curve.value(i));
    let (p2x, p2y) = (curve.center(i + 1), curve.value(i + 1));
    if p1y == p2y {
        return None;
    }
    Some(p2x + (y - p2y) / (p1y - p2y) * (p1x - p2x))
}

/// Interpolate the crossing of `y` near bin `i` with a quadratic fit.
///
/// The fit uses bins `i-1`, `i`, `i+1`, extended by `i-2` and/or `i+2` when
/// those continue a strictly monotonic trend, so that the fit window never
/// crosses a local extremum. Of the two roots the one closest to the center of
/// bin `i` is taken; if both are equally close and they straddle
/// `reference_x`, the greater root is taken for an upper boundary and the
/// lesser one for a lower boundary.
///
/// Returns `None` if bin `i` is closer than two bins to either edge, if all
/// three central bins lie on the same side of `y`, if either root is NaN, or
/// if both roots fall outside the fit window.
pub fn quadratic(
    curve: &SampledCurve,
    i: usize,
    y: f64,
    reference_x: f64,
    upper: bool,
) -> Option<QuadraticCrossing> {
    let n = curve.len();
    if i < 2 || i + 3 > n {
        return None;
    }
    if bins_on_same_side(curve, i - 1, y) && bins_on_same_side(curve, i, y) {
        return None;
    }

    let v = |k: usize| curve.value(k);
    let strictly_monotonic = |a: f64, b: f64, c: f64| (a < b && b < c) || (a > b && b > c);

    let mut bins = Vec::with_capacity(5);
    if strictly_monotonic(v(i - 2), v(i - 1), v(i)) {
        bins.push(i - 2);
    }
    bins.extend([i - 1, i, i + 1]);
    if strictly_monotonic(v(i), v(i + 1), v(i + 2)) {
        bins.push(i + 2);
    }

    // Work in units of bins relative to bin i to keep the fit well conditioned.
    let x0 = curve.center(i);
    let w = curve.bin_width();
    let points: Vec<(f64, f64)> = bins
        .iter()
        .map(|&k| ((curve.center(k) - x0) / w, v(k)))
        .collect();
    let coeffs = fit_parabola(&points)?;

    let (t0, t1) = solve_parabola(coeffs, y);
    if t0.is_nan() || t1.is_nan() {
        return None;
    }

    let (window_lo, window_hi) = (points[0].0, points[points.len() - 1].0);
    let inside = |t: f64| window_lo <= t && t <= window_hi;
    if !inside(t0) && !inside(t1) {
        return None;
    }

    let (x_a, x_b) = (x0 + t0 * w, x0 + t1 * w);
    let (d_a, d_b) = (t0.abs(), t1.abs());
    let x = if (d_a - d_b).abs() <= f64::EPSILON * d_a.max(d_b).max(1.0) {
        let straddle = (x_a < reference_x && x_b > reference_x)
            || (x_b < reference_x && x_a > reference_x);
        if straddle && upper {
            x_a.max(x_b)
        } else if straddle {
            x_a.min(x_b)
        } else {
            x_a
        }
    } else if d_a < d_b {
        x_a
    } else {
        x_b
    };

    Some(QuadraticCrossing { x, error: 0.0 })
}

/// Least-squares fit of `y = p0 + p1*t + p2*t^2` to the given points.
fn fit_parabola(points: &[(f64, f64)]) -> Option<[f64; 3]> {
    let design = DMatrix::from_fn(points.len(), 3, |r, c| points[r].0.powi(c as i32));
    let rhs = DVector::from_iterator(points.len(), points.iter().map(|p| p.1));
    let coeffs = design.svd(true, true).solve(&rhs, 1e-12).ok()?;
    Some([coeffs[0], coeffs[1], coeffs[2]])
}

/// Solve `p0 + p1*t + p2*t^2 = y`. Uses the cancellation-free form of the
/// quadratic formula, so a nearly straight fit still yields an accurate root
/// near the data. Degenerate parabolas give NaN roots.
fn solve_parabola(p: [f64; 3], y: f64) -> (f64, f64) {
    let (a, b, c) = (p[2], p[1], p[0] - y);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let t0 = q / a;
    let t1 = c / q;
    if t0.is_finite() && t1.is_finite() {
        (t0, t1)
    } else {
        (f64::NAN, f64::NAN)
    }
}

/// Refinement attempt outcome, used for the fallback statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    Quadratic,
    LinearFallback,
    Linear,
    Unrefined,
}

/// Refine one interval boundary that was found at bin granularity.
///
/// `bin` is the bin whose center currently holds the boundary, `y` the
/// threshold. With `try_quadratic` the quadratic fit is tried first and
/// rejected if it fails or lands outside `[center(i), center(i+1)]` of the
/// straddling pair; the straight line is the fallback. Either way the result
/// stays between the two bins that bracket the crossing.
/// Without it only the straight line is used. Returns the new boundary
/// (or `None` if neither method applies) together with the method used.
pub fn refine_boundary(
    curve: &SampledCurve,
    bin: usize,
    y: f64,
    reference_x: f64,
    upper: bool,
    try_quadratic: bool,
) -> (Option<(f64, BoundMethod)>, Refinement) {
    let i = straddling_bin(curve, bin, y);
    if try_quadratic {
        if let Some(crossing) = quadratic(curve, i, y, reference_x, upper) {
            // quadratic() only succeeds with i + 2 < len
            let (lo, hi) = (curve.center(i), curve.center(i + 1));
            if lo <= crossing.x && crossing.x <= hi {
                return (Some((crossing.x, BoundMethod::Pol2)), Refinement::Quadratic);
            }
            debug!(
                bin = i,
                x = crossing.x,
                "quadratic crossing outside the straddling bins, falling back to a line"
            );
        }
        return match linear(curve, i, y) {
            Some(x) => (Some((x, BoundMethod::Line)), Refinement::LinearFallback),
            None => (None, Refinement::Unrefined),
        };
    }
    match linear(curve, i, y) {
        Some(x) => (Some((x, BoundMethod::Line)), Refinement::Linear),
        None => (None, Refinement::Unrefined),
    }
}
