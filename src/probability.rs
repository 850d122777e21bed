//! # Probability Conversions
//!
//! Conversions between sigma levels, confidence levels, p-values and
//! chi-square values, as needed for the interval thresholds and the contour
//! threshold tables. Only the one and two degrees of freedom cases are needed
//! here, both of which have closed forms in terms of `erfc` and `exp`.

/// Conventional confidence levels of the 1, 2 and 3 sigma intervals.
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 3] = [0.6827, 0.9545, 0.9973];

/// Complementary error function.
///
/// Chebyshev fit from Numerical Recipes (`erfcc`), fractional error below
/// 1.2e-7 everywhere, which is far below the sampling granularity of any scan.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Error function, `1 - erfc(x)`.
pub fn erf(x: f64) -> f64 {
    1.0 - erfc(x)
}

/// Convert a sigma level to the probability content of the two-sided
/// Gaussian interval, e.g. 1 sigma -> 0.6827.
pub fn sigma_to_probability(sigma: f64) -> f64 {
    erf(sigma / std::f64::consts::SQRT_2)
}

/// Convert a sigma level to the two-sided p-value, `1 - sigma_to_probability`.
pub fn sigma_to_pvalue(sigma: f64) -> f64 {
    erfc(sigma / std::f64::consts::SQRT_2)
}

/// Convert a probability content back to a sigma level.
///
/// Inverts [`sigma_to_probability`] by bisection; probabilities outside
/// (0, 1) map to 0 and infinity respectively.
pub fn probability_to_sigma(prob: f64) -> f64 {
    if prob <= 0.0 {
        return 0.0;
    }
    if prob >= 1.0 {
        return f64::INFINITY;
    }
    let (mut lo, mut hi) = (0.0_f64, 40.0_f64);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if sigma_to_probability(mid) < prob {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Upper tail probability of a chi-square distribution with one degree of
/// freedom, `P(X > chi2)`.
pub fn chi2_prob_1dof(chi2: f64) -> f64 {
    if chi2 <= 0.0 {
        return 1.0;
    }
    erfc((0.5 * chi2).sqrt())
}

/// Upper tail probability of a chi-square distribution with two degrees of
/// freedom, `P(X > chi2) = exp(-chi2/2)`.
pub fn chi2_prob_2dof(chi2: f64) -> f64 {
    if chi2 <= 0.0 {
        return 1.0;
    }
    (-0.5 * chi2).exp()
}

/// Quantile of the two degree of freedom chi-square distribution: the chi2
/// value below which a fraction `cl` of the distribution lies.
pub fn chi2_quantile_2dof(cl: f64) -> f64 {
    -2.0 * (1.0 - cl).ln()
}
