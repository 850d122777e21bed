//! Known local optima ("solutions") and their association with intervals.

use super::cl_interval::{CentralMethod, ClInterval};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A known local optimum of the scanned parameter, typically the best fit
/// value found by a minimizer. The label records where it came from and ends
/// up as the central method of the interval it seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub value: f64,
    pub label: String,
}

impl Solution {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// A solution found by the minimizer on the profile likelihood.
    pub fn best_fit(value: f64) -> Self {
        Self::new(value, "max PLH")
    }

    /// A pseudo-solution at the center of a local maximum bin.
    pub fn from_maximum(value: f64) -> Self {
        Self::new(value, "max bin")
    }
}

/// Associates solutions with intervals and overrides their central values.
///
/// The matcher never creates intervals; solutions that match nothing are left
/// for the caller to report.
#[derive(Debug, Clone, Copy)]
pub struct SolutionMatcher {
    tolerance: f64,
}

impl SolutionMatcher {
    /// Create a matcher with an absolute tolerance, usually one bin width.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Index of the first solution within tolerance of `x`.
    fn matching(&self, solutions: &[Solution], x: f64) -> Option<usize> {
        solutions
            .iter()
            .position(|s| (x - s.value).abs() < self.tolerance)
    }

    /// Overwrite the central value and method of every interval whose central
    /// value lies within tolerance of a solution. Returns how many intervals
    /// were matched.
    pub fn apply(&self, intervals: &mut [ClInterval], solutions: &[Solution]) -> usize {
        let mut matched = 0;
        for cli in intervals.iter_mut() {
            if let Some(k) = self.matching(solutions, cli.central) {
                debug!(
                    central = cli.central,
                    solution = solutions[k].value,
                    "central value taken from solution"
                );
                cli.central = solutions[k].value;
                cli.central_method = CentralMethod::Solution(solutions[k].label.clone());
                matched += 1;
            }
        }
        matched
    }

    /// Like [`SolutionMatcher::apply`], but an interval whose midpoint is not
    /// close to any solution still takes over the first solution it contains.
    /// Raw intervals of asymmetric curves have their midpoint far from the
    /// optimum that produced them.
    pub fn apply_with_containment(
        &self,
        intervals: &mut [ClInterval],
        solutions: &[Solution],
    ) -> usize {
        let mut matched = 0;
        for cli in intervals.iter_mut() {
            let k = self
                .matching(solutions, cli.central)
                .or_else(|| solutions.iter().position(|s| cli.contains(s.value)));
            if let Some(k) = k {
                cli.central = solutions[k].value;
                cli.central_method = CentralMethod::Solution(solutions[k].label.clone());
                matched += 1;
            }
        }
        matched
    }
}
