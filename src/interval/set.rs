//! Ordered collection of intervals for one confidence level.

use super::cl_interval::{BoundMethod, CentralMethod, ClInterval};
use serde::{Deserialize, Serialize};
use std::slice;

/// All intervals found at one confidence level, in insertion order.
///
/// The first interval is the one seeded by the first (best) solution when
/// solutions were supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClIntervalSet {
    pvalue: f64,
    intervals: Vec<ClInterval>,
}

impl ClIntervalSet {
    pub fn new(pvalue: f64) -> Self {
        Self {
            pvalue,
            intervals: Vec::new(),
        }
    }

    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    pub fn confidence_level(&self) -> f64 {
        1.0 - self.pvalue
    }

    pub fn push(&mut self, interval: ClInterval) {
        self.intervals.push(interval);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ClInterval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, ClInterval> {
        self.intervals.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClInterval> {
        self.intervals.get_mut(index)
    }

    pub fn intervals(&self) -> &[ClInterval] {
        &self.intervals
    }

    /// Sort the intervals by their lower bound.
    pub fn sort_by_lower_bound(&mut self) {
        self.intervals.sort_by(|a, b| a.min.total_cmp(&b.min));
    }

    /// True if any interval of the set contains `x`.
    pub fn contains(&self, x: f64) -> bool {
        self.intervals.iter().any(|cli| cli.contains(x))
    }

    /// Envelope of all intervals: the smallest lower bound and the largest
    /// upper bound, with the closure flags of the intervals that provide them.
    /// The central value is the one of the first interval.
    ///
    /// Returns `None` for an empty set.
    pub fn largest(&self) -> Option<ClInterval> {
        let first = self.intervals.first()?;
        let mut envelope = first.clone();
        for cli in &self.intervals[1..] {
            if cli.min < envelope.min {
                envelope.min = cli.min;
                envelope.min_closed = cli.min_closed;
            }
            if cli.max > envelope.max {
                envelope.max = cli.max;
                envelope.max_closed = cli.max_closed;
            }
        }
        envelope.min_method = BoundMethod::Largest;
        envelope.max_method = BoundMethod::Largest;
        Some(envelope)
    }

    /// Append the [`largest`](ClIntervalSet::largest) envelope to the set.
    /// Returns false, appending nothing, for an empty set.
    pub fn append_largest(&mut self) -> bool {
        match self.largest() {
            Some(envelope) => {
                self.intervals.push(envelope);
                true
            }
            None => false,
        }
    }

    /// The interval around the best solution: the first one in the set. An
    /// empty set yields an interval spanning the full range `[xmin, xmax]`
    /// with p-value zero, i.e. nothing is excluded.
    pub fn central_interval(&self, xmin: f64, xmax: f64) -> ClInterval {
        match self.intervals.first() {
            Some(cli) => cli.clone(),
            None => {
                let mut cli = ClInterval::new(0.0);
                cli.min = xmin;
                cli.max = xmax;
                cli.central = xmin + 0.5 * (xmax - xmin);
                cli.min_method = BoundMethod::Border;
                cli.max_method = BoundMethod::Border;
                cli.central_method = CentralMethod::RawMid;
                cli
            }
        }
    }
}

impl<'a> IntoIterator for &'a ClIntervalSet {
    type Item = &'a ClInterval;
    type IntoIter = slice::Iter<'a, ClInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
