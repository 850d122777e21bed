//! The confidence interval record and its provenance tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an interval boundary was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundMethod {
    /// Not determined yet.
    #[default]
    NotSet,
    /// Boundary of the scan range, the interval is open on this side.
    Border,
    /// Center of the first bin outside a raw run.
    Raw,
    /// Center of the first bin below threshold found by walking out of a solution.
    Bins,
    /// Straight line interpolation between two bins.
    Line,
    /// Local quadratic fit to up to five bins.
    Pol2,
    /// Envelope over all intervals of one confidence level.
    Largest,
}

impl BoundMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundMethod::NotSet => "n/a",
            BoundMethod::Border => "border",
            BoundMethod::Raw => "raw",
            BoundMethod::Bins => "bins",
            BoundMethod::Line => "line",
            BoundMethod::Pol2 => "pol2",
            BoundMethod::Largest => "largest",
        }
    }
}

impl fmt::Display for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the central value of an interval was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralMethod {
    #[default]
    NotSet,
    /// Midpoint of the interval bounds.
    RawMid,
    /// Taken from a solution; holds its provenance label.
    Solution(String),
}

impl fmt::Display for CentralMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentralMethod::NotSet => f.write_str("n/a"),
            CentralMethod::RawMid => f.write_str("raw mid"),
            CentralMethod::Solution(label) => f.write_str(label),
        }
    }
}

/// A confidence interval at one confidence level.
///
/// An open side (`min_closed` or `max_closed` false) means the curve never
/// dropped below the threshold before the scan range ended; the bound is then
/// the edge of the scan range and the true boundary lies beyond it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClInterval {
    /// p-value of the interval, `1 - CL`.
    pub pvalue: f64,
    /// Value of the curve at the central value.
    pub pvalue_at_central: f64,
    /// Lower boundary.
    pub min: f64,
    /// Upper boundary.
    pub max: f64,
    /// Central value.
    pub central: f64,
    pub min_closed: bool,
    pub max_closed: bool,
    pub min_method: BoundMethod,
    pub max_method: BoundMethod,
    pub central_method: CentralMethod,
}

impl ClInterval {
    /// An empty interval at the given p-value, to be filled by the finders.
    pub fn new(pvalue: f64) -> Self {
        Self {
            pvalue,
            pvalue_at_central: -1.0,
            min: -1.0,
            max: -1.0,
            central: -1.0,
            min_closed: false,
            max_closed: false,
            min_method: BoundMethod::NotSet,
            max_method: BoundMethod::NotSet,
            central_method: CentralMethod::NotSet,
        }
    }

    /// Confidence level, `1 - pvalue`.
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.pvalue
    }

    /// True when both boundaries were observed inside the scan range.
    pub fn is_closed(&self) -> bool {
        self.min_closed && self.max_closed
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Distance from the central value down to the lower bound.
    pub fn neg_error(&self) -> f64 {
        (self.central - self.min).abs()
    }

    /// Distance from the central value up to the upper bound.
    pub fn pos_error(&self) -> f64 {
        (self.max - self.central).abs()
    }
}

impl fmt::Display for ClInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pvalue={} pvalueAtCentral={} min={} max={} central={} minclosed={} maxclosed={} \
             minmethod={} maxmethod={} centralmethod={}",
            self.pvalue,
            self.pvalue_at_central,
            self.min,
            self.max,
            self.central,
            self.min_closed,
            self.max_closed,
            self.min_method,
            self.max_method,
            self.central_method
        )
    }
}
