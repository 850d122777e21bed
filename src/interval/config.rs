//! Configuration options for the confidence interval engine.

use crate::error::{ClRegionError, Result};
use crate::probability::DEFAULT_CONFIDENCE_LEVELS;
use serde::{Deserialize, Serialize};

/// Configuration options for [`ClIntervalEngine`](super::ClIntervalEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    /// Confidence levels to compute intervals for. An empty list selects the
    /// 1, 2 and 3 sigma levels. Default: [0.6827, 0.9545, 0.9973]
    pub confidence_levels: Vec<f64>,

    /// Append the envelope of all intervals of a level. Default: false
    pub largest: bool,

    /// Normalize the curve to its first bin before thresholding (CLs method).
    /// Default: false
    pub cls: bool,

    /// Curves with more bins than this get their bounds refined by a quadratic
    /// fit. Default: 25
    pub quadratic_min_bins: usize,

    /// Refine the bounds of coarse curves (at most `quadratic_min_bins` bins)
    /// with a straight line instead of leaving them at bin centers.
    /// Default: false
    pub refine_coarse_with_line: bool,

    /// Distance, in bin widths, within which an interval's central value is
    /// replaced by a solution. Default: 1.0
    pub solution_tolerance: f64,

    /// Seed intervals from local maxima of the curve as well. Default: false
    pub seed_from_maxima: bool,

    /// Local maxima at or below this p-value are ignored when seeding.
    /// Default: 0.04
    pub maxima_pvalue_floor: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            confidence_levels: DEFAULT_CONFIDENCE_LEVELS.to_vec(),
            largest: false,
            cls: false,
            quadratic_min_bins: 25,
            refine_coarse_with_line: false,
            solution_tolerance: 1.0,
            seed_from_maxima: false,
            maxima_pvalue_floor: 0.04,
        }
    }
}

impl IntervalConfig {
    /// Configuration for a single confidence level.
    pub fn with_level(level: f64) -> Self {
        Self {
            confidence_levels: vec![level],
            ..Self::default()
        }
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The confidence levels the engine will use, defaults substituted for an
    /// empty list.
    pub fn effective_levels(&self) -> Vec<f64> {
        if self.confidence_levels.is_empty() {
            DEFAULT_CONFIDENCE_LEVELS.to_vec()
        } else {
            self.confidence_levels.clone()
        }
    }

    /// Check all confidence levels lie in (0, 1) and the tolerances are
    /// positive.
    pub fn validate(&self) -> Result<()> {
        if let Some(&bad) = self
            .confidence_levels
            .iter()
            .find(|&&l| !(l > 0.0 && l < 1.0))
        {
            return Err(ClRegionError::InvalidConfidenceLevel(bad));
        }
        if !(self.solution_tolerance > 0.0) {
            return Err(ClRegionError::InvalidInput(format!(
                "solution tolerance must be positive, got {}",
                self.solution_tolerance
            )));
        }
        Ok(())
    }
}

/// Presentation options for the interval reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Name of the scanned variable. Default: "x"
    pub var: String,

    /// Unit of the variable, omitted from the report when empty. Default: ""
    pub unit: String,

    /// Label of the statistical method that produced the curve.
    /// Default: "Prob"
    pub method: String,

    /// Number of decimals to print. `None` derives it from the errors of each
    /// interval (two significant digits). Default: None
    pub digits: Option<usize>,

    /// Convert values from radians to degrees; the unit becomes "Deg".
    /// Default: false
    pub degrees: bool,

    /// Append central and bound methods and the p-value at the central value
    /// to each text line. Default: false
    pub verbose: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            var: "x".to_string(),
            unit: String::new(),
            method: "Prob".to_string(),
            digits: None,
            degrees: false,
            verbose: false,
        }
    }
}

impl ReportConfig {
    pub fn new(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            ..Self::default()
        }
    }
}
