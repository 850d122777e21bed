//! Configuration options for the confidence contour engine.

use super::leveler::{ChiSquareConvention, MAX_SIGMA_LEVELS};
use crate::error::{ClRegionError, Result};
use serde::{Deserialize, Serialize};

/// Configuration options for [`ConfidenceContours`](super::ConfidenceContours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Number of sigma levels to trace, 1 to 5. Default: 2
    pub n_sigma: usize,

    /// Probability content convention of the sigma levels.
    /// Default: OneDimensional
    pub convention: ChiSquareConvention,

    /// Height of the minimum after the hill transform of chi-square surfaces.
    /// Default: 100.0
    pub hill_offset: f64,

    /// Fragments closer than this many bin widths are joined. Default: 0.05
    pub join_tolerance: f64,

    /// Append a contour filling the whole plot area when a level is empty.
    /// Default: true
    pub fill_empty_levels: bool,

    /// Snap contour points close to the plot boundary onto it. Default: false
    pub magnetic_boundaries: bool,

    /// Snapping range in bin widths. Default: 0.75
    pub magnetic_range: f64,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            n_sigma: 2,
            convention: ChiSquareConvention::default(),
            hill_offset: 100.0,
            join_tolerance: 0.05,
            fill_empty_levels: true,
            magnetic_boundaries: false,
            magnetic_range: 0.75,
        }
    }
}

impl ContourConfig {
    pub fn with_sigma_levels(n_sigma: usize) -> Self {
        Self {
            n_sigma,
            ..Self::default()
        }
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_sigma == 0 || self.n_sigma > MAX_SIGMA_LEVELS {
            return Err(ClRegionError::InvalidSigmaLevels {
                requested: self.n_sigma,
                max: MAX_SIGMA_LEVELS,
            });
        }
        if !(self.join_tolerance >= 0.0) || !(self.magnetic_range >= 0.0) {
            return Err(ClRegionError::InvalidInput(
                "join tolerance and magnetic range must be non-negative".to_string(),
            ));
        }
        if self.hill_offset <= 0.0 {
            return Err(ClRegionError::InvalidInput(format!(
                "hill offset must be positive, got {}",
                self.hill_offset
            )));
        }
        Ok(())
    }
}
