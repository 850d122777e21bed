//! # Confidence Contours
//!
//! Orchestration of the 2-D pipeline: hill transform (chi-square surfaces),
//! padding, tracing at the sigma thresholds, fragment joining, hole punching
//! and optional boundary snapping.

use super::config::ContourConfig;
use super::geometry::{join_fragments, make_holes, snap_to_boundaries, Bounds, Polyline};
use super::leveler::{ContourLeveler, ContourTracer, HistogramType};
use super::preprocess::{hill_transform, pad};
use crate::error::{ClRegionError, Result};
use crate::sampled::SampledSurface;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The confidence region of one sigma level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Sigma index of the region, see [`ContourLeveler::trace_levels`]. Zero
    /// for the plot area filler.
    pub sigma: usize,
    /// Sigma level whose threshold was traced; `None` for the plot area
    /// filler.
    pub nominal_sigma: Option<usize>,
    pub threshold: Option<f64>,
    /// Closed polylines for line rendering.
    pub lines: Vec<Polyline>,
    /// Polylines with inner polylines spliced in as holes, for filled
    /// rendering.
    pub filled: Vec<Polyline>,
}

impl Contour {
    /// Build a contour from traced fragments: fragments are joined and
    /// closed, then enclosed polylines become holes of the filled version.
    pub fn from_fragments(
        sigma: usize,
        nominal_sigma: usize,
        threshold: f64,
        fragments: Vec<Polyline>,
        join_tolerance: f64,
    ) -> Self {
        let lines = join_fragments(fragments, join_tolerance);
        let filled = make_holes(lines.clone());
        Self {
            sigma,
            nominal_sigma: Some(nominal_sigma),
            threshold: Some(threshold),
            lines,
            filled,
        }
    }

    /// A contour covering the whole plot area.
    pub fn plot_area(bounds: &Bounds) -> Self {
        let rect = Polyline::rectangle(bounds);
        Self {
            sigma: 0,
            nominal_sigma: None,
            threshold: None,
            lines: vec![rect.clone()],
            filled: vec![rect],
        }
    }

    pub fn is_plot_area(&self) -> bool {
        self.nominal_sigma.is_none()
    }

    /// Total area of the filled polylines.
    pub fn filled_area(&self) -> f64 {
        self.filled.iter().map(Polyline::area).sum()
    }

    /// Snap both renderings onto the plot boundary.
    pub fn snap_to_boundaries(&mut self, bounds: &Bounds, range_x: f64, range_y: f64) {
        snap_to_boundaries(&mut self.lines, bounds, range_x, range_y);
        snap_to_boundaries(&mut self.filled, bounds, range_x, range_y);
    }
}

/// All contours computed from one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    /// Contours of the non-empty levels, highest sigma first, followed by the
    /// plot area filler if one was added.
    pub contours: Vec<Contour>,
    /// Number of requested sigma levels that had no fragments.
    pub n_empty: usize,
}

impl ContourSet {
    /// The contour traced for the given nominal sigma level.
    pub fn for_sigma(&self, nominal_sigma: usize) -> Option<&Contour> {
        self.contours
            .iter()
            .find(|c| c.nominal_sigma == Some(nominal_sigma))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Computes confidence contours from sampled surfaces.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceContours {
    config: ContourConfig,
}

impl ConfidenceContours {
    /// Create an engine, validating the configuration.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::InvalidSigmaLevels` unless 1 to 5 levels are requested
    pub fn new(config: ContourConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    /// Compute the contours of `surface` with the given tracing primitive.
    ///
    /// The surface is left untouched; the tracer sees a padded (and for
    /// chi-square surfaces hill-transformed) copy.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::InvalidInput` if the surface has no finite value
    /// * any error returned by the tracer
    pub fn compute_contours<T>(
        &self,
        surface: &SampledSurface,
        kind: HistogramType,
        tracer: &T,
    ) -> Result<ContourSet>
    where
        T: ContourTracer + ?Sized,
    {
        if !surface.min_value().is_finite() {
            return Err(ClRegionError::InvalidInput(
                "surface has no finite values".to_string(),
            ));
        }

        let prepared = match kind {
            HistogramType::Chi2 => pad(&hill_transform(surface, self.config.hill_offset)),
            HistogramType::PValue => pad(surface),
        };

        let leveler = ContourLeveler::new(
            kind,
            self.config.convention,
            self.config.n_sigma,
            self.config.hill_offset,
        );
        let traced = leveler.trace_levels(tracer, &prepared)?;

        let (x_axis, y_axis) = (surface.x_axis(), surface.y_axis());
        let join_tolerance =
            self.config.join_tolerance * x_axis.bin_width().min(y_axis.bin_width());

        let mut contours: Vec<Contour> = traced
            .levels
            .into_iter()
            .map(|level| {
                Contour::from_fragments(
                    level.sigma,
                    level.nominal_sigma,
                    level.threshold,
                    level.fragments,
                    join_tolerance,
                )
            })
            .collect();

        let bounds = Bounds {
            xmin: x_axis.min(),
            xmax: x_axis.max(),
            ymin: y_axis.min(),
            ymax: y_axis.max(),
        };
        if traced.n_empty > 0 && self.config.fill_empty_levels {
            debug!(n_empty = traced.n_empty, "adding filled plot area");
            contours.push(Contour::plot_area(&bounds));
        }

        if self.config.magnetic_boundaries {
            let range_x = self.config.magnetic_range * x_axis.bin_width();
            let range_y = self.config.magnetic_range * y_axis.bin_width();
            for contour in &mut contours {
                contour.snap_to_boundaries(&bounds, range_x, range_y);
            }
        }

        Ok(ContourSet {
            contours,
            n_empty: traced.n_empty,
        })
    }
}
