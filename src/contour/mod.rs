//! # Confidence Contours
//!
//! Extraction of 2-D confidence regions from a sampled chi-square or p-value
//! surface. The actual contour tracing (e.g. marching squares) is delegated to
//! a [`ContourTracer`]; this module prepares the surface for it, chooses the
//! thresholds and post-processes the traced polylines into [`Contour`]s.

mod confidence;
mod config;
pub mod geometry;
pub mod leveler;
pub mod preprocess;

pub use confidence::{ConfidenceContours, Contour, ContourSet};
pub use config::ContourConfig;
pub use geometry::{Bounds, Point, Polyline};
pub use leveler::{ChiSquareConvention, ContourLeveler, ContourTracer, HistogramType, MAX_SIGMA_LEVELS};
