//! # clregion-rs
//!
//! `clregion-rs` turns sampled statistical test curves into confidence
//! regions:
//!
//! - 1-D confidence intervals from a sampled `1 - CL` curve, with boundary
//!   interpolation below bin granularity and association with known optima
//!   ([`interval`]),
//! - 2-D confidence contours from a sampled chi-square or p-value surface,
//!   with fragment joining and hole punching ([`contour`]).
//!
//! Fitting, likelihood modelling and plotting are left to the caller: the
//! engines receive already computed curves and surfaces and return plain data.
//!
//! ## Basic Usage
//!
//! ```
//! use clregion_rs::interval::{report, ClIntervalEngine, IntervalConfig, ReportConfig, Solution};
//! use clregion_rs::sampled::SampledCurve;
//!
//! // 1 - CL of a Gaussian measurement 5.0 +- 1.0
//! let curve = SampledCurve::from_fn(0.0, 10.0, 100, |x| {
//!     clregion_rs::probability::sigma_to_pvalue((x - 5.0).abs())
//! })?;
//!
//! let engine = ClIntervalEngine::new(IntervalConfig::default())?;
//! let result = engine.compute(&curve, &[Solution::best_fit(5.0)])?;
//! print!("{}", report::text_report(&result.sets, &ReportConfig::new("mu")));
//! # Ok::<(), clregion_rs::ClRegionError>(())
//! ```

pub mod contour;
pub mod error;
pub mod interval;
pub mod probability;
pub mod sampled;

// Re-exports for convenience
pub use contour::{ConfidenceContours, Contour, ContourConfig, ContourTracer, HistogramType};
pub use error::{ClRegionError, Result};
pub use interval::{ClInterval, ClIntervalEngine, ClIntervalSet, IntervalConfig, Solution};
pub use sampled::{SampledCurve, SampledSurface, UniformAxis};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
