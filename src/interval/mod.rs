//! # Confidence Intervals
//!
//! Extraction of 1-D confidence intervals from a sampled `1 - CL` curve.
//!
//! The building blocks are usable on their own:
//!
//! - [`raw`]: bin-granularity interval finding,
//! - [`interpolate`]: straight-line and quadratic boundary refinement,
//! - [`SolutionMatcher`]: association of known optima with intervals,
//! - [`ClIntervalSet`]: the intervals of one confidence level,
//!
//! and [`ClIntervalEngine`] combines them. Formatting lives in [`report`].
//!
//! ```
//! use clregion_rs::interval::{ClIntervalEngine, IntervalConfig, Solution};
//! use clregion_rs::probability::erfc;
//! use clregion_rs::sampled::SampledCurve;
//!
//! let curve = SampledCurve::from_fn(0.0, 10.0, 100, |x| {
//!     erfc((x - 5.0).abs() / std::f64::consts::SQRT_2)
//! })
//! .unwrap();
//! let engine = ClIntervalEngine::new(IntervalConfig::with_level(0.6827)).unwrap();
//! let result = engine.compute(&curve, &[Solution::best_fit(5.0)]).unwrap();
//! let one_sigma = result.sets[0].get(0).unwrap();
//! assert!((one_sigma.min - 4.0).abs() < 1e-2);
//! assert!((one_sigma.max - 6.0).abs() < 1e-2);
//! ```

mod cl_interval;
mod config;
mod engine;
pub mod interpolate;
pub mod raw;
pub mod report;
mod set;
mod solution;

pub use cl_interval::{BoundMethod, CentralMethod, ClInterval};
pub use config::{IntervalConfig, ReportConfig};
pub use engine::{ClIntervalEngine, IntervalResult, RefinementStats};
pub use interpolate::QuadraticCrossing;
pub use report::{IntervalRecord, Rounder};
pub use set::ClIntervalSet;
pub use solution::{Solution, SolutionMatcher};
