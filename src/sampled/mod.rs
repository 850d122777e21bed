//! Sampled curves and surfaces on uniform grids.
//!
//! These are the inputs of both engines: a 1-D `1 - CL` curve for the interval
//! engine and a 2-D chi-square or p-value surface for the contour engine.

mod axis;
mod curve;
mod surface;

pub use axis::UniformAxis;
pub use curve::SampledCurve;
pub use surface::SampledSurface;
