use thiserror::Error;

/// Error types for the clregion-rs library.
///
/// Only precondition violations are reported through this type. Recoverable
/// anomalies (failed boundary refinements, unmatched solutions, empty sigma
/// levels) are logged and absorbed by the engines.
#[derive(Error, Debug)]
pub enum ClRegionError {
    /// A curve, surface or polyline without any samples.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Bin centers that are not equally spaced or not strictly increasing.
    #[error("Non-uniform binning: {0}")]
    NonUniformBinning(String),

    /// A confidence level outside the open interval (0, 1).
    #[error("Invalid confidence level {0}: must lie strictly between 0 and 1")]
    InvalidConfidenceLevel(f64),

    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Number of requested sigma contours outside the supported range.
    #[error("Invalid number of sigma levels {requested}: supported range is 1..={max}")]
    InvalidSigmaLevels { requested: usize, max: usize },

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error raised by the external contour tracing primitive.
    #[error("Contour tracing failed: {0}")]
    ContourTracing(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for clregion-rs operations.
pub type Result<T> = std::result::Result<T, ClRegionError>;
