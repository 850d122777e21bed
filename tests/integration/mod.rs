//! Integration tests for the clregion-rs library
//!
//! This module organizes all integration tests that test the library as a whole,
//! rather than individual components.


// Randomized property checks with seeded generators
pub mod properties;
