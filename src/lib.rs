pub mod config;
pub mod core;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{ClearedSamplePolicy, DetectorConfig};
pub use crate::core::estimators::{
    DensityEstimator, EstimatorError, EstimatorVector, GaussianEstimator, Statistics, Verdict,
};
