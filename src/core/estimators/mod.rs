mod density_estimator;
mod error;
mod estimator_vector;
mod gaussian_estimator;
mod statistics;
mod verdict;

pub use density_estimator::DensityEstimator;
pub use error::EstimatorError;
pub use estimator_vector::EstimatorVector;
pub use gaussian_estimator::GaussianEstimator;
pub use statistics::Statistics;
pub use verdict::Verdict;
