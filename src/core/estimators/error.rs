use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("cannot fit an estimator on an empty sample")]
    EmptySample,

    #[error("sample value at index {index} is not finite: {value}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("sample statistics overflowed f64 (sum {sum}, variance {variance})")]
    Overflow { sum: f64, variance: f64 },

    #[error("sample was cleared; expanding it would drop the statistics it was fitted on")]
    SampleCleared,

    #[error("an estimator vector needs at least one dimension")]
    NoDimensions,

    #[error("dimension {index}: {source}")]
    Dimension {
        index: usize,
        #[source]
        source: Box<EstimatorError>,
    },

    #[error("expected {expected} values, one per dimension, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
