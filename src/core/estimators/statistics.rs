use serde::{Deserialize, Serialize};

/// Cached summary of one dimension's sample, as of the last fit.
///
/// `deviation` is the mean absolute deviation, not the standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: f64,
    pub sum: f64,
    pub mean: f64,
    pub deviation: f64,
    pub variance: f64,
}

impl Statistics {
    /// True when every sample was identical and no density can be formed.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.variance == 0.0
    }

    /// True when no field overflowed during accumulation.
    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.count, self.sum, self.mean, self.deviation, self.variance]
            .iter()
            .all(|v| v.is_finite())
    }
}
