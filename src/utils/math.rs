use crate::core::precision::SQRT_TWO_PI;

/// Gaussian density at `x`:
///
/// ```text
/// exp(-(x - mean)^2 / (2 * variance)) / (sqrt(2π) * deviation)
/// ```
///
/// The exponent uses the variance while the normalizer uses the mean
/// absolute deviation. Returns `None` when the variance is zero, i.e. the
/// sample was constant and the exponent is undefined.
pub fn gaussian_density(x: f64, mean: f64, variance: f64, deviation: f64) -> Option<f64> {
    if variance == 0.0 {
        return None;
    }
    let diff = x - mean;
    let exponent = (diff * diff) / (2.0 * variance);
    Some(libm::exp(-exponent) / (SQRT_TWO_PI * deviation))
}
