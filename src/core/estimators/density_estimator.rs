use crate::config::DetectorConfig;
use crate::core::estimators::Verdict;

/// A fitted model that can score how probable a scalar observation is.
///
/// Implementations provide [`evaluate`], which returns `None` when the model
/// is degenerate (zero variance). The provided methods turn that into the
/// public contract: density 0 and never anomalous.
///
/// [`evaluate`]: DensityEstimator::evaluate
pub trait DensityEstimator {
    /// Density at `x`, or `None` for a degenerate model.
    fn evaluate(&self, x: f64) -> Option<f64>;

    /// Density at `x`; `0.0` for a degenerate model.
    #[inline]
    fn density(&self, x: f64) -> f64 {
        self.evaluate(x).unwrap_or(0.0)
    }

    /// Flags `x` as anomalous when its density is strictly below `threshold`.
    fn is_anomalous(&self, x: f64, threshold: f64) -> Verdict {
        match self.evaluate(x) {
            Some(density) => Verdict::against(density, threshold),
            None => Verdict::degenerate(),
        }
    }

    /// [`is_anomalous`] against the threshold carried by `config`.
    ///
    /// [`is_anomalous`]: DensityEstimator::is_anomalous
    #[inline]
    fn is_anomalous_with(&self, x: f64, config: &DetectorConfig) -> Verdict {
        self.is_anomalous(x, config.threshold)
    }
}
