use crate::config::{ClearedSamplePolicy, DetectorConfig};
use crate::core::precision::CompensatedSum;
use crate::core::estimators::{DensityEstimator, EstimatorError, Statistics};
use crate::utils::math::gaussian_density;
use tracing::{debug, trace};

/// Gaussian model of a single scalar dimension, fitted on a retained sample.
///
/// Statistics are computed eagerly on construction and recomputed over the
/// whole retained sample on every [`expand`]; nothing is maintained
/// incrementally. The sample can be released with [`clear_sample`] while the
/// cached statistics stay usable for density queries.
///
/// [`expand`]: GaussianEstimator::expand
/// [`clear_sample`]: GaussianEstimator::clear_sample
#[derive(Debug, Clone)]
pub struct GaussianEstimator {
    sample: Option<Vec<f64>>,
    stats: Statistics,
    policy: ClearedSamplePolicy,
}

impl GaussianEstimator {
    pub fn new(sample: Vec<f64>) -> Result<Self, EstimatorError> {
        Self::with_policy(sample, ClearedSamplePolicy::default())
    }

    pub fn with_policy(
        sample: Vec<f64>,
        policy: ClearedSamplePolicy,
    ) -> Result<Self, EstimatorError> {
        ensure_finite(&sample)?;
        let stats = fit(&sample)?;
        debug!(
            count = stats.count,
            mean = stats.mean,
            variance = stats.variance,
            "fitted gaussian estimator"
        );
        Ok(Self {
            sample: Some(sample),
            stats,
            policy,
        })
    }

    pub fn from_config(sample: Vec<f64>, config: &DetectorConfig) -> Result<Self, EstimatorError> {
        Self::with_policy(sample, config.cleared_sample_policy)
    }

    /// Appends `additional` to the retained sample and refits over all of it.
    ///
    /// On a cleared estimator the outcome depends on the
    /// [`ClearedSamplePolicy`]. On error the estimator is left untouched.
    pub fn expand(&mut self, additional: &[f64]) -> Result<(), EstimatorError> {
        ensure_finite(additional)?;
        match self.sample.as_mut() {
            Some(sample) => {
                let retained = sample.len();
                sample.extend_from_slice(additional);
                match fit(sample) {
                    Ok(stats) => self.stats = stats,
                    Err(err) => {
                        sample.truncate(retained);
                        return Err(err);
                    }
                }
            }
            None => match self.policy {
                ClearedSamplePolicy::Reject => return Err(EstimatorError::SampleCleared),
                ClearedSamplePolicy::Replace => {
                    self.stats = fit(additional)?;
                    self.sample = Some(additional.to_vec());
                }
            },
        }
        debug!(
            added = additional.len(),
            count = self.stats.count,
            mean = self.stats.mean,
            variance = self.stats.variance,
            "refitted gaussian estimator"
        );
        Ok(())
    }

    /// Drops the retained sample. Cached statistics are kept.
    pub fn clear_sample(&mut self) {
        if self.sample.take().is_some() {
            debug!(count = self.stats.count, "cleared estimator sample");
        }
    }

    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.sample.is_none()
    }

    #[inline]
    pub fn sample(&self) -> Option<&[f64]> {
        self.sample.as_deref()
    }

    #[inline]
    pub fn policy(&self) -> ClearedSamplePolicy {
        self.policy
    }

    #[inline]
    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    #[inline]
    pub fn count(&self) -> f64 {
        self.stats.count
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.stats.sum
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    /// Mean absolute deviation from the mean.
    #[inline]
    pub fn deviation(&self) -> f64 {
        self.stats.deviation
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.stats.variance
    }
}

impl DensityEstimator for GaussianEstimator {
    fn evaluate(&self, x: f64) -> Option<f64> {
        let s = &self.stats;
        let density = gaussian_density(x, s.mean, s.variance, s.deviation);
        if density.is_none() {
            trace!(x, mean = s.mean, "zero variance, density pinned to 0");
        }
        density
    }
}

fn ensure_finite(values: &[f64]) -> Result<(), EstimatorError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(EstimatorError::NonFiniteValue {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

fn fit(sample: &[f64]) -> Result<Statistics, EstimatorError> {
    if sample.is_empty() {
        return Err(EstimatorError::EmptySample);
    }
    let count = sample.len() as f64;
    let (sum, mean) = estimate_mean(sample, count);
    let stats = if is_constant(sample) {
        // sum / count need not round back to the repeated value
        Statistics {
            count,
            sum,
            mean: sample[0],
            deviation: 0.0,
            variance: 0.0,
        }
    } else {
        let (deviation, variance) = estimate_dispersion(sample, mean, count);
        Statistics {
            count,
            sum,
            mean,
            deviation,
            variance,
        }
    };
    if !stats.is_finite() {
        return Err(EstimatorError::Overflow {
            sum: stats.sum,
            variance: stats.variance,
        });
    }
    Ok(stats)
}

fn is_constant(sample: &[f64]) -> bool {
    sample.iter().all(|v| *v == sample[0])
}

fn estimate_mean(sample: &[f64], count: f64) -> (f64, f64) {
    let total: CompensatedSum = sample.iter().copied().collect();
    (total.value(), total.mean_over(count))
}

/// Mean absolute deviation and variance around `mean`, in one pass.
fn estimate_dispersion(sample: &[f64], mean: f64, count: f64) -> (f64, f64) {
    let mut abs_total = CompensatedSum::new();
    let mut sq_total = CompensatedSum::new();
    for &v in sample {
        let d = (v - mean).abs();
        abs_total.add(d);
        sq_total.add(d * d);
    }
    (abs_total.mean_over(count), sq_total.mean_over(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{constant_sample, fixed_sample, random_sample, small_sample};

    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn small_sample_statistics() {
        let est = GaussianEstimator::new(small_sample()).unwrap();
        assert_eq!(est.count(), 20.0);
        assert_eq!(est.sum(), 83.0);
        assert_eq!(est.mean(), 4.15);
        assert!(approx_eq(est.deviation(), 1.32, EPS), "{}", est.deviation());
        assert!(approx_eq(est.variance(), 2.3325, EPS), "{}", est.variance());
    }

    #[test]
    fn small_sample_verdicts() {
        let est = GaussianEstimator::new(small_sample()).unwrap();

        let v = est.is_anomalous(4.3, 0.02);
        assert!(!v.anomalous, "4.3 should not be anomalous: {}", v.density);
        assert!(approx_eq(v.density, 0.300_774_813_860_695, 1e-9));

        let v = est.is_anomalous(7.3, 0.1);
        assert!(v.anomalous, "7.3 should be anomalous: {}", v.density);
        assert!(approx_eq(v.density, 0.036_023_639_036_921, 1e-9));
    }

    #[test]
    fn expanding_with_copies_keeps_the_shape() {
        let mut est = GaussianEstimator::new(small_sample()).unwrap();
        est.expand(&small_sample()).unwrap();
        est.expand(&small_sample()).unwrap();

        assert_eq!(est.count(), 60.0);
        assert_eq!(est.sum(), 249.0);
        assert!(approx_eq(est.mean(), 4.15, EPS));
        assert!(approx_eq(est.variance(), 2.3325, EPS));
        assert_eq!(est.sample().unwrap().len(), 60);

        assert!(!est.is_anomalous(5.3, 0.01).anomalous);
        assert!(est.is_anomalous(7.3, 0.1).anomalous);
    }

    #[test]
    fn expand_refits_over_the_union() {
        let mut est = GaussianEstimator::new(vec![1.0, 2.0, 3.0]).unwrap();
        est.expand(&[4.0, 5.0]).unwrap();
        assert_eq!(est.count(), 5.0);
        assert_eq!(est.sum(), 15.0);
        assert_eq!(est.mean(), 3.0);
        assert!(approx_eq(est.deviation(), 1.2, EPS));
        assert!(approx_eq(est.variance(), 2.0, EPS));
    }

    #[test]
    fn fixed_sample_statistics_and_verdict() {
        let est = GaussianEstimator::new(fixed_sample()).unwrap();
        assert_eq!(est.count(), 999.0);
        assert!(approx_eq(est.mean(), 5052.032_032_032_032, 1e-9));
        assert!(
            approx_eq(est.variance(), 1536.511_486_461_4, 1e-6),
            "{}",
            est.variance()
        );

        let v = est.is_anomalous(5050.0, 0.001);
        assert!(!v.anomalous, "5050 should not be anomalous: {}", v.density);
    }

    #[test]
    fn random_sample_expanded_with_itself() {
        let data = random_sample(100_000, 7);
        let mut est = GaussianEstimator::new(data.clone()).unwrap();
        est.expand(&data).unwrap();
        assert_eq!(est.count(), 200_000.0);

        assert!(!est.is_anomalous(4990.0, 0.001).anomalous);
        assert!(!est.is_anomalous(5110.0, 0.001).anomalous);
        assert!(est.is_anomalous(4900.0, 0.001).anomalous);
    }

    #[test]
    fn zero_variance_is_never_anomalous() {
        let est = GaussianEstimator::new(constant_sample(3.0, 5)).unwrap();
        assert_eq!(est.variance(), 0.0);
        assert_eq!(est.deviation(), 0.0);
        assert!(est.statistics().is_degenerate());

        for x in [3.0, 2.9, -1e9, 1e9] {
            let v = est.is_anomalous(x, 0.5);
            assert!(!v.anomalous);
            assert_eq!(v.density, 0.0);
            assert_eq!(est.density(x), 0.0);
        }
    }

    #[test]
    fn empty_sample_is_rejected() {
        let err = GaussianEstimator::new(Vec::new()).unwrap_err();
        assert_eq!(err, EstimatorError::EmptySample);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = GaussianEstimator::new(vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::NonFiniteValue { index: 1, value } if value.is_nan()
        ));

        let mut est = GaussianEstimator::new(vec![1.0, 2.0]).unwrap();
        let err = est.expand(&[3.0, f64::INFINITY]).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::NonFiniteValue {
                index: 1,
                value: f64::INFINITY
            }
        );
        assert_eq!(est.sample().unwrap(), &[1.0, 2.0]);
        assert_eq!(est.mean(), 1.5);
    }

    #[test]
    fn expand_with_nothing_changes_nothing() {
        let mut est = GaussianEstimator::new(small_sample()).unwrap();
        let before = est.statistics();
        est.expand(&[]).unwrap();
        assert_eq!(est.statistics(), before);
    }

    #[test]
    fn clear_keeps_statistics() {
        let mut est = GaussianEstimator::new(small_sample()).unwrap();
        let before = est.statistics();
        let density = est.density(4.3);

        est.clear_sample();
        assert!(est.is_cleared());
        assert!(est.sample().is_none());
        assert_eq!(est.statistics(), before);
        assert_eq!(est.density(4.3), density);

        est.clear_sample();
        assert!(est.is_cleared());
    }

    #[test]
    fn expand_after_clear_is_rejected_by_default() {
        let mut est = GaussianEstimator::new(small_sample()).unwrap();
        let before = est.statistics();
        est.clear_sample();

        let err = est.expand(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, EstimatorError::SampleCleared);
        assert_eq!(est.statistics(), before);
        assert!(est.is_cleared());
    }

    #[test]
    fn expand_after_clear_replaces_under_replace_policy() {
        let mut est =
            GaussianEstimator::with_policy(small_sample(), ClearedSamplePolicy::Replace).unwrap();
        est.clear_sample();

        est.expand(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(!est.is_cleared());
        assert_eq!(est.count(), 5.0);
        assert_eq!(est.mean(), 3.0);
        assert!(approx_eq(est.variance(), 2.0, EPS));
    }

    #[test]
    fn replacing_with_nothing_fails_and_stays_cleared() {
        let mut est =
            GaussianEstimator::with_policy(small_sample(), ClearedSamplePolicy::Replace).unwrap();
        let before = est.statistics();
        est.clear_sample();

        assert_eq!(est.expand(&[]).unwrap_err(), EstimatorError::EmptySample);
        assert!(est.is_cleared());
        assert_eq!(est.statistics(), before);
    }

    #[test]
    fn from_config_takes_the_policy() {
        let cfg = DetectorConfig {
            threshold: 0.02,
            cleared_sample_policy: ClearedSamplePolicy::Replace,
        };
        let est = GaussianEstimator::from_config(small_sample(), &cfg).unwrap();
        assert_eq!(est.policy(), ClearedSamplePolicy::Replace);
        assert!(!est.is_anomalous(4.3, cfg.threshold).anomalous);
    }

    #[test]
    fn config_threshold_drives_the_verdict() {
        let est = GaussianEstimator::new(small_sample()).unwrap();
        let loose = DetectorConfig {
            threshold: 0.02,
            ..DetectorConfig::default()
        };
        let strict = DetectorConfig {
            threshold: 0.1,
            ..DetectorConfig::default()
        };
        assert!(!est.is_anomalous_with(7.3, &loose).anomalous);
        assert!(est.is_anomalous_with(7.3, &strict).anomalous);
        assert_eq!(
            est.is_anomalous_with(7.3, &strict),
            est.is_anomalous(7.3, strict.threshold)
        );
    }

    #[test]
    fn repeated_inexact_values_are_degenerate() {
        for value in [0.1, 0.2, 0.3, 0.7, 1.1, 3.3, 5.1, 1e-3, 123.456] {
            for len in 2..60 {
                let est = GaussianEstimator::new(constant_sample(value, len)).unwrap();
                assert_eq!(est.mean(), value, "value={value} len={len}");
                assert_eq!(est.variance(), 0.0, "value={value} len={len}");
                assert_eq!(est.deviation(), 0.0, "value={value} len={len}");

                let v = est.is_anomalous(value + 100.0, 0.5);
                assert!(!v.anomalous, "value={value} len={len}");
                assert_eq!(v.density, 0.0);
            }
        }
    }

    #[test]
    fn expanding_into_a_constant_sample_is_degenerate() {
        let mut est = GaussianEstimator::new(vec![0.1]).unwrap();
        est.expand(&[0.1, 0.1]).unwrap();
        assert_eq!(est.mean(), 0.1);
        assert!(est.statistics().is_degenerate());
        assert!(!est.is_anomalous(5.0, 0.5).anomalous);
    }

    #[test]
    fn overflowing_statistics_are_rejected() {
        let err = GaussianEstimator::new(vec![1e308, 1e308, -1e308]).unwrap_err();
        assert!(matches!(err, EstimatorError::Overflow { .. }), "{err:?}");

        let err = GaussianEstimator::new(vec![-1e200, 1e200]).unwrap_err();
        assert!(matches!(err, EstimatorError::Overflow { .. }), "{err:?}");
    }

    #[test]
    fn overflowing_expand_leaves_the_estimator_untouched() {
        let mut est = GaussianEstimator::new(vec![1.0, 2.0]).unwrap();
        let before = est.statistics();

        let err = est.expand(&[-1e200, 1e200]).unwrap_err();
        assert!(matches!(err, EstimatorError::Overflow { .. }), "{err:?}");
        assert_eq!(est.sample().unwrap(), &[1.0, 2.0]);
        assert_eq!(est.statistics(), before);
    }

    #[test]
    fn overflowing_replace_stays_cleared() {
        let mut est =
            GaussianEstimator::with_policy(small_sample(), ClearedSamplePolicy::Replace).unwrap();
        let before = est.statistics();
        est.clear_sample();

        let err = est.expand(&[-1e200, 1e200]).unwrap_err();
        assert!(matches!(err, EstimatorError::Overflow { .. }), "{err:?}");
        assert!(est.is_cleared());
        assert_eq!(est.statistics(), before);
    }

    #[test]
    fn density_peaks_at_mean_and_decreases_outward() {
        let est = GaussianEstimator::new(small_sample()).unwrap();
        let mean = est.mean();
        let mut last = est.density(mean);
        for step in 1..20 {
            let d = est.density(mean + step as f64 * 0.5);
            assert!(d < last, "density should fall as x moves away from the mean");
            last = d;
        }
    }
}
