use crate::config::{ClearedSamplePolicy, DetectorConfig};
use crate::core::estimators::{
    DensityEstimator, EstimatorError, GaussianEstimator, Statistics, Verdict,
};
use rayon::prelude::*;
use tracing::debug;

/// Independent per-dimension Gaussian estimators combined into one joint model.
///
/// Dimensions are assumed independent, so the joint density is the product
/// of the marginal densities. Construction and queries fan out one task per
/// dimension; results land in slots indexed by dimension, so the order of
/// [`iter`] and [`densities`] always matches the input order.
///
/// [`iter`]: EstimatorVector::iter
/// [`densities`]: EstimatorVector::densities
#[derive(Debug, Clone)]
pub struct EstimatorVector {
    estimators: Vec<GaussianEstimator>,
}

impl EstimatorVector {
    pub fn new(samples: Vec<Vec<f64>>) -> Result<Self, EstimatorError> {
        Self::with_policy(samples, ClearedSamplePolicy::default())
    }

    pub fn with_policy(
        samples: Vec<Vec<f64>>,
        policy: ClearedSamplePolicy,
    ) -> Result<Self, EstimatorError> {
        if samples.is_empty() {
            return Err(EstimatorError::NoDimensions);
        }

        let estimators = samples
            .into_par_iter()
            .enumerate()
            .map(|(index, sample)| {
                GaussianEstimator::with_policy(sample, policy).map_err(|source| {
                    EstimatorError::Dimension {
                        index,
                        source: Box::new(source),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(dimensions = estimators.len(), "built estimator vector");
        Ok(Self { estimators })
    }

    pub fn from_config(
        samples: Vec<Vec<f64>>,
        config: &DetectorConfig,
    ) -> Result<Self, EstimatorError> {
        Self::with_policy(samples, config.cleared_sample_policy)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }

    #[inline]
    pub fn get(&self, dimension: usize) -> Option<&GaussianEstimator> {
        self.estimators.get(dimension)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GaussianEstimator> {
        self.estimators.iter()
    }

    pub fn statistics(&self) -> Vec<Statistics> {
        self.estimators.iter().map(|e| e.statistics()).collect()
    }

    /// Releases every dimension's retained sample.
    pub fn clear_samples(&mut self) {
        self.estimators.iter_mut().for_each(|e| e.clear_sample());
        debug!(dimensions = self.estimators.len(), "cleared estimator vector samples");
    }

    /// Density of `x` under each dimension, in dimension order.
    pub fn densities(&self, x: f64) -> Vec<f64> {
        self.evaluate_each(|_| x)
            .into_iter()
            .map(|d| d.unwrap_or(0.0))
            .collect()
    }

    /// Density of `point[i]` under dimension `i`, in dimension order.
    pub fn densities_at(&self, point: &[f64]) -> Result<Vec<f64>, EstimatorError> {
        self.ensure_dimensions(point)?;
        Ok(self
            .evaluate_each(|i| point[i])
            .into_iter()
            .map(|d| d.unwrap_or(0.0))
            .collect())
    }

    /// Product of the marginal densities of `x`.
    #[inline]
    pub fn joint_density(&self, x: f64) -> f64 {
        self.density(x)
    }

    /// Joint verdict for the same `x` applied to every dimension.
    #[inline]
    pub fn joint_is_anomalous(&self, x: f64, threshold: f64) -> Verdict {
        self.is_anomalous(x, threshold)
    }

    /// Joint verdict for the same `x`, judged against `config.threshold`.
    #[inline]
    pub fn joint_is_anomalous_with(&self, x: f64, config: &DetectorConfig) -> Verdict {
        self.is_anomalous_with(x, config)
    }

    /// Joint verdict for a point with one coordinate per dimension.
    pub fn joint_is_anomalous_at(
        &self,
        point: &[f64],
        threshold: f64,
    ) -> Result<Verdict, EstimatorError> {
        self.ensure_dimensions(point)?;
        Ok(match joint(&self.evaluate_each(|i| point[i])) {
            Some(density) => Verdict::against(density, threshold),
            None => Verdict::degenerate(),
        })
    }

    fn ensure_dimensions(&self, point: &[f64]) -> Result<(), EstimatorError> {
        if point.len() != self.estimators.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: self.estimators.len(),
                got: point.len(),
            });
        }
        Ok(())
    }

    /// Evaluates every dimension in parallel, writing each result into the
    /// slot of its dimension.
    fn evaluate_each<F>(&self, query: F) -> Vec<Option<f64>>
    where
        F: Fn(usize) -> f64 + Sync,
    {
        let mut slots = vec![None; self.estimators.len()];
        slots
            .par_iter_mut()
            .zip(self.estimators.par_iter())
            .enumerate()
            .for_each(|(i, (slot, est))| *slot = est.evaluate(query(i)));
        slots
    }
}

/// Product of the marginals; `None` as soon as one dimension is degenerate.
fn joint(marginals: &[Option<f64>]) -> Option<f64> {
    marginals
        .iter()
        .try_fold(1.0, |acc, d| d.map(|density| acc * density))
}

impl DensityEstimator for EstimatorVector {
    fn evaluate(&self, x: f64) -> Option<f64> {
        joint(&self.evaluate_each(|_| x))
    }
}

impl<'a> IntoIterator for &'a EstimatorVector {
    type Item = &'a GaussianEstimator;
    type IntoIter = std::slice::Iter<'a, GaussianEstimator>;

    fn into_iter(self) -> Self::IntoIter {
        self.estimators.iter()
    }
}
