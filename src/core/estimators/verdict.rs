use serde::Serialize;

/// Outcome of an anomaly query: the decision and the density it was based on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub anomalous: bool,
    pub density: f64,
}

impl Verdict {
    /// Flags `density` as anomalous when it falls strictly below `threshold`.
    #[inline]
    pub fn against(density: f64, threshold: f64) -> Self {
        Self {
            anomalous: density < threshold,
            density,
        }
    }

    /// Result for a zero-variance model: density 0, never anomalous.
    #[inline]
    pub fn degenerate() -> Self {
        Self {
            anomalous: false,
            density: 0.0,
        }
    }
}

impl From<Verdict> for (bool, f64) {
    fn from(v: Verdict) -> Self {
        (v.anomalous, v.density)
    }
}
