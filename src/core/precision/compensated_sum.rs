/// Neumaier compensated accumulator.
///
/// Keeps a running compensation term next to the sum so that low-order
/// bits lost in each addition are recovered at the end. The error bound is
/// independent of the number of terms, which keeps `sum`, `mean` and the
/// dispersion statistics stable over large samples.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
    terms: usize,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.compensation += (self.sum - t) + v;
        } else {
            self.compensation += (v - t) + self.sum;
        }
        self.sum = t;
        self.terms += 1;
    }

    /// Number of terms added so far.
    #[inline]
    pub fn terms(&self) -> usize {
        self.terms
    }

    /// Compensated total.
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Compensated total divided by `count`; `NaN` when `count` is zero.
    #[inline]
    pub fn mean_over(&self, count: f64) -> f64 {
        if count > 0.0 {
            self.value() / count
        } else {
            f64::NAN
        }
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}
