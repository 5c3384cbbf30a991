use std::f64::consts::PI;

/// `2π`.
pub const TWO_PI: f64 = 2.0 * PI;

/// `√(2π)`, the normalizer of the Gaussian density.
pub const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_2;
