mod compensated_sum;
mod constants;

pub use compensated_sum::CompensatedSum;
pub use constants::{SQRT_TWO_PI, TWO_PI};
