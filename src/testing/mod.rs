pub mod samples;

pub use samples::{constant_sample, fixed_sample, random_sample, small_sample};
