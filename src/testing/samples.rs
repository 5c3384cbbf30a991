use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Twenty values rising to a plateau around 5.3 and falling back.
///
/// count 20, sum 83, mean 4.15, deviation 1.32, variance 2.3325.
pub fn small_sample() -> Vec<f64> {
    vec![
        1.0, 2.0, 3.0, 4.0, 5.0, 5.1, 5.2, 5.3, 5.4, 5.5, 5.5, 5.4, 5.3, 5.2, 5.1, 5.0, 4.0, 3.0,
        2.0, 1.0,
    ]
}

/// 999 values on a 5000 baseline: +20 for indices 201..=799, +100 elsewhere.
pub fn fixed_sample() -> Vec<f64> {
    (0..999)
        .map(|i| if i > 200 && i < 800 { 5020.0 } else { 5100.0 })
        .collect()
}

/// `len` values on a 5000 baseline with a uniform integer offset:
/// `[0, 20)` for indices 201..=799, `[0, 100)` elsewhere.
pub fn random_sample(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let max = if i > 200 && i < 800 { 20 } else { 100 };
            5000.0 + rng.random_range(0..max) as f64
        })
        .collect()
}

/// `len` copies of `value`.
pub fn constant_sample(value: f64, len: usize) -> Vec<f64> {
    vec![value; len]
}
