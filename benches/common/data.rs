use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// `n` uniform values in `[lo, hi)` from a seeded generator.
pub fn uniform_column(n: usize, seed: u64, lo: f64, hi: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

/// `n` positive weights from a seeded generator.
pub fn weights(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0.5..2.0)).collect()
}
