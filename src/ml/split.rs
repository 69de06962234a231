//! Seeded train/test splitting of the feature rows.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// The seed used by the command-line pipeline so reruns produce the same
/// split.
pub const DEFAULT_SEED: u64 = 42;

/// Randomly shuffles `rows` and splits them into (train, test).
///
/// `test_fraction` is the proportion held out for evaluation, e.g. 0.2 keeps
/// 80% for training. The same seed always yields the same split.
pub fn train_test_split<T>(mut rows: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    assert!(
        (0.0..=1.0).contains(&test_fraction),
        "test fraction must be in [0, 1]"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    let total = rows.len();
    let train_len = ((total as f64) * (1.0 - test_fraction)).round() as usize;
    let train_len = train_len.min(total);

    let test = rows.split_off(train_len);
    (rows, test)
}
