// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits them into:
//   - Training set: used to fit the scaler and the forest
//   - Test set:     held out, scored once after training
//
// The RNG is ChaCha8 seeded from the training config, so the
// same seed and the same input order always give the same two
// partitions, on every platform.
//
// Test size is ceil(n * test_fraction), matching the usual
// "test_size=0.2" convention: 768 rows → 614 train / 154 test.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Shuffle `samples` deterministically and split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out, e.g. 0.2 = 20%
/// * `seed`          - RNG seed; equal seeds give equal splits
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let fraction  = test_fraction.clamp(0.0, 1.0);
    let test_size = ((total as f64) * fraction).ceil() as usize;
    let split_at  = total - test_size.min(total);

    // After this: samples = [0..split_at], test = [split_at..total]
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        samples.len(),
        test.len(),
        seed,
    );

    (samples, test)
}
