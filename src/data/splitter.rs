// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits them into two sets:
//   - Training set: used to update model weights
//   - Test set:     held out for the AUC measurement
//
// Why a fixed seed?
//   All three variants must be compared on exactly the same rows,
//   and re-running the experiment must reproduce the same split.
//   StdRng::seed_from_u64 gives the same permutation every time.
//
// Test size is rounded UP (20 rows at 0.2 → 4 test rows), the
// remainder goes to training.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` deterministically and split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out for testing, e.g. 0.2
/// * `seed`          - RNG seed, e.g. 42
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total   = samples.len();
    let n_test  = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_test  = n_test.min(total);

    // split_off(n) leaves [0..n) in place and returns [n..total)
    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Dataset split (seed {}): {} training, {} test",
        seed,
        samples.len(),
        test.len(),
    );

    (samples, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, test)     = split_train_test(items, 0.2, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(),  20);
    }

    #[test]
    fn test_test_size_rounds_up() {
        let items: Vec<usize> = (0..21).collect();
        let (train, test)     = split_train_test(items, 0.2, 42);
        assert_eq!(test.len(),  5);
        assert_eq!(train.len(), 16);
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_test((0..50).collect::<Vec<usize>>(), 0.2, 7);
        let b = split_train_test((0..50).collect::<Vec<usize>>(), 0.2, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_items_preserved() {
        let (mut train, test) = split_train_test((0..50).collect::<Vec<usize>>(), 0.3, 1);
        train.extend(test);
        train.sort_unstable();
        assert_eq!(train, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, test)     = split_train_test(items, 0.2, 42);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }
}
