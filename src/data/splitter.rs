// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Holds a fixed number of training images out for validation,
// the same way the standard MNIST tooling reserves 5,000 of the
// 60,000 training images.
//
// The shuffle is seeded so a run can be reproduced exactly:
// the same seed always yields the same validation images.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split off `validation_size`
/// of them.
///
/// # Returns
/// A tuple (train_samples, val_samples). If `validation_size`
/// exceeds the number of samples, everything goes to validation.
pub fn split_validation<T>(
    mut samples:     Vec<T>,
    validation_size: usize,
    seed:            u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = total.saturating_sub(validation_size);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_validation(items, 20, 1);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize>    = (0..50).collect();
        let (train, val)         = split_validation(items, 15, 7);
        let mut all: Vec<usize>  = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_validation((0..40).collect::<Vec<usize>>(), 10, 42);
        let b = split_validation((0..40).collect::<Vec<usize>>(), 10, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = split_validation(Vec::<usize>::new(), 5, 0);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_validation_larger_than_dataset() {
        let (train, val) = split_validation((0..3).collect::<Vec<usize>>(), 10, 0);
        assert!(train.is_empty());
        assert_eq!(val.len(), 3);
    }

    #[test]
    fn test_zero_validation() {
        let (train, val) = split_validation((0..10).collect::<Vec<usize>>(), 0, 0);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
