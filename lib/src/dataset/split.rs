//! Seeded train/test splitting.
//!
//! Both functions return row indices rather than copies so the caller can
//! split several aligned arrays (records, targets, labels) the same way.

use crate::error::EstateError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn n_test_for(n: usize, test_size: f64) -> usize {
    (n as f64 * test_size).ceil() as usize
}

fn check_test_size(test_size: f64) -> Result<(), EstateError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(EstateError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    Ok(())
}

/// Shuffle `0..n` with a seeded RNG and cut off the last `ceil(n * test_size)` rows.
///
/// # Returns
///
/// `(train_indices, test_indices)`
///
/// # Errors
///
/// - [`EstateError::InvalidParameter`] if `test_size` is outside `(0, 1)`
/// - [`EstateError::EmptyData`] if fewer than two rows are available
pub fn train_test_split(
    n: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), EstateError> {
    check_test_size(test_size)?;
    if n < 2 {
        return Err(EstateError::EmptyData(format!(
            "need at least 2 rows to split, got {}",
            n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = n_test_for(n, test_size).clamp(1, n - 1);
    let test = indices.split_off(n - n_test);
    Ok((indices, test))
}

/// Split every class separately so train and test keep the class proportions.
///
/// Classes are processed in ascending label order. A class with a single row
/// goes entirely to the training side.
pub fn stratified_split(
    labels: &[usize],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), EstateError> {
    check_test_size(test_size)?;
    if labels.len() < 2 {
        return Err(EstateError::EmptyData(format!(
            "need at least 2 rows to split, got {}",
            labels.len()
        )));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for (_, mut rows) in by_class {
        rows.shuffle(&mut rng);
        let n = rows.len();
        let n_test = if n < 2 {
            0
        } else {
            n_test_for(n, test_size).clamp(1, n - 1)
        };
        test.extend(rows.split_off(n - n_test));
        train.extend(rows);
    }

    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_sizes_and_partition() {
        let (train, test) = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let all: HashSet<usize> = train.iter().chain(test.iter()).copied().collect();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_split_is_reproducible() {
        let a = train_test_split(50, 0.2, 7).unwrap();
        let b = train_test_split(50, 0.2, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rounds_test_size_up() {
        let (train, test) = train_test_split(11, 0.2, 1).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn test_split_rejects_bad_ratio() {
        assert!(train_test_split(10, 0.0, 1).is_err());
        assert!(train_test_split(10, 1.0, 1).is_err());
        assert!(train_test_split(10, f64::NAN, 1).is_err());
    }

    #[test]
    fn test_split_rejects_tiny_input() {
        assert!(matches!(
            train_test_split(1, 0.2, 1),
            Err(EstateError::EmptyData(_))
        ));
    }

    #[test]
    fn test_stratified_keeps_both_classes_in_test() {
        let labels: Vec<usize> = (0..20).map(|i| usize::from(i < 5)).collect();
        let (train, test) = stratified_split(&labels, 0.2, 42).unwrap();

        assert_eq!(train.len() + test.len(), 20);
        let test_pos = test.iter().filter(|&&i| labels[i] == 1).count();
        let test_neg = test.iter().filter(|&&i| labels[i] == 0).count();
        assert_eq!(test_pos, 1);
        assert_eq!(test_neg, 3);
    }

    #[test]
    fn test_stratified_singleton_class_goes_to_train() {
        let labels = vec![0, 0, 0, 0, 1];
        let (train, test) = stratified_split(&labels, 0.2, 3).unwrap();
        assert!(train.contains(&4));
        assert!(!test.contains(&4));
    }
}
