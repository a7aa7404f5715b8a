//! Split criteria for tree growing.
//!
//! A criterion keeps running sufficient statistics so a split sweep over
//! sorted samples costs O(1) per candidate threshold.

/// Impurity measure and leaf value for one kind of target.
pub(crate) trait Criterion {
    type Stats: Clone;
    type Leaf;

    /// Statistics over `indices`.
    fn stats(&self, indices: &[usize]) -> Self::Stats;

    /// Statistics of an empty node.
    fn empty(&self) -> Self::Stats;

    /// Move `sample` from the right-hand statistics to the left-hand ones.
    fn shift(&self, left: &mut Self::Stats, right: &mut Self::Stats, sample: usize);

    /// Node impurity weighted by its sample count.
    fn impurity(&self, stats: &Self::Stats) -> f64;

    /// True when no split could reduce impurity.
    fn is_pure(&self, indices: &[usize]) -> bool;

    fn leaf(&self, stats: &Self::Stats) -> Self::Leaf;
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Moments {
    n: f64,
    sum: f64,
    sum_sq: f64,
}

/// Squared error for regression. Leaves hold the mean target.
pub(crate) struct SquaredError<'a> {
    y: &'a [f64],
}

impl<'a> SquaredError<'a> {
    pub(crate) fn new(y: &'a [f64]) -> Self {
        Self { y }
    }
}

impl Criterion for SquaredError<'_> {
    type Stats = Moments;
    type Leaf = f64;

    fn stats(&self, indices: &[usize]) -> Moments {
        let mut m = Moments::default();
        for &i in indices {
            let v = self.y[i];
            m.n += 1.0;
            m.sum += v;
            m.sum_sq += v * v;
        }
        m
    }

    fn empty(&self) -> Moments {
        Moments::default()
    }

    fn shift(&self, left: &mut Moments, right: &mut Moments, sample: usize) {
        let v = self.y[sample];
        left.n += 1.0;
        left.sum += v;
        left.sum_sq += v * v;
        right.n -= 1.0;
        right.sum -= v;
        right.sum_sq -= v * v;
    }

    fn impurity(&self, m: &Moments) -> f64 {
        if m.n <= 0.0 {
            return 0.0;
        }
        (m.sum_sq - m.sum * m.sum / m.n).max(0.0)
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        match indices.first() {
            Some(&first) => indices.iter().all(|&i| self.y[i] == self.y[first]),
            None => true,
        }
    }

    fn leaf(&self, m: &Moments) -> f64 {
        if m.n > 0.0 {
            m.sum / m.n
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ClassCounts {
    n: f64,
    counts: Vec<f64>,
}

/// Gini impurity for classification. Leaves hold class probabilities.
pub(crate) struct Gini<'a> {
    y: &'a [usize],
    n_classes: usize,
}

impl<'a> Gini<'a> {
    pub(crate) fn new(y: &'a [usize], n_classes: usize) -> Self {
        Self { y, n_classes }
    }
}

impl Criterion for Gini<'_> {
    type Stats = ClassCounts;
    type Leaf = Vec<f64>;

    fn stats(&self, indices: &[usize]) -> ClassCounts {
        let mut c = self.empty();
        for &i in indices {
            c.n += 1.0;
            c.counts[self.y[i]] += 1.0;
        }
        c
    }

    fn empty(&self) -> ClassCounts {
        ClassCounts {
            n: 0.0,
            counts: vec![0.0; self.n_classes],
        }
    }

    fn shift(&self, left: &mut ClassCounts, right: &mut ClassCounts, sample: usize) {
        let class = self.y[sample];
        left.n += 1.0;
        left.counts[class] += 1.0;
        right.n -= 1.0;
        right.counts[class] -= 1.0;
    }

    fn impurity(&self, c: &ClassCounts) -> f64 {
        if c.n <= 0.0 {
            return 0.0;
        }
        let sum_sq: f64 = c.counts.iter().map(|k| k * k).sum();
        c.n - sum_sq / c.n
    }

    fn is_pure(&self, indices: &[usize]) -> bool {
        match indices.first() {
            Some(&first) => indices.iter().all(|&i| self.y[i] == self.y[first]),
            None => true,
        }
    }

    fn leaf(&self, c: &ClassCounts) -> Vec<f64> {
        if c.n > 0.0 {
            c.counts.iter().map(|k| k / c.n).collect()
        } else {
            vec![0.0; self.n_classes]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_error_matches_definition() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let crit = SquaredError::new(&y);
        let stats = crit.stats(&[0, 1, 2, 3]);
        // mean 2.5, SSE = 2.25 + 0.25 + 0.25 + 2.25
        assert!((crit.impurity(&stats) - 5.0).abs() < 1e-12);
        assert!((crit.leaf(&stats) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_squared_error_shift() {
        let y = [1.0, 2.0, 10.0];
        let crit = SquaredError::new(&y);
        let mut left = crit.empty();
        let mut right = crit.stats(&[0, 1, 2]);
        crit.shift(&mut left, &mut right, 0);
        crit.shift(&mut left, &mut right, 1);
        assert!((crit.leaf(&left) - 1.5).abs() < 1e-12);
        assert!((crit.leaf(&right) - 10.0).abs() < 1e-12);
        assert!(crit.impurity(&right).abs() < 1e-9);
    }

    #[test]
    fn test_gini_pure_and_mixed() {
        let y = [0, 0, 1, 1];
        let crit = Gini::new(&y, 2);
        let pure = crit.stats(&[0, 1]);
        assert_eq!(crit.impurity(&pure), 0.0);
        let mixed = crit.stats(&[0, 1, 2, 3]);
        // n * (1 - 0.5^2 - 0.5^2) = 4 * 0.5
        assert!((crit.impurity(&mixed) - 2.0).abs() < 1e-12);
        assert_eq!(crit.leaf(&mixed), vec![0.5, 0.5]);
    }

    #[test]
    fn test_is_pure() {
        let y = [3.0, 3.0, 4.0];
        let crit = SquaredError::new(&y);
        assert!(crit.is_pure(&[0, 1]));
        assert!(!crit.is_pure(&[0, 2]));
    }
}
