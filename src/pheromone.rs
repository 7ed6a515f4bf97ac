//! Pheromone trail matrix.

use crate::error::{AcoError, Result};

/// Symmetric N×N matrix of pheromone intensities, row-major.
///
/// Every write touches both `[i][j]` and `[j][i]`, so the matrix stays
/// symmetric for its whole lifetime. Values start at 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// Creates an `n × n` matrix filled with 1.0.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![1.0; n * n],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Multiplies every entry by `1 - rate`.
    ///
    /// `rate` must lie in `[0, 1)`.
    pub fn evaporate(&mut self, rate: f64) -> Result<()> {
        if !(0.0..1.0).contains(&rate) {
            return Err(AcoError::invalid_config(format!(
                "evaporation rate must be in [0, 1), got {rate}"
            )));
        }
        let keep = 1.0 - rate;
        for tau in &mut self.data {
            *tau *= keep;
        }
        Ok(())
    }

    /// Adds `deposit` to both directions of every edge of a closed path.
    ///
    /// `path` is expected to repeat its first city at the end, so the
    /// closing edge is just the last window.
    pub fn reinforce(&mut self, path: &[usize], deposit: f64) {
        for w in path.windows(2) {
            let (i, j) = (w[0], w[1]);
            self.data[i * self.n + j] += deposit;
            if i != j {
                self.data[j * self.n + i] += deposit;
            }
        }
    }

    /// Raises every entry below `floor` to `floor`.
    pub fn apply_floor(&mut self, floor: f64) {
        for tau in &mut self.data {
            if *tau < floor {
                *tau = floor;
            }
        }
    }

    /// Whether `[i][j] == [j][i]` holds for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| ((i + 1)..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initialized_to_one() {
        let p = PheromoneMatrix::new(5);
        assert_eq!(p.len(), 5);
        assert!(p.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_evaporate_scales() {
        let mut p = PheromoneMatrix::new(3);
        p.evaporate(0.25).unwrap();
        assert!(p.as_slice().iter().all(|&v| (v - 0.75).abs() < 1e-15));
        p.evaporate(0.0).unwrap();
        assert!(p.as_slice().iter().all(|&v| (v - 0.75).abs() < 1e-15));
    }

    #[test]
    fn test_evaporate_rejects_out_of_range() {
        let mut p = PheromoneMatrix::new(3);
        assert!(matches!(p.evaporate(1.0), Err(AcoError::InvalidConfig(_))));
        assert!(p.evaporate(-0.1).is_err());
        assert!(p.evaporate(f64::NAN).is_err());
        // untouched on failure
        assert!(p.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_reinforce_includes_closing_edge() {
        let mut p = PheromoneMatrix::new(4);
        p.reinforce(&[2, 0, 3, 1, 2], 0.5);

        for (i, j) in [(2, 0), (0, 3), (3, 1), (1, 2)] {
            assert_eq!(p.get(i, j), 1.5);
            assert_eq!(p.get(j, i), 1.5);
        }
        // edges not on the tour
        assert_eq!(p.get(0, 1), 1.0);
        assert_eq!(p.get(2, 3), 1.0);
        assert!(p.is_symmetric());
    }

    #[test]
    fn test_apply_floor() {
        let mut p = PheromoneMatrix::new(2);
        p.evaporate(0.99).unwrap();
        p.apply_floor(0.1);
        assert!(p.as_slice().iter().all(|&v| v == 0.1));
    }

    proptest! {
        #[test]
        fn prop_symmetry_survives_updates(
            ops in prop::collection::vec(
                (0.0f64..0.99, prop::collection::vec(0usize..6, 2..10), 0.0f64..50.0),
                1..20,
            )
        ) {
            let mut p = PheromoneMatrix::new(6);
            for (rate, path, deposit) in ops {
                p.evaporate(rate).unwrap();
                p.reinforce(&path, deposit);
                prop_assert!(p.is_symmetric());
            }
        }
    }
}
