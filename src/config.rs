//! Colony configuration.
//!
//! [`AcoConfig`] holds every parameter that controls a run.

use crate::error::{AcoError, Result};

/// Configuration for an Ant System run.
///
/// # Defaults
///
/// ```
/// use u_aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.num_ants, 25);
/// assert_eq!(config.num_iterations, 100);
/// assert!((config.beta - 2.0).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(40)
///     .with_num_iterations(250)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_evaporation_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcoConfig {
    /// Ants constructing a tour in each iteration.
    pub num_ants: usize,

    /// Iterations to run. There is no early stop.
    pub num_iterations: usize,

    /// Pheromone exponent. 0 ignores the trail entirely.
    pub alpha: f64,

    /// Distance heuristic exponent. 0 ignores distances entirely.
    pub beta: f64,

    /// Fraction of every trail lost per iteration, in `[0, 1)`.
    pub evaporation_rate: f64,

    /// Deposit constant: each tour lays `q / length` on its edges.
    pub q: f64,

    /// Lower bound applied to every trail after evaporation.
    ///
    /// `None` (the default) lets trails decay without limit.
    pub min_pheromone: Option<f64>,

    /// Fixed start city. `None` draws one uniformly from the run's generator.
    pub start_city: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Build the ants of an iteration on the rayon pool.
    ///
    /// Only takes effect with the `parallel` feature. Results are identical
    /// either way for a given seed.
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 25,
            num_iterations: 100,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            q: 100.0,
            min_pheromone: None,
            start_city: None,
            seed: None,
            parallel: false,
        }
    }
}

impl AcoConfig {
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Sets a pheromone floor applied after each evaporation.
    pub fn with_min_pheromone(mut self, floor: f64) -> Self {
        self.min_pheromone = Some(floor);
        self
    }

    pub fn with_start_city(mut self, city: usize) -> Self {
        self.start_city = Some(city);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel tour construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// The start city is checked against the instance size when the
    /// optimizer is built, not here.
    pub fn validate(&self) -> Result<()> {
        if self.num_ants == 0 {
            return Err(AcoError::invalid_config("num_ants must be at least 1"));
        }
        if self.num_iterations == 0 {
            return Err(AcoError::invalid_config("num_iterations must be at least 1"));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(AcoError::invalid_config(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(AcoError::invalid_config(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(AcoError::invalid_config(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(AcoError::invalid_config(format!(
                "q must be finite and positive, got {}",
                self.q
            )));
        }
        if let Some(floor) = self.min_pheromone {
            if !floor.is_finite() || floor <= 0.0 {
                return Err(AcoError::invalid_config(format!(
                    "min_pheromone must be finite and positive, got {floor}"
                )));
            }
        }
        Ok(())
    }
}
