//! Colony iteration loop.
//!
//! [`ColonyOptimizer`] owns the distance matrix, the pheromone matrix and
//! the random generator for one run. Each iteration builds `num_ants` tours
//! against the same pheromone snapshot, tracks the best tour, then applies a
//! single evaporate-and-reinforce pass.

use crate::config::AcoConfig;
use crate::distance::{City, DistanceMatrix};
use crate::error::{AcoError, Result};
use crate::pheromone::PheromoneMatrix;
use crate::tour::{Tour, TourBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Best-length snapshot taken at the end of an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,

    /// Best tour length seen so far in the run.
    pub best_length: f64,

    /// Shortest tour built during this iteration alone.
    pub iteration_best: f64,
}

/// Result of a completed colony run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// The best tour found. Closed: starts and ends at `start_city`.
    pub best_tour: Tour,

    /// Length of `best_tour`.
    pub best_length: f64,

    /// City every tour of the run started from.
    pub start_city: usize,

    /// Number of iterations executed.
    pub iterations: usize,

    /// One record per iteration; `best_length` is non-increasing.
    pub trace: Vec<IterationRecord>,
}

#[derive(Debug, Default)]
struct RunState {
    best: Option<Tour>,
    trace: Vec<IterationRecord>,
}

impl RunState {
    fn best_length(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, Tour::length)
    }
}

/// Stateful Ant System run over one instance.
///
/// Created in an initialized state; every [`step`](Self::step) runs one
/// full iteration until `num_iterations` have completed.
///
/// ```
/// use u_aco::{AcoConfig, City, ColonyOptimizer};
///
/// let cities = [
///     City::new(0.0, 0.0),
///     City::new(0.0, 10.0),
///     City::new(10.0, 10.0),
///     City::new(10.0, 0.0),
/// ];
/// let config = AcoConfig::default()
///     .with_num_ants(5)
///     .with_num_iterations(20)
///     .with_seed(42);
///
/// let result = ColonyOptimizer::new(&cities, config)?.run()?;
/// assert_eq!(result.best_length, 16.0);
/// assert_eq!(result.trace.len(), 20);
/// # Ok::<(), u_aco::AcoError>(())
/// ```
#[derive(Debug)]
pub struct ColonyOptimizer {
    config: AcoConfig,
    distances: DistanceMatrix,
    pheromones: PheromoneMatrix,
    rng: StdRng,
    start_city: usize,
    state: RunState,
}

impl ColonyOptimizer {
    /// Validates `config`, builds the ATT distance matrix for `cities`, and
    /// fixes the start city.
    pub fn new(cities: &[City], config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let distances = DistanceMatrix::from_cities(cities)?;
        Self::from_distances(distances, config)
    }

    /// Same as [`new`](Self::new) for a precomputed distance matrix.
    pub fn from_distances(distances: DistanceMatrix, config: AcoConfig) -> Result<Self> {
        config.validate()?;

        let n = distances.len();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let start_city = match config.start_city {
            Some(city) if city >= n => {
                return Err(AcoError::invalid_config(format!(
                    "start_city {city} out of range for {n} cities"
                )));
            }
            Some(city) => city,
            None => rng.random_range(0..n),
        };

        Ok(Self {
            config,
            pheromones: PheromoneMatrix::new(n),
            distances,
            rng,
            start_city,
            state: RunState::default(),
        })
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn start_city(&self) -> usize {
        self.start_city
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    /// Best tour so far, if any iteration has run.
    pub fn best(&self) -> Option<&Tour> {
        self.state.best.as_ref()
    }

    pub fn trace(&self) -> &[IterationRecord] {
        &self.state.trace
    }

    pub fn iterations_completed(&self) -> usize {
        self.state.trace.len()
    }

    pub fn is_done(&self) -> bool {
        self.iterations_completed() >= self.config.num_iterations
    }

    /// Runs one iteration.
    ///
    /// Returns `Ok(None)` once all configured iterations have completed.
    /// An error leaves the pheromone matrix and best tour untouched.
    pub fn step(&mut self) -> Result<Option<IterationRecord>> {
        if self.is_done() {
            return Ok(None);
        }

        // One stream per ant, drawn in ant order, so construction order
        // never affects the outcome.
        let seeds: Vec<u64> = (0..self.config.num_ants)
            .map(|_| self.rng.random())
            .collect();

        let builder = TourBuilder::new(
            &self.distances,
            &self.pheromones,
            self.start_city,
            self.config.alpha,
            self.config.beta,
        );
        let tours = build_tours(&builder, &seeds, self.config.parallel)?;

        for tour in &tours {
            if !tour.length().is_finite() {
                return Err(AcoError::NonFiniteTourLength);
            }
            if tour.length() <= 0.0 {
                return Err(AcoError::ZeroLengthTour);
            }
        }

        let iteration = self.state.trace.len() + 1;
        let mut iteration_best = f64::INFINITY;
        for tour in &tours {
            iteration_best = iteration_best.min(tour.length());
            // Strict improvement only: on ties the earlier ant keeps the spot.
            if tour.length() < self.state.best_length() {
                log::trace!(
                    "aco.step: new best iteration={iteration} len={:.0}",
                    tour.length()
                );
                self.state.best = Some(tour.clone());
            }
        }

        self.update_pheromones(&tours)?;

        let record = IterationRecord {
            iteration,
            best_length: self.state.best_length(),
            iteration_best,
        };
        self.state.trace.push(record);

        log::debug!(
            "aco.step: iteration={iteration} best={:.0} iteration_best={iteration_best:.0}",
            record.best_length
        );

        Ok(Some(record))
    }

    /// Runs the remaining iterations and returns the result.
    pub fn run(mut self) -> Result<AcoResult> {
        log::info!(
            "aco.run: start n={} ants={} iterations={} alpha={} beta={} rho={} q={} start={}",
            self.distances.len(),
            self.config.num_ants,
            self.config.num_iterations,
            self.config.alpha,
            self.config.beta,
            self.config.evaporation_rate,
            self.config.q,
            self.start_city
        );

        while self.step()?.is_some() {}

        let best_tour = self.state.best.ok_or(AcoError::EmptyRun)?;
        let best_length = best_tour.length();

        log::info!(
            "aco.run: done best={best_length:.0} iterations={}",
            self.state.trace.len()
        );

        Ok(AcoResult {
            best_tour,
            best_length,
            start_city: self.start_city,
            iterations: self.state.trace.len(),
            trace: self.state.trace,
        })
    }

    /// Evaporates once, floors if configured, then lays `q / length` along
    /// every tour of the iteration.
    fn update_pheromones(&mut self, tours: &[Tour]) -> Result<()> {
        self.pheromones.evaporate(self.config.evaporation_rate)?;
        if let Some(floor) = self.config.min_pheromone {
            self.pheromones.apply_floor(floor);
        }
        for tour in tours {
            self.pheromones
                .reinforce(tour.cities(), self.config.q / tour.length());
        }
        Ok(())
    }
}

/// Executes a full colony run in one call.
///
/// # Usage
///
/// ```ignore
/// let cities = u_aco::tsplib::read_node_coords("att48.tsp")?;
/// let config = AcoConfig::default().with_seed(42);
/// let result = AcoRunner::run(&cities, &config)?;
/// println!("Best length: {}", result.best_length);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    pub fn run(cities: &[City], config: &AcoConfig) -> Result<AcoResult> {
        ColonyOptimizer::new(cities, config.clone())?.run()
    }
}

/// Builds one tour per seed, in seed order.
fn build_tours(builder: &TourBuilder<'_>, seeds: &[u64], parallel: bool) -> Result<Vec<Tour>> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return seeds
                .par_iter()
                .map(|&seed| builder.build(&mut StdRng::seed_from_u64(seed)))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    seeds
        .iter()
        .map(|&seed| builder.build(&mut StdRng::seed_from_u64(seed)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
