//! Ant Colony Optimization for the symmetric Traveling Salesman Problem.
//!
//! A colony of ants repeatedly builds closed tours over a set of 2-D cities.
//! Each ant picks its next city with probability weighted by the pheromone
//! trail and the inverse distance; after every iteration trails evaporate and
//! each tour deposits pheromone in inverse proportion to its length.
//!
//! - [`DistanceMatrix`]: pairwise TSPLIB `ATT` distances, built once per run
//! - [`PheromoneMatrix`]: symmetric trail intensities with evaporation and
//!   reinforcement
//! - [`TourBuilder`]: probabilistic construction of one tour from a fixed
//!   start city against a read-only pheromone snapshot
//! - [`ColonyOptimizer`]: the iteration loop, best-tour tracking and trace
//! - [`tsplib`]: loading city coordinates from TSPLIB files
//!
//! # Example
//!
//! ```
//! use u_aco::{AcoConfig, AcoRunner, City};
//!
//! let cities: Vec<City> = (0..8)
//!     .map(|i| {
//!         let t = i as f64 * std::f64::consts::TAU / 8.0;
//!         City::new(100.0 * t.cos(), 100.0 * t.sin())
//!     })
//!     .collect();
//!
//! let config = AcoConfig::default().with_num_iterations(50).with_seed(42);
//! let result = AcoRunner::run(&cities, &config)?;
//!
//! assert_eq!(result.best_tour.cities().len(), 9);
//! assert_eq!(result.trace.len(), 50);
//! # Ok::<(), u_aco::AcoError>(())
//! ```
//!
//! # Features
//!
//! - `parallel`: build the ants of an iteration on the rayon pool
//! - `serde`: `Serialize`/`Deserialize` for configs, cities and results
//! - `wasm`: a `solveTsp` JavaScript binding
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Reinelt (1991), "TSPLIB - A Traveling Salesman Problem Library"

mod config;
mod distance;
mod error;
mod pheromone;
mod runner;
mod tour;
pub mod tsplib;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::AcoConfig;
pub use distance::{att_distance, City, DistanceMatrix};
pub use error::{AcoError, Result};
pub use pheromone::PheromoneMatrix;
pub use runner::{AcoResult, AcoRunner, ColonyOptimizer, IterationRecord};
pub use tour::{Tour, TourBuilder};
