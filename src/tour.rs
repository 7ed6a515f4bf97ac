//! Probabilistic tour construction for a single ant.
//!
//! At each step the ant at city `i` moves to an unvisited city `j` with
//! probability proportional to `tau(i, j)^alpha * (1 / d(i, j))^beta`.
//!
//! # References
//!
//! Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a Colony
//! of Cooperating Agents"

use crate::distance::DistanceMatrix;
use crate::error::{AcoError, Result};
use crate::pheromone::PheromoneMatrix;
use rand::Rng;

/// A closed tour: `N + 1` city indices starting and ending at the same city.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTour"))]
pub struct Tour {
    cities: Vec<usize>,
    length: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTour {
    cities: Vec<usize>,
    length: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTour> for Tour {
    type Error = AcoError;

    fn try_from(raw: RawTour) -> Result<Self> {
        Tour::from_parts(raw.cities, raw.length)
    }
}

impl Tour {
    /// Rebuilds a tour from stored parts.
    ///
    /// `cities` must be a closed Hamiltonian cycle over `cities.len() - 1`
    /// cities and `length` finite and non-negative.
    pub fn from_parts(cities: Vec<usize>, length: f64) -> Result<Self> {
        let Some(n) = cities.len().checked_sub(1).filter(|&n| n >= 2) else {
            return Err(AcoError::InvalidTour(format!(
                "expected at least 3 entries, got {}",
                cities.len()
            )));
        };
        if !length.is_finite() || length < 0.0 {
            return Err(AcoError::InvalidTour(format!(
                "length must be finite and non-negative, got {length}"
            )));
        }
        let tour = Self { cities, length };
        if !tour.is_valid(n) {
            return Err(AcoError::InvalidTour(format!(
                "not a closed cycle over {n} cities: {:?}",
                tour.cities
            )));
        }
        Ok(tour)
    }

    /// City indices in visiting order, start repeated at the end.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Total length including the closing edge.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn start(&self) -> usize {
        self.cities[0]
    }

    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }

    /// Checks that this is a Hamiltonian cycle over `n` cities rooted at
    /// its first entry.
    pub fn is_valid(&self, n: usize) -> bool {
        if self.cities.len() != n + 1 || self.cities.first() != self.cities.last() {
            return false;
        }
        let mut seen = vec![false; n];
        for &c in &self.cities[..n] {
            if c >= n || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }
}

/// Builds tours against a fixed snapshot of distances and pheromones.
///
/// Holds shared references only; the pheromone matrix cannot change while
/// a builder is alive, so every ant built from one builder sees the same
/// state.
#[derive(Debug, Clone, Copy)]
pub struct TourBuilder<'a> {
    distances: &'a DistanceMatrix,
    pheromones: &'a PheromoneMatrix,
    start: usize,
    alpha: f64,
    beta: f64,
}

impl<'a> TourBuilder<'a> {
    /// # Panics
    /// Panics if the matrices differ in size or `start` is out of range.
    pub fn new(
        distances: &'a DistanceMatrix,
        pheromones: &'a PheromoneMatrix,
        start: usize,
        alpha: f64,
        beta: f64,
    ) -> Self {
        assert_eq!(
            distances.len(),
            pheromones.len(),
            "distance and pheromone matrices must have the same size"
        );
        assert!(start < distances.len(), "start city out of range");
        Self {
            distances,
            pheromones,
            start,
            alpha,
            beta,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Constructs one tour.
    ///
    /// Fails with [`AcoError::DegenerateWeights`] when no candidate has a
    /// usable weight.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Tour> {
        let n = self.distances.len();
        let mut cities = Vec::with_capacity(n + 1);
        let mut visited = vec![false; n];
        let mut candidates = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        let mut length = 0.0;

        cities.push(self.start);
        visited[self.start] = true;
        let mut current = self.start;

        for _ in 1..n {
            candidates.clear();
            candidates.extend((0..n).filter(|&c| !visited[c]));

            let next = self.choose_next(current, &candidates, &mut weights, rng)?;
            length += self.distances.get(current, next);
            cities.push(next);
            visited[next] = true;
            current = next;
        }

        length += self.distances.get(current, self.start);
        cities.push(self.start);

        Ok(Tour { cities, length })
    }

    fn choose_next<R: Rng>(
        &self,
        current: usize,
        candidates: &[usize],
        weights: &mut Vec<f64>,
        rng: &mut R,
    ) -> Result<usize> {
        // A zero-distance neighbor has an unbounded heuristic: take it outright.
        if let Some(&c) = candidates
            .iter()
            .find(|&&c| self.distances.get(current, c) == 0.0)
        {
            return Ok(c);
        }

        weights.clear();
        weights.extend(candidates.iter().map(|&c| {
            let tau = self.pheromones.get(current, c).powf(self.alpha);
            let eta = (1.0 / self.distances.get(current, c)).powf(self.beta);
            tau * eta
        }));

        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(AcoError::DegenerateWeights {
                from: current,
                candidates: candidates.len(),
            });
        }

        // Roulette draw over unnormalized weights.
        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (&c, &w) in candidates.iter().zip(weights.iter()) {
            cumulative += w;
            if cumulative > threshold {
                return Ok(c);
            }
        }

        // Rounding can leave the threshold just past the last bucket.
        let last = candidates
            .iter()
            .zip(weights.iter())
            .rev()
            .find(|&(_, &w)| w > 0.0)
            .map(|(&c, _)| c);
        last.ok_or(AcoError::DegenerateWeights {
            from: current,
            candidates: candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::City;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(n: usize) -> Vec<City> {
        (0..n)
            .map(|i| City::new((i % 5) as f64 * 20.0, (i / 5) as f64 * 20.0))
            .collect()
    }

    #[test]
    fn test_tour_is_valid_and_closed() {
        let d = DistanceMatrix::from_cities(&grid(12)).unwrap();
        let p = PheromoneMatrix::new(12);
        let builder = TourBuilder::new(&d, &p, 7, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let tour = builder.build(&mut rng).unwrap();
            assert!(tour.is_valid(12), "invalid tour {:?}", tour.cities());
            assert_eq!(tour.start(), 7);
            assert_eq!(*tour.cities().last().unwrap(), 7);
        }
    }

    #[test]
    fn test_length_matches_distance_model() {
        let d = DistanceMatrix::from_cities(&grid(10)).unwrap();
        let p = PheromoneMatrix::new(10);
        let builder = TourBuilder::new(&d, &p, 0, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(7);

        let tour = builder.build(&mut rng).unwrap();
        let expected = d.tour_length(tour.cities());
        assert!((tour.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_two_cities() {
        let d = DistanceMatrix::from_cities(&[City::new(0.0, 0.0), City::new(3.0, 4.0)]).unwrap();
        let p = PheromoneMatrix::new(2);
        let builder = TourBuilder::new(&d, &p, 1, 1.0, 2.0);
        let tour = builder.build(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(tour.cities(), &[1, 0, 1]);
        assert_eq!(tour.length(), 4.0);
    }

    #[test]
    fn test_same_seed_same_tour() {
        let d = DistanceMatrix::from_cities(&grid(15)).unwrap();
        let p = PheromoneMatrix::new(15);
        let builder = TourBuilder::new(&d, &p, 3, 1.0, 2.0);

        let a = builder.build(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = builder.build(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_strong_trail_is_followed() {
        // Pheromone heavily favors 0 -> 2 -> 1 -> 3 -> 0 and beta = 0 removes
        // the distance bias.
        let d = DistanceMatrix::from_cities(&grid(4)).unwrap();
        let mut p = PheromoneMatrix::new(4);
        p.evaporate(0.999_999).unwrap();
        p.reinforce(&[0, 2, 1, 3, 0], 1e6);
        let builder = TourBuilder::new(&d, &p, 0, 1.0, 0.0);

        let mut rng = StdRng::seed_from_u64(5);
        let mut followed = 0;
        for _ in 0..50 {
            let tour = builder.build(&mut rng).unwrap();
            if tour.cities() == [0, 2, 1, 3, 0] || tour.cities() == [0, 3, 1, 2, 0] {
                followed += 1;
            }
        }
        assert!(followed >= 48, "trail followed only {followed}/50 times");
    }

    #[test]
    fn test_zero_distance_candidate_dominates() {
        // Cities 1 and 2 share a location: from 1, city 2 must be next.
        #[rustfmt::skip]
        let d = DistanceMatrix::from_row_major(3, vec![
            0.0, 4.0, 4.0,
            4.0, 0.0, 0.0,
            4.0, 0.0, 0.0,
        ]).unwrap();
        let p = PheromoneMatrix::new(3);
        let builder = TourBuilder::new(&d, &p, 1, 1.0, 2.0);

        for seed in 0..10 {
            let tour = builder.build(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(tour.cities(), &[1, 2, 0, 1]);
            assert_eq!(tour.length(), 8.0);
        }
    }

    #[test]
    fn test_underflowed_weights_fail() {
        let d = DistanceMatrix::from_cities(&grid(4)).unwrap();
        let mut p = PheromoneMatrix::new(4);
        p.evaporate(0.9).unwrap();
        // 0.1^400 underflows to zero
        let builder = TourBuilder::new(&d, &p, 0, 400.0, 0.0);

        let err = builder.build(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            AcoError::DegenerateWeights {
                from: 0,
                candidates: 3
            }
        ));
    }

    #[test]
    fn test_from_parts_validates() {
        let tour = Tour::from_parts(vec![2, 0, 1, 2], 12.0).unwrap();
        assert_eq!(tour.start(), 2);
        assert_eq!(tour.length(), 12.0);

        for (cities, length) in [
            (vec![], 0.0),
            (vec![0, 0], 0.0),
            (vec![0, 1, 0, 1], 3.0),
            (vec![0, 1, 2], 3.0),
            (vec![0, 1, 0], f64::NAN),
            (vec![0, 1, 0], -1.0),
        ] {
            let err = Tour::from_parts(cities.clone(), length).unwrap_err();
            assert!(matches!(err, AcoError::InvalidTour(_)), "{cities:?}");
        }
    }

    #[test]
    fn test_is_valid_rejects_bad_tours() {
        let t = |cities: Vec<usize>| Tour {
            cities,
            length: 0.0,
        };
        assert!(t(vec![0, 1, 2, 0]).is_valid(3));
        assert!(!t(vec![0, 1, 2]).is_valid(3));
        assert!(!t(vec![0, 1, 1, 0]).is_valid(3));
        assert!(!t(vec![0, 1, 2, 1]).is_valid(3));
        assert!(!t(vec![0, 1, 5, 0]).is_valid(3));
    }

    proptest! {
        #[test]
        fn prop_tours_are_hamiltonian(
            n in 2usize..20,
            start_seed in 0usize..1000,
            seed in any::<u64>(),
            alpha in 0.0f64..3.0,
            beta in 0.0f64..5.0,
        ) {
            let d = DistanceMatrix::from_cities(&grid(n)).unwrap();
            let p = PheromoneMatrix::new(n);
            let start = start_seed % n;
            let builder = TourBuilder::new(&d, &p, start, alpha, beta);

            let tour = builder.build(&mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert!(tour.is_valid(n));
            prop_assert_eq!(tour.start(), start);
            prop_assert!((tour.length() - d.tour_length(tour.cities())).abs() < 1e-9);
        }
    }
}
