//! Pairwise city distances under the TSPLIB `ATT` (pseudo-Euclidean) rule.
//!
//! [`DistanceMatrix`] is built once per run and never mutated. Entries are
//! stored row-major in a flat `Vec<f64>`.
//!
//! # References
//!
//! Reinelt (1991), "TSPLIB - A Traveling Salesman Problem Library", §2.5

use crate::error::{AcoError, Result};

/// A point in the plane, identified by its index in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for City {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Pseudo-Euclidean distance between two cities.
///
/// `r = sqrt((dx² + dy²) / 10)`, rounded to the nearest integer and bumped
/// up by one whenever rounding went below `r`.
///
/// ```
/// use u_aco::{att_distance, City};
///
/// let d = att_distance(City::new(0.0, 0.0), City::new(3.0, 4.0));
/// assert_eq!(d, 2.0);
/// ```
pub fn att_distance(a: City, b: City) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let raw = ((dx * dx + dy * dy) / 10.0).sqrt();
    let rounded = raw.round();
    if rounded < raw {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Symmetric N×N distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

// Always holds at least two cities, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl DistanceMatrix {
    /// Builds the ATT distance matrix for `cities`.
    ///
    /// Rejects fewer than two cities, non-finite coordinates, pairs of
    /// coincident cities (their zero distance would make the construction
    /// heuristic undefined), and pairs far enough apart that their distance
    /// overflows `f64`.
    pub fn from_cities(cities: &[City]) -> Result<Self> {
        let n = cities.len();
        if n < 2 {
            return Err(AcoError::TooFewCities { count: n });
        }
        if let Some(index) = cities
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(AcoError::InvalidCoordinate { index });
        }

        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = att_distance(cities[i], cities[j]);
                if d == 0.0 {
                    return Err(AcoError::CoincidentCities {
                        first: i,
                        second: j,
                    });
                }
                if !d.is_finite() {
                    return Err(AcoError::DistanceOverflow {
                        first: i,
                        second: j,
                    });
                }
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { n, data })
    }

    /// Wraps a precomputed row-major matrix.
    ///
    /// The matrix must be `n × n` with `n >= 2`, finite, non-negative,
    /// symmetric, and zero on the diagonal. Zero off-diagonal entries are
    /// accepted; see [`TourBuilder`](crate::TourBuilder) for how they are
    /// handled during construction.
    pub fn from_row_major(n: usize, data: Vec<f64>) -> Result<Self> {
        if n < 2 {
            return Err(AcoError::TooFewCities { count: n });
        }
        if data.len() != n * n {
            return Err(AcoError::invalid_matrix(format!(
                "expected {} entries for {n} cities, got {}",
                n * n,
                data.len()
            )));
        }
        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(AcoError::invalid_matrix(format!(
                    "diagonal entry ({i}, {i}) must be zero"
                )));
            }
            for j in (i + 1)..n {
                let d = data[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(AcoError::invalid_matrix(format!(
                        "entry ({i}, {j}) must be finite and non-negative, got {d}"
                    )));
                }
                if d != data[j * n + i] {
                    return Err(AcoError::invalid_matrix(format!(
                        "entries ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }
        Ok(Self { n, data })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Row-major view of the matrix.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sum of consecutive edge lengths along `path`.
    ///
    /// The path is taken as given; pass a closed sequence to include the
    /// return edge.
    pub fn tour_length(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}
