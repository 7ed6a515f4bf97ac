//! Error type shared by every stage of a colony run.

use thiserror::Error;

/// Errors raised while building inputs or running the colony.
///
/// Nothing is retried internally: any of these aborts the run and is
/// handed back to the caller with the offending indices attached.
#[derive(Debug, Error)]
pub enum AcoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("at least 2 cities are required, got {count}")]
    TooFewCities { count: usize },

    #[error("city {index} has a non-finite coordinate")]
    InvalidCoordinate { index: usize },

    #[error("cities {first} and {second} are coincident (zero distance)")]
    CoincidentCities { first: usize, second: usize },

    #[error("distance between cities {first} and {second} overflows f64")]
    DistanceOverflow { first: usize, second: usize },

    #[error("invalid distance matrix: {0}")]
    InvalidDistanceMatrix(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every candidate weight out of `from` was zero, or their sum overflowed.
    #[error("degenerate selection weights leaving city {from} ({candidates} candidates)")]
    DegenerateWeights { from: usize, candidates: usize },

    #[error("tour has zero length; pheromone deposit is undefined")]
    ZeroLengthTour,

    #[error("tour length is not finite; pheromone deposit is undefined")]
    NonFiniteTourLength,

    #[error("invalid tour: {0}")]
    InvalidTour(String),

    #[error("run finished without building a tour")]
    EmptyRun,

    #[error("coordinate file has no NODE_COORD_SECTION")]
    MissingNodeCoordSection,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, AcoError>;

impl AcoError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidDistanceMatrix(message.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
