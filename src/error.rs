use thiserror::Error;

/// Construction-time failures. Nothing on the per-tick path returns these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("config field `{field}` must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("config field `{field}` must be non-negative and finite (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("solver_iterations must be at least 1")]
    NoSolverIterations,

    #[error("grid of {width}x{height} needs {expected} cells, got {actual}")]
    CellCountMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cell size must be positive and finite (got {0})")]
    InvalidCellSize(f32),
}

pub type Result<T> = std::result::Result<T, Error>;
