use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("parameter `{name}` = {value} is outside [0, 1]")]
    ParameterOutOfRange { name: &'static str, value: f64 },

    #[error("need at least 4 control points, got {count}")]
    TooFewControlPoints { count: usize },

    #[error("control grid must be at least 4x4, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("row {row} has {actual} control points, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("need at least 2 samples along each direction, got {count}")]
    TooFewSamples { count: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
