use thiserror::Error;

// Unified error type for matwrap

#[derive(Error, Debug)]
pub enum MatError {
    #[error("type error: {0}")]
    Type(String),
    #[error("only 1D or 2D matrices are allowed (got rank {0})")]
    Rank(usize),
    #[error("ragged input: row {row} has {found} elements, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("empty input: {0}")]
    Empty(&'static str),
    #[error("operands could not be broadcast together with shapes {lhs:?} {rhs:?}")]
    Broadcast {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("matmul: inner dimension mismatch, {lhs:?} @ {rhs:?} ({} != {})", .lhs.1, .rhs.0)]
    Dimension {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("integer out of int64 range: {0}")]
    Overflow(String),
    #[error("domain error: {0}")]
    Domain(&'static str),
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
