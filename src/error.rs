//! Error types in shelfcast
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("not enough samples, expected at least {expected} but got {actual}")]
    NotEnoughSamples { expected: usize, actual: usize },
    #[error("mismatched shapes: {records} records but {targets} targets")]
    MismatchedShapes { records: usize, targets: usize },
}
