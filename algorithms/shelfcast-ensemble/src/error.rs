//! Error definitions for tree ensembles
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnsembleError>;

#[derive(Error, Debug, Clone)]
pub enum EnsembleError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
    #[error("record {row} has a non-finite value in feature {feature}")]
    NonFiniteRecord { row: usize, feature: usize },
    #[error("target {row} is not finite")]
    NonFiniteTarget { row: usize },
    #[error("invalid hyperparameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    BaseError(#[from] shelfcast::error::Error),
}
