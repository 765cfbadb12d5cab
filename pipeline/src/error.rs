//! Error definitions for the training pipeline
use std::path::PathBuf;

use shelfcast_datasets::DatasetError;
use shelfcast_ensemble::EnsembleError;
use shelfcast_preprocessing::PreprocessingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure of one pipeline stage
///
/// Every variant wraps the error of the stage that failed. Nothing is retried, the first
/// failure ends the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load sales data")]
    DataLoad(#[source] DatasetError),
    #[error("failed to derive calendar features")]
    Feature(#[source] PreprocessingError),
    #[error("sales data does not have the required columns")]
    Schema(#[source] PreprocessingError),
    #[error("failed to train the demand model")]
    Training(#[source] TrainingError),
    #[error("failed to persist the model at {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error(transparent)]
    Selection(#[from] PreprocessingError),
    #[error(transparent)]
    Ensemble(#[from] EnsembleError),
    #[error(transparent)]
    Metrics(#[from] shelfcast::error::Error),
    #[error("test ratio should be in range [0, 1], but is {0}")]
    TestRatio(f64),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

impl From<TrainingError> for PipelineError {
    fn from(err: TrainingError) -> Self {
        PipelineError::Training(err)
    }
}
