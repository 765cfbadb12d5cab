//! Error definitions for preprocessing
use shelfcast_datasets::DatasetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreprocessingError>;

#[derive(Error, Debug)]
pub enum PreprocessingError {
    #[error("column `{0}` not found")]
    MissingColumn(String),
    #[error("cannot parse `{value}` in row {row} of column `{column}` as a date")]
    UnparseableDate {
        column: String,
        row: usize,
        value: String,
    },
    #[error("cannot convert `{value}` in row {row} of column `{column}` to a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
