use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("the table has no header row")]
    MissingHeader,
    #[error("column `{0}` appears more than once")]
    DuplicateColumn(String),
    #[error("column `{0}` not found")]
    MissingColumn(String),
    #[error("column `{name}` has {actual} rows, but the table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
