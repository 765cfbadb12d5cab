//! Writing and reading trained models
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PersistError, PipelineError, Result};
use crate::SalesModel;

fn persist_error(path: &Path, source: impl Into<PersistError>) -> PipelineError {
    PipelineError::Persist {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

/// Serialize `model` with bincode and write it to `path`
///
/// An existing file is overwritten. The parent directory has to exist already, it is not
/// created. The file is written in one go, without a temporary file.
pub fn save_model<P: AsRef<Path>>(model: &SalesModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = bincode::serialize(model).map_err(|err| persist_error(path, err))?;
    fs::write(path, &bytes).map_err(|err| persist_error(path, err))?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote model");
    Ok(())
}

/// Read a model written by [`save_model`]
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SalesModel> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| persist_error(path, err))?;

    bincode::deserialize(&bytes).map_err(|err| persist_error(path, err))
}
