use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("failed to write image to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
