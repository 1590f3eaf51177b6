/// Error types for PTS loading and scene bookkeeping
use std::path::PathBuf;

use thiserror::Error;

use crate::scene::ShapeHandle;

/// Errors raised by the parser and the scene store
#[derive(Error, Debug)]
pub enum PtsError {
    #[error("failed to open PTS file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read PTS data: {0}")]
    Read(#[from] std::io::Error),

    #[error("unknown shape handle {0}")]
    UnknownShape(ShapeHandle),

    #[error("shape {0} is not a line")]
    NotALine(ShapeHandle),
}

/// Result type alias for PTS operations
pub type Result<T> = std::result::Result<T, PtsError>;
