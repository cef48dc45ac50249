use blk_format::FormatError;
use std::path::PathBuf;
use thiserror::Error;


/// Point of the per-file state machine a failure was raised at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Opening,
    Scanning,
    Flushing,
}


#[derive(Error, Debug)]
pub enum ImportError {
    /// The only failure that ends a run.
    #[error("failed to list input files in {}: {error}", .dir.display())]
    InputEnumerationFailed {
        dir: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to open {file}: {error}")]
    OpenFailed {
        file: String,
        error: std::io::Error,
    },

    #[error("{file}: {error}")]
    Format {
        file: String,
        error: FormatError,
    },

    #[error("failed to write rows of {file}: {error:#}")]
    StoreWriteFailed {
        file: String,
        error: anyhow::Error,
    },
}
