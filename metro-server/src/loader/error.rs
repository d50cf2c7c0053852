//! Data loader error types.

use std::path::PathBuf;

/// Errors that can occur when reading the data directory.
///
/// A missing file is not an error; it loads as an empty source.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// File exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid CSV
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
