//! Errors raised while validating, walking and extracting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur during a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory to scan does not exist.
    #[error("supplied argument is not a directory: {0}")]
    MissingRoot(PathBuf),

    /// A directory entry could not be read while walking.
    #[error("cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The archive could not be opened or one of its entries is corrupt.
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An archive entry resolves outside of the extraction directory.
    #[error("{}: illegal file path", .0.display())]
    IllegalPath(PathBuf),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
