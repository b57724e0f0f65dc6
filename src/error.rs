//! Error types for scanning

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A directory that could not be opened or fully read during a walk.
///
/// These never abort a scan. The walker hands them to the output sink and
/// moves on to the next sibling.
#[derive(Error, Debug)]
#[error("Error reading directory {}: {source}", .path.display())]
pub struct DirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl DirectoryError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Failures that stop a scan as a whole.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot access '{}': No such file or directory", .0.display())]
    RootNotFound(PathBuf),

    #[error("cannot scan '{}': Not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read '{}': {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot resolve '{}': {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

impl ScanError {
    /// Classify a failure to open the scan root.
    pub(crate) fn from_root_open(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::RootNotFound(path),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path),
            _ => Self::RootUnreadable { path, source },
        }
    }
}
