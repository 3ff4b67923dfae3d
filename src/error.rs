use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal failures of the reconstruction pipeline.
///
/// Geometric degeneracies (a ray missing the volume, a ray parallel to a grid
/// axis) are *not* errors: they are routine, recovered locally and silently.
/// Everything here terminates the run with a diagnostic on stderr.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file missing, unreadable, or ending before the declared data
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Wrong magic, count mismatch, out-of-range angle, implausible header
    #[error("malformed input in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Output file cannot be created or written
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{}: unsupported file format (expected {expected})", .path.display())]
    UnsupportedFormat { path: PathBuf, expected: &'static str },
}

impl Error {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read { path: path.to_owned(), source }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::Malformed { path: path.to_owned(), reason: reason.into() }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        Self::Write { path: path.to_owned(), source }
    }
}
