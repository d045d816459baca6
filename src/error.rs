//! Error types for zcopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during a copy, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Validation | [`Error::SameFile`], [`Error::SpecialFile`], [`Error::NotFound`] |
//! | Fatal IO | [`Error::NoSpace`], [`Error::Io`] |
//!
//! Every variant carries the offending path. When the underlying failure was
//! an OS error, [`Error::raw_os_error`] exposes the raw code.
//!
//! Note there is no "zero-copy declined" error: a strategy that cannot handle
//! a particular pair of files is an internal signal that advances the copy to
//! the next strategy (or the read/write fallback), never a caller-visible
//! failure.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for zcopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while copying a file.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Source and destination resolve to the same underlying file.
    ///
    /// Detected by device+inode comparison on Unix and by case-normalized
    /// absolute path equality elsewhere. No data is transferred.
    #[error("{src} and {dst} are the same file")]
    SameFile {
        /// Source path as given by the caller
        src: PathBuf,
        /// Destination path as given by the caller
        dst: PathBuf,
    },

    /// Source or destination is a named pipe.
    ///
    /// Copying a FIFO would block or produce a meaningless result, so it is
    /// rejected before any file is opened. Other special file kinds (sockets,
    /// devices) fail naturally at open time instead.
    #[error("`{0}` is a named pipe")]
    SpecialFile(PathBuf),

    /// A path given by the caller does not exist.
    ///
    /// `path` is the exact input path (source, or destination whose parent
    /// directory is missing) that could not be found.
    #[error("no such file or directory: {path}")]
    NotFound {
        /// The missing input path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The destination device ran out of space during the transfer.
    ///
    /// This is always fatal and never triggers the fallback copy loop: by the
    /// time `ENOSPC` is reported, a truncated destination may already exist,
    /// and retrying through a slower path would only fail again.
    #[error("no space left on device while writing {path}")]
    NoSpace {
        /// Destination path being written when space ran out
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Any other IO failure during a committed transfer.
    ///
    /// The destination may exist and hold partial data; it is not removed,
    /// since a partial file can be useful for diagnosis. Cleanup is left to
    /// the caller.
    #[error("failed to copy to {path}: {source}")]
    Io {
        /// Path the failing operation was acting on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The raw OS error code, when the failure came from the OS.
    ///
    /// [`Error::SameFile`] and [`Error::SpecialFile`] are detected before any
    /// syscall fails and return `None`.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::SameFile { .. } | Error::SpecialFile(_) => None,
            Error::NotFound { source, .. }
            | Error::NoSpace { source, .. }
            | Error::Io { source, .. } => source.raw_os_error(),
        }
    }

    /// The path this error is about.
    pub fn path(&self) -> &Path {
        match self {
            Error::SameFile { src, .. } => src,
            Error::SpecialFile(path) => path,
            Error::NotFound { path, .. }
            | Error::NoSpace { path, .. }
            | Error::Io { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_file_display() {
        let error = Error::SameFile {
            src: PathBuf::from("/a/file"),
            dst: PathBuf::from("/b/file"),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("/a/file"));
        assert!(msg.contains("same file"));
    }

    #[test]
    fn test_not_found_carries_exact_path() {
        let error = Error::NotFound {
            path: PathBuf::from("/missing/input"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(error.path(), Path::new("/missing/input"));
    }

    #[test]
    fn test_raw_os_error_passthrough() {
        let error = Error::Io {
            path: PathBuf::from("/dst"),
            source: io::Error::from_raw_os_error(5), // EIO
        };
        assert_eq!(error.raw_os_error(), Some(5));
    }

    #[test]
    fn test_raw_os_error_none_for_preflight() {
        let error = Error::SpecialFile(PathBuf::from("/tmp/fifo"));
        assert_eq!(error.raw_os_error(), None);
        let error = Error::SameFile {
            src: PathBuf::from("p"),
            dst: PathBuf::from("p"),
        };
        assert_eq!(error.raw_os_error(), None);
    }

    #[test]
    fn test_no_space_display() {
        let error = Error::NoSpace {
            path: PathBuf::from("/dst/file.bin"),
            source: io::Error::from(io::ErrorKind::StorageFull),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("no space left on device"));
        assert!(msg.contains("/dst/file.bin"));
    }
}
