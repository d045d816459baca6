//! The copy orchestrator.
//!
//! [`copy_file`] is the public entry point. It classifies the two paths
//! (same-file, named pipes, symlink policy), then hands the open handles to
//! the platform's transfer strategies in fixed priority order, falling
//! through to the buffered read/write loop when every strategy declines. On
//! success the destination is byte-for-byte identical to the source as it
//! existed when the copy started; on failure the error propagates with the
//! offending path attached and a possibly partial destination is left in
//! place for the caller to inspect or remove.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(not(windows))]
use std::fs::{File, OpenOptions};
#[cfg(not(windows))]
use std::io;

use crate::classify;
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::utils::path as path_util;

#[cfg(not(windows))]
use crate::fallback;
#[cfg(not(windows))]
use crate::strategy::{self, TransferOutcome, TransferStrategy};

#[cfg(windows)]
use crate::strategy;

/// Copy the contents of `src` to `dst` in the most efficient way available.
///
/// Platform-specific zero-copy mechanisms are used when possible:
/// `sendfile(2)` on Linux, `fcopyfile(2)` on macOS and `CopyFileW` on
/// Windows, with a transparent fallback to a plain read/write loop whenever
/// a mechanism is unavailable or declines the input. An existing destination
/// file is overwritten.
///
/// Symlinked sources are followed; use [`copy_file_with`] to recreate the
/// link instead.
///
/// # Returns
///
/// The destination path, for call chaining.
///
/// # Errors
///
/// - [`Error::SameFile`] if both paths resolve to one file
/// - [`Error::SpecialFile`] if either path is a named pipe
/// - [`Error::NotFound`] if the source, or the destination's parent
///   directory, does not exist; the error carries the exact missing path
/// - [`Error::NoSpace`] if the destination device fills up mid-transfer
/// - [`Error::Io`] for any other OS-level failure
///
/// # Example
///
/// ```no_run
/// let dst = zcopy::copy_file("data.bin", "backup/data.bin")?;
/// assert_eq!(dst, std::path::Path::new("backup/data.bin"));
/// # Ok::<(), zcopy::Error>(())
/// ```
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<PathBuf> {
    copy_file_with(src, dst, &CopyOptions::default())
}

/// Copy `src` to `dst` with explicit [`CopyOptions`].
///
/// With `follow_symlinks` disabled and a symlink source, an equivalent link
/// is created at the destination instead of copying the target's content.
/// See [`copy_file`] for everything else.
pub fn copy_file_with<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    options: &CopyOptions,
) -> Result<PathBuf> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if path_util::is_same_file(src, dst) {
        return Err(Error::SameFile {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }

    // A missing file is not an error at this stage; it is surfaced with the
    // right path attached when the file is opened for real. Only named pipes
    // are rejected here: other special kinds fail naturally at open or
    // transfer time.
    #[cfg(unix)]
    for path in [src, dst] {
        if let Ok(meta) = fs::metadata(path) {
            use std::os::unix::fs::FileTypeExt;
            if meta.file_type().is_fifo() {
                return Err(Error::SpecialFile(path.to_path_buf()));
            }
        }
    }

    if !options.follow_symlinks && path_util::is_symlink(src) {
        let target = fs::read_link(src).map_err(|error| open_error(error, src))?;
        path_util::symlink(&target, dst).map_err(|error| open_error(error, dst))?;
        return Ok(dst.to_path_buf());
    }

    #[cfg(windows)]
    {
        // The native API is all-or-nothing and already falls back internally,
        // so there is no strategy chain at this layer.
        strategy::native::copy_file_native(src, dst)?;
        Ok(dst.to_path_buf())
    }

    #[cfg(not(windows))]
    {
        // Scoped handles: both descriptors are released on every exit path,
        // including a strategy failing mid-transfer, so cleanup code can
        // always inspect or remove the destination afterwards.
        let src_file = File::open(src).map_err(|error| open_error(error, src))?;
        let dst_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(dst)
            .map_err(|error| open_error(error, dst))?;

        let _bytes = run_strategy_chain(&src_file, &dst_file, strategy::platform_strategies())
            .map_err(|error| transfer_error(error, dst))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            bytes = _bytes,
            src = %src.display(),
            dst = %dst.display(),
            "copy completed"
        );
        Ok(dst.to_path_buf())
    }
}

/// Try each available strategy in priority order, then the fallback loop.
///
/// A decline advances to the next strategy with the destination still clean;
/// a failure is final, since no mechanism may resume from another's partial
/// state.
#[cfg(not(windows))]
fn run_strategy_chain(
    src: &File,
    dst: &File,
    strategies: &[&dyn TransferStrategy],
) -> io::Result<u64> {
    for strategy in strategies {
        if !strategy.is_available() {
            continue;
        }
        match strategy.attempt(src, dst) {
            TransferOutcome::Completed(bytes) => return Ok(bytes),
            TransferOutcome::Declined(_decline) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("zero-copy strategy declined: {}", _decline.error());
            }
            TransferOutcome::Failed(error) => return Err(error),
        }
    }
    fallback::copy_contents(src, dst)
}

/// Attach the path an open/stat operation was acting on.
fn open_error(error: std::io::Error, path: &Path) -> Error {
    if classify::is_not_found(&error) {
        Error::NotFound {
            path: path.to_path_buf(),
            source: error,
        }
    } else {
        Error::Io {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

/// Attach the destination path to a mid-transfer failure.
#[cfg(not(windows))]
fn transfer_error(error: std::io::Error, dst: &Path) -> Error {
    if classify::is_no_space_error(&error) {
        Error::NoSpace {
            path: dst.to_path_buf(),
            source: error,
        }
    } else {
        Error::Io {
            path: dst.to_path_buf(),
            source: error,
        }
    }
}
