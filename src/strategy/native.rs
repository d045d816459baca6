//! Windows native copy using `CopyFileW`.
//!
//! The native API is path-to-path and all-or-nothing: it already implements
//! its own internal fast paths and fallbacks, so it is the sole strategy on
//! Windows and "declined" does not apply. Its Win32 error is translated into
//! the process's standard OS-error representation with the relevant path
//! attached.

use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::Win32::Storage::FileSystem::CopyFileW;
use windows::core::PCWSTR;

use crate::classify;
use crate::error::{Error, Result};
use crate::utils::path::to_extended_length_path;

/// Convert a Path to a null-terminated wide string for the Win32 API.
///
/// Extended-length (`\\?\`) form is used so paths longer than MAX_PATH
/// (260 characters) copy like any other.
#[inline]
fn path_to_wide(path: &Path) -> Vec<u16> {
    to_extended_length_path(path)
        .as_os_str()
        .encode_wide()
        .chain(Some(0))
        .collect()
}

/// Copy `src` to `dst` through `CopyFileW`, overwriting any existing
/// destination.
pub(crate) fn copy_file_native(src: &Path, dst: &Path) -> Result<()> {
    let src_wide = path_to_wide(src);
    let dst_wide = path_to_wide(dst);

    // SAFETY: both buffers are valid null-terminated wide strings that
    // outlive the call.
    let result = unsafe {
        CopyFileW(
            PCWSTR(src_wide.as_ptr()),
            PCWSTR(dst_wide.as_ptr()),
            false.into(),
        )
    };

    match result {
        Ok(()) => Ok(()),
        Err(_) => {
            let error = io::Error::last_os_error();
            if classify::is_not_found(&error) {
                // Attribute the exact input path that is missing: either the
                // source file or the destination's parent directory.
                let path = if src.exists() { dst } else { src };
                Err(Error::NotFound {
                    path: path.to_path_buf(),
                    source: error,
                })
            } else if classify::is_no_space_error(&error) {
                Err(Error::NoSpace {
                    path: dst.to_path_buf(),
                    source: error,
                })
            } else {
                Err(Error::Io {
                    path: dst.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}
