//! macOS whole-file transfer using `fcopyfile(2)`.
//!
//! A single call copies the entire data fork between two descriptors. Only
//! `COPYFILE_DATA` is requested; metadata, xattrs and ACLs are a higher-level
//! caller's concern.

use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr;

use super::{Decline, TransferOutcome, TransferStrategy};
use crate::capability;
use crate::classify;

/// Whole-file strategy; single-call, all-or-nothing.
pub(crate) struct FcopyfileStrategy;

impl TransferStrategy for FcopyfileStrategy {
    fn is_available(&self) -> bool {
        capability::whole_file_available()
    }

    fn attempt(&self, src: &File, dst: &File) -> TransferOutcome {
        match raw_fcopyfile(src, dst) {
            Ok(()) => {
                // fcopyfile does not report a byte count; the stat size is
                // the best available accounting.
                let bytes = src.metadata().map(|meta| meta.len()).unwrap_or(0);
                TransferOutcome::Completed(bytes)
            }
            Err(error) if classify::is_unsupported_input(&error) => {
                TransferOutcome::Declined(Decline::InputRejected(error))
            }
            Err(error) => TransferOutcome::Failed(error),
        }
    }
}

/// One `fcopyfile(2)` call copying the whole data fork of `src` into `dst`.
pub(crate) fn raw_fcopyfile(src: &File, dst: &File) -> io::Result<()> {
    // SAFETY: both descriptors are owned by live `File`s; a null state asks
    // the kernel to manage its own.
    let ret = unsafe {
        libc::fcopyfile(
            src.as_raw_fd(),
            dst.as_raw_fd(),
            ptr::null_mut(),
            libc::COPYFILE_DATA,
        )
    };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
