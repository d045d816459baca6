//! Linux splice-style transfer using `sendfile(2)`.
//!
//! `sendfile` moves data between two descriptors entirely in kernel space.
//! File-to-file transfers work on Linux >= 2.6.33; older kernels only accept
//! a socket destination and report `ENOTSOCK`, which permanently downgrades
//! this mechanism for the rest of the process.

use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

use super::{Decline, TransferOutcome, TransferStrategy, chunk_hint, run_transfer_loop};
use crate::capability;

/// Kernel cap on the per-call byte count, documented in sendfile(2).
const MAX_SENDFILE_COUNT: u64 = 0x7fff_f000;

/// Splice-style strategy; first in the platform priority order.
pub(crate) struct SendfileStrategy;

impl TransferStrategy for SendfileStrategy {
    fn is_available(&self) -> bool {
        capability::splice_available()
    }

    fn attempt(&self, src: &File, dst: &File) -> TransferOutcome {
        let hint = chunk_hint(src);
        let outcome = run_transfer_loop(hint, |offset, len| raw_sendfile(dst, src, offset, len));
        if let TransferOutcome::Declined(Decline::MechanismUnsupported(_)) = &outcome {
            capability::disable_splice();
        }
        outcome
    }
}

/// One `sendfile(2)` call moving up to `len` bytes from `src` at `offset`
/// into `dst` at its current file position.
///
/// The explicit source offset means the source file's own cursor is never
/// touched, so a decline with zero progress leaves both handles exactly as
/// the next strategy expects them.
pub(crate) fn raw_sendfile(dst: &File, src: &File, offset: u64, len: u64) -> io::Result<u64> {
    let mut off = offset as libc::off_t;
    let count = len.min(MAX_SENDFILE_COUNT) as usize;
    // SAFETY: both descriptors are owned by live `File`s and `off` outlives
    // the call.
    let sent = unsafe { libc::sendfile(dst.as_raw_fd(), src.as_raw_fd(), &mut off, count) };
    if sent < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(sent as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_pattern(path: &std::path::Path, size: usize) -> Vec<u8> {
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let mut file = fs::File::create(path).unwrap();
        file.write_all(&data).unwrap();
        data
    }

    fn open_pair(dir: &std::path::Path, size: usize) -> (File, File, Vec<u8>) {
        let src_path = dir.join("src.bin");
        let data = write_pattern(&src_path, size);
        let src = File::open(&src_path).unwrap();
        let dst = File::create(dir.join("dst.bin")).unwrap();
        (src, dst, data)
    }

    #[test]
    fn test_attempt_copies_exact_bytes() {
        let dir = tempdir().unwrap();
        let (src, dst, data) = open_pair(dir.path(), 64 * 1024 + 7);

        let outcome = SendfileStrategy.attempt(&src, &dst);
        match outcome {
            TransferOutcome::Completed(bytes) => assert_eq!(bytes, data.len() as u64),
            other => panic!("expected Completed, got {:?}", other),
        }
        assert_eq!(fs::read(dir.path().join("dst.bin")).unwrap(), data);
    }

    #[test]
    fn test_attempt_empty_file() {
        let dir = tempdir().unwrap();
        let (src, dst, _) = open_pair(dir.path(), 0);

        let outcome = SendfileStrategy.attempt(&src, &dst);
        assert!(matches!(outcome, TransferOutcome::Completed(0)));
        assert_eq!(fs::read(dir.path().join("dst.bin")).unwrap(), b"");
    }

    #[test]
    fn test_undersized_hint_still_copies_everything() {
        // A hint far below the real size just forces more calls; the loop
        // terminates on the EOF signal, not on the hint.
        let dir = tempdir().unwrap();
        let (src, dst, data) = open_pair(dir.path(), 64 * 1024);

        let outcome = run_transfer_loop(1024, |offset, len| raw_sendfile(&dst, &src, offset, len));
        assert!(matches!(outcome, TransferOutcome::Completed(n) if n == data.len() as u64));
        assert_eq!(fs::read(dir.path().join("dst.bin")).unwrap(), data);
    }

    #[test]
    fn test_oversized_hint_still_copies_everything() {
        let dir = tempdir().unwrap();
        let (src, dst, data) = open_pair(dir.path(), 64 * 1024);

        let hint = data.len() as u64 + 100 * 1024 * 1024;
        let outcome = run_transfer_loop(hint, |offset, len| raw_sendfile(&dst, &src, offset, len));
        assert!(matches!(outcome, TransferOutcome::Completed(n) if n == data.len() as u64));
        assert_eq!(fs::read(dir.path().join("dst.bin")).unwrap(), data);
    }

    #[test]
    fn test_raw_sendfile_partial_range() {
        let dir = tempdir().unwrap();
        let (src, dst, data) = open_pair(dir.path(), 1024);

        let sent = raw_sendfile(&dst, &src, 0, 2).unwrap();
        assert_eq!(sent, 2);
        assert_eq!(fs::read(dir.path().join("dst.bin")).unwrap(), &data[..2]);
    }
}
