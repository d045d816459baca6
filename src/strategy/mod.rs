//! Platform transfer strategies.
//!
//! Each zero-copy mechanism implements the same narrow contract: attempt a
//! full transfer between two open files and report one of three outcomes.
//! "Declined" is a first-class result, not an error: it means this mechanism
//! cannot handle this pair of files, the destination is still clean, and the
//! orchestrator is free to try the next strategy or the read/write fallback.
//!
//! The failure-interpretation rules for loop-based mechanisms live in
//! [`run_transfer_loop`], which is independent of any syscall so the decision
//! table can be tested with injected transfer functions.

#![cfg_attr(windows, allow(dead_code))]

use std::fs::File;
use std::io;

use crate::classify;

#[cfg(target_os = "macos")]
pub(crate) mod fcopyfile;
#[cfg(windows)]
pub(crate) mod native;
#[cfg(target_os = "linux")]
pub(crate) mod sendfile;

/// Floor for the stat-derived per-call transfer-size hint.
pub(crate) const MIN_CHUNK_HINT: u64 = 8 * 1024 * 1024; // 8 MiB

/// Hint used when the source size cannot be determined.
pub(crate) const FALLBACK_CHUNK_HINT: u64 = 128 * 1024 * 1024; // 128 MiB

/// Result of one strategy attempt.
#[derive(Debug)]
pub(crate) enum TransferOutcome {
    /// The whole file was transferred; carries total bytes moved.
    Completed(u64),
    /// This mechanism cannot handle this input; the destination is untouched
    /// and another strategy (or the fallback) may still succeed.
    Declined(Decline),
    /// The transfer failed after it was committed. Propagates verbatim; no
    /// other mechanism may resume from a partially written destination.
    Failed(io::Error),
}

/// Why a strategy gave up without having written anything.
#[derive(Debug)]
pub(crate) enum Decline {
    /// The kernel rejected the descriptor kind outright; the mechanism can
    /// never work in this process and its capability flag is downgraded.
    MechanismUnsupported(io::Error),
    /// This particular input pair was rejected before any data moved.
    InputRejected(io::Error),
}

impl Decline {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn error(&self) -> &io::Error {
        match self {
            Decline::MechanismUnsupported(error) | Decline::InputRejected(error) => error,
        }
    }
}

/// Contract shared by the platform mechanisms.
pub(crate) trait TransferStrategy: Sync {
    /// Cached capability check; a strategy that returns false is skipped
    /// without issuing any syscall.
    fn is_available(&self) -> bool;

    /// Attempt a full transfer from `src` to `dst`.
    fn attempt(&self, src: &File, dst: &File) -> TransferOutcome;
}

/// Per-call transfer-size hint for loop-based mechanisms.
///
/// The stat-reported source size is the preferred hint so that most files
/// move in a single call, floored at 8 MiB for small files. This is purely a
/// throughput hint: the source may grow or shrink while being copied, and the
/// loop relies on the zero-bytes EOF signal, never on the hint, for
/// termination. If stat fails the copy still proceeds with a fixed 128 MiB
/// hint.
pub(crate) fn chunk_hint(src: &File) -> u64 {
    match src.metadata() {
        Ok(meta) => meta.len().max(MIN_CHUNK_HINT),
        Err(_) => FALLBACK_CHUNK_HINT,
    }
}

/// Drive a loop-based transfer mechanism to EOF.
///
/// `transfer` moves up to `len` bytes starting at `offset` and returns the
/// byte count the kernel reported. The loop advances an explicit offset until
/// a call moves zero bytes.
///
/// Failure interpretation, in order:
/// - no-space: fatal, data loss is in progress and falling back would only
///   truncate the destination further;
/// - descriptor-unsupported: decline, the caller downgrades the mechanism;
/// - any other error before the first byte moved: decline, the destination is
///   still clean;
/// - any other error after progress: fatal.
pub(crate) fn run_transfer_loop<F>(hint: u64, mut transfer: F) -> TransferOutcome
where
    F: FnMut(u64, u64) -> io::Result<u64>,
{
    let mut offset: u64 = 0;
    loop {
        match transfer(offset, hint) {
            Ok(0) => return TransferOutcome::Completed(offset),
            Ok(moved) => offset += moved,
            Err(error) => {
                if classify::is_no_space_error(&error) {
                    return TransferOutcome::Failed(error);
                }
                if classify::is_descriptor_unsupported(&error) {
                    return TransferOutcome::Declined(Decline::MechanismUnsupported(error));
                }
                if offset == 0 {
                    return TransferOutcome::Declined(Decline::InputRejected(error));
                }
                return TransferOutcome::Failed(error);
            }
        }
    }
}

/// The strategies for this platform, in fixed priority order: the splice
/// mechanism first, the whole-file mechanism second. Selected once at compile
/// time; the fallback loop is not in this table because it cannot decline.
#[cfg(target_os = "linux")]
pub(crate) fn platform_strategies() -> &'static [&'static dyn TransferStrategy] {
    static SENDFILE: sendfile::SendfileStrategy = sendfile::SendfileStrategy;
    static STRATEGIES: [&dyn TransferStrategy; 1] = [&SENDFILE];
    &STRATEGIES
}

/// The strategies for this platform, in fixed priority order.
#[cfg(target_os = "macos")]
pub(crate) fn platform_strategies() -> &'static [&'static dyn TransferStrategy] {
    static FCOPYFILE: fcopyfile::FcopyfileStrategy = fcopyfile::FcopyfileStrategy;
    static STRATEGIES: [&dyn TransferStrategy; 1] = [&FCOPYFILE];
    &STRATEGIES
}

/// No zero-copy mechanism on this platform; every copy uses the fallback.
#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub(crate) fn platform_strategies() -> &'static [&'static dyn TransferStrategy] {
    &[]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loop_accumulates_until_eof() {
        let mut sizes = vec![4u64, 4, 2].into_iter();
        let mut offsets = Vec::new();
        let outcome = run_transfer_loop(8, |offset, _len| {
            offsets.push(offset);
            Ok(sizes.next().unwrap_or(0))
        });
        assert!(matches!(outcome, TransferOutcome::Completed(10)));
        assert_eq!(offsets, vec![0, 4, 8, 10]);
    }

    #[test]
    fn test_loop_empty_input() {
        let outcome = run_transfer_loop(8, |_offset, _len| Ok(0));
        assert!(matches!(outcome, TransferOutcome::Completed(0)));
    }

    #[test]
    fn test_loop_declines_on_first_call_error() {
        let outcome =
            run_transfer_loop(8, |_offset, _len| Err(io::Error::other("unsupported pair")));
        assert!(matches!(
            outcome,
            TransferOutcome::Declined(Decline::InputRejected(_))
        ));
    }

    #[test]
    fn test_loop_fails_after_progress() {
        let mut first = true;
        let outcome = run_transfer_loop(8, |_offset, _len| {
            if first {
                first = false;
                Ok(4)
            } else {
                Err(io::Error::other("disk detached"))
            }
        });
        assert!(matches!(outcome, TransferOutcome::Failed(_)));
    }

    #[test]
    fn test_loop_never_falls_back_on_no_space() {
        // Even on the very first call: by the time ENOSPC shows up the
        // filesystem is full and truncation is already in progress.
        let outcome = run_transfer_loop(8, |_offset, _len| {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        });
        assert!(matches!(outcome, TransferOutcome::Failed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_loop_reports_mechanism_unsupported() {
        let outcome = run_transfer_loop(8, |_offset, _len| {
            Err(io::Error::from_raw_os_error(libc::ENOTSOCK))
        });
        assert!(matches!(
            outcome,
            TransferOutcome::Declined(Decline::MechanismUnsupported(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_loop_no_space_beats_zero_progress_decline() {
        let outcome = run_transfer_loop(8, |_offset, _len| {
            Err(io::Error::from_raw_os_error(libc::ENOSPC))
        });
        assert!(matches!(outcome, TransferOutcome::Failed(_)));
    }

    #[test]
    fn test_chunk_hint_floors_small_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tiny").unwrap();
        file.flush().unwrap();
        let handle = std::fs::File::open(file.path()).unwrap();
        assert_eq!(chunk_hint(&handle), MIN_CHUNK_HINT);
    }
}
