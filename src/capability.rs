//! Process-wide capability flags for the zero-copy mechanisms.
//!
//! Whether a mechanism works here cannot be read off the kernel version:
//! sandboxes, container runtimes, and exotic filesystems can all disable a
//! syscall on a kernel that nominally has it. So availability is determined
//! by a harmless trial invocation between two temporary files, once per
//! process, and cached in an atomic flag.
//!
//! The flag only ever moves one way: `unknown -> available` from a successful
//! probe, and `unknown/available -> unavailable` from a failed probe or a
//! hard "not supported on this kernel" signal observed during a real copy.
//! It is never re-enabled, so a mechanism known to fail is not retried on
//! every subsequent copy. Concurrent downgrades race benignly; the flag can
//! only move in one direction.

use std::sync::atomic::{AtomicU8, Ordering};

const UNKNOWN: u8 = 0;
const AVAILABLE: u8 = 1;
const UNAVAILABLE: u8 = 2;

/// Lazily probed tri-state availability flag for one copy mechanism.
pub(crate) struct MechanismFlag(AtomicU8);

impl MechanismFlag {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(UNKNOWN))
    }

    /// Resolve the flag, running `probe` at most once per process.
    ///
    /// A probe failure never raises; it marks the mechanism unavailable and
    /// the copy proceeds through the remaining strategies.
    pub(crate) fn resolve(&self, probe: impl FnOnce() -> bool) -> bool {
        match self.0.load(Ordering::Acquire) {
            AVAILABLE => true,
            UNAVAILABLE => false,
            _ => {
                let state = if probe() { AVAILABLE } else { UNAVAILABLE };
                // Only move out of UNKNOWN; a concurrent hard downgrade wins.
                let _ = self.0.compare_exchange(
                    UNKNOWN,
                    state,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                self.0.load(Ordering::Acquire) == AVAILABLE
            }
        }
    }

    /// One-way downgrade after a hard failure during real use.
    pub(crate) fn disable(&self) {
        self.0.store(UNAVAILABLE, Ordering::Release);
    }
}

#[cfg(target_os = "linux")]
static SPLICE: MechanismFlag = MechanismFlag::new();

#[cfg(target_os = "macos")]
static WHOLE_FILE: MechanismFlag = MechanismFlag::new();

/// Whether `sendfile(2)` can move data between two regular files here.
#[cfg(target_os = "linux")]
pub(crate) fn splice_available() -> bool {
    SPLICE.resolve(probe_splice)
}

/// Permanently mark file-to-file `sendfile(2)` as unsupported.
#[cfg(target_os = "linux")]
pub(crate) fn disable_splice() {
    #[cfg(feature = "tracing")]
    tracing::debug!("sendfile does not support file-to-file transfers on this kernel, disabling");
    SPLICE.disable();
}

/// Whether `fcopyfile(2)` is usable here.
#[cfg(target_os = "macos")]
pub(crate) fn whole_file_available() -> bool {
    WHOLE_FILE.resolve(probe_whole_file)
}

/// Permanently mark `fcopyfile(2)` as unsupported.
#[cfg(target_os = "macos")]
#[allow(dead_code)] // no errno from fcopyfile triggers a hard downgrade today
pub(crate) fn disable_whole_file() {
    WHOLE_FILE.disable();
}

#[cfg(target_os = "linux")]
fn probe_splice() -> bool {
    use crate::strategy::sendfile::raw_sendfile;
    use std::io::Write;

    fn trial() -> std::io::Result<bool> {
        let mut src = tempfile::NamedTempFile::new()?;
        src.write_all(b"0123456789")?;
        src.flush()?;
        let src_file = std::fs::File::open(src.path())?;
        let dst_file = tempfile::tempfile()?;
        Ok(raw_sendfile(&dst_file, &src_file, 0, 2).is_ok())
    }

    let available = trial().unwrap_or(false);
    #[cfg(feature = "tracing")]
    tracing::debug!(available, "probed file-to-file sendfile support");
    available
}

#[cfg(target_os = "macos")]
fn probe_whole_file() -> bool {
    use crate::strategy::fcopyfile::raw_fcopyfile;
    use std::io::Write;

    fn trial() -> std::io::Result<bool> {
        let mut src = tempfile::NamedTempFile::new()?;
        src.write_all(b"0123456789")?;
        src.flush()?;
        let src_file = std::fs::File::open(src.path())?;
        let dst_file = tempfile::tempfile()?;
        Ok(raw_fcopyfile(&src_file, &dst_file).is_ok())
    }

    let available = trial().unwrap_or(false);
    #[cfg(feature = "tracing")]
    tracing::debug!(available, "probed fcopyfile support");
    available
}
