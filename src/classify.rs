//! Classification of raw OS errors.
//!
//! The strategies and the orchestrator never match on errno values directly;
//! they reason in terms of the small taxonomy defined here: is the device
//! full, did the kernel reject the descriptor kind outright, or was this
//! particular input merely unsupported.

use std::io;

/// Check if an IO error indicates "no space left on device".
///
/// A full destination is the one mid-transfer failure that must never be
/// swallowed by falling back to another copy mechanism, so every strategy
/// routes its errors through this check first.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```
/// use std::io;
/// use zcopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            return raw_error == libc::ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Check if the kernel rejected the descriptor kind for a splice-style
/// transfer.
///
/// `ENOTSOCK` from `sendfile(2)` means this kernel only supports
/// socket-to-socket transfers, so the mechanism can never work for regular
/// files in this process and is permanently downgraded.
#[cfg(unix)]
pub(crate) fn is_descriptor_unsupported(error: &io::Error) -> bool {
    error.raw_os_error() == Some(libc::ENOTSOCK)
}

#[cfg(not(unix))]
#[allow(dead_code)] // the splice loop only runs on Unix outside of tests
pub(crate) fn is_descriptor_unsupported(_error: &io::Error) -> bool {
    false
}

/// Check if a whole-file copy call rejected this particular input.
///
/// `EINVAL` and `ENOTSUP` from `fcopyfile(2)` mean "not these files", not
/// "broken transfer": the destination is still clean and another mechanism
/// may succeed.
#[cfg(all(unix, any(target_os = "macos", test)))]
pub(crate) fn is_unsupported_input(error: &io::Error) -> bool {
    matches!(
        error.raw_os_error(),
        Some(libc::EINVAL) | Some(libc::ENOTSUP)
    )
}

/// Check if an IO error means a path component does not exist.
pub(crate) fn is_not_found(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_no_space_error_storage_full_kind() {
        let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
        assert!(is_no_space_error(&error));
    }

    #[test]
    fn test_is_no_space_error_other_kind() {
        let error = io::Error::new(io::ErrorKind::NotFound, "not found");
        assert!(!is_no_space_error(&error));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_no_space_error_enospc() {
        let error = io::Error::from_raw_os_error(libc::ENOSPC);
        assert!(is_no_space_error(&error));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_no_space_error_other_errno() {
        let error = io::Error::from_raw_os_error(libc::ENOENT);
        assert!(!is_no_space_error(&error));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_descriptor_unsupported() {
        assert!(is_descriptor_unsupported(&io::Error::from_raw_os_error(
            libc::ENOTSOCK
        )));
        assert!(!is_descriptor_unsupported(&io::Error::from_raw_os_error(
            libc::EINVAL
        )));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_unsupported_input() {
        assert!(is_unsupported_input(&io::Error::from_raw_os_error(
            libc::EINVAL
        )));
        assert!(is_unsupported_input(&io::Error::from_raw_os_error(
            libc::ENOTSUP
        )));
        assert!(!is_unsupported_input(&io::Error::from_raw_os_error(
            libc::ENOSPC
        )));
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_not_found(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
    }
}
