//! Path utilities: file identity, symlink helpers, and Windows
//! extended-length path support.

use std::fs;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

/// Check whether two paths resolve to the same underlying file.
///
/// On Unix the comparison is by device and inode, so hardlinks and symlinks
/// to one file compare equal. A stat failure on either side means they
/// cannot be proven identical and the copy proceeds; a genuinely missing
/// source is reported properly at open time.
#[cfg(unix)]
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(meta_a), Ok(meta_b)) => meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino(),
        _ => false,
    }
}

/// Check whether two paths resolve to the same underlying file.
///
/// Without stable file identifiers this falls back to comparing
/// case-normalized absolute paths.
#[cfg(not(unix))]
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    normalized(a) == normalized(b)
}

#[cfg(not(unix))]
fn normalized(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let folded = absolute.to_string_lossy().to_lowercase().replace('/', "\\");
    PathBuf::from(folded)
}

/// Check if a path is a symlink without following it.
#[inline]
pub(crate) fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(unix)]
pub(crate) use std::os::unix::fs::symlink;

#[cfg(windows)]
pub(crate) use std::os::windows::fs::symlink_file as symlink;

#[cfg(not(any(unix, windows)))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    ))
}

/// Convert a path to an extended-length path format on Windows.
///
/// The default maximum path length on Windows is 260 characters (MAX_PATH);
/// the extended-length syntax (`\\?\` prefix) raises that to 32,767. UNC
/// paths become `\\?\UNC\server\share\...`, relative paths are made absolute
/// first.
#[cfg(windows)]
pub(crate) fn to_extended_length_path(path: &Path) -> PathBuf {
    let path_str = path.as_os_str().to_string_lossy();
    if path_str.starts_with(r"\\?\") {
        return path.to_path_buf();
    }

    if path_str.starts_with(r"\\") {
        let without_prefix = &path_str[2..];
        return PathBuf::from(format!(r"\\?\UNC{}", without_prefix));
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        // The path may not exist yet (destination), so canonicalize can fail;
        // fall back to joining with the current directory.
        match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(_) => match std::env::current_dir() {
                Ok(cwd) => cwd.join(path),
                Err(_) => path.to_path_buf(),
            },
        }
    };

    PathBuf::from(format!(r"\\?\{}", absolute_path.display()))
}
