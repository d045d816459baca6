//! Configuration options for copy operations.
//!
//! # Example
//!
//! ```
//! use zcopy::CopyOptions;
//!
//! // Recreate symlinks instead of copying their targets
//! let options = CopyOptions::default().without_follow_symlinks();
//! assert!(!options.follow_symlinks);
//! ```

/// Options for [`copy_file_with`](crate::copy_file_with).
///
/// Use [`Default::default()`] to get the standard behavior, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `follow_symlinks` | `true` | Copy the target content of a symlinked source |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Whether to follow a symbolic link source (default: true)
    ///
    /// If false and the source is a symlink, an equivalent link is created
    /// at the destination instead of copying the file it points to.
    pub follow_symlinks: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
        }
    }
}

impl CopyOptions {
    /// Set whether symlinked sources are followed
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Recreate symlinks at the destination instead of copying their targets
    #[must_use]
    pub fn without_follow_symlinks(mut self) -> Self {
        self.follow_symlinks = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_follows_symlinks() {
        assert!(CopyOptions::default().follow_symlinks);
    }

    #[test]
    fn test_builder() {
        assert!(!CopyOptions::default().without_follow_symlinks().follow_symlinks);
        assert!(CopyOptions::default().with_follow_symlinks(true).follow_symlinks);
    }
}
