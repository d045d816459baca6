//! # zcopy
//!
//! Zero-copy file copying with transparent kernel fast paths and a safe
//! fallback.
//!
//! [`copy_file`] is a drop-in replacement for a naive read/write copy loop.
//! It transparently uses the fastest kernel-assisted copy mechanism on the
//! running platform and guarantees a correct result on platforms or file
//! types where that mechanism is unavailable or fails:
//!
//! | Platform | Fast path | Notes |
//! |----------|-----------|-------|
//! | Linux | `sendfile(2)` | fd-to-fd in-kernel transfer, looped to EOF |
//! | macOS | `fcopyfile(2)` | whole-file copy syscall |
//! | Windows | `CopyFileW` | native copy API, long-path aware |
//! | everywhere | buffered read/write loop | last resort, cannot decline |
//!
//! ## Quick Start
//!
//! ```no_run
//! zcopy::copy_file("data.bin", "backup/data.bin")?;
//! # Ok::<(), zcopy::Error>(())
//! ```
//!
//! Recreate symlinks instead of following them:
//!
//! ```no_run
//! use zcopy::CopyOptions;
//!
//! let options = CopyOptions::default().without_follow_symlinks();
//! zcopy::copy_file_with("link", "link-copy", &options)?;
//! # Ok::<(), zcopy::Error>(())
//! ```
//!
//! ## Guarantees
//!
//! - **All-or-nothing outcome**: on success the destination is byte-for-byte
//!   identical to the source as it existed when the copy started; on failure
//!   the error propagates unchanged with the offending path attached.
//! - **Silent, safe fallback**: a mechanism that rejects an input before any
//!   byte moved hands over to the next mechanism (finally the read/write
//!   loop) with the destination still clean. A failure after bytes moved is
//!   final; no mechanism resumes from another's partial state.
//! - **Full disks fail loudly**: `ENOSPC` is never absorbed by the fallback
//!   chain, because data truncation is already in progress when it fires.
//! - **Capability memoization**: whether a mechanism works here is determined
//!   once per process by a harmless trial invocation, not by kernel version
//!   sniffing, and a mechanism observed to hard-fail during real use is never
//!   retried.
//!
//! Each copy runs synchronously to completion on the calling thread. The
//! only process-wide state is the capability cache, which is lock-free and
//! safe to touch from any number of threads.
//!
//! ## What zcopy does not do
//!
//! Permissions, timestamps, extended attributes and ACLs are left to the
//! caller, as is directory traversal: the unit of work is one regular file.
//! A failed copy's partial destination is kept for inspection, not deleted.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with the tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(any(target_os = "linux", target_os = "macos"))]
mod capability;
mod classify;
mod copy;
mod error;
#[cfg_attr(windows, allow(dead_code))]
mod fallback;
mod options;
mod strategy;
mod utils;

pub use classify::is_no_space_error;
pub use copy::{copy_file, copy_file_with};
pub use error::{Error, Result};
pub use options::CopyOptions;
