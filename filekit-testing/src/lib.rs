//! In-memory doubles for the `filekit-core` traits.
//!
//! Both doubles keep their state in `RefCell`s and are meant for
//! single-threaded tests. Setting `throw_error` makes every fallible
//! operation fail with an opaque [`FileSystemError::Io`], independent of the
//! seeded fixtures.

pub mod mock_directory;
pub mod mock_file_system;

pub use mock_directory::*;
pub use mock_file_system::*;

use filekit_core::FileSystemError;
use std::io;
use tracing::debug;

pub(crate) fn forced_failure(operation: &str, path: &str) -> FileSystemError {
    debug!(operation, path, "Forced mock failure");
    FileSystemError::Io(io::Error::other(format!(
        "forced failure in {} for {}",
        operation, path
    )))
}
