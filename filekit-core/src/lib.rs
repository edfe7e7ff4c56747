//! File-system access behind two traits, [`Directory`] and [`FileSystem`],
//! so file-manipulating code can run against the real disk in production
//! and against the in-memory doubles from `filekit-testing` in tests.

mod atomic;
pub mod directory;
pub mod error;
pub mod fs;
pub mod path;
pub mod trash;

pub use directory::*;
pub use error::*;
pub use fs::*;
pub use trash::*;
