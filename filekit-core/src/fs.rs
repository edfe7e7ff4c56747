use crate::atomic::write_atomic;
use crate::directory::{Directory, RealDirectory};
use crate::error::{FileSystemError, Result};
use crate::path;
use crate::trash::Trash;
use std::path::Path;
use tracing::{debug, warn};

/// Top-level entry points: well-known directories, path resolution and
/// whole-file I/O.
pub trait FileSystem {
    fn home_directory(&self) -> Box<dyn Directory>;

    fn current_directory(&self) -> Box<dyn Directory>;

    /// Resolves `path` to a directory, failing with
    /// [`FileSystemError::DirectoryNotFound`] when nothing is there.
    fn directory(&self, path: &str) -> Result<Box<dyn Directory>>;

    fn desktop_directory(&self) -> Result<Box<dyn Directory>>;

    fn read_file(&self, path: &str) -> Result<String>;

    /// Creates or overwrites the file at `path`.
    fn write_file(&self, path: &str, contents: &str) -> Result<()>;

    fn move_to_trash(&self, path: &str) -> Result<()>;

    /// `current_directory` when `path` is `None`, otherwise `directory(path)`.
    fn directory_at_path_or_current(&self, path: Option<&str>) -> Result<Box<dyn Directory>> {
        match path {
            Some(path) => self.directory(path),
            None => Ok(self.current_directory()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RealFileSystem {
    trash: Trash,
}

impl RealFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trash(trash: Trash) -> Self {
        Self { trash }
    }

    pub fn trash(&self) -> &Trash {
        &self.trash
    }
}

impl FileSystem for RealFileSystem {
    fn home_directory(&self) -> Box<dyn Directory> {
        Box::new(RealDirectory::home())
    }

    fn current_directory(&self) -> Box<dyn Directory> {
        match std::env::current_dir() {
            Ok(dir) => Box::new(RealDirectory::from_path(&dir)),
            Err(e) => {
                warn!(error = %e, "Working directory unavailable, falling back to home");
                self.home_directory()
            }
        }
    }

    fn directory(&self, path: &str) -> Result<Box<dyn Directory>> {
        if !Path::new(path).is_dir() {
            return Err(FileSystemError::DirectoryNotFound(path.to_string()));
        }
        Ok(Box::new(RealDirectory::new(path)))
    }

    fn desktop_directory(&self) -> Result<Box<dyn Directory>> {
        let desktop = match dirs::desktop_dir() {
            Some(dir) => dir.to_string_lossy().into_owned(),
            None => path::join(self.home_directory().path(), "Desktop"),
        };
        self.directory(&desktop)
    }

    fn read_file(&self, path: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| FileSystemError::file_io(e, path))
    }

    fn write_file(&self, path: &str, contents: &str) -> Result<()> {
        write_atomic(Path::new(path), contents)?;
        debug!(path = %path, bytes = contents.len(), "Wrote file");
        Ok(())
    }

    fn move_to_trash(&self, path: &str) -> Result<()> {
        self.trash.put(path).map(|_| ())
    }
}
