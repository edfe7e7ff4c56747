use crate::atomic::write_atomic;
use crate::error::{FileSystemError, Result};
use crate::path::{self, SEPARATOR};
use ignore::WalkBuilder;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// One directory node: identity, navigation and mutation of its files and
/// subfolders.
///
/// Implementations are not synchronized. Concurrent mutation of the same
/// path from several callers races at the OS level, so callers must keep a
/// single writer per path.
pub trait Directory {
    /// Absolute path, always ending with exactly one separator.
    fn path(&self) -> &str;

    /// Last path component, without the trailing separator.
    fn name(&self) -> &str {
        path::last_component(self.path())
    }

    fn extension(&self) -> Option<&str> {
        path::extension_of(self.name())
    }

    /// Immediate child directories.
    fn subdirectories(&self) -> Vec<Box<dyn Directory>>;

    /// Removes this directory and everything beneath it.
    fn delete(&self) -> Result<()>;

    /// Moves this directory into `parent`, keeping its name.
    fn move_to(&self, parent: &dyn Directory) -> Result<()>;

    /// Whether a non-directory entry called `name` exists here. Never fails.
    fn contains_file(&self, name: &str) -> bool;

    fn subdirectory(&self, name: &str) -> Result<Box<dyn Directory>>;

    /// Creates exactly one new directory level. Fails if anything called
    /// `name` already exists or if intermediate segments are missing.
    fn create_subdirectory(&self, name: &str) -> Result<Box<dyn Directory>>;

    /// Returns the existing subdirectory unchanged, or creates it together
    /// with any missing intermediate segments.
    fn create_subfolder_if_needed(&self, name: &str) -> Result<Box<dyn Directory>>;

    fn delete_file(&self, name: &str) -> Result<()>;

    /// Creates or overwrites a file and returns its absolute path.
    fn create_file(&self, name: &str, contents: &str) -> Result<String>;

    fn read_file(&self, name: &str) -> Result<String>;

    /// Absolute paths of files whose extension equals `extension` (all files
    /// when `None`). Recursive results come in no particular order.
    fn find_files(&self, extension: Option<&str>, recursive: bool) -> Result<Vec<String>>;

    fn contains_subdirectory(&self, name: &str) -> bool {
        self.subdirectory(name).is_ok()
    }
}

impl fmt::Debug for dyn Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory").field("path", &self.path()).finish()
    }
}

/// A directory on disk. Every operation goes straight to the OS; nothing
/// is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RealDirectory {
    path: String,
}

impl RealDirectory {
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: path::normalize(path.as_ref()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    pub fn temporary() -> Self {
        Self::from_path(&std::env::temp_dir())
    }

    pub fn home() -> Self {
        match dirs::home_dir() {
            Some(home) => Self::from_path(&home),
            None => {
                warn!("Home directory unavailable, falling back to filesystem root");
                Self::new(SEPARATOR.to_string())
            }
        }
    }

    fn child_path(&self, name: &str) -> String {
        path::join(&self.path, name)
    }

    /// Path without the trailing separator, as handed to rename-style calls.
    fn os_path(&self) -> &str {
        let trimmed = self.path.trim_end_matches(SEPARATOR);
        if trimmed.is_empty() { &self.path } else { trimmed }
    }
}

fn is_dir(path: &str) -> bool {
    Path::new(path).is_dir()
}

fn walk_error(err: ignore::Error) -> FileSystemError {
    let message = err.to_string();
    FileSystemError::Io(err.into_io_error().unwrap_or_else(|| io::Error::other(message)))
}

impl Directory for RealDirectory {
    fn path(&self) -> &str {
        &self.path
    }

    fn subdirectories(&self) -> Vec<Box<dyn Directory>> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let child = self.child_path(&entry.file_name().to_string_lossy());
                if is_dir(&child) {
                    Some(Box::new(RealDirectory::new(child)) as Box<dyn Directory>)
                } else {
                    None
                }
            })
            .collect()
    }

    fn delete(&self) -> Result<()> {
        fs::remove_dir_all(self.os_path())?;
        debug!(path = %self.path, "Deleted directory");
        Ok(())
    }

    fn move_to(&self, parent: &dyn Directory) -> Result<()> {
        let destination = path::join(parent.path(), self.name());
        fs::rename(self.os_path(), &destination)?;
        debug!(from = %self.path, to = %destination, "Moved directory");
        Ok(())
    }

    fn contains_file(&self, name: &str) -> bool {
        fs::metadata(self.child_path(name))
            .map(|metadata| !metadata.is_dir())
            .unwrap_or(false)
    }

    fn subdirectory(&self, name: &str) -> Result<Box<dyn Directory>> {
        let child = self.child_path(name);
        if !is_dir(&child) {
            return Err(FileSystemError::DirectoryNotFound(child));
        }
        Ok(Box::new(RealDirectory::new(child)))
    }

    fn create_subdirectory(&self, name: &str) -> Result<Box<dyn Directory>> {
        let child = self.child_path(name);
        fs::create_dir(&child).map_err(|e| FileSystemError::directory_io(e, &child))?;
        debug!(path = %child, "Created directory");
        Ok(Box::new(RealDirectory::new(child)))
    }

    fn create_subfolder_if_needed(&self, name: &str) -> Result<Box<dyn Directory>> {
        let child = self.child_path(name);
        if !is_dir(&child) {
            fs::create_dir_all(&child)?;
            debug!(path = %child, "Created directory");
        }
        Ok(Box::new(RealDirectory::new(child)))
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let file = self.child_path(name);
        fs::remove_file(&file).map_err(|e| FileSystemError::file_io(e, &file))?;
        debug!(path = %file, "Deleted file");
        Ok(())
    }

    fn create_file(&self, name: &str, contents: &str) -> Result<String> {
        let file = self.child_path(name);
        write_atomic(Path::new(&file), contents)?;
        debug!(path = %file, bytes = contents.len(), "Wrote file");
        Ok(file)
    }

    fn read_file(&self, name: &str) -> Result<String> {
        let file = self.child_path(name);
        if !Path::new(&file).exists() {
            return Err(FileSystemError::FileNotFound(file));
        }
        fs::read_to_string(&file).map_err(|e| FileSystemError::file_io(e, &file))
    }

    fn find_files(&self, extension: Option<&str>, recursive: bool) -> Result<Vec<String>> {
        if !is_dir(&self.path) {
            return Err(FileSystemError::DirectoryNotFound(self.path.clone()));
        }

        let mut results = Vec::new();

        if recursive {
            for entry in WalkBuilder::new(&self.path).standard_filters(false).build() {
                let entry = entry.map_err(walk_error)?;
                if entry.depth() == 0 || entry.path().is_dir() {
                    continue;
                }
                if path::matches_extension(&entry.file_name().to_string_lossy(), extension) {
                    results.push(entry.path().to_string_lossy().into_owned());
                }
            }
        } else {
            for entry in fs::read_dir(&self.path)? {
                let name = entry?.file_name().to_string_lossy().into_owned();
                let full = self.child_path(&name);
                if is_dir(&full) {
                    continue;
                }
                if path::matches_extension(&name, extension) {
                    results.push(full);
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_added() {
        assert_eq!(RealDirectory::new("/tmp/test").path(), "/tmp/test/");
    }

    #[test]
    fn test_trailing_separator_preserved() {
        assert_eq!(RealDirectory::new("/tmp/test/").path(), "/tmp/test/");
    }

    #[test]
    fn test_name_derived() {
        assert_eq!(RealDirectory::new("/tmp/myFolder").name(), "myFolder");
    }

    #[test]
    fn test_extension_extracted() {
        assert_eq!(RealDirectory::new("/tmp/archive.zip").extension(), Some("zip"));
        assert_eq!(RealDirectory::new("/tmp/folder").extension(), None);
    }

    #[test]
    fn test_os_path_strips_separator() {
        assert_eq!(RealDirectory::new("/tmp/test").os_path(), "/tmp/test");
        assert_eq!(RealDirectory::new("/").os_path(), "/");
    }
}
