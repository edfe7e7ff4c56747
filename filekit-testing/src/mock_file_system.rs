use crate::forced_failure;
use crate::mock_directory::MockDirectory;
use filekit_core::path;
use filekit_core::{Directory, FileSystem, FileSystemError, Result};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

pub const DEFAULT_HOME: &str = "/mock/home";
pub const DEFAULT_CURRENT: &str = "/mock/home/current";

/// Seed state for a [`MockFileSystem`]. Missing JSON fields take the values
/// from [`Default`].
///
/// Every directory slot holds a [`MockDirectory`] rather than an arbitrary
/// [`Directory`], so the whole config deserializes from a fixture and each
/// lookup can hand out a clone of the seeded tree. Build the tree with
/// [`MockDirectory::with_config`] to give a slot files and children.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MockFileSystemConfig {
    pub home_directory: MockDirectory,
    pub current_directory: MockDirectory,
    /// Returned for any lookup that `directory_map` does not answer.
    pub directory_to_load: Option<MockDirectory>,
    pub directory_map: HashMap<String, MockDirectory>,
    pub desktop: Option<MockDirectory>,
    pub file_contents_to_read: HashMap<String, String>,
    pub throw_error: bool,
}

impl Default for MockFileSystemConfig {
    fn default() -> Self {
        Self {
            home_directory: MockDirectory::new(DEFAULT_HOME),
            current_directory: MockDirectory::new(DEFAULT_CURRENT),
            directory_to_load: None,
            directory_map: HashMap::new(),
            desktop: None,
            file_contents_to_read: HashMap::new(),
            throw_error: false,
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    file_contents: HashMap<String, String>,
    captured_paths: Vec<String>,
    written_file_path: Option<String>,
    written_file_contents: Option<String>,
    path_to_move_to_trash: Option<String>,
}

/// In-memory [`FileSystem`] serving pre-seeded directories and files while
/// recording every lookup, write and trash request.
#[derive(Debug)]
pub struct MockFileSystem {
    home_directory: MockDirectory,
    current_directory: MockDirectory,
    directory_to_load: Option<MockDirectory>,
    directory_map: HashMap<String, MockDirectory>,
    desktop: Option<MockDirectory>,
    throw_error: bool,
    recorded: RefCell<Recorded>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_config(MockFileSystemConfig::default())
    }

    pub fn with_config(config: MockFileSystemConfig) -> Self {
        Self {
            home_directory: config.home_directory,
            current_directory: config.current_directory,
            directory_to_load: config.directory_to_load,
            directory_map: config.directory_map,
            desktop: config.desktop,
            throw_error: config.throw_error,
            recorded: RefCell::new(Recorded {
                file_contents: config.file_contents_to_read,
                ..Default::default()
            }),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: MockFileSystemConfig = serde_json::from_str(json)?;
        Ok(Self::with_config(config))
    }

    /// Paths of successful `directory` lookups, oldest first.
    pub fn captured_paths(&self) -> Vec<String> {
        self.recorded.borrow().captured_paths.clone()
    }

    pub fn written_file_path(&self) -> Option<String> {
        self.recorded.borrow().written_file_path.clone()
    }

    pub fn written_file_contents(&self) -> Option<String> {
        self.recorded.borrow().written_file_contents.clone()
    }

    pub fn path_to_move_to_trash(&self) -> Option<String> {
        self.recorded.borrow().path_to_move_to_trash.clone()
    }

    fn check(&self, operation: &str, path: &str) -> Result<()> {
        if self.throw_error {
            return Err(forced_failure(operation, path));
        }
        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn home_directory(&self) -> Box<dyn Directory> {
        Box::new(self.home_directory.clone())
    }

    fn current_directory(&self) -> Box<dyn Directory> {
        Box::new(self.current_directory.clone())
    }

    fn directory(&self, path: &str) -> Result<Box<dyn Directory>> {
        self.check("directory", path)?;

        let found = self
            .directory_map
            .get(path)
            .or(self.directory_to_load.as_ref())
            .cloned()
            .ok_or_else(|| FileSystemError::DirectoryNotFound(path.to_string()))?;

        self.recorded.borrow_mut().captured_paths.push(path.to_string());
        Ok(Box::new(found))
    }

    fn desktop_directory(&self) -> Result<Box<dyn Directory>> {
        let desktop_path = path::join(self.home_directory.path(), "Desktop");
        self.check("desktop_directory", &desktop_path)?;

        match &self.desktop {
            Some(desktop) => Ok(Box::new(desktop.clone())),
            None => self.directory(&desktop_path),
        }
    }

    fn read_file(&self, path: &str) -> Result<String> {
        self.check("read_file", path)?;
        self.recorded
            .borrow()
            .file_contents
            .get(path)
            .cloned()
            .ok_or_else(|| FileSystemError::FileNotFound(path.to_string()))
    }

    fn write_file(&self, path: &str, contents: &str) -> Result<()> {
        self.check("write_file", path)?;
        let mut recorded = self.recorded.borrow_mut();
        recorded.written_file_path = Some(path.to_string());
        recorded.written_file_contents = Some(contents.to_string());
        recorded
            .file_contents
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn move_to_trash(&self, path: &str) -> Result<()> {
        self.check("move_to_trash", path)?;
        let mut recorded = self.recorded.borrow_mut();
        recorded.path_to_move_to_trash = Some(path.to_string());
        recorded.file_contents.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_directory::MockDirectoryConfig;

    #[test]
    fn test_defaults() {
        let fs = MockFileSystem::default();

        assert_eq!(fs.home_directory().path(), "/mock/home/");
        assert_eq!(fs.current_directory().path(), "/mock/home/current/");
    }

    #[test]
    fn test_desktop_falls_back_to_home_desktop_lookup() {
        let mut config = MockFileSystemConfig::default();
        config
            .directory_map
            .insert("/mock/home/Desktop".to_string(), MockDirectory::new("/mock/home/Desktop"));
        let fs = MockFileSystem::with_config(config);

        let desktop = fs.desktop_directory().unwrap();

        assert_eq!(desktop.name(), "Desktop");
        assert_eq!(fs.captured_paths(), vec!["/mock/home/Desktop".to_string()]);
    }

    #[test]
    fn test_seeded_trees_are_served_through_the_trait() {
        let tree = MockDirectory::with_config(MockDirectoryConfig {
            path: "/seeded".to_string(),
            file_contents: [("notes.txt".to_string(), "hi".to_string())].into(),
            subdirectories: vec![MockDirectoryConfig::new("/seeded/inner")],
            ..Default::default()
        });
        let mut config = MockFileSystemConfig {
            home_directory: tree.clone(),
            directory_to_load: Some(tree.clone()),
            ..Default::default()
        };
        config.directory_map.insert("/mapped".to_string(), tree);
        let fs = MockFileSystem::with_config(config);

        for dir in [
            fs.home_directory(),
            fs.directory("/mapped").unwrap(),
            fs.directory("/elsewhere").unwrap(),
        ] {
            assert_eq!(dir.read_file("notes.txt").unwrap(), "hi");
            assert!(dir.contains_subdirectory("inner"));
        }
    }

    #[test]
    fn test_desktop_without_configuration_fails() {
        let fs = MockFileSystem::new();

        assert!(matches!(
            fs.desktop_directory(),
            Err(FileSystemError::DirectoryNotFound(_))
        ));
    }
}
