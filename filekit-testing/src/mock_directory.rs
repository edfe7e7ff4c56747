use crate::forced_failure;
use filekit_core::path;
use filekit_core::{Directory, FileSystemError, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

/// Everything a [`MockDirectory`] can be seeded with. Only `path` is
/// required when deserializing; every other field falls back to its
/// default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockDirectoryConfig {
    pub path: String,
    #[serde(default)]
    pub contained_files: BTreeSet<String>,
    /// Contents keyed by file name. Names listed here count as contained.
    #[serde(default)]
    pub file_contents: BTreeMap<String, String>,
    #[serde(default)]
    pub subdirectories: Vec<MockDirectoryConfig>,
    #[serde(default)]
    pub throw_error: bool,
    /// Overrides the extension derived from the name.
    #[serde(default)]
    pub extension: Option<String>,
}

impl MockDirectoryConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MockDirectoryState {
    contained_files: BTreeSet<String>,
    file_contents: BTreeMap<String, String>,
    subdirectories: Vec<MockDirectory>,
    did_delete: bool,
    moved_to_parent: Option<String>,
}

/// In-memory [`Directory`] that records what was done to it.
///
/// Children are owned by value. Lookups hand out clones, so changes made
/// through a returned child are not seen by its parent. State lives in a
/// `RefCell`, which keeps the mock on a single thread.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "MockDirectoryConfig")]
pub struct MockDirectory {
    path: String,
    extension: Option<String>,
    throw_error: bool,
    state: RefCell<MockDirectoryState>,
}

impl From<MockDirectoryConfig> for MockDirectory {
    fn from(config: MockDirectoryConfig) -> Self {
        let mut contained_files = config.contained_files;
        contained_files.extend(config.file_contents.keys().cloned());

        Self {
            path: path::normalize(&config.path),
            extension: config.extension,
            throw_error: config.throw_error,
            state: RefCell::new(MockDirectoryState {
                contained_files,
                file_contents: config.file_contents,
                subdirectories: config.subdirectories.into_iter().map(Self::from).collect(),
                ..Default::default()
            }),
        }
    }
}

impl MockDirectory {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_config(MockDirectoryConfig::new(path))
    }

    pub fn with_config(config: MockDirectoryConfig) -> Self {
        Self::from(config)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn did_delete(&self) -> bool {
        self.state.borrow().did_delete
    }

    pub fn moved_to_parent(&self) -> Option<String> {
        self.state.borrow().moved_to_parent.clone()
    }

    pub fn contained_files(&self) -> BTreeSet<String> {
        self.state.borrow().contained_files.clone()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.throw_error {
            return Err(forced_failure(operation, &self.path));
        }
        Ok(())
    }

    fn has_child(&self, name: &str) -> bool {
        self.state
            .borrow()
            .subdirectories
            .iter()
            .any(|child| child.name() == name)
    }

    /// Runs `f` on the descendant reached by walking `segments`, failing on
    /// the first missing one.
    fn with_descendant<T>(
        &self,
        segments: &[&str],
        f: impl FnOnce(&MockDirectory) -> Result<T>,
    ) -> Result<T> {
        let Some((first, rest)) = segments.split_first() else {
            return f(self);
        };

        let state = self.state.borrow();
        let child = state
            .subdirectories
            .iter()
            .find(|child| child.name() == *first)
            .ok_or_else(|| FileSystemError::DirectoryNotFound(path::join(&self.path, first)))?;
        child.with_descendant(rest, f)
    }

    /// Walks `segments`, creating every missing level.
    fn ensure_descendant(&self, segments: &[&str]) -> Result<MockDirectory> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(self.clone());
        };

        let mut state = self.state.borrow_mut();
        let index = match state.subdirectories.iter().position(|child| child.name() == *first) {
            Some(index) => index,
            None => {
                if state.contained_files.contains(*first) {
                    return Err(already_exists(&path::join(&self.path, first)));
                }
                state
                    .subdirectories
                    .push(MockDirectory::new(path::join(&self.path, first)));
                state.subdirectories.len() - 1
            }
        };
        state.subdirectories[index].ensure_descendant(rest)
    }

    fn insert_child(&self, name: &str) -> Result<MockDirectory> {
        let child_path = path::join(&self.path, name);
        if self.has_child(name) || self.state.borrow().contained_files.contains(name) {
            return Err(already_exists(&child_path));
        }

        let child = MockDirectory::new(child_path);
        self.state.borrow_mut().subdirectories.push(child.clone());
        Ok(child)
    }

    fn collect_files(&self, extension: Option<&str>, recursive: bool, found: &mut Vec<String>) {
        let state = self.state.borrow();
        found.extend(
            state
                .contained_files
                .iter()
                .filter(|name| !self.has_child(name))
                .filter(|name| path::matches_extension(name, extension))
                .map(|name| path::join(&self.path, name)),
        );

        if recursive {
            for child in &state.subdirectories {
                child.collect_files(extension, true, found);
            }
        }
    }
}

fn segments(name: &str) -> Vec<&str> {
    name.split(path::SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn already_exists(path: &str) -> FileSystemError {
    FileSystemError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists", path),
    ))
}

impl Directory for MockDirectory {
    fn path(&self) -> &str {
        &self.path
    }

    fn extension(&self) -> Option<&str> {
        match &self.extension {
            Some(ext) => Some(ext.as_str()),
            None => path::extension_of(self.name()),
        }
    }

    fn subdirectories(&self) -> Vec<Box<dyn Directory>> {
        self.state
            .borrow()
            .subdirectories
            .iter()
            .map(|child| Box::new(child.clone()) as Box<dyn Directory>)
            .collect()
    }

    fn delete(&self) -> Result<()> {
        self.check("delete")?;
        self.state.borrow_mut().did_delete = true;
        Ok(())
    }

    fn move_to(&self, parent: &dyn Directory) -> Result<()> {
        self.check("move_to")?;
        self.state.borrow_mut().moved_to_parent = Some(parent.path().to_string());
        Ok(())
    }

    fn contains_file(&self, name: &str) -> bool {
        self.state.borrow().contained_files.contains(name) && !self.has_child(name)
    }

    fn subdirectory(&self, name: &str) -> Result<Box<dyn Directory>> {
        self.check("subdirectory")?;
        let segments = segments(name);
        if segments.is_empty() {
            return Err(FileSystemError::DirectoryNotFound(path::join(&self.path, name)));
        }
        self.with_descendant(&segments, |dir| Ok(Box::new(dir.clone()) as Box<dyn Directory>))
    }

    fn create_subdirectory(&self, name: &str) -> Result<Box<dyn Directory>> {
        self.check("create_subdirectory")?;
        let segments = segments(name);
        let Some((last, parents)) = segments.split_last() else {
            return Err(already_exists(&self.path));
        };
        let child = self.with_descendant(parents, |parent| parent.insert_child(last))?;
        Ok(Box::new(child))
    }

    fn create_subfolder_if_needed(&self, name: &str) -> Result<Box<dyn Directory>> {
        self.check("create_subfolder_if_needed")?;
        let child = self.ensure_descendant(&segments(name))?;
        Ok(Box::new(child))
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.check("delete_file")?;
        let mut state = self.state.borrow_mut();
        if !state.contained_files.remove(name) {
            return Err(FileSystemError::FileNotFound(path::join(&self.path, name)));
        }
        state.file_contents.remove(name);
        Ok(())
    }

    fn create_file(&self, name: &str, contents: &str) -> Result<String> {
        self.check("create_file")?;
        let file = path::join(&self.path, name);
        if self.has_child(name) {
            return Err(FileSystemError::Io(io::Error::other(format!(
                "{} is a directory",
                file
            ))));
        }

        let mut state = self.state.borrow_mut();
        state.contained_files.insert(name.to_string());
        state.file_contents.insert(name.to_string(), contents.to_string());
        Ok(file)
    }

    fn read_file(&self, name: &str) -> Result<String> {
        self.check("read_file")?;
        if !self.contains_file(name) {
            return Err(FileSystemError::FileNotFound(path::join(&self.path, name)));
        }
        Ok(self
            .state
            .borrow()
            .file_contents
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn find_files(&self, extension: Option<&str>, recursive: bool) -> Result<Vec<String>> {
        self.check("find_files")?;
        let mut found = Vec::new();
        self.collect_files(extension, recursive, &mut found);
        Ok(found)
    }
}
