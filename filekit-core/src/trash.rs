use crate::error::{FileSystemError, Result};
use crate::path::SEPARATOR;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const TRASHINFO_EXTENSION: &str = "trashinfo";
pub const TRASHINFO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Items are moved straight into the trash root (macOS `~/.Trash`).
    Flat,
    /// freedesktop.org home trash: `files/` plus `info/*.trashinfo`.
    Freedesktop,
}

/// A trash can items are moved into instead of being deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trash {
    root: PathBuf,
    layout: Layout,
}

impl Trash {
    /// The current user's trash for this platform.
    pub fn platform_default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        if cfg!(target_os = "macos") {
            Self {
                root: home.join(".Trash"),
                layout: Layout::Flat,
            }
        } else {
            let data = dirs::data_local_dir().unwrap_or_else(|| home.join(".local").join("share"));
            Self::at(data.join("Trash"))
        }
    }

    /// A freedesktop-style trash rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: Layout::Freedesktop,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn files_dir(&self) -> PathBuf {
        match self.layout {
            Layout::Flat => self.root.clone(),
            Layout::Freedesktop => self.root.join("files"),
        }
    }

    fn info_dir(&self) -> PathBuf {
        self.root.join("info")
    }

    /// Moves the item at `path` into the trash and returns where it landed.
    pub fn put(&self, path: &str) -> Result<PathBuf> {
        let trimmed = path.trim_end_matches(SEPARATOR);
        let source = Path::new(if trimmed.is_empty() { path } else { trimmed });
        fs::symlink_metadata(source).map_err(|e| FileSystemError::file_io(e, path))?;

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("Cannot trash {}", path))
            })?;

        let files = self.files_dir();
        fs::create_dir_all(&files)?;

        let destination = match self.layout {
            Layout::Flat => {
                let name = self.unique_name(&file_name);
                let destination = files.join(name);
                fs::rename(source, &destination)?;
                destination
            }
            Layout::Freedesktop => {
                let info = self.info_dir();
                fs::create_dir_all(&info)?;

                let name = self.unique_name(&file_name);
                let info_file = info.join(format!("{}.{}", name, TRASHINFO_EXTENSION));
                let destination = files.join(&name);

                let original = std::path::absolute(source)?;
                fs::write(&info_file, trash_info(&original.to_string_lossy()))?;
                if let Err(e) = fs::rename(source, &destination) {
                    let _ = fs::remove_file(&info_file);
                    return Err(e.into());
                }
                destination
            }
        };

        debug!(from = %path, to = %destination.display(), "Moved item to trash");
        Ok(destination)
    }

    /// `name`, or `name.<uuid>` when something by that name is already in
    /// the trash.
    fn unique_name(&self, name: &str) -> String {
        if !self.is_taken(name) {
            return name.to_string();
        }
        loop {
            let candidate = format!("{}.{}", name, Uuid::new_v4().simple());
            if !self.is_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn is_taken(&self, name: &str) -> bool {
        if self.files_dir().join(name).symlink_metadata().is_ok() {
            return true;
        }
        self.layout == Layout::Freedesktop
            && self
                .info_dir()
                .join(format!("{}.{}", name, TRASHINFO_EXTENSION))
                .exists()
    }
}

impl Default for Trash {
    fn default() -> Self {
        Self::platform_default()
    }
}

fn trash_info(original: &str) -> String {
    let deleted_at = chrono::Local::now().format(TRASHINFO_TIME_FORMAT);
    format!(
        "[Trash Info]\nPath={}\nDeletionDate={}\n",
        encode_trash_path(original),
        deleted_at
    )
}

/// Percent-encodes everything outside the unreserved set, keeping `/`.
fn encode_trash_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
