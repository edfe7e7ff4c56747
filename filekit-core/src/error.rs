use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

impl FileSystemError {
    /// True for the two domain "not found" kinds. A raw `Io` error is never
    /// reported as not found, whatever its kind.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FileSystemError::DirectoryNotFound(_) | FileSystemError::FileNotFound(_)
        )
    }

    pub(crate) fn file_io(err: io::Error, path: &str) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            FileSystemError::FileNotFound(path.to_string())
        } else {
            FileSystemError::Io(err)
        }
    }

    pub(crate) fn directory_io(err: io::Error, path: &str) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            FileSystemError::DirectoryNotFound(path.to_string())
        } else {
            FileSystemError::Io(err)
        }
    }
}
