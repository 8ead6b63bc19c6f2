//! Error types: fatal container failures and the facade's problem taxonomy

use crate::path::FsPath;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the container handle itself
///
/// Surfaced directly when a container cannot be opened; the facade folds
/// everything else into [`FsProblem::Generic`].
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive is locked by another handle: {0}")]
    Locked(PathBuf),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("Corrupted entry name in archive: {0}")]
    CorruptedEntry(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Cannot move {from} into its own subtree {to}")]
    InvalidMove { from: String, to: String },

    #[error("The root directory cannot be removed or moved")]
    RootImmutable,
}

/// Closed set of problems a file system operation can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsProblem {
    #[error("Path is not valid: {0}")]
    PathNotValid(FsPath),

    #[error("Source file not found: {0}")]
    FileNotFound(FsPath),

    #[error("Path is already reserved: {0}")]
    PathAlreadyReserved(FsPath),

    #[error("Path does not exist: {0}")]
    PathDoesNotExist(FsPath),

    #[error("Path is not a directory: {0}")]
    PathIsNotDirectory(FsPath),

    #[error("Cannot read a directory: {0}")]
    ReadDirectory(FsPath),

    #[error("Directory is not empty: {0}")]
    DirectoryIsNotEmpty(FsPath),

    #[error("{0}")]
    Generic(String),
}

impl FsProblem {
    /// The offending path, if this problem carries one
    pub fn path(&self) -> Option<&FsPath> {
        match self {
            FsProblem::PathNotValid(p)
            | FsProblem::FileNotFound(p)
            | FsProblem::PathAlreadyReserved(p)
            | FsProblem::PathDoesNotExist(p)
            | FsProblem::PathIsNotDirectory(p)
            | FsProblem::ReadDirectory(p)
            | FsProblem::DirectoryIsNotEmpty(p) => Some(p),
            FsProblem::Generic(_) => None,
        }
    }
}

impl From<ContainerError> for FsProblem {
    fn from(e: ContainerError) -> Self {
        FsProblem::Generic(e.to_string())
    }
}

impl From<std::io::Error> for FsProblem {
    fn from(e: std::io::Error) -> Self {
        FsProblem::Generic(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FsProblem>;
