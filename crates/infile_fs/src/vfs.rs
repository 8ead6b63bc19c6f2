//! Virtual File System backed by a single zip container
//!
//! Every operation resolves its path, checks preconditions, and only then
//! touches the container. Container failures surface as [`FsProblem::Generic`].

use crate::container::{Container, ContainerBuilder, ContainerOptions};
use crate::error::{ContainerError, FsProblem, Result};
use crate::path::{FsEntity, FsFileName, FsPath, ResolvedPath};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// File system facade over one archive
///
/// Owns the container exclusively. Calls on one instance are serialized by an
/// internal mutex; separate instances on the same archive are refused by the
/// container's lock file. `close` consumes the instance, dropping it without
/// closing flushes best-effort.
#[derive(Debug)]
pub struct VirtualFileSystem {
    container: Mutex<Container>,
}

impl VirtualFileSystem {
    /// Open (or create) the archive at `location` with default options
    pub fn open<P: AsRef<Path>>(location: P) -> std::result::Result<Self, ContainerError> {
        Self::with_options(location, ContainerOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(
        location: P,
        options: ContainerOptions,
    ) -> std::result::Result<Self, ContainerError> {
        let container = ContainerBuilder::new().options(options).open(location)?;
        Ok(Self::from_container(container))
    }

    pub fn from_container(container: Container) -> Self {
        Self {
            container: Mutex::new(container),
        }
    }

    /// Location of the backing archive
    pub fn archive_path(&self) -> PathBuf {
        self.container.lock().archive_path().to_path_buf()
    }

    /// Store `bytes` at a path that is not in use yet
    pub fn save(&self, path: &FsPath, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let local = resolve(path)?;
        let mut container = self.container.lock();

        ensure_not_reserved(&container, path, &local)?;
        write_new(&mut container, &local, bytes.into())?;

        tracing::debug!("Saved {}", local);
        Ok(())
    }

    /// Store the content of an external file at a path that is not in use yet
    pub fn save_file<P: AsRef<Path>>(&self, path: &FsPath, source: P) -> Result<()> {
        let source = source.as_ref();
        let local = resolve(path)?;
        let mut container = self.container.lock();

        ensure_not_reserved(&container, path, &local)?;
        if !source.exists() {
            return Err(FsProblem::FileNotFound(FsPath::new(
                source.display().to_string(),
            )));
        }

        let bytes = std::fs::read(source)?;
        let size = bytes.len();
        write_new(&mut container, &local, bytes)?;

        tracing::debug!("Saved {} from {:?} ({} bytes)", local, source, size);
        Ok(())
    }

    /// Add `bytes` to the end of an existing file
    pub fn append(&self, path: &FsPath, bytes: &[u8]) -> Result<()> {
        let local = resolve(path)?;
        let mut container = self.container.lock();

        ensure_exists(&container, path, &local)?;
        if let Some(parent) = local.parent() {
            container.create_dir_all(&parent)?;
        }
        container.append(&local, bytes)?;

        tracing::debug!("Appended {} bytes to {}", bytes.len(), local);
        Ok(())
    }

    /// Remove a file or an empty directory
    pub fn delete(&self, path: &FsPath) -> Result<()> {
        let local = resolve(path)?;
        let mut container = self.container.lock();

        ensure_exists(&container, path, &local)?;
        if container.is_dir(&local) && container.has_children(&local) {
            return Err(FsProblem::DirectoryIsNotEmpty(path.clone()));
        }
        container.remove(&local)?;

        tracing::info!("Deleted {}", local);
        Ok(())
    }

    /// Relocate a file or a whole directory to a path that is not in use yet
    pub fn move_to(&self, path: &FsPath, new_path: &FsPath) -> Result<()> {
        let from = resolve(path)?;
        let to = resolve(new_path)?;
        let mut container = self.container.lock();

        relocate(&mut container, (path, &from), (new_path, &to))
    }

    /// Give a node a new final segment inside the same parent directory
    pub fn rename(&self, path: &FsPath, new_name: &FsFileName) -> Result<()> {
        if !new_name.is_valid() {
            return Err(FsProblem::PathNotValid(FsPath::new(new_name.as_str())));
        }
        let from = resolve(path)?;
        let parent = from
            .parent()
            .ok_or_else(|| FsProblem::PathNotValid(path.clone()))?;
        let to = parent.join(new_name.as_str());
        let new_path = FsPath::from(&to);
        let mut container = self.container.lock();

        relocate(&mut container, (path, &from), (&new_path, &to))
    }

    /// Full content of a file
    pub fn read(&self, path: &FsPath) -> Result<Vec<u8>> {
        let local = resolve(path)?;
        let mut container = self.container.lock();

        ensure_exists(&container, path, &local)?;
        if container.is_dir(&local) {
            return Err(FsProblem::ReadDirectory(path.clone()));
        }

        Ok(container.read(&local)?)
    }

    /// Immediate children of a directory
    pub fn ls(&self, path: &FsPath) -> Result<Vec<FsEntity>> {
        let local = resolve(path)?;
        let container = self.container.lock();

        ensure_exists(&container, path, &local)?;
        if !container.is_dir(&local) {
            return Err(FsProblem::PathIsNotDirectory(path.clone()));
        }

        Ok(container.children(&local)?)
    }

    /// Every node in the tree, the root included
    pub fn all_entities(&self) -> Result<Vec<FsEntity>> {
        Ok(self.container.lock().walk())
    }

    pub fn exists(&self, path: &FsPath) -> Result<bool> {
        let local = resolve(path)?;
        Ok(self.container.lock().exists(&local))
    }

    /// Write pending changes to the archive without closing it
    pub fn flush(&self) -> Result<()> {
        Ok(self.container.lock().flush()?)
    }

    /// Flush and release the archive
    pub fn close(self) -> Result<()> {
        Ok(self.container.into_inner().close()?)
    }
}

fn resolve(path: &FsPath) -> Result<ResolvedPath> {
    ResolvedPath::parse(path.as_str()).map_err(|_| FsProblem::PathNotValid(path.clone()))
}

fn ensure_exists(container: &Container, path: &FsPath, local: &ResolvedPath) -> Result<()> {
    if !container.exists(local) {
        return Err(FsProblem::PathDoesNotExist(path.clone()));
    }
    Ok(())
}

fn ensure_not_reserved(container: &Container, path: &FsPath, local: &ResolvedPath) -> Result<()> {
    if container.exists(local) {
        return Err(FsProblem::PathAlreadyReserved(path.clone()));
    }
    Ok(())
}

fn write_new(container: &mut Container, local: &ResolvedPath, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = local.parent() {
        container.create_dir_all(&parent)?;
    }
    container.write_new(local, bytes)?;
    Ok(())
}

fn relocate(
    container: &mut Container,
    (path, from): (&FsPath, &ResolvedPath),
    (new_path, to): (&FsPath, &ResolvedPath),
) -> Result<()> {
    ensure_exists(container, path, from)?;
    ensure_not_reserved(container, new_path, to)?;
    if from.is_root() {
        return Err(ContainerError::RootImmutable.into());
    }
    if to.starts_with(from) {
        return Err(ContainerError::InvalidMove {
            from: from.to_string(),
            to: to.to_string(),
        }
        .into());
    }

    if let Some(parent) = to.parent() {
        container.create_dir_all(&parent)?;
    }
    container.rename(from, to)?;

    tracing::info!("Moved {} -> {}", from, to);
    Ok(())
}
