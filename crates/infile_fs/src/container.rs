//! Container handle: a zip archive on disk exposed as a mutable tree
//!
//! The central directory is indexed at open time; file contents stay in the
//! archive until they are modified. Mutations are applied to the in-memory
//! tree and written back as a fresh store-only archive on flush/close.

use crate::error::ContainerError;
use crate::path::{FsEntity, ResolvedPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

type Result<T> = std::result::Result<T, ContainerError>;

const ROOT: &str = "/";

/// How a container is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// Create an empty archive when the location does not exist
    pub create: bool,
    /// Guard the archive with a `<archive>.lock` file while open
    pub lock: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            create: true,
            lock: true,
        }
    }
}

/// Opens or creates containers
#[derive(Debug, Clone, Default)]
pub struct ContainerBuilder {
    options: ContainerOptions,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.options.create = create;
        self
    }

    pub fn lock(mut self, lock: bool) -> Self {
        self.options.lock = lock;
        self
    }

    /// Open the archive at `location`, creating it if allowed
    pub fn open<P: AsRef<Path>>(&self, location: P) -> Result<Container> {
        let archive_path = location.as_ref().to_path_buf();
        let exists = archive_path.exists();

        if !exists && !self.options.create {
            return Err(ContainerError::ArchiveNotFound(archive_path));
        }

        let lock = if self.options.lock {
            Some(LockFile::acquire(&archive_path)?)
        } else {
            None
        };

        if !exists {
            write_empty_archive(&archive_path)?;
            tracing::info!("Created empty archive at {:?}", archive_path);
        } else if fs::metadata(&archive_path)?.len() == 0 {
            write_empty_archive(&archive_path)?;
            tracing::debug!("Initialized zero-length file {:?} as archive", archive_path);
        }

        let mut archive = ZipArchive::new(File::open(&archive_path)?)?;
        let nodes = load_index(&mut archive)?;

        tracing::debug!(
            "Opened archive {:?} with {} entries",
            archive_path,
            nodes.len() - 1
        );

        Ok(Container {
            archive_path,
            archive,
            nodes,
            dirty: false,
            closed: false,
            _lock: lock,
        })
    }
}

/// Where the bytes of a file node currently live
enum Content {
    /// Untouched entry of the on-disk archive
    Archived { index: usize, size: u64 },
    /// New or modified content waiting for the next flush
    Buffered(Vec<u8>),
}

impl Content {
    fn size(&self) -> u64 {
        match self {
            Content::Archived { size, .. } => *size,
            Content::Buffered(bytes) => bytes.len() as u64,
        }
    }
}

enum Node {
    Directory,
    File(Content),
}

/// Live handle to one archive
///
/// Keys of the node map are normalized absolute paths; the root `/` is
/// always present. Not safe to share between threads without a lock.
pub struct Container {
    archive_path: PathBuf,
    archive: ZipArchive<File>,
    nodes: BTreeMap<String, Node>,
    dirty: bool,
    closed: bool,
    _lock: Option<LockFile>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("archive_path", &self.archive_path)
            .field("nodes", &self.nodes.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Container {
    /// Location of the backing archive
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// `true` if there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn exists(&self, path: &ResolvedPath) -> bool {
        self.nodes.contains_key(path.as_str())
    }

    pub fn is_dir(&self, path: &ResolvedPath) -> bool {
        matches!(self.nodes.get(path.as_str()), Some(Node::Directory))
    }

    /// Immediate children of a directory, in path order
    pub fn children(&self, dir: &ResolvedPath) -> Result<Vec<FsEntity>> {
        match self.nodes.get(dir.as_str()) {
            None => return Err(ContainerError::NotFound(dir.to_string())),
            Some(Node::File(_)) => return Err(ContainerError::NotADirectory(dir.to_string())),
            Some(Node::Directory) => {}
        }

        Ok(self
            .direct_children(dir)
            .map(|(key, node)| to_entity(key, node))
            .collect())
    }

    /// `true` if the directory has at least one direct child
    pub fn has_children(&self, dir: &ResolvedPath) -> bool {
        self.direct_children(dir).next().is_some()
    }

    /// Every node, root first, then in path order
    pub fn walk(&self) -> Vec<FsEntity> {
        self.nodes
            .iter()
            .map(|(key, node)| to_entity(key, node))
            .collect()
    }

    /// Full content of a file node
    pub fn read(&mut self, path: &ResolvedPath) -> Result<Vec<u8>> {
        let (index, size) = match self.nodes.get(path.as_str()) {
            None => return Err(ContainerError::NotFound(path.to_string())),
            Some(Node::Directory) => return Err(ContainerError::NotAFile(path.to_string())),
            Some(Node::File(Content::Buffered(bytes))) => return Ok(bytes.clone()),
            Some(Node::File(Content::Archived { index, size })) => (*index, *size),
        };
        self.read_archived(index, size)
    }

    /// Create `path` and any missing ancestors as directories
    pub fn create_dir_all(&mut self, path: &ResolvedPath) -> Result<()> {
        let mut chain = path.ancestors();
        chain.push(path.clone());

        if let Some(blocker) = chain
            .iter()
            .find(|p| matches!(self.nodes.get(p.as_str()), Some(Node::File(_))))
        {
            return Err(ContainerError::NotADirectory(blocker.to_string()));
        }

        for dir in chain {
            if !self.nodes.contains_key(dir.as_str()) {
                self.nodes.insert(dir.as_str().to_string(), Node::Directory);
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// Add a new file; the parent directory must already exist
    pub fn write_new(&mut self, path: &ResolvedPath, bytes: Vec<u8>) -> Result<()> {
        if self.exists(path) {
            return Err(ContainerError::AlreadyExists(path.to_string()));
        }
        self.ensure_parent_dir(path)?;

        self.nodes.insert(
            path.as_str().to_string(),
            Node::File(Content::Buffered(bytes)),
        );
        self.dirty = true;
        Ok(())
    }

    /// Extend an existing file
    pub fn append(&mut self, path: &ResolvedPath, bytes: &[u8]) -> Result<()> {
        let archived = match self.nodes.get(path.as_str()) {
            None => return Err(ContainerError::NotFound(path.to_string())),
            Some(Node::Directory) => return Err(ContainerError::NotAFile(path.to_string())),
            Some(Node::File(Content::Buffered(_))) => None,
            Some(Node::File(Content::Archived { index, size })) => Some((*index, *size)),
        };

        let mut content = match archived {
            Some((index, size)) => self.read_archived(index, size)?,
            None => Vec::new(),
        };

        match self.nodes.get_mut(path.as_str()) {
            Some(Node::File(Content::Buffered(existing))) => existing.extend_from_slice(bytes),
            Some(node) => {
                content.extend_from_slice(bytes);
                *node = Node::File(Content::Buffered(content));
            }
            None => return Err(ContainerError::NotFound(path.to_string())),
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove a file or an empty directory
    pub fn remove(&mut self, path: &ResolvedPath) -> Result<()> {
        if path.is_root() {
            return Err(ContainerError::RootImmutable);
        }
        match self.nodes.get(path.as_str()) {
            None => return Err(ContainerError::NotFound(path.to_string())),
            Some(Node::Directory) if self.has_children(path) => {
                return Err(ContainerError::DirectoryNotEmpty(path.to_string()))
            }
            Some(_) => {}
        }

        self.nodes.remove(path.as_str());
        self.dirty = true;
        Ok(())
    }

    /// Move a node, and its whole subtree for directories
    ///
    /// The parent of `to` must already exist.
    pub fn rename(&mut self, from: &ResolvedPath, to: &ResolvedPath) -> Result<()> {
        if from.is_root() {
            return Err(ContainerError::RootImmutable);
        }
        if !self.exists(from) {
            return Err(ContainerError::NotFound(from.to_string()));
        }
        if self.exists(to) {
            return Err(ContainerError::AlreadyExists(to.to_string()));
        }
        if to.starts_with(from) {
            return Err(ContainerError::InvalidMove {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.ensure_parent_dir(to)?;

        let prefix = from.child_prefix();
        let mut moved: Vec<String> = vec![from.as_str().to_string()];
        moved.extend(
            self.nodes
                .range(prefix.clone()..)
                .take_while(|(key, _)| key.starts_with(&prefix))
                .map(|(key, _)| key.clone()),
        );

        for key in moved {
            if let Some(node) = self.nodes.remove(&key) {
                let new_key = format!("{}{}", to.as_str(), &key[from.as_str().len()..]);
                self.nodes.insert(new_key, node);
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Write pending changes to disk
    ///
    /// The new archive is written next to the old one and renamed over it,
    /// so a failed flush leaves the previous archive intact. Stored entries
    /// are copied raw, compressed ones are inflated and stored.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let temp_path = sibling_path(&self.archive_path, ".tmp");
        if let Err(e) = self.write_archive(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, &self.archive_path)?;

        self.archive = ZipArchive::new(File::open(&self.archive_path)?)?;
        self.nodes = load_index(&mut self.archive)?;
        self.dirty = false;

        tracing::debug!(
            "Flushed archive {:?} ({} entries)",
            self.archive_path,
            self.nodes.len() - 1
        );
        Ok(())
    }

    /// Flush and release the archive
    pub fn close(mut self) -> Result<()> {
        let result = self.flush();
        self.closed = true;
        if result.is_ok() {
            tracing::info!("Closed archive {:?}", self.archive_path);
        }
        result
    }

    fn direct_children<'a>(
        &'a self,
        dir: &ResolvedPath,
    ) -> impl Iterator<Item = (&'a String, &'a Node)> + 'a {
        let prefix = dir.child_prefix();
        let depth = prefix.len();
        self.nodes
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .filter(move |(key, _)| key.len() > depth && !key[depth..].contains('/'))
    }

    fn ensure_parent_dir(&self, path: &ResolvedPath) -> Result<()> {
        let parent = path.parent().ok_or(ContainerError::RootImmutable)?;
        match self.nodes.get(parent.as_str()) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(ContainerError::NotADirectory(parent.to_string())),
            None => Err(ContainerError::NotFound(parent.to_string())),
        }
    }

    fn read_archived(&mut self, index: usize, size: u64) -> Result<Vec<u8>> {
        let mut entry = self.archive.by_index(index)?;
        let mut buffer = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        entry.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn write_archive(&mut self, temp_path: &Path) -> Result<()> {
        let mut writer = ZipWriter::new(File::create(temp_path)?);

        for (key, node) in &self.nodes {
            if key == ROOT {
                continue;
            }
            let name = key.trim_start_matches('/');
            match node {
                Node::Directory => {
                    writer.add_directory(format!("{name}/"), stored_options(0))?;
                }
                Node::File(Content::Buffered(bytes)) => {
                    writer.start_file(name.to_string(), stored_options(bytes.len() as u64))?;
                    writer.write_all(bytes)?;
                }
                Node::File(Content::Archived { index, size }) => {
                    let entry = self.archive.by_index_raw(*index)?;
                    if entry.compression() == CompressionMethod::Stored {
                        writer.raw_copy_file_rename(entry, name.to_string())?;
                    } else {
                        drop(entry);
                        let mut entry = self.archive.by_index(*index)?;
                        writer.start_file(name.to_string(), stored_options(*size))?;
                        io::copy(&mut entry, &mut writer)?;
                    }
                }
            }
        }

        let file = writer.finish()?;
        file.sync_all()?;
        Ok(())
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::error!(
                "Failed to flush archive {:?} on drop: {}",
                self.archive_path,
                e
            );
        }
    }
}

/// Length of the parent part of a key, including the trailing slash
fn dir_prefix_len(key: &str) -> usize {
    key.rfind('/').map_or(0, |pos| pos + 1)
}

fn to_entity(key: &str, node: &Node) -> FsEntity {
    let name = if key == ROOT {
        ROOT.to_string()
    } else {
        key[dir_prefix_len(key)..].to_string()
    };

    match node {
        Node::Directory => FsEntity {
            name,
            full_path: key.to_string(),
            is_directory: true,
            size: 0,
        },
        Node::File(content) => FsEntity {
            name,
            full_path: key.to_string(),
            is_directory: false,
            size: content.size(),
        },
    }
}

/// Store-only entry options, zip64 for entries that need it
fn stored_options(size: u64) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(size >= u64::from(u32::MAX))
}

fn write_empty_archive(path: &Path) -> Result<()> {
    let file = ZipWriter::new(File::create(path)?).finish()?;
    file.sync_all()?;
    Ok(())
}

/// Build the node map from the archive's central directory
fn load_index(archive: &mut ZipArchive<File>) -> Result<BTreeMap<String, Node>> {
    let mut nodes = BTreeMap::new();
    nodes.insert(ROOT.to_string(), Node::Directory);

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        let name = entry.name().to_string();
        let is_dir = entry.is_dir();
        let size = entry.size();
        drop(entry);

        let path = ResolvedPath::from_entry_name(&name)
            .map_err(|_| ContainerError::CorruptedEntry(name.clone()))?;

        for ancestor in path.ancestors() {
            match nodes.get(ancestor.as_str()) {
                Some(Node::File(_)) => return Err(ContainerError::CorruptedEntry(name)),
                Some(Node::Directory) => {}
                None => {
                    nodes.insert(ancestor.as_str().to_string(), Node::Directory);
                }
            }
        }

        if path.is_root() {
            continue;
        }

        if is_dir {
            if let Some(Node::File(_)) = nodes.get(path.as_str()) {
                return Err(ContainerError::CorruptedEntry(name));
            }
            nodes.insert(path.as_str().to_string(), Node::Directory);
        } else {
            if let Some(Node::Directory) = nodes.get(path.as_str()) {
                return Err(ContainerError::CorruptedEntry(name));
            }
            nodes.insert(
                path.as_str().to_string(),
                Node::File(Content::Archived { index, size }),
            );
        }
    }

    Ok(nodes)
}

fn sibling_path(archive_path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(archive_path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Advisory lock held for the lifetime of a container
#[derive(Debug)]
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    fn acquire(archive_path: &Path) -> Result<Self> {
        let path = sibling_path(archive_path, ".lock");
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ContainerError::Locked(archive_path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let lock = Self { path };
        writeln!(file, "{}", std::process::id())?;
        Ok(lock)
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove lock file {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path(raw: &str) -> ResolvedPath {
        ResolvedPath::parse(raw).unwrap()
    }

    fn open(dir: &TempDir) -> Container {
        ContainerBuilder::new()
            .open(dir.path().join("archive.zip"))
            .unwrap()
    }

    #[test]
    fn test_open_creates_empty_archive() {
        let dir = TempDir::new().unwrap();
        let container = open(&dir);

        assert!(dir.path().join("archive.zip").exists());
        assert_eq!(container.walk().len(), 1);
        assert!(container.is_dir(&ResolvedPath::root()));
    }

    #[test]
    fn test_open_without_create_fails() {
        let dir = TempDir::new().unwrap();
        let result = ContainerBuilder::new()
            .create(false)
            .open(dir.path().join("missing.zip"));

        assert!(matches!(result, Err(ContainerError::ArchiveNotFound(_))));
        assert!(!dir.path().join("missing.zip.lock").exists());
    }

    #[test]
    fn test_open_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("garbage.zip");
        fs::write(&location, b"definitely not a zip archive").unwrap();

        let result = ContainerBuilder::new().open(&location);
        assert!(matches!(result, Err(ContainerError::Zip(_))));
        assert!(!dir.path().join("garbage.zip.lock").exists());
    }

    #[test]
    fn test_lock_file_lifecycle() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("archive.zip");
        let container = open(&dir);

        assert!(dir.path().join("archive.zip.lock").exists());
        let second = ContainerBuilder::new().open(&location);
        assert!(matches!(second, Err(ContainerError::Locked(_))));

        container.close().unwrap();
        assert!(!dir.path().join("archive.zip.lock").exists());
        assert!(ContainerBuilder::new().open(&location).is_ok());
    }

    #[test]
    fn test_write_requires_parent() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);

        let result = container.write_new(&path("/a/b"), b"x".to_vec());
        assert!(matches!(result, Err(ContainerError::NotFound(_))));

        container.create_dir_all(&path("/a")).unwrap();
        container.write_new(&path("/a/b"), b"x".to_vec()).unwrap();
        assert_eq!(container.read(&path("/a/b")).unwrap(), b"x");
    }

    #[test]
    fn test_create_dir_all_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);
        container.write_new(&path("/f"), Vec::new()).unwrap();

        let result = container.create_dir_all(&path("/f/sub"));
        assert!(matches!(result, Err(ContainerError::NotADirectory(p)) if p == "/f"));
        assert!(!container.exists(&path("/f/sub")));
    }

    #[test]
    fn test_children_are_direct_only() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);
        container.create_dir_all(&path("/dir/sub")).unwrap();
        container.create_dir_all(&path("/dir-x")).unwrap();
        container.write_new(&path("/dir/a"), b"1".to_vec()).unwrap();
        container
            .write_new(&path("/dir/sub/b"), b"22".to_vec())
            .unwrap();

        let names: Vec<_> = container
            .children(&path("/dir"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "sub"]);

        let root: Vec<_> = container
            .children(&ResolvedPath::root())
            .unwrap()
            .into_iter()
            .map(|e| e.full_path)
            .collect();
        assert_eq!(root, vec!["/dir", "/dir-x"]);
    }

    #[test]
    fn test_rename_moves_subtree() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);
        container.create_dir_all(&path("/src/nested")).unwrap();
        container
            .write_new(&path("/src/nested/f"), b"data".to_vec())
            .unwrap();

        container.rename(&path("/src"), &path("/copy")).unwrap();

        assert!(!container.exists(&path("/src")));
        assert!(container.is_dir(&path("/copy/nested")));
        assert_eq!(container.read(&path("/copy/nested/f")).unwrap(), b"data");
    }

    #[test]
    fn test_rename_into_own_subtree_fails() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);
        container.create_dir_all(&path("/a")).unwrap();

        let result = container.rename(&path("/a"), &path("/a/b"));
        assert!(matches!(result, Err(ContainerError::InvalidMove { .. })));
    }

    #[test]
    fn test_remove_guards() {
        let dir = TempDir::new().unwrap();
        let mut container = open(&dir);
        container.create_dir_all(&path("/d")).unwrap();
        container.write_new(&path("/d/f"), Vec::new()).unwrap();

        assert!(matches!(
            container.remove(&path("/d")),
            Err(ContainerError::DirectoryNotEmpty(_))
        ));
        assert!(matches!(
            container.remove(&ResolvedPath::root()),
            Err(ContainerError::RootImmutable)
        ));
        container.remove(&path("/d/f")).unwrap();
        container.remove(&path("/d")).unwrap();
        assert_eq!(container.walk().len(), 1);
    }

    #[test]
    fn test_flush_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("archive.zip");

        let mut container = open(&dir);
        container.create_dir_all(&path("/docs")).unwrap();
        container
            .write_new(&path("/docs/a.txt"), b"hello".to_vec())
            .unwrap();
        container.flush().unwrap();
        assert!(!container.is_dirty());

        container.append(&path("/docs/a.txt"), b" world").unwrap();
        assert_eq!(container.read(&path("/docs/a.txt")).unwrap(), b"hello world");
        container.close().unwrap();

        let mut reopened = ContainerBuilder::new().open(&location).unwrap();
        assert!(reopened.is_dir(&path("/docs")));
        assert_eq!(reopened.read(&path("/docs/a.txt")).unwrap(), b"hello world");
        let sizes: Vec<_> = reopened.walk().into_iter().map(|e| e.size).collect();
        assert_eq!(sizes, vec![0, 0, 11]);
    }

    #[test]
    fn test_drop_flushes() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("archive.zip");
        {
            let mut container = open(&dir);
            container.write_new(&path("/kept"), b"1".to_vec()).unwrap();
        }

        let mut reopened = ContainerBuilder::new().open(&location).unwrap();
        assert_eq!(reopened.read(&path("/kept")).unwrap(), b"1");
    }

    #[test]
    fn test_entries_are_stored() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("archive.zip");
        let mut container = open(&dir);
        container.write_new(&path("/z"), vec![0u8; 4096]).unwrap();
        container.close().unwrap();

        let mut archive = ZipArchive::new(File::open(&location).unwrap()).unwrap();
        let entry = archive.by_name("z").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        assert_eq!(entry.compressed_size(), 4096);
    }

    #[test]
    fn test_flush_stores_compressed_entries() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("foreign.zip");
        let content = vec![b'a'; 8192];

        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(File::create(&location).unwrap());
        writer.start_file("e/d/a.txt", deflated).unwrap();
        writer.write_all(&content).unwrap();
        writer.finish().unwrap();

        let mut container = ContainerBuilder::new().open(&location).unwrap();
        container.rename(&path("/e"), &path("/m")).unwrap();
        container.write_new(&path("/b.txt"), b"b".to_vec()).unwrap();
        container.close().unwrap();

        let mut archive = ZipArchive::new(File::open(&location).unwrap()).unwrap();
        for name in ["m/d/a.txt", "b.txt"] {
            let entry = archive.by_name(name).unwrap();
            assert_eq!(entry.compression(), CompressionMethod::Stored);
            assert_eq!(entry.compressed_size(), entry.size());
        }

        let mut reopened = ContainerBuilder::new().open(&location).unwrap();
        assert_eq!(reopened.read(&path("/m/d/a.txt")).unwrap(), content);
    }

    #[test]
    fn test_zero_length_file_is_empty_archive() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("empty.zip");
        File::create(&location).unwrap();

        let container = ContainerBuilder::new().lock(false).open(&location).unwrap();
        assert_eq!(container.walk().len(), 1);
    }
}
