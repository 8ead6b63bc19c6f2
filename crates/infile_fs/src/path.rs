//! Virtual paths, file names and listing records

use serde::{Deserialize, Serialize};
use std::fmt;

/// A virtual path inside the container, as given by the caller
///
/// Holds the raw string; nothing is validated until an operation resolves it.
/// Accepted forms: `/dir/file`, `./dir/file`, `dir/file`, `/`, `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FsPath(String);

impl FsPath {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The container root
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FsPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FsPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&ResolvedPath> for FsPath {
    fn from(path: &ResolvedPath) -> Self {
        Self(path.as_str().to_string())
    }
}

/// A single path segment, used by rename
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FsFileName(String);

impl FsFileName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A usable segment: non-empty, no separator, not `.`/`..`, no NUL
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl fmt::Display for FsFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FsFileName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FsFileName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Snapshot of one node taken at listing time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsEntity {
    /// Last path segment (`/` for the root)
    pub name: String,

    /// Normalized container path, e.g. `/dir/file`
    pub full_path: String,

    pub is_directory: bool,

    /// Content length in bytes, 0 for directories
    pub size: u64,
}

impl FsEntity {
    /// The entity's location as a path usable with the file system again
    pub fn path(&self) -> FsPath {
        FsPath::new(self.full_path.clone())
    }
}

/// Reasons a path string cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSyntaxError {
    Empty,
    NulCharacter,
    Backslash,
    EscapesRoot,
}

impl fmt::Display for PathSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "path is empty",
            Self::NulCharacter => "path contains a NUL character",
            Self::Backslash => "path contains a backslash",
            Self::EscapesRoot => "path climbs above the root",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for PathSyntaxError {}

/// Normalized, root-anchored container path
///
/// Always starts with `/`, never ends with `/` (except the root itself),
/// and holds no `.`, `..` or empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedPath(String);

impl ResolvedPath {
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Parse a virtual path string. Pure syntax, never touches disk.
    pub fn parse(raw: &str) -> Result<Self, PathSyntaxError> {
        if raw.is_empty() {
            return Err(PathSyntaxError::Empty);
        }
        if raw.contains('\0') {
            return Err(PathSyntaxError::NulCharacter);
        }
        if raw.contains('\\') {
            return Err(PathSyntaxError::Backslash);
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathSyntaxError::EscapesRoot);
                    }
                }
                s => segments.push(s),
            }
        }

        Ok(Self::from_segments(&segments))
    }

    /// Rebuild from a zip entry name such as `dir/sub/` or `dir/file`
    pub(crate) fn from_entry_name(name: &str) -> Result<Self, PathSyntaxError> {
        Self::parse(&format!("/{}", name.trim_end_matches('/')))
    }

    fn from_segments(segments: &[&str]) -> Self {
        if segments.is_empty() {
            Self::root()
        } else {
            Self(format!("/{}", segments.join("/")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Parent directory, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(pos) => Some(Self(self.0[..pos].to_string())),
            None => None,
        }
    }

    /// Last segment, `/` for the root
    pub fn file_name(&self) -> &str {
        if self.is_root() {
            return "/";
        }
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Append one segment. The caller guarantees it holds no separator.
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self(format!("/{segment}"))
        } else {
            Self(format!("{}/{segment}", self.0))
        }
    }

    /// Every ancestor from the root down to the direct parent
    pub fn ancestors(&self) -> Vec<Self> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(path) = current {
            current = path.parent();
            chain.push(path);
        }
        chain.reverse();
        chain
    }

    /// `true` if `self` equals `base` or lies below it
    pub fn starts_with(&self, base: &Self) -> bool {
        if base.is_root() || self == base {
            return true;
        }
        self.0.len() > base.0.len()
            && self.0.starts_with(&base.0)
            && self.0.as_bytes()[base.0.len()] == b'/'
    }

    /// Prefix shared by every descendant key (`/dir/`, or `/` for the root)
    pub(crate) fn child_prefix(&self) -> String {
        if self.is_root() {
            "/".to_string()
        } else {
            format!("{}/", self.0)
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
