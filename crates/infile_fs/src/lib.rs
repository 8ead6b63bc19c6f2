//! InFile Virtual File System
//!
//! A hierarchical file system stored inside a single zip archive:
//! - VirtualFileSystem: path-based operations with a closed problem set
//! - Container: the archive handle, indexed at open and rewritten on flush
//! - FsPath / FsFileName / FsEntity: the caller-facing path and listing types

mod container;
mod error;
mod path;
mod vfs;

pub use container::{Container, ContainerBuilder, ContainerOptions};
pub use error::{ContainerError, FsProblem, Result};
pub use path::{FsEntity, FsFileName, FsPath, PathSyntaxError, ResolvedPath};
pub use vfs::VirtualFileSystem;
