//! Subcommands and their execution against an open file system

use anyhow::{Context, Result};
use clap::Subcommand;
use infile_fs::{FsEntity, FsFileName, FsPath, VirtualFileSystem};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Copy every regular, non-hidden file of a directory into the archive
    Pack {
        /// Directory to walk
        dir: PathBuf,

        /// Virtual directory the files are placed under
        #[arg(long, default_value = "/")]
        prefix: String,
    },

    /// Store one external file at a virtual path
    Put { src: PathBuf, path: String },

    /// Print a file's content to stdout
    Cat { path: String },

    /// Append an external file's content to a virtual file
    Append { path: String, src: PathBuf },

    /// Delete a file or an empty directory
    Rm { path: String },

    /// Move a file or directory
    Mv { from: String, to: String },

    /// Rename a file or directory in place
    Rename { path: String, name: String },

    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Print the whole tree
    Tree,
}

/// Run `command` against `fs`, writing user-facing output to `out`
pub fn execute(fs: &VirtualFileSystem, command: &Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Pack { dir, prefix } => {
            let (files, bytes) = pack(fs, dir, prefix)?;
            writeln!(out, "Packed {files} files ({bytes} bytes)")?;
        }
        Command::Put { src, path } => {
            fs.save_file(&FsPath::from(path.as_str()), src)
                .with_context(|| format!("Failed to store {:?} at {}", src, path))?;
        }
        Command::Cat { path } => {
            let content = fs.read(&FsPath::from(path.as_str()))?;
            out.write_all(&content)?;
        }
        Command::Append { path, src } => {
            let bytes =
                std::fs::read(src).with_context(|| format!("Failed to read {:?}", src))?;
            fs.append(&FsPath::from(path.as_str()), &bytes)?;
        }
        Command::Rm { path } => fs.delete(&FsPath::from(path.as_str()))?,
        Command::Mv { from, to } => {
            fs.move_to(&FsPath::from(from.as_str()), &FsPath::from(to.as_str()))?
        }
        Command::Rename { path, name } => {
            fs.rename(&FsPath::from(path.as_str()), &FsFileName::from(name.as_str()))?
        }
        Command::Ls { path } => {
            for entity in fs.ls(&FsPath::from(path.as_str()))? {
                writeln!(out, "{}", format_listing(&entity))?;
            }
        }
        Command::Tree => {
            for entity in fs.all_entities()? {
                writeln!(out, "{}", format_tree_line(&entity))?;
            }
        }
    }
    Ok(())
}

/// Save every regular, non-hidden file below `dir`; returns file count and byte total
fn pack(fs: &VirtualFileSystem, dir: &Path, prefix: &str) -> Result<(usize, u64)> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {:?}", dir);
    }

    let mut files = 0;
    let mut bytes = 0;

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(target) = virtual_target(prefix, dir, entry.path()) else {
            tracing::warn!("Skipping non UTF-8 path {:?}", entry.path());
            continue;
        };

        fs.save_file(&target, entry.path())
            .with_context(|| format!("Failed to pack {:?}", entry.path()))?;
        files += 1;
        bytes += entry.metadata()?.len();
    }

    tracing::info!("Packed {} files ({} bytes) from {:?}", files, bytes, dir);
    Ok((files, bytes))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Virtual path for `file` below `root`, placed under `prefix`
fn virtual_target(prefix: &str, root: &Path, file: &Path) -> Option<FsPath> {
    let relative = file.strip_prefix(root).ok()?;
    let mut target = prefix.trim_end_matches('/').to_string();
    for component in relative.components() {
        target.push('/');
        target.push_str(component.as_os_str().to_str()?);
    }
    Some(FsPath::new(target))
}

fn format_listing(entity: &FsEntity) -> String {
    if entity.is_directory {
        format!("{:>12}  {}/", "-", entity.name)
    } else {
        format!("{:>12}  {}", entity.size, entity.name)
    }
}

fn format_tree_line(entity: &FsEntity) -> String {
    if entity.full_path == "/" {
        return "/".to_string();
    }
    let depth = entity.full_path.matches('/').count();
    let indent = "  ".repeat(depth - 1);
    if entity.is_directory {
        format!("{indent}{}/", entity.name)
    } else {
        format!("{indent}{} ({} bytes)", entity.name, entity.size)
    }
}
