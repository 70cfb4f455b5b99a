//! Local filesystem adapter using std::fs and walkdir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use jumpstart_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{JumpstartError, JumpstartResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_empty_dir(&self, path: &Path) -> JumpstartResult<bool> {
        let mut entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        Ok(entries.next().is_none())
    }

    fn create_dir_all(&self, path: &Path) -> JumpstartResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_recursive(&self, from: &Path, to: &Path) -> JumpstartResult<usize> {
        let metadata = fs::metadata(from).map_err(|e| map_io_error(from, e, "read"))?;

        if metadata.is_file() {
            // Copying a file onto a directory keeps its name, like `cp`
            let target = if to.is_dir() {
                match from.file_name() {
                    Some(name) => to.join(name),
                    None => to.to_path_buf(),
                }
            } else {
                to.to_path_buf()
            };
            copy_file(from, &target)?;
            return Ok(1);
        }

        let mut copied = 0;
        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                ApplicationError::filesystem(path, format!("Failed to walk directory: {e}"))
            })?;

            let rel = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| ApplicationError::filesystem(entry.path(), e))?;
            let target = to.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
                copied += 1;
            } else {
                copy_file(entry.path(), &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    fn list_files(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ApplicationError::filesystem(path, format!("Failed to walk directory: {e}"))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn list_dirs(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        let entries = fs::read_dir(root).map_err(|e| map_io_error(root, e, "read directory"))?;
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(root, e, "read directory entry"))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn read_file(&self, path: &Path) -> JumpstartResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> JumpstartResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }
}

fn copy_file(from: &Path, to: &Path) -> JumpstartResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
    }
    trace!(from = %from.display(), to = %to.display(), "copy");
    fs::copy(from, to).map_err(|e| map_io_error(to, e, "copy file"))?;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> JumpstartResult<()> {
    let link = fs::read_link(from).map_err(|e| map_io_error(from, e, "read symlink"))?;
    if to.symlink_metadata().is_ok() {
        fs::remove_file(to).map_err(|e| map_io_error(to, e, "replace symlink"))?;
    }
    std::os::unix::fs::symlink(&link, to).map_err(|e| map_io_error(to, e, "create symlink"))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> JumpstartResult<()> {
    copy_file(from, to)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> JumpstartError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_tree_into_existing_destination() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(src.path(), "README.md", "hello");
        write(src.path(), "src/lib.rs", "// lib");
        write(dst.path(), "keep.txt", "kept");

        let copied = LocalFilesystem.copy_recursive(src.path(), dst.path()).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.path().join("src/lib.rs")).unwrap(), "// lib");
        assert_eq!(fs::read_to_string(dst.path().join("keep.txt")).unwrap(), "kept");
    }

    #[test]
    fn copies_single_file_into_directory() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(src.path(), "LICENSE", "MIT");

        LocalFilesystem
            .copy_recursive(&src.path().join("LICENSE"), dst.path())
            .unwrap();

        assert!(dst.path().join("LICENSE").is_file());
    }

    #[test]
    fn missing_source_is_a_filesystem_error() {
        let dst = TempDir::new().unwrap();
        let err = LocalFilesystem
            .copy_recursive(&dst.path().join("nope"), dst.path())
            .unwrap_err();
        assert!(matches!(
            err,
            JumpstartError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn lists_files_recursively_in_order() {
        let root = TempDir::new().unwrap();
        write(root.path(), "b.txt", "");
        write(root.path(), "a/z.txt", "");
        write(root.path(), ".git/HEAD", "");

        let files = LocalFilesystem.list_files(root.path()).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from(".git/HEAD"),
                PathBuf::from("a/z.txt"),
                PathBuf::from("b.txt")
            ]
        );
    }

    #[test]
    fn empty_dir_detection() {
        let root = TempDir::new().unwrap();
        assert!(LocalFilesystem.is_empty_dir(root.path()).unwrap());
        write(root.path(), "x", "");
        assert!(!LocalFilesystem.is_empty_dir(root.path()).unwrap());
    }

    #[test]
    fn list_dirs_skips_files() {
        let root = TempDir::new().unwrap();
        write(root.path(), "node/jumpstart.yaml", "");
        write(root.path(), "README.md", "");

        let dirs = LocalFilesystem.list_dirs(root.path()).unwrap();
        assert_eq!(dirs, vec![root.path().join("node")]);
    }
}
