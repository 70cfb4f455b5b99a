//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use jumpstart_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{JumpstartError, JumpstartResult},
};

/// In-memory filesystem for testing.
///
/// Cloning shares the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn insert_file(&mut self, path: &Path, content: Vec<u8>) {
        if let Some(parent) = path.parent() {
            self.add_dir_all(parent);
        }
        self.files.insert(path.to_path_buf(), content);
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert_file(path.as_ref(), content.as_ref().to_vec());
        }
        self
    }

    /// A file's content as text (testing helper).
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> JumpstartResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> JumpstartResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> JumpstartError {
    JumpstartError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn not_found(path: &Path) -> JumpstartError {
    ApplicationError::filesystem(path, "No such file or directory").into()
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_empty_dir(&self, path: &Path) -> JumpstartResult<bool> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path));
        }
        let has_child = inner.files.keys().any(|f| f.parent() == Some(path))
            || inner.directories.iter().any(|d| d.parent() == Some(path));
        Ok(!has_child)
    }

    fn create_dir_all(&self, path: &Path) -> JumpstartResult<()> {
        self.write()?.add_dir_all(path);
        Ok(())
    }

    fn copy_recursive(&self, from: &Path, to: &Path) -> JumpstartResult<usize> {
        let mut inner = self.write()?;

        if let Some(content) = inner.files.get(from).cloned() {
            let target = if inner.directories.contains(to) {
                from.file_name().map_or_else(|| to.to_path_buf(), |n| to.join(n))
            } else {
                to.to_path_buf()
            };
            inner.insert_file(&target, content);
            return Ok(1);
        }

        if !inner.directories.contains(from) {
            return Err(not_found(from));
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();
        let files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|rel| (to.join(rel), c.clone())))
            .collect();

        for dir in dirs {
            inner.add_dir_all(&dir);
        }
        let copied = files.len();
        for (path, content) in files {
            inner.insert_file(&path, content);
        }
        Ok(copied)
    }

    fn list_files(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        let inner = self.read()?;
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        let inner = self.read()?;
        Ok(inner
            .directories
            .iter()
            .filter(|d| d.parent() == Some(root))
            .cloned()
            .collect())
    }

    fn read_file(&self, path: &Path) -> JumpstartResult<Vec<u8>> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> JumpstartResult<()> {
        self.write()?.insert_file(path, content.to_vec());
        Ok(())
    }
}
