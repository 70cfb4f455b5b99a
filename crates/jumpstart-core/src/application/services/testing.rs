//! In-crate fakes shared by the service tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::ApplicationError;
use crate::application::events::ScaffoldEvent;
use crate::application::ports::{Filesystem, Reporter};
use crate::domain::{ManifestDocument, TemplateManifest};
use crate::error::JumpstartResult;

pub(crate) fn manifest(dir: &Path, yaml: &str) -> TemplateManifest {
    let doc: ManifestDocument = serde_yaml::from_str(yaml).expect("test manifest parses");
    TemplateManifest::from_document(doc, &dir.join("jumpstart.yaml")).expect("test manifest is valid")
}

/// Records every event.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub events: Mutex<Vec<ScaffoldEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<ScaffoldEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &ScaffoldEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Flat map of file path to contents; directories are implied by files
/// plus an explicit set for empty ones.
#[derive(Default)]
pub(crate) struct FakeFilesystem {
    pub files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    pub dirs: Mutex<Vec<PathBuf>>,
}

impl FakeFilesystem {
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.files.lock().unwrap().insert(path.into(), content.into());
        self
    }

    pub fn read_string(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(Path::new(path))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Filesystem for FakeFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().iter().any(|d| d == path)
            || self.files.lock().unwrap().keys().any(|f| f.starts_with(path) && f != path)
    }

    fn is_empty_dir(&self, path: &Path) -> JumpstartResult<bool> {
        let has_file = self.files.lock().unwrap().keys().any(|f| f.starts_with(path) && f != path);
        let has_dir = self.dirs.lock().unwrap().iter().any(|d| d.starts_with(path) && d != path);
        Ok(!has_file && !has_dir)
    }

    fn create_dir_all(&self, path: &Path) -> JumpstartResult<()> {
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn copy_recursive(&self, from: &Path, to: &Path) -> JumpstartResult<usize> {
        let mut files = self.files.lock().unwrap();
        let copies: Vec<(PathBuf, Vec<u8>)> = files
            .iter()
            .filter_map(|(path, content)| {
                let rel = path.strip_prefix(from).ok()?;
                let target = if rel.as_os_str().is_empty() { to.to_path_buf() } else { to.join(rel) };
                Some((target, content.clone()))
            })
            .collect();
        if copies.is_empty() {
            return Err(ApplicationError::filesystem(from, "no such file or directory").into());
        }
        let count = copies.len();
        files.extend(copies);
        Ok(count)
    }

    fn list_files(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok())
            .filter(|rel| rel.components().count() > 1)
            .filter_map(|rel| rel.components().next())
            .map(|first| root.join(first.as_os_str()))
            .collect();
        dirs.sort();
        dirs.dedup();
        Ok(dirs)
    }

    fn read_file(&self, path: &Path) -> JumpstartResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::filesystem(path, "not found").into())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> JumpstartResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }
}
