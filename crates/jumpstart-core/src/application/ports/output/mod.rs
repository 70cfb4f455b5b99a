//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `jumpstart-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::application::events::ScaffoldEvent;
use crate::domain::TemplateManifest;
use crate::error::JumpstartResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `jumpstart_adapters::filesystem::LocalFilesystem` (production)
/// - `jumpstart_adapters::filesystem::MemoryFilesystem` (testing)
///
/// All paths passed in are absolute.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the directory at `path` has no entries.
    fn is_empty_dir(&self, path: &Path) -> JumpstartResult<bool>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> JumpstartResult<()>;

    /// Copy `from` (a file or a directory tree) to `to`, creating parents and
    /// overwriting existing files. Returns the number of files copied.
    fn copy_recursive(&self, from: &Path, to: &Path) -> JumpstartResult<usize>;

    /// Every regular file below `root`, recursively, in a stable order.
    fn list_files(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>>;

    /// Immediate subdirectories of `root`, sorted.
    fn list_dirs(&self, root: &Path) -> JumpstartResult<Vec<PathBuf>>;

    fn read_file(&self, path: &Path) -> JumpstartResult<Vec<u8>>;

    fn write_file(&self, path: &Path, content: &[u8]) -> JumpstartResult<()>;
}

/// Port for reading a template directory's manifest.
///
/// Implemented by `jumpstart_adapters::manifest_loader::YamlManifestLoader`.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestLoader: Send + Sync {
    /// Load the manifest of the template at `directory`, falling back to the
    /// legacy `files/` layout.
    fn load(&self, directory: &Path) -> JumpstartResult<TemplateManifest>;
}

/// What a finished shell command printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Port for running shell scripts.
///
/// A non-zero exit is reported as `ApplicationError::CommandFailed`.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, script: &str, working_directory: &Path) -> JumpstartResult<CommandOutput>;
}

/// Port for finding the root of the template workspace.
#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceLocator: Send + Sync {
    fn workspace_root(&self) -> JumpstartResult<PathBuf>;
}

/// Port for version-control initialization.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryInitializer: Send + Sync {
    /// Create an empty repository at `path`.
    fn init(&self, path: &Path) -> JumpstartResult<()>;

    /// Stage every file of the working tree.
    fn stage_all(&self, path: &Path) -> JumpstartResult<()>;
}

/// Port for looking up the user's hosted-git account.
#[cfg_attr(test, mockall::automock)]
pub trait AccountLookup: Send + Sync {
    /// Login of the authenticated GitHub user, `None` when unavailable.
    fn github_user(&self) -> Option<String>;
}

/// Port receiving progress events from the core.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ScaffoldEvent);
}
