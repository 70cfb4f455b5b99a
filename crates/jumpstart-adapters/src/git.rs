//! git-backed adapters: workspace discovery and repository initialization.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use jumpstart_core::{
    application::{
        ApplicationError,
        ports::{RepositoryInitializer, WorkspaceLocator},
    },
    error::{JumpstartError, JumpstartResult},
};

use crate::process::capture;

/// Finds the workspace root with `git rev-parse --show-toplevel`, run from
/// a fixed directory.
#[derive(Debug, Clone)]
pub struct GitWorkspaceLocator {
    start: PathBuf,
}

impl GitWorkspaceLocator {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
        }
    }
}

impl WorkspaceLocator for GitWorkspaceLocator {
    #[instrument(skip(self), fields(start = %self.start.display()))]
    fn workspace_root(&self) -> JumpstartResult<PathBuf> {
        let output = capture(
            Command::new("git")
                .args(["rev-parse", "--show-toplevel"])
                .current_dir(&self.start),
            "git rev-parse --show-toplevel",
        )
        .map_err(|e| match e {
            JumpstartError::Application(ApplicationError::CommandFailed { stderr, .. }) => {
                ApplicationError::WorkspaceUnavailable {
                    reason: stderr.trim().to_string(),
                }
                .into()
            }
            other => other,
        })?;

        let root = output.stdout.trim();
        if root.is_empty() {
            return Err(ApplicationError::WorkspaceUnavailable {
                reason: "git reported an empty top-level directory".into(),
            }
            .into());
        }
        debug!(root, "Found workspace root");
        Ok(PathBuf::from(root))
    }
}

/// A workspace root set explicitly in configuration.
#[derive(Debug, Clone)]
pub struct FixedWorkspace {
    root: PathBuf,
}

impl FixedWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl WorkspaceLocator for FixedWorkspace {
    fn workspace_root(&self) -> JumpstartResult<PathBuf> {
        if self.root.is_dir() {
            Ok(self.root.clone())
        } else {
            Err(ApplicationError::WorkspaceUnavailable {
                reason: format!("configured workspace root '{}' is not a directory", self.root.display()),
            }
            .into())
        }
    }
}

/// Initializes repositories with the `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepository;

impl GitRepository {
    pub fn new() -> Self {
        Self
    }

    fn git(path: &Path, args: &[&str]) -> JumpstartResult<()> {
        let display = format!("git {}", args.join(" "));
        capture(Command::new("git").args(args).current_dir(path), &display)?;
        Ok(())
    }
}

impl RepositoryInitializer for GitRepository {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn init(&self, path: &Path) -> JumpstartResult<()> {
        Self::git(path, &["init"])
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn stage_all(&self, path: &Path) -> JumpstartResult<()> {
        Self::git(path, &["add", "."])
    }
}
