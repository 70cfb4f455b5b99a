//! Application layer errors.
//!
//! These errors represent failures while talking to the outside world
//! (filesystem, shell, git). Template definition errors are `DomainError`
//! from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Destination exists, has entries, and `--force` was not given.
    #[error("destination '{}' is not empty", path.display())]
    DestinationNotEmpty { path: PathBuf },

    /// A `run` step exited non-zero.
    #[error(
        "step #{index} of template '{template}' failed ({status}): `{command}`{}",
        stderr_suffix(stderr)
    )]
    StepExecutionFailure {
        template: String,
        index: usize,
        command: String,
        status: String,
        stderr: String,
    },

    /// A shell command exited non-zero (raised by command runners, turned
    /// into `StepExecutionFailure` by the orchestrator).
    #[error("command `{command}` failed ({status}){}", stderr_suffix(stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Filesystem operation failed.
    #[error("filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The workspace root could not be determined.
    #[error("workspace root unavailable: {reason}")]
    WorkspaceUnavailable { reason: String },

    /// `git init` / `git add` failed. Reported, never fatal.
    #[error("could not initialize git repository in {}: {reason}", path.display())]
    VcsInitFailure { path: PathBuf, reason: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DestinationNotEmpty { path } => vec![
                format!("Directory already has files: {}", path.display()),
                "Use --force to scaffold into it anyway (existing files may be overwritten)".into(),
                "Or choose a different destination".into(),
            ],
            Self::StepExecutionFailure { template, .. } => vec![
                format!("Check the `run` steps of template '{template}'"),
                "Re-run with -v to see the output of each step".into(),
                "The destination was left as-is; remove it or use --force to retry".into(),
            ],
            Self::CommandFailed { .. } => vec!["Re-run with -v to see the command output".into()],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the path exists and you have permission to it".into(),
            ],
            Self::WorkspaceUnavailable { .. } => vec![
                "Run jumpstart inside a git repository that has a templates/ directory".into(),
                "Or set templates.workspace_root in the config file".into(),
                "Or set JUMPSTART__TEMPLATES__WORKSPACE_ROOT".into(),
            ],
            Self::VcsInitFailure { .. } => vec![
                "Make sure git is installed and on PATH".into(),
                "Or pass --no-git to skip repository initialization".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DestinationNotEmpty { .. } => ErrorCategory::Validation,
            Self::WorkspaceUnavailable { .. } => ErrorCategory::Configuration,
            Self::StepExecutionFailure { .. }
            | Self::CommandFailed { .. }
            | Self::FilesystemError { .. }
            | Self::VcsInitFailure { .. } => ErrorCategory::Internal,
        }
    }
}
