// ============================================================================
// domain/error.rs - TEMPLATE DEFINITION ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside `JumpstartError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Manifest Errors
    // ========================================================================
    #[error(
        "no jumpstart.yaml or files/ directory in '{}': is it a valid template directory?",
        directory.display()
    )]
    ManifestMissing { directory: PathBuf },

    #[error("invalid manifest at '{}': {detail}", path.display())]
    ManifestInvalid { path: PathBuf, detail: String },

    #[error(
        "unknown step #{index} in '{}': expected exactly one of `copy` or `run`, found {found}",
        manifest.display()
    )]
    UnknownStepShape {
        manifest: PathBuf,
        index: usize,
        found: String,
    },

    // ========================================================================
    // Resolution Errors
    // ========================================================================
    #[error(
        "aborting load of template '{descriptor}': maximum extension depth of {max_depth} reached ({chain})"
    )]
    MaxDepthExceeded {
        descriptor: String,
        max_depth: usize,
        chain: String,
    },

    #[error("invalid template descriptor '{descriptor}': {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },

    // ========================================================================
    // Execution Constraint Violations
    // ========================================================================
    #[error("invalid {field} operand '{operand}': {reason}")]
    InvalidPathOperand {
        field: &'static str,
        operand: String,
        reason: String,
    },

    #[error("could not derive {variable}: {reason}")]
    DerivationFailure { variable: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ManifestMissing { directory } => vec![
                format!("Expected a template at {}", directory.display()),
                "Add a jumpstart.yaml manifest, or a files/ directory for a plain template".into(),
                "Try: jumpstart list to see the templates in this workspace".into(),
            ],
            Self::ManifestInvalid { path, .. } => vec![
                format!("Fix the manifest at {}", path.display()),
                "The document needs a top-level `jumpstart:` key".into(),
                "Try: jumpstart schema to print the manifest JSON schema".into(),
            ],
            Self::UnknownStepShape { index, .. } => vec![
                format!("Step #{index} must be `copy: {{ from, to }}` or `run: [commands]`"),
                "Each step takes exactly one key".into(),
            ],
            Self::MaxDepthExceeded { max_depth, .. } => vec![
                format!("Templates may extend each other at most {max_depth} levels deep"),
                "Check the `extends` entries for a cycle".into(),
            ],
            Self::InvalidDescriptor { .. } => vec![
                "Use a template name, a path containing '/', or repo:<path>".into(),
            ],
            Self::InvalidPathOperand { field, .. } => vec![
                format!("`{field}` must be a relative path that stays inside its root"),
                "Example: copy: { from: ./files, to: ./config }".into(),
            ],
            Self::DerivationFailure { variable, .. } => vec![
                format!("Set JUMPSTART_{variable} to provide the value explicitly"),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ManifestMissing { .. } => ErrorCategory::NotFound,
            Self::ManifestInvalid { .. }
            | Self::UnknownStepShape { .. }
            | Self::MaxDepthExceeded { .. }
            | Self::InvalidDescriptor { .. }
            | Self::InvalidPathOperand { .. }
            | Self::DerivationFailure { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
}
