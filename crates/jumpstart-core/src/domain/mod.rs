// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for jumpstart.
//!
//! Pure logic: manifest validation, descriptor classification, graph
//! linearization and execution planning, variable naming. Nothing here
//! touches the filesystem, a shell, or the environment; the application
//! layer feeds it through ports.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: Resolved templates and plans are Clone + PartialEq

pub mod common;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod template;
pub mod variables;

pub use common::{RelativePath, absolutize, ensure_absolute, normalize_lexically};
pub use descriptor::{
    DEFAULT_REPO_PREFIX, DEFAULT_TEMPLATES_DIR, TemplateDescriptor, TemplateLocation,
};
pub use error::{DomainError, ErrorCategory};
pub use manifest::{
    COMMAND_SEPARATOR, CopyStep, LEGACY_FILES_DIR, ManifestDocument, ManifestOrigin, RunStep,
    Step, TemplateManifest,
};
pub use template::{
    ExecutionPlan, MAX_EXTENDS_DEPTH, PlannedAction, PlannedStep, ResolvedTemplate,
};
pub use variables::{
    DEFAULT_NAMESPACE, Variable, VariableBinding, VariableNamespace, VariableOverrides,
    derive_project_name,
};
