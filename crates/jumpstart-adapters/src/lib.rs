//! Infrastructure adapters for jumpstart.
//!
//! This crate implements the ports defined in `jumpstart_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod git;
pub mod github;
pub mod manifest_loader;
pub mod process;
pub mod reporter;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::{FixedWorkspace, GitRepository, GitWorkspaceLocator};
pub use github::GhAccountLookup;
pub use manifest_loader::{MANIFEST_FILE_NAMES, YamlManifestLoader, json_schema, parse_manifest};
pub use process::ShellCommandRunner;
pub use reporter::{CollectingReporter, TracingReporter};
