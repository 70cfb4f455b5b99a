//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `jumpstart-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: copy, list, read and write files
//!   - `ManifestLoader`: read a template's manifest
//!   - `CommandRunner`: run `run` steps
//!   - `WorkspaceLocator`: find the workspace root
//!   - `RepositoryInitializer`: `git init` + `git add`
//!   - `AccountLookup`: GitHub login for `GITHUB_USER`
//!   - `Reporter`: progress events
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `ScaffoldService::init`, `ScaffoldService::list_templates`

pub mod output;

pub use output::{
    AccountLookup, CommandOutput, CommandRunner, Filesystem, ManifestLoader,
    RepositoryInitializer, Reporter, WorkspaceLocator,
};

#[cfg(test)]
pub use output::{
    MockAccountLookup, MockCommandRunner, MockFilesystem, MockManifestLoader,
    MockRepositoryInitializer, MockReporter, MockWorkspaceLocator,
};
