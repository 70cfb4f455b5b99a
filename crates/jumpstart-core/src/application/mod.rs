//! Application layer for jumpstart.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (TemplateResolver, ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Events**: Progress reported through the `Reporter` port
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain layer through ports; template
//! rules themselves live in `crate::domain`.

pub mod error;
pub mod events;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    InitOutcome, InitRequest, ResolverSettings, ScaffoldPorts, ScaffoldService, StepRecord,
    SubstitutionReport, TemplateResolver, TemplateSummary, VariableSettings, VariableSubstitutor,
    VcsStatus,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    AccountLookup, CommandOutput, CommandRunner, Filesystem, ManifestLoader,
    RepositoryInitializer, Reporter, WorkspaceLocator,
};

pub use error::ApplicationError;
pub use events::{EventLevel, ScaffoldEvent, UnresolvedPlaceholder};
