//! jumpstart core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for the jumpstart
//! project scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          jumpstart-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (TemplateResolver, ScaffoldService)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ManifestLoader, Runner...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    jumpstart-adapters (Infrastructure)  │
//! │ (LocalFilesystem, ShellCommandRunner..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (TemplateManifest, ResolvedTemplate,    │
//! │  ExecutionPlan, VariableBinding)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jumpstart_core::prelude::*;
//!
//! let resolver = TemplateResolver::new(loader, workspace, reporter.clone(), settings);
//! let service = ScaffoldService::new(resolver, ports, VariableSettings::default());
//! let outcome = service.init(InitRequest::new("node", "./my-project"))?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, InitOutcome, InitRequest, ResolverSettings, ScaffoldEvent,
        ScaffoldPorts, ScaffoldService, TemplateResolver, VariableSettings, VcsStatus,
        ports::{
            AccountLookup, CommandOutput, CommandRunner, Filesystem, ManifestLoader,
            RepositoryInitializer, Reporter, WorkspaceLocator,
        },
    };
    pub use crate::domain::{
        DomainError, ExecutionPlan, ResolvedTemplate, TemplateManifest, Variable,
        VariableNamespace, VariableOverrides,
    };
    pub use crate::error::{ErrorCategory, JumpstartError, JumpstartResult};
}
