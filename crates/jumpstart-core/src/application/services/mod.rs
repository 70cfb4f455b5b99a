//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve a template" or "scaffold a project".

pub mod resolver;
pub mod scaffold_service;
pub mod substitution;

#[cfg(test)]
pub(crate) mod testing;

pub use resolver::{ResolverSettings, TemplateResolver};
pub use scaffold_service::{
    InitOutcome, InitRequest, ScaffoldPorts, ScaffoldService, StepRecord, TemplateSummary,
    VariableSettings, VcsStatus,
};
pub use substitution::{SubstitutionReport, VCS_DIR, VariableSubstitutor};
