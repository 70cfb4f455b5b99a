//! Structured progress events emitted through the [`Reporter`] port.
//!
//! [`Reporter`]: crate::application::ports::Reporter

use std::fmt;
use std::path::PathBuf;

use crate::domain::{ExecutionPlan, PlannedAction, Variable};

/// Severity used by reporters to route an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
}

/// A placeholder left in the tree after substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for UnresolvedPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaffoldEvent {
    ManifestLoaded {
        directory: PathBuf,
        legacy: bool,
        steps: usize,
    },
    TemplateResolved {
        name: String,
        source: PathBuf,
        depth: usize,
    },
    PlanReady {
        plan: ExecutionPlan,
    },
    DestinationPrepared {
        path: PathBuf,
        created: bool,
    },
    StepStarted {
        template: String,
        index: usize,
        action: PlannedAction,
    },
    StepCompleted {
        template: String,
        index: usize,
        stdout: String,
    },
    StepFailed {
        template: String,
        index: usize,
        reason: String,
    },
    VariableSet {
        variable: Variable,
        value: String,
    },
    VariableSkipped {
        variable: Variable,
    },
    VariableEmpty {
        variable: Variable,
    },
    FileSkipped {
        path: PathBuf,
        reason: String,
    },
    SubstitutionCompleted {
        files_scanned: usize,
        files_rewritten: usize,
    },
    UnsubstitutedVariables {
        occurrences: Vec<UnresolvedPlaceholder>,
    },
    VcsInitialized {
        path: PathBuf,
    },
    VcsInitFailed {
        path: PathBuf,
        reason: String,
    },
    TemplateInvalid {
        path: PathBuf,
        reason: String,
    },
}

impl ScaffoldEvent {
    pub fn level(&self) -> EventLevel {
        match self {
            Self::ManifestLoaded { .. }
            | Self::TemplateResolved { .. }
            | Self::PlanReady { .. }
            | Self::StepCompleted { .. }
            | Self::FileSkipped { .. } => EventLevel::Debug,
            Self::DestinationPrepared { .. }
            | Self::StepStarted { .. }
            | Self::VariableSet { .. }
            | Self::VariableSkipped { .. }
            | Self::SubstitutionCompleted { .. }
            | Self::VcsInitialized { .. } => EventLevel::Info,
            Self::StepFailed { .. }
            | Self::VariableEmpty { .. }
            | Self::UnsubstitutedVariables { .. }
            | Self::VcsInitFailed { .. }
            | Self::TemplateInvalid { .. } => EventLevel::Warn,
        }
    }
}

impl fmt::Display for ScaffoldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestLoaded {
                directory,
                legacy,
                steps,
            } => {
                let kind = if *legacy { "legacy layout" } else { "manifest" };
                write!(f, "loaded {kind} in {} ({steps} steps)", directory.display())
            }
            Self::TemplateResolved { name, source, depth } => {
                write!(f, "resolved template '{name}' at {} (depth {depth})", source.display())
            }
            Self::PlanReady { plan } => write!(
                f,
                "planned {} steps from {} template(s)",
                plan.len(),
                plan.templates.len()
            ),
            Self::DestinationPrepared { path, created } => {
                if *created {
                    write!(f, "created {}", path.display())
                } else {
                    write!(f, "using existing {}", path.display())
                }
            }
            Self::StepStarted {
                template,
                index,
                action,
            } => write!(f, "[{template} #{index}] {action}"),
            Self::StepCompleted {
                template, index, ..
            } => write!(f, "[{template} #{index}] done"),
            Self::StepFailed {
                template,
                index,
                reason,
            } => write!(f, "[{template} #{index}] failed: {reason}"),
            Self::VariableSet { variable, value } => write!(f, "{variable} = {value:?}"),
            Self::VariableSkipped { variable } => {
                write!(f, "{variable} has no value, leaving its placeholder in place")
            }
            Self::VariableEmpty { variable } => {
                write!(f, "{variable} is empty, its placeholder will be removed")
            }
            Self::FileSkipped { path, reason } => {
                write!(f, "skipped {}: {reason}", path.display())
            }
            Self::SubstitutionCompleted {
                files_scanned,
                files_rewritten,
            } => write!(f, "substituted variables in {files_rewritten} of {files_scanned} files"),
            Self::UnsubstitutedVariables { occurrences } => {
                write!(f, "{} unsubstituted placeholder(s) remain", occurrences.len())
            }
            Self::VcsInitialized { path } => {
                write!(f, "initialized git repository in {}", path.display())
            }
            Self::VcsInitFailed { path, reason } => {
                write!(f, "git init failed in {}: {reason}", path.display())
            }
            Self::TemplateInvalid { path, reason } => {
                write!(f, "invalid template in {}: {reason}", path.display())
            }
        }
    }
}
