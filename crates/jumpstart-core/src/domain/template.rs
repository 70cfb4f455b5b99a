//! Resolved templates and the flattened execution plan.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::common::ensure_absolute;
use crate::domain::descriptor::TemplateDescriptor;
use crate::domain::error::DomainError;
use crate::domain::manifest::{Step, TemplateManifest};

/// Hard ceiling on `extends` nesting. Also what stops cycles.
pub const MAX_EXTENDS_DEPTH: usize = 4;

/// A template located on disk with its manifest loaded and its ancestors
/// resolved recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub canonical_name: String,
    pub descriptor: TemplateDescriptor,
    pub source_directory: PathBuf,
    pub manifest: TemplateManifest,
    pub ancestors: Vec<ResolvedTemplate>,
}

impl ResolvedTemplate {
    /// Last segment of the source directory, or the whole path when it has none.
    pub fn canonical_name_of(source_directory: &Path) -> String {
        source_directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_directory.display().to_string())
    }

    /// Templates in execution order: ancestors before descendants, depth
    /// first, in `extends` declaration order.
    ///
    /// A template reached through several paths of the graph appears once,
    /// at its first position.
    pub fn linearize(&self) -> Vec<&ResolvedTemplate> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        self.collect(&mut seen, &mut ordered);
        ordered
    }

    fn collect<'a>(&'a self, seen: &mut HashSet<&'a Path>, ordered: &mut Vec<&'a ResolvedTemplate>) {
        for ancestor in &self.ancestors {
            ancestor.collect(seen, ordered);
        }
        if seen.insert(self.source_directory.as_path()) {
            ordered.push(self);
        }
    }

    /// Number of templates in the graph, counting repeats.
    pub fn graph_size(&self) -> usize {
        1 + self.ancestors.iter().map(Self::graph_size).sum::<usize>()
    }

    /// Flatten the graph into concrete actions against `destination`.
    ///
    /// Every copy operand is made absolute here so that nothing is mutated
    /// before all operands have been validated.
    pub fn plan(&self, destination: &Path) -> Result<ExecutionPlan, DomainError> {
        ensure_absolute("destination", destination)?;

        let mut steps = Vec::new();
        let ordered = self.linearize();
        for template in &ordered {
            ensure_absolute("template source", &template.source_directory)?;

            for (index, step) in template.manifest.steps().iter().enumerate() {
                let action = match step {
                    Step::Copy(copy) => {
                        let source = copy.from.resolve_under(&template.source_directory);
                        let target = copy
                            .to
                            .as_ref()
                            .map_or_else(|| destination.to_path_buf(), |to| to.resolve_under(destination));
                        ensure_absolute("copy.from", &source)?;
                        ensure_absolute("copy.to", &target)?;
                        PlannedAction::Copy {
                            source,
                            destination: target,
                        }
                    }
                    Step::Run(run) if run.is_empty() => continue,
                    Step::Run(run) => PlannedAction::Run {
                        script: run.script(),
                        working_directory: destination.to_path_buf(),
                    },
                };

                steps.push(PlannedStep {
                    template: template.canonical_name.clone(),
                    index,
                    action,
                });
            }
        }

        Ok(ExecutionPlan {
            destination: destination.to_path_buf(),
            templates: ordered.iter().map(|t| t.canonical_name.clone()).collect(),
            steps,
        })
    }
}

/// The ordered list of actions one `init` will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub destination: PathBuf,
    /// Contributing templates in execution order.
    pub templates: Vec<String>,
    pub steps: Vec<PlannedStep>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedStep> {
        self.steps.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    /// Canonical name of the template that declared the step.
    pub template: String,
    /// Position of the step inside that template's manifest.
    pub index: usize,
    pub action: PlannedAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Copy {
        source: PathBuf,
        destination: PathBuf,
    },
    Run {
        script: String,
        working_directory: PathBuf,
    },
}

impl PlannedAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "copy",
            Self::Run { .. } => "run",
        }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy {
                source,
                destination,
            } => write!(f, "copy {} -> {}", source.display(), destination.display()),
            Self::Run { script, .. } => write!(f, "run `{script}`"),
        }
    }
}
