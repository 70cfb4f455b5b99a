//! Template manifest model.
//!
//! A manifest is read in two stages. The loader deserializes the document
//! into the loosely shaped [`ManifestDocument`] (any mapping format works, the
//! adapters use YAML), then [`TemplateManifest::from_document`] validates it
//! into the typed form the resolver and orchestrator consume.
//!
//! ```yaml
//! jumpstart:
//!   extends: base            # or a list
//!   steps:
//!     - copy: { from: ./files, to: ./config }
//!     - run: ["npm install", "npm test"]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::domain::common::RelativePath;
use crate::domain::error::DomainError;

/// Directory a manifest-less template copies from.
pub const LEGACY_FILES_DIR: &str = "files";

/// Operator joining the commands of one `run` step.
pub const COMMAND_SEPARATOR: &str = " && ";

// ── Raw document ──────────────────────────────────────────────────────────────

/// The whole manifest file: a single `jumpstart` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDocument {
    pub jumpstart: DefinitionDocument,
}

/// Body of the `jumpstart` key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionDocument {
    #[serde(default)]
    pub extends: Option<ExtendsDocument>,
    #[serde(default)]
    pub steps: Vec<StepDocument>,
    /// First-generation manifests only had a list of commands to run after the
    /// copy. It is kept as a trailing `run` step.
    #[serde(default, rename = "post-copy")]
    pub post_copy: Option<Vec<String>>,
}

/// `extends` accepts a single reference or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExtendsDocument {
    One(String),
    Many(Vec<String>),
}

impl ExtendsDocument {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(single) => vec![single],
            Self::Many(list) => list,
        }
    }
}

/// One entry of `steps`, before its shape is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct StepDocument {
    #[serde(default)]
    copy: Option<CopyDocument>,
    #[serde(default)]
    run: Option<Vec<String>>,
    #[serde(flatten)]
    unknown: BTreeMap<String, IgnoredAny>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CopyDocument {
    from: String,
    #[serde(default)]
    to: Option<String>,
}

// ── Typed manifest ────────────────────────────────────────────────────────────

/// Where a manifest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOrigin {
    /// Parsed from a manifest file.
    File(PathBuf),
    /// Synthesized for a template that only has a `files/` directory.
    Legacy(PathBuf),
}

impl ManifestOrigin {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Legacy(path) => path,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

/// A validated template manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifest {
    origin: ManifestOrigin,
    extends: Vec<String>,
    steps: Vec<Step>,
}

impl TemplateManifest {
    /// Validate a parsed document read from `path`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnknownStepShape`] when a step is not exactly one of
    ///   `copy` / `run`.
    /// - [`DomainError::InvalidPathOperand`] when a copy path is absolute or
    ///   escapes its root.
    /// - [`DomainError::ManifestInvalid`] for empty `extends` entries.
    pub fn from_document(document: ManifestDocument, path: &Path) -> Result<Self, DomainError> {
        let definition = document.jumpstart;

        let extends = definition
            .extends
            .map(ExtendsDocument::into_vec)
            .unwrap_or_default();
        if let Some(position) = extends.iter().position(|e| e.trim().is_empty()) {
            return Err(DomainError::ManifestInvalid {
                path: path.to_path_buf(),
                detail: format!("extends entry #{position} is empty"),
            });
        }

        let mut steps = definition
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| Step::from_document(step, index, path))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(commands) = definition.post_copy {
            steps.push(Step::Run(RunStep::new(commands)));
        }

        Ok(Self {
            origin: ManifestOrigin::File(path.to_path_buf()),
            extends,
            steps,
        })
    }

    /// The manifest implied by a bare `files/` directory:
    /// `{ steps: [ { copy: { from: "./files" } } ] }`.
    pub fn legacy(files_dir: impl Into<PathBuf>) -> Self {
        let copy = CopyStep {
            from: RelativePath::child(LEGACY_FILES_DIR),
            to: None,
        };
        Self {
            origin: ManifestOrigin::Legacy(files_dir.into()),
            extends: Vec::new(),
            steps: vec![Step::Copy(copy)],
        }
    }

    pub fn origin(&self) -> &ManifestOrigin {
        &self.origin
    }

    /// Ancestor references, always normalized to a list.
    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// One unit of template execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Copy(CopyStep),
    Run(RunStep),
}

impl Step {
    fn from_document(doc: StepDocument, index: usize, manifest: &Path) -> Result<Self, DomainError> {
        let unknown_shape = |found: String| DomainError::UnknownStepShape {
            manifest: manifest.to_path_buf(),
            index,
            found,
        };

        if !doc.unknown.is_empty() {
            let keys: Vec<&str> = doc.unknown.keys().map(String::as_str).collect();
            return Err(unknown_shape(format!("key(s) {}", keys.join(", "))));
        }

        match (doc.copy, doc.run) {
            (Some(copy), None) => Ok(Self::Copy(CopyStep {
                from: RelativePath::try_new("copy.from", &copy.from)?,
                to: copy
                    .to
                    .as_deref()
                    .map(|to| RelativePath::try_new("copy.to", to))
                    .transpose()?,
            })),
            (None, Some(commands)) => Ok(Self::Run(RunStep::new(commands))),
            (Some(_), Some(_)) => Err(unknown_shape("both `copy` and `run`".into())),
            (None, None) => Err(unknown_shape("an empty step".into())),
        }
    }

    /// Short lowercase name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Copy(_) => "copy",
            Self::Run(_) => "run",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy(copy) => write!(f, "copy {} -> {}", copy.from, copy.destination()),
            Self::Run(run) => write!(f, "run `{}`", run.script()),
        }
    }
}

/// Copy a subpath of the template source into the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub from: RelativePath,
    pub to: Option<RelativePath>,
}

impl CopyStep {
    /// Destination subpath, `.` when the step copies into the root.
    pub fn destination(&self) -> String {
        self.to
            .as_ref()
            .map_or_else(|| ".".to_string(), ToString::to_string)
    }
}

/// Run shell commands, each only if the previous one succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStep {
    commands: Vec<String>,
}

impl RunStep {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    /// The commands joined into one shell invocation.
    pub fn script(&self) -> String {
        self.commands.join(COMMAND_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.iter().all(|c| c.trim().is_empty())
    }
}
