//! Template Resolver - turns a descriptor into a fully resolved template graph.
//!
//! Resolution is depth-first over `extends`, bounded by a hard depth
//! ceiling. The ceiling is also what terminates cycles: a template that
//! (indirectly) extends itself keeps descending until the bound is hit.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument};

use crate::{
    application::{
        events::ScaffoldEvent,
        ports::{ManifestLoader, Reporter, WorkspaceLocator},
    },
    domain::{
        DEFAULT_REPO_PREFIX, DEFAULT_TEMPLATES_DIR, DomainError, MAX_EXTENDS_DEPTH,
        ResolvedTemplate, TemplateDescriptor, TemplateLocation, TemplateManifest, absolutize,
    },
    error::JumpstartResult,
};

/// How descriptors are turned into directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Directory of named templates, relative to the workspace root.
    pub templates_dir: PathBuf,
    pub repo_prefix: String,
    /// Base for relative path descriptors.
    pub working_directory: PathBuf,
}

impl ResolverSettings {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            repo_prefix: DEFAULT_REPO_PREFIX.to_string(),
            working_directory: working_directory.into(),
        }
    }
}

pub struct TemplateResolver {
    loader: Arc<dyn ManifestLoader>,
    workspace: Arc<dyn WorkspaceLocator>,
    reporter: Arc<dyn Reporter>,
    settings: ResolverSettings,
    root: OnceLock<PathBuf>,
}

impl TemplateResolver {
    pub fn new(
        loader: Arc<dyn ManifestLoader>,
        workspace: Arc<dyn WorkspaceLocator>,
        reporter: Arc<dyn Reporter>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            loader,
            workspace,
            reporter,
            settings,
            root: OnceLock::new(),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve `descriptor` and, recursively, everything it extends.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MaxDepthExceeded`] when `extends` nests too deep or
    ///   loops.
    /// - Whatever the loader reports for a missing or invalid manifest.
    /// - `WorkspaceUnavailable` when a named or `repo:` descriptor is used
    ///   outside a workspace.
    pub fn resolve(&self, descriptor: &str) -> JumpstartResult<ResolvedTemplate> {
        let mut chain = Vec::new();
        self.resolve_at(descriptor, 0, &mut chain)
    }

    #[instrument(skip_all, fields(descriptor = %raw, depth = depth))]
    fn resolve_at(
        &self,
        raw: &str,
        depth: usize,
        chain: &mut Vec<String>,
    ) -> JumpstartResult<ResolvedTemplate> {
        chain.push(raw.to_string());

        if depth >= MAX_EXTENDS_DEPTH {
            return Err(DomainError::MaxDepthExceeded {
                descriptor: raw.to_string(),
                max_depth: MAX_EXTENDS_DEPTH,
                chain: chain.join(" -> "),
            }
            .into());
        }

        let descriptor = TemplateDescriptor::parse_with_prefix(raw, &self.settings.repo_prefix)?;
        let source_directory = self.locate(&descriptor)?;
        debug!(source = %source_directory.display(), "Loading manifest");

        let manifest = self.loader.load(&source_directory)?;
        self.reporter.report(&ScaffoldEvent::ManifestLoaded {
            directory: source_directory.clone(),
            legacy: manifest.origin().is_legacy(),
            steps: manifest.steps().len(),
        });

        let ancestors = manifest
            .extends()
            .iter()
            .map(|parent| self.resolve_at(parent, depth + 1, chain))
            .collect::<JumpstartResult<Vec<_>>>()?;

        chain.pop();

        let canonical_name = ResolvedTemplate::canonical_name_of(&source_directory);
        self.reporter.report(&ScaffoldEvent::TemplateResolved {
            name: canonical_name.clone(),
            source: source_directory.clone(),
            depth,
        });

        Ok(ResolvedTemplate {
            canonical_name,
            descriptor,
            source_directory,
            manifest,
            ancestors,
        })
    }

    /// Absolute directory a descriptor points at.
    pub fn locate(&self, descriptor: &TemplateDescriptor) -> JumpstartResult<PathBuf> {
        let path = match descriptor.location() {
            TemplateLocation::Path(path) => absolutize(path, &self.settings.working_directory),
            TemplateLocation::Repository(path) => absolutize(path, &self.workspace_root()?),
            TemplateLocation::Named(name) => self.templates_directory()?.join(name),
        };
        Ok(path)
    }

    /// `<workspace root>/<templates dir>`.
    pub fn templates_directory(&self) -> JumpstartResult<PathBuf> {
        Ok(absolutize(&self.settings.templates_dir, &self.workspace_root()?))
    }

    /// Read a single manifest without following `extends`.
    pub fn load_manifest(&self, directory: &Path) -> JumpstartResult<TemplateManifest> {
        self.loader.load(directory)
    }

    /// The workspace root, looked up on first use.
    pub fn workspace_root(&self) -> JumpstartResult<PathBuf> {
        if let Some(root) = self.root.get() {
            return Ok(root.clone());
        }
        let root = absolutize(
            &self.workspace.workspace_root()?,
            &self.settings.working_directory,
        );
        debug!(root = %root.display(), "Workspace root located");
        Ok(self.root.get_or_init(|| root).clone())
    }
}
