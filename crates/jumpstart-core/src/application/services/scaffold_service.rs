//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the whole `init` workflow:
//! 1. Resolve the template graph
//! 2. Plan: flatten it parent-first and validate every operand
//! 3. Prepare the destination
//! 4. Execute copy / run steps in plan order
//! 5. Derive variables and substitute them into the tree
//! 6. Optionally initialize a git repository
//!
//! Phases 1 and 2 never mutate anything, so a malformed template fails
//! before the destination is touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        events::ScaffoldEvent,
        ports::{AccountLookup, CommandRunner, Filesystem, RepositoryInitializer, Reporter},
        services::{
            resolver::TemplateResolver,
            substitution::{SubstitutionReport, VariableSubstitutor},
        },
    },
    domain::{
        ExecutionPlan, PlannedAction, PlannedStep, Variable, VariableBinding, VariableNamespace,
        VariableOverrides, absolutize, derive_project_name, ensure_absolute,
    },
    error::{JumpstartError, JumpstartResult},
};

/// Driven ports the orchestrator needs besides the resolver's.
#[derive(Clone)]
pub struct ScaffoldPorts {
    pub filesystem: Arc<dyn Filesystem>,
    pub runner: Arc<dyn CommandRunner>,
    pub repository: Arc<dyn RepositoryInitializer>,
    pub accounts: Arc<dyn AccountLookup>,
    pub reporter: Arc<dyn Reporter>,
}

/// Token naming plus the environment overrides captured at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSettings {
    pub namespace: VariableNamespace,
    pub overrides: VariableOverrides,
}

/// Input of [`ScaffoldService::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitRequest {
    pub template: String,
    pub destination: PathBuf,
    pub force: bool,
    pub git: bool,
    pub dry_run: bool,
}

impl InitRequest {
    pub fn new(template: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            destination: destination.into(),
            force: false,
            git: true,
            dry_run: false,
        }
    }
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub template: String,
    pub index: usize,
    pub action: PlannedAction,
    pub stdout: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsStatus {
    Skipped,
    Initialized,
    Failed { reason: String },
}

/// Summary of one `init` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub run_id: Uuid,
    pub template: String,
    pub destination: PathBuf,
    pub plan: ExecutionPlan,
    pub executed: Vec<StepRecord>,
    pub bindings: Vec<VariableBinding>,
    pub substitution: Option<SubstitutionReport>,
    pub vcs: VcsStatus,
    pub dry_run: bool,
}

/// A named template found in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub path: PathBuf,
    pub extends: Vec<String>,
    pub steps: usize,
    pub legacy: bool,
    /// Why the manifest could not be read, for templates that are broken.
    pub invalid: Option<String>,
}

/// Per-invocation mutable state.
struct ExecutionContext {
    run_id: Uuid,
    destination: PathBuf,
    executed: Vec<StepRecord>,
    bindings: Vec<VariableBinding>,
}

impl ExecutionContext {
    fn new(destination: PathBuf) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            destination,
            executed: Vec::new(),
            bindings: Vec::new(),
        }
    }

    fn finish(
        self,
        template: String,
        plan: ExecutionPlan,
        substitution: Option<SubstitutionReport>,
        vcs: VcsStatus,
        dry_run: bool,
    ) -> InitOutcome {
        InitOutcome {
            run_id: self.run_id,
            template,
            destination: self.destination,
            plan,
            executed: self.executed,
            bindings: self.bindings,
            substitution,
            vcs,
            dry_run,
        }
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    resolver: TemplateResolver,
    ports: ScaffoldPorts,
    variables: VariableSettings,
    substitutor: VariableSubstitutor,
}

impl ScaffoldService {
    pub fn new(resolver: TemplateResolver, ports: ScaffoldPorts, variables: VariableSettings) -> Self {
        let substitutor = VariableSubstitutor::new(ports.filesystem.clone(), ports.reporter.clone());
        Self {
            resolver,
            ports,
            variables,
            substitutor,
        }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Create a project from a template.
    ///
    /// # Errors
    ///
    /// Resolution and plan errors are returned before anything is written.
    /// Later errors leave the destination as far as it got.
    #[instrument(
        skip_all,
        fields(
            template = %request.template,
            destination = %request.destination.display(),
            force = request.force,
            dry_run = request.dry_run
        )
    )]
    pub fn init(&self, request: InitRequest) -> JumpstartResult<InitOutcome> {
        let destination = absolutize(
            &request.destination,
            &self.resolver.settings().working_directory,
        );
        let mut ctx = ExecutionContext::new(destination.clone());
        info!(run_id = %ctx.run_id, "Starting scaffold");

        // 1. Resolve
        let template = self.resolver.resolve(&request.template)?;

        // 2. Plan
        let plan = template.plan(&destination)?;
        self.check_sources(&plan)?;
        self.ports.reporter.report(&ScaffoldEvent::PlanReady { plan: plan.clone() });

        let exists = self.check_destination(&destination, request.force)?;

        if request.dry_run {
            info!(steps = plan.len(), "Dry run, nothing written");
            return Ok(ctx.finish(request.template, plan, None, VcsStatus::Skipped, true));
        }

        // 3. Prepare destination
        if !exists {
            self.ports.filesystem.create_dir_all(&destination)?;
        }
        self.ports.reporter.report(&ScaffoldEvent::DestinationPrepared {
            path: destination.clone(),
            created: !exists,
        });

        // 4. Execute
        for step in plan.iter() {
            let record = self.execute(step)?;
            ctx.executed.push(record);
        }

        // 5. Derive + substitute
        ctx.bindings = self.derive_bindings(&destination)?;
        let substitution = self.substitutor.substitute(
            &destination,
            &ctx.bindings,
            &self.variables.namespace.marker(),
        )?;

        // 6. VCS
        let vcs = if request.git {
            self.initialize_repository(&destination)
        } else {
            VcsStatus::Skipped
        };

        info!(steps = ctx.executed.len(), "Scaffold completed successfully");
        Ok(ctx.finish(request.template, plan, Some(substitution), vcs, false))
    }

    /// Named templates under the workspace templates directory.
    ///
    /// Directories without a manifest or `files/` are not templates and are
    /// left out. A template whose manifest does not parse is still listed,
    /// marked invalid, so one broken template does not hide the rest.
    pub fn list_templates(&self) -> JumpstartResult<Vec<TemplateSummary>> {
        let root = self.resolver.templates_directory()?;
        if !self.ports.filesystem.is_dir(&root) {
            debug!(root = %root.display(), "No templates directory");
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for dir in self.ports.filesystem.list_dirs(&root)? {
            let name = crate::domain::ResolvedTemplate::canonical_name_of(&dir);
            match self.resolver.load_manifest(&dir) {
                Ok(manifest) => summaries.push(TemplateSummary {
                    name,
                    extends: manifest.extends().to_vec(),
                    steps: manifest.steps().len(),
                    legacy: manifest.origin().is_legacy(),
                    invalid: None,
                    path: dir,
                }),
                Err(JumpstartError::Domain(crate::domain::DomainError::ManifestMissing { .. })) => {
                    debug!(dir = %dir.display(), "Not a template directory");
                }
                Err(JumpstartError::Domain(e)) => {
                    let reason = e.to_string();
                    self.ports.reporter.report(&ScaffoldEvent::TemplateInvalid {
                        path: dir.clone(),
                        reason: reason.clone(),
                    });
                    summaries.push(TemplateSummary {
                        name,
                        extends: Vec::new(),
                        steps: 0,
                        legacy: false,
                        invalid: Some(reason),
                        path: dir,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summaries)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Copy sources must exist before anything is written.
    fn check_sources(&self, plan: &ExecutionPlan) -> JumpstartResult<()> {
        for step in plan.iter() {
            if let PlannedAction::Copy { source, .. } = &step.action {
                if !self.ports.filesystem.exists(source) {
                    return Err(ApplicationError::filesystem(
                        source,
                        format!(
                            "copy source of step #{} in template '{}' does not exist",
                            step.index, step.template
                        ),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Returns whether the destination already exists.
    fn check_destination(&self, destination: &Path, force: bool) -> JumpstartResult<bool> {
        let fs = &self.ports.filesystem;
        if !fs.exists(destination) {
            return Ok(false);
        }
        if !fs.is_dir(destination) {
            return Err(ApplicationError::filesystem(
                destination,
                "destination exists and is not a directory",
            )
            .into());
        }
        if !force && !fs.is_empty_dir(destination)? {
            return Err(ApplicationError::DestinationNotEmpty {
                path: destination.to_path_buf(),
            }
            .into());
        }
        if force {
            warn!(destination = %destination.display(), "Scaffolding into existing directory");
        }
        Ok(true)
    }

    fn execute(&self, step: &PlannedStep) -> JumpstartResult<StepRecord> {
        self.ports.reporter.report(&ScaffoldEvent::StepStarted {
            template: step.template.clone(),
            index: step.index,
            action: step.action.clone(),
        });

        let result = match &step.action {
            PlannedAction::Copy {
                source,
                destination,
            } => self.copy(source, destination),
            PlannedAction::Run {
                script,
                working_directory,
            } => self.run(step, script, working_directory),
        };

        match result {
            Ok(stdout) => {
                self.ports.reporter.report(&ScaffoldEvent::StepCompleted {
                    template: step.template.clone(),
                    index: step.index,
                    stdout: stdout.clone(),
                });
                Ok(StepRecord {
                    template: step.template.clone(),
                    index: step.index,
                    action: step.action.clone(),
                    stdout,
                })
            }
            Err(e) => {
                self.ports.reporter.report(&ScaffoldEvent::StepFailed {
                    template: step.template.clone(),
                    index: step.index,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn copy(&self, source: &Path, destination: &Path) -> JumpstartResult<String> {
        ensure_absolute("copy.from", source)?;
        ensure_absolute("copy.to", destination)?;
        let copied = self.ports.filesystem.copy_recursive(source, destination)?;
        debug!(copied, "Copied files");
        Ok(String::new())
    }

    fn run(&self, step: &PlannedStep, script: &str, cwd: &Path) -> JumpstartResult<String> {
        match self.ports.runner.run(script, cwd) {
            Ok(output) => Ok(output.stdout),
            Err(JumpstartError::Application(ApplicationError::CommandFailed {
                command,
                status,
                stderr,
            })) => Err(ApplicationError::StepExecutionFailure {
                template: step.template.clone(),
                index: step.index,
                command,
                status,
                stderr,
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    /// An override replaces its variable's derivation entirely.
    fn derive_bindings(&self, destination: &Path) -> JumpstartResult<Vec<VariableBinding>> {
        let namespace = &self.variables.namespace;
        let mut bindings = Vec::with_capacity(Variable::ALL.len());

        for variable in Variable::ALL {
            let value = match self.variables.overrides.get(variable) {
                Some(value) => {
                    debug!(%variable, "Using environment override");
                    Some(value.to_string())
                }
                None => match variable {
                    Variable::ProjectName => Some(derive_project_name(destination)?),
                    Variable::GithubUser => self.ports.accounts.github_user(),
                    Variable::ProjectDescription => Some(String::new()),
                },
            };
            bindings.push(VariableBinding::new(namespace, variable, value));
        }

        Ok(bindings)
    }

    fn initialize_repository(&self, destination: &Path) -> VcsStatus {
        let repo = &self.ports.repository;
        let result = repo
            .init(destination)
            .and_then(|()| repo.stage_all(destination));

        match result {
            Ok(()) => {
                self.ports.reporter.report(&ScaffoldEvent::VcsInitialized {
                    path: destination.to_path_buf(),
                });
                VcsStatus::Initialized
            }
            Err(e) => {
                let failure = ApplicationError::VcsInitFailure {
                    path: destination.to_path_buf(),
                    reason: e.to_string(),
                };
                self.ports.reporter.report(&ScaffoldEvent::VcsInitFailed {
                    path: destination.to_path_buf(),
                    reason: e.to_string(),
                });
                VcsStatus::Failed {
                    reason: failure.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CommandOutput, ManifestLoader, MockAccountLookup, MockCommandRunner,
        MockRepositoryInitializer, MockWorkspaceLocator,
    };
    use crate::application::services::resolver::ResolverSettings;
    use crate::application::services::testing::{FakeFilesystem, RecordingReporter};
    use crate::domain::{DomainError, ManifestDocument, TemplateManifest};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Manifests keyed by template directory.
    struct TableLoader(BTreeMap<PathBuf, String>);

    impl ManifestLoader for TableLoader {
        fn load(&self, directory: &Path) -> JumpstartResult<TemplateManifest> {
            let path = directory.join("jumpstart.yaml");
            let Some(yaml) = self.0.get(directory) else {
                return Err(DomainError::ManifestMissing {
                    directory: directory.to_path_buf(),
                }
                .into());
            };
            let doc: ManifestDocument =
                serde_yaml::from_str(yaml).map_err(|e| DomainError::ManifestInvalid {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
            Ok(TemplateManifest::from_document(doc, &path)?)
        }
    }

    /// Runner that records scripts and, for `echo done > marker.txt`, writes
    /// the marker into the fake filesystem.
    struct ScriptRunner {
        fs: Arc<FakeFilesystem>,
        scripts: Mutex<Vec<String>>,
    }

    impl CommandRunner for ScriptRunner {
        fn run(&self, script: &str, cwd: &Path) -> JumpstartResult<CommandOutput> {
            self.scripts.lock().unwrap().push(script.to_string());
            if script == "echo done > marker.txt" {
                self.fs.write_file(&cwd.join("marker.txt"), b"done\n")?;
            }
            if script == "false" {
                return Err(ApplicationError::CommandFailed {
                    command: script.into(),
                    status: "exit status: 1".into(),
                    stderr: "boom".into(),
                }
                .into());
            }
            Ok(CommandOutput {
                stdout: format!("ran {script}"),
                stderr: String::new(),
            })
        }
    }

    struct Harness {
        fs: Arc<FakeFilesystem>,
        reporter: Arc<RecordingReporter>,
        runner: Arc<ScriptRunner>,
        service: ScaffoldService,
    }

    fn no_git() -> MockRepositoryInitializer {
        let mut repo = MockRepositoryInitializer::new();
        repo.expect_init().never();
        repo.expect_stage_all().never();
        repo
    }

    fn user(login: Option<&'static str>) -> MockAccountLookup {
        let mut accounts = MockAccountLookup::new();
        accounts
            .expect_github_user()
            .returning(move || login.map(String::from));
        accounts
    }

    fn harness(
        templates: &[(&str, &str)],
        fs: FakeFilesystem,
        repo: MockRepositoryInitializer,
        accounts: MockAccountLookup,
        variables: VariableSettings,
    ) -> Harness {
        let fs = Arc::new(fs);
        let reporter = Arc::new(RecordingReporter::default());
        let runner = Arc::new(ScriptRunner {
            fs: fs.clone(),
            scripts: Mutex::new(Vec::new()),
        });
        let loader = TableLoader(
            templates
                .iter()
                .map(|(dir, yaml)| (PathBuf::from(dir), yaml.to_string()))
                .collect(),
        );
        let mut ws = MockWorkspaceLocator::new();
        ws.expect_workspace_root()
            .returning(|| Ok(PathBuf::from("/ws")));

        let resolver = TemplateResolver::new(
            Arc::new(loader),
            Arc::new(ws),
            reporter.clone(),
            ResolverSettings::new("/work"),
        );
        let ports = ScaffoldPorts {
            filesystem: fs.clone(),
            runner: runner.clone(),
            repository: Arc::new(repo),
            accounts: Arc::new(accounts),
            reporter: reporter.clone(),
        };
        Harness {
            fs,
            reporter,
            runner,
            service: ScaffoldService::new(resolver, ports, variables),
        }
    }

    fn request(template: &str, destination: &str) -> InitRequest {
        InitRequest {
            git: false,
            ..InitRequest::new(template, destination)
        }
    }

    const A: &str = "jumpstart:\n  steps:\n    - copy: { from: ./files }\n";
    const B: &str = "jumpstart:\n  extends: a\n  steps:\n    - run: [\"echo done > marker.txt\"]\n";

    fn template_files() -> FakeFilesystem {
        FakeFilesystem::default().with_file(
            "/ws/templates/a/files/README.md",
            "Hello __JUMPSTART_PROJECT_NAME__",
        )
    }

    #[test]
    fn copies_and_substitutes_project_name() {
        let h = harness(
            &[("/ws/templates/a", A)],
            template_files(),
            no_git(),
            user(Some("octo")),
            VariableSettings::default(),
        );

        let outcome = h.service.init(request("a", "/tmp/dest")).unwrap();

        assert_eq!(h.fs.read_string("/tmp/dest/README.md").unwrap(), "Hello dest");
        assert_eq!(outcome.destination, PathBuf::from("/tmp/dest"));
        assert_eq!(outcome.executed.len(), 1);
        assert_eq!(outcome.vcs, VcsStatus::Skipped);
        let sub = outcome.substitution.unwrap();
        assert_eq!(sub.files_rewritten, 1);
        assert!(sub.leftovers.is_empty());
    }

    #[test]
    fn parent_steps_run_before_child_steps() {
        let h = harness(
            &[("/ws/templates/a", A), ("/ws/templates/b", B)],
            template_files(),
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let outcome = h.service.init(request("b", "/tmp/dest")).unwrap();

        let kinds: Vec<_> = outcome
            .executed
            .iter()
            .map(|r| (r.template.as_str(), r.action.kind()))
            .collect();
        assert_eq!(kinds, vec![("a", "copy"), ("b", "run")]);
        assert!(h.fs.read_string("/tmp/dest/README.md").is_some());
        assert_eq!(h.fs.read_string("/tmp/dest/marker.txt").unwrap(), "done\n");
        assert_eq!(outcome.executed[1].stdout, "ran echo done > marker.txt");
    }

    #[test]
    fn non_empty_destination_is_refused_without_force() {
        let fs = template_files().with_file("/tmp/dest/existing.txt", "keep");
        let h = harness(
            &[("/ws/templates/a", A)],
            fs,
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let err = h.service.init(request("a", "/tmp/dest")).unwrap_err();

        assert!(matches!(
            err,
            JumpstartError::Application(ApplicationError::DestinationNotEmpty { .. })
        ));
        assert_eq!(h.fs.file_count(), 2);
        assert!(h.runner.scripts.lock().unwrap().is_empty());
    }

    #[test]
    fn force_scaffolds_into_non_empty_destination() {
        let fs = template_files().with_file("/tmp/dest/existing.txt", "keep");
        let h = harness(
            &[("/ws/templates/a", A)],
            fs,
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let outcome = h
            .service
            .init(InitRequest {
                force: true,
                ..request("a", "/tmp/dest")
            })
            .unwrap();

        assert_eq!(outcome.executed.len(), 1);
        assert_eq!(h.fs.read_string("/tmp/dest/existing.txt").unwrap(), "keep");
        assert_eq!(h.fs.read_string("/tmp/dest/README.md").unwrap(), "Hello dest");
    }

    #[test]
    fn override_suppresses_derivation() {
        let mut accounts = MockAccountLookup::new();
        accounts.expect_github_user().never();
        let variables = VariableSettings {
            namespace: VariableNamespace::default(),
            overrides: VariableOverrides::default()
                .with(Variable::ProjectName, "Custom Name")
                .with(Variable::GithubUser, "someone"),
        };
        let h = harness(&[("/ws/templates/a", A)], template_files(), no_git(), accounts, variables);

        let outcome = h.service.init(request("a", "/tmp/dest")).unwrap();

        assert_eq!(
            h.fs.read_string("/tmp/dest/README.md").unwrap(),
            "Hello Custom Name"
        );
        assert_eq!(outcome.bindings[0].value.as_deref(), Some("Custom Name"));
        assert_eq!(outcome.bindings[1].value.as_deref(), Some("someone"));
    }

    #[test]
    fn unknown_step_fails_before_any_write() {
        let bad = "jumpstart:\n  steps:\n    - unknown: {}\n";
        let h = harness(
            &[("/ws/templates/bad", bad)],
            FakeFilesystem::default(),
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let err = h.service.init(request("bad", "/tmp/dest")).unwrap_err();

        assert!(matches!(
            err,
            JumpstartError::Domain(DomainError::UnknownStepShape { index: 0, .. })
        ));
        assert_eq!(h.fs.file_count(), 0);
        assert!(h.fs.dirs.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_copy_source_fails_before_destination_is_created() {
        let h = harness(
            &[("/ws/templates/a", A)],
            FakeFilesystem::default(),
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let err = h.service.init(request("a", "/tmp/dest")).unwrap_err();

        assert!(matches!(
            err,
            JumpstartError::Application(ApplicationError::FilesystemError { .. })
        ));
        assert!(h.fs.dirs.lock().unwrap().is_empty());
    }

    #[test]
    fn failing_run_step_aborts_remaining_steps() {
        let failing = "jumpstart:\n  steps:\n    - run: [\"false\"]\n    - run: [\"echo never\"]\n";
        let h = harness(
            &[("/ws/templates/f", failing)],
            FakeFilesystem::default(),
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let err = h.service.init(request("f", "/tmp/dest")).unwrap_err();

        match err {
            JumpstartError::Application(ApplicationError::StepExecutionFailure {
                template,
                index,
                stderr,
                ..
            }) => {
                assert_eq!(template, "f");
                assert_eq!(index, 0);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected StepExecutionFailure, got {other:?}"),
        }
        assert_eq!(*h.runner.scripts.lock().unwrap(), vec!["false".to_string()]);
        assert!(h
            .reporter
            .events()
            .iter()
            .any(|e| matches!(e, ScaffoldEvent::StepFailed { .. })));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let h = harness(
            &[("/ws/templates/a", A), ("/ws/templates/b", B)],
            template_files(),
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let outcome = h
            .service
            .init(InitRequest {
                dry_run: true,
                ..request("b", "/tmp/dest")
            })
            .unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.plan.len(), 2);
        assert!(outcome.executed.is_empty());
        assert_eq!(h.fs.file_count(), 1);
        assert!(h.fs.dirs.lock().unwrap().is_empty());
    }

    #[test]
    fn git_failure_is_reported_not_fatal() {
        let mut repo = MockRepositoryInitializer::new();
        repo.expect_init().times(1).returning(|path| {
            Err(ApplicationError::CommandFailed {
                command: format!("git init {}", path.display()),
                status: "exit status: 128".into(),
                stderr: "fatal".into(),
            }
            .into())
        });
        repo.expect_stage_all().never();
        let h = harness(
            &[("/ws/templates/a", A)],
            template_files(),
            repo,
            user(None),
            VariableSettings::default(),
        );

        let outcome = h
            .service
            .init(InitRequest {
                git: true,
                ..request("a", "/tmp/dest")
            })
            .unwrap();

        assert!(matches!(outcome.vcs, VcsStatus::Failed { .. }));
        assert!(h
            .reporter
            .events()
            .iter()
            .any(|e| matches!(e, ScaffoldEvent::VcsInitFailed { .. })));
    }

    #[test]
    fn git_runs_after_substitution() {
        let mut repo = MockRepositoryInitializer::new();
        repo.expect_init().times(1).returning(|_| Ok(()));
        repo.expect_stage_all().times(1).returning(|_| Ok(()));
        let h = harness(
            &[("/ws/templates/a", A)],
            template_files(),
            repo,
            user(None),
            VariableSettings::default(),
        );

        let outcome = h
            .service
            .init(InitRequest {
                git: true,
                ..request("a", "/tmp/dest")
            })
            .unwrap();
        assert_eq!(outcome.vcs, VcsStatus::Initialized);

        let events = h.reporter.events();
        let substituted = events
            .iter()
            .position(|e| matches!(e, ScaffoldEvent::SubstitutionCompleted { .. }))
            .unwrap();
        let initialized = events
            .iter()
            .position(|e| matches!(e, ScaffoldEvent::VcsInitialized { .. }))
            .unwrap();
        assert!(substituted < initialized);
    }

    #[test]
    fn lists_only_template_directories() {
        let fs = FakeFilesystem::default()
            .with_file("/ws/templates/a/jumpstart.yaml", A)
            .with_file("/ws/templates/notes/todo.txt", "x");
        let h = harness(&[("/ws/templates/a", A)], fs, no_git(), user(None), VariableSettings::default());

        let listed = h.service.list_templates().unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "a");
        assert_eq!(listed[0].steps, 1);
        assert_eq!(listed[0].invalid, None);
    }

    #[test]
    fn broken_manifest_is_listed_as_invalid() {
        let bad = "jumpstart:\n  steps:\n    - unknown: {}\n";
        let fs = FakeFilesystem::default()
            .with_file("/ws/templates/a/jumpstart.yaml", A)
            .with_file("/ws/templates/bad/jumpstart.yaml", bad)
            .with_file("/ws/templates/c/jumpstart.yaml", B);
        let h = harness(
            &[("/ws/templates/a", A), ("/ws/templates/bad", bad), ("/ws/templates/c", B)],
            fs,
            no_git(),
            user(None),
            VariableSettings::default(),
        );

        let listed = h.service.list_templates().unwrap();

        let names: Vec<_> = listed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "bad", "c"]);
        assert!(listed[1].invalid.as_deref().is_some_and(|r| r.contains("unknown step")));
        assert_eq!(listed[2].extends, vec!["a"]);
        assert!(h.reporter.events().iter().any(|e| matches!(
            e,
            ScaffoldEvent::TemplateInvalid { path, .. } if path == Path::new("/ws/templates/bad")
        )));
    }
}
