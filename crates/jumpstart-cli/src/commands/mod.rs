//! Command handlers.
//!
//! Each submodule exposes an `execute` function taking its parsed args and
//! whatever it needs from startup.  Wiring of core services to concrete
//! adapters lives here so every command builds them the same way.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use jumpstart_adapters::{
    FixedWorkspace, GhAccountLookup, GitRepository, GitWorkspaceLocator, LocalFilesystem,
    ShellCommandRunner, YamlManifestLoader,
};
use jumpstart_core::application::{
    ScaffoldPorts, ScaffoldService, TemplateResolver,
    ports::{Reporter, WorkspaceLocator},
};

use crate::{
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
    reporter::ConsoleReporter,
};

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod schema;

/// Build a [`ScaffoldService`] backed by the local machine.
///
/// Override variables are captured from the process environment here, once.
pub fn build_service(config: &AppConfig, output: &OutputManager) -> CliResult<ScaffoldService> {
    let cwd = working_directory()?;
    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(output.clone()));

    let workspace: Arc<dyn WorkspaceLocator> = match config.workspace_root(&cwd) {
        Some(root) => {
            debug!(root = %root.display(), "Using configured workspace root");
            Arc::new(FixedWorkspace::new(root))
        }
        None => Arc::new(GitWorkspaceLocator::new(&cwd)),
    };

    let resolver = TemplateResolver::new(
        Arc::new(YamlManifestLoader),
        workspace,
        reporter.clone(),
        config.resolver_settings(&cwd),
    );
    let ports = ScaffoldPorts {
        filesystem: Arc::new(LocalFilesystem),
        runner: Arc::new(ShellCommandRunner),
        repository: Arc::new(GitRepository),
        accounts: Arc::new(GhAccountLookup),
        reporter,
    };

    Ok(ScaffoldService::new(
        resolver,
        ports,
        config.variable_settings(utf8_vars(std::env::vars_os())),
    ))
}

fn working_directory() -> CliResult<PathBuf> {
    std::env::current_dir().with_cli_context(|| "Failed to read the current directory")
}

/// Environment entries whose key and value are both valid UTF-8.
fn utf8_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
