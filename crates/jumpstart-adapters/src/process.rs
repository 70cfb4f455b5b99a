//! Child-process adapters: the shell runner plus the helper shared by the
//! git and GitHub adapters.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use jumpstart_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRunner},
    },
    error::JumpstartResult,
};

/// Run `command` to completion, capturing its output.
///
/// A non-zero exit becomes [`ApplicationError::CommandFailed`] carrying the
/// captured stderr; so does a failure to start the process.
pub(crate) fn capture(command: &mut Command, display: &str) -> JumpstartResult<CommandOutput> {
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ApplicationError::CommandFailed {
            command: display.to_string(),
            status: "could not start".into(),
            stderr: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ApplicationError::CommandFailed {
            command: display.to_string(),
            status: output.status.to_string(),
            stderr,
        }
        .into());
    }

    Ok(CommandOutput { stdout, stderr })
}

/// Runs scripts through the platform shell (`sh -c`, or `cmd /C` on Windows).
///
/// Steps run sequentially and without a timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(script: &str) -> Command {
        if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.args(["/C", script]);
            command
        } else {
            let mut command = Command::new("sh");
            command.args(["-c", script]);
            command
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    #[instrument(skip(self), fields(cwd = %working_directory.display()))]
    fn run(&self, script: &str, working_directory: &Path) -> JumpstartResult<CommandOutput> {
        let output = capture(
            Self::command(script).current_dir(working_directory),
            script,
        )?;
        debug!(
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Command finished"
        );
        Ok(output)
    }
}
