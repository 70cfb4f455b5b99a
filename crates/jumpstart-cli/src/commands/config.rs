//! `jumpstart config`: inspect and create the configuration file.

use std::path::PathBuf;

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `config_file` is the `--config` flag, used by `path` and `init`.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    config_file: Option<PathBuf>,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config
                .get(&key)
                .ok_or(CliError::UnknownConfigKey { key })?;
            if output.format() == OutputFormat::Json {
                output.json(&value)?;
            } else {
                output.raw(&scalar(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                output.raw(&to_toml(&config)?)?;
            }
        }

        ConfigCommands::Path => {
            output.raw(&AppConfig::active_path(config_file.as_ref()).display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            let path = AppConfig::active_path(config_file.as_ref());
            if path.exists() && !force {
                output.warning(&format!(
                    "Config already exists at {}  (use --force to overwrite)",
                    path.display(),
                ))?;
                return Ok(());
            }

            let toml = to_toml(&AppConfig::default())?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
            std::fs::write(&path, toml)
                .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Strings print bare, unset values print empty, the rest as JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_print_bare() {
        assert_eq!(scalar(&json!("repo:")), "repo:");
        assert_eq!(scalar(&json!(4)), "4");
        assert_eq!(scalar(&json!(false)), "false");
        assert_eq!(scalar(&Value::Null), "");
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let rendered = to_toml(&AppConfig::default()).unwrap();
        assert!(rendered.contains("[templates]"));
        assert!(rendered.contains("repo_prefix = \"repo:\""));
        // unset options are omitted
        assert!(!rendered.contains("workspace_root"));
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
