//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the settings derived
//! from it ([`ResolverSettings`], [`VariableSettings`]).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `JUMPSTART__<SECTION>__<KEY>`
//! 3. Config file: `--config FILE`, or the platform config path
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use jumpstart_core::{
    application::{ResolverSettings, VariableSettings},
    domain::{
        DEFAULT_NAMESPACE, DEFAULT_REPO_PREFIX, DEFAULT_TEMPLATES_DIR, VariableNamespace,
        VariableOverrides,
    },
};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "JUMPSTART";
/// Separator between prefix, section and key in environment variables.
pub const ENV_SEPARATOR: &str = "__";
/// File name used when no platform config directory is available.
pub const LOCAL_CONFIG_FILE: &str = ".jumpstart.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates are found and how descriptors resolve.
    pub templates: TemplateConfig,
    /// Placeholder naming.
    pub variables: VariablesConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Overrides git-based workspace discovery.
    pub workspace_root: Option<PathBuf>,
    /// Directory of named templates, relative to the workspace root.
    pub directory: PathBuf,
    pub repo_prefix: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            directory: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            repo_prefix: DEFAULT_REPO_PREFIX.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    /// Token namespace: `__<NAMESPACE>_<VARIABLE>__`.
    pub namespace: String,
    /// Override variables are read from `<ENV_PREFIX>_<VARIABLE>`.
    pub env_prefix: String,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.into(),
            env_prefix: DEFAULT_NAMESPACE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, every run writes `<directory>/<unix-ts>.log.jsonl`.
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// An explicit `config_file` must exist; the platform default may not.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default()).context("Invalid built-in defaults")?)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Configuration has invalid values")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.templates.repo_prefix.is_empty() {
            bail!("templates.repo_prefix must not be empty");
        }
        if self.variables.namespace.is_empty() {
            bail!("variables.namespace must not be empty");
        }
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.jumpstart.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "jumpstart", "jumpstart")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `load` reads: the explicit one, or the default location.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }

    /// Resolver settings; relative paths resolve against `working_directory`.
    pub fn resolver_settings(&self, working_directory: &Path) -> ResolverSettings {
        ResolverSettings {
            templates_dir: self.templates.directory.clone(),
            repo_prefix: self.templates.repo_prefix.clone(),
            working_directory: working_directory.to_path_buf(),
        }
    }

    /// Configured workspace root, made absolute against `working_directory`.
    pub fn workspace_root(&self, working_directory: &Path) -> Option<PathBuf> {
        self.templates
            .workspace_root
            .as_ref()
            .map(|root| working_directory.join(root))
    }

    /// Variable settings with overrides captured from `vars`.
    pub fn variable_settings<I, K, V>(&self, vars: I) -> VariableSettings
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let namespace =
            VariableNamespace::new(&self.variables.namespace, &self.variables.env_prefix);
        let overrides = VariableOverrides::capture(&namespace, vars);
        VariableSettings {
            namespace,
            overrides,
        }
    }

    /// Value at a dotted key such as `templates.repo_prefix`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut value = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            value = value.get_mut(part)?.take();
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpstart_core::domain::Variable;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_core_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.templates.repo_prefix, "repo:");
        assert_eq!(cfg.templates.directory, PathBuf::from("templates"));
        assert_eq!(cfg.variables.namespace, "JUMPSTART");
        assert!(cfg.templates.workspace_root.is_none());
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jumpstart.toml");
        fs::write(
            &path,
            "[templates]\nrepo_prefix = \"ws:\"\n\n[logging]\ndirectory = \"/var/log/js\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.templates.repo_prefix, "ws:");
        assert_eq!(cfg.logging.directory, Some(PathBuf::from("/var/log/js")));
        // untouched sections keep their defaults
        assert_eq!(cfg.variables, VariablesConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn empty_repo_prefix_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "[templates]\nrepo_prefix = \"\"\n").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("repo_prefix"));
    }

    #[test]
    fn depth_ceiling_is_not_a_config_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "[templates]\nmax_depth = 50\n").unwrap();
        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.get("templates.max_depth"), None);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "[templates\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn dotted_get() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("templates.repo_prefix"), Some(serde_json::json!("repo:")));
        assert_eq!(
            cfg.get("variables.namespace"),
            Some(serde_json::json!("JUMPSTART"))
        );
        assert!(cfg.get("templates").is_some_and(|v| v.is_object()));
        assert_eq!(cfg.get("templates.nope"), None);
    }

    #[test]
    fn relative_workspace_root_resolves_against_cwd() {
        let mut cfg = AppConfig::default();
        assert_eq!(cfg.workspace_root(Path::new("/work")), None);
        cfg.templates.workspace_root = Some(PathBuf::from("mono"));
        assert_eq!(
            cfg.workspace_root(Path::new("/work")),
            Some(PathBuf::from("/work/mono"))
        );
        cfg.templates.workspace_root = Some(PathBuf::from("/abs"));
        assert_eq!(
            cfg.workspace_root(Path::new("/work")),
            Some(PathBuf::from("/abs"))
        );
    }

    #[test]
    fn settings_follow_config() {
        let mut cfg = AppConfig::default();
        cfg.templates.repo_prefix = "ws:".into();
        cfg.variables.env_prefix = "JS".into();

        let resolver = cfg.resolver_settings(Path::new("/cwd"));
        assert_eq!(resolver.repo_prefix, "ws:");
        assert_eq!(resolver.working_directory, PathBuf::from("/cwd"));

        let vars = cfg.variable_settings([("JS_PROJECT_NAME", "acme"), ("JUMPSTART_GITHUB_USER", "x")]);
        assert_eq!(vars.overrides.get(Variable::ProjectName), Some("acme"));
        assert_eq!(vars.overrides.get(Variable::GithubUser), None);
    }
}
