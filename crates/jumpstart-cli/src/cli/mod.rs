//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "jumpstart",
    bin_name = "jumpstart",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Bootstrap projects from composable templates",
    long_about = "jumpstart creates new projects from manifest-driven templates. \
                  Templates live under templates/ in the workspace, can extend \
                  each other, copy files, run commands and fill in \
                  __JUMPSTART_*__ placeholders.",
    after_help = "EXAMPLES:\n\
        \x20 jumpstart init node ./my-app\n\
        \x20 jumpstart init repo:templates/rust ../service --no-git\n\
        \x20 jumpstart init ./local-template ./out --dry-run\n\
        \x20 jumpstart list\n\
        \x20 jumpstart completions bash > /usr/share/bash-completion/completions/jumpstart",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template.
    #[command(
        visible_alias = "i",
        about = "Create a new project from a template",
        after_help = "TEMPLATE is one of:\n\
            \x20 NAME            a directory under <workspace>/templates/\n\
            \x20 repo:PATH       a directory relative to the workspace root\n\
            \x20 ./PATH, /PATH   a directory on disk\n\n\
            EXAMPLES:\n\
            \x20 jumpstart init node ./my-app\n\
            \x20 jumpstart init node ./my-app --force --git false\n\
            \x20 JUMPSTART_PROJECT_NAME=acme jumpstart init node ./out"
    )]
    Init(InitArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List named templates in the workspace",
        after_help = "EXAMPLES:\n\
            \x20 jumpstart list\n\
            \x20 jumpstart list --format json"
    )]
    List(ListArgs),

    /// Print the JSON Schema of the manifest format.
    #[command(
        about = "Print the manifest JSON Schema",
        after_help = "EXAMPLES:\n\
            \x20 jumpstart schema > jumpstart.schema.json"
    )]
    Schema(SchemaArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 jumpstart completions bash > ~/.local/share/bash-completion/completions/jumpstart\n\
            \x20 jumpstart completions zsh  > ~/.zfunc/_jumpstart\n\
            \x20 jumpstart completions fish > ~/.config/fish/completions/jumpstart.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the jumpstart configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 jumpstart config get templates.repo_prefix\n\
            \x20 jumpstart config list\n\
            \x20 jumpstart config init --force"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `jumpstart init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Template descriptor: a name, `repo:<path>`, or a filesystem path.
    #[arg(value_name = "TEMPLATE", help = "Template name, repo:<path> or path")]
    pub template: String,

    /// Directory to create the project in.
    #[arg(value_name = "DESTINATION", help = "Where to create the project")]
    pub destination: PathBuf,

    /// Proceed even if the destination is not empty.
    #[arg(
        short = 'f',
        long = "force",
        help = "Write into a non-empty destination"
    )]
    pub force: bool,

    /// Initialise a git repository in the destination.
    #[arg(
        long = "git",
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = false,
        action = clap::ArgAction::Set,
        help = "Initialise a git repository (default: true)"
    )]
    pub git: bool,

    /// Shorthand for `--git false`.
    #[arg(long = "no-git", help = "Skip git initialisation")]
    pub no_git: bool,

    /// Resolve and plan without touching the destination.
    #[arg(long = "dry-run", help = "Show the plan without executing it")]
    pub dry_run: bool,
}

impl InitArgs {
    /// Whether git initialisation was requested after both flags are applied.
    pub fn wants_git(&self) -> bool {
        self.git && !self.no_git
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `jumpstart list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── schema ────────────────────────────────────────────────────────────────────

/// Arguments for `jumpstart schema`.
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Print the schema on a single line.
    #[arg(long = "compact", help = "Print compact JSON")]
    pub compact: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `jumpstart completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `jumpstart config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.repo_prefix`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_command() {
        let cli = Cli::parse_from(["jumpstart", "init", "node", "./app"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected Init command");
        };
        assert_eq!(args.template, "node");
        assert_eq!(args.destination, PathBuf::from("./app"));
        assert!(!args.force);
        assert!(!args.dry_run);
        assert!(args.wants_git());
    }

    #[test]
    fn git_flag_takes_a_value() {
        let cli = Cli::parse_from(["jumpstart", "init", "node", "out", "--git", "false"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected Init command");
        };
        assert!(!args.wants_git());
    }

    #[test]
    fn bare_git_flag_means_true() {
        let cli = Cli::parse_from(["jumpstart", "init", "node", "out", "--git"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected Init command");
        };
        assert!(args.git);
        assert!(args.wants_git());

        let cli = Cli::parse_from(["jumpstart", "init", "node", "out", "--git", "--dry-run"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected Init command");
        };
        assert!(args.wants_git());
        assert!(args.dry_run);
    }

    #[test]
    fn no_git_wins_over_default() {
        let cli = Cli::parse_from(["jumpstart", "init", "node", "out", "--no-git", "-f"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected Init command");
        };
        assert!(!args.wants_git());
        assert!(args.force);
    }

    #[test]
    fn init_requires_destination() {
        assert!(Cli::try_parse_from(["jumpstart", "init", "node"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "jumpstart",
            "list",
            "-vv",
            "--log-file",
            "/tmp/run.jsonl",
        ]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.log_file, Some(PathBuf::from("/tmp/run.jsonl")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["jumpstart", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_init_accepts_force() {
        let cli = Cli::parse_from(["jumpstart", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Init { force: true })
        ));
    }
}
