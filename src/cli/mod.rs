//! Command-line argument model and command handlers.

pub mod commands;
pub mod orchestration;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{dispatch, Context};
pub use orchestration::{
    add_changelog_entry, run_bump_workflow, BumpLevel, BumpResult, BumpWorkflowArgs,
    ChangelogResult,
};

#[derive(Debug, Parser)]
#[command(
    name = "chroniq",
    version,
    about = "Track a project's semantic version and changelog"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration profile to use (also scopes `config delete`)"
    )]
    pub profile: Option<String>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the version file and changelog if they are missing
    Init,

    /// Bump the version
    Bump {
        /// patch, minor, major or prerelease (defaults to `default_bump`)
        level: Option<String>,

        #[arg(long, help = "Pre-release label, e.g. beta")]
        pre: Option<String>,

        #[arg(short, long, help = "Changelog message for this version")]
        message: Option<String>,

        #[arg(long, help = "Do not write or prompt for a changelog entry")]
        no_changelog: bool,
    },

    /// Print the current version
    Version,

    /// Show the most recent changelog lines
    Log {
        #[arg(short = 'n', long, default_value_t = 5, help = "Number of lines")]
        lines: usize,
    },

    /// Restore the previous version from backup
    Rollback {
        #[arg(long, help = "Leave the changelog untouched")]
        version_only: bool,

        #[arg(short, long, help = "Skip confirmation prompt")]
        yes: bool,
    },

    /// Delete the version file, its backup and the changelog
    Reset {
        #[arg(short, long, help = "Skip confirmation prompt")]
        yes: bool,
    },

    /// Check the version file, changelog and log directory
    Audit {
        #[arg(long, help = "Also validate changelog heading format")]
        strict: bool,
    },

    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show every resolved key with its origin
    Show,

    /// Show one key (dot-path) with its origin
    Get { key: String },

    /// Set a key (dot-path); the value is coerced to bool or integer when it looks like one
    Set { key: String, value: String },

    /// Delete keys, scoped to `profile.<name>` when --profile is given
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bump_arguments() {
        let args = Args::parse_from(["chroniq", "bump", "prerelease", "--pre", "rc", "-m", "Ship it"]);
        match args.command {
            Commands::Bump {
                level,
                pre,
                message,
                no_changelog,
            } => {
                assert_eq!(level.as_deref(), Some("prerelease"));
                assert_eq!(pre.as_deref(), Some("rc"));
                assert_eq!(message.as_deref(), Some("Ship it"));
                assert!(!no_changelog);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "chroniq", "config", "delete", "silent", "--profile", "ci", "--yes", "-c", "x.toml",
        ]);
        assert_eq!(args.profile.as_deref(), Some("ci"));
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            args.command,
            Commands::Config {
                command: ConfigCommand::Delete { yes: true, .. }
            }
        ));
    }

    #[test]
    fn test_log_lines_default() {
        let args = Args::parse_from(["chroniq", "log"]);
        assert!(matches!(args.command, Commands::Log { lines: 5 }));
    }

    #[test]
    fn test_delete_requires_a_key() {
        assert!(Args::try_parse_from(["chroniq", "config", "delete"]).is_err());
    }
}
