//! Command-line interface for rsvp.
//!
//! This module provides the CLI structure for the `rsvp` binary, which
//! stands in for the invitation site's form and admin view.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AttendanceArg, ConfigCommand, ListCommand, OutputFormat, SubmitCommand, SummaryCommand,
};

use crate::logging::Verbosity;

/// rsvp - Collect and review guest responses
///
/// Records RSVPs for the wedding in an append-only CSV file and lets the
/// hosts review them.
#[derive(Debug, Parser)]
#[command(name = "rsvp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the RSVP file if it does not exist
    Init,

    /// Record a guest response
    Submit(SubmitCommand),

    /// List all responses, newest first
    List(ListCommand),

    /// Show a headcount summary
    Summary(SummaryCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "rsvp");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["rsvp", "init"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["rsvp", "-v", "init"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["rsvp", "-vv", "init"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["rsvp", "-q", "init"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_init() {
        assert!(matches!(parse(&["rsvp", "init"]).command, Command::Init));
    }

    #[test]
    fn test_parse_submit_full() {
        let cli = parse(&[
            "rsvp",
            "submit",
            "--name",
            "Asha Rao",
            "--email",
            "asha@example.com",
            "--guests",
            "2",
            "--attendance",
            "attending",
            "--message",
            "Can't wait!",
        ]);

        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit command");
        };
        assert_eq!(cmd.name, "Asha Rao");
        assert_eq!(cmd.email, "asha@example.com");
        assert_eq!(cmd.guests, 2);
        assert_eq!(cmd.attendance, AttendanceArg::Attending);
        assert_eq!(cmd.message, "Can't wait!");
    }

    #[test]
    fn test_parse_submit_defaults() {
        let Command::Submit(cmd) = parse(&["rsvp", "submit", "-n", "Ben"]).command else {
            panic!("expected submit command");
        };
        assert_eq!(cmd.email, "");
        assert_eq!(cmd.guests, 1);
        assert_eq!(cmd.attendance, AttendanceArg::Attending);
        assert_eq!(cmd.message, "");
    }

    #[test]
    fn test_parse_submit_not_attending() {
        let Command::Submit(cmd) =
            parse(&["rsvp", "submit", "-n", "Ben", "-e", "b@x.com", "-a", "not-attending"])
                .command
        else {
            panic!("expected submit command");
        };
        assert_eq!(cmd.attendance, AttendanceArg::NotAttending);
    }

    #[test]
    fn test_parse_list_format() {
        let Command::List(cmd) = parse(&["rsvp", "list", "--format", "json"]).command else {
            panic!("expected list command");
        };
        assert_eq!(cmd.format, OutputFormat::Json);

        let Command::List(cmd) = parse(&["rsvp", "list"]).command else {
            panic!("expected list command");
        };
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_summary_json() {
        let Command::Summary(cmd) = parse(&["rsvp", "summary", "--json"]).command else {
            panic!("expected summary command");
        };
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["rsvp", "config", "validate", "--file", "/tmp/rsvp.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["rsvp", "-c", "/custom/config.toml", "list"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_rejects_unknown_attendance() {
        let result = Cli::try_parse_from(["rsvp", "submit", "-a", "maybe"]);
        assert!(result.is_err());
    }
}
