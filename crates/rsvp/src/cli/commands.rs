//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{Attendance, RsvpSubmission, MIN_GUESTS};

/// Submit command arguments.
///
/// Name and email default to empty so that missing values reach the store's
/// validation and produce the same message the form shows.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Guest's full name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Guest's email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Number of guests, including the submitter (1-10)
    #[arg(short, long, default_value_t = MIN_GUESTS)]
    pub guests: u8,

    /// Whether the party will attend
    #[arg(short, long, value_enum, default_value = "attending")]
    pub attendance: AttendanceArg,

    /// Message to the couple
    #[arg(short, long, default_value = "")]
    pub message: String,
}

impl SubmitCommand {
    /// Build the store submission for these arguments.
    #[must_use]
    pub fn to_submission(&self) -> RsvpSubmission {
        RsvpSubmission::new(self.name.clone(), self.email.clone(), self.attendance.into())
            .with_guests(self.guests)
            .with_message(self.message.clone())
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Attendance argument for submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttendanceArg {
    /// Yes, we'll be there
    Attending,
    /// Sorry, we can't make it
    NotAttending,
}

impl From<AttendanceArg> for Attendance {
    fn from(arg: AttendanceArg) -> Self {
        match arg {
            AttendanceArg::Attending => Self::Attending,
            AttendanceArg::NotAttending => Self::NotAttending,
        }
    }
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One block of text per response
    Plain,
    /// Aligned table
    #[default]
    Table,
    /// JSON array
    Json,
}
