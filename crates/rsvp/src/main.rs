//! `rsvp` - CLI for the RSVP store
//!
//! This binary is the presentation layer in front of the store: `submit`
//! plays the guest form and `list`/`summary` play the hosts' admin view.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use rsvp::cli::render::{render_plain, render_summary, render_table};
use rsvp::cli::{Cli, Command, ConfigCommand, ListCommand, OutputFormat, SubmitCommand};
use rsvp::{init_logging, Config, ErrorKind, Field, RsvpStore};

/// Shown when an RSVP is stored.
const CONFIRMATION: &str = "Thank you, your RSVP has been recorded.";

/// Shown when name or email is missing.
const MISSING_FIELDS: &str = "Please provide your name and email.";

/// Shown when storage fails during a submission.
const TRY_AGAIN: &str = "Sorry, we couldn't record your RSVP. Please try again.";

/// Exit status for input the guest can correct.
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let store = RsvpStore::from_config(&config);

    match cli.command {
        Command::Init => {
            store.ensure_initialized().context("initializing RSVP storage")?;
            println!("RSVP storage ready at {}", store.path().display());
        }
        Command::Submit(cmd) => return Ok(handle_submit(&store, &cmd)),
        Command::List(cmd) => handle_list(&store, &cmd)?,
        Command::Summary(cmd) => {
            store.ensure_initialized().context("initializing RSVP storage")?;
            let summary = store.summary().context("reading RSVPs")?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render_summary(&summary));
            }
        }
        Command::Config(cmd) => return handle_config(&config, cmd),
    }

    Ok(ExitCode::SUCCESS)
}

/// Record a response, reporting the outcome the way the form does.
fn handle_submit(store: &RsvpStore, cmd: &SubmitCommand) -> ExitCode {
    let result = store
        .ensure_initialized()
        .and_then(|()| store.submit(cmd.to_submission()));

    match result {
        Ok(record) => {
            println!("{CONFIRMATION}");
            println!(
                "  {} ({}, {} guest(s))",
                record.name,
                record.attendance.label(),
                record.guest_count
            );
            ExitCode::SUCCESS
        }
        Err(err) if err.kind() == ErrorKind::Validation => {
            match err.field() {
                Some(Field::Name | Field::Email) => eprintln!("{MISSING_FIELDS}"),
                _ => eprintln!("{err}"),
            }
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(err) => {
            error!(path = %store.path().display(), "Failed to record RSVP: {err}");
            eprintln!("{TRY_AGAIN}");
            ExitCode::FAILURE
        }
    }
}

fn handle_list(store: &RsvpStore, cmd: &ListCommand) -> anyhow::Result<()> {
    store.ensure_initialized().context("initializing RSVP storage")?;
    let records = store.list().context("reading RSVPs")?;

    match cmd.format {
        OutputFormat::Plain => print!("{}", render_plain(&records)),
        OutputFormat::Table => print!("{}", render_table(&records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Path:         {}", config.storage_path().display());
                println!("  Sync writes:  {}", config.storage.sync_writes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                eprintln!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}
