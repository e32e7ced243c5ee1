//! `rsvp` - Guest response store for a wedding invitation site
//!
//! This library provides the append-only RSVP store behind the invitation
//! page's response form, together with the configuration, logging and
//! command-line plumbing used by the `rsvp` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;

pub use config::Config;
pub use error::{Error, ErrorKind, Field, Result};
pub use logging::init_logging;
pub use record::{Attendance, RsvpRecord, RsvpSubmission};
pub use storage::{RsvpStore, RsvpSummary};
