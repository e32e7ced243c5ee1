//! Core RSVP types.
//!
//! This module defines the guest response as submitted by the form
//! ([`RsvpSubmission`]) and as persisted by the store ([`RsvpRecord`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Field, Result};

/// Smallest accepted party size.
pub const MIN_GUESTS: u8 = 1;

/// Largest accepted party size.
pub const MAX_GUESTS: u8 = 10;

/// Form label written to storage for guests who are coming.
const ATTENDING_LABEL: &str = "Yes, we'll be there";

/// Form label written to storage for guests who are not coming.
const NOT_ATTENDING_LABEL: &str = "Sorry, we can't make it";

/// Whether a guest will attend the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attendance {
    /// The guest will be there.
    #[default]
    Attending,
    /// The guest has declined.
    NotAttending,
}

impl Attendance {
    /// The label stored in the `attending` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Attending => ATTENDING_LABEL,
            Self::NotAttending => NOT_ATTENDING_LABEL,
        }
    }

    /// Check if this response is an acceptance.
    #[must_use]
    pub fn is_attending(self) -> bool {
        matches!(self, Self::Attending)
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attending => write!(f, "attending"),
            Self::NotAttending => write!(f, "not_attending"),
        }
    }
}

impl FromStr for Attendance {
    type Err = String;

    /// Parses either a stored form label or an enumeration name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == ATTENDING_LABEL {
            return Ok(Self::Attending);
        }
        if trimmed == NOT_ATTENDING_LABEL {
            return Ok(Self::NotAttending);
        }

        match trimmed.to_ascii_lowercase().replace('-', "_").as_str() {
            "attending" | "yes" => Ok(Self::Attending),
            "not_attending" | "no" => Ok(Self::NotAttending),
            _ => Err(format!("unknown attendance value '{trimmed}'")),
        }
    }
}

/// A guest response as entered in the form.
///
/// Submissions carry no timestamp; the store stamps them when they are
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpSubmission {
    /// The guest's full name.
    pub name: String,
    /// The guest's email address.
    pub email: String,
    /// Number of people in the party, including the guest.
    pub guest_count: u8,
    /// Whether the party will attend.
    pub attendance: Attendance,
    /// Optional note to the hosts.
    pub message: String,
}

impl RsvpSubmission {
    /// Create a submission for a single guest with no message.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, attendance: Attendance) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            guest_count: MIN_GUESTS,
            attendance,
            message: String::new(),
        }
    }

    /// Set the party size.
    #[must_use]
    pub fn with_guests(mut self, guest_count: u8) -> Self {
        self.guest_count = guest_count;
        self
    }

    /// Set the message to the hosts.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Check the required fields and the party size.
    ///
    /// Name and email count as missing when they are empty or contain only
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(Field::Name, "name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation(Field::Email, "email is required"));
        }
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&self.guest_count) {
            return Err(Error::validation(
                Field::GuestCount,
                format!(
                    "number of guests must be between {MIN_GUESTS} and {MAX_GUESTS}, got {}",
                    self.guest_count
                ),
            ));
        }
        Ok(())
    }

    /// Validate this submission and turn it into a record stamped at `timestamp`.
    ///
    /// The timestamp is truncated to microseconds, the precision kept on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the submission is invalid.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> Result<RsvpRecord> {
        self.validate()?;
        Ok(RsvpRecord {
            timestamp: timestamp.trunc_subsecs(6),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            guest_count: self.guest_count,
            attendance: self.attendance,
            message: self.message,
        })
    }
}

/// A persisted guest response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    /// When the store accepted the response.
    pub timestamp: DateTime<Utc>,
    /// The guest's full name.
    pub name: String,
    /// The guest's email address.
    pub email: String,
    /// Number of people in the party, including the guest.
    #[serde(rename = "guests")]
    pub guest_count: u8,
    /// Whether the party will attend.
    #[serde(rename = "attending")]
    pub attendance: Attendance,
    /// Note to the hosts, possibly empty.
    pub message: String,
}

impl RsvpRecord {
    /// Number of seats this response accounts for.
    #[must_use]
    pub fn expected_guests(&self) -> u32 {
        if self.attendance.is_attending() {
            u32::from(self.guest_count)
        } else {
            0
        }
    }
}
