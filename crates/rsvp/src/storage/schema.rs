//! On-disk layout of the RSVP file.
//!
//! The store is a comma-delimited file with a header row and exactly the six
//! columns in [`COLUMNS`]. Timestamps are naive ISO-8601 in UTC with
//! microsecond precision, and attendance is stored as the form label the
//! guest picked.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{Attendance, RsvpRecord, MAX_GUESTS, MIN_GUESTS};

/// Column names, in file order.
pub const COLUMNS: [&str; 6] = ["timestamp", "name", "email", "guests", "attending", "message"];

/// Format used when writing the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One row of the RSVP file, as raw column values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRow {
    /// Submission time.
    pub timestamp: String,
    /// Guest name.
    pub name: String,
    /// Guest email.
    pub email: String,
    /// Party size.
    pub guests: u8,
    /// Attendance label.
    pub attending: String,
    /// Message to the hosts.
    pub message: String,
}

impl StoredRow {
    /// Build the row written for `record`.
    #[must_use]
    pub fn from_record(record: &RsvpRecord) -> Self {
        Self {
            timestamp: format_timestamp(&record.timestamp),
            name: record.name.clone(),
            email: record.email.clone(),
            guests: record.guest_count,
            attending: record.attendance.label().to_string(),
            message: record.message.clone(),
        }
    }

    /// Decode this row into a record.
    ///
    /// Rows that could never have been written by a valid submission (blank
    /// name or email, party size out of range) are rejected.
    ///
    /// # Errors
    ///
    /// Returns a description of the first column that could not be decoded.
    pub fn into_record(self) -> std::result::Result<RsvpRecord, String> {
        let timestamp = parse_timestamp(&self.timestamp)
            .ok_or_else(|| format!("invalid timestamp '{}'", self.timestamp))?;
        if self.name.trim().is_empty() {
            return Err("empty name".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("empty email".to_string());
        }
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&self.guests) {
            return Err(format!(
                "guest count {} outside {MIN_GUESTS}-{MAX_GUESTS}",
                self.guests
            ));
        }
        let attendance: Attendance = self.attending.parse()?;

        Ok(RsvpRecord {
            timestamp,
            name: self.name,
            email: self.email,
            guest_count: self.guests,
            attendance,
            message: self.message,
        })
    }
}

/// Render a timestamp for the `timestamp` column.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `timestamp` column value.
///
/// Accepts RFC 3339 with an explicit offset, or a naive ISO-8601 date-time
/// (with or without fractional seconds) taken to be UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_columns_order() {
        assert_eq!(
            COLUMNS.join(","),
            "timestamp,name,email,guests,attending,message"
        );
    }

    #[test]
    fn test_format_timestamp_matches_stored_form() {
        let ts = Utc.with_ymd_and_hms(2025, 10, 2, 16, 4, 5).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-10-02T16:04:05.000000");
    }

    #[test]
    fn test_parse_naive_with_micros() {
        let ts = parse_timestamp("2025-09-14T08:30:00.123456").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 123_456);
        assert_eq!(format_timestamp(&ts), "2025-09-14T08:30:00.123456");
    }

    #[test]
    fn test_parse_naive_without_fraction() {
        let ts = parse_timestamp("2025-09-14T08:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-09-14T10:30:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_row_round_trip() {
        let record = RsvpRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap(),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            guest_count: 2,
            attendance: Attendance::Attending,
            message: "Can't wait!".to_string(),
        };

        let row = StoredRow::from_record(&record);
        assert_eq!(row.attending, "Yes, we'll be there");
        assert_eq!(row.timestamp, "2025-09-14T08:30:00.000000");
        assert_eq!(row.into_record().unwrap(), record);
    }

    #[test]
    fn test_row_with_bad_attendance() {
        let row = StoredRow {
            timestamp: "2025-09-14T08:30:00".to_string(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            guests: 1,
            attending: "perhaps".to_string(),
            message: String::new(),
        };
        let err = row.into_record().unwrap_err();
        assert!(err.contains("perhaps"));
    }

    #[test]
    fn test_row_breaking_record_rules_is_rejected() {
        let row = StoredRow {
            timestamp: "2025-09-14T08:30:00".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            guests: 2,
            attending: "ATTENDING".to_string(),
            message: String::new(),
        };

        let blank_name = StoredRow {
            name: "  ".to_string(),
            ..row.clone()
        };
        assert_eq!(blank_name.into_record().unwrap_err(), "empty name");

        let blank_email = StoredRow {
            email: String::new(),
            ..row.clone()
        };
        assert_eq!(blank_email.into_record().unwrap_err(), "empty email");

        let no_guests = StoredRow { guests: 0, ..row.clone() };
        assert!(no_guests.into_record().unwrap_err().contains("guest count 0"));

        let too_many = StoredRow { guests: 11, ..row };
        assert!(too_many.into_record().unwrap_err().contains("guest count 11"));
    }
}
