//! Storage layer for rsvp.
//!
//! This module provides the append-only, file-backed RSVP store. Records are
//! kept in a CSV file in submission order; listings are sorted newest first
//! at read time.

pub mod lock;
pub mod schema;

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{RsvpRecord, RsvpSubmission};

use lock::LockedFile;
use schema::{StoredRow, COLUMNS};

/// Append-only store for guest responses.
///
/// Provides persistent storage backed by a single CSV file with support for:
/// - Idempotent creation of the file with its header row
/// - Validated, lock-guarded appends of new responses
/// - Listing all responses, newest first
///
/// Records are never updated or deleted.
#[derive(Debug, Clone)]
pub struct RsvpStore {
    /// Path to the CSV file.
    path: PathBuf,
    /// Whether to `fsync` file data after each write.
    sync_writes: bool,
}

impl RsvpStore {
    /// Create a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
        }
    }

    /// Create a store from the storage section of `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage_path()).with_sync_writes(config.storage.sync_writes)
    }

    /// Set whether writes are synced to disk before returning.
    #[must_use]
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Get the path to the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the storage file with its header row if it does not exist yet.
    ///
    /// Safe to call on every startup: a file that already has its header is
    /// only read, never opened for writing, so a read-only store still
    /// initializes. A file holding nothing but blank lines gets the header.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file or its directory cannot be created
    /// or written.
    pub fn ensure_initialized(&self) -> Result<()> {
        match self.current_header()? {
            HeaderState::Missing => {}
            HeaderState::Valid => {
                debug!("RSVP storage already initialized at {}", self.path.display());
                return Ok(());
            }
            HeaderState::Mismatched(found) => {
                warn!(
                    found = %found,
                    "RSVP storage at {} has an unexpected header",
                    self.path.display()
                );
                return Ok(());
            }
        }

        let locked = self.lock_for_append()?;

        // Another process may have written the header since the check above.
        if self.locked_header(locked.file())? != HeaderState::Missing {
            return Ok(());
        }

        let len = self.file_len(locked.file())?;
        let mut bytes = self.line_break_before_append(locked.file(), len)?;
        bytes.extend(self.encode(None)?);
        self.append(locked.file(), len, &bytes)?;
        info!("Initialized RSVP storage at {}", self.path.display());
        Ok(())
    }

    /// Validate and persist a guest response.
    ///
    /// The record is stamped with the current UTC time and appended as one
    /// row. Either the whole row is written or the file is left as it was.
    /// Validation runs before the file is opened, so an invalid submission
    /// never touches storage.
    ///
    /// Returns the record exactly as persisted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a missing name or email or an
    /// out-of-range guest count, or a storage error if the file has an
    /// unexpected header or the row could not be written.
    pub fn submit(&self, submission: RsvpSubmission) -> Result<RsvpRecord> {
        let record = submission.into_record(Utc::now())?;
        let row = StoredRow::from_record(&record);

        let locked = self.lock_for_append()?;
        let len = self.file_len(locked.file())?;

        let mut bytes = self.line_break_before_append(locked.file(), len)?;
        match self.locked_header(locked.file())? {
            HeaderState::Missing => bytes.extend(self.encode(Some(&row))?),
            HeaderState::Valid => bytes.extend(self.encode_row(&row)?),
            HeaderState::Mismatched(found) => return Err(self.header_mismatch(&found)),
        }

        self.append(locked.file(), len, &bytes)?;
        info!(
            guests = record.guest_count,
            attendance = %record.attendance,
            "Recorded RSVP at {}",
            row.timestamp
        );
        Ok(record)
    }

    /// List every persisted response, most recent first.
    ///
    /// Responses with the same timestamp are listed in reverse file order.
    /// A missing or empty file yields an empty list. Storage is not modified.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read or does not match
    /// the expected layout.
    pub fn list(&self) -> Result<Vec<RsvpRecord>> {
        let mut records = self.read_all()?;
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Count persisted responses.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Summarise persisted responses for the hosts.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read.
    pub fn summary(&self) -> Result<RsvpSummary> {
        Ok(RsvpSummary::from_records(&self.read_all()?))
    }

    /// Read all records in file order under a shared lock.
    fn read_all(&self) -> Result<Vec<RsvpRecord>> {
        let Some(locked) = self.open_shared()? else {
            debug!("No RSVP storage at {}", self.path.display());
            return Ok(Vec::new());
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(locked.file());

        match self.header_state(&mut reader)? {
            HeaderState::Missing => return Ok(Vec::new()),
            HeaderState::Valid => {}
            HeaderState::Mismatched(found) => return Err(self.header_mismatch(&found)),
        }

        let mut records = Vec::new();
        for result in reader.deserialize::<StoredRow>() {
            let row = result.map_err(|e| self.csv_error(e))?;
            let record = row.into_record().map_err(|message| {
                Error::storage_format(
                    &self.path,
                    format!("record {}: {message}", records.len() + 1),
                )
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Open the storage file read-only under a shared lock.
    ///
    /// Returns `None` if the file does not exist.
    fn open_shared(&self) -> Result<Option<LockedFile>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::StorageRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        LockedFile::shared(file)
            .map(Some)
            .map_err(|source| Error::StorageLock {
                path: self.path.clone(),
                source,
            })
    }

    /// Header state of the file as it is now, read without write access.
    fn current_header(&self) -> Result<HeaderState> {
        match self.open_shared()? {
            Some(locked) => self.locked_header(locked.file()),
            None => Ok(HeaderState::Missing),
        }
    }

    /// Header state of an already locked file, read from its start.
    fn locked_header(&self, mut file: &File) -> Result<HeaderState> {
        file.seek(SeekFrom::Start(0))
            .map_err(|source| Error::StorageRead {
                path: self.path.clone(),
                source,
            })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        self.header_state(&mut reader)
    }

    /// Classify the first record of `reader`.
    ///
    /// Blank lines are skipped by the CSV reader, so a file holding only line
    /// breaks has no header at all.
    fn header_state<R: Read>(&self, reader: &mut csv::Reader<R>) -> Result<HeaderState> {
        let headers = reader.headers().map_err(|e| self.csv_error(e))?;
        Ok(if headers.is_empty() {
            HeaderState::Missing
        } else if headers.iter().eq(COLUMNS.iter().copied()) {
            HeaderState::Valid
        } else {
            HeaderState::Mismatched(headers.iter().collect::<Vec<_>>().join(","))
        })
    }

    fn header_mismatch(&self, found: &str) -> Error {
        Error::storage_format(
            &self.path,
            format!("expected header '{}', found '{found}'", COLUMNS.join(",")),
        )
    }

    /// Open the storage file for appending and take the exclusive lock.
    ///
    /// Creates the parent directory and an empty file if needed.
    fn lock_for_append(&self) -> Result<LockedFile> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::StorageWrite {
                path: self.path.clone(),
                source,
            })?;

        LockedFile::exclusive(file).map_err(|source| Error::StorageLock {
            path: self.path.clone(),
            source,
        })
    }

    /// Current length of the locked file.
    fn file_len(&self, file: &File) -> Result<u64> {
        file.metadata()
            .map(|m| m.len())
            .map_err(|source| Error::StorageRead {
                path: self.path.clone(),
                source,
            })
    }

    /// Bytes to write ahead of an append so it starts on a fresh line.
    ///
    /// Files edited by hand may have lost their final newline.
    fn line_break_before_append(&self, mut file: &File, len: u64) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|source| Error::StorageRead {
                path: self.path.clone(),
                source,
            })?;
        Ok(if last[0] == b'\n' { Vec::new() } else { vec![b'\n'] })
    }

    /// Append `bytes` with a single write, truncating back to `original_len`
    /// if the write does not complete.
    fn append(&self, mut file: &File, original_len: u64, bytes: &[u8]) -> Result<()> {
        let result = file
            .write_all(bytes)
            .and_then(|()| file.flush())
            .and_then(|()| {
                if self.sync_writes {
                    file.sync_data()
                } else {
                    Ok(())
                }
            });

        if let Err(source) = result {
            match file.set_len(original_len) {
                Ok(()) => warn!(
                    "Rolled back partial RSVP write at {} to {} bytes",
                    self.path.display(),
                    original_len
                ),
                Err(e) => warn!(
                    error = %e,
                    "Failed to roll back partial RSVP write at {}",
                    self.path.display()
                ),
            }
            return Err(Error::StorageWrite {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    /// Encode the header row, followed by `row` if given.
    fn encode(&self, row: Option<&StoredRow>) -> Result<Vec<u8>> {
        let mut writer = Self::csv_writer();
        writer.write_record(COLUMNS).map_err(|e| self.csv_error(e))?;
        if let Some(row) = row {
            writer.serialize(row).map_err(|e| self.csv_error(e))?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::storage_format(&self.path, e.to_string()))
    }

    /// Encode a single data row.
    fn encode_row(&self, row: &StoredRow) -> Result<Vec<u8>> {
        let mut writer = Self::csv_writer();
        writer.serialize(row).map_err(|e| self.csv_error(e))?;
        writer
            .into_inner()
            .map_err(|e| Error::storage_format(&self.path, e.to_string()))
    }

    fn csv_writer() -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new())
    }

    /// Map a CSV error into the storage taxonomy.
    fn csv_error(&self, err: csv::Error) -> Error {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Error::StorageRead {
                path: self.path.clone(),
                source,
            },
            _ => Error::storage_format(&self.path, message),
        }
    }
}

/// What the first record of the storage file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HeaderState {
    /// Empty file, or only blank lines.
    Missing,
    /// The expected column names.
    Valid,
    /// Some other first record, joined with commas.
    Mismatched(String),
}

/// Headcount summary of the persisted responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpSummary {
    /// Number of responses received.
    pub total_responses: usize,
    /// Responses that accepted.
    pub attending_responses: usize,
    /// Responses that declined.
    pub declined_responses: usize,
    /// Sum of party sizes over accepted responses.
    pub expected_guests: u32,
    /// Time of the earliest response.
    pub first_response: Option<DateTime<Utc>>,
    /// Time of the latest response.
    pub latest_response: Option<DateTime<Utc>>,
}

impl RsvpSummary {
    /// Build a summary from records in any order.
    #[must_use]
    pub fn from_records(records: &[RsvpRecord]) -> Self {
        let attending_responses = records
            .iter()
            .filter(|r| r.attendance.is_attending())
            .count();

        Self {
            total_responses: records.len(),
            attending_responses,
            declined_responses: records.len() - attending_responses,
            expected_guests: records.iter().map(RsvpRecord::expected_guests).sum(),
            first_response: records.iter().map(|r| r.timestamp).min(),
            latest_response: records.iter().map(|r| r.timestamp).max(),
        }
    }
}
