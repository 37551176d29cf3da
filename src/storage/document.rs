//! YAML persistence for ticket tables
//!
//! A table is stored as a single human-editable YAML document:
//!
//! ```yaml
//! info:
//!   name: Octopus
//!   tickets: 1
//! entries:
//! - ticket_id: 3F2K
//!   first_name: John
//!   last_name: Doe
//!   grade: 9
//!   grade_id: A
//!   metadata:
//!     flags: 0
//!     scan_count: 0
//!     last_scan_date: N/A
//! ```
//!
//! Loading replays every entry through the normal insertion path, so a
//! hand-edited document is validated exactly like live input.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryFlags, EntryMetadata, Table, TableError, TableResult, TicketId};

/// Written in place of an empty `last_scan_date`
pub const NEVER_SCANNED: &str = "N/A";

#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    info: DocumentInfo,
    entries: Vec<DocumentEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentInfo {
    name: String,
    tickets: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentEntry {
    ticket_id: String,
    first_name: String,
    last_name: String,
    grade: u32,
    grade_id: char,
    metadata: DocumentMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentMetadata {
    flags: u32,
    scan_count: u32,
    last_scan_date: String,
}

impl DocumentEntry {
    fn from_entry(id: TicketId, entry: &Entry) -> Self {
        let last_scan_date = if entry.metadata.was_scanned() {
            entry.metadata.last_scan_date.clone()
        } else {
            NEVER_SCANNED.to_string()
        };

        Self {
            ticket_id: id.to_string(),
            first_name: entry.first_name.clone(),
            last_name: entry.last_name.clone(),
            grade: u32::from(entry.grade),
            grade_id: entry.grade_id,
            metadata: DocumentMetadata {
                flags: entry.metadata.flags.bits(),
                scan_count: entry.metadata.scan_count,
                last_scan_date,
            },
        }
    }

    fn into_entry(self) -> TableResult<(TicketId, Entry)> {
        let id: TicketId = self.ticket_id.parse()?;
        let grade = u8::try_from(self.grade)
            .map_err(|_| TableError::InvalidEntryField("grade must be between 9 and 12"))?;

        let last_scan_date = if self.metadata.last_scan_date == NEVER_SCANNED {
            String::new()
        } else {
            self.metadata.last_scan_date
        };

        let entry = Entry {
            metadata: EntryMetadata {
                flags: EntryFlags::from_bits(self.metadata.flags),
                scan_count: self.metadata.scan_count,
                last_scan_date,
            },
            ..Entry::new(self.first_name, self.last_name, grade, self.grade_id)
        };

        Ok((id, entry))
    }
}

fn invalid_filepath(path: &Path) -> impl FnOnce(io::Error) -> TableError + '_ {
    move |source| TableError::InvalidFilepath {
        path: path.to_path_buf(),
        source,
    }
}

fn file_error(path: &Path) -> impl FnOnce(io::Error) -> TableError + '_ {
    move |source| TableError::FileError {
        path: path.to_path_buf(),
        source,
    }
}

/// Sibling path the document is written to before being renamed into place
fn temp_path(path: &Path) -> TableResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| TableError::InvalidFilepath {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file"),
    })?;

    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

impl Table {
    /// Loads a table from a YAML document
    ///
    /// Every entry goes through [`Table::insert_entry_with_ticket_id`], and
    /// the declared ticket count must match the number of entries loaded.
    pub fn create_from_file(path: impl AsRef<Path>) -> TableResult<Table> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(invalid_filepath(path))?;
        file.lock_shared().map_err(file_error(path))?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(file_error(path))?;
        // Lock is released when file is dropped
        drop(file);

        let document: TableDocument =
            serde_yaml::from_str(&content).map_err(|e| TableError::InvalidYaml(e.to_string()))?;

        let mut table = Table::with_name(document.info.name);
        for document_entry in document.entries {
            let (id, entry) = document_entry.into_entry()?;
            table.insert_entry_with_ticket_id(id, entry)?;
        }

        let declared = usize::try_from(document.info.tickets).map_err(|_| TableError::CorruptedTable)?;
        if declared != table.entry_count() {
            return Err(TableError::CorruptedTable);
        }

        Ok(table)
    }

    /// Writes the table as a YAML document
    ///
    /// The document is written to a temporary sibling file under an
    /// exclusive lock, then renamed over `path`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> TableResult<()> {
        let path = path.as_ref();

        let mut entries = Vec::with_capacity(self.entry_count());
        self.iterate_over_entries(|id, entry| {
            entries.push(DocumentEntry::from_entry(id, entry));
            Ok(ControlFlow::Continue(()))
        })?;

        let document = TableDocument {
            info: DocumentInfo {
                name: self.name().to_string(),
                tickets: entries.len() as u64,
            },
            entries,
        };
        let yaml = serde_yaml::to_string(&document).map_err(|e| TableError::InvalidYaml(e.to_string()))?;

        let temp_path = temp_path(path)?;
        let written = write_locked(&temp_path, yaml.as_bytes());
        if let Err(error) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(error);
        }

        if let Err(source) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(TableError::FileError {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

fn write_locked(path: &Path, content: &[u8]) -> TableResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(invalid_filepath(path))?;

    file.lock_exclusive().map_err(file_error(path))?;

    let mut writer = BufWriter::new(&file);
    writer.write_all(content).map_err(file_error(path))?;
    writer.flush().map_err(file_error(path))?;
    file.sync_all().map_err(file_error(path))?;

    Ok(())
}
