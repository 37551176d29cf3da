//! Error taxonomy for the ticket table
//!
//! Every fallible table operation returns [`TableError`]. The library never
//! prints or logs; turning an error into a message is the caller's job.

use std::path::PathBuf;

use thiserror::Error;

use super::id::TicketId;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Invalid ticket ID")]
    IdInvalid,

    #[error("Failed to generate an unused ticket ID")]
    IdGenerationFailed,

    #[error("Ticket ID already exists: {0}")]
    IdAlreadyExists(TicketId),

    #[error("Ticket ID not found: {0}")]
    IdNotFound(TicketId),

    #[error("Generated ticket ID has expired: the table changed since it was generated")]
    IdExpired,

    #[error("Ticket ID is not scannable: {0}")]
    IdNotScannable(TicketId),

    #[error("An entry with the same name, grade and grade ID already exists")]
    EntryAlreadyExists,

    #[error("Invalid entry field: {0}")]
    InvalidEntryField(&'static str),

    #[error("Invalid string: '{0}' may only contain letters, spaces and hyphens")]
    InvalidString(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Integer overflow")]
    IntegerOverflow,

    #[error("Corrupted table entry")]
    CorruptedTableEntry,

    #[error("Corrupted table")]
    CorruptedTable,

    #[error("Invalid YAML document: {0}")]
    InvalidYaml(String),

    #[error("Invalid file path: {}", path.display())]
    InvalidFilepath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File I/O failed: {}", path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shorthand for results produced by the table
pub type TableResult<T> = Result<T, TableError>;
