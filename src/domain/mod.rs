//! Domain model for Octopus
//!
//! Contains the ticket table and its rules without any I/O concerns.

pub mod base36;
mod entry;
mod error;
mod id;
mod table;

pub use entry::{
    format_entry, format_name, Entry, EntryFlags, EntryMetadata, ENTRY_TAG, GRADE_ID_MAX, GRADE_ID_MIN,
    GRADE_MAX, GRADE_MIN,
};
pub use error::{TableError, TableResult};
pub use id::{GeneratedTicketId, TicketId, TICKET_ID_MAX, TICKET_ID_MIN};
pub use table::{ClassTickets, Table, DEFAULT_TABLE_NAME, ID_GENERATION_ATTEMPTS, INVALID_GENERATION};
