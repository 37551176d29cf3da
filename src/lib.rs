//! Octopus - issue, scan and track paper tickets for an event
//!
//! Every ticket holder is stored in a [`Table`] under a short, random,
//! base-36 [`TicketId`] that is printed on the physical ticket and typed
//! back in at the door.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Entry, GeneratedTicketId, Table, TableError, TicketId};
