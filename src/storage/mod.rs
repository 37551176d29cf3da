//! # Storage Layer
//!
//! Persistence for Octopus in human-editable file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Ticket table | YAML document | any path, passed with `--db` |
//! | Config | TOML | `~/.config/octopus/config.toml` |
//!
//! ## Write Safety
//!
//! - Table reads hold a shared `fs2` lock, writes an exclusive one
//! - Table writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Table::create_from_file`](crate::domain::Table::create_from_file) /
//!   [`Table::save_to_file`](crate::domain::Table::save_to_file) - YAML codec
//! - [`Config`] - User configuration

mod config;
mod document;

pub use config::{Config, ConfigError, OutputFormat};
pub use document::NEVER_SCANNED;
