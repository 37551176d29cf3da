//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Table | Create a ticket table | `create tickets.yaml` |
//! | Tickets | Issue and edit tickets | `emit`, `change`, `remove`, `block` |
//! | Door | Check tickets at the event | `scan`, `show`, `find` |
//! | Report | Class listing and copies | `print`, `save backup.yaml` |
//! | Config | User configuration | `config show`, `config init` |
//!
//! Ticket commands read the table from `--db` (or `OCTOPUS_DB`, or the
//! configured `default_database`) and write it back after any change.
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! octopus --verbose --db tickets.yaml scan 3F2K
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod config_cmd;
mod output;
mod report;
mod table_file;
mod ticket;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
