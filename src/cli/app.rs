//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{config_cmd, table_file::TableFile, ticket};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "octopus")]
#[command(author, version, about = "Issue, scan and track paper tickets")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Ticket table file
    #[arg(long, global = true, env = "OCTOPUS_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new empty ticket table
    Create {
        /// Where to write the table (defaults to --db)
        path: Option<PathBuf>,

        /// Display name stored in the table header
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    #[command(flatten)]
    Ticket(ticket::TicketCommands),

    /// Manage the user configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("Octopus starting");

    match cli.command {
        Commands::Create { path, name, force } => {
            let path = config.database_path(path.as_deref().or(cli.db.as_deref()))?;
            let name = name.unwrap_or_else(|| config.table_name.clone());
            output.verbose_ctx("create", &format!("Creating table '{}' at: {}", name, path.display()));

            let file = TableFile::create(path, &name, force)?;
            if output.is_json() {
                output.data(&serde_json::json!({
                    "created": true,
                    "path": file.path().display().to_string(),
                    "name": name,
                }));
            } else {
                output.success(&format!("Created empty ticket table '{}' at {}", name, file.path().display()));
            }
        }

        Commands::Config(cmd) => config_cmd::run(cmd, &config, &output)?,

        Commands::Ticket(cmd) => {
            let path = config.database_path(cli.db.as_deref())?;
            output.verbose_ctx("table", &format!("Using table file: {}", path.display()));
            ticket::run(cmd, path, &output)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
