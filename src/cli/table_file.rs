//! A ticket table bound to the file it was loaded from

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::Table;

pub struct TableFile {
    path: PathBuf,
    table: Table,
}

impl TableFile {
    /// Loads the table stored at `path`
    pub fn open(path: PathBuf, output: &Output) -> Result<Self> {
        let table = Table::create_from_file(&path)
            .with_context(|| format!("Failed to open ticket table: {}", path.display()))?;

        output.verbose_ctx(
            "table",
            &format!("Loaded '{}' with {} tickets", table.name(), table.entry_count()),
        );

        Ok(Self { path, table })
    }

    /// Writes a new empty table to `path`
    pub fn create(path: PathBuf, name: &str, force: bool) -> Result<Self> {
        if path.exists() && !force {
            anyhow::bail!("Ticket table already exists: {} (use --force to overwrite)", path.display());
        }

        let file = Self {
            path,
            table: Table::with_name(name),
        };
        file.table
            .save_to_file(&file.path)
            .with_context(|| format!("Failed to create ticket table: {}", file.path.display()))?;

        Ok(file)
    }

    /// Writes the table back to the file it came from
    pub fn save(&self, output: &Output) -> Result<()> {
        self.table
            .save_to_file(&self.path)
            .with_context(|| format!("Failed to save ticket table: {}", self.path.display()))?;

        output.verbose_ctx(
            "table",
            &format!("Saved {} tickets to {}", self.table.entry_count(), self.path.display()),
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }
}
