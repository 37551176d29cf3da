//! Ticket CLI commands
//!
//! Every command loads the table, applies one operation and writes the
//! table back if it changed, so a crash never loses more than the command
//! in flight.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use super::report;
use super::table_file::TableFile;
use crate::domain::{format_name, Entry, TableError, TicketId};

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Emit a new ticket under a freshly generated ID
    ///
    /// Examples:
    ///   octopus emit Doe John 9 A
    ///   octopus emit "van Dyke" "Mary Ann" 12 f
    #[command(visible_alias = "e")]
    Emit {
        last_name: String,
        first_name: String,
        /// Grade, 9 to 12
        grade: u8,
        /// Class letter, A to F
        grade_id: String,
    },

    /// Remove a ticket
    #[command(visible_alias = "rem")]
    Remove {
        /// Ticket ID
        ticket_id: String,
    },

    /// Scan a ticket at the door
    #[command(visible_alias = "s")]
    Scan {
        /// Ticket ID
        ticket_id: String,
    },

    /// Change the holder details of a ticket
    Change {
        /// Ticket ID
        ticket_id: String,
        last_name: String,
        first_name: String,
        grade: u8,
        grade_id: String,
    },

    /// Refuse a ticket at the door
    Block {
        /// Ticket ID
        ticket_id: String,
    },

    /// Accept a previously blocked ticket again
    Unblock {
        /// Ticket ID
        ticket_id: String,
    },

    /// Show ticket details
    Show {
        /// Ticket ID
        ticket_id: String,
    },

    /// Find tickets by holder name
    Find { first_name: String, last_name: String },

    /// Print all tickets grouped by class
    Print,

    /// Save a copy of the table to another file
    Save {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: TicketCommands, path: PathBuf, output: &Output) -> Result<()> {
    let mut file = TableFile::open(path, output)?;

    let modified = match cmd {
        TicketCommands::Emit { last_name, first_name, grade, grade_id } => {
            emit(&mut file, output, &last_name, &first_name, grade, &grade_id)?
        }
        TicketCommands::Remove { ticket_id } => remove(&mut file, output, &ticket_id)?,
        TicketCommands::Scan { ticket_id } => scan(&mut file, output, &ticket_id)?,
        TicketCommands::Change { ticket_id, last_name, first_name, grade, grade_id } => {
            change(&mut file, output, &ticket_id, &last_name, &first_name, grade, &grade_id)?
        }
        TicketCommands::Block { ticket_id } => set_scannable(&mut file, output, &ticket_id, false)?,
        TicketCommands::Unblock { ticket_id } => set_scannable(&mut file, output, &ticket_id, true)?,
        TicketCommands::Show { ticket_id } => show(&file, output, &ticket_id)?,
        TicketCommands::Find { first_name, last_name } => find(&file, output, &first_name, &last_name)?,
        TicketCommands::Print => report::print(&file, output)?,
        TicketCommands::Save { path, force } => save_copy(&file, output, &path, force)?,
    };

    if modified {
        file.save(output)?;
    }

    Ok(())
}

/// Parses a grade letter typed on the command line
fn parse_grade_id(text: &str) -> Result<char> {
    let mut chars = text.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(grade_id), None) => Ok(grade_id),
        _ => Err(TableError::InvalidParameter(format!("grade ID must be a single letter, got '{}'", text)).into()),
    }
}

/// Parses a ticket ID; a well-formed code outside the ID range is unknown
/// rather than an error
fn parse_ticket_id(text: &str) -> Result<Option<TicketId>> {
    match text.parse::<TicketId>() {
        Ok(id) => Ok(Some(id)),
        Err(TableError::IdInvalid) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Invalid ticket ID: '{}'", text)),
    }
}

fn report_unknown(output: &Output, text: &str) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "ticket_id": text,
            "valid": false,
        }));
    } else {
        println!("Ticket ID '{}' is not valid.", text);
    }
}

fn entry_json(id: TicketId, entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "ticket_id": id.to_string(),
        "first_name": entry.first_name,
        "last_name": entry.last_name,
        "grade": entry.grade,
        "grade_id": entry.grade_id.to_string(),
        "scannable": entry.metadata.is_scannable(),
        "scan_count": entry.metadata.scan_count,
        "last_scan_date": entry.metadata.was_scanned().then(|| entry.metadata.last_scan_date.clone()),
    })
}

fn print_holder(output: &Output, entry: &Entry) {
    output.field("First name", &entry.first_name);
    output.field("Last name", &entry.last_name);
    output.field("Grade", &entry.class());
}

fn emit(
    file: &mut TableFile,
    output: &Output,
    last_name: &str,
    first_name: &str,
    grade: u8,
    grade_id: &str,
) -> Result<bool> {
    let entry = Entry::new(first_name, last_name, grade, parse_grade_id(grade_id)?);

    let table = file.table_mut();
    let id = table.insert_entry(entry)?;
    let entry = table.get_entry(id)?;
    output.verbose_ctx("emit", &format!("Inserted {} at generation {}", id, table.generation()));

    if output.is_json() {
        output.data(&entry_json(id, entry));
    } else {
        println!("The following ticket was emitted:");
        output.field("ID", &id.to_string());
        print_holder(output, entry);
    }

    Ok(true)
}

fn remove(file: &mut TableFile, output: &Output, ticket_id: &str) -> Result<bool> {
    let Some(id) = parse_ticket_id(ticket_id)? else {
        report_unknown(output, ticket_id);
        return Ok(false);
    };

    let removed = match file.table_mut().remove_ticket(id) {
        Ok(entry) => entry,
        Err(TableError::IdNotFound(_)) => {
            report_unknown(output, ticket_id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": true,
            "entry": entry_json(id, &removed),
        }));
    } else {
        println!("The following entry was removed:");
        print_holder(output, &removed);
    }

    Ok(true)
}

fn scan(file: &mut TableFile, output: &Output, ticket_id: &str) -> Result<bool> {
    let Some(id) = parse_ticket_id(ticket_id)? else {
        report_unknown(output, ticket_id);
        return Ok(false);
    };

    let previous = match file.table().get_entry(id) {
        Ok(entry) => entry.clone(),
        Err(TableError::IdNotFound(_)) => {
            report_unknown(output, ticket_id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if !output.is_json() {
        if previous.metadata.scan_count == 0 {
            println!("Ticket ID '{}' was never scanned before.", id);
        } else {
            println!("Ticket ID '{}' was scanned {} times.", id, previous.metadata.scan_count);
        }
        output.field("Name", &format!("{} {}", previous.last_name, previous.first_name));
        output.field("Grade", &previous.class());
        if previous.metadata.was_scanned() {
            output.field("Last scan date", &previous.metadata.last_scan_date);
        }
    }

    file.table_mut().increment_ticket_scan_count(id)?;
    output.verbose_ctx("scan", &format!("Recorded scan of {}", id));

    if output.is_json() {
        let entry = file.table().get_entry(id)?;
        output.data(&serde_json::json!({
            "valid": true,
            "previous_scan_count": previous.metadata.scan_count,
            "previous_scan_date": previous.metadata.was_scanned().then(|| previous.metadata.last_scan_date.clone()),
            "entry": entry_json(id, entry),
        }));
    }

    Ok(true)
}

fn change(
    file: &mut TableFile,
    output: &Output,
    ticket_id: &str,
    last_name: &str,
    first_name: &str,
    grade: u8,
    grade_id: &str,
) -> Result<bool> {
    let Some(id) = parse_ticket_id(ticket_id)? else {
        report_unknown(output, ticket_id);
        return Ok(false);
    };

    let replacement = Entry::new(first_name, last_name, grade, parse_grade_id(grade_id)?);
    let previous = match file.table_mut().replace_entry(id, replacement) {
        Ok(previous) => previous,
        Err(TableError::IdNotFound(_)) => {
            report_unknown(output, ticket_id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    let current = file.table().get_entry(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "changed": true,
            "previous": entry_json(id, &previous),
            "entry": entry_json(id, current),
        }));
        return Ok(true);
    }

    let changes = [
        ("First name", previous.first_name.clone(), current.first_name.clone()),
        ("Last name", previous.last_name.clone(), current.last_name.clone()),
        ("Grade", previous.grade.to_string(), current.grade.to_string()),
        ("Grade ID", previous.grade_id.to_string(), current.grade_id.to_string()),
    ];

    let mut any_change = false;
    for (label, before, after) in changes.iter().filter(|(_, before, after)| before != after) {
        println!("{:<12}{} -> {}", format!("{}:", label), before, after);
        any_change = true;
    }
    if !any_change {
        println!("Ticket ID '{}' is unchanged.", id);
    }

    Ok(true)
}

fn set_scannable(file: &mut TableFile, output: &Output, ticket_id: &str, scannable: bool) -> Result<bool> {
    let Some(id) = parse_ticket_id(ticket_id)? else {
        report_unknown(output, ticket_id);
        return Ok(false);
    };

    match file.table_mut().set_ticket_scannable(id, scannable) {
        Ok(()) => {}
        Err(TableError::IdNotFound(_)) => {
            report_unknown(output, ticket_id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "ticket_id": id.to_string(),
            "scannable": scannable,
        }));
    } else if scannable {
        output.success(&format!("Ticket ID '{}' is accepted again.", id));
    } else {
        output.success(&format!("Ticket ID '{}' is now blocked.", id));
    }

    Ok(true)
}

fn show(file: &TableFile, output: &Output, ticket_id: &str) -> Result<bool> {
    let Some(id) = parse_ticket_id(ticket_id)? else {
        report_unknown(output, ticket_id);
        return Ok(false);
    };

    let entry = match file.table().get_entry(id) {
        Ok(entry) => entry,
        Err(TableError::IdNotFound(_)) => {
            report_unknown(output, ticket_id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if output.is_json() {
        output.data(&entry_json(id, entry));
    } else {
        println!("Ticket ID '{}':", id);
        print_holder(output, entry);
        output.field("Scannable", if entry.metadata.is_scannable() { "yes" } else { "no" });
        output.field("Scan count", &entry.metadata.scan_count.to_string());
        if entry.metadata.was_scanned() {
            output.field("Last scan date", &entry.metadata.last_scan_date);
        }
    }

    Ok(false)
}

fn find(file: &TableFile, output: &Output, first_name: &str, last_name: &str) -> Result<bool> {
    // Stored names are canonical, so match against the canonical form
    let first_name = format_name(first_name)?;
    let last_name = format_name(last_name)?;

    let table = file.table();
    let ids = table.find_ticket_id_by_name(&first_name, &last_name)?;
    output.verbose_ctx("find", &format!("{} matches for {} {}", ids.len(), last_name, first_name));

    if output.is_json() {
        let items = ids
            .iter()
            .map(|id| table.get_entry(*id).map(|entry| entry_json(*id, entry)))
            .collect::<Result<Vec<_>, _>>()?;
        output.data(&items);
    } else if ids.is_empty() {
        println!("No tickets for {} {}", last_name, first_name);
    } else {
        println!("{:<8} {:<6} NAME", "ID", "CLASS");
        println!("{}", "-".repeat(40));
        for id in ids {
            let entry = table.get_entry(id)?;
            println!("{:<8} {:<6} {} {}", id, entry.class(), entry.last_name, entry.first_name);
        }
    }

    Ok(false)
}

fn save_copy(file: &TableFile, output: &Output, path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        anyhow::bail!("File already exists: {} (use --force to overwrite)", path.display());
    }

    let table = file.table();
    table
        .save_to_file(path)
        .with_context(|| format!("Failed to save ticket table copy: {}", path.display()))?;
    output.verbose_ctx("save", &format!("Copied {} to {}", file.path().display(), path.display()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "saved": true,
            "path": path.display().to_string(),
            "tickets": table.entry_count(),
        }));
    } else {
        output.success(&format!("Saved {} tickets to {}", table.entry_count(), path.display()));
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_id_must_be_one_character() {
        assert_eq!(parse_grade_id("a").unwrap(), 'a');
        assert_eq!(parse_grade_id(" B ").unwrap(), 'B');
        assert!(parse_grade_id("").is_err());
        assert!(parse_grade_id("AB").is_err());
    }

    #[test]
    fn out_of_range_ticket_id_is_unknown() {
        assert_eq!(parse_ticket_id("0").unwrap(), None);
        assert_eq!(parse_ticket_id("ZZZZZZ").unwrap(), None);
        assert_eq!(parse_ticket_id("a1").unwrap(), Some(TicketId::new(361).unwrap()));
        assert!(parse_ticket_id("A-1").is_err());
    }
}
