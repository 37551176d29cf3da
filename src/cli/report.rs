//! Class report for the `print` command

use anyhow::Result;

use super::output::Output;
use super::table_file::TableFile;
use crate::domain::{GRADE_MAX, GRADE_MIN};

const SEPARATOR_WIDTH: usize = 16;

/// Prints every ticket grouped by class, then per-class totals
pub fn print(file: &TableFile, output: &Output) -> Result<bool> {
    let table = file.table();
    let classes = table.class_report()?;

    if output.is_json() {
        let items: Vec<_> = classes
            .iter()
            .map(|class| {
                serde_json::json!({
                    "class": class.label(),
                    "count": class.tickets.len(),
                    "tickets": class
                        .tickets
                        .iter()
                        .map(|(name, id)| serde_json::json!({ "ticket_id": id.to_string(), "name": name }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        output.data(&serde_json::json!({
            "name": table.name(),
            "total": table.entry_count(),
            "classes": items,
        }));
        return Ok(false);
    }

    for class in &classes {
        println!("Class {} ({} tickets):", class.label(), class.tickets.len());
        for (name, id) in &class.tickets {
            println!("    {}: {}", id, name);
        }
        output.blank();
    }

    println!("Total tickets count: {}", table.entry_count());
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for grade in GRADE_MIN..=GRADE_MAX {
        for class in classes.iter().filter(|class| class.grade == grade) {
            let padding = if grade < 10 { " " } else { "" };
            println!("{}:{} {}", class.label(), padding, class.tickets.len());
        }
        if grade != GRADE_MAX {
            println!("{}", "-".repeat(SEPARATOR_WIDTH));
        }
    }

    Ok(false)
}
