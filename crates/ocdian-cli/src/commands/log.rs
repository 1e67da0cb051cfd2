use std::collections::HashSet;

use clap::Subcommand;
use ocdian_core::coping;
use uuid::Uuid;

use super::open_journal;

#[derive(Subcommand)]
pub enum LogAction {
    /// Record an obsession, optionally with the compulsion it led to
    Add {
        /// The intrusive thought
        obsession: String,
        /// What you did in response
        #[arg(long, short)]
        compulsion: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Attach a compulsion to an existing entry
    Respond {
        /// Entry ID
        id: Uuid,
        /// What you did in response
        compulsion: String,
    },
    /// Delete entries by ID
    Delete {
        /// Entry IDs
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Delete every entry
    Clear,
    /// Coping strategies for an entry or free text
    Suggest {
        /// Entry ID or obsession text
        target: String,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal()?;

    match action {
        LogAction::Add {
            obsession,
            compulsion,
        } => {
            let id = journal.add_entry(&obsession, compulsion.as_deref())?;
            println!("Entry added: {id}");
        }
        LogAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(journal.entries())?);
            } else if journal.entries().is_empty() {
                println!("No entries.");
            } else {
                for entry in journal.entries() {
                    println!("{}  {}", entry.id, entry.obsession);
                    if let Some(compulsion) = &entry.compulsion {
                        println!("    -> {compulsion}");
                    }
                }
            }
        }
        LogAction::Respond { id, compulsion } => {
            if !journal.update_compulsion(id, &compulsion) {
                return Err(format!("no entry {id} (or empty response)").into());
            }
            println!("Entry updated: {id}");
        }
        LogAction::Delete { ids } => {
            let ids: HashSet<Uuid> = ids.into_iter().collect();
            let removed = journal.delete_entries(&ids);
            println!("Deleted {removed} entr{}", if removed == 1 { "y" } else { "ies" });
        }
        LogAction::Clear => {
            journal.clear_entries();
            println!("All entries deleted");
        }
        LogAction::Suggest { target } => {
            let text = match target.parse::<Uuid>() {
                Ok(id) => journal
                    .entry(id)
                    .map(|e| e.obsession.clone())
                    .ok_or_else(|| format!("no entry {id}"))?,
                Err(_) => target,
            };
            for strategy in coping::suggest(&text) {
                println!("- {strategy}");
            }
        }
    }
    Ok(())
}
