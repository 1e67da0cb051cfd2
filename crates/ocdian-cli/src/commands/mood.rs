use clap::Subcommand;
use ocdian_core::{Trigger, TRIGGERS};

use super::open_journal;

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record a mood check-in
    Add {
        /// Mood from 1 (very low) to 5 (very good)
        value: u8,
        /// Trigger name (repeatable), see `ocdian triggers`
        #[arg(long = "trigger", short)]
        triggers: Vec<String>,
        /// Free-text notes
        #[arg(long, short, default_value = "")]
        note: String,
    },
    /// List the mood history in recorded order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the whole mood history
    Clear,
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = open_journal()?;

    match action {
        MoodAction::Add {
            value,
            triggers,
            note,
        } => {
            let triggers = triggers
                .iter()
                .map(|name| {
                    Trigger::find(name)
                        .map(|t| t.name)
                        .ok_or_else(|| format!("unknown trigger: {name}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let id = journal.record_mood(value, triggers, &note)?;
            println!("Mood recorded: {id}");
        }
        MoodAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(journal.moods())?);
            } else if journal.moods().is_empty() {
                println!("No mood history.");
            } else {
                for sample in journal.moods() {
                    let triggers: Vec<&str> = sample.triggers.iter().map(String::as_str).collect();
                    println!(
                        "{}  {} {:<9} [{}] {}",
                        sample.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                        sample.mood_value.emoji(),
                        sample.mood_value.label(),
                        triggers.join(", "),
                        sample.notes
                    );
                }
            }
        }
        MoodAction::Clear => {
            journal.clear_mood_history();
            println!("Mood history cleared");
        }
    }
    Ok(())
}

pub fn list_triggers(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&TRIGGERS)?);
    } else {
        for trigger in &TRIGGERS {
            println!("{}", trigger.name);
        }
    }
    Ok(())
}
