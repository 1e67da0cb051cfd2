use chrono::Local;
use clap::Subcommand;
use ocdian_core::stats::{self, DEFAULT_TRIGGER_LIMIT};
use ocdian_core::Insights;

use super::open_journal;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full insights summary as JSON
    Summary,
    /// Consecutive days with a mood check-in
    Streak,
    /// Most frequent triggers
    Triggers {
        /// How many to show
        #[arg(long, default_value_t = DEFAULT_TRIGGER_LIMIT)]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let journal = open_journal()?;
    let moods = journal.moods();
    let today = Local::now().date_naive();

    match action {
        StatsAction::Summary => {
            let insights = Insights::compute(moods, today);
            println!("{}", serde_json::to_string_pretty(&insights)?);
        }
        StatsAction::Streak => {
            println!("{}", stats::current_streak(moods, today));
        }
        StatsAction::Triggers { limit } => match stats::most_common_triggers(moods, limit) {
            Some(names) => {
                for name in names {
                    println!("{name}: {}", stats::trigger_count(moods, &name));
                }
            }
            None => println!("No triggers recorded."),
        },
    }
    Ok(())
}
