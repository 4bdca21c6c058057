use aether_core::{Database, DayStats};
use chrono::Local;
use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's bucket
    Today,
    /// Sunday-to-Saturday totals for the current week
    Week,
    /// The last N days, oldest first (at most ten years)
    Range {
        #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=3660))]
        days: u32,
    },
    /// Delete all statistics
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct Summary {
    days: Vec<DayStats>,
    total_pomodoros: u64,
    total_minutes: u64,
}

impl Summary {
    fn new(days: Vec<DayStats>) -> Self {
        let total_pomodoros = days.iter().map(|d| d.pomodoros).sum();
        let total_minutes = days.iter().map(|d| d.minutes).sum();
        Self {
            days,
            total_pomodoros,
            total_minutes,
        }
    }
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Today => {
            let stats = db.day_stats(today)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week => {
            let summary = Summary::new(db.week(today)?);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Range { days } => {
            let summary = Summary::new(db.range(today, days)?);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete statistics without --yes".into());
            }
            db.reset()?;
            println!("statistics cleared");
        }
    }
    Ok(())
}
