//! Habit management commands for CLI.

use chrono::Weekday;
use clap::Subcommand;
use habitrack_core::date::parse_date_key;
use habitrack_core::streak::evaluate_habit_streak;
use habitrack_core::Frequency;

use super::App;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        /// Completions needed per day (daily habits)
        #[arg(long, default_value = "1", conflicts_with = "weekly")]
        times_per_day: u32,
        /// Comma-separated active weekdays, e.g. "mon,wed,fri"
        #[arg(long)]
        weekly: Option<String>,
    },
    /// List habits
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show habit details
    Show {
        /// Habit ID
        id: String,
    },
    /// Mark a habit done once
    Complete {
        /// Habit ID
        id: String,
        /// Day to record (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn parse_weekdays(list: &str) -> Result<Vec<Weekday>, String> {
    let mut days = Vec::new();
    for part in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let day = part
            .parse::<Weekday>()
            .map_err(|_| format!("unknown weekday: {part}"))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

pub fn run(app: &App, action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app.active_session()?;

    match action {
        HabitAction::Create {
            name,
            times_per_day,
            weekly,
        } => {
            let frequency = match weekly {
                Some(list) => Frequency::Weekly {
                    days: parse_weekdays(&list)?,
                },
                None => Frequency::Daily { times_per_day },
            };
            let habit = app.service.create_habit(&ctx, &name, frequency)?;
            eprintln!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { json } => {
            let habits = app.service.list_habits(&ctx)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("No habits yet.");
            } else {
                for habit in habits {
                    let streak = evaluate_habit_streak(&habit, ctx.today);
                    let status = if !habit.is_scheduled_on(ctx.today) {
                        "rest".to_string()
                    } else {
                        format!("{}/{}", habit.count_on(ctx.today), habit.daily_target())
                    };
                    println!(
                        "{}  {:<24} today {:<5} streak {} (best {})",
                        habit.id,
                        habit.name,
                        status,
                        streak.current_streak,
                        habit.longest_streak.max(streak.longest_streak)
                    );
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = app.service.get_habit(&ctx, &id)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Complete { id, date } => {
            let date = match date {
                Some(d) => parse_date_key(&d)?,
                None => ctx.today,
            };
            let outcome = app.service.complete_habit_on(&ctx, &id, date)?;
            if !outcome.was_incremented {
                eprintln!("Nothing to record: target already met or not scheduled on {date}");
            } else if outcome.became_fully_completed {
                eprintln!("Habit completed for {date}!");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekdays_parse_case_insensitive_and_dedupe() {
        assert_eq!(
            parse_weekdays("Mon, wed,mon").unwrap(),
            vec![Weekday::Mon, Weekday::Wed]
        );
        assert!(parse_weekdays("mon,funday").is_err());
        assert!(parse_weekdays("").unwrap().is_empty());
    }
}
