use clap::Subcommand;
use habitrack_core::streak::evaluate_habit_streak;

use super::App;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats across all habits
    Today,
    /// Streak summary for one habit
    Habit {
        /// Habit ID
        id: String,
    },
}

pub fn run(app: &App, action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app.active_session()?;

    match action {
        StatsAction::Today => {
            let stats = app.service.stats(&ctx)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Habit { id } => {
            let habit = app.service.get_habit(&ctx, &id)?;
            let summary = evaluate_habit_streak(&habit, ctx.today);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
