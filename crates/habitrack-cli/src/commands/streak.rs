use clap::Subcommand;
use habitrack_core::streak::{evaluate_guard, GuardDecision};
use serde::Serialize;

use super::App;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show the acting user's streak
    Show,
    /// Run the daily streak guard now
    Guard,
}

#[derive(Serialize)]
struct GuardReport {
    reset: bool,
    reason: Option<String>,
    before: u32,
    after: u32,
}

pub fn run(app: &App, action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StreakAction::Show => {
            let ctx = app.active_session()?;
            let profile = app.service.profile(&ctx)?;
            println!("{}", serde_json::to_string_pretty(&profile.streak)?);
        }
        StreakAction::Guard => {
            let ctx = app.session()?;
            let before = app.service.profile(&ctx)?.streak;
            let decision = evaluate_guard(&before, ctx.today);
            app.service.guard(&ctx);
            let after = app.service.profile(&ctx)?.streak;

            let report = GuardReport {
                reset: matches!(decision, GuardDecision::Reset(_)),
                reason: match decision {
                    GuardDecision::Reset(reason) => Some(format!("{reason:?}")),
                    GuardDecision::Keep => None,
                },
                before: before.current_streak,
                after: after.current_streak,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
