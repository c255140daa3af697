use clap::Subcommand;

use super::App;

#[derive(Subcommand)]
pub enum UserAction {
    /// Register the acting user (no-op if already registered)
    Register {
        /// Display name shown on the leaderboard
        display_name: String,
    },
}

pub fn run(app: &App, action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Register { display_name } => {
            let ctx = app.session()?;
            let profile = app.service.register_user(&ctx, &display_name)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}
