//! Profile and notification settings commands.
//!
//! Reminder delivery is left to the platform; these commands only edit the
//! stored preferences.

use clap::Subcommand;

use super::App;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the acting user's profile
    Show,

    /// Change the display name
    SetName {
        /// New display name
        name: String,
    },

    /// Update notification preferences
    Notifications {
        /// Enable or disable reminders
        #[arg(long)]
        enabled: Option<bool>,
        /// Daily reminder time (HH:MM, 24h)
        #[arg(long, conflicts_with = "clear_reminder")]
        reminder_time: Option<String>,
        /// Remove the daily reminder time
        #[arg(long)]
        clear_reminder: bool,
    },
}

pub fn run(app: &App, action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show => show(app),
        ProfileAction::SetName { name } => set_name(app, &name),
        ProfileAction::Notifications {
            enabled,
            reminder_time,
            clear_reminder,
        } => notifications(app, enabled, reminder_time, clear_reminder),
    }
}

fn show(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app.active_session()?;
    let profile = app.service.profile(&ctx)?;

    let heading = format!("{} ({})", profile.display_name, profile.user_id);
    println!("{heading}");
    println!("{}", "=".repeat(heading.chars().count()));
    println!();
    println!("Points: {}", profile.points);
    println!(
        "Streak: {} (longest {})",
        profile.streak.current_streak, profile.streak.longest_streak
    );
    if let Some(last) = profile.streak.last_completion_date {
        println!("Last qualifying day: {last}");
    }
    println!("Habits: {}", profile.habit_ids.len());
    println!();
    println!("Notifications:");
    println!("  Enabled: {}", profile.notifications.enabled);
    match profile.notifications.reminder_time {
        Some(ref time) => println!("  Reminder: {time}"),
        None => println!("  Reminder: none"),
    }

    Ok(())
}

fn set_name(app: &App, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app.session()?;
    app.service.update_display_name(&ctx, name)?;
    println!("Display name updated.");
    Ok(())
}

fn notifications(
    app: &App,
    enabled: Option<bool>,
    reminder_time: Option<String>,
    clear_reminder: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = app.session()?;
    let mut settings = app.service.profile(&ctx)?.notifications;

    if let Some(enabled) = enabled {
        settings.enabled = enabled;
    }
    if reminder_time.is_some() {
        settings.reminder_time = reminder_time;
    }
    if clear_reminder {
        settings.reminder_time = None;
    }

    app.service.update_notifications(&ctx, &settings)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
