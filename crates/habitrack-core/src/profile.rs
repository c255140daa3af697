//! User profile documents.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::streak::UserStreakState;

/// Reminder preferences. Delivery is the platform's job; only the
/// settings live here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Daily reminder time as `HH:MM` (24h).
    #[serde(default)]
    pub reminder_time: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            reminder_time: None,
        }
    }
}

impl NotificationSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref time) = self.reminder_time {
            NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
                ValidationError::InvalidValue {
                    field: "reminder_time".to_string(),
                    message: format!("'{time}' is not a HH:MM time"),
                }
            })?;
        }
        Ok(())
    }
}

/// The `users/<id>` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub streak: UserStreakState,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub habit_ids: Vec<String>,
}

impl UserProfile {
    /// # Errors
    /// Returns an error for a blank display name.
    pub fn new(user_id: &str, display_name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: user_id.to_string(),
            display_name: validate_display_name(display_name)?,
            points: 0,
            streak: UserStreakState::default(),
            notifications: NotificationSettings::default(),
            habit_ids: Vec::new(),
        })
    }
}

/// Trim a display name, rejecting blank ones.
pub fn validate_display_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}
