//! Habits and their per-day completion history.

mod recorder;

pub use recorder::{record_completion, CompletionOutcome};

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::{date_key, parse_date_key};
use crate::error::ValidationError;

/// How often a habit is expected to be done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    /// Every day, `times_per_day` completions needed to qualify.
    Daily { times_per_day: u32 },
    /// Once on each of the listed weekdays.
    Weekly { days: Vec<Weekday> },
}

impl Frequency {
    /// A daily habit done once per day.
    pub fn daily() -> Self {
        Frequency::Daily { times_per_day: 1 }
    }

    /// Completions needed on a scheduled day for it to qualify.
    pub fn daily_target(&self) -> u32 {
        match self {
            Frequency::Daily { times_per_day } => *times_per_day,
            Frequency::Weekly { .. } => 1,
        }
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::Daily { .. } => true,
            Frequency::Weekly { days } => days.contains(&date.weekday()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Frequency::Daily { times_per_day } if *times_per_day == 0 => {
                Err(ValidationError::InvalidDailyTarget(*times_per_day))
            }
            Frequency::Weekly { days } if days.is_empty() => {
                Err(ValidationError::NoActiveWeekdays)
            }
            _ => Ok(()),
        }
    }
}

/// A user-defined recurring goal.
///
/// `completions` maps an ISO date key to the number of times the habit was
/// marked done that day. A day's count never exceeds [`Habit::daily_target`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub frequency: Frequency,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub completions: BTreeMap<String, u32>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl Habit {
    /// Create a habit with a fresh id and an empty history.
    ///
    /// # Errors
    /// Returns an error for a blank name or an invalid frequency.
    pub fn new(
        owner_id: &str,
        name: &str,
        frequency: Frequency,
        created_at: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        frequency.validate()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            frequency,
            created_at,
            completions: BTreeMap::new(),
            current_streak: 0,
            longest_streak: 0,
        })
    }

    pub fn daily_target(&self) -> u32 {
        self.frequency.daily_target()
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.frequency.is_scheduled_on(date)
    }

    /// Completions recorded on `date` (0 when there is no entry).
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.completions.get(&date_key(date)).copied().unwrap_or(0)
    }

    /// Whether `date` is a qualifying day for this habit.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.count_on(date) >= self.daily_target()
    }

    /// Dates whose completion count met the target.
    ///
    /// Entries with malformed keys are skipped.
    pub fn qualifying_dates(&self) -> BTreeSet<NaiveDate> {
        let target = self.daily_target();
        self.completions
            .iter()
            .filter(|(_, count)| **count >= target)
            .filter_map(|(key, _)| match parse_date_key(key) {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(habit = %self.id, "skipping completion entry: {e}");
                    None
                }
            })
            .collect()
    }

    /// Total completions across the whole history.
    pub fn total_completions(&self) -> u64 {
        self.completions.values().map(|c| u64::from(*c)).sum()
    }
}
