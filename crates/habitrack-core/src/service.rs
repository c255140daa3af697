//! Habit operations against a document store.
//!
//! Every call takes an explicit [`SessionContext`]. Completion writes are
//! surfaced to the caller; the point award and user streak update that
//! follow a full completion are best-effort side effects whose failures are
//! logged and never roll back the completion.

use chrono::NaiveDate;
use serde_json::Value;

use crate::date::date_key;
use crate::error::{CoreError, Result, ValidationError};
use crate::habit::{record_completion, CompletionOutcome, Frequency, Habit};
use crate::leaderboard::{rank, LeaderboardEntry};
use crate::profile::{validate_display_name, NotificationSettings, UserProfile};
use crate::session::SessionContext;
use crate::stats::{calculate_stats, HabitStats};
use crate::store::{get_typed, set_typed, DocumentListing, DocumentStore, HABITS, USERS};
use crate::streak::guard_daily_streak;

/// Default bonus for reaching a habit's daily target.
pub const DEFAULT_COMPLETION_POINTS: u64 = 10;

pub struct HabitService<S> {
    store: S,
    points_per_completion: u64,
}

impl<S: DocumentStore> HabitService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            points_per_completion: DEFAULT_COMPLETION_POINTS,
        }
    }

    pub fn with_points(mut self, points_per_completion: u64) -> Self {
        self.points_per_completion = points_per_completion;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the user's profile, or return the existing one.
    pub fn register_user(&self, ctx: &SessionContext, display_name: &str) -> Result<UserProfile> {
        if let Some(existing) = get_typed::<UserProfile, _>(&self.store, USERS, &ctx.user_id)? {
            tracing::debug!(user = %ctx.user_id, "user already registered");
            return Ok(existing);
        }
        let profile = UserProfile::new(&ctx.user_id, display_name)?;
        set_typed(&self.store, USERS, &ctx.user_id, &profile, false)?;
        tracing::info!(user = %ctx.user_id, "registered user");
        Ok(profile)
    }

    pub fn profile(&self, ctx: &SessionContext) -> Result<UserProfile> {
        get_typed(&self.store, USERS, &ctx.user_id)?.ok_or_else(|| CoreError::NotFound {
            kind: "user",
            id: ctx.user_id.clone(),
        })
    }

    pub fn update_display_name(&self, ctx: &SessionContext, display_name: &str) -> Result<()> {
        let name = validate_display_name(display_name)?;
        self.profile(ctx)?;
        self.store
            .update_field(USERS, &ctx.user_id, "display_name", Value::from(name))?;
        Ok(())
    }

    pub fn update_notifications(
        &self,
        ctx: &SessionContext,
        settings: &NotificationSettings,
    ) -> Result<()> {
        settings.validate()?;
        self.profile(ctx)?;
        self.store.update_field(
            USERS,
            &ctx.user_id,
            "notifications",
            serde_json::to_value(settings)?,
        )?;
        Ok(())
    }

    /// Create a habit owned by the session user.
    pub fn create_habit(
        &self,
        ctx: &SessionContext,
        name: &str,
        frequency: Frequency,
    ) -> Result<Habit> {
        let mut profile = self.profile(ctx)?;
        let habit = Habit::new(&ctx.user_id, name, frequency, ctx.today)?;
        set_typed(&self.store, HABITS, &habit.id, &habit, false)?;

        profile.habit_ids.push(habit.id.clone());
        self.store.update_field(
            USERS,
            &ctx.user_id,
            "habit_ids",
            serde_json::to_value(&profile.habit_ids)?,
        )?;
        tracing::info!(user = %ctx.user_id, habit = %habit.id, "created habit");
        Ok(habit)
    }

    /// Fetch one of the session user's habits.
    pub fn get_habit(&self, ctx: &SessionContext, habit_id: &str) -> Result<Habit> {
        let not_found = || CoreError::NotFound {
            kind: "habit",
            id: habit_id.to_string(),
        };
        let habit: Habit = get_typed(&self.store, HABITS, habit_id)?.ok_or_else(not_found)?;
        if habit.owner_id != ctx.user_id {
            return Err(not_found());
        }
        Ok(habit)
    }

    /// All habits listed on the user's profile. Dangling ids are skipped.
    pub fn list_habits(&self, ctx: &SessionContext) -> Result<Vec<Habit>> {
        let profile = self.profile(ctx)?;
        let mut habits = Vec::with_capacity(profile.habit_ids.len());
        for id in &profile.habit_ids {
            match self.get_habit(ctx, id) {
                Ok(habit) => habits.push(habit),
                Err(CoreError::NotFound { .. }) => {
                    tracing::warn!(user = %ctx.user_id, habit = %id, "profile lists a missing habit");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(habits)
    }

    /// Mark a habit done once for the session's today.
    pub fn complete_habit(&self, ctx: &SessionContext, habit_id: &str) -> Result<CompletionOutcome> {
        self.complete_habit_on(ctx, habit_id, ctx.today)
    }

    /// Mark a habit done once on `date`.
    ///
    /// Past dates back-fill the history; dates after `ctx.today` are rejected.
    pub fn complete_habit_on(
        &self,
        ctx: &SessionContext,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<CompletionOutcome> {
        if date > ctx.today {
            return Err(ValidationError::FutureDate {
                date: date_key(date),
                today: date_key(ctx.today),
            }
            .into());
        }
        let habit = self.get_habit(ctx, habit_id)?;
        let outcome = record_completion(habit, date);
        if !outcome.was_incremented {
            return Ok(outcome);
        }

        set_typed(&self.store, HABITS, habit_id, &outcome.habit, false)?;
        tracing::debug!(
            habit = %habit_id,
            %date,
            count = outcome.habit.count_on(date),
            "recorded completion"
        );

        if outcome.became_fully_completed {
            if let Err(e) = self.award_points(ctx) {
                tracing::warn!(user = %ctx.user_id, habit = %habit_id, "point award failed: {e}");
            }
            if let Err(e) = self.register_qualifying_day(ctx, date) {
                tracing::warn!(user = %ctx.user_id, %date, "streak update failed: {e}");
            }
        }

        Ok(outcome)
    }

    fn award_points(&self, ctx: &SessionContext) -> Result<()> {
        let profile = self.profile(ctx)?;
        let points = profile.points + self.points_per_completion;
        self.store
            .update_field(USERS, &ctx.user_id, "points", Value::from(points))?;
        tracing::info!(user = %ctx.user_id, points, "awarded completion points");
        Ok(())
    }

    fn register_qualifying_day(&self, ctx: &SessionContext, date: NaiveDate) -> Result<()> {
        let mut profile = self.profile(ctx)?;
        if profile.streak.register_qualifying_day(date) {
            self.store.update_field(
                USERS,
                &ctx.user_id,
                "streak",
                serde_json::to_value(&profile.streak)?,
            )?;
        }
        Ok(())
    }

    pub fn stats(&self, ctx: &SessionContext) -> Result<HabitStats> {
        Ok(calculate_stats(&self.list_habits(ctx)?, ctx.today))
    }

    /// Run the daily streak guard for the session user. Never fails.
    pub fn guard(&self, ctx: &SessionContext) {
        guard_daily_streak(&self.store, ctx);
    }
}

impl<S: DocumentListing> HabitService<S> {
    /// Rank every registered user. Undecodable profiles are skipped.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let mut profiles = Vec::new();
        for (id, doc) in self.store.list_documents(USERS)? {
            match serde_json::from_value::<UserProfile>(doc) {
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!(user = %id, "skipping profile: {e}"),
            }
        }
        Ok(rank(&profiles))
    }
}
