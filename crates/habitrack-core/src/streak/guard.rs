//! Session-start housekeeping for the user streak.
//!
//! The guard zeroes a stored streak whose last qualifying day is older than
//! yesterday. It is advisory: every failure is logged and swallowed so that
//! it never blocks startup, and the next successful run repairs the state.

use chrono::NaiveDate;
use serde_json::Value;

use super::UserStreakState;
use crate::date::previous_day;
use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::session::{SessionContext, SessionStream};
use crate::store::{get_typed, DocumentStore, USERS};

/// Why a streak was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// A positive streak with no recorded completion date.
    MissingLastCompletion,
    /// The last qualifying day is neither today nor yesterday.
    Lapsed { last: NaiveDate },
}

/// Outcome of [`evaluate_guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Keep,
    Reset(ResetReason),
}

/// Decide whether `state` must be reset on `today`.
pub fn evaluate_guard(state: &UserStreakState, today: NaiveDate) -> GuardDecision {
    if state.current_streak == 0 {
        return GuardDecision::Keep;
    }
    match state.last_completion_date {
        None => GuardDecision::Reset(ResetReason::MissingLastCompletion),
        Some(last) if last == today || last == previous_day(today) => GuardDecision::Keep,
        Some(last) => GuardDecision::Reset(ResetReason::Lapsed { last }),
    }
}

/// Run the guard for the session's user. Never fails.
pub fn guard_daily_streak<S: DocumentStore + ?Sized>(store: &S, session: &SessionContext) {
    match try_guard(store, session) {
        Ok(GuardDecision::Keep) => {
            tracing::debug!(user = %session.user_id, "streak guard: streak kept");
        }
        Ok(GuardDecision::Reset(reason)) => {
            tracing::info!(user = %session.user_id, ?reason, "streak guard: streak reset");
        }
        Err(e) => {
            tracing::warn!(user = %session.user_id, "streak guard skipped: {e}");
        }
    }
}

fn try_guard<S: DocumentStore + ?Sized>(
    store: &S,
    session: &SessionContext,
) -> Result<GuardDecision, StoreError> {
    let profile: UserProfile =
        get_typed(store, USERS, &session.user_id)?.ok_or_else(|| StoreError::NotFound {
            collection: USERS.to_string(),
            id: session.user_id.clone(),
        })?;

    let decision = evaluate_guard(&profile.streak, session.today);
    if let GuardDecision::Reset(_) = decision {
        store.update_field(USERS, &session.user_id, "streak.current_streak", Value::from(0))?;
    }
    Ok(decision)
}

/// Run the guard each time a user signs in, until the stream closes.
///
/// For long-lived front ends that hold an [`AuthSession`](crate::session::AuthSession)
/// open. One-shot callers such as the CLI call [`guard_daily_streak`] directly.
pub async fn run_guard_on_sign_in<S, F>(store: &S, mut stream: SessionStream, today: F)
where
    S: DocumentStore + ?Sized,
    F: Fn() -> NaiveDate,
{
    while let Some(user) = stream.next().await {
        if let Some(user_id) = user {
            guard_daily_streak(store, &SessionContext::new(user_id, today()));
        }
    }
}
