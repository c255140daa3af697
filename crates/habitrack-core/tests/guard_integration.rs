//! Integration tests for the daily streak guard against real stores.

use chrono::{Duration, NaiveDate};
use habitrack_core::store::{get_typed, set_typed, USERS};
use habitrack_core::streak::run_guard_on_sign_in;
use habitrack_core::{
    guard_daily_streak, AuthSession, DocumentStore, MemoryStore, SessionContext, SqliteStore,
    StoreError, UserProfile,
};
use serde_json::Value;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn seed_profile<S: DocumentStore>(store: &S, user: &str, current: u32, last: Option<NaiveDate>) {
    let mut profile = UserProfile::new(user, user).unwrap();
    profile.streak.current_streak = current;
    profile.streak.longest_streak = current.max(7);
    profile.streak.last_completion_date = last;
    set_typed(store, USERS, user, &profile, false).unwrap();
}

fn current_streak<S: DocumentStore>(store: &S, user: &str) -> u32 {
    get_typed::<UserProfile, _>(store, USERS, user)
        .unwrap()
        .unwrap()
        .streak
        .current_streak
}

#[test]
fn lapsed_streak_is_reset_in_sqlite() {
    let store = SqliteStore::open_memory().unwrap();
    seed_profile(&store, "u1", 5, Some(today() - Duration::days(2)));

    guard_daily_streak(&store, &SessionContext::new("u1", today()));

    let profile: UserProfile = get_typed(&store, USERS, "u1").unwrap().unwrap();
    assert_eq!(profile.streak.current_streak, 0);
    assert_eq!(profile.streak.longest_streak, 7);
}

#[test]
fn streak_from_yesterday_survives() {
    let store = SqliteStore::open_memory().unwrap();
    seed_profile(&store, "u1", 3, Some(today() - Duration::days(1)));

    guard_daily_streak(&store, &SessionContext::new("u1", today()));

    assert_eq!(current_streak(&store, "u1"), 3);
}

#[test]
fn inconsistent_state_is_repaired() {
    let store = MemoryStore::new();
    seed_profile(&store, "u1", 4, None);

    guard_daily_streak(&store, &SessionContext::new("u1", today()));

    assert_eq!(current_streak(&store, "u1"), 0);
}

#[test]
fn missing_profile_is_swallowed() {
    let store = MemoryStore::new();
    guard_daily_streak(&store, &SessionContext::new("ghost", today()));
    assert!(store.is_empty());
}

struct BrokenStore;

impl DocumentStore for BrokenStore {
    fn get_document(&self, _: &str, _: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("unreachable".to_string()))
    }

    fn set_document(&self, _: &str, _: &str, _: Value, _: bool) -> Result<(), StoreError> {
        Err(StoreError::Backend("unreachable".to_string()))
    }

    fn update_field(&self, _: &str, _: &str, _: &str, _: Value) -> Result<(), StoreError> {
        Err(StoreError::Backend("unreachable".to_string()))
    }
}

#[test]
fn store_failure_does_not_panic() {
    guard_daily_streak(&BrokenStore, &SessionContext::new("u1", today()));
}

#[tokio::test]
async fn guard_runs_for_each_sign_in() {
    let store = MemoryStore::new();
    seed_profile(&store, "u1", 5, Some(today() - Duration::days(3)));
    seed_profile(&store, "u2", 2, Some(today() - Duration::days(4)));

    let auth = AuthSession::new();
    auth.sign_in("u1");
    let stream = auth.subscribe();

    let driver = async move {
        // Let the guard observe the first user before switching.
        tokio::task::yield_now().await;
        auth.sign_out();
        tokio::task::yield_now().await;
        auth.sign_in("u2");
        tokio::task::yield_now().await;
        drop(auth);
    };

    tokio::join!(run_guard_on_sign_in(&store, stream, today), driver);

    assert_eq!(current_streak(&store, "u1"), 0);
    assert_eq!(current_streak(&store, "u2"), 0);
}
