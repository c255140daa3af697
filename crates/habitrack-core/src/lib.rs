//! # Habitrack Core Library
//!
//! Business logic for the Habitrack habit tracker. The CLI binary and any
//! other front end are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Habits**: per-day completion history with a daily ceiling
//! - **Streaks**: pure evaluation of consecutive qualifying days, per-user
//!   streak state, and a session-start guard that resets lapsed streaks
//! - **Store**: a three-operation document store abstraction with in-memory
//!   and SQLite backends
//! - **Service**: habit operations over a store, with explicit session
//!   context and best-effort point awards
//!
//! ## Key Components
//!
//! - [`record_completion`]: Completion recorder
//! - [`evaluate_streak`]: Streak evaluator
//! - [`guard_daily_streak`]: Daily streak guard
//! - [`HabitService`]: Store-backed habit operations
//! - [`DocumentStore`]: Trait for document backends

pub mod date;
pub mod error;
pub mod habit;
pub mod leaderboard;
pub mod profile;
pub mod service;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use habit::{record_completion, CompletionOutcome, Frequency, Habit};
pub use leaderboard::LeaderboardEntry;
pub use profile::{NotificationSettings, UserProfile};
pub use service::HabitService;
pub use session::{AuthSession, SessionContext, SessionStream};
pub use stats::{calculate_stats, HabitStats};
pub use storage::{Config, SqliteStore};
pub use store::{DocumentListing, DocumentStore, MemoryStore};
pub use streak::{
    evaluate_streak, guard_daily_streak, GuardDecision, StreakSummary, UserStreakState,
};
