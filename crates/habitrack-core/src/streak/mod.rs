mod evaluator;
mod guard;
mod state;

pub use evaluator::{evaluate_from_day_map, evaluate_habit_streak, evaluate_streak, StreakSummary};
pub use guard::{
    evaluate_guard, guard_daily_streak, run_guard_on_sign_in, GuardDecision, ResetReason,
};
pub use state::UserStreakState;
