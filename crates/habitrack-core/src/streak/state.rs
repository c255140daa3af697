//! Per-user streak counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::previous_day;

/// Streak counters stored on the user profile.
///
/// `current_streak` moves only by a reset to zero or by one step per new
/// qualifying day; `longest_streak` never decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStreakState {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_completion_date: Option<NaiveDate>,
}

impl UserStreakState {
    /// Count `day` as a qualifying day.
    ///
    /// Returns whether the counters changed. A day already counted, or one
    /// older than the last counted day, leaves the state alone.
    pub fn register_qualifying_day(&mut self, day: NaiveDate) -> bool {
        match self.last_completion_date {
            Some(last) if last >= day => return false,
            Some(last) if last == previous_day(day) => {
                self.current_streak += 1;
            }
            _ => {
                // Gap or first completion: the old run is over.
                self.current_streak = 1;
            }
        }
        self.last_completion_date = Some(day);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        true
    }

    /// Break the current run. The longest run and last date are kept.
    pub fn reset(&mut self) {
        self.current_streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn consecutive_days_increment() {
        let mut state = UserStreakState::default();
        assert!(state.register_qualifying_day(day(1)));
        assert!(state.register_qualifying_day(day(2)));
        assert!(state.register_qualifying_day(day(3)));
        assert_eq!(state.current_streak, 3);
        assert_eq!(state.longest_streak, 3);
        assert_eq!(state.last_completion_date, Some(day(3)));
    }

    #[test]
    fn same_day_counts_once() {
        let mut state = UserStreakState::default();
        state.register_qualifying_day(day(1));
        assert!(!state.register_qualifying_day(day(1)));
        assert_eq!(state.current_streak, 1);
    }

    #[test]
    fn gap_restarts_at_one() {
        let mut state = UserStreakState::default();
        state.register_qualifying_day(day(1));
        state.register_qualifying_day(day(2));
        state.register_qualifying_day(day(5));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 2);
    }

    #[test]
    fn older_day_is_ignored() {
        let mut state = UserStreakState::default();
        state.register_qualifying_day(day(5));
        assert!(!state.register_qualifying_day(day(3)));
        assert_eq!(state.last_completion_date, Some(day(5)));
    }

    #[test]
    fn reset_keeps_longest() {
        let mut state = UserStreakState::default();
        state.register_qualifying_day(day(1));
        state.register_qualifying_day(day(2));
        state.reset();
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 2);
        assert!(state.register_qualifying_day(day(3)));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 2);
    }
}
