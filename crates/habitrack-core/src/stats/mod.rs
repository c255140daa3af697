//! Habit statistics
//!
//! Summaries over a user's habits for the dashboard: what is due today, what
//! is done, and how consistent the last week has been.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::streak::evaluate_habit_streak;

/// Days covered by the completion rate window, today inclusive.
pub const COMPLETION_WINDOW_DAYS: u64 = 7;

/// Aggregate statistics across a user's habits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    /// Number of habits the user owns
    pub total_habits: u32,
    /// Habits scheduled for today
    pub scheduled_today: u32,
    /// Scheduled habits whose target is met today
    pub completed_today: u32,
    /// Completion marks across all habits and days
    pub total_completions: u64,
    /// Best current streak among the habits, as of today
    pub best_current_streak: u32,
    /// Best longest streak among the habits
    pub best_longest_streak: u32,
    /// Share of scheduled habit-days in the window that met their target (0.0 to 1.0)
    pub completion_rate_7d: f64,
}

/// Calculate statistics for `habits` as of `today`.
pub fn calculate_stats(habits: &[Habit], today: NaiveDate) -> HabitStats {
    let mut stats = HabitStats {
        total_habits: habits.len() as u32,
        ..Default::default()
    };

    let mut scheduled_days = 0u32;
    let mut qualifying_days = 0u32;

    for habit in habits {
        stats.total_completions += habit.total_completions();
        // Stored counters date from the last full completion; a lapsed run
        // must read as zero today.
        let summary = evaluate_habit_streak(habit, today);
        stats.best_current_streak = stats.best_current_streak.max(summary.current_streak);
        stats.best_longest_streak = stats
            .best_longest_streak
            .max(habit.longest_streak.max(summary.longest_streak));

        if habit.is_scheduled_on(today) {
            stats.scheduled_today += 1;
            if habit.is_completed_on(today) {
                stats.completed_today += 1;
            }
        }

        for offset in 0..COMPLETION_WINDOW_DAYS {
            let Some(day) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            // Days before the habit existed are not held against it.
            if day < habit.created_at || !habit.is_scheduled_on(day) {
                continue;
            }
            scheduled_days += 1;
            if habit.is_completed_on(day) {
                qualifying_days += 1;
            }
        }
    }

    if scheduled_days > 0 {
        stats.completion_rate_7d = f64::from(qualifying_days) / f64::from(scheduled_days);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{record_completion, Frequency};
    use chrono::Weekday;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn empty_habits() {
        let stats = calculate_stats(&[], day(7));
        assert_eq!(stats, HabitStats::default());
    }

    #[test]
    fn counts_today_and_window() {
        let mut read = Habit::new("u1", "Read", Frequency::daily(), day(1)).unwrap();
        for d in [5, 6, 7] {
            read = record_completion(read, day(d)).habit;
        }

        let mut water =
            Habit::new("u1", "Water", Frequency::Daily { times_per_day: 2 }, day(6)).unwrap();
        water = record_completion(water, day(7)).habit;

        let stats = calculate_stats(&[read, water], day(7));
        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.scheduled_today, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.best_current_streak, 3);
        assert_eq!(stats.best_longest_streak, 3);
        // read: 7 scheduled days, 3 done; water: 2 scheduled days, 0 done.
        assert!((stats.completion_rate_7d - 3.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn lapsed_habit_has_no_current_streak() {
        let mut read = Habit::new("u1", "Read", Frequency::daily(), day(1)).unwrap();
        for d in [1, 2, 3] {
            read = record_completion(read, day(d)).habit;
        }
        assert_eq!(read.current_streak, 3);

        let stats = calculate_stats(&[read], day(20));
        assert_eq!(stats.best_current_streak, 0);
        assert_eq!(stats.best_longest_streak, 3);
    }

    #[test]
    fn weekly_habit_only_counts_scheduled_days() {
        // 2024-01-07 was a Sunday; window is Jan 1..=7, one Monday.
        let mut gym = Habit::new(
            "u1",
            "Gym",
            Frequency::Weekly { days: vec![Weekday::Mon] },
            day(1),
        )
        .unwrap();
        gym = record_completion(gym, day(1)).habit;

        let stats = calculate_stats(&[gym], day(7));
        assert_eq!(stats.scheduled_today, 0);
        assert!((stats.completion_rate_7d - 1.0).abs() < 1e-9);
    }
}
