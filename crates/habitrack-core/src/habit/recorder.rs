//! Completion recording with a per-day ceiling.

use chrono::NaiveDate;
use serde::Serialize;

use super::Habit;
use crate::date::date_key;
use crate::streak::evaluate_habit_streak;

/// Result of [`record_completion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub habit: Habit,
    /// True exactly when this call moved the day's count up to the target.
    pub became_fully_completed: bool,
    /// False when the day was already at its target (or not scheduled);
    /// the habit is then returned unchanged.
    pub was_incremented: bool,
}

impl CompletionOutcome {
    fn unchanged(habit: Habit) -> Self {
        Self {
            habit,
            became_fully_completed: false,
            was_incremented: false,
        }
    }
}

/// Mark `habit` done once on `date`.
///
/// The day's count goes up by one, capped at the habit's daily target.
/// Hitting the ceiling is not an error: the habit comes back untouched with
/// `was_incremented == false`. After an increment the habit's streak
/// counters are re-derived from its qualifying days.
pub fn record_completion(mut habit: Habit, date: NaiveDate) -> CompletionOutcome {
    if !habit.is_scheduled_on(date) {
        tracing::debug!(habit = %habit.id, %date, "completion ignored: day not scheduled");
        return CompletionOutcome::unchanged(habit);
    }

    let target = habit.daily_target();
    let count = habit.count_on(date);
    if count >= target {
        tracing::debug!(habit = %habit.id, %date, count, "completion ignored: target already met");
        return CompletionOutcome::unchanged(habit);
    }

    let new_count = count + 1;
    habit.completions.insert(date_key(date), new_count);
    let became_fully_completed = new_count == target;

    if became_fully_completed {
        // The run that matters ends at the most recent qualifying day, which
        // may be later than `date` when back-filling.
        let as_of = habit
            .qualifying_dates()
            .last()
            .copied()
            .map_or(date, |last| last.max(date));
        let summary = evaluate_habit_streak(&habit, as_of);
        habit.current_streak = summary.current_streak;
        habit.longest_streak = habit.longest_streak.max(summary.longest_streak);
    }

    CompletionOutcome {
        habit,
        became_fully_completed,
        was_incremented: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Frequency;
    use chrono::Weekday;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn habit(times_per_day: u32) -> Habit {
        Habit::new("u1", "Stretch", Frequency::Daily { times_per_day }, day(1)).unwrap()
    }

    #[test]
    fn increments_below_target() {
        let outcome = record_completion(habit(3), day(2));
        assert!(outcome.was_incremented);
        assert!(!outcome.became_fully_completed);
        assert_eq!(outcome.habit.count_on(day(2)), 1);
        assert_eq!(outcome.habit.current_streak, 0);
    }

    #[test]
    fn fires_full_completion_once() {
        let first = record_completion(habit(2), day(2));
        let second = record_completion(first.habit, day(2));
        assert!(second.was_incremented);
        assert!(second.became_fully_completed);
        assert_eq!(second.habit.count_on(day(2)), 2);

        let third = record_completion(second.habit.clone(), day(2));
        assert!(!third.was_incremented);
        assert!(!third.became_fully_completed);
        assert_eq!(third.habit, second.habit);
    }

    #[test]
    fn updates_streaks_on_full_completion() {
        let mut h = habit(1);
        for d in [1, 2, 3] {
            h = record_completion(h, day(d)).habit;
        }
        assert_eq!(h.current_streak, 3);
        assert_eq!(h.longest_streak, 3);

        h = record_completion(h, day(5)).habit;
        assert_eq!(h.current_streak, 1);
        assert_eq!(h.longest_streak, 3);
    }

    #[test]
    fn backfill_joins_runs() {
        let mut h = habit(1);
        for d in [1, 2, 4] {
            h = record_completion(h, day(d)).habit;
        }
        assert_eq!(h.current_streak, 1);

        h = record_completion(h, day(3)).habit;
        assert_eq!(h.current_streak, 4);
        assert_eq!(h.longest_streak, 4);
    }

    #[test]
    fn unscheduled_weekday_is_a_noop() {
        // 2024-01-02 was a Tuesday.
        let weekly = Habit::new(
            "u1",
            "Gym",
            Frequency::Weekly { days: vec![Weekday::Mon] },
            day(1),
        )
        .unwrap();
        let outcome = record_completion(weekly.clone(), day(2));
        assert!(!outcome.was_incremented);
        assert_eq!(outcome.habit, weekly);

        let outcome = record_completion(weekly, day(1));
        assert!(outcome.was_incremented);
        assert!(outcome.became_fully_completed);
    }
}
