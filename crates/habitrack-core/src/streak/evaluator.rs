//! Consecutive-day streak evaluation.
//!
//! All functions here are pure: the same history and "as of" date always
//! give the same summary. There is no grace period; one missing day ends a
//! run.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{parse_date_key, previous_day};
use crate::habit::{Frequency, Habit};

/// Current and longest run for a completion history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive days ending at the "as of" date.
    pub current_streak: u32,
    /// Longest run of consecutive days on or before the "as of" date.
    pub longest_streak: u32,
}

/// Evaluate streaks over a set of qualifying calendar days.
///
/// The current streak walks backward from `as_of` and stops at the first
/// missing day, so a missing `as_of` yields 0. Dates after `as_of` are
/// ignored by both counters, which keeps `longest_streak >= current_streak`.
pub fn evaluate_streak(dates: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> StreakSummary {
    let mut current_streak = 0;
    let mut cursor = as_of;
    while dates.contains(&cursor) {
        current_streak += 1;
        let prev = previous_day(cursor);
        if prev == cursor {
            break;
        }
        cursor = prev;
    }

    let mut longest_streak = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;
    for &date in dates.range(..=as_of) {
        run = match last {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        last = Some(date);
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}

/// Evaluate streaks from a per-day boolean map keyed by ISO date.
///
/// Days mapped to `false` count as missing. Malformed keys are skipped.
pub fn evaluate_from_day_map(days: &BTreeMap<String, bool>, as_of: NaiveDate) -> StreakSummary {
    let dates: BTreeSet<NaiveDate> = days
        .iter()
        .filter(|(_, done)| **done)
        .filter_map(|(key, _)| match parse_date_key(key) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("skipping day entry: {e}");
                None
            }
        })
        .collect();
    evaluate_streak(&dates, as_of)
}

/// Evaluate a habit's own streak.
///
/// Daily habits count consecutive calendar days. Weekly habits count
/// consecutive *scheduled* days: unscheduled weekdays neither extend nor
/// break a run.
pub fn evaluate_habit_streak(habit: &Habit, as_of: NaiveDate) -> StreakSummary {
    let dates = habit.qualifying_dates();
    match &habit.frequency {
        Frequency::Daily { .. } => evaluate_streak(&dates, as_of),
        Frequency::Weekly { .. } => evaluate_scheduled_streak(&habit.frequency, &dates, as_of),
    }
}

fn evaluate_scheduled_streak(
    frequency: &Frequency,
    dates: &BTreeSet<NaiveDate>,
    as_of: NaiveDate,
) -> StreakSummary {
    let mut current_streak = 0;
    let mut cursor = last_scheduled_on_or_before(frequency, as_of);
    while let Some(day) = cursor {
        if !dates.contains(&day) {
            break;
        }
        current_streak += 1;
        cursor = last_scheduled_on_or_before(frequency, previous_day(day)).filter(|d| *d < day);
    }

    let mut longest_streak = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;
    for &date in dates.range(..=as_of) {
        if !frequency.is_scheduled_on(date) {
            continue;
        }
        run = match last {
            Some(prev) if next_scheduled_after(frequency, prev) == Some(date) => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        last = Some(date);
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}

/// Scan at most a week, which covers any non-empty weekday set.
fn last_scheduled_on_or_before(frequency: &Frequency, date: NaiveDate) -> Option<NaiveDate> {
    let mut day = date;
    for _ in 0..7 {
        if frequency.is_scheduled_on(day) {
            return Some(day);
        }
        day = day.pred_opt()?;
    }
    None
}

fn next_scheduled_after(frequency: &Frequency, date: NaiveDate) -> Option<NaiveDate> {
    let mut day = date;
    for _ in 0..7 {
        day = day.succ_opt()?;
        if frequency.is_scheduled_on(day) {
            return Some(day);
        }
    }
    None
}
