//! Points leaderboard.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based; tied users share a rank and the next rank is skipped.
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    pub points: u64,
    pub current_streak: u32,
}

fn standing(a: &UserProfile, b: &UserProfile) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.streak.current_streak.cmp(&a.streak.current_streak))
}

/// Rank users by points, then current streak; names break display ties.
pub fn rank(profiles: &[UserProfile]) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&UserProfile> = profiles.iter().collect();
    sorted.sort_by(|a, b| {
        standing(a, b)
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(sorted.len());
    for (idx, profile) in sorted.iter().enumerate() {
        let rank = match idx.checked_sub(1).map(|prev| sorted[prev]) {
            Some(prev) if standing(prev, profile) == Ordering::Equal => entries[idx - 1].rank,
            _ => idx as u32 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            user_id: profile.user_id.clone(),
            display_name: profile.display_name.clone(),
            points: profile.points,
            current_streak: profile.streak.current_streak,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str, points: u64, streak: u32) -> UserProfile {
        let mut p = UserProfile::new(id, name).unwrap();
        p.points = points;
        p.streak.current_streak = streak;
        p.streak.longest_streak = streak;
        p
    }

    #[test]
    fn orders_by_points_then_streak() {
        let board = rank(&[
            profile("a", "Ana", 30, 1),
            profile("b", "Ben", 50, 0),
            profile("c", "Cy", 30, 4),
        ]);
        let ids: Vec<_> = board.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn ties_share_rank() {
        let board = rank(&[
            profile("a", "Zed", 20, 2),
            profile("b", "Amy", 20, 2),
            profile("c", "Cat", 10, 0),
        ]);
        assert_eq!(board[0].display_name, "Amy");
        assert_eq!(board[1].display_name, "Zed");
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 1, 3]);
    }

    #[test]
    fn empty_board() {
        assert!(rank(&[]).is_empty());
    }
}
