//! 排名规则
//!
//! 经验降序，并列共享名次且后续名次跳过（1, 1, 3）；同分按用户名升序。

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::models::leaderboard::entities::{LeaderboardCandidate, LeaderboardEntry};

pub const DEFAULT_LIMIT: u64 = 20;

pub fn rank_candidates(mut candidates: Vec<LeaderboardCandidate>) -> Vec<LeaderboardEntry> {
    candidates.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.username.cmp(&b.username)));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.xp == candidate.xp => prev.rank,
            _ => index as i64 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            user_id: candidate.user_id,
            username: candidate.username,
            display_name: candidate.display_name,
            level: candidate.level,
            xp: candidate.xp,
        });
    }
    entries
}

/// 本周一 00:00 UTC
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(days_from_monday);
    Utc.from_utc_datetime(&monday.and_time(chrono::NaiveTime::MIN))
}

/// 条数限制在 1..=max
pub fn clamp_limit(limit: Option<u64>, max: u64) -> u64 {
    let max = max.max(1);
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(user_id: i64, username: &str, xp: i64) -> LeaderboardCandidate {
        LeaderboardCandidate {
            user_id,
            username: username.to_string(),
            display_name: None,
            level: 1,
            xp,
        }
    }

    #[test]
    fn test_competition_ranking() {
        let entries = rank_candidates(vec![
            candidate(1, "zoe", 300),
            candidate(2, "amy", 500),
            candidate(3, "ben", 300),
            candidate(4, "cal", 100),
        ]);
        let summary: Vec<(i64, &str)> = entries
            .iter()
            .map(|e| (e.rank, e.username.as_str()))
            .collect();
        assert_eq!(summary, vec![(1, "amy"), (2, "ben"), (2, "zoe"), (4, "cal")]);
    }

    #[test]
    fn test_everyone_tied() {
        let entries = rank_candidates(vec![
            candidate(1, "c", 0),
            candidate(2, "a", 0),
            candidate(3, "b", 0),
        ]);
        assert!(entries.iter().all(|e| e.rank == 1));
        assert_eq!(entries[0].username, "a");
    }

    #[test]
    fn test_week_start_is_monday_midnight() {
        // 2026-03-05 是周四
        let thursday = Utc.with_ymd_and_hms(2026, 3, 5, 15, 30, 0).unwrap();
        assert_eq!(
            week_start(thursday),
            Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
        );
        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(week_start(monday), monday);
        let sunday = Utc.with_ymd_and_hms(2026, 3, 8, 23, 59, 59).unwrap();
        assert_eq!(week_start(sunday), monday);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 100), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0), 100), 1);
        assert_eq!(clamp_limit(Some(500), 100), 100);
        assert_eq!(clamp_limit(Some(50), 100), 50);
    }
}
