//! 小游戏计分
//!
//! | 类型 | 得分 |
//! |------|------|
//! | flashcards | `10·correct + 2·max(streak−1, 0)` |
//! | matching | `15·correct`，全对另加 50 |
//! | timed_challenge | `20·correct + 5·streak + seconds_remaining` |
//!
//! 经验 = 得分 / 10，正确率 100% 另加 10；金币 = 得分 / 50。

use chrono::{DateTime, TimeZone, Utc};

use crate::models::games::entities::{GameKind, GameScore, GameTally};

/// 单局题目数上限
pub const MAX_QUESTIONS: i32 = 500;

pub fn validate_tally(tally: &GameTally, time_limit_secs: i32) -> Result<(), &'static str> {
    if tally.total < 1 {
        return Err("total must be at least 1");
    }
    if tally.total > MAX_QUESTIONS {
        return Err("total is too large");
    }
    if tally.correct < 0 || tally.correct > tally.total {
        return Err("correct must be between 0 and total");
    }
    if tally.best_streak < 0 || tally.best_streak > tally.correct {
        return Err("best_streak must be between 0 and correct");
    }
    match (tally.kind, tally.seconds_remaining) {
        (GameKind::TimedChallenge, Some(secs)) if secs < 0 || secs > time_limit_secs => {
            Err("seconds_remaining exceeds the time limit")
        }
        (GameKind::TimedChallenge, _) => Ok(()),
        (_, Some(_)) => Err("seconds_remaining is only valid for timed_challenge"),
        (_, None) => Ok(()),
    }
}

/// 计算得分与奖励，调用前需通过 [`validate_tally`]
pub fn score_tally(tally: &GameTally) -> GameScore {
    let correct = i64::from(tally.correct);
    let streak = i64::from(tally.best_streak);

    let score = match tally.kind {
        GameKind::Flashcards => 10 * correct + 2 * (streak - 1).max(0),
        GameKind::Matching => {
            let perfect = if tally.correct == tally.total { 50 } else { 0 };
            15 * correct + perfect
        }
        GameKind::TimedChallenge => {
            20 * correct + 5 * streak + i64::from(tally.seconds_remaining.unwrap_or(0))
        }
    };

    let accuracy = accuracy_percent(tally.correct, tally.total);
    let mut xp = score / 10;
    if accuracy == 100 {
        xp += 10;
    }

    GameScore {
        score,
        accuracy,
        xp,
        coins: score / 50,
    }
}

/// round(100·correct/total)
pub fn accuracy_percent(correct: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    (f64::from(correct) * 100.0 / f64::from(total)).round() as i32
}

/// 当天 UTC 零点
pub fn utc_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(kind: GameKind, total: i32, correct: i32, best_streak: i32) -> GameTally {
        GameTally {
            kind,
            total,
            correct,
            best_streak,
            seconds_remaining: None,
        }
    }

    #[test]
    fn test_flashcards_score() {
        // 10*8 + 2*(5-1) = 88
        let score = score_tally(&tally(GameKind::Flashcards, 10, 8, 5));
        assert_eq!(score.score, 88);
        assert_eq!(score.accuracy, 80);
        assert_eq!(score.xp, 8);
        assert_eq!(score.coins, 1);
    }

    #[test]
    fn test_flashcards_zero_streak_has_no_bonus() {
        let score = score_tally(&tally(GameKind::Flashcards, 4, 0, 0));
        assert_eq!(score.score, 0);
        assert_eq!(score.xp, 0);
    }

    #[test]
    fn test_matching_perfect_bonus() {
        // 15*6 + 50 = 140, 正确率 100 另加 10 经验
        let perfect = score_tally(&tally(GameKind::Matching, 6, 6, 6));
        assert_eq!(perfect.score, 140);
        assert_eq!(perfect.accuracy, 100);
        assert_eq!(perfect.xp, 24);
        assert_eq!(perfect.coins, 2);

        let miss = score_tally(&tally(GameKind::Matching, 6, 5, 5));
        assert_eq!(miss.score, 75);
    }

    #[test]
    fn test_timed_challenge_score() {
        let mut t = tally(GameKind::TimedChallenge, 12, 10, 4);
        t.seconds_remaining = Some(7);
        // 20*10 + 5*4 + 7 = 227
        let score = score_tally(&t);
        assert_eq!(score.score, 227);
        assert_eq!(score.accuracy, 83);
        assert_eq!(score.xp, 22);
        assert_eq!(score.coins, 4);
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 8), 13);
    }

    #[test]
    fn test_validate_tally() {
        assert!(validate_tally(&tally(GameKind::Flashcards, 0, 0, 0), 60).is_err());
        assert!(validate_tally(&tally(GameKind::Flashcards, 5, 6, 0), 60).is_err());
        assert!(validate_tally(&tally(GameKind::Flashcards, 5, 3, 4), 60).is_err());
        assert!(validate_tally(&tally(GameKind::Matching, 5, 5, 5), 60).is_ok());

        let mut seconds_on_flashcards = tally(GameKind::Flashcards, 5, 3, 2);
        seconds_on_flashcards.seconds_remaining = Some(10);
        assert!(validate_tally(&seconds_on_flashcards, 60).is_err());

        let mut timed = tally(GameKind::TimedChallenge, 5, 3, 2);
        timed.seconds_remaining = Some(60);
        assert!(validate_tally(&timed, 60).is_ok());
        timed.seconds_remaining = Some(61);
        assert!(validate_tally(&timed, 60).is_err());
        timed.seconds_remaining = None;
        assert!(validate_tally(&timed, 60).is_ok());
    }

    #[test]
    fn test_utc_day_start() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 17, 45, 12).unwrap();
        assert_eq!(
            utc_day_start(now),
            Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap()
        );
    }
}
