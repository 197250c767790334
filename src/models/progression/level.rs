//! 等级曲线
//!
//! 从 n 级升到 n+1 级需要 `xp_per_level * n` 经验，
//! 因此处于 n 级至少需要 `xp_per_level * n(n-1)/2` 经验。1 级从 0 开始。

use super::entities::LevelProgress;

/// 到达 `level` 所需的累计经验，超出 i64 时取 `i64::MAX`
pub fn xp_for_level(level: i32, xp_per_level: i64) -> i64 {
    let n = i128::from(level.max(1));
    let xp = i128::from(xp_per_level.max(0)) * n * (n - 1) / 2;
    i64::try_from(xp).unwrap_or(i64::MAX)
}

/// 根据累计经验计算等级
///
/// 满足 `n(n-1) <= q`（`q = ⌊2·xp / xp_per_level⌋`）的最大 n，
/// 即 `n = ⌊(1 + isqrt(4q + 1)) / 2⌋`。
pub fn level_for_xp(xp: i64, xp_per_level: i64) -> i32 {
    if xp_per_level <= 0 || xp <= 0 {
        return 1;
    }
    let q = 2 * u128::from(xp.unsigned_abs()) / u128::from(xp_per_level.unsigned_abs());
    let n = (1 + (4 * q + 1).isqrt()) / 2;
    i32::try_from(n).unwrap_or(i32::MAX)
}

pub fn progress_for_xp(xp: i64, xp_per_level: i64) -> LevelProgress {
    let level = level_for_xp(xp, xp_per_level);
    LevelProgress {
        level,
        current_level_xp: xp_for_level(level, xp_per_level),
        next_level_xp: xp_for_level(level + 1, xp_per_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        // 0, 100, 300, 600, 1000 ...
        assert_eq!(xp_for_level(1, 100), 0);
        assert_eq!(xp_for_level(2, 100), 100);
        assert_eq!(xp_for_level(3, 100), 300);
        assert_eq!(xp_for_level(5, 100), 1000);
    }

    #[test]
    fn test_level_for_xp_boundaries() {
        assert_eq!(level_for_xp(0, 100), 1);
        assert_eq!(level_for_xp(99, 100), 1);
        assert_eq!(level_for_xp(100, 100), 2);
        assert_eq!(level_for_xp(299, 100), 2);
        assert_eq!(level_for_xp(300, 100), 3);
        assert_eq!(level_for_xp(999, 100), 4);
        assert_eq!(level_for_xp(1000, 100), 5);
        assert_eq!(level_for_xp(-5, 100), 1);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut last = 1;
        for xp in (0..20_000).step_by(37) {
            let level = level_for_xp(xp, 100);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_progress_for_xp() {
        let progress = progress_for_xp(450, 100);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.current_level_xp, 300);
        assert_eq!(progress.next_level_xp, 600);
    }

    #[test]
    fn test_closed_form_matches_thresholds() {
        for step in [1, 7, 100, 250] {
            for level in 1..300 {
                let start = xp_for_level(level, step);
                assert_eq!(level_for_xp(start, step), level, "step {step}");
                assert_eq!(level_for_xp(xp_for_level(level + 1, step) - 1, step), level);
            }
        }
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        assert_eq!(xp_for_level(i32::MAX, 100), i64::MAX);
        assert_eq!(level_for_xp(i64::MAX, 1), i32::MAX);
        let level = level_for_xp(i64::MAX, 1_000_000_000);
        assert_eq!(
            level_for_xp(xp_for_level(level, 1_000_000_000), 1_000_000_000),
            level
        );
        assert!(xp_for_level(level + 1, 1_000_000_000) > i64::MAX / 2);
    }

    #[test]
    fn test_zero_step_stays_at_level_one() {
        assert_eq!(level_for_xp(5000, 0), 1);
    }
}
