//! 抽奖券加权抽取

use rand::Rng;

use super::entities::RaffleEntry;

/// 按券数加权抽取中奖者
///
/// 累加权重后在 `[0, 总券数)` 内取一次均匀随机数，落在哪个区间就是谁。
/// 没有有效抽奖券时返回 None。
pub fn pick_weighted<R: Rng + ?Sized>(entries: &[RaffleEntry], rng: &mut R) -> Option<i64> {
    let total: i64 = entries.iter().map(|e| i64::from(e.entries.max(0))).sum();
    if total <= 0 {
        return None;
    }
    let ticket = rng.random_range(0..total);
    let mut cumulative = 0;
    for entry in entries {
        cumulative += i64::from(entry.entries.max(0));
        if ticket < cumulative {
            return Some(entry.user_id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(user_id: i64, entries: i32) -> RaffleEntry {
        RaffleEntry {
            id: user_id,
            raffle_id: 1,
            user_id,
            entries,
            coins_spent: i64::from(entries) * 5,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_no_entries_no_winner() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_weighted(&[], &mut rng), None);
        assert_eq!(pick_weighted(&[entry(1, 0)], &mut rng), None);
    }

    #[test]
    fn test_single_participant_always_wins() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(pick_weighted(&[entry(0, 0), entry(9, 3)], &mut rng), Some(9));
        }
    }

    #[test]
    fn test_selection_is_proportional_to_entries() {
        let entries = [entry(1, 1), entry(2, 3), entry(3, 6)];
        let mut rng = StdRng::seed_from_u64(42);
        let mut wins = [0u32; 3];
        let rounds = 20_000;
        for _ in 0..rounds {
            let winner = pick_weighted(&entries, &mut rng).unwrap();
            wins[(winner - 1) as usize] += 1;
        }
        let share = |i: usize| f64::from(wins[i]) / f64::from(rounds);
        assert!((share(0) - 0.1).abs() < 0.02, "{wins:?}");
        assert!((share(1) - 0.3).abs() < 0.02, "{wins:?}");
        assert!((share(2) - 0.6).abs() < 0.02, "{wins:?}");
    }
}
