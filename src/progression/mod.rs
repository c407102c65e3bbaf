//! Progression: coin rewards, player stats and achievements
//!
//! Consumes a finished battle and updates everything that outlives it.

pub mod achievements;

use serde::{Deserialize, Serialize};

pub use achievements::{
    Achievement, AchievementCategory, AchievementDef, AchievementRecord, AchievementRule,
    EvalContext, CATALOG,
};

/// Base coins for a won bet
pub const WIN_BASE_COINS: u64 = 10;
/// Base coins for a lost bet
pub const LOSS_BASE_COINS: u64 = 2;
/// Combo level that starts paying out
pub const COMBO_BONUS_THRESHOLD: u32 = 3;
/// Configured speed that starts paying out
pub const SPEED_BONUS_THRESHOLD: f32 = 3.0;
/// Win streak where the multiplier kicks in
pub const STREAK_BONUS_THRESHOLD: u32 = 3;

/// Cumulative player statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub correct_bets: u32,
    pub total_comebacks: u32,
    pub total_coins: u64,
    pub total_collisions: u64,
    pub total_combos: u32,
    pub best_streak: u32,
    /// Fastest winning battle in seconds; `None` until the first win
    pub fastest_win: Option<u32>,
}

impl PlayerStats {
    /// Win rate in percent (0 with no games)
    pub fn win_rate(&self) -> f32 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.wins as f32 / self.total_games as f32 * 100.0
    }
}

/// One finished battle, as seen by progression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRecord {
    pub won: bool,
    /// Win streak including this game (0 after a loss)
    pub current_streak: u32,
    pub max_combo: u32,
    pub duration_secs: u32,
    pub collisions: u32,
    /// Configured speed scalar
    pub speed: f32,
}

/// Where a coin grant came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSource {
    Victory,
    BattleComplete,
    Achievement(&'static AchievementDef),
}

impl CoinSource {
    pub fn reason(&self) -> String {
        match self {
            CoinSource::Victory => "Victory!".to_string(),
            CoinSource::BattleComplete => "Battle Complete".to_string(),
            CoinSource::Achievement(def) => format!("Achievement: {}", def.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinGrant {
    pub amount: u64,
    pub source: CoinSource,
}

/// Everything a single game result earned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameReward {
    pub battle_coins: u64,
    /// Battle grant first, then one per unlocked achievement
    pub grants: Vec<CoinGrant>,
    pub unlocked: Vec<&'static AchievementDef>,
}

impl GameReward {
    /// Battle coins plus achievement rewards
    pub fn total(&self) -> u64 {
        self.grants.iter().map(|g| g.amount).sum()
    }

    pub fn achievement_coins(&self) -> u64 {
        self.total() - self.battle_coins
    }
}

/// Coins earned by the battle itself
pub fn battle_coins(record: &GameRecord) -> u64 {
    if !record.won {
        let mut coins = LOSS_BASE_COINS;
        if record.max_combo >= COMBO_BONUS_THRESHOLD {
            coins += (record.max_combo / 2) as u64;
        }
        return coins;
    }

    let mut coins = WIN_BASE_COINS;
    if record.max_combo >= COMBO_BONUS_THRESHOLD {
        coins += (record.max_combo - 2) as u64;
    }
    if record.speed >= SPEED_BONUS_THRESHOLD {
        coins += record.speed.floor() as u64;
    }
    if record.current_streak >= STREAK_BONUS_THRESHOLD {
        // floor(coins * (1 + (streak - 2) * 0.2)) == floor(coins * (streak + 3) / 5)
        coins = coins * (record.current_streak as u64 + 3) / 5;
    }
    coins
}

/// Player stats plus achievement progress
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub stats: PlayerStats,
    pub achievements: Vec<Achievement>,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            stats: PlayerStats::default(),
            achievements: achievements::fresh_catalog(),
        }
    }

    /// Restore from persisted records (catalog drift is tolerated)
    pub fn from_parts(stats: PlayerStats, records: &[AchievementRecord]) -> Self {
        Self {
            stats,
            achievements: achievements::from_records(records),
        }
    }

    pub fn achievement_records(&self) -> Vec<AchievementRecord> {
        self.achievements.iter().map(Achievement::to_record).collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id() == id)
    }

    /// Apply one finished game: coins, stats, then achievements
    pub fn record_game_result(&mut self, record: &GameRecord) -> GameReward {
        let coins = battle_coins(record);
        let prior_losses = self.stats.losses;
        let is_comeback = record.won && prior_losses > 0 && record.current_streak == 1;

        let stats = &mut self.stats;
        stats.total_games += 1;
        if record.won {
            stats.wins += 1;
            stats.correct_bets += 1;
        } else {
            stats.losses += 1;
        }
        if is_comeback {
            stats.total_comebacks += 1;
        }
        stats.total_coins += coins;
        stats.total_collisions += record.collisions as u64;
        if record.max_combo >= COMBO_BONUS_THRESHOLD {
            stats.total_combos += 1;
        }
        stats.best_streak = stats.best_streak.max(record.current_streak);
        if record.won {
            stats.fastest_win = Some(match stats.fastest_win {
                Some(best) => best.min(record.duration_secs),
                None => record.duration_secs,
            });
        }

        let mut reward = GameReward {
            battle_coins: coins,
            grants: vec![CoinGrant {
                amount: coins,
                source: if record.won {
                    CoinSource::Victory
                } else {
                    CoinSource::BattleComplete
                },
            }],
            unlocked: Vec::new(),
        };

        // Every achievement sees the same snapshot
        let snapshot = self.stats.clone();
        let ctx = EvalContext {
            stats: &snapshot,
            won: record.won,
            current_streak: record.current_streak,
            max_combo: record.max_combo,
            duration_secs: record.duration_secs,
        };
        for achievement in self.achievements.iter_mut() {
            if achievement.update(&ctx) {
                let def = achievement.def;
                log::info!("Achievement unlocked: {} (+{} coins)", def.name, def.coin_reward);
                reward.unlocked.push(def);
                reward.grants.push(CoinGrant {
                    amount: def.coin_reward,
                    source: CoinSource::Achievement(def),
                });
            }
        }
        self.stats.total_coins += reward.achievement_coins();

        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn game(won: bool, max_combo: u32, speed: f32, streak: u32) -> GameRecord {
        GameRecord {
            won,
            current_streak: streak,
            max_combo,
            duration_secs: 30,
            collisions: 40,
            speed,
        }
    }

    #[test]
    fn test_reward_formula() {
        assert_eq!(battle_coins(&game(true, 0, 2.0, 0)), 10);
        assert_eq!(battle_coins(&game(true, 5, 2.0, 0)), 13);
        assert_eq!(battle_coins(&game(true, 0, 4.0, 0)), 14);
        assert_eq!(battle_coins(&game(true, 0, 2.0, 4)), 14);
        assert_eq!(battle_coins(&game(false, 6, 2.0, 0)), 5);
        assert_eq!(battle_coins(&game(false, 6, 5.0, 0)), 5);
    }

    #[test]
    fn test_reward_edges() {
        // Combo of 2 pays nothing, speed 3.5 floors to 3
        assert_eq!(battle_coins(&game(true, 2, 3.5, 0)), 13);
        // Streak 3: x1.2
        assert_eq!(battle_coins(&game(true, 0, 2.0, 3)), 12);
        // 13 * 1.4 = 18.2
        assert_eq!(battle_coins(&game(true, 5, 2.0, 4)), 18);
        assert_eq!(battle_coins(&game(false, 2, 2.0, 0)), 2);
    }

    #[test]
    fn test_first_win_unlocks_once() {
        let mut progression = Progression::new();
        let reward = progression.record_game_result(&game(true, 0, 2.0, 1));

        assert_eq!(reward.battle_coins, 10);
        assert!(reward.unlocked.iter().any(|d| d.id == "first_win"));
        assert_eq!(reward.total(), 10 + 10);
        assert_eq!(progression.stats.total_coins, 20);

        let again = progression.record_game_result(&game(true, 0, 2.0, 2));
        assert!(again.unlocked.is_empty());
        assert_eq!(again.total(), 10);
        let first_win = progression.achievement("first_win").unwrap();
        assert!(first_win.unlocked);
        assert_eq!(first_win.progress, 1);
    }

    #[test]
    fn test_multiple_unlocks_in_one_pass() {
        let mut progression = Progression::new();
        // First win, a 10x combo and a quick finish
        let record = GameRecord {
            won: true,
            current_streak: 1,
            max_combo: 10,
            duration_secs: 8,
            collisions: 120,
            speed: 2.0,
        };
        let reward = progression.record_game_result(&record);
        let ids: Vec<_> = reward.unlocked.iter().map(|d| d.id).collect();
        for id in ["first_win", "combo_starter", "combo_master", "speedrunner", "brawler"] {
            assert!(ids.contains(&id), "{id} should unlock");
        }
        assert_eq!(reward.grants.len(), 1 + ids.len());
        assert_eq!(progression.stats.total_coins, reward.total());
    }

    #[test]
    fn test_comeback_detection() {
        let mut progression = Progression::new();
        progression.record_game_result(&game(false, 0, 2.0, 0));
        progression.record_game_result(&game(true, 0, 2.0, 1));
        assert_eq!(progression.stats.total_comebacks, 1);

        // Second consecutive win is not a comeback
        progression.record_game_result(&game(true, 0, 2.0, 2));
        assert_eq!(progression.stats.total_comebacks, 1);
    }

    #[test]
    fn test_fastest_win_only_improves_on_wins() {
        let mut progression = Progression::new();
        let mut record = game(false, 0, 2.0, 0);
        record.duration_secs = 5;
        progression.record_game_result(&record);
        assert_eq!(progression.stats.fastest_win, None);

        record.won = true;
        record.current_streak = 1;
        record.duration_secs = 40;
        progression.record_game_result(&record);
        assert_eq!(progression.stats.fastest_win, Some(40));

        record.duration_secs = 55;
        progression.record_game_result(&record);
        assert_eq!(progression.stats.fastest_win, Some(40));

        record.duration_secs = 21;
        progression.record_game_result(&record);
        assert_eq!(progression.stats.fastest_win, Some(21));
    }

    #[test]
    fn test_stats_deserialize_with_missing_fields() {
        let stats: PlayerStats = serde_json::from_str(r#"{"totalGames":3,"wins":2,"losses":1}"#).unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.fastest_win, None);
        assert_eq!(stats.total_coins, 0);

        let stats: PlayerStats = serde_json::from_str(r#"{"fastestWin":null}"#).unwrap();
        assert_eq!(stats.fastest_win, None);
    }

    proptest! {
        #[test]
        fn games_equal_wins_plus_losses(
            games in proptest::collection::vec((any::<bool>(), 0u32..15, 0u32..120, 0u32..200), 1..40)
        ) {
            let mut progression = Progression::new();
            let mut streak = 0;
            let mut unlocked_before = 0;
            for (won, combo, duration, collisions) in games {
                streak = if won { streak + 1 } else { 0 };
                let record = GameRecord {
                    won,
                    current_streak: streak,
                    max_combo: combo,
                    duration_secs: duration,
                    collisions,
                    speed: 2.0,
                };
                let before = progression.stats.best_streak;
                progression.record_game_result(&record);
                let stats = &progression.stats;
                prop_assert_eq!(stats.total_games, stats.wins + stats.losses);
                prop_assert!(stats.best_streak >= before);

                // Unlocks are monotonic and progress stays clamped
                let unlocked = progression.unlocked_count();
                prop_assert!(unlocked >= unlocked_before);
                unlocked_before = unlocked;
                for a in progression.achievements.iter().filter(|a| a.unlocked) {
                    prop_assert_eq!(a.progress, a.def.requirement);
                }
            }
        }
    }
}
