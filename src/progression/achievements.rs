//! Achievement catalog and evaluation
//!
//! Definitions are static. Only `(id, unlocked, progress)` is persisted, so
//! renaming or re-pricing an achievement never needs a migration.

use serde::{Deserialize, Serialize};

use super::PlayerStats;

/// Achievement grouping for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Betting,
    Combat,
    Mastery,
    Special,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 4] = [
        AchievementCategory::Betting,
        AchievementCategory::Combat,
        AchievementCategory::Mastery,
        AchievementCategory::Special,
    ];
}

/// Which number an achievement tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    /// Total wins; unlocks on a winning game
    Wins,
    /// Current win streak
    WinStreak,
    /// Lifetime conversions
    TotalCollisions,
    /// Best combo in a single battle
    MaxCombo,
    TotalGames,
    TotalCoins,
    /// Win in at most `requirement` seconds
    FastWin,
    /// Wins straight after a loss
    Comebacks,
    CorrectBets,
}

/// Static achievement definition
#[derive(Debug, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub requirement: u64,
    pub coin_reward: u64,
    pub rule: AchievementRule,
}

pub static CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_win",
        name: "First Victory",
        description: "Win your first bet",
        icon: "🎉",
        category: AchievementCategory::Betting,
        requirement: 1,
        coin_reward: 10,
        rule: AchievementRule::Wins,
    },
    AchievementDef {
        id: "lucky_streak",
        name: "Lucky Streak",
        description: "Win 3 bets in a row",
        icon: "🍀",
        category: AchievementCategory::Betting,
        requirement: 3,
        coin_reward: 25,
        rule: AchievementRule::WinStreak,
    },
    AchievementDef {
        id: "streak_master",
        name: "Streak Master",
        description: "Win 5 bets in a row",
        icon: "🔥",
        category: AchievementCategory::Betting,
        requirement: 5,
        coin_reward: 50,
        rule: AchievementRule::WinStreak,
    },
    AchievementDef {
        id: "unbeatable",
        name: "Unbeatable",
        description: "Win 10 bets in a row",
        icon: "👑",
        category: AchievementCategory::Betting,
        requirement: 10,
        coin_reward: 150,
        rule: AchievementRule::WinStreak,
    },
    AchievementDef {
        id: "perfect_prediction",
        name: "Perfect Prediction",
        description: "Call the winner 5 times",
        icon: "🔮",
        category: AchievementCategory::Betting,
        requirement: 5,
        coin_reward: 30,
        rule: AchievementRule::CorrectBets,
    },
    AchievementDef {
        id: "brawler",
        name: "Brawler",
        description: "Witness 100 conversions",
        icon: "👊",
        category: AchievementCategory::Combat,
        requirement: 100,
        coin_reward: 20,
        rule: AchievementRule::TotalCollisions,
    },
    AchievementDef {
        id: "warmonger",
        name: "Warmonger",
        description: "Witness 500 conversions",
        icon: "⚔️",
        category: AchievementCategory::Combat,
        requirement: 500,
        coin_reward: 75,
        rule: AchievementRule::TotalCollisions,
    },
    AchievementDef {
        id: "combo_starter",
        name: "Combo Starter",
        description: "Reach a 5x combo",
        icon: "⚡",
        category: AchievementCategory::Combat,
        requirement: 5,
        coin_reward: 15,
        rule: AchievementRule::MaxCombo,
    },
    AchievementDef {
        id: "combo_master",
        name: "Combo Master",
        description: "Reach a 10x combo",
        icon: "💥",
        category: AchievementCategory::Combat,
        requirement: 10,
        coin_reward: 50,
        rule: AchievementRule::MaxCombo,
    },
    AchievementDef {
        id: "speedrunner",
        name: "Speedrunner",
        description: "Win a bet in 10 seconds or less",
        icon: "⏱️",
        category: AchievementCategory::Mastery,
        requirement: 10,
        coin_reward: 40,
        rule: AchievementRule::FastWin,
    },
    AchievementDef {
        id: "veteran",
        name: "Veteran",
        description: "Play 10 battles",
        icon: "🎖️",
        category: AchievementCategory::Mastery,
        requirement: 10,
        coin_reward: 25,
        rule: AchievementRule::TotalGames,
    },
    AchievementDef {
        id: "arena_legend",
        name: "Arena Legend",
        description: "Play 50 battles",
        icon: "🏟️",
        category: AchievementCategory::Mastery,
        requirement: 50,
        coin_reward: 100,
        rule: AchievementRule::TotalGames,
    },
    AchievementDef {
        id: "coin_collector",
        name: "Coin Collector",
        description: "Earn 500 coins",
        icon: "💰",
        category: AchievementCategory::Special,
        requirement: 500,
        coin_reward: 50,
        rule: AchievementRule::TotalCoins,
    },
    AchievementDef {
        id: "millionaire",
        name: "Millionaire",
        description: "Earn 1000 coins",
        icon: "💎",
        category: AchievementCategory::Special,
        requirement: 1000,
        coin_reward: 100,
        rule: AchievementRule::TotalCoins,
    },
    AchievementDef {
        id: "comeback_king",
        name: "Comeback King",
        description: "Win right after a loss 3 times",
        icon: "🦅",
        category: AchievementCategory::Special,
        requirement: 3,
        coin_reward: 40,
        rule: AchievementRule::Comebacks,
    },
];

/// Look up a definition by id
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Inputs for one evaluation pass: stats already include this game
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub stats: &'a PlayerStats,
    pub won: bool,
    pub current_streak: u32,
    pub max_combo: u32,
    pub duration_secs: u32,
}

impl AchievementDef {
    /// New progress and whether the requirement is met
    pub fn evaluate(&self, previous: u64, ctx: &EvalContext<'_>) -> (u64, bool) {
        let req = self.requirement;
        let stats = ctx.stats;
        match self.rule {
            AchievementRule::Wins => {
                let wins = stats.wins as u64;
                (wins, ctx.won && wins >= req)
            }
            AchievementRule::WinStreak => {
                let streak = ctx.current_streak as u64;
                (streak, streak >= req)
            }
            AchievementRule::TotalCollisions => (stats.total_collisions, stats.total_collisions >= req),
            AchievementRule::MaxCombo => {
                let combo = ctx.max_combo as u64;
                (combo.max(previous), combo >= req)
            }
            AchievementRule::TotalGames => {
                let games = stats.total_games as u64;
                (games, games >= req)
            }
            AchievementRule::TotalCoins => (stats.total_coins, stats.total_coins >= req),
            AchievementRule::FastWin => {
                if !ctx.won {
                    return (previous, false);
                }
                let duration = ctx.duration_secs as u64;
                (req.saturating_sub(duration).max(previous), duration <= req)
            }
            AchievementRule::Comebacks => {
                let comebacks = stats.total_comebacks as u64;
                (comebacks, comebacks >= req)
            }
            AchievementRule::CorrectBets => {
                let bets = stats.correct_bets as u64;
                (bets, bets >= req)
            }
        }
    }
}

/// An achievement with the player's progress
#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub def: &'static AchievementDef,
    pub unlocked: bool,
    pub progress: u64,
}

impl Achievement {
    pub fn new(def: &'static AchievementDef) -> Self {
        Self {
            def,
            unlocked: false,
            progress: 0,
        }
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    /// Update progress; returns true if this call unlocked it.
    /// Unlocked achievements never change again.
    pub fn update(&mut self, ctx: &EvalContext<'_>) -> bool {
        if self.unlocked {
            return false;
        }
        let (progress, met) = self.def.evaluate(self.progress, ctx);
        if met {
            self.unlocked = true;
            self.progress = self.def.requirement;
        } else {
            self.progress = progress;
        }
        met
    }

    pub fn to_record(&self) -> AchievementRecord {
        AchievementRecord {
            id: self.def.id.to_string(),
            unlocked: self.unlocked,
            progress: self.progress,
        }
    }
}

/// Persisted form of an achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub progress: u64,
}

/// Fresh, fully locked catalog
pub fn fresh_catalog() -> Vec<Achievement> {
    CATALOG.iter().map(Achievement::new).collect()
}

/// Rebuild the catalog from stored records.
///
/// Unknown stored ids are dropped; catalog entries missing from storage
/// start locked at zero.
pub fn from_records(records: &[AchievementRecord]) -> Vec<Achievement> {
    CATALOG
        .iter()
        .map(|def| match records.iter().find(|r| r.id == def.id) {
            Some(record) => Achievement {
                def,
                unlocked: record.unlocked,
                progress: if record.unlocked {
                    def.requirement
                } else {
                    record.progress
                },
            },
            None => Achievement::new(def),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 15);
    }

    #[test]
    fn test_every_category_used() {
        for category in AchievementCategory::ALL {
            assert!(CATALOG.iter().any(|d| d.category == category));
        }
    }

    #[test]
    fn test_catalog_drift() {
        let records = vec![
            AchievementRecord {
                id: "retired_achievement".to_string(),
                unlocked: true,
                progress: 9,
            },
            AchievementRecord {
                id: "veteran".to_string(),
                unlocked: false,
                progress: 4,
            },
            AchievementRecord {
                id: "brawler".to_string(),
                unlocked: true,
                progress: 3,
            },
        ];
        let achievements = from_records(&records);
        assert_eq!(achievements.len(), CATALOG.len());

        let veteran = achievements.iter().find(|a| a.id() == "veteran").unwrap();
        assert_eq!(veteran.progress, 4);
        assert!(!veteran.unlocked);

        let brawler = achievements.iter().find(|a| a.id() == "brawler").unwrap();
        assert!(brawler.unlocked);
        assert_eq!(brawler.progress, 100);

        let fresh = achievements.iter().find(|a| a.id() == "millionaire").unwrap();
        assert!(!fresh.unlocked);
        assert_eq!(fresh.progress, 0);
    }

    #[test]
    fn test_fast_win_only_on_wins() {
        let def = find("speedrunner").unwrap();
        let stats = PlayerStats::default();
        let lost = EvalContext {
            stats: &stats,
            won: false,
            current_streak: 0,
            max_combo: 0,
            duration_secs: 4,
        };
        assert_eq!(def.evaluate(0, &lost), (0, false));

        let slow_win = EvalContext {
            won: true,
            duration_secs: 14,
            ..lost
        };
        assert_eq!(def.evaluate(2, &slow_win), (2, false));

        let quick_win = EvalContext {
            won: true,
            duration_secs: 7,
            ..lost
        };
        assert_eq!(def.evaluate(0, &quick_win), (3, true));
    }
}
