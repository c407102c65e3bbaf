//! Save/load of everything that outlives a battle
//!
//! Features:
//! - Flat JSON records under fixed string keys
//! - Pluggable key-value backend (LocalStorage, files, memory)
//! - Corrupt or missing records fall back to defaults

pub mod storage;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use storage::{KeyValueStore, MemoryStorage};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use crate::error::StorageError;
use crate::ledger::CoinLedger;
use crate::progression::{AchievementRecord, PlayerStats, Progression};
use crate::settings::Settings;

pub const STATS_KEY: &str = "rps_player_stats";
pub const ACHIEVEMENTS_KEY: &str = "rps_achievements";
pub const STREAK_KEY: &str = "rps_streak";

/// Read and decode a record. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a record
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load a record, falling back to `T::default()` on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Failed to load '{}', using defaults: {}", key, e);
            T::default()
        }
    }
}

/// Save a record, logging instead of failing
pub fn save_or_warn<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save_json(store, key, value) {
        log::warn!("Failed to save '{}': {}", key, e);
    }
}

/// Load player stats and achievement progress
pub fn load_progression(store: &dyn KeyValueStore) -> Progression {
    let stats: PlayerStats = load_or_default(store, STATS_KEY);
    let records: Vec<AchievementRecord> = load_or_default(store, ACHIEVEMENTS_KEY);
    let progression = Progression::from_parts(stats, &records);
    log::info!(
        "Loaded progression: {} games, {} coins, {}/{} achievements",
        progression.stats.total_games,
        progression.stats.total_coins,
        progression.unlocked_count(),
        progression.achievements.len()
    );
    progression
}

pub fn save_progression(store: &mut dyn KeyValueStore, progression: &Progression) {
    save_or_warn(store, STATS_KEY, &progression.stats);
    save_or_warn(store, ACHIEVEMENTS_KEY, &progression.achievement_records());
}

pub fn load_streak(store: &dyn KeyValueStore) -> u32 {
    load_or_default(store, STREAK_KEY)
}

pub fn save_streak(store: &mut dyn KeyValueStore, streak: u32) {
    save_or_warn(store, STREAK_KEY, &streak);
}

pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    load_or_default(store, Settings::STORAGE_KEY)
}

pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) {
    save_or_warn(store, Settings::STORAGE_KEY, settings);
}

pub fn load_ledger(store: &dyn KeyValueStore) -> CoinLedger {
    load_or_default(store, CoinLedger::STORAGE_KEY)
}

pub fn save_ledger(store: &mut dyn KeyValueStore, ledger: &CoinLedger) {
    save_or_warn(store, CoinLedger::STORAGE_KEY, ledger);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::GameRecord;

    #[test]
    fn test_progression_round_trip() {
        let mut store = MemoryStorage::new();
        let mut progression = Progression::new();
        progression.record_game_result(&GameRecord {
            won: true,
            current_streak: 1,
            max_combo: 6,
            duration_secs: 25,
            collisions: 150,
            speed: 2.0,
        });
        save_progression(&mut store, &progression);

        let loaded = load_progression(&store);
        assert_eq!(loaded, progression);
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let mut store = MemoryStorage::new();
        store.set(STATS_KEY, "{not json").unwrap();
        store.set(STREAK_KEY, "\"seven\"").unwrap();

        let progression = load_progression(&store);
        assert_eq!(progression.stats, PlayerStats::default());
        assert_eq!(load_streak(&store), 0);
    }

    #[test]
    fn test_missing_records_default() {
        let store = MemoryStorage::new();
        assert_eq!(load_settings(&store), Settings::default());
        assert!(load_ledger(&store).is_empty());
        assert_eq!(load_progression(&store), Progression::new());
    }

    #[test]
    fn test_unavailable_backend_is_not_fatal() {
        let mut store = MemoryStorage::unavailable();
        save_streak(&mut store, 4);
        assert_eq!(load_streak(&store), 0);
    }
}
