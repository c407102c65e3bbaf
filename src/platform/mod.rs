//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Hooks into the host (ad SDK gameplay signals, toasts)

use crate::progression::{AchievementDef, CoinGrant};

/// Current wall-clock time in Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in Unix milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Fire-and-forget notifications to the host.
///
/// Nothing returned from here affects the simulation.
pub trait PlatformHooks {
    /// Gameplay is (re)starting: wager placed, countdown done, resume
    fn gameplay_start(&mut self) {}
    /// Gameplay stopped: victory or pause
    fn gameplay_stop(&mut self) {}
    /// Coins were granted (one call per attributed source)
    fn coins_granted(&mut self, _grant: &CoinGrant) {}
    /// An achievement unlocked, for toast display
    fn achievement_unlocked(&mut self, _achievement: &'static AchievementDef) {}
}

/// Hooks that only log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHooks;

impl PlatformHooks for LogHooks {
    fn gameplay_start(&mut self) {
        log::info!("🎮 gameplayStart");
    }

    fn gameplay_stop(&mut self) {
        log::info!("☠ gameplayStop");
    }

    fn coins_granted(&mut self, grant: &CoinGrant) {
        log::info!("+{} coins ({})", grant.amount, grant.source.reason());
    }

    fn achievement_unlocked(&mut self, achievement: &'static AchievementDef) {
        log::info!(
            "{} {} - {}",
            achievement.icon,
            achievement.name,
            achievement.description
        );
    }
}

/// Hooks that record every call (tests, replays)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingHooks {
    pub starts: u32,
    pub stops: u32,
    pub grants: Vec<CoinGrant>,
    pub achievements: Vec<&'static str>,
}

impl PlatformHooks for RecordingHooks {
    fn gameplay_start(&mut self) {
        self.starts += 1;
    }

    fn gameplay_stop(&mut self) {
        self.stops += 1;
    }

    fn coins_granted(&mut self, grant: &CoinGrant) {
        self.grants.push(*grant);
    }

    fn achievement_unlocked(&mut self, achievement: &'static AchievementDef) {
        self.achievements.push(achievement.id);
    }
}
