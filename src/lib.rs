//! RPS Arena - a Rock/Paper/Scissors autobattler
//!
//! Core modules:
//! - `sim`: Battle simulation (physics, conversions, combos, timers)
//! - `progression`: Coin rewards, player stats, achievements
//! - `game`: Wager → countdown → battle → reward flow
//! - `persistence`: Key-value storage and typed save/load
//! - `platform`: Wall clock and external hooks (ad SDK, toasts)

pub mod error;
pub mod game;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod progression;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StorageError};
pub use game::{Game, GamePhase};
pub use ledger::CoinLedger;
pub use progression::{GameRecord, GameReward, PlayerStats, Progression};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Arena size the entity size and speed scale are tuned against
    pub const BASE_ARENA_SIZE: f32 = 600.0;
    /// Entity size (px) at the base arena size
    pub const BASE_ENTITY_SIZE: f32 = 32.0;
    /// Default arena size when the host does not provide one
    pub const DEFAULT_ARENA_SIZE: f32 = 600.0;

    /// Default configured speed scalar
    pub const DEFAULT_SPEED: f32 = 2.0;
    /// Speed slider bounds
    pub const MIN_SPEED: f32 = 0.5;
    pub const MAX_SPEED: f32 = 5.0;

    /// Default entities per species for explicit setups
    pub const DEFAULT_SPECIES_COUNT: u32 = 20;
    /// Equalized per-species counts picked at random on wager
    pub const SPAWN_PRESETS: [u32; 3] = [15, 20, 25];

    /// Minimum time between two boosts of the same entity (ms)
    pub const CLICK_COOLDOWN_MS: f64 = 3000.0;
    /// How long a boost lasts (ms)
    pub const BOOST_DURATION_MS: f64 = 2000.0;
    /// Velocity multiplier applied on boost
    pub const BOOST_SPEED_MULT: f32 = 1.8;
    /// Velocity multiplier applied when a boost expires
    pub const BOOST_REVERT_MULT: f32 = 1.0 / BOOST_SPEED_MULT;

    /// Scale interpolation rate per tick
    pub const SCALE_SPEED: f32 = 0.25;
    /// Snap distance for scale interpolation
    pub const SCALE_EPSILON: f32 = 0.01;
    /// Pop scale on a successful boost
    pub const SCALE_BOOST: f32 = 1.2;
    /// Shrink scale on a boost denied by cooldown
    pub const SCALE_COOLDOWN: f32 = 0.95;
    /// Time before the boost pop scale returns to 1.0 (ms)
    pub const SCALE_ANIMATION_MS: f64 = 250.0;
    /// Time before the denied shrink returns to 1.0 (ms)
    pub const SCALE_ANIMATION_COOLDOWN_MS: f64 = 100.0;

    /// Combo window: no conversion for this long ends the streak (ms)
    pub const COMBO_TIMEOUT_MS: f64 = 2000.0;
    /// Combo level at which particle bursts start
    pub const COMBO_PARTICLE_THRESHOLD: u32 = 3;
    /// Combo level that triggers the mega combo event
    pub const MEGA_COMBO_THRESHOLD: u32 = 10;

    /// Slow motion starts when a species in a two-way fight drops below this
    pub const SLOW_MOTION_THRESHOLD: u32 = 5;
    /// Velocity multiplier applied once when slow motion starts
    pub const SLOW_MOTION_FACTOR: f32 = 0.4;

    /// Seconds of countdown between wager and spawn
    pub const COUNTDOWN_SECS: u32 = 3;
}

/// Rescale a velocity to a new magnitude while keeping its heading.
///
/// Goes through angle/magnitude so every axis is scaled the same way.
#[inline]
pub fn with_speed(vel: glam::Vec2, speed: f32) -> glam::Vec2 {
    let angle = vel.y.atan2(vel.x);
    glam::Vec2::from_angle(angle) * speed
}

/// Multiply a velocity's magnitude by `factor`, keeping its heading
#[inline]
pub fn scale_speed(vel: glam::Vec2, factor: f32) -> glam::Vec2 {
    with_speed(vel, vel.length() * factor)
}
