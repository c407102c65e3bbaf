//! Battle simulation module
//!
//! All battle logic lives here:
//! - Per-frame motion (no delta-time scaling)
//! - Wall-clock time passed in as `now` (ms), never read directly
//! - Timers tagged with the battle generation
//! - No rendering or platform dependencies

pub mod combo;
pub mod entity;
pub mod physics;
pub mod species;
pub mod state;
pub mod tick;
pub mod timers;

pub use combo::{ComboStep, ComboTracker, combo_particles};
pub use entity::{BoostState, Entity};
pub use physics::{BoostParams, apply_boost, collides, expire_boost, hit_test};
pub use species::{Species, SpeciesCounts, winner};
pub use state::{
    ArenaMetrics, BattleConfig, BattleOutcome, BattlePhase, BattleStats, BoostResult, SimEvent,
    SimulationState,
};
pub use tick::tick;
pub use timers::{TimerKind, TimerQueue};
