//! Battle state and core simulation types
//!
//! `SimulationState` is owned by whoever drives the loop. Other code gets
//! read access or goes through the narrow methods here (boost, speed,
//! pause).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combo::ComboTracker;
use super::entity::Entity;
use super::physics::{self, BoostParams};
use super::species::{Species, SpeciesCounts};
use super::timers::{TimerKind, TimerQueue};
use crate::consts::*;
use crate::error::ConfigError;
use crate::with_speed;

/// Current phase of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Entities are being created
    Spawning,
    /// Ticking every frame
    Running,
    /// Ticks suspended; entity and combo state kept
    Paused,
    /// One species left
    Victory(Species),
}

/// Entity size and speed scale derived from the arena size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaMetrics {
    pub arena_size: f32,
    pub entity_size: f32,
    pub speed_multiplier: f32,
}

impl ArenaMetrics {
    pub fn for_size(arena_size: f32) -> Self {
        let scale_factor = arena_size / BASE_ARENA_SIZE;
        Self {
            arena_size,
            entity_size: (BASE_ENTITY_SIZE * scale_factor).round(),
            speed_multiplier: scale_factor,
        }
    }

    /// Largest valid top-left coordinate on either axis
    pub fn max_pos(&self) -> f32 {
        self.arena_size - self.entity_size
    }
}

/// Everything needed to spawn a battle
#[derive(Debug, Clone, PartialEq)]
pub struct BattleConfig {
    pub counts: SpeciesCounts,
    pub arena_size: f32,
    /// Configured speed scalar (slider value)
    pub speed: f32,
    /// Cap on particles per combo burst
    pub max_combo_particles: u32,
    pub boost: BoostParams,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            counts: SpeciesCounts::equal(DEFAULT_SPECIES_COUNT),
            arena_size: DEFAULT_ARENA_SIZE,
            speed: DEFAULT_SPEED,
            max_combo_particles: 5,
            boost: BoostParams::default(),
        }
    }
}

impl BattleConfig {
    /// Reject configurations the loop cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counts.total() == 0 {
            return Err(ConfigError::NoEntities);
        }
        if self.counts.surviving_count() < 2 {
            return Err(ConfigError::SingleSpecies);
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        let metrics = self.metrics();
        if !metrics.arena_size.is_finite() || metrics.max_pos() <= 0.0 {
            return Err(ConfigError::ArenaTooSmall {
                arena: metrics.arena_size,
                entity: metrics.entity_size,
            });
        }
        Ok(())
    }

    pub fn metrics(&self) -> ArenaMetrics {
        ArenaMetrics::for_size(self.arena_size)
    }
}

/// Measurements of the running battle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BattleStats {
    /// Wall-clock start (ms)
    pub start_time: f64,
    /// One per converted entity
    pub total_collisions: u32,
    /// Whole seconds, set at victory
    pub duration: u32,
}

/// Final numbers handed to progression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOutcome {
    pub winner: Species,
    pub wager: Species,
    pub max_combo: u32,
    pub duration_secs: u32,
    pub total_collisions: u32,
    pub speed: f32,
}

impl BattleOutcome {
    pub fn won(&self) -> bool {
        self.winner == self.wager
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// An entity changed species
    Converted { entity: usize, to: Species, at: Vec2 },
    /// Combo burst: spawn `particles` particles at `at`
    ComboBurst { combo: u32, particles: u32, at: Vec2 },
    /// Combo crossed the mega threshold
    MegaCombo { combo: u32 },
    /// Combo window closed
    ComboEnded,
    /// One-way slow motion kicked in
    SlowMotion,
    /// A species took the lead
    LeaderChanged(Species),
    /// Battle over
    Victory(BattleOutcome),
}

/// Result of tapping the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostResult {
    /// Nothing under the pointer
    Miss,
    Boosted { entity: usize },
    /// Hit, but the entity is on cooldown
    Denied { entity: usize },
}

/// Complete state of one battle
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: BattleConfig,
    pub metrics: ArenaMetrics,
    pub wager: Species,
    pub phase: BattlePhase,
    pub entities: Vec<Entity>,
    pub counts: SpeciesCounts,
    pub leader: Option<Species>,
    pub combo: ComboTracker,
    pub stats: BattleStats,
    pub slow_motion: bool,
    pub timers: TimerQueue,
    /// Pending events, drained by the host
    pub events: Vec<SimEvent>,
    rng: Pcg32,
}

impl SimulationState {
    /// Validate `config` and spawn a battle, seeded from the OS RNG
    pub fn new(config: BattleConfig, wager: Species, now: f64) -> Result<Self, ConfigError> {
        Self::with_seed(config, wager, now, rand::random())
    }

    /// Same as [`SimulationState::new`] with a fixed RNG seed
    pub fn with_seed(
        config: BattleConfig,
        wager: Species,
        now: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let metrics = config.metrics();
        let mut state = Self {
            config,
            metrics,
            wager,
            phase: BattlePhase::Spawning,
            entities: Vec::new(),
            counts: SpeciesCounts::default(),
            leader: None,
            combo: ComboTracker::new(),
            stats: BattleStats::default(),
            slow_motion: false,
            timers: TimerQueue::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn(now);
        Ok(state)
    }

    /// Build a running battle from hand-placed entities (used by tests and tools)
    pub fn from_entities(
        config: BattleConfig,
        wager: Species,
        entities: Vec<Entity>,
        now: f64,
    ) -> Self {
        let metrics = config.metrics();
        let mut state = Self {
            config,
            metrics,
            wager,
            phase: BattlePhase::Running,
            entities,
            counts: SpeciesCounts::default(),
            leader: None,
            combo: ComboTracker::new(),
            stats: BattleStats {
                start_time: now,
                ..Default::default()
            },
            slow_motion: false,
            timers: TimerQueue::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(0),
        };
        state.recount();
        state
    }

    /// Replace the entity set with a fresh batch and start the clock
    pub fn spawn(&mut self, now: f64) {
        self.phase = BattlePhase::Spawning;
        self.timers.reset();
        self.combo.reset();
        self.events.clear();
        self.slow_motion = false;
        self.stats = BattleStats {
            start_time: now,
            ..Default::default()
        };

        let speed = self.config.speed * self.metrics.speed_multiplier;
        let max_pos = self.metrics.max_pos();
        let total = self.config.counts.total() as usize;
        let mut entities = Vec::with_capacity(total);

        for species in Species::ALL {
            for _ in 0..self.config.counts.get(species) {
                // Overlaps are fine: the first tick resolves them as collisions
                let pos = Vec2::new(
                    self.rng.random_range(0.0..max_pos),
                    self.rng.random_range(0.0..max_pos),
                );
                let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                let vel = Vec2::from_angle(angle) * speed;
                entities.push(Entity::new(species, pos, vel));
            }
        }

        self.entities = entities;
        self.recount();
        self.phase = BattlePhase::Running;
        log::info!(
            "Spawned {} entities ({} rock, {} paper, {} scissors), speed {}",
            total,
            self.counts.get(Species::Rock),
            self.counts.get(Species::Paper),
            self.counts.get(Species::Scissors),
            self.config.speed
        );
    }

    /// Recompute per-species counts from the entity list
    pub fn recount(&mut self) {
        let mut counts = SpeciesCounts::default();
        for entity in &self.entities {
            counts.increment(entity.species);
        }
        self.counts = counts;
    }

    pub fn is_running(&self) -> bool {
        self.phase == BattlePhase::Running
    }

    pub fn winner(&self) -> Option<Species> {
        match self.phase {
            BattlePhase::Victory(species) => Some(species),
            _ => None,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase == BattlePhase::Running {
            self.phase = BattlePhase::Paused;
            return true;
        }
        false
    }

    pub fn resume(&mut self) -> bool {
        if self.phase == BattlePhase::Paused {
            self.phase = BattlePhase::Running;
            return true;
        }
        false
    }

    /// Change the configured speed and rescale every live entity to match
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        self.config.speed = speed;
        let magnitude = speed * self.metrics.speed_multiplier;
        for entity in &mut self.entities {
            if entity.vel.length() > 0.0 {
                entity.vel = with_speed(entity.vel, magnitude);
            }
        }
        Ok(())
    }

    /// Boost whatever sits under `point` (arena coordinates)
    pub fn boost_at(&mut self, point: Vec2, now: f64) -> BoostResult {
        if self.phase != BattlePhase::Running {
            return BoostResult::Miss;
        }
        match physics::hit_test(&self.entities, point, self.metrics.entity_size) {
            Some(index) => self.boost_entity(index, now),
            None => BoostResult::Miss,
        }
    }

    /// Boost one entity by index, with the tap scale animation
    pub fn boost_entity(&mut self, index: usize, now: f64) -> BoostResult {
        let boost = self.config.boost;
        let Some(entity) = self.entities.get_mut(index) else {
            return BoostResult::Miss;
        };

        if physics::apply_boost(entity, now, &boost) {
            entity.target_scale = SCALE_BOOST;
            self.timers.schedule(
                now + SCALE_ANIMATION_MS,
                TimerKind::RestoreScale { entity: index },
            );
            BoostResult::Boosted { entity: index }
        } else {
            entity.target_scale = SCALE_COOLDOWN;
            self.timers.schedule(
                now + SCALE_ANIMATION_COOLDOWN_MS,
                TimerKind::RestoreScale { entity: index },
            );
            BoostResult::Denied { entity: index }
        }
    }

    /// Fire due timers. Runs even while paused: timers are wall-clock.
    pub fn advance_timers(&mut self, now: f64) {
        for kind in self.timers.take_due(now) {
            match kind {
                TimerKind::ComboTimeout { token } => {
                    if self.combo.expire(token) {
                        self.events.push(SimEvent::ComboEnded);
                    }
                }
                TimerKind::RestoreScale { entity } => {
                    if let Some(entity) = self.entities.get_mut(entity) {
                        entity.target_scale = 1.0;
                    }
                }
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
