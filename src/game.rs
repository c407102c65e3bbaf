//! Game flow: wager → countdown → battle → reward
//!
//! Owns the running simulation plus everything that outlives it
//! (settings, progression, coin ledger, win streak) and the storage and
//! host hooks they are saved to and announced through.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{COUNTDOWN_SECS, DEFAULT_ARENA_SIZE, SPAWN_PRESETS};
use crate::error::ConfigError;
use crate::ledger::CoinLedger;
use crate::persistence::{self, KeyValueStore};
use crate::platform::PlatformHooks;
use crate::progression::{GameRecord, GameReward, Progression};
use crate::settings::Settings;
use crate::sim::{
    BattleConfig, BattleOutcome, BoostParams, BoostResult, SimEvent, SimulationState, Species,
    SpeciesCounts, tick,
};

/// Screen-level phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// Waiting for the player to pick a species
    Betting,
    /// Wager placed, battle spawns at `ends_at` (ms)
    Countdown { ends_at: f64 },
    Running,
    Paused,
    /// Battle over, results on screen
    Victory,
}

/// Top-level game session
pub struct Game<S: KeyValueStore, H: PlatformHooks> {
    pub settings: Settings,
    pub progression: Progression,
    pub ledger: CoinLedger,
    /// Consecutive won bets
    pub streak: u32,
    phase: GamePhase,
    wager: Option<Species>,
    /// Starting counts for the battle behind the countdown
    pending: Option<SpeciesCounts>,
    sim: Option<SimulationState>,
    last_outcome: Option<BattleOutcome>,
    last_reward: Option<GameReward>,
    arena_size: f32,
    storage: S,
    hooks: H,
    rng: Pcg32,
}

impl<S: KeyValueStore, H: PlatformHooks> Game<S, H> {
    /// Restore a session from storage
    pub fn load(storage: S, hooks: H) -> Self {
        Self::load_with_seed(storage, hooks, rand::random())
    }

    /// Same as [`Game::load`] with a fixed seed for presets and spawns
    pub fn load_with_seed(storage: S, hooks: H, seed: u64) -> Self {
        let settings = persistence::load_settings(&storage);
        let progression = persistence::load_progression(&storage);
        let ledger = persistence::load_ledger(&storage);
        let streak = persistence::load_streak(&storage);

        Self {
            settings,
            progression,
            ledger,
            streak,
            phase: GamePhase::Betting,
            wager: None,
            pending: None,
            sim: None,
            last_outcome: None,
            last_reward: None,
            arena_size: DEFAULT_ARENA_SIZE,
            storage,
            hooks,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn wager(&self) -> Option<Species> {
        self.wager
    }

    pub fn sim(&self) -> Option<&SimulationState> {
        self.sim.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&BattleOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_reward(&self) -> Option<&GameReward> {
        self.last_reward.as_ref()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Arena size for the next battle (the host measures its canvas)
    pub fn set_arena_size(&mut self, arena_size: f32) {
        self.arena_size = arena_size;
    }

    /// Whole seconds left on the countdown, if one is running
    pub fn countdown_remaining(&self, now: f64) -> Option<u32> {
        match self.phase {
            GamePhase::Countdown { ends_at } => {
                Some(((ends_at - now).max(0.0) / 1000.0).ceil() as u32)
            }
            _ => None,
        }
    }

    /// Bet on a species with a randomly picked equal-count preset
    pub fn place_wager(&mut self, species: Species, now: f64) -> Result<(), ConfigError> {
        let count = SPAWN_PRESETS[self.rng.random_range(0..SPAWN_PRESETS.len())];
        self.place_wager_with(species, SpeciesCounts::equal(count), now)
    }

    /// Bet on a species with explicit starting counts
    pub fn place_wager_with(
        &mut self,
        species: Species,
        counts: SpeciesCounts,
        now: f64,
    ) -> Result<(), ConfigError> {
        if !matches!(self.phase, GamePhase::Betting | GamePhase::Victory) {
            return Err(ConfigError::BattleInProgress);
        }
        self.battle_config(counts).validate()?;

        log::info!(
            "Wager on {} {} ({} rock, {} paper, {} scissors)",
            species.emoji(),
            species.as_str(),
            counts.get(Species::Rock),
            counts.get(Species::Paper),
            counts.get(Species::Scissors)
        );
        self.sim = None;
        self.wager = Some(species);
        self.pending = Some(counts);
        self.phase = GamePhase::Countdown {
            ends_at: now + COUNTDOWN_SECS as f64 * 1000.0,
        };
        self.hooks.gameplay_start();
        Ok(())
    }

    /// Battle config from the current settings
    fn battle_config(&self, counts: SpeciesCounts) -> BattleConfig {
        BattleConfig {
            counts,
            arena_size: self.arena_size,
            speed: self.settings.speed,
            max_combo_particles: self.settings.max_combo_particles(),
            boost: BoostParams::default(),
        }
    }

    /// Advance one frame. Returns the simulation events raised this frame.
    pub fn update(&mut self, now: f64) -> Vec<SimEvent> {
        if let GamePhase::Countdown { ends_at } = self.phase
            && now >= ends_at
        {
            self.start_battle(now);
        }

        let Some(sim) = self.sim.as_mut() else {
            return Vec::new();
        };
        tick(sim, now);
        let events = sim.drain_events();

        let outcome = events.iter().find_map(|e| match e {
            SimEvent::Victory(outcome) => Some(*outcome),
            _ => None,
        });
        if let Some(outcome) = outcome {
            self.finish(outcome, now);
        }
        events
    }

    fn start_battle(&mut self, now: f64) {
        let (Some(counts), Some(wager)) = (self.pending.take(), self.wager) else {
            self.phase = GamePhase::Betting;
            return;
        };
        // Settings may have changed during the countdown
        let config = self.battle_config(counts);
        match SimulationState::with_seed(config, wager, now, self.rng.random()) {
            Ok(sim) => {
                self.sim = Some(sim);
                self.phase = GamePhase::Running;
                self.hooks.gameplay_start();
            }
            Err(e) => {
                log::error!("Failed to start battle: {}", e);
                self.phase = GamePhase::Betting;
            }
        }
    }

    fn finish(&mut self, outcome: BattleOutcome, now: f64) {
        self.phase = GamePhase::Victory;
        self.hooks.gameplay_stop();

        let won = outcome.won();
        self.streak = if won { self.streak + 1 } else { 0 };
        persistence::save_streak(&mut self.storage, self.streak);

        let reward = self.progression.record_game_result(&GameRecord {
            won,
            current_streak: self.streak,
            max_combo: outcome.max_combo,
            duration_secs: outcome.duration_secs,
            collisions: outcome.total_collisions,
            speed: outcome.speed,
        });

        for grant in &reward.grants {
            self.ledger.add_grant(grant, now);
            self.hooks.coins_granted(grant);
        }
        for &def in &reward.unlocked {
            self.hooks.achievement_unlocked(def);
        }

        persistence::save_progression(&mut self.storage, &self.progression);
        persistence::save_ledger(&mut self.storage, &self.ledger);

        log::info!(
            "{} {} wins in {}s, bet {} (+{} coins, streak {})",
            outcome.winner.emoji(),
            outcome.winner.as_str(),
            outcome.duration_secs,
            if won { "won" } else { "lost" },
            reward.total(),
            self.streak
        );
        self.last_outcome = Some(outcome);
        self.last_reward = Some(reward);
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        if let Some(sim) = self.sim.as_mut()
            && sim.pause()
        {
            self.phase = GamePhase::Paused;
            self.hooks.gameplay_stop();
            return true;
        }
        false
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        if let Some(sim) = self.sim.as_mut()
            && sim.resume()
        {
            self.phase = GamePhase::Running;
            self.hooks.gameplay_start();
            return true;
        }
        false
    }

    /// Change the speed slider; applies to the live battle immediately
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        self.settings.set_speed(speed);
        persistence::save_settings(&mut self.storage, &self.settings);
        if let Some(sim) = self.sim.as_mut() {
            sim.set_speed(self.settings.speed)?;
        }
        Ok(())
    }

    /// Player tap at arena coordinates
    pub fn boost_at(&mut self, point: Vec2, now: f64) -> BoostResult {
        match self.sim.as_mut() {
            Some(sim) => sim.boost_at(point, now),
            None => BoostResult::Miss,
        }
    }

    /// Back to the betting screen, ending any countdown or battle early.
    ///
    /// The simulation and its pending timers are dropped with it.
    pub fn play_again(&mut self) -> bool {
        match self.phase {
            GamePhase::Betting => return false,
            GamePhase::Countdown { .. } | GamePhase::Running => {
                log::info!("Battle abandoned");
                self.hooks.gameplay_stop();
            }
            GamePhase::Paused | GamePhase::Victory => {}
        }
        self.sim = None;
        self.pending = None;
        self.wager = None;
        self.phase = GamePhase::Betting;
        true
    }

    /// Flip the mute preference and save it
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        persistence::save_settings(&mut self.storage, &self.settings);
        self.settings.muted
    }
}
