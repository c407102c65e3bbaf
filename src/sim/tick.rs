//! Per-frame simulation tick
//!
//! One call per display frame while the battle is running. Order matters:
//! scales, motion, collisions, boost decay, counts, slow motion, victory.

use super::combo::{ComboTracker, combo_particles};
use super::entity::Entity;
use super::physics;
use super::species::{Species, winner};
use super::state::{BattleOutcome, BattlePhase, BattleStats, SimEvent, SimulationState};
use super::timers::{TimerKind, TimerQueue};
use crate::consts::*;

/// Everything a conversion touches besides the entity itself
struct ConversionContext<'a> {
    combo: &'a mut ComboTracker,
    stats: &'a mut BattleStats,
    timers: &'a mut TimerQueue,
    events: &'a mut Vec<SimEvent>,
    entity_size: f32,
    max_combo_particles: u32,
    now: f64,
}

impl ConversionContext<'_> {
    /// Convert `entity` to `winner` if it is not already that species
    fn convert(&mut self, index: usize, entity: &mut Entity, winner: Species) {
        if entity.species == winner {
            return;
        }
        entity.species = winner;
        self.stats.total_collisions += 1;

        let at = entity.center(self.entity_size);
        self.events.push(SimEvent::Converted {
            entity: index,
            to: winner,
            at,
        });

        let step = self.combo.record(winner);
        self.timers.schedule(
            self.now + COMBO_TIMEOUT_MS,
            TimerKind::ComboTimeout { token: step.token },
        );

        if let Some(particles) = combo_particles(step.combo, self.max_combo_particles) {
            self.events.push(SimEvent::ComboBurst {
                combo: step.combo,
                particles,
                at,
            });
        }
        if step.combo == MEGA_COMBO_THRESHOLD {
            log::debug!("Mega combo x{} for {}", step.combo, winner.as_str());
            self.events.push(SimEvent::MegaCombo { combo: step.combo });
        }
    }
}

/// Advance the battle by one frame at wall-clock time `now` (ms)
pub fn tick(state: &mut SimulationState, now: f64) {
    // Wall-clock timers fire whether or not we tick
    state.advance_timers(now);

    if state.phase != BattlePhase::Running {
        return;
    }

    let arena_size = state.metrics.arena_size;
    let entity_size = state.metrics.entity_size;

    for entity in state.entities.iter_mut() {
        physics::interpolate_scale(entity);
    }

    for entity in state.entities.iter_mut() {
        physics::integrate(entity, arena_size, entity_size);
    }

    resolve_collisions(state, now);

    let boost = state.config.boost;
    for entity in state.entities.iter_mut() {
        physics::expire_boost(entity, now, &boost);
    }

    state.recount();
    let leader = state.counts.leader();
    if leader.is_some() && leader != state.leader {
        state.leader = leader;
        if let Some(species) = leader {
            state.events.push(SimEvent::LeaderChanged(species));
        }
    }

    check_slow_motion(state);
    check_victory(state, now);
}

/// All unordered pairs, each converting whichever side lost
fn resolve_collisions(state: &mut SimulationState, now: f64) {
    let entity_size = state.metrics.entity_size;
    let mut ctx = ConversionContext {
        combo: &mut state.combo,
        stats: &mut state.stats,
        timers: &mut state.timers,
        events: &mut state.events,
        entity_size,
        max_combo_particles: state.config.max_combo_particles,
        now,
    };

    let entities = &mut state.entities;
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let (head, tail) = entities.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if !physics::collides(a, b, entity_size) {
                continue;
            }

            let w = winner(a.species, b.species);
            ctx.convert(i, a, w);
            ctx.convert(j, b, w);
        }
    }
}

/// Two species left and the smaller one is nearly gone: slow everything down once
fn check_slow_motion(state: &mut SimulationState) {
    if state.slow_motion || state.counts.surviving_count() != 2 {
        return;
    }
    let losing = state
        .counts
        .surviving()
        .any(|s| state.counts.get(s) < SLOW_MOTION_THRESHOLD);
    if !losing {
        return;
    }

    state.slow_motion = true;
    for entity in state.entities.iter_mut() {
        entity.vel *= SLOW_MOTION_FACTOR;
    }
    log::debug!("Slow motion engaged: {:?}", state.counts);
    state.events.push(SimEvent::SlowMotion);
}

fn check_victory(state: &mut SimulationState, now: f64) {
    if state.entities.is_empty() {
        return;
    }
    let Some(winner) = state.counts.sole_survivor() else {
        return;
    };

    let elapsed_secs = ((now - state.stats.start_time) / 1000.0).max(0.0);
    state.stats.duration = elapsed_secs.round() as u32;
    state.phase = BattlePhase::Victory(winner);

    let outcome = BattleOutcome {
        winner,
        wager: state.wager,
        max_combo: state.combo.max_combo(),
        duration_secs: state.stats.duration,
        total_collisions: state.stats.total_collisions,
        speed: state.config.speed,
    };
    log::info!(
        "{} wins after {}s ({} conversions, max combo {})",
        winner.as_str(),
        outcome.duration_secs,
        outcome.total_collisions,
        outcome.max_combo
    );
    state.events.push(SimEvent::Victory(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BattleConfig, SpeciesCounts};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn small_config() -> BattleConfig {
        BattleConfig {
            counts: SpeciesCounts::equal(1),
            arena_size: 600.0,
            ..Default::default()
        }
    }

    fn entity(species: Species, x: f32, y: f32, vx: f32, vy: f32) -> Entity {
        Entity::new(species, Vec2::new(x, y), Vec2::new(vx, vy))
    }

    #[test]
    fn test_rock_beats_lone_scissors() {
        let entities = vec![
            entity(Species::Rock, 10.0, 200.0, 2.0, 0.0),
            entity(Species::Scissors, 400.0, 200.0, -2.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Rock, entities, 0.0);

        let mut now = 0.0;
        for _ in 0..1000 {
            now += FRAME_MS;
            tick(&mut state, now);
            if !state.is_running() {
                break;
            }
        }

        assert_eq!(state.phase, BattlePhase::Victory(Species::Rock));
        assert_eq!(state.counts, SpeciesCounts::new(2, 0, 0));
        assert_eq!(state.stats.total_collisions, 1);

        let events = state.drain_events();
        let outcome = events.iter().find_map(|e| match e {
            SimEvent::Victory(outcome) => Some(*outcome),
            _ => None,
        });
        let outcome = outcome.expect("victory event");
        assert!(outcome.won());
        assert_eq!(outcome.total_collisions, 1);
    }

    #[test]
    fn test_same_species_collision_is_noop() {
        let entities = vec![
            entity(Species::Rock, 100.0, 100.0, 0.0, 0.0),
            entity(Species::Rock, 105.0, 100.0, 0.0, 0.0),
            entity(Species::Paper, 400.0, 400.0, 0.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Rock, entities, 0.0);
        tick(&mut state, FRAME_MS);

        assert_eq!(state.stats.total_collisions, 0);
        assert_eq!(state.combo.current_combo(), 0);
        assert!(state.is_running());
    }

    #[test]
    fn test_both_sides_checked_per_pair() {
        // Paper overlapping rock: only the rock converts
        let entities = vec![
            entity(Species::Paper, 100.0, 100.0, 0.0, 0.0),
            entity(Species::Rock, 110.0, 100.0, 0.0, 0.0),
            entity(Species::Scissors, 400.0, 400.0, 0.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Paper, entities, 0.0);
        tick(&mut state, FRAME_MS);

        assert_eq!(state.entities[0].species, Species::Paper);
        assert_eq!(state.entities[1].species, Species::Paper);
        assert_eq!(state.stats.total_collisions, 1);
        assert_eq!(state.combo.current_combo(), 1);
        assert_eq!(state.combo.last_conversion(), Some(Species::Paper));
    }

    #[test]
    fn test_combo_times_out_between_ticks() {
        let entities = vec![
            entity(Species::Paper, 100.0, 100.0, 0.0, 0.0),
            entity(Species::Rock, 110.0, 100.0, 0.0, 0.0),
            entity(Species::Rock, 300.0, 300.0, 0.0, 0.0),
            entity(Species::Scissors, 500.0, 500.0, 0.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Paper, entities, 0.0);
        tick(&mut state, 100.0);
        assert_eq!(state.combo.current_combo(), 1);

        // Paused: no ticks, but the wall-clock timer still fires
        state.pause();
        state.advance_timers(100.0 + COMBO_TIMEOUT_MS);
        assert_eq!(state.combo.current_combo(), 0);
        assert_eq!(state.combo.max_combo(), 1);
        assert!(state.drain_events().contains(&SimEvent::ComboEnded));
    }

    #[test]
    fn test_slow_motion_triggers_once() {
        let entities = vec![
            entity(Species::Rock, 10.0, 10.0, 1.0, 0.0),
            entity(Species::Paper, 200.0, 200.0, 1.0, 0.0),
            entity(Species::Paper, 300.0, 300.0, 1.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Paper, entities, 0.0);
        tick(&mut state, FRAME_MS);
        assert!(state.slow_motion);
        assert!((state.entities[1].vel.x - SLOW_MOTION_FACTOR).abs() < 1e-6);

        tick(&mut state, 2.0 * FRAME_MS);
        assert!((state.entities[1].vel.x - SLOW_MOTION_FACTOR).abs() < 1e-6);
        let slow_events = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == SimEvent::SlowMotion)
            .count();
        assert_eq!(slow_events, 1);
    }

    #[test]
    fn test_population_conserved_until_victory() {
        let config = BattleConfig {
            counts: SpeciesCounts::equal(15),
            ..Default::default()
        };
        let mut state = SimulationState::with_seed(config, Species::Rock, 0.0, 2024).unwrap();
        let total = state.entities.len() as u32;
        let max = state.metrics.max_pos();

        let mut now = 0.0;
        for _ in 0..60_000 {
            now += FRAME_MS;
            tick(&mut state, now);
            assert_eq!(state.counts.total(), total);
            for e in &state.entities {
                assert!(e.pos.x >= 0.0 && e.pos.x <= max);
                assert!(e.pos.y >= 0.0 && e.pos.y <= max);
            }
            if !state.is_running() {
                break;
            }
        }
        assert!(state.winner().is_some(), "battle should finish");
    }

    #[test]
    fn test_paused_battle_does_not_move() {
        let entities = vec![
            entity(Species::Rock, 10.0, 10.0, 1.0, 1.0),
            entity(Species::Paper, 300.0, 300.0, 1.0, 1.0),
            entity(Species::Scissors, 500.0, 100.0, 1.0, 1.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Rock, entities, 0.0);
        state.pause();
        let before = state.entities.clone();
        tick(&mut state, FRAME_MS);
        assert_eq!(state.entities, before);
    }

    #[test]
    fn test_victory_duration_rounds_seconds() {
        let entities = vec![
            entity(Species::Scissors, 100.0, 100.0, 0.0, 0.0),
            entity(Species::Paper, 105.0, 100.0, 0.0, 0.0),
        ];
        let mut state =
            SimulationState::from_entities(small_config(), Species::Rock, entities, 1000.0);
        tick(&mut state, 3600.0);
        assert_eq!(state.phase, BattlePhase::Victory(Species::Scissors));
        assert_eq!(state.stats.duration, 3);
    }
}
