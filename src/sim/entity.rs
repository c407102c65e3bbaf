//! Arena entities

use glam::Vec2;

use super::species::Species;
use crate::consts::SCALE_SPEED;

/// Timed speed boost granted by tapping an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostState {
    pub is_boosted: bool,
    /// Wall-clock time (ms) the boost expires
    pub boost_end_time: f64,
    pub boost_multiplier: f32,
    /// Wall-clock time (ms) of the last accepted boost
    pub last_click_time: f64,
}

impl Default for BoostState {
    fn default() -> Self {
        Self {
            is_boosted: false,
            boost_end_time: 0.0,
            boost_multiplier: 1.0,
            // Far in the past so the first tap is never on cooldown
            last_click_time: f64::NEG_INFINITY,
        }
    }
}

/// A single fighter
///
/// `pos` is the top-left corner of the entity's box; the box is
/// `entity_size` wide, so the centre sits at `pos + entity_size / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub species: Species,
    pub scale: f32,
    pub target_scale: f32,
    pub scale_speed: f32,
    pub boost: BoostState,
}

impl Entity {
    pub fn new(species: Species, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            species,
            scale: 1.0,
            target_scale: 1.0,
            scale_speed: SCALE_SPEED,
            boost: BoostState::default(),
        }
    }

    /// Centre of the entity's box
    pub fn center(&self, entity_size: f32) -> Vec2 {
        self.pos + Vec2::splat(entity_size / 2.0)
    }

    /// Collision radius at the current visual scale (never negative)
    pub fn radius(&self, entity_size: f32) -> f32 {
        (entity_size * self.scale / 2.0).max(0.0)
    }
}
