//! Motion, wall bounces, collisions and boosts
//!
//! Motion is per tick (`pos += vel`), with no delta-time scaling: the host
//! calls the loop once per display frame.

use glam::Vec2;

use super::entity::Entity;
use crate::consts::*;
use crate::scale_speed;

/// Boost tuning, split out so tests can shorten the timings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostParams {
    pub click_cooldown: f64,
    pub boost_duration: f64,
    pub boost_speed_mult: f32,
    pub boost_revert_mult: f32,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            click_cooldown: CLICK_COOLDOWN_MS,
            boost_duration: BOOST_DURATION_MS,
            boost_speed_mult: BOOST_SPEED_MULT,
            boost_revert_mult: BOOST_REVERT_MULT,
        }
    }
}

/// Ease `scale` toward `target_scale`, snapping once close enough
pub fn interpolate_scale(entity: &mut Entity) {
    if entity.scale == entity.target_scale {
        return;
    }
    entity.scale += (entity.target_scale - entity.scale) * entity.scale_speed;
    if (entity.scale - entity.target_scale).abs() < SCALE_EPSILON {
        entity.scale = entity.target_scale;
    }
}

/// Advance one tick and reflect off the arena walls
pub fn integrate(entity: &mut Entity, arena_size: f32, entity_size: f32) {
    entity.pos += entity.vel;
    bounce_off_walls(entity, arena_size, entity_size);
}

/// Reflect each axis independently and clamp back into the arena
pub fn bounce_off_walls(entity: &mut Entity, arena_size: f32, entity_size: f32) {
    let max = (arena_size - entity_size).max(0.0);

    if entity.pos.x <= 0.0 || entity.pos.x >= max {
        entity.vel.x = -entity.vel.x;
        entity.pos.x = entity.pos.x.clamp(0.0, max);
    }
    if entity.pos.y <= 0.0 || entity.pos.y >= max {
        entity.vel.y = -entity.vel.y;
        entity.pos.y = entity.pos.y.clamp(0.0, max);
    }
}

/// Two entities touch when their centres are closer than the sum of radii
pub fn collides(a: &Entity, b: &Entity, entity_size: f32) -> bool {
    // Both boxes share the same size, so corner distance == centre distance
    let distance = a.pos.distance(b.pos);
    distance < a.radius(entity_size) + b.radius(entity_size)
}

/// Try to boost an entity. Returns false (and changes nothing) on cooldown.
pub fn apply_boost(entity: &mut Entity, now: f64, params: &BoostParams) -> bool {
    if now - entity.boost.last_click_time < params.click_cooldown {
        return false;
    }

    entity.boost.is_boosted = true;
    entity.boost.boost_end_time = now + params.boost_duration;
    entity.boost.boost_multiplier = params.boost_speed_mult;
    entity.boost.last_click_time = now;
    entity.vel = scale_speed(entity.vel, params.boost_speed_mult);

    true
}

/// Revert an expired boost. Returns true if the boost ended this call.
pub fn expire_boost(entity: &mut Entity, now: f64, params: &BoostParams) -> bool {
    if !entity.boost.is_boosted || now < entity.boost.boost_end_time {
        return false;
    }

    entity.boost.is_boosted = false;
    entity.boost.boost_multiplier = 1.0;
    entity.vel = scale_speed(entity.vel, params.boost_revert_mult);

    true
}

/// Index of the first entity under `point` (arena coordinates)
pub fn hit_test(entities: &[Entity], point: Vec2, entity_size: f32) -> Option<usize> {
    entities
        .iter()
        .position(|e| e.center(entity_size).distance(point) < e.radius(entity_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Species;
    use proptest::prelude::*;

    const SIZE: f32 = 32.0;

    fn rock_at(x: f32, y: f32) -> Entity {
        Entity::new(Species::Rock, Vec2::new(x, y), Vec2::ZERO)
    }

    #[test]
    fn test_collision_uses_sum_of_radii() {
        let a = rock_at(0.0, 0.0);
        // 20 apart: closer than r1 + r2 = 32, farther than a single radius
        let b = rock_at(20.0, 0.0);
        assert!(collides(&a, &b, SIZE));

        let c = rock_at(32.0, 0.0);
        assert!(!collides(&a, &c, SIZE));
    }

    #[test]
    fn test_collision_scales_with_entity_scale() {
        let mut a = rock_at(0.0, 0.0);
        let b = rock_at(34.0, 0.0);
        assert!(!collides(&a, &b, SIZE));
        a.scale = 1.2;
        // r1 = 19.2, r2 = 16
        assert!(collides(&a, &b, SIZE));
    }

    #[test]
    fn test_bounce_reflects_and_clamps() {
        let mut e = rock_at(98.0, 50.0);
        e.vel = Vec2::new(5.0, -1.0);
        integrate(&mut e, 132.0, SIZE);
        assert_eq!(e.pos.x, 100.0);
        assert_eq!(e.vel.x, -5.0);
        assert_eq!(e.vel.y, -1.0);
    }

    #[test]
    fn test_corner_bounce_reflects_both_axes() {
        let mut e = rock_at(1.0, 1.0);
        e.vel = Vec2::new(-3.0, -3.0);
        integrate(&mut e, 200.0, SIZE);
        assert_eq!(e.pos, Vec2::ZERO);
        assert_eq!(e.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_scale_interpolation_snaps() {
        let mut e = rock_at(0.0, 0.0);
        e.target_scale = 1.2;
        for _ in 0..100 {
            interpolate_scale(&mut e);
        }
        assert_eq!(e.scale, 1.2);
    }

    #[test]
    fn test_boost_cooldown() {
        let params = BoostParams::default();
        let mut e = rock_at(10.0, 10.0);
        e.vel = Vec2::new(2.0, 0.0);

        assert!(apply_boost(&mut e, 1000.0, &params));
        assert!(e.boost.is_boosted);
        assert!((e.vel.length() - 3.6).abs() < 1e-4);

        // Still cooling down: nothing changes
        let before = e.clone();
        assert!(!apply_boost(&mut e, 2000.0, &params));
        assert_eq!(e, before);

        assert!(apply_boost(&mut e, 4000.0, &params));
    }

    #[test]
    fn test_boost_expiry_restores_speed() {
        let params = BoostParams::default();
        let mut e = rock_at(10.0, 10.0);
        e.vel = Vec2::new(0.0, -2.0);
        apply_boost(&mut e, 0.0, &params);

        assert!(!expire_boost(&mut e, 1999.0, &params));
        assert!(expire_boost(&mut e, 2000.0, &params));
        assert!(!e.boost.is_boosted);
        assert_eq!(e.boost.boost_multiplier, 1.0);
        assert!((e.vel.length() - 2.0).abs() < 1e-4);
        assert!(e.vel.y < 0.0);
    }

    #[test]
    fn test_hit_test_uses_center() {
        let entities = vec![rock_at(0.0, 0.0), rock_at(100.0, 100.0)];
        assert_eq!(hit_test(&entities, Vec2::new(116.0, 116.0), SIZE), Some(1));
        assert_eq!(hit_test(&entities, Vec2::new(60.0, 60.0), SIZE), None);
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in 0.0f32..500.0, ay in 0.0f32..500.0, a_scale in 0.5f32..1.5,
            bx in 0.0f32..500.0, by in 0.0f32..500.0, b_scale in 0.5f32..1.5,
        ) {
            let mut a = rock_at(ax, ay);
            a.scale = a_scale;
            let mut b = rock_at(bx, by);
            b.scale = b_scale;
            prop_assert_eq!(collides(&a, &b, SIZE), collides(&b, &a, SIZE));
        }

        #[test]
        fn bounce_keeps_entity_inside(
            x in 0.0f32..568.0, y in 0.0f32..568.0,
            vx in -20.0f32..20.0, vy in -20.0f32..20.0,
            ticks in 1usize..400,
        ) {
            let mut e = rock_at(x, y);
            e.vel = Vec2::new(vx, vy);
            for _ in 0..ticks {
                integrate(&mut e, 600.0, SIZE);
                prop_assert!(e.pos.x >= 0.0 && e.pos.x <= 600.0 - SIZE);
                prop_assert!(e.pos.y >= 0.0 && e.pos.y <= 600.0 - SIZE);
            }
        }
    }
}
