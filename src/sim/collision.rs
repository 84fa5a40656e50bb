//! Collision detection and resolution
//!
//! Pure overlap tests up top, then the resolution pass that applies their
//! consequences. Resolution order within a tick:
//! 1. health pickups (heal, then retire finished banners)
//! 2. timed pickups, then expiry of the active effect
//! 3. shots against asteroids
//! 4. asteroid destruction (shot down or reached the mothership)
//! 5. culling of spent shots and stray power-ups

use glam::IVec2;

use super::powerup::{HealthPowerUp, TimedKind};
use super::state::{Asteroid, DestructionMethod, Explosion, GameEvent, GameState, Shot};
use crate::consts::TIMED_EFFECT_DURATION;

/// Strict axis-aligned overlap; touching edges do not count
pub fn rects_overlap(a_pos: IVec2, a_size: IVec2, b_pos: IVec2, b_size: IVec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}

/// Broad phase: the bolt's column and vertical span touch the asteroid's box
pub fn shot_in_bounds(shot: &Shot, asteroid: &Asteroid) -> bool {
    let IVec2 { x, y } = asteroid.pos;
    (x..=x + asteroid.size).contains(&shot.x)
        && shot.end_y <= y + asteroid.size
        && shot.start_y >= y
}

/// Broad phase, then the bolt tip against the asteroid's circle
pub fn shot_hits_asteroid(shot: &Shot, asteroid: &Asteroid) -> bool {
    if !shot_in_bounds(shot, asteroid) {
        return false;
    }
    let tip = IVec2::new(shot.x, shot.end_y);
    let radius = asteroid.radius();
    tip.distance_squared(asteroid.center()) < radius * radius
}

/// Why an asteroid has to leave this tick, if it does
pub fn destruction_check(asteroid: &Asteroid, mothership_y: i32) -> Option<DestructionMethod> {
    if asteroid.is_depleted() {
        Some(DestructionMethod::DestroyedByDamage)
    } else if asteroid.leading_edge() > mothership_y {
        Some(DestructionMethod::ReachedMothership)
    } else {
        None
    }
}

pub(crate) fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) {
    collect_health_power_ups(state, events);
    update_timed_power_ups(state, events);
    resolve_shots(state);
    resolve_asteroids(state, events);
    cull_shots(state);
    cull_stray_power_ups(state);
}

fn collect_health_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        tick,
        ship,
        mothership,
        registry,
        ..
    } = state;

    for heal in registry.health_power_ups_mut().iter_mut() {
        if heal.is_collected() || !rects_overlap(ship.pos, ship.size(), heal.pos, heal.size()) {
            continue;
        }
        if heal.collect() {
            let amount = mothership.heal(heal.heal_amount);
            log::debug!("Tick {tick}: health power-up {} restored {amount}", heal.id);
            events.push(GameEvent::HealthRestored { amount });
        }
    }

    let finished = registry
        .health_power_ups()
        .ids_where(HealthPowerUp::display_finished);
    registry.health_power_ups_mut().remove(&finished);
}

fn update_timed_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        tick,
        ship,
        registry,
        effect,
        ..
    } = state;
    let tick = *tick;

    for power_up in registry.timed_power_ups().iter() {
        if !rects_overlap(ship.pos, ship.size(), power_up.pos, power_up.size()) {
            continue;
        }
        if effect.activate(power_up.id, power_up.kind, tick) {
            log::debug!("Tick {tick}: {} activated", power_up.kind.as_str());
            events.push(GameEvent::EffectActivated {
                kind: power_up.kind,
            });
        }
    }

    if let Some(expired) = effect.expire_if_due(tick, TIMED_EFFECT_DURATION) {
        registry
            .timed_power_ups_mut()
            .remove(&[expired.power_up_id]);
        log::debug!("Tick {tick}: {} expired", expired.kind.as_str());
        events.push(GameEvent::EffectExpired { kind: expired.kind });
    }
}

/// Each live shot damages at most one asteroid, the earliest spawned it hits
fn resolve_shots(state: &mut GameState) {
    let insta_kill = state.effect.is_active(TimedKind::InstaKill);
    let (shots, asteroids) = state.registry.shots_and_asteroids_mut();

    for shot in shots.iter_mut() {
        if shot.is_hit() {
            continue;
        }
        // Depleted asteroids are already doomed and stop absorbing fire
        let target = asteroids
            .iter_mut()
            .find(|asteroid| !asteroid.is_depleted() && shot_hits_asteroid(shot, asteroid));
        if let Some(asteroid) = target {
            shot.mark_hit();
            asteroid.apply_hit(shot.damage, insta_kill);
        }
    }
}

fn resolve_asteroids(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let double_xp = state.effect.is_active(TimedKind::DoubleXp);
    let GameState {
        tick,
        mothership,
        score,
        registry,
        ..
    } = state;
    let mothership_y = mothership.y;

    let doomed = registry
        .asteroids()
        .ids_where(|asteroid| destruction_check(asteroid, mothership_y).is_some());
    let removed = registry.asteroids_mut().remove(&doomed);

    for mut asteroid in removed {
        let Some(method) = destruction_check(&asteroid, mothership_y) else {
            continue;
        };
        asteroid.mark_destroyed(method);

        let score_delta = match method {
            DestructionMethod::DestroyedByDamage => score.add_kill(asteroid.size, double_xp),
            DestructionMethod::ReachedMothership => {
                mothership.take_damage(asteroid.damage);
                log::debug!(
                    "Tick {tick}: asteroid {} hit the mothership for {} ({} left)",
                    asteroid.id,
                    asteroid.damage,
                    mothership.health()
                );
                0
            }
        };

        let id = registry.next_entity_id();
        registry
            .explosions_mut()
            .insert(Explosion::new(id, &asteroid, method, score_delta));
        events.push(GameEvent::Explosion {
            asteroid_id: asteroid.id,
            pos: asteroid.pos,
            method,
            score_delta,
        });
    }
}

fn cull_shots(state: &mut GameState) {
    let spent = state
        .registry
        .shots()
        .ids_where(|shot| shot.is_hit() || shot.is_offscreen());
    state.registry.shots_mut().remove(&spent);
}

/// Uncollected power-ups that fell past the bottom of the field
fn cull_stray_power_ups(state: &mut GameState) {
    let GameState {
        settings,
        registry,
        effect,
        ..
    } = state;
    let floor = settings.height;

    let missed = registry
        .health_power_ups()
        .ids_where(|heal| !heal.is_collected() && heal.pos.y > floor);
    registry.health_power_ups_mut().remove(&missed);

    let missed = registry
        .timed_power_ups()
        .ids_where(|power_up| !effect.holds(power_up.id) && power_up.pos.y > floor);
    registry.timed_power_ups_mut().remove(&missed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::powerup::TimedPowerUp;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Settings {
            seed: Some(7),
            ..Default::default()
        })
        .unwrap();
        state.start();
        state
    }

    fn add_asteroid(state: &mut GameState, size: i32, x: i32, y: i32) -> u32 {
        let id = state.registry.next_entity_id();
        let mut asteroid = Asteroid::new(id, size, x, 1, 0);
        asteroid.pos.y = y;
        assert!(state.registry.insert_asteroid(asteroid));
        id
    }

    /// Shot whose tip sits at `tip_y`
    fn add_shot(state: &mut GameState, x: i32, tip_y: i32) -> u32 {
        let id = state.registry.next_entity_id();
        let shot = Shot::new(id, IVec2::new(x, tip_y + SHOT_LENGTH));
        state.registry.shots_mut().insert(shot);
        id
    }

    fn add_timed(state: &mut GameState, kind: TimedKind, x: i32, y: i32) -> u32 {
        let id = state.registry.next_entity_id();
        let mut power_up = TimedPowerUp::new(id, kind, x);
        power_up.pos.y = y;
        state.registry.timed_power_ups_mut().insert(power_up);
        id
    }

    fn resolve_once(state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve(state, &mut events);
        events
    }

    #[test]
    fn test_rects_overlap_is_strict() {
        let size = IVec2::splat(10);
        assert!(rects_overlap(IVec2::ZERO, size, IVec2::new(5, 5), size));
        assert!(!rects_overlap(IVec2::ZERO, size, IVec2::new(10, 0), size));
        assert!(!rects_overlap(IVec2::ZERO, size, IVec2::new(0, 10), size));
    }

    #[test]
    fn test_corner_of_bounding_box_misses() {
        let mut asteroid = Asteroid::new(1, 50, 100, 1, 0);
        asteroid.pos.y = 100;
        let corner = Shot::new(2, IVec2::new(101, 102 + SHOT_LENGTH));
        assert!(shot_in_bounds(&corner, &asteroid));
        assert!(!shot_hits_asteroid(&corner, &asteroid));

        let centre = Shot::new(3, IVec2::new(125, 130 + SHOT_LENGTH));
        assert!(shot_hits_asteroid(&centre, &asteroid));
    }

    #[test]
    fn test_five_hits_destroy_small_asteroid() {
        let mut state = playing_state();
        let id = add_asteroid(&mut state, 50, 100, 100);

        for _ in 0..2 {
            add_shot(&mut state, 125, 130);
        }
        resolve_once(&mut state);
        let asteroid = state.registry.asteroids().get(id).unwrap();
        assert_eq!(asteroid.health(), 60);
        assert!(state.registry.shots().is_empty());

        for _ in 0..3 {
            add_shot(&mut state, 125, 130);
        }
        let events = resolve_once(&mut state);
        assert!(state.registry.asteroids().get(id).is_none());
        assert_eq!(state.score.value(), 50);
        assert_eq!(state.mothership.health(), MOTHERSHIP_HEALTH);

        let explosion = state.registry.explosions().iter().next().unwrap();
        assert_eq!(explosion.method, DestructionMethod::DestroyedByDamage);
        assert_eq!(explosion.score_delta, 50);
        assert!(events.contains(&GameEvent::Explosion {
            asteroid_id: id,
            pos: IVec2::new(100, 100),
            method: DestructionMethod::DestroyedByDamage,
            score_delta: 50,
        }));
    }

    #[test]
    fn test_insta_kill_one_shot() {
        let mut state = playing_state();
        state.effect.activate(999, TimedKind::InstaKill, 0);
        let id = add_asteroid(&mut state, 100, 100, 100);
        add_shot(&mut state, 150, 160);

        resolve_once(&mut state);
        assert!(state.registry.asteroids().get(id).is_none());
        assert_eq!(state.score.value(), 100);
    }

    #[test]
    fn test_double_xp_doubles_kill_score() {
        let mut state = playing_state();
        state.effect.activate(999, TimedKind::DoubleXp, 0);
        add_asteroid(&mut state, 60, 100, 100);
        for _ in 0..6 {
            add_shot(&mut state, 130, 140);
        }
        resolve_once(&mut state);
        assert_eq!(state.score.value(), 120);
    }

    #[test]
    fn test_asteroid_reaches_mothership() {
        let mut state = playing_state();
        let id = add_asteroid(&mut state, 50, 100, 601);

        let events = resolve_once(&mut state);
        assert!(state.registry.asteroids().get(id).is_none());
        assert_eq!(state.mothership.health(), 900);
        assert_eq!(state.score.value(), 0);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::Explosion {
                method: DestructionMethod::ReachedMothership,
                score_delta: 0,
                ..
            }
        )));
    }

    #[test]
    fn test_leading_edge_on_the_line_is_safe() {
        let mut state = playing_state();
        let id = add_asteroid(&mut state, 50, 100, 600);
        resolve_once(&mut state);
        assert!(state.registry.asteroids().get(id).is_some());
        assert_eq!(state.mothership.health(), MOTHERSHIP_HEALTH);
    }

    #[test]
    fn test_shot_spent_on_first_asteroid_only() {
        let mut state = playing_state();
        let first = add_asteroid(&mut state, 50, 100, 100);
        let second = add_asteroid(&mut state, 50, 100, 100);
        add_shot(&mut state, 125, 130);

        resolve_once(&mut state);
        let first = state.registry.asteroids().get(first).unwrap();
        let second = state.registry.asteroids().get(second).unwrap();
        assert_eq!(first.health(), 80);
        assert_eq!(second.health(), 100);
    }

    #[test]
    fn test_shot_and_mothership_same_tick() {
        // Depleted and past the line: counts as shot down, no mothership damage
        let mut state = playing_state();
        state.effect.activate(999, TimedKind::InstaKill, 0);
        add_asteroid(&mut state, 50, 100, 601);
        add_shot(&mut state, 125, 630);

        resolve_once(&mut state);
        assert_eq!(state.mothership.health(), MOTHERSHIP_HEALTH);
        assert_eq!(state.score.value(), 50);
    }

    #[test]
    fn test_heal_is_capped_and_banner_retires() {
        let mut state = playing_state();
        state.mothership.take_damage(100);
        let id = state.registry.next_entity_id();
        let mut heal = HealthPowerUp::new(id, 250);
        heal.pos.y = 560;
        state.registry.health_power_ups_mut().insert(heal);

        let events = resolve_once(&mut state);
        assert_eq!(state.mothership.health(), MOTHERSHIP_HEALTH);
        assert!(events.contains(&GameEvent::HealthRestored { amount: 100 }));
        assert!(state.registry.health_power_ups().get(id).unwrap().is_collected());

        // Second overlap heals nothing
        state.mothership.take_damage(10);
        resolve_once(&mut state);
        assert_eq!(state.mothership.health(), MOTHERSHIP_HEALTH - 10);

        for _ in 0..POWER_UP_DISPLAY_TICKS {
            state.registry.health_power_ups_mut().iter_mut().for_each(HealthPowerUp::advance);
        }
        resolve_once(&mut state);
        assert!(state.registry.health_power_ups().is_empty());
    }

    #[test]
    fn test_only_one_timed_effect_at_a_time() {
        let mut state = playing_state();
        let first = add_timed(&mut state, TimedKind::DoubleXp, 250, 560);
        let second = add_timed(&mut state, TimedKind::InstaKill, 260, 560);

        let events = resolve_once(&mut state);
        assert!(state.effect.holds(first));
        assert!(!state.effect.is_active(TimedKind::InstaKill));
        assert_eq!(
            events,
            vec![GameEvent::EffectActivated {
                kind: TimedKind::DoubleXp
            }]
        );

        state.tick = TIMED_EFFECT_DURATION + 1;
        let events = resolve_once(&mut state);
        assert!(events.contains(&GameEvent::EffectExpired {
            kind: TimedKind::DoubleXp
        }));
        assert!(state.registry.timed_power_ups().get(first).is_none());
        assert!(!state.effect.is_any_active());

        // Slot is free again on the next pass
        resolve_once(&mut state);
        assert!(state.effect.holds(second));
    }

    #[test]
    fn test_effect_lasts_full_duration() {
        let mut state = playing_state();
        add_timed(&mut state, TimedKind::InstaKill, 250, 560);
        state.tick = 10;
        resolve_once(&mut state);

        state.tick = 10 + TIMED_EFFECT_DURATION;
        resolve_once(&mut state);
        assert!(state.effect.is_active(TimedKind::InstaKill));

        state.tick += 1;
        resolve_once(&mut state);
        assert!(!state.effect.is_any_active());
    }

    #[test]
    fn test_missed_power_ups_are_culled() {
        let mut state = playing_state();
        let floor = state.settings.height;
        let id = state.registry.next_entity_id();
        let mut heal = HealthPowerUp::new(id, 30);
        heal.pos.y = floor + 1;
        state.registry.health_power_ups_mut().insert(heal);
        add_timed(&mut state, TimedKind::DoubleXp, 30, floor + 1);
        add_timed(&mut state, TimedKind::DoubleXp, 30, floor);

        resolve_once(&mut state);
        assert!(state.registry.health_power_ups().is_empty());
        assert_eq!(state.registry.timed_power_ups().len(), 1);
    }

    #[test]
    fn test_offscreen_shots_are_culled() {
        let mut state = playing_state();
        let id = add_shot(&mut state, 30, -SHOT_LENGTH - 1);
        resolve_once(&mut state);
        assert!(state.registry.shots().get(id).is_none());
    }
}
