//! Movement phase
//!
//! Asteroids step on even ticks only. Explosion frames step every
//! `EXPLOSION_FRAME_TICKS` ticks and finished explosions leave here.

use super::state::{Explosion, GameState};
use crate::consts::*;

pub(crate) fn advance(state: &mut GameState) {
    let tick = state.tick;
    let GameState {
        registry, effect, ..
    } = state;

    for shot in registry.shots_mut().iter_mut() {
        shot.advance();
    }

    if tick.is_multiple_of(ASTEROID_MOVE_INTERVAL) {
        for asteroid in registry.asteroids_mut().iter_mut() {
            asteroid.advance();
        }
    }

    for heal in registry.health_power_ups_mut().iter_mut() {
        heal.advance();
    }

    for power_up in registry.timed_power_ups_mut().iter_mut() {
        if effect.holds(power_up.id) {
            // Parked while active; only the banner clock runs
            power_up.display_ticks = (power_up.display_ticks + 1).min(POWER_UP_DISPLAY_TICKS);
        } else {
            power_up.advance();
        }
    }

    if tick.is_multiple_of(EXPLOSION_FRAME_TICKS) {
        for explosion in registry.explosions_mut().iter_mut() {
            explosion.advance_frame();
        }
    }
    let finished = registry.explosions().ids_where(Explosion::is_finished);
    registry.explosions_mut().remove(&finished);
}
