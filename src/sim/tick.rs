//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::state::{GameEvent, GamePhase, GameState, Steer};
use super::{collision, movement, spawner};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left/right intent from the keyboard
    pub steer: Steer,
    /// Demo mode - the ship steers itself and `steer` is ignored
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    // Title screen and game over wait on start/restart
    if state.phase != GamePhase::Playing {
        return Vec::new();
    }

    let mut events = Vec::new();

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer
    };
    let width = state.settings.width;
    state.ship.steer(steer, width);

    spawner::run(state, &mut events);
    movement::advance(state);
    collision::resolve(state, &mut events);

    state.score.add_interval(state.tick);
    state.tick += 1;

    if state.mothership.is_destroyed() {
        state.phase = GamePhase::GameOver;
        let final_score = state.score.value();
        log::info!(
            "Mothership destroyed after {} ticks, final score {final_score}",
            state.tick
        );
        events.push(GameEvent::GameOver {
            final_score,
            ticks: state.tick,
        });
    }

    events
}

/// Demo steering: grab the lowest falling power-up, otherwise line up
/// under the asteroid closest to the mothership
fn autopilot_steer(state: &GameState) -> Steer {
    let ship = &state.ship;
    let registry = &state.registry;
    let ship_center = ship.pos.x + ship.width / 2;
    let ship_bottom = ship.pos.y + ship.height;

    let heals = registry
        .health_power_ups()
        .iter()
        .filter(|heal| !heal.is_collected())
        .map(|heal| (heal.pos, heal.size()));
    // A second timed pickup is wasted while one is running
    let slot_free = !state.effect.is_any_active();
    let timed = registry
        .timed_power_ups()
        .iter()
        .filter(|_| slot_free)
        .map(|power_up| (power_up.pos, power_up.size()));

    let target_x = heals
        .chain(timed)
        .filter(|(pos, _)| pos.y < ship_bottom)
        .max_by_key(|(pos, _)| pos.y)
        .map(|(pos, size)| pos.x + size.x / 2)
        .or_else(|| {
            registry
                .asteroids()
                .iter()
                .max_by_key(|asteroid| asteroid.leading_edge())
                .map(|asteroid| asteroid.center().x)
        });

    match target_x {
        Some(x) if x < ship_center - ship.speed => Steer::Left,
        Some(x) if x > ship_center + ship.speed => Steer::Right,
        _ => Steer::None,
    }
}
