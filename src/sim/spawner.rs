//! Stochastic spawning of asteroids and power-ups, periodic shots
//!
//! Every trial is an exact-match draw: pick uniformly in `[0, n]` and spawn
//! only when the draw lands on one specific value. The draw range has n + 1
//! values, so the mean gap is n + 1 ticks rather than the table's n.

use rand::Rng;

use super::powerup::{HealthPowerUp, TimedKind, TimedPowerUp};
use super::state::{Asteroid, GameEvent, GameState, Mothership, PowerUpKind, Shot};
use crate::consts::*;
use crate::settings::Difficulty;

/// Spawn policy plus power-up cooldowns
#[derive(Debug, Clone)]
pub struct Spawner {
    difficulty: Difficulty,
    /// Health power-ups may spawn only after this tick
    health_ready_after: u64,
    /// Timed power-ups may spawn only after this tick
    timed_ready_after: u64,
}

impl Spawner {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            health_ready_after: 0,
            timed_ready_after: 0,
        }
    }

    pub fn reset(&mut self) {
        self.health_ready_after = 0;
        self.timed_ready_after = 0;
    }

    /// One asteroid trial. The caller checks the asteroid cap first.
    pub fn asteroid_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let threshold = self.difficulty.spawn_threshold();
        rng.random_range(0..=threshold) == threshold
    }

    /// One health power-up trial. Odds rise as the mothership loses health.
    pub fn health_trial<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tick: u64,
        mothership: &Mothership,
    ) -> bool {
        if tick <= self.health_ready_after || !mothership.is_damaged() || mothership.is_destroyed()
        {
            return false;
        }
        let target = 2 * mothership.health() as u32;
        if rng.random_range(0..=target + HEALTH_SPAWN_SLACK) != target {
            return false;
        }
        self.health_ready_after = tick + POWER_UP_COOLDOWN_TICKS;
        true
    }

    /// One timed power-up trial. Healthy motherships get Double XP, struggling ones Insta-Kill.
    pub fn timed_trial<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tick: u64,
        mothership_health: i32,
        effect_active: bool,
    ) -> Option<TimedKind> {
        if tick <= self.timed_ready_after || effect_active {
            return None;
        }
        let kind = if mothership_health >= DOUBLE_XP_HEALTH_FLOOR {
            TimedKind::DoubleXp
        } else {
            TimedKind::InstaKill
        };
        if rng.random_range(0..=TIMED_SPAWN_ODDS) != TIMED_SPAWN_ODDS {
            return None;
        }
        self.timed_ready_after = tick + POWER_UP_COOLDOWN_TICKS;
        Some(kind)
    }
}

/// Roll a fresh asteroid just above the field
pub fn roll_asteroid<R: Rng + ?Sized>(rng: &mut R, id: u32, boundary_width: i32) -> Asteroid {
    let size = ASTEROID_SIZES[rng.random_range(0..ASTEROID_SIZES.len())];
    let variant = rng.random_range(0..ASTEROID_VARIANTS);
    let x = rng.random_range(ASTEROID_SPAWN_MARGIN..boundary_width - size);
    // Bigger rocks fall slower, with a narrower spread
    let velocity = if size < ASTEROID_FAST_SIZE_LIMIT {
        rng.random_range(2..=3)
    } else {
        rng.random_range(1..=2)
    };
    Asteroid::new(id, size, x, velocity, variant)
}

/// Horizontal spawn position for either power-up kind
pub fn roll_power_up_x<R: Rng + ?Sized>(rng: &mut R, boundary_width: i32) -> i32 {
    rng.random_range(POWER_UP_MARGIN..=boundary_width - 2 * POWER_UP_WIDTH)
}

/// Spawn phase: shots, then asteroids, then power-ups
pub(crate) fn run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        settings,
        rng,
        tick,
        ship,
        mothership,
        registry,
        effect,
        spawner,
        ..
    } = state;
    let tick = *tick;

    if tick.is_multiple_of(SHOT_INTERVAL_TICKS) {
        let id = registry.next_entity_id();
        registry.shots_mut().insert(Shot::new(id, ship.muzzle()));
        events.push(GameEvent::ShotFired { id });
    }

    if registry.can_spawn_asteroid() && spawner.asteroid_trial(rng) {
        let id = registry.next_entity_id();
        let asteroid = roll_asteroid(rng, id, settings.width);
        let size = asteroid.size;
        if registry.insert_asteroid(asteroid) {
            log::debug!("Tick {tick}: asteroid {id} (size {size})");
            events.push(GameEvent::AsteroidSpawned { id, size });
        }
    }

    if spawner.health_trial(rng, tick, mothership) {
        let id = registry.next_entity_id();
        let x = roll_power_up_x(rng, settings.width);
        registry.health_power_ups_mut().insert(HealthPowerUp::new(id, x));
        log::debug!("Tick {tick}: health power-up {id}");
        events.push(GameEvent::PowerUpSpawned {
            id,
            kind: PowerUpKind::Health,
        });
    }

    let effect_active = effect.is_any_active();
    if let Some(kind) = spawner.timed_trial(rng, tick, mothership.health(), effect_active) {
        let id = registry.next_entity_id();
        let x = roll_power_up_x(rng, settings.width);
        registry.timed_power_ups_mut().insert(TimedPowerUp::new(id, kind, x));
        log::debug!("Tick {tick}: {} power-up {id}", kind.as_str());
        events.push(GameEvent::PowerUpSpawned {
            id,
            kind: PowerUpKind::Timed(kind),
        });
    }
}
