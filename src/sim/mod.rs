//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, every duration counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod movement;
pub mod powerup;
pub mod registry;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{rects_overlap, shot_hits_asteroid};
pub use powerup::{ActiveEffect, HealthPowerUp, HealthState, TimedEffect, TimedKind, TimedPowerUp};
pub use registry::{Collection, Entity, Registry};
pub use score::Score;
pub use spawner::Spawner;
pub use state::{
    Asteroid, DestructionMethod, Explosion, Facing, GameEvent, GamePhase, GameState, Mothership,
    PowerUpKind, Ship, Shot, Steer,
};
pub use tick::{TickInput, tick};
