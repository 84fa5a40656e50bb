//! Interstellar Escort - defend the mothership from falling asteroids
//!
//! Core modules:
//! - `sim`: Deterministic fixed-tick simulation (spawning, movement, collisions, power-ups)
//! - `settings`: Validated simulation configuration and the difficulty table
//! - `highscores`: Top-5 leaderboard persisted as JSON

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Difficulty, Settings, SettingsError};

/// Game tuning constants
///
/// Every duration is a tick count. Nothing in the simulation reads a clock.
pub mod consts {
    /// Reference tick rate the tuning below was written for
    pub const TICK_RATE_HZ: u32 = 60;

    /// Reference play field
    pub const BOUNDARY_WIDTH: i32 = 500;
    pub const BOUNDARY_HEIGHT: i32 = 700;

    /// Ship defaults
    pub const SHIP_WIDTH: i32 = 96;
    pub const SHIP_HEIGHT: i32 = 96;
    pub const SHIP_START_X: i32 = 200;
    /// Distance from the bottom of the field to the ship's top edge
    pub const SHIP_BOTTOM_CLEARANCE: i32 = 160;
    pub const SHIP_SPEED: i32 = 5;

    /// Shots
    pub const SHOT_INTERVAL_TICKS: u64 = 15;
    pub const SHOT_WIDTH: i32 = 3;
    pub const SHOT_LENGTH: i32 = 10;
    pub const SHOT_SPEED: i32 = 3;
    pub const SHOT_DAMAGE: i32 = 20;
    /// Shots leave the ship this far below its top edge
    pub const SHOT_MUZZLE_OFFSET: i32 = 25;

    /// Mothership
    pub const MOTHERSHIP_Y: i32 = 650;
    pub const MOTHERSHIP_HEALTH: i32 = 1000;
    pub const MOTHERSHIP_BAR_LENGTH: i32 = 400;

    /// Asteroids
    pub const ASTEROID_SIZES: [i32; 6] = [50, 60, 70, 80, 90, 100];
    /// Asteroids narrower than this get the faster velocity band
    pub const ASTEROID_FAST_SIZE_LIMIT: i32 = 80;
    pub const ASTEROID_SPAWN_MARGIN: i32 = 50;
    pub const ASTEROID_VARIANTS: u8 = 5;
    /// Asteroids only move on ticks divisible by this
    pub const ASTEROID_MOVE_INTERVAL: u64 = 2;
    pub const MAX_ASTEROIDS: usize = 9;

    /// Power-ups (both kinds share a sprite footprint)
    pub const POWER_UP_WIDTH: i32 = 25;
    pub const POWER_UP_HEIGHT: i32 = 20;
    pub const POWER_UP_SPEED: i32 = 3;
    pub const POWER_UP_MARGIN: i32 = 25;
    pub const POWER_UP_COOLDOWN_TICKS: u64 = 500;
    /// Ticks the pickup banner stays up after collection
    pub const POWER_UP_DISPLAY_TICKS: u32 = 25;

    pub const HEAL_AMOUNT: i32 = 250;
    /// Added to the health draw range; bounds the best-case heal spawn rate
    pub const HEALTH_SPAWN_SLACK: u32 = 300;

    pub const TIMED_EFFECT_DURATION: u64 = 550;
    pub const TIMED_SPAWN_ODDS: u32 = 1000;
    /// Mothership health at or above which Double XP is offered instead of Insta-Kill.
    /// Exactly 500 offers only Double XP; the two kinds never compete for the same tick.
    pub const DOUBLE_XP_HEALTH_FLOOR: i32 = 500;

    /// Explosions
    pub const EXPLOSION_FRAMES: u32 = 11;
    pub const EXPLOSION_FRAME_TICKS: u64 = 4;

    /// Passive score
    pub const SCORE_INTERVAL_TICKS: u64 = 5;
    pub const SCORE_PER_INTERVAL: u64 = 1;
}
