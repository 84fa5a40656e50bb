//! Game state and core simulation types
//!
//! `GameState` owns every piece of mutable simulation state. Phase functions
//! in the sibling modules borrow it mutably one at a time.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerup::{ActiveEffect, TimedEffect};
use super::registry::Registry;
use super::score::Score;
use super::spawner::Spawner;
use super::tick::{TickInput, tick};
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for `start`
    Opening,
    /// Active gameplay
    Playing,
    /// Mothership destroyed, waiting for `restart`
    GameOver,
}

/// Directional intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

/// Which way the ship sprite is banking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    #[default]
    Center,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner
    pub pos: IVec2,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
    pub facing: Facing,
    /// Ticks spent in the current facing (drives strafe transition frames)
    pub facing_ticks: u32,
}

impl Ship {
    pub fn new(boundary_width: i32, y: i32) -> Self {
        let x = SHIP_START_X.min(boundary_width - SHIP_WIDTH).max(0);
        Self {
            pos: IVec2::new(x, y),
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
            speed: SHIP_SPEED,
            facing: Facing::Center,
            facing_ticks: 0,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Apply one tick of steering, clamped to the field
    pub fn steer(&mut self, steer: Steer, boundary_width: i32) {
        let (dx, facing) = match steer {
            Steer::Left => (-self.speed, Facing::Left),
            Steer::Right => (self.speed, Facing::Right),
            Steer::None => (0, Facing::Center),
        };

        let max_x = (boundary_width - self.width).max(0);
        self.pos.x = (self.pos.x + dx).clamp(0, max_x);

        if facing == self.facing {
            self.facing_ticks = self.facing_ticks.saturating_add(1);
        } else {
            self.facing = facing;
            self.facing_ticks = 0;
        }
    }

    /// Where shots leave the ship
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(
            self.pos.x + self.width / 2,
            self.pos.y + SHOT_MUZZLE_OFFSET,
        )
    }
}

/// The stationary ship being escorted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mothership {
    /// Asteroids whose bottom edge passes this line hit the mothership
    pub y: i32,
    health: i32,
    damage_taken: i32,
    total: i32,
}

impl Mothership {
    pub fn new(y: i32, health: i32) -> Self {
        Self {
            y,
            health,
            damage_taken: 0,
            total: health,
        }
    }

    /// Remaining health, never below zero
    pub fn health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn damage_taken(&self) -> i32 {
        self.damage_taken
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.total
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        self.damage_taken += amount;
    }

    /// Restore health up to the starting total. Returns the amount applied.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.total);
        self.health - before
    }

    /// Filled length of the health bar
    pub fn health_bar_width(&self) -> i32 {
        let ratio = self.health() as f32 / self.total as f32;
        (MOTHERSHIP_BAR_LENGTH as f32 * ratio).round() as i32
    }
}

/// Why an asteroid left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionMethod {
    /// Shot down; awards score
    DestroyedByDamage,
    /// Crossed the mothership line; deals damage
    ReachedMothership,
}

/// A falling asteroid. Size drives health, damage and speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    /// Sprite width and height
    pub size: i32,
    /// Top-left corner
    pub pos: IVec2,
    pub velocity: i32,
    /// Damage dealt to the mothership on contact
    pub damage: i32,
    /// Sprite variant for the renderer
    pub variant: u8,
    health: i32,
    damage_taken: i32,
    health_bar: i32,
    destruction: Option<DestructionMethod>,
}

impl Asteroid {
    pub fn new(id: u32, size: i32, x: i32, velocity: i32, variant: u8) -> Self {
        let mut asteroid = Self {
            id,
            size,
            pos: IVec2::new(x, -size),
            velocity,
            damage: size * 2,
            variant,
            health: size * 2,
            damage_taken: 0,
            health_bar: 0,
            destruction: None,
        };
        asteroid.update_health_bar();
        asteroid
    }

    pub fn center(&self) -> IVec2 {
        self.pos + IVec2::splat(self.size / 2)
    }

    pub fn radius(&self) -> i32 {
        self.size / 2
    }

    /// Bottom edge
    pub fn leading_edge(&self) -> i32 {
        self.pos.y + self.size
    }

    /// Remaining health, never below zero
    pub fn health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn damage_taken(&self) -> i32 {
        self.damage_taken
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0
    }

    pub fn destruction(&self) -> Option<DestructionMethod> {
        self.destruction
    }

    /// Apply one shot. Insta-kill zeroes health but still books the shot's damage.
    pub fn apply_hit(&mut self, damage: i32, insta_kill: bool) {
        if insta_kill {
            self.health = 0;
        } else {
            self.health -= damage;
        }
        self.damage_taken += damage;
        self.update_health_bar();
    }

    pub(crate) fn mark_destroyed(&mut self, method: DestructionMethod) {
        debug_assert!(
            self.destruction.is_none(),
            "asteroid {} destroyed twice",
            self.id
        );
        self.destruction = Some(method);
    }

    /// Full length of the health bar
    pub fn health_bar_length(&self) -> i32 {
        (self.size as f32 * 0.75).round() as i32
    }

    /// Filled length of the health bar
    pub fn health_bar_width(&self) -> i32 {
        self.health_bar
    }

    fn update_health_bar(&mut self) {
        let health = self.health();
        let pool = health + self.damage_taken;
        self.health_bar = if pool > 0 {
            (self.health_bar_length() as f32 * health as f32 / pool as f32).round() as i32
        } else {
            0
        };
    }

    pub fn advance(&mut self) {
        self.pos.y += self.velocity;
    }
}

/// A vertical laser bolt travelling up the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    pub x: i32,
    /// Trailing (lower) end of the bolt
    pub start_y: i32,
    /// Leading tip
    pub end_y: i32,
    pub width: i32,
    pub speed: i32,
    pub damage: i32,
    hit: bool,
}

impl Shot {
    pub fn new(id: u32, muzzle: IVec2) -> Self {
        Self {
            id,
            x: muzzle.x,
            start_y: muzzle.y,
            end_y: muzzle.y - SHOT_LENGTH,
            width: SHOT_WIDTH,
            speed: SHOT_SPEED,
            damage: SHOT_DAMAGE,
            hit: false,
        }
    }

    pub fn advance(&mut self) {
        self.start_y -= self.speed;
        self.end_y -= self.speed;
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Returns false if the shot was already spent
    pub fn mark_hit(&mut self) -> bool {
        !std::mem::replace(&mut self.hit, true)
    }

    /// Entire bolt is above the top of the field
    pub fn is_offscreen(&self) -> bool {
        self.start_y < 0
    }
}

/// Explosion animation left where an asteroid was destroyed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: IVec2,
    /// Size of the source asteroid
    pub size: i32,
    pub frame: u32,
    pub method: DestructionMethod,
    /// Points awarded (0 unless shot down)
    pub score_delta: u64,
}

impl Explosion {
    pub fn new(id: u32, asteroid: &Asteroid, method: DestructionMethod, score_delta: u64) -> Self {
        Self {
            id,
            pos: asteroid.pos,
            size: asteroid.size,
            frame: 0,
            method,
            score_delta,
        }
    }

    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= EXPLOSION_FRAMES
    }
}

/// Power-up kinds, for spawn events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Timed(super::powerup::TimedKind),
}

/// Discrete things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { id: u32 },
    AsteroidSpawned { id: u32, size: i32 },
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    /// An asteroid was destroyed by either method
    Explosion {
        asteroid_id: u32,
        pos: IVec2,
        method: DestructionMethod,
        score_delta: u64,
    },
    HealthRestored { amount: i32 },
    EffectActivated { kind: super::powerup::TimedKind },
    EffectExpired { kind: super::powerup::TimedKind },
    GameOver { final_score: u64, ticks: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    /// Ticks since the session started
    pub(crate) tick: u64,
    pub(crate) ship: Ship,
    pub(crate) mothership: Mothership,
    pub(crate) score: Score,
    pub(crate) registry: Registry,
    pub(crate) effect: TimedEffect,
    pub(crate) spawner: Spawner,
}

impl GameState {
    /// Validate settings and build a session waiting on the title screen
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);

        let state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Opening,
            tick: 0,
            ship: Ship::new(settings.width, settings.ship_y()),
            mothership: Mothership::new(settings.mothership_y, settings.mothership_health),
            score: Score::new(),
            registry: Registry::new(settings.max_asteroids),
            effect: TimedEffect::default(),
            spawner: Spawner::new(settings.difficulty),
            settings,
        };
        log::info!(
            "Session created (seed {}, difficulty {})",
            state.seed,
            state.settings.difficulty.level()
        );
        Ok(state)
    }

    /// Leave the title screen
    pub fn start(&mut self) {
        if self.phase == GamePhase::Opening {
            self.phase = GamePhase::Playing;
            log::info!("Session started");
        }
    }

    /// Advance one tick; returns what happened
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(self, input)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn current_score(&self) -> u64 {
        self.score.value()
    }

    /// Wipe every entity and begin a fresh session. The RNG stream continues.
    pub fn restart(&mut self) {
        self.registry.clear();
        self.effect.reset();
        self.spawner.reset();
        self.score.reset();
        self.ship = Ship::new(self.settings.width, self.settings.ship_y());
        self.mothership =
            Mothership::new(self.settings.mothership_y, self.settings.mothership_health);
        self.tick = 0;
        self.phase = GamePhase::Playing;
        log::info!("Session restarted");
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn mothership(&self) -> &Mothership {
        &self.mothership
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn active_effect(&self) -> Option<&ActiveEffect> {
        self.effect.active()
    }

    /// Ticks left on the active timed effect (for the effect bar)
    pub fn effect_remaining_ticks(&self) -> u64 {
        self.effect.remaining_ticks(self.tick, TIMED_EFFECT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_clamped_to_field() {
        let mut ship = Ship::new(500, 540);
        for _ in 0..200 {
            ship.steer(Steer::Right, 500);
        }
        assert_eq!(ship.pos.x, 500 - SHIP_WIDTH);
        for _ in 0..200 {
            ship.steer(Steer::Left, 500);
        }
        assert_eq!(ship.pos.x, 0);
    }

    #[test]
    fn test_ship_facing_resets_counter() {
        let mut ship = Ship::new(500, 540);
        ship.steer(Steer::Left, 500);
        ship.steer(Steer::Left, 500);
        assert_eq!(ship.facing, Facing::Left);
        assert_eq!(ship.facing_ticks, 1);
        ship.steer(Steer::None, 500);
        assert_eq!(ship.facing, Facing::Center);
        assert_eq!(ship.facing_ticks, 0);
    }

    #[test]
    fn test_mothership_heal_is_capped() {
        let mut mothership = Mothership::new(650, 1000);
        mothership.take_damage(100);
        assert_eq!(mothership.heal(250), 100);
        assert_eq!(mothership.health(), 1000);
        assert_eq!(mothership.health_bar_width(), MOTHERSHIP_BAR_LENGTH);
    }

    #[test]
    fn test_mothership_health_reads_zero_when_overkilled() {
        let mut mothership = Mothership::new(650, 100);
        mothership.take_damage(180);
        assert!(mothership.is_destroyed());
        assert_eq!(mothership.health(), 0);
        assert_eq!(mothership.damage_taken(), 180);
    }

    #[test]
    fn test_asteroid_stats_follow_size() {
        let asteroid = Asteroid::new(1, 70, 120, 2, 0);
        assert_eq!(asteroid.health(), 140);
        assert_eq!(asteroid.damage, 140);
        assert_eq!(asteroid.pos.y, -70);
        assert_eq!(asteroid.center(), IVec2::new(155, -35));
        assert_eq!(asteroid.health_bar_width(), asteroid.health_bar_length());
    }

    #[test]
    fn test_asteroid_health_bar_shrinks() {
        let mut asteroid = Asteroid::new(1, 100, 50, 1, 0);
        asteroid.apply_hit(100, false);
        assert_eq!(asteroid.health(), 100);
        assert_eq!(asteroid.health_bar_width(), 38); // 75 * 100/200, rounded
        asteroid.apply_hit(20, true);
        assert_eq!(asteroid.health(), 0);
        assert_eq!(asteroid.damage_taken(), 120);
        assert_eq!(asteroid.health_bar_width(), 0);
    }

    #[test]
    fn test_shot_hit_only_once() {
        let mut shot = Shot::new(1, IVec2::new(248, 565));
        assert_eq!(shot.end_y, 555);
        assert!(shot.mark_hit());
        assert!(!shot.mark_hit());
        assert!(shot.is_hit());
    }

    #[test]
    fn test_new_session_waits_on_title() {
        let state = GameState::new(Settings {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(state.phase(), GamePhase::Opening);
        assert_eq!(state.seed, 1);
        assert_eq!(state.ship().pos, IVec2::new(200, 540));
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let result = GameState::new(Settings {
            width: 90,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_health_fails_before_first_tick() {
        let result = GameState::new(Settings {
            mothership_health: i32::MAX,
            seed: Some(3),
            ..Default::default()
        });
        assert!(matches!(result, Err(SettingsError::HealthTooLarge { .. })));
    }
}
