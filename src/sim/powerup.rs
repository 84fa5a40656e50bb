//! Power-up entities and state machines
//!
//! Timed power-ups share one process-wide activation slot: `TimedEffect`.
//! `activate` is the only way into it; `expire_if_due` and `reset` are the
//! only ways out. Health power-ups are one-shot and carry their own state.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Timed effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedKind {
    /// Any shot reduces asteroid health to zero
    InstaKill,
    /// Destroyed asteroids award double points
    DoubleXp,
}

impl TimedKind {
    /// Banner text shown while active
    pub fn as_str(&self) -> &'static str {
        match self {
            TimedKind::InstaKill => "Insta-Kill",
            TimedKind::DoubleXp => "Double XP",
        }
    }
}

/// A timed power-up falling toward the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPowerUp {
    pub id: u32,
    pub kind: TimedKind,
    /// Top-left corner
    pub pos: IVec2,
    pub speed: i32,
    /// Banner ticks shown since activation
    pub display_ticks: u32,
}

impl TimedPowerUp {
    pub fn new(id: u32, kind: TimedKind, x: i32) -> Self {
        Self {
            id,
            kind,
            pos: IVec2::new(x, -POWER_UP_HEIGHT),
            speed: POWER_UP_SPEED,
            display_ticks: 0,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(POWER_UP_WIDTH, POWER_UP_HEIGHT)
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// Health power-up lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    /// Still falling, can be collected
    Falling,
    /// Heal applied; banner showing for `display_ticks`
    Collected { display_ticks: u32 },
}

/// A one-shot heal for the mothership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPowerUp {
    pub id: u32,
    /// Top-left corner
    pub pos: IVec2,
    pub speed: i32,
    pub heal_amount: i32,
    state: HealthState,
}

impl HealthPowerUp {
    pub fn new(id: u32, x: i32) -> Self {
        Self {
            id,
            pos: IVec2::new(x, -POWER_UP_HEIGHT),
            speed: POWER_UP_SPEED,
            heal_amount: HEAL_AMOUNT,
            state: HealthState::Falling,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(POWER_UP_WIDTH, POWER_UP_HEIGHT)
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.state, HealthState::Collected { .. })
    }

    /// Falling -> Collected. Returns false if already collected.
    pub fn collect(&mut self) -> bool {
        if self.is_collected() {
            return false;
        }
        self.state = HealthState::Collected { display_ticks: 0 };
        true
    }

    /// Fall while uncollected, count banner ticks afterwards
    pub fn advance(&mut self) {
        match &mut self.state {
            HealthState::Falling => self.pos.y += self.speed,
            HealthState::Collected { display_ticks } => *display_ticks += 1,
        }
    }

    /// Banner done, instance can go
    pub fn display_finished(&self) -> bool {
        matches!(
            self.state,
            HealthState::Collected { display_ticks } if display_ticks >= POWER_UP_DISPLAY_TICKS
        )
    }
}

/// The currently active timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Instance that granted the effect
    pub power_up_id: u32,
    pub kind: TimedKind,
    pub activated_at: u64,
}

/// Single activation slot shared by every timed power-up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimedEffect {
    active: Option<ActiveEffect>,
}

impl TimedEffect {
    /// Claim the slot. Fails while another effect is running.
    pub fn activate(&mut self, power_up_id: u32, kind: TimedKind, tick: u64) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveEffect {
            power_up_id,
            kind,
            activated_at: tick,
        });
        true
    }

    /// Release the slot once the effect has outlived `duration`
    pub fn expire_if_due(&mut self, tick: u64, duration: u64) -> Option<ActiveEffect> {
        let due = self
            .active
            .is_some_and(|effect| tick.saturating_sub(effect.activated_at) > duration);
        if due { self.active.take() } else { None }
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    pub fn is_any_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_active(&self, kind: TimedKind) -> bool {
        self.active.is_some_and(|effect| effect.kind == kind)
    }

    /// True if `power_up_id` is the instance holding the slot
    pub fn holds(&self, power_up_id: u32) -> bool {
        self.active
            .is_some_and(|effect| effect.power_up_id == power_up_id)
    }

    pub fn remaining_ticks(&self, tick: u64, duration: u64) -> u64 {
        self.active.map_or(0, |effect| {
            duration.saturating_sub(tick.saturating_sub(effect.activated_at))
        })
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
