//! Score accumulator
//!
//! Only ever goes up within a session.

use serde::{Deserialize, Serialize};

use crate::consts::{SCORE_INTERVAL_TICKS, SCORE_PER_INTERVAL};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    value: u64,
}

impl Score {
    pub fn new() -> Self {
        Self { value: 0 }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Passive survival points. Returns true if this tick paid out.
    pub fn add_interval(&mut self, tick: u64) -> bool {
        if tick.is_multiple_of(SCORE_INTERVAL_TICKS) {
            self.value += SCORE_PER_INTERVAL;
            true
        } else {
            false
        }
    }

    /// Points for shooting down an asteroid. Returns the amount added.
    pub fn add_kill(&mut self, size: i32, double_xp: bool) -> u64 {
        let base = size.max(0) as u64;
        let delta = if double_xp { base * 2 } else { base };
        self.value += delta;
        delta
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_every_five_ticks() {
        let mut score = Score::new();
        let paid = (0..20).filter(|&tick| score.add_interval(tick)).count();
        assert_eq!(paid, 4);
        assert_eq!(score.value(), 4);
    }

    #[test]
    fn test_kill_doubles_under_double_xp() {
        let mut score = Score::new();
        assert_eq!(score.add_kill(60, false), 60);
        assert_eq!(score.add_kill(60, true), 120);
        assert_eq!(score.value(), 180);
        score.reset();
        assert_eq!(score.value(), 0);
    }
}
