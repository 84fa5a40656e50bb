//! Simulation settings and the difficulty table
//!
//! Loaded from an optional JSON file. Everything is validated up front so a
//! bad configuration fails at startup instead of mid-tick.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Asteroid spawn difficulty (levels 1-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Default for Difficulty {
    fn default() -> Self {
        Self(6)
    }
}

impl Difficulty {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 7;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN_LEVEL..=Self::MAX_LEVEL)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Average ticks between asteroid spawns
    pub fn spawn_threshold(&self) -> u32 {
        match self.0 {
            1 => 1000,
            2 => 800,
            3 => 600,
            4 => 400,
            5 => 200,
            6 => 100,
            _ => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.0 {
            1 => "Drift",
            2 => "Scatter",
            3 => "Shower",
            4 => "Swarm",
            5 => "Storm",
            6 => "Barrage",
            _ => "Cataclysm",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = SettingsError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or(SettingsError::UnknownDifficulty(level))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

/// Errors raised while loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
    UnknownDifficulty(u8),
    BoundaryTooNarrow { width: i32, required: i32 },
    BoundaryTooShort { height: i32, required: i32 },
    MothershipOffscreen { y: i32, height: i32 },
    NonPositiveHealth(i32),
    HealthTooLarge { health: i32, max: i32 },
    NoAsteroidCapacity,
    ZeroTickRate,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "Settings I/O failed: {err}"),
            SettingsError::Parse(err) => write!(f, "Settings are not valid JSON: {err}"),
            SettingsError::UnknownDifficulty(level) => write!(
                f,
                "Unknown difficulty level {level} (expected {}-{})",
                Difficulty::MIN_LEVEL,
                Difficulty::MAX_LEVEL
            ),
            SettingsError::BoundaryTooNarrow { width, required } => {
                write!(f, "Boundary width {width} is too narrow, need at least {required}")
            }
            SettingsError::BoundaryTooShort { height, required } => {
                write!(f, "Boundary height {height} is too short, need at least {required}")
            }
            SettingsError::MothershipOffscreen { y, height } => {
                write!(f, "Mothership line y={y} lies outside the boundary (height {height})")
            }
            SettingsError::NonPositiveHealth(health) => {
                write!(f, "Mothership health must be positive, got {health}")
            }
            SettingsError::HealthTooLarge { health, max } => {
                write!(f, "Mothership health {health} is too large, at most {max}")
            }
            SettingsError::NoAsteroidCapacity => write!(f, "Asteroid cap must be at least 1"),
            SettingsError::ZeroTickRate => write!(f, "Tick rate must be at least 1 Hz"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field width in pixels
    pub width: i32,
    /// Play field height in pixels
    pub height: i32,
    /// Asteroids whose bottom edge crosses this line hit the mothership
    pub mothership_y: i32,
    /// Starting (and maximum) mothership health
    pub mothership_health: i32,
    pub difficulty: Difficulty,
    /// Maximum concurrent asteroids
    pub max_asteroids: usize,
    /// RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Tick rate the host loop runs at (reporting only, the simulation counts ticks)
    pub tick_rate_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: BOUNDARY_WIDTH,
            height: BOUNDARY_HEIGHT,
            mothership_y: MOTHERSHIP_Y,
            mothership_health: MOTHERSHIP_HEALTH,
            difficulty: Difficulty::default(),
            max_asteroids: MAX_ASTEROIDS,
            seed: None,
            tick_rate_hz: TICK_RATE_HZ,
        }
    }
}

impl Settings {
    /// Smallest width that fits the ship, the widest asteroid and a power-up
    pub fn min_width() -> i32 {
        let widest_asteroid = ASTEROID_SIZES.iter().copied().max().unwrap_or(0);
        let asteroid_span = ASTEROID_SPAWN_MARGIN + widest_asteroid + 1;
        let power_up_span = POWER_UP_MARGIN + 2 * POWER_UP_WIDTH;
        asteroid_span.max(power_up_span).max(SHIP_WIDTH)
    }

    /// Largest mothership health the health power-up draw range can hold
    pub fn max_mothership_health() -> i32 {
        ((u32::MAX - HEALTH_SPAWN_SLACK) / 2) as i32
    }

    /// Ship's top edge for this field
    pub fn ship_y(&self) -> i32 {
        self.height - SHIP_BOTTOM_CLEARANCE
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = Self::min_width();
        if self.width < required {
            return Err(SettingsError::BoundaryTooNarrow {
                width: self.width,
                required,
            });
        }
        if self.height < SHIP_BOTTOM_CLEARANCE {
            return Err(SettingsError::BoundaryTooShort {
                height: self.height,
                required: SHIP_BOTTOM_CLEARANCE,
            });
        }
        if self.mothership_y <= 0 || self.mothership_y >= self.height {
            return Err(SettingsError::MothershipOffscreen {
                y: self.mothership_y,
                height: self.height,
            });
        }
        if self.mothership_health <= 0 {
            return Err(SettingsError::NonPositiveHealth(self.mothership_health));
        }
        let max = Self::max_mothership_health();
        if self.mothership_health > max {
            return Err(SettingsError::HealthTooLarge {
                health: self.mothership_health,
                max,
            });
        }
        if self.max_asteroids == 0 {
            return Err(SettingsError::NoAsteroidCapacity);
        }
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (difficulty {} / {})",
            path.display(),
            settings.difficulty.level(),
            settings.difficulty.as_str()
        );
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.width, 500);
        assert_eq!(settings.height, 700);
        assert_eq!(settings.ship_y(), 540);
        assert_eq!(settings.difficulty.level(), 6);
    }

    #[test]
    fn test_difficulty_table() {
        let thresholds: Vec<u32> = (1..=7)
            .map(|level| Difficulty::new(level).unwrap().spawn_threshold())
            .collect();
        assert_eq!(thresholds, vec![1000, 800, 600, 400, 200, 100, 50]);
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(8).is_none());
    }

    #[test]
    fn test_narrow_boundary_rejected() {
        let settings = Settings {
            width: 120,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BoundaryTooNarrow { width: 120, required: 151 })
        ));
    }

    #[test]
    fn test_mothership_line_must_be_on_screen() {
        let settings = Settings {
            mothership_y: 700,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MothershipOffscreen { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "difficulty": 3, "seed": 42 }"#).unwrap();
        assert_eq!(settings.difficulty.spawn_threshold(), 600);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.width, BOUNDARY_WIDTH);
        assert_eq!(settings.max_asteroids, MAX_ASTEROIDS);
    }

    #[test]
    fn test_unknown_difficulty_in_json() {
        let err = Settings::from_json(r#"{ "difficulty": 9 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().contains("difficulty"));
    }

    #[test]
    fn test_zero_asteroid_cap_rejected() {
        let err = Settings::from_json(r#"{ "max_asteroids": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::NoAsteroidCapacity));
    }

    #[test]
    fn test_oversized_mothership_health_rejected() {
        let settings = Settings {
            mothership_health: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::HealthTooLarge { health: i32::MAX, .. })
        ));

        let largest = Settings {
            mothership_health: Settings::max_mothership_health(),
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "interstellar_escort_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            difficulty: Difficulty::new(2).unwrap(),
            seed: Some(77),
            max_asteroids: 4,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
