use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Grid;

/// Data-driven configuration for gridcycle rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width (cells).
    pub grid_width: i32,
    /// Grid height (cells).
    pub grid_height: i32,
    /// Wrap the x axis (leaving one edge re-enters at the other).
    pub wrap_x: bool,
    /// Wrap the y axis.
    pub wrap_y: bool,
    /// Players required on the roster before a round starts.
    pub min_players: usize,
    /// Active-phase tick interval (ms).
    pub tick_ms: u64,
    /// Roster redraw interval while waiting for players (ms).
    pub waiting_poll_ms: u64,
    /// Hold on the intro frame before play starts (ms).
    pub intro_hold_ms: u64,
    /// Decay flash step interval (ms).
    pub decay_tick_ms: u64,
    /// Active ticks between single powerup spawns after the first wave.
    pub powerup_interval_ticks: u64,
    /// Powerups beyond the live player count in the first wave.
    pub first_wave_bonus: usize,
    /// Moves a Speed powerup lasts once activated.
    pub speed_duration_moves: u32,
    /// Cells a Jump powerup covers in its boosted move.
    pub jump_distance: i32,
    /// Cells ahead of the head a portal gate deploys.
    pub portal_reach: i32,
    /// Decay ticks a dead player's full trail takes to clear.
    pub decay_ticks: usize,
    /// Optional trail length cap (cells); unset leaves trails unbounded.
    pub trail_cap: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 512,
            grid_height: 32,
            wrap_x: false,
            wrap_y: false,
            min_players: 2,
            tick_ms: 50,
            waiting_poll_ms: 500,
            intro_hold_ms: 2000,
            decay_tick_ms: 33,
            powerup_interval_ticks: 100,
            first_wave_bonus: 5,
            speed_duration_moves: 30,
            jump_distance: 4,
            portal_reach: 10,
            decay_ticks: 30,
            trail_cap: None,
        }
    }
}

impl GameConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    /// A file that exists but cannot be used is reported, not fatal.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("GRIDCYCLE_CONFIG") {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Self>(&contents) {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::error!(path, error = %err, "Could not parse config, using defaults");
                    },
                },
                Err(err) => {
                    tracing::error!(path, error = %err, "Could not read GRIDCYCLE_CONFIG, using defaults");
                },
            }
            return Self::default();
        }
        match std::fs::read_to_string("config/gridcycle.toml") {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::error!(error = %err, "Could not parse config/gridcycle.toml, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// The board described by this config.
    pub fn grid(&self) -> Grid {
        Grid::with_wrap(self.grid_width, self.grid_height, self.wrap_x, self.wrap_y)
    }

    /// Reject values the round loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives: [(&'static str, i64); 12] = [
            ("grid_width", i64::from(self.grid_width)),
            ("grid_height", i64::from(self.grid_height)),
            ("min_players", self.min_players as i64),
            ("tick_ms", self.tick_ms as i64),
            ("waiting_poll_ms", self.waiting_poll_ms as i64),
            ("intro_hold_ms", self.intro_hold_ms as i64),
            ("decay_tick_ms", self.decay_tick_ms as i64),
            ("powerup_interval_ticks", self.powerup_interval_ticks as i64),
            ("speed_duration_moves", i64::from(self.speed_duration_moves)),
            ("jump_distance", i64::from(self.jump_distance)),
            ("portal_reach", i64::from(self.portal_reach)),
            ("decay_ticks", self.decay_ticks as i64),
        ];
        for (field, value) in positives {
            if value < 1 {
                return Err(ConfigError::NotPositive(field));
            }
        }
        if self.trail_cap == Some(0) {
            return Err(ConfigError::NotPositive("trail_cap"));
        }
        Ok(())
    }
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotPositive(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive(field) => {
                write!(f, "config field `{field}` must be at least 1")
            },
        }
    }
}

impl std::error::Error for ConfigError {}
