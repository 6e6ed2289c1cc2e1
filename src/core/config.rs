//! World configuration with documented constants
//!
//! Every value the host may override lives here. Timers are in elapsed
//! milliseconds, distances in screen pixels, sizes in tiles.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{HomesteadError, Result};

/// Nominal host frame length; movement speed is expressed per frame of this length
pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;

/// Configuration for world generation and the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === WORLD ===
    /// Seed for terrain noise, rock scatter and villager wandering
    pub seed: u64,

    /// Grid width in tiles
    pub world_width: u32,

    /// Grid height in tiles
    pub world_height: u32,

    /// Isometric tile width in pixels (diamond width)
    pub tile_width: f32,

    /// Isometric tile height in pixels (diamond height)
    pub tile_height: f32,

    // === TERRAIN GENERATION ===
    /// Grid coordinate to noise-space multiplier
    ///
    /// Smaller values give larger lakes and forests.
    pub noise_scale: f64,

    /// Number of noise layers summed per sample
    pub noise_octaves: u32,

    /// Amplitude multiplier between successive octaves
    pub noise_persistence: f64,

    /// Noise value below which a tile is Water
    pub water_threshold: f64,

    /// Noise value above which a tile is Forest
    pub forest_threshold: f64,

    /// Chance that a tile between the thresholds is Rocks instead of Meadow
    pub rocks_chance: f64,

    // === VILLAGERS ===
    /// Walking speed in pixels per nominal 60 Hz frame
    ///
    /// Scaled by `delta_ms / NOMINAL_FRAME_MS` each tick so movement is
    /// frame-rate independent.
    pub villager_speed: f32,

    /// Distance in pixels under which a villager has arrived
    pub arrival_epsilon: f32,

    /// Interval between walk animation frame toggles
    pub animation_interval_ms: f32,

    /// Time a lumberjack spends chopping one tree
    pub work_duration_ms: f32,

    /// Wood added to the ledger per delivery
    pub wood_per_delivery: u64,

    /// Maximum wander offset from home in pixels
    pub wander_radius: f32,

    /// Distance in pixels at which an unbound villager notices a free building
    pub homing_radius: f32,

    // === REGROWTH ===
    /// Time before a felled forest tile turns to meadow
    pub regrowth_delay_ms: f32,

    // === DAY/NIGHT ===
    /// Length of a full day/night cycle
    pub day_length_ms: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_width: 100,
            world_height: 100,
            tile_width: 64.0,
            tile_height: 32.0,

            noise_scale: 0.1,
            noise_octaves: 4,
            noise_persistence: 0.5,
            water_threshold: 0.35,
            forest_threshold: 0.6,
            rocks_chance: 0.05,

            villager_speed: 1.5,
            arrival_epsilon: 5.0,
            animation_interval_ms: 200.0,
            work_duration_ms: 3000.0,
            wood_per_delivery: 10,
            wander_radius: 96.0,
            homing_radius: 160.0,

            regrowth_delay_ms: 30_000.0,

            day_length_ms: 120_000.0,
        }
    }
}

impl WorldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: WorldConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(HomesteadError::InvalidConfig(format!(
                "world must be at least 1x1 (got {}x{})",
                self.world_width, self.world_height
            )));
        }

        if self.tile_width <= 0.0 || self.tile_height <= 0.0 {
            return Err(HomesteadError::InvalidConfig(
                "tile dimensions must be positive".into(),
            ));
        }

        if self.noise_octaves == 0 {
            return Err(HomesteadError::InvalidConfig(
                "noise_octaves must be at least 1".into(),
            ));
        }

        for (name, value) in [
            ("water_threshold", self.water_threshold),
            ("forest_threshold", self.forest_threshold),
            ("rocks_chance", self.rocks_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HomesteadError::InvalidConfig(format!(
                    "{name} ({value}) must be within [0, 1]"
                )));
            }
        }

        if self.water_threshold > self.forest_threshold {
            return Err(HomesteadError::InvalidConfig(format!(
                "water_threshold ({}) should be <= forest_threshold ({})",
                self.water_threshold, self.forest_threshold
            )));
        }

        if self.villager_speed <= 0.0 || self.arrival_epsilon <= 0.0 {
            return Err(HomesteadError::InvalidConfig(
                "villager_speed and arrival_epsilon must be positive".into(),
            ));
        }

        if self.animation_interval_ms <= 0.0
            || self.work_duration_ms < 0.0
            || self.regrowth_delay_ms < 0.0
            || self.day_length_ms <= 0.0
        {
            return Err(HomesteadError::InvalidConfig(
                "durations must be non-negative (intervals positive)".into(),
            ));
        }

        Ok(())
    }
}
