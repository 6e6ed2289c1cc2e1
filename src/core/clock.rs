//! Day/night clock
//!
//! Normalized time of day consumed by the renderer's lighting overlay.
//! Villager logic never reads it.

use serde::{Deserialize, Serialize};

/// Coarse phases of the day, used for overlay tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Night, // 20:00-05:00
    Dawn,  // 05:00-07:00
    Day,   // 07:00-18:00
    Dusk,  // 18:00-20:00
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=6 => DayPhase::Dawn,
            7..=17 => DayPhase::Day,
            18..=19 => DayPhase::Dusk,
            _ => DayPhase::Night, // 20-23, 0-4
        }
    }
}

/// Tracks time of day as a fraction of a full cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightClock {
    /// 0.0 = midnight, 0.5 = noon
    time_of_day: f32,
    day_length_ms: f32,
    days_elapsed: u64,
}

impl DayNightClock {
    /// Starting time of day for a fresh world (06:00)
    pub const START_TIME_OF_DAY: f32 = 0.25;

    pub fn new(day_length_ms: f32) -> Self {
        Self {
            time_of_day: Self::START_TIME_OF_DAY,
            day_length_ms,
            days_elapsed: 0,
        }
    }

    pub fn advance(&mut self, delta_ms: f32) {
        if self.day_length_ms <= 0.0 || delta_ms <= 0.0 {
            return;
        }
        let total = self.time_of_day + delta_ms / self.day_length_ms;
        self.days_elapsed += total.floor() as u64;
        self.time_of_day = total.fract();
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn days_elapsed(&self) -> u64 {
        self.days_elapsed
    }

    pub fn current_hour(&self) -> u32 {
        ((self.time_of_day * 24.0) as u32).min(23)
    }

    pub fn phase(&self) -> DayPhase {
        DayPhase::from_hour(self.current_hour())
    }

    /// Ambient light (0.0 at midnight, 1.0 at noon) on a cosine curve
    pub fn light_level(&self) -> f32 {
        0.5 - 0.5 * (self.time_of_day * std::f32::consts::TAU).cos()
    }
}

impl Default for DayNightClock {
    fn default() -> Self {
        Self::new(120_000.0)
    }
}
