pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{DayNightClock, DayPhase};
pub use config::WorldConfig;
