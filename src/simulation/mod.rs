//! Settlement simulation - villagers, regrowth and the per-tick loop

pub mod regrowth;
pub mod tick;
pub mod villager;

pub use regrowth::{CutTreeRecord, RegrowthScheduler};
pub use tick::{run_simulation_tick, SimulationEvent};
pub use villager::{Destination, VillagerAgent, VillagerDirectory, VillagerRole, VillagerState};
