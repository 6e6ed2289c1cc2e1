//! City layer - buildings, placement and the resource ledger

pub mod building;
pub mod ledger;

pub use building::{footprint_cells, Building, BuildingKind, BuildingRegistry};
pub use ledger::{ResourceLedger, ResourceType};
