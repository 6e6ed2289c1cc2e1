//! Homestead - isometric settlement simulation core
//!
//! Procedural terrain, building placement on an occupancy grid, and
//! villagers that chop, carry and wander, advanced one frame at a time.

pub mod city;
pub mod core;
pub mod ecs;
pub mod render;
pub mod simulation;
pub mod spatial;
pub mod world;
