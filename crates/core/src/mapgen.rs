//! Procedural room-graph generation split into naming, role and connection steps.

pub mod model;

mod generator;
mod seed;

pub use generator::RoomGenerator;
pub use model::GeneratedRooms;

use crate::config::WorldConfig;
use crate::error::Result;

pub fn generate_rooms(config: &WorldConfig, seed: u64) -> Result<GeneratedRooms> {
    RoomGenerator::new(config, seed).generate()
}
