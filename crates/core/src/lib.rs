pub mod config;
pub mod error;
pub mod mapgen;
pub mod navigation;
pub mod record;
pub mod store;
pub mod time_channel;
pub mod types;

pub use config::{ConnectionPolicy, WorldConfig};
pub use error::{Error, Result};
pub use mapgen::{GeneratedRooms, RoomGenerator, generate_rooms};
pub use navigation::{Command, Session, Step, TIME_COMMAND};
pub use time_channel::{TimeQuery, TimeReading, TimeSideChannel};
pub use types::*;
