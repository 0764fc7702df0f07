//! Public output model of a generation run.

use crate::types::RoomSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedRooms {
    pub rooms: RoomSet,
    /// Connection draws made by each room's own loop, indexed like `rooms`.
    pub attempts: Vec<usize>,
}
