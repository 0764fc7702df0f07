use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::WorldConfig;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomRole {
    Start,
    Mid,
    End,
}

impl RoomRole {
    pub fn record_token(self) -> &'static str {
        match self {
            Self::Start => "START_ROOM",
            Self::Mid => "MID_ROOM",
            Self::End => "END_ROOM",
        }
    }

    /// Prefix match on the record token, so trailing garbage is tolerated.
    pub fn from_record_token(token: &str) -> Option<Self> {
        [Self::Start, Self::Mid, Self::End]
            .into_iter()
            .find(|role| token.starts_with(role.record_token()))
    }
}

impl fmt::Display for RoomRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_token())
    }
}

/// Position of a room inside its `RoomSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub name: String,
    pub role: RoomRole,
    pub connections: BTreeSet<RoomId>,
}

impl Room {
    pub fn new(name: impl Into<String>, role: RoomRole) -> Self {
        Self { name: name.into(), role, connections: BTreeSet::new() }
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.connections.contains(&other)
    }
}

/// All rooms produced by one generation run, in generation (or load) order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomSet {
    rooms: Vec<Room>,
}

impl RoomSet {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms.iter().enumerate().map(|(index, room)| (RoomId(index), room))
    }

    pub fn find_by_name(&self, name: &str) -> Option<RoomId> {
        self.rooms.iter().position(|room| room.name == name).map(RoomId)
    }

    /// Adds the undirected edge `a <-> b`. Returns `true` when the edge is new.
    pub fn connect(&mut self, a: RoomId, b: RoomId) -> bool {
        if a == b {
            return false;
        }
        let added = self.rooms[a.0].connections.insert(b);
        self.rooms[b.0].connections.insert(a);
        added
    }

    /// Connection names in ascending room index order.
    pub fn connection_names(&self, id: RoomId) -> Vec<&str> {
        self.room(id).connections.iter().map(|&other| self.room(other).name.as_str()).collect()
    }

    pub fn start_room(&self) -> Result<RoomId> {
        self.unique_role(RoomRole::Start)
    }

    pub fn end_room(&self) -> Result<RoomId> {
        self.unique_role(RoomRole::End)
    }

    fn unique_role(&self, role: RoomRole) -> Result<RoomId> {
        let mut matches = self.iter().filter(|(_, room)| room.role == role).map(|(id, _)| id);
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => Err(Error::Invariant(format!("room set has no {role}"))),
            (Some(_), Some(_)) => Err(Error::Invariant(format!("room set has more than one {role}"))),
        }
    }

    /// Checks the structural guarantees every generated set must satisfy.
    ///
    /// The minimum degree is deliberately not checked: under
    /// `ConnectionPolicy::CountAttempts` a room may legitimately end up with
    /// fewer distinct edges than `min_connections`.
    pub fn validate(&self, config: &WorldConfig) -> Result<()> {
        self.start_room()?;
        self.end_room()?;

        let mut names = BTreeMap::new();
        for (id, room) in self.iter() {
            if let Some(previous) = names.insert(room.name.as_str(), id) {
                return Err(Error::Invariant(format!(
                    "rooms {} and {} share the name '{}'",
                    previous.0, id.0, room.name
                )));
            }
            if room.connections.contains(&id) {
                return Err(Error::Invariant(format!("room '{}' connects to itself", room.name)));
            }
            if room.degree() > config.max_connections {
                return Err(Error::Invariant(format!(
                    "room '{}' has {} connections, above the maximum of {}",
                    room.name,
                    room.degree(),
                    config.max_connections
                )));
            }
            for &other in &room.connections {
                if other.0 >= self.len() || !self.room(other).is_connected_to(id) {
                    return Err(Error::Invariant(format!(
                        "connection from '{}' is not mirrored",
                        room.name
                    )));
                }
            }
        }
        Ok(())
    }
}
