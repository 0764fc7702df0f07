//! Navigation state machine: current room, recorded path, arrival detection.

use crate::error::Result;
use crate::types::{RoomId, RoomRole, RoomSet};

pub const TIME_COMMAND: &str = "time";

/// What a line of player input means in the current room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(RoomId),
    QueryTime,
    Invalid,
}

/// Result of feeding one line of input to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Moved to a room that is not the end room.
    Moved(RoomId),
    /// Moved into the end room; the session is finished.
    Arrived(RoomId),
    QueryTime,
    Invalid,
}

pub struct Session<'a> {
    rooms: &'a RoomSet,
    current: RoomId,
    path: Vec<RoomId>,
}

impl<'a> Session<'a> {
    pub fn start(rooms: &'a RoomSet) -> Result<Self> {
        let current = rooms.start_room()?;
        Ok(Self { rooms, current, path: Vec::new() })
    }

    pub fn rooms(&self) -> &'a RoomSet {
        self.rooms
    }

    pub fn current(&self) -> RoomId {
        self.current
    }

    pub fn current_name(&self) -> &'a str {
        &self.rooms.room(self.current).name
    }

    /// Connection names of the current room, in room index order.
    pub fn exits(&self) -> Vec<&'a str> {
        self.rooms.connection_names(self.current)
    }

    pub fn path(&self) -> &[RoomId] {
        &self.path
    }

    pub fn path_names(&self) -> Vec<&'a str> {
        self.path.iter().map(|&id| self.rooms.room(id).name.as_str()).collect()
    }

    pub fn steps(&self) -> usize {
        self.path.len()
    }

    pub fn is_finished(&self) -> bool {
        self.rooms.room(self.current).role == RoomRole::End
    }

    /// Connection names win over the reserved command, so a room literally
    /// named `time` stays reachable from its neighbours.
    pub fn classify(&self, input: &str) -> Command {
        let current = self.rooms.room(self.current);
        if let Some(&target) =
            current.connections.iter().find(|&&other| self.rooms.room(other).name == input)
        {
            return Command::Move(target);
        }
        if input == TIME_COMMAND {
            return Command::QueryTime;
        }
        Command::Invalid
    }

    pub fn advance(&mut self, input: &str) -> Step {
        match self.classify(input) {
            Command::Move(target) => {
                self.current = target;
                self.path.push(target);
                if self.is_finished() { Step::Arrived(target) } else { Step::Moved(target) }
            }
            Command::QueryTime => Step::QueryTime,
            Command::Invalid => Step::Invalid,
        }
    }
}
