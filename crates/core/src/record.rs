//! Plain-text room record format shared by the generator and the store.
//!
//! One record per room:
//!
//! ```text
//! ROOM NAME: desert
//! CONNECTION 1: shop
//! CONNECTION 2: castle
//! ROOM TYPE: START_ROOM
//! ```
//!
//! The reader is whitespace tolerant: it looks at the first three tokens of
//! each line and ignores anything it does not recognise.

use std::iter;

use log::debug;

use crate::types::{RoomId, RoomRole, RoomSet};

const NAME_MARKER: &str = "NAME";
const TYPE_MARKER: &str = "TYPE";
const CONNECTION_MARKER: &str = "CONNECTION";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRecord {
    pub role: RoomRole,
    /// Indices into the `known_names` slice the record was parsed against,
    /// in the order the record lists them.
    pub connections: Vec<usize>,
}

pub fn format_record(rooms: &RoomSet, id: RoomId) -> String {
    let room = rooms.room(id);
    let connections = rooms
        .connection_names(id)
        .into_iter()
        .enumerate()
        .map(|(number, name)| format!("CONNECTION {}: {name}\n", number + 1));

    iter::once(format!("ROOM NAME: {}\n", room.name))
        .chain(connections)
        .chain(iter::once(format!("ROOM TYPE: {}\n", room.role.record_token())))
        .collect()
}

/// Parse one room record. Connection targets are resolved against
/// `known_names`, the file names of the room set; unknown targets are dropped.
pub fn parse_record(text: &str, known_names: &[String]) -> ParsedRecord {
    let mut role = RoomRole::Mid;
    let mut connections = Vec::new();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(first), Some(second), Some(third)) = (tokens.next(), tokens.next(), tokens.next())
        else {
            if !line.trim().is_empty() {
                debug!("skipping short record line '{line}'");
            }
            continue;
        };

        if second.starts_with(NAME_MARKER) {
            continue;
        } else if second.starts_with(TYPE_MARKER) {
            match RoomRole::from_record_token(third) {
                Some(parsed) => role = parsed,
                None => debug!("ignoring unknown room type '{third}'"),
            }
        } else if first.starts_with(CONNECTION_MARKER) {
            match known_names.iter().position(|name| name == third) {
                Some(index) if !connections.contains(&index) => connections.push(index),
                Some(_) => {}
                None => debug!("ignoring connection to unknown room '{third}'"),
            }
        } else {
            debug!("skipping unrecognised record line '{line}'");
        }
    }

    ParsedRecord { role, connections }
}
