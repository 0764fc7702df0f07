//! Room-graph generation: names, roles, then randomized connections.

use log::debug;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::{ConnectionPolicy, WorldConfig};
use crate::error::{Error, Result};
use crate::types::{Room, RoomId, RoomRole, RoomSet};

use super::model::GeneratedRooms;
use super::seed::{random_below, shuffled_prefix};

const START_ROOM_INDEX: usize = 0;

pub struct RoomGenerator<'a> {
    config: &'a WorldConfig,
    rng: ChaCha8Rng,
}

impl<'a> RoomGenerator<'a> {
    pub fn new(config: &'a WorldConfig, seed: u64) -> Self {
        Self { config, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn generate(&mut self) -> Result<GeneratedRooms> {
        self.config.validate()?;

        let mut rooms = self.assign_names();
        self.assign_roles(&mut rooms);

        let mut rooms = RoomSet::new(rooms);
        let attempts = self.connect_rooms(&mut rooms)?;
        rooms.validate(self.config)?;

        Ok(GeneratedRooms { rooms, attempts })
    }

    fn assign_names(&mut self) -> Vec<Room> {
        let pool = &self.config.name_pool;
        shuffled_prefix(&mut self.rng, pool.len(), self.config.room_count)
            .into_iter()
            .map(|pool_index| Room::new(pool[pool_index].clone(), RoomRole::Mid))
            .collect()
    }

    fn assign_roles(&mut self, rooms: &mut [Room]) {
        rooms[START_ROOM_INDEX].role = RoomRole::Start;
        let end_index = 1 + random_below(&mut self.rng, rooms.len() - 1);
        rooms[end_index].role = RoomRole::End;
    }

    /// Runs each room's connection loop in index order and returns the
    /// per-room draw counts.
    ///
    /// Under `CountAttempts` the loop counter advances on every draw, even
    /// when the drawn edge already exists, so a room may finish with fewer
    /// distinct edges than `min_connections`. Under `CountDistinct` only new
    /// edges are drawn and the loop runs until the distinct degree reaches the
    /// minimum.
    fn connect_rooms(&mut self, rooms: &mut RoomSet) -> Result<Vec<usize>> {
        let min = self.config.min_connections;
        let mut attempts = vec![0; rooms.len()];

        for index in 0..rooms.len() {
            let id = RoomId(index);
            loop {
                let progress = match self.config.policy {
                    ConnectionPolicy::CountAttempts => attempts[index],
                    ConnectionPolicy::CountDistinct => rooms.room(id).degree(),
                };
                if progress >= min {
                    break;
                }

                let candidates = self.eligible_targets(rooms, id);
                if candidates.is_empty() {
                    return Err(Error::Generation(format!(
                        "room '{}' needs {min} connections but every other room is saturated",
                        rooms.room(id).name
                    )));
                }
                let target = candidates[random_below(&mut self.rng, candidates.len())];
                let added = rooms.connect(id, target);
                attempts[index] += 1;
                debug!(
                    "connection draw {} -> {} ({})",
                    rooms.room(id).name,
                    rooms.room(target).name,
                    if added { "new" } else { "existing" }
                );
            }
        }

        Ok(attempts)
    }

    /// Rooms `id` may draw next. A new edge is only eligible while both
    /// endpoints are below `max_connections`; with `room_count - 1` as the
    /// maximum that never excludes anything.
    fn eligible_targets(&self, rooms: &RoomSet, id: RoomId) -> Vec<RoomId> {
        let max = self.config.max_connections;
        let room = rooms.room(id);
        rooms
            .iter()
            .filter(|&(other, other_room)| {
                if other == id {
                    return false;
                }
                let fresh_edge_allowed = room.degree() < max && other_room.degree() < max;
                if room.is_connected_to(other) {
                    self.config.policy == ConnectionPolicy::CountAttempts
                } else {
                    fresh_edge_allowed
                }
            })
            .map(|(other, _)| other)
            .collect()
    }
}
