use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use rooms::store::{load_latest, load_room_set, write_room_set};
use rooms::{ConnectionPolicy, RoomRole, RoomSet, WorldConfig, generate_rooms};

type Snapshot = BTreeMap<String, (RoomRole, BTreeSet<String>)>;

/// Names, roles and connection name sets, independent of room index order.
fn snapshot(rooms: &RoomSet) -> Snapshot {
    rooms
        .iter()
        .map(|(id, room)| {
            let connections =
                rooms.connection_names(id).into_iter().map(str::to_string).collect();
            (room.name.clone(), (room.role, connections))
        })
        .collect()
}

#[test]
fn test_written_room_sets_load_back_unchanged() {
    let config = WorldConfig::default();
    for seed in 0..25_u64 {
        let base = tempfile::tempdir().unwrap();
        let generated = generate_rooms(&config, seed).expect("generation should succeed");

        let dir = write_room_set(base.path(), &config.dir_prefix, &generated.rooms).unwrap();
        let loaded = load_room_set(&dir).unwrap();

        assert_eq!(snapshot(&generated.rooms), snapshot(&loaded), "seed {seed} did not round-trip");
        loaded.validate(&config).expect("loaded set keeps its invariants");
    }
}

#[test]
fn test_distinct_policy_round_trips_with_larger_world() {
    let config = WorldConfig {
        room_count: 10,
        max_connections: 9,
        policy: ConnectionPolicy::CountDistinct,
        ..WorldConfig::default()
    };
    let base = tempfile::tempdir().unwrap();
    let generated = generate_rooms(&config, 4242).unwrap();

    write_room_set(base.path(), &config.dir_prefix, &generated.rooms).unwrap();
    let (_, loaded) = load_latest(base.path(), &config.dir_prefix).unwrap();

    assert_eq!(snapshot(&generated.rooms), snapshot(&loaded));
}

#[test]
fn test_same_seed_writes_identical_records() {
    let config = WorldConfig::default();
    let base = tempfile::tempdir().unwrap();

    let first = generate_rooms(&config, 99).unwrap();
    let second = generate_rooms(&config, 99).unwrap();
    let first_dir = write_room_set(base.path(), "rooms", &first.rooms).unwrap();
    let second_dir = write_room_set(base.path(), "rooms", &second.rooms).unwrap();

    for (_, room) in first.rooms.iter() {
        let left = fs::read_to_string(first_dir.join(&room.name)).unwrap();
        let right = fs::read_to_string(second_dir.join(&room.name)).unwrap();
        assert_eq!(left, right, "record for {} differs", room.name);
    }
}
