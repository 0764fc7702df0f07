//! Flat-file persistence of room sets.
//!
//! A room set is a directory named `<prefix>.<pid>` holding one record file
//! per room, where the file name is the room name. Readers pick the directory
//! with the newest modification time.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::time::SystemTime;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{format_record, parse_record};
use crate::types::{Room, RoomId, RoomSet};

/// Write every room of `rooms` into a fresh `<prefix>.<pid>` directory under
/// `base` and return that directory.
///
/// Failure to create the directory or any record aborts the write; files
/// already written stay on disk.
pub fn write_room_set(base: &Path, prefix: &str, rooms: &RoomSet) -> Result<PathBuf> {
    let dir = create_room_dir(base, prefix)?;
    for (id, room) in rooms.iter() {
        let path = dir.join(&room.name);
        fs::write(&path, format_record(rooms, id)).map_err(|e| Error::io(&path, e))?;
        debug!("wrote room record {}", path.display());
    }
    Ok(dir)
}

fn create_room_dir(base: &Path, prefix: &str) -> Result<PathBuf> {
    let pid = process::id();
    let mut suffix = 0_u32;
    loop {
        let name = if suffix == 0 {
            format!("{prefix}.{pid}")
        } else {
            format!("{prefix}.{pid}.{suffix}")
        };
        let dir = base.join(name);
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(Error::io(&dir, e)),
        }
    }
}

/// Newest directory under `base` whose name starts with `prefix`.
/// Entries with equal modification times resolve to the one listed last.
pub fn find_latest_room_dir(base: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(base).map_err(|e| Error::io(base, e))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(base, e))?;
        if !entry.file_name().to_string_lossy().starts_with(prefix) {
            continue;
        }
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        if !metadata.is_dir() {
            continue;
        }
        let modified = metadata.modified().map_err(|e| Error::io(&path, e))?;
        if latest.as_ref().is_none_or(|(newest, _)| modified >= *newest) {
            latest = Some((modified, path));
        }
    }

    latest.map(|(_, path)| path).ok_or_else(|| Error::NoRoomSet {
        base: base.to_path_buf(),
        prefix: prefix.to_string(),
    })
}

/// Load every record in `dir`. File names are the room names; room indices
/// follow the sorted file names.
pub fn load_room_set(dir: &Path) -> Result<RoomSet> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_file() {
            warn!("ignoring non-file entry {}", entry.path().display());
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut parsed = Vec::with_capacity(names.len());
    for name in &names {
        let path = dir.join(name);
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        parsed.push(parse_record(&text, &names));
    }

    let mut rooms = RoomSet::new(
        names.iter().zip(&parsed).map(|(name, record)| Room::new(name, record.role)).collect(),
    );
    for (index, record) in parsed.iter().enumerate() {
        for &other in &record.connections {
            rooms.connect(RoomId(index), RoomId(other));
        }
    }

    info!("loaded {} rooms from {}", rooms.len(), dir.display());
    Ok(rooms)
}

pub fn load_latest(base: &Path, prefix: &str) -> Result<(PathBuf, RoomSet)> {
    let dir = find_latest_room_dir(base, prefix)?;
    let rooms = load_room_set(&dir)?;
    Ok((dir, rooms))
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;
    use crate::types::RoomRole;

    fn set_mtime(path: &Path, seconds: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(seconds);
        File::open(path).expect("open dir").set_modified(time).expect("set mtime");
    }

    fn small_set() -> RoomSet {
        let mut rooms = RoomSet::new(vec![
            Room::new("desert", RoomRole::Start),
            Room::new("shop", RoomRole::Mid),
            Room::new("castle", RoomRole::End),
        ]);
        rooms.connect(RoomId(0), RoomId(1));
        rooms.connect(RoomId(1), RoomId(2));
        rooms
    }

    #[test]
    fn write_creates_one_file_per_room() {
        let base = tempdir().expect("tempdir");
        let dir = write_room_set(base.path(), "rooms", &small_set()).expect("write");

        let dir_name = dir.file_name().expect("dir name").to_string_lossy().into_owned();
        assert_eq!(dir_name, format!("rooms.{}", process::id()));
        for name in ["desert", "shop", "castle"] {
            assert!(dir.join(name).is_file(), "missing record for {name}");
        }
        let shop = fs::read_to_string(dir.join("shop")).expect("read shop");
        assert!(shop.contains("CONNECTION 2: castle"));
    }

    #[test]
    fn second_write_in_one_process_gets_a_distinct_directory() {
        let base = tempdir().expect("tempdir");
        let first = write_room_set(base.path(), "rooms", &small_set()).expect("first write");
        let second = write_room_set(base.path(), "rooms", &small_set()).expect("second write");
        assert_ne!(first, second);
    }

    #[test]
    fn finds_the_most_recently_modified_directory() {
        let base = tempdir().expect("tempdir");
        for (name, seconds) in [("rooms.10", 1_000), ("rooms.20", 3_000), ("rooms.30", 2_000)] {
            let path = base.path().join(name);
            fs::create_dir(&path).expect("mkdir");
            set_mtime(&path, seconds);
        }
        let unrelated = base.path().join("other.40");
        fs::create_dir(&unrelated).expect("mkdir");
        set_mtime(&unrelated, 9_000);
        fs::write(base.path().join("rooms.toml"), "").expect("write file");

        let latest = find_latest_room_dir(base.path(), "rooms").expect("latest");
        assert_eq!(latest, base.path().join("rooms.20"));
    }

    #[test]
    fn equal_mtimes_resolve_to_the_last_listed_directory() {
        let base = tempdir().expect("tempdir");
        for name in ["rooms.1", "rooms.2", "rooms.3", "rooms.4"] {
            let path = base.path().join(name);
            fs::create_dir(&path).expect("mkdir");
            set_mtime(&path, 5_000);
        }
        let listed_last = fs::read_dir(base.path())
            .expect("list base")
            .map(|entry| entry.expect("entry").path())
            .last()
            .expect("at least one entry");

        let latest = find_latest_room_dir(base.path(), "rooms").expect("latest");
        assert_eq!(latest, listed_last);
    }

    #[test]
    fn write_into_a_missing_base_is_an_io_error() {
        let base = tempdir().expect("tempdir");
        let missing = base.path().join("absent");
        let err = write_room_set(&missing, "rooms", &small_set()).expect_err("no base dir");
        assert!(matches!(err, Error::Io { .. }), "unexpected error: {err}");
        assert!(!missing.exists());
    }

    #[test]
    fn write_under_a_regular_file_is_an_io_error() {
        let base = tempdir().expect("tempdir");
        let file = base.path().join("not-a-dir");
        fs::write(&file, "").expect("write file");
        let err = write_room_set(&file, "rooms", &small_set()).expect_err("base is a file");
        assert!(matches!(err, Error::Io { .. }), "unexpected error: {err}");
    }

    #[test]
    fn missing_room_set_is_reported() {
        let base = tempdir().expect("tempdir");
        let err = find_latest_room_dir(base.path(), "rooms").expect_err("nothing to find");
        assert!(matches!(err, Error::NoRoomSet { .. }));
        assert!(err.to_string().contains("buildrooms"));
    }

    #[test]
    fn load_resolves_connections_by_file_name() {
        let base = tempdir().expect("tempdir");
        let dir = write_room_set(base.path(), "rooms", &small_set()).expect("write");
        let loaded = load_room_set(&dir).expect("load");

        let names: Vec<&str> = loaded.iter().map(|(_, room)| room.name.as_str()).collect();
        assert_eq!(names, vec!["castle", "desert", "shop"]);

        let shop = loaded.find_by_name("shop").expect("shop");
        let mut connected = loaded.connection_names(shop);
        connected.sort();
        assert_eq!(connected, vec!["castle", "desert"]);
        assert_eq!(loaded.room(loaded.start_room().expect("start")).name, "desert");
        assert_eq!(loaded.room(loaded.end_room().expect("end")).name, "castle");
    }

    #[test]
    fn load_latest_returns_the_directory_it_used() {
        let base = tempdir().expect("tempdir");
        let dir = write_room_set(base.path(), "rooms", &small_set()).expect("write");
        let (found, rooms) = load_latest(base.path(), "rooms").expect("load latest");
        assert_eq!(found, dir);
        assert_eq!(rooms.len(), 3);
    }

    #[test]
    fn unreadable_directory_is_an_io_error() {
        let base = tempdir().expect("tempdir");
        let err = load_room_set(&base.path().join("rooms.missing")).expect_err("missing dir");
        assert!(matches!(err, Error::Io { .. }));
    }
}
