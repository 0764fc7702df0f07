//! Background timestamp writer shared with the navigation loop.
//!
//! A single record file holds the last computed time. One writer thread at a
//! time locks the record, stamps "now" into it and releases it. A query waits
//! for that writer, reads the record under the same lock, then starts the
//! next writer so the following query has a fresh value ready.
//!
//! The mutex guards the record; the `JoinHandle` held in `writer` is what
//! keeps a second writer from being spawned while one is outstanding.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local};
use log::debug;

use crate::error::{Error, Result};

pub const TIMESTAMP_FORMAT: &str = "%l:%M%p, %A, %B %d, %Y";

pub type Clock = fn() -> DateTime<Local>;

/// e.g. `1:03PM, Tuesday, March 03, 2026`
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string().trim_start().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeReading {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Source of timestamps for the `time` command.
pub trait TimeQuery {
    fn query_time(&mut self) -> Result<TimeReading>;
}

struct TimeRecord {
    path: PathBuf,
    written_at: Option<DateTime<Local>>,
}

pub struct TimeSideChannel {
    record: Arc<Mutex<TimeRecord>>,
    clock: Clock,
    // Owned through `&mut self`, so at most one writer is ever outstanding.
    writer: Option<JoinHandle<Result<()>>>,
}

impl TimeSideChannel {
    /// Create the channel and start the first writer right away.
    pub fn start(record_path: impl Into<PathBuf>) -> Self {
        Self::with_clock(record_path, Local::now)
    }

    pub fn with_clock(record_path: impl Into<PathBuf>, clock: Clock) -> Self {
        let record = TimeRecord { path: record_path.into(), written_at: None };
        let mut channel = Self { record: Arc::new(Mutex::new(record)), clock, writer: None };
        channel.spawn_writer();
        channel
    }

    pub fn query(&mut self) -> Result<TimeReading> {
        self.await_writer()?;

        let reading = {
            let record = lock(&self.record)?;
            let text =
                fs::read_to_string(&record.path).map_err(|e| Error::io(&record.path, e))?;
            let at = record
                .written_at
                .ok_or_else(|| Error::Invariant("time record read before any write".to_string()))?;
            TimeReading { at, text: text.trim_end().to_string() }
        };

        self.spawn_writer();
        Ok(reading)
    }

    /// Detach any outstanding writer without waiting for it.
    pub fn shutdown(mut self) {
        if self.writer.take().is_some() {
            debug!("detaching outstanding time writer");
        }
    }

    fn spawn_writer(&mut self) {
        debug_assert!(self.writer.is_none(), "a time writer is already outstanding");
        let record = Arc::clone(&self.record);
        let clock = self.clock;
        self.writer = Some(thread::spawn(move || write_time(&record, clock)));
    }

    fn await_writer(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::Invariant("time writer thread panicked".to_string()))?,
            None => Ok(()),
        }
    }
}

impl TimeQuery for TimeSideChannel {
    fn query_time(&mut self) -> Result<TimeReading> {
        self.query()
    }
}

fn lock(record: &Mutex<TimeRecord>) -> Result<MutexGuard<'_, TimeRecord>> {
    record.lock().map_err(|_| Error::Invariant("time record lock poisoned".to_string()))
}

fn write_time(record: &Mutex<TimeRecord>, clock: Clock) -> Result<()> {
    let mut record = lock(record)?;
    let now = clock();
    let text = format_timestamp(&now);
    fs::write(&record.path, format!("{text}\n")).map_err(|e| Error::io(&record.path, e))?;
    record.written_at = Some(now);
    debug!("time record updated: {text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 3, 13, 3, 0).single().expect("unambiguous local time")
    }

    #[test]
    fn formats_twelve_hour_clock_without_padding() {
        assert_eq!(format_timestamp(&fixed_clock()), "1:03PM, Tuesday, March 03, 2026");
    }

    #[test]
    fn query_returns_the_stored_timestamp() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("currentTime.txt");
        let mut channel = TimeSideChannel::with_clock(&path, fixed_clock);

        let reading = channel.query().expect("query");
        assert_eq!(reading.text, "1:03PM, Tuesday, March 03, 2026");
        assert_eq!(reading.at, fixed_clock());

        let stored = fs::read_to_string(&path).expect("record file");
        assert_eq!(stored.lines().count(), 1);
        channel.shutdown();
    }

    #[test]
    fn consecutive_queries_never_go_backwards() {
        let dir = tempdir().expect("tempdir");
        let mut channel = TimeSideChannel::start(dir.path().join("currentTime.txt"));

        let first = channel.query().expect("first query");
        let second = channel.query().expect("second query");
        assert!(!first.text.is_empty());
        assert!(!second.text.is_empty());
        assert!(second.at >= first.at);
        channel.shutdown();
    }

    #[test]
    fn each_query_leaves_exactly_one_writer_outstanding() {
        let dir = tempdir().expect("tempdir");
        let mut channel = TimeSideChannel::with_clock(dir.path().join("t.txt"), fixed_clock);
        assert!(channel.writer.is_some());
        channel.query().expect("query");
        assert!(channel.writer.is_some());
        channel.query().expect("query");
        assert!(channel.writer.is_some());
    }

    #[test]
    fn unwritable_record_surfaces_as_io_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("currentTime.txt");
        let mut channel = TimeSideChannel::with_clock(path, fixed_clock);
        let err = channel.query().expect_err("record directory does not exist");
        assert!(matches!(err, Error::Io { .. }));
    }
}
