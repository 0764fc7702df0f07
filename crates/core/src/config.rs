//! World configuration shared by the generator and the adventure session.
//!
//! Every field has a default, so an absent config file reproduces the classic
//! seven-room layout. A TOML file may override any subset of fields.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_ROOM_COUNT: usize = 7;
pub const DEFAULT_MIN_CONNECTIONS: usize = 3;
pub const DEFAULT_MAX_CONNECTIONS: usize = 6;
pub const DEFAULT_DIR_PREFIX: &str = "rooms";
pub const DEFAULT_TIME_FILE: &str = "currentTime.txt";

pub const DEFAULT_NAME_POOL: [&str; 10] =
    ["desert", "shop", "castle", "field", "forest", "village", "mountain", "temple", "lake", "valley"];

/// How the generator decides that a room has "enough" connections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPolicy {
    /// Each room makes exactly `min_connections` draws; a draw that hits an
    /// existing edge still counts. Distinct degree may end below the minimum.
    #[default]
    CountAttempts,
    /// Draws continue until the room has `min_connections` distinct edges.
    CountDistinct,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub room_count: usize,
    pub min_connections: usize,
    pub max_connections: usize,
    pub name_pool: Vec<String>,
    pub dir_prefix: String,
    pub time_file: PathBuf,
    pub policy: ConnectionPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            name_pool: DEFAULT_NAME_POOL.iter().map(|name| name.to_string()).collect(),
            dir_prefix: DEFAULT_DIR_PREFIX.to_string(),
            time_file: PathBuf::from(DEFAULT_TIME_FILE),
            policy: ConnectionPolicy::default(),
        }
    }
}

impl WorldConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// `load` when a path is given, otherwise the validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.room_count < 2 {
            return Err(Error::Config(format!(
                "room_count must be at least 2, got {}",
                self.room_count
            )));
        }
        if self.room_count > self.name_pool.len() {
            return Err(Error::Config(format!(
                "room_count {} exceeds the name pool size {}",
                self.room_count,
                self.name_pool.len()
            )));
        }

        let mut seen = BTreeSet::new();
        for name in &self.name_pool {
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\')
            {
                return Err(Error::Config(format!("room name '{name}' cannot be used as a file name")));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("room name '{name}' appears twice in the pool")));
            }
        }

        if self.min_connections == 0 {
            return Err(Error::Config("min_connections must be at least 1".to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(Error::Config(format!(
                "min_connections {} exceeds max_connections {}",
                self.min_connections, self.max_connections
            )));
        }
        if self.max_connections > self.room_count - 1 {
            return Err(Error::Config(format!(
                "max_connections {} exceeds the {} other rooms available",
                self.max_connections,
                self.room_count - 1
            )));
        }
        if self.dir_prefix.is_empty() || self.dir_prefix.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "dir_prefix '{}' must be a plain, non-empty name",
                self.dir_prefix
            )));
        }
        Ok(())
    }
}
