//! Error taxonomy shared by the generator, the store and the session.

use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A file or directory could not be created, opened, read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No directory with the room-set prefix exists under `base`.
    #[error(
        "no room set named '{prefix}*' found in {}; run buildrooms before playing",
        base.display()
    )]
    NoRoomSet { base: PathBuf, prefix: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration file is not valid TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("room generation failed: {0}")]
    Generation(String),

    /// Standard input ended before the end room was reached.
    #[error("input closed before the end room was reached")]
    InputClosed,

    /// A structural assumption about a loaded or generated room set does not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}
