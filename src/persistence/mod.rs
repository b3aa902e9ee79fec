use crate::Roster;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid roster document: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialization error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Backing storage for a [`Roster`].
///
/// `load_roster` returns `Ok(None)` when nothing has been stored yet, which
/// callers treat as a fresh start rather than a failure.
pub trait RosterStore {
    fn load_roster(&self) -> PersistenceResult<Option<Roster>>;
    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()>;
}

pub mod file;
pub mod memory;

pub use file::{JsonFileStore, load_roster_from_json, save_attendance_to_csv, save_roster_to_json};
pub use memory::MemoryRosterStore;
