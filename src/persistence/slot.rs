//! A save slot: one file on disk plus the lock that keeps writes apart.
//!
//! Writes go to `<file>.tmp` next to the slot and are renamed over it, so
//! a reader never sees half a save. Clones of a `SaveSlot` share the write
//! lock; at most one write is in flight per slot.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use super::codec::{self, SaveLayout, SaveSnapshot};
use super::error::PersistenceError;

/// What asked for a save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Interval timer. Skipped if another save is in flight.
    Periodic,
    /// Process exit. Waits for any in-flight save, then writes.
    Shutdown,
}

/// Result of a save request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was replaced with this many bytes.
    Written(usize),
    /// A periodic save found another in flight and was dropped.
    Coalesced,
}

impl SaveOutcome {
    #[must_use]
    pub fn was_written(self) -> bool {
        matches!(self, SaveOutcome::Written(_))
    }
}

/// A save file location.
#[derive(Clone, Debug)]
pub struct SaveSlot {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl SaveSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file a save is staged in before the rename.
    #[must_use]
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("save"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Encode and write a snapshot.
    pub fn save(&self, snapshot: &SaveSnapshot, trigger: SaveTrigger) -> Result<SaveOutcome, PersistenceError> {
        let bytes = codec::encode(snapshot)?;
        self.write(&bytes, trigger)
    }

    /// Write already-encoded bytes. Every save, whatever its trigger, ends here.
    pub fn write(&self, bytes: &[u8], trigger: SaveTrigger) -> Result<SaveOutcome, PersistenceError> {
        let _guard = match trigger {
            SaveTrigger::Shutdown => self.write_lock.lock().unwrap_or_else(PoisonError::into_inner),
            SaveTrigger::Periodic => match self.write_lock.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    log::debug!("save to {} already in flight, skipping tick", self.path.display());
                    return Ok(SaveOutcome::Coalesced);
                }
            },
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &self.path)?;

        log::debug!("{:?} save: {} bytes to {}", trigger, bytes.len(), self.path.display());
        Ok(SaveOutcome::Written(bytes.len()))
    }

    /// Raw bytes of the slot.
    pub fn read(&self) -> Result<Vec<u8>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PersistenceError::Missing(self.path.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and decode the slot.
    pub fn load(&self, layout: &SaveLayout) -> Result<SaveSnapshot, PersistenceError> {
        codec::decode(&self.read()?, layout)
    }

    /// Whether a save file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
