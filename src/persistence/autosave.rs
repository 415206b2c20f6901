//! Periodic and shutdown saves.
//!
//! Two drivers share one save path (`SaveSlot::write`):
//!
//! - `Autosave` is cooperative. The host calls `tick` from its own loop
//!   with the time since the last call, and `shutdown` on exit.
//! - `AutosaveWorker` owns a thread that wakes every interval, snapshots a
//!   shared `Tabletop` under its mutex, releases the lock and writes.
//!   Dropping or shutting it down performs the final save.
//!
//! Only the snapshot is taken under the tabletop lock; encoding of the
//! snapshot and the file write happen after it is released.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::error::PersistenceError;
use super::slot::{SaveOutcome, SaveSlot, SaveTrigger};
use crate::core::state::Tabletop;

/// Cooperative autosave timer.
#[derive(Debug)]
pub struct Autosave {
    slot: SaveSlot,
    interval: Duration,
    elapsed: Duration,
}

impl Autosave {
    #[must_use]
    pub fn new(slot: SaveSlot, interval: Duration) -> Self {
        Self {
            slot,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Timer at the cadence configured for `tabletop`.
    #[must_use]
    pub fn for_tabletop(slot: SaveSlot, tabletop: &Tabletop) -> Self {
        Self::new(slot, tabletop.config().autosave_interval())
    }

    #[must_use]
    pub fn slot(&self) -> &SaveSlot {
        &self.slot
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advance the timer by `dt`; save when the interval has elapsed.
    ///
    /// Returns whether a save was written. Several intervals passing in
    /// one tick still produce a single save.
    pub fn tick(&mut self, dt: Duration, tabletop: &Tabletop) -> Result<bool, PersistenceError> {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return Ok(false);
        }
        self.elapsed = Duration::ZERO;

        let outcome = self.slot.save(&tabletop.snapshot(), SaveTrigger::Periodic)?;
        Ok(outcome.was_written())
    }

    /// Final save, regardless of the timer.
    pub fn shutdown(self, tabletop: &Tabletop) -> Result<(), PersistenceError> {
        self.slot.save(&tabletop.snapshot(), SaveTrigger::Shutdown)?;
        log::info!("shutdown save written to {}", self.slot.path().display());
        Ok(())
    }
}

fn save_shared(tabletop: &Mutex<Tabletop>, slot: &SaveSlot, trigger: SaveTrigger) -> Result<SaveOutcome, PersistenceError> {
    let snapshot = tabletop.lock().unwrap_or_else(PoisonError::into_inner).snapshot();
    slot.save(&snapshot, trigger)
}

/// Autosave on a background thread.
#[derive(Debug)]
pub struct AutosaveWorker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<Result<(), PersistenceError>>>,
}

impl AutosaveWorker {
    /// Start saving `tabletop` to `slot` every `interval`.
    pub fn spawn(tabletop: Arc<Mutex<Tabletop>>, slot: SaveSlot, interval: Duration) -> Result<Self, PersistenceError> {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("autosave".into())
            .spawn(move || {
                log::info!("autosave to {} every {:?}", slot.path().display(), interval);
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if let Err(e) = save_shared(&tabletop, &slot, SaveTrigger::Periodic) {
                                log::warn!("periodic save failed: {}", e);
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                save_shared(&tabletop, &slot, SaveTrigger::Shutdown)?;
                log::info!("autosave stopped, final save written to {}", slot.path().display());
                Ok(())
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Start saving at the cadence configured for `tabletop`.
    pub fn spawn_configured(tabletop: Arc<Mutex<Tabletop>>, slot: SaveSlot) -> Result<Self, PersistenceError> {
        let interval = tabletop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .config()
            .autosave_interval();
        Self::spawn(tabletop, slot, interval)
    }

    /// Stop the timer, write the final save and wait for it.
    pub fn shutdown(mut self) -> Result<(), PersistenceError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<(), PersistenceError> {
        if let Some(stop) = self.stop.take() {
            // A worker that already exited has dropped its receiver.
            let _ = stop.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| PersistenceError::WorkerPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for AutosaveWorker {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            log::warn!("final autosave failed: {}", e);
        }
    }
}
