//! Name-keyed position persistence.
//!
//! ## Key Types
//!
//! - `SaveSnapshot`: Every saved transform, grouped into file blocks
//! - `SaveLayout`: Which blocks the live tabletop writes, and the preferred
//!   reading of a save whose mine or starting blocks changed
//! - `MatchPool`: Which saved blocks a live entity can draw its position from
//! - `NameQueues`: Per-name FIFO of saved positions used for reconciliation
//! - `RestoreReport`: What a load applied, discarded and left at defaults
//! - `SaveSlot`: One save file with atomic, non-overlapping writes
//! - `Autosave` / `AutosaveWorker`: Interval and shutdown save drivers
//!
//! Persistence never creates or removes entities. It reads transforms for
//! saving and overwrites them when restoring.

pub mod autosave;
pub mod codec;
pub mod error;
pub mod reconcile;
pub mod slot;

pub use autosave::{Autosave, AutosaveWorker};
pub use codec::{decode, encode, BlockKey, GroupSaveRecord, MatchPool, SaveLayout, SaveRecord, SaveSnapshot};
pub use error::PersistenceError;
pub use reconcile::{apply_group_poses, apply_loaded_positions, restore, NameQueues, RestoreReport};
pub use slot::{SaveOutcome, SaveSlot, SaveTrigger};
