//! # depths-tabletop
//!
//! Table-driven setup and position persistence for the Depths tabletop
//! card game.
//!
//! ## Design Principles
//!
//! 1. **Columns by Name**: Every table cell is read through its header
//!    name with an explicit default. Column order and extra columns never
//!    matter.
//!
//! 2. **Bad Rows Are Skipped, Not Fatal**: A row with a missing or
//!    non-numeric required field produces no cards. An unreadable save
//!    leaves every default position in place.
//!
//! 3. **Names Are the Join Key**: Decks are reshuffled every run, so saved
//!    positions are matched to live entities by name, first-in first-out.
//!
//! 4. **Deterministic Under a Seed**: All randomness flows from one
//!    `GameRng`, split into per-purpose streams.
//!
//! ## Modules
//!
//! - `core`: IDs, players, RNG, geometry, `SessionConfig`, `Tabletop`
//! - `table`: Quote-aware row parsing and header lookup
//! - `cards`: Category rules, card records and live entities
//! - `decks`: Shuffling and stacking into the main, side, mine, starting
//!   and player decks
//! - `tiles`: Hex tiles grouped into rotated, named clusters
//! - `persistence`: Binary save format, reconciliation, save slots and
//!   autosave
//!
//! ```
//! use depths_tabletop::{InMemoryTables, SessionConfig, Tabletop, TableKind};
//!
//! let tables = InMemoryTables::new()
//!     .with(TableKind::Resources, "Name,Gold,Count\nCopper,1,3\n")
//!     .with(TableKind::Tiles, "Name,Coords\nEntrance,\"0,0\"\n");
//!
//! let tabletop = Tabletop::build(SessionConfig::new(2).with_seed(7), &tables).unwrap();
//! assert_eq!(tabletop.decks().main.len(), 3);
//! assert_eq!(tabletop.groups()[0].name, "Group0");
//! ```

pub mod cards;
pub mod core;
pub mod decks;
pub mod persistence;
pub mod table;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, EntityId, GameRng, Layout, PlayerId, PlayerMap, Position, SessionConfig, Tabletop, Vec2,
};

pub use crate::cards::{CardEntity, CardRecord, Category, Placement, ReplicationPlan};

pub use crate::decks::{Deck, DeckKind, DeckSet};

pub use crate::table::{DirectoryTables, FieldError, InMemoryTables, Row, Table, TableKind, TableSource};

pub use crate::tiles::{HexCoord, Tile, TileGroup};

pub use crate::persistence::{Autosave, AutosaveWorker, PersistenceError, RestoreReport, SaveSlot};
