//! Where raw table text comes from.
//!
//! The tabletop only ever sees already-loaded text. Hosts hand it over
//! through a `TableSource`; two are provided here, one backed by memory
//! and one by a directory of exported `.csv` files.

use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The content tables the game is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Equipment,
    Utility,
    Resources,
    Monsters,
    Mines,
    Tiles,
}

impl TableKind {
    /// Every table, in load order.
    pub const ALL: [TableKind; 6] = [
        TableKind::Equipment,
        TableKind::Utility,
        TableKind::Resources,
        TableKind::Monsters,
        TableKind::Mines,
        TableKind::Tiles,
    ];

    /// Sheet name, also used as the file stem on disk.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            TableKind::Equipment => "Equipment",
            TableKind::Utility => "Utility",
            TableKind::Resources => "Resources",
            TableKind::Monsters => "Monsters",
            TableKind::Mines => "Mines",
            TableKind::Tiles => "Tiles",
        }
    }

    /// Mines is the only table a session can run without.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, TableKind::Mines)
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Supplier of raw table text.
pub trait TableSource {
    /// Full text of `kind`, or `None` if this source does not have it.
    fn raw_text(&self, kind: TableKind) -> Option<String>;
}

/// Tables held in memory.
///
/// ```
/// use depths_tabletop::table::{InMemoryTables, TableKind, TableSource};
///
/// let tables = InMemoryTables::new().with(TableKind::Utility, "Name,Count\nRope,2\n");
/// assert!(tables.raw_text(TableKind::Utility).is_some());
/// assert!(tables.raw_text(TableKind::Mines).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryTables {
    tables: FxHashMap<TableKind, String>,
}

impl InMemoryTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: TableKind, text: impl Into<String>) -> Self {
        self.insert(kind, text);
        self
    }

    pub fn insert(&mut self, kind: TableKind, text: impl Into<String>) {
        self.tables.insert(kind, text.into());
    }
}

impl TableSource for InMemoryTables {
    fn raw_text(&self, kind: TableKind) -> Option<String> {
        self.tables.get(&kind).cloned()
    }
}

/// Tables read from `<root>/<Sheet>.csv`.
#[derive(Clone, Debug)]
pub struct DirectoryTables {
    root: PathBuf,
}

impl DirectoryTables {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a table is read from.
    #[must_use]
    pub fn path_for(&self, kind: TableKind) -> PathBuf {
        self.root.join(format!("{}.csv", kind.sheet_name()))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TableSource for DirectoryTables {
    fn raw_text(&self, kind: TableKind) -> Option<String> {
        let path = self.path_for(kind);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("failed to read table {} from {}: {}", kind, path.display(), e);
                None
            }
        }
    }
}
