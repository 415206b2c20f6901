//! Binary save format.
//!
//! A save is a sequence of blocks with no header:
//!
//! ```text
//! Equipment | Utility | Resource | Monster | [Mine] | Starting 0..N | Player 0..P | Tile groups
//! ```
//!
//! Every card block is an `i32` count followed by that many
//! `(name, x, y, z)` records; the tile-group block is an `i32` count
//! followed by `(name, x, y, z, rotation_z)` records. Integers and floats
//! are little-endian fixed width, strings are a `u64` byte length followed
//! by UTF-8 (bincode with fixint encoding).
//!
//! The format carries no block directory. The four fixed category
//! blocks always lead. After them come a variable number of card blocks
//! (mine, one per starting deck, one per player) and the tile-group block
//! last. Adding or removing mines or starting-hand records between sessions
//! changes how many variable blocks there are, so the reader tries every
//! split that leaves exactly one tile-group block and prefers the count the
//! live `SaveLayout` expects.
//!
//! Variable blocks share one record shape and can't be told apart once
//! their number changes. They are matched as a single pool
//! ([`MatchPool::Variable`]), where names alone pick the live entity.

use std::fmt;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::PersistenceError;
use crate::cards::{CardEntity, Category, Placement};
use crate::core::player::PlayerId;
use crate::core::transform::Position;
use crate::tiles::TileGroup;

/// One card's saved transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SaveRecord {
    #[must_use]
    pub fn of(entity: &CardEntity) -> Self {
        Self {
            name: entity.name.clone(),
            x: entity.position.x,
            y: entity.position.y,
            z: entity.position.z,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// One tile group's saved pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSaveRecord {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_z: f32,
}

impl GroupSaveRecord {
    #[must_use]
    pub fn of(group: &TileGroup) -> Self {
        Self {
            name: group.name.clone(),
            x: group.position.x,
            y: group.position.y,
            z: group.position.z,
            rotation_z: group.rotation_z,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// Identifies a card block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKey {
    /// Shared copies of one category.
    Category(Category),
    /// The starting-hand deck with this creation index.
    Starting(usize),
    /// One player's copies.
    Player(PlayerId),
}

impl BlockKey {
    /// Whether `entity` is saved in this block.
    #[must_use]
    pub fn contains(self, entity: &CardEntity) -> bool {
        match self {
            BlockKey::Category(category) => entity.category == category && entity.is_shared(),
            BlockKey::Starting(i) => entity.placement == Placement::Starting(i),
            BlockKey::Player(p) => entity.placement == Placement::PerPlayer(p),
        }
    }

    /// Pool this block's records are matched in.
    #[must_use]
    pub fn pool(self) -> MatchPool {
        match self {
            BlockKey::Category(Category::Mine) | BlockKey::Starting(_) | BlockKey::Player(_) => MatchPool::Variable,
            BlockKey::Category(category) => MatchPool::Shared(category),
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKey::Category(c) => write!(f, "{}", c),
            BlockKey::Starting(i) => write!(f, "starting {}", i),
            BlockKey::Player(p) => write!(f, "{}", p),
        }
    }
}

/// Where saved records look for their live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchPool {
    /// Shared copies of a category with a fixed block.
    Shared(Category),
    /// Mine, starting-hand and per-player copies, across all their blocks.
    Variable,
}

impl MatchPool {
    /// Every pool. Each entity belongs to exactly one.
    pub const ALL: [MatchPool; 5] = [
        MatchPool::Shared(Category::Equipment),
        MatchPool::Shared(Category::Utility),
        MatchPool::Shared(Category::Resource),
        MatchPool::Shared(Category::Monster),
        MatchPool::Variable,
    ];

    #[must_use]
    pub fn contains(self, entity: &CardEntity) -> bool {
        match self {
            MatchPool::Shared(category) => entity.category == category && entity.is_shared(),
            MatchPool::Variable => !entity.is_shared() || entity.category == Category::Mine,
        }
    }
}

impl fmt::Display for MatchPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPool::Shared(c) => write!(f, "{}", c),
            MatchPool::Variable => write!(f, "mine, starting and player decks"),
        }
    }
}

/// Which card blocks a save contains, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveLayout {
    pub has_mines: bool,
    pub starting_decks: usize,
    pub player_count: usize,
}

impl SaveLayout {
    #[must_use]
    pub const fn new(has_mines: bool, starting_decks: usize, player_count: usize) -> Self {
        Self {
            has_mines,
            starting_decks,
            player_count,
        }
    }

    /// Category blocks every save starts with.
    pub fn fixed_blocks() -> impl Iterator<Item = BlockKey> {
        Category::ALL
            .into_iter()
            .filter(|c| *c != Category::Mine)
            .map(BlockKey::Category)
    }

    /// Mine, starting and player blocks, in file order.
    #[must_use]
    pub fn variable_blocks(&self) -> Vec<BlockKey> {
        let mine = self.has_mines.then_some(BlockKey::Category(Category::Mine));
        let starting = (0..self.starting_decks).map(BlockKey::Starting);
        let players = PlayerId::all(self.player_count).map(BlockKey::Player);

        mine.into_iter().chain(starting).chain(players).collect()
    }

    /// Card blocks in file order. The tile-group block always follows.
    #[must_use]
    pub fn blocks(&self) -> Vec<BlockKey> {
        Self::fixed_blocks().chain(self.variable_blocks()).collect()
    }

    /// Labels for `count` variable blocks read from a save.
    ///
    /// Exact when `count` is what this layout expects. Otherwise the last
    /// blocks are taken as players and the rest as starting decks; the
    /// guess only shows up in logs, since the pool is matched by name.
    fn label_variable(&self, count: usize) -> Vec<BlockKey> {
        let expected = self.variable_blocks();
        if expected.len() == count {
            return expected;
        }
        let players = count.min(self.player_count);
        (0..count - players)
            .map(BlockKey::Starting)
            .chain(PlayerId::all(players).map(BlockKey::Player))
            .collect()
    }
}

/// Every saved transform of a session, grouped by block.
///
/// Produced by [`SaveSnapshot::capture`] for writing and by [`decode`] for
/// reading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveSnapshot {
    pub blocks: Vec<(BlockKey, Vec<SaveRecord>)>,
    pub groups: Vec<GroupSaveRecord>,
}

impl SaveSnapshot {
    /// Point-in-time copy of every transform.
    ///
    /// `entities` must be in creation order; block members keep that order.
    #[must_use]
    pub fn capture(entities: &[CardEntity], groups: &[TileGroup], layout: &SaveLayout) -> Self {
        let blocks = layout
            .blocks()
            .into_iter()
            .map(|key| {
                let records = entities.iter().filter(|e| key.contains(e)).map(SaveRecord::of).collect();
                (key, records)
            })
            .collect();

        Self {
            blocks,
            groups: groups.iter().map(GroupSaveRecord::of).collect(),
        }
    }

    /// Number of card records across all blocks.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.blocks.iter().map(|(_, records)| records.len()).sum()
    }
}

fn write_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn read_options(limit: u64) -> impl Options {
    write_options().with_limit(limit)
}

fn write_block<T: Serialize>(out: &mut Vec<u8>, block: &dyn fmt::Display, records: &[T]) -> Result<(), PersistenceError> {
    let count = i32::try_from(records.len()).map_err(|_| PersistenceError::CountOverflow {
        block: block.to_string(),
        count: records.len(),
    })?;

    let encode = |e: bincode::Error| PersistenceError::Encode(e.to_string());
    write_options().serialize_into(&mut *out, &count).map_err(encode)?;
    for record in records {
        write_options().serialize_into(&mut *out, record).map_err(encode)?;
    }
    Ok(())
}

fn read_block<T: DeserializeOwned>(
    reader: &mut &[u8],
    limit: u64,
    block: &dyn fmt::Display,
) -> Result<Vec<T>, PersistenceError> {
    let count: i32 = read_options(limit).deserialize_from(&mut *reader)?;
    if count < 0 {
        return Err(PersistenceError::NegativeCount {
            block: block.to_string(),
            count,
        });
    }

    let mut records = Vec::new();
    for _ in 0..count {
        records.push(read_options(limit).deserialize_from(&mut *reader)?);
    }
    Ok(records)
}

const GROUP_BLOCK: &str = "tile groups";
const VARIABLE_BLOCK: &str = "card block";

/// Serialize a snapshot.
pub fn encode(snapshot: &SaveSnapshot) -> Result<Vec<u8>, PersistenceError> {
    let mut bytes = Vec::new();
    for (key, records) in &snapshot.blocks {
        write_block(&mut bytes, key, records)?;
    }
    write_block(&mut bytes, &GROUP_BLOCK, &snapshot.groups)?;
    Ok(bytes)
}

/// The tile-group block, which must end the input.
fn read_group_tail(mut reader: &[u8], limit: u64) -> Result<Vec<GroupSaveRecord>, PersistenceError> {
    let groups = read_block(&mut reader, limit, &GROUP_BLOCK)?;
    if !reader.is_empty() {
        return Err(PersistenceError::TrailingBytes(reader.len()));
    }
    Ok(groups)
}

/// Read a save with exactly the blocks `layout` names.
fn decode_exact(bytes: &[u8], layout: &SaveLayout) -> Result<SaveSnapshot, PersistenceError> {
    let limit = bytes.len() as u64;
    let mut reader = bytes;

    let mut blocks = Vec::new();
    for key in layout.blocks() {
        let records = read_block(&mut reader, limit, &key)?;
        blocks.push((key, records));
    }
    let groups = read_group_tail(reader, limit)?;
    Ok(SaveSnapshot { blocks, groups })
}

/// Read a save, using `layout` to settle how many variable blocks it holds.
///
/// Fails on truncated or corrupt input, and when no number of variable
/// blocks leaves exactly one tile-group block at the end; nothing is
/// returned unless the whole blob decoded. Among several fitting splits the
/// one closest to `layout` wins.
pub fn decode(bytes: &[u8], layout: &SaveLayout) -> Result<SaveSnapshot, PersistenceError> {
    let limit = bytes.len() as u64;
    let mut reader = bytes;

    let mut blocks = Vec::new();
    for key in SaveLayout::fixed_blocks() {
        let records = read_block(&mut reader, limit, &key)?;
        blocks.push((key, records));
    }

    // (variable blocks before it, tile groups) for every split that fits.
    let mut variable: Vec<Vec<SaveRecord>> = Vec::new();
    let mut splits = Vec::new();
    loop {
        if let Ok(groups) = read_group_tail(reader, limit) {
            splits.push((variable.len(), groups));
        }
        match read_block(&mut reader, limit, &VARIABLE_BLOCK) {
            Ok(records) => variable.push(records),
            Err(_) => break,
        }
    }

    let expected = layout.variable_blocks().len();
    let Some((count, groups)) = splits.into_iter().min_by_key(|(n, _)| n.abs_diff(expected)) else {
        // Report what went wrong against the layout the caller expected.
        return Err(decode_exact(bytes, layout)
            .err()
            .unwrap_or_else(|| PersistenceError::Decode("no block split fits the save".to_string())));
    };
    if count != expected {
        log::debug!("save holds {} variable card blocks, tabletop has {}", count, expected);
    }

    variable.truncate(count);
    blocks.extend(layout.label_variable(count).into_iter().zip(variable));
    Ok(SaveSnapshot { blocks, groups })
}
