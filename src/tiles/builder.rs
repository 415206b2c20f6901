//! Tile rows → named, oriented tile groups.
//!
//! Rows are read in table order (never shuffled, the map geometry depends
//! on it) through a two-state machine:
//!
//! ```text
//!   NoActiveGroup ──named row──▶ BuildingGroup(pending)
//!   BuildingGroup ──named row──▶ BuildingGroup(pending + tile)
//!   BuildingGroup ──empty name / end of input──▶ seal ──▶ NoActiveGroup
//! ```
//!
//! Sealing draws a rotation from {0, 60, ..., 300} degrees. Rows marked in
//! the `Special` column sit outside this flow: they are pooled, and
//! `special_tile_count` of them are drawn afterwards as single-tile groups.
//!
//! A group is named with its label and the index of the row that opened
//! it. Labels ending in a digit can still collide (`Cave1` on row 0 and
//! `Cave` on row 10), so a taken name gets a `#2`, `#3`, ... suffix.

use rustc_hash::FxHashSet;

use super::group::{Tile, TileGroup};
use super::hex::HexCoord;
use crate::core::config::Layout;
use crate::core::rng::GameRng;
use crate::core::transform::Vec2;
use crate::table::{display_text, lookup, HeaderIndex, Row, Table};

pub const COL_NAME: &str = "Name";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_COORDS: &str = "Coords";
pub const COL_GROUP: &str = "Group";
pub const COL_SPECIAL: &str = "Special";

/// Label used when a row leaves the `Group` column empty.
pub const DEFAULT_GROUP_LABEL: &str = "Group";

/// Number of orientations a group can take.
pub const ORIENTATIONS: usize = 6;

/// Degrees between neighbouring orientations.
pub const ORIENTATION_STEP: f32 = 60.0;

/// A group whose terminator has not been seen yet.
#[derive(Debug)]
struct PendingGroup {
    name: String,
    anchor: Vec2,
    tiles: Vec<Tile>,
}

#[derive(Debug)]
enum GroupState {
    NoActiveGroup,
    BuildingGroup(PendingGroup),
}

/// A special row waiting in the pool.
#[derive(Debug)]
struct SpecialRow {
    index: usize,
    label: String,
    tile: Tile,
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "x")
}

fn group_label(row: &Row, header: &HeaderIndex) -> String {
    let label = lookup(row, header, COL_GROUP, "");
    if label.is_empty() {
        DEFAULT_GROUP_LABEL.to_string()
    } else {
        label.to_string()
    }
}

struct GroupBuilder<'a> {
    layout: &'a Layout,
    hex_size: f32,
    rng: &'a mut GameRng,
    state: GroupState,
    groups: Vec<TileGroup>,
    specials: Vec<SpecialRow>,
    taken: FxHashSet<String>,
}

impl<'a> GroupBuilder<'a> {
    fn new(layout: &'a Layout, hex_size: f32, rng: &'a mut GameRng) -> Self {
        Self {
            layout,
            hex_size,
            rng,
            state: GroupState::NoActiveGroup,
            groups: Vec::new(),
            specials: Vec::new(),
            taken: FxHashSet::default(),
        }
    }

    fn claim_name(&mut self, label: &str, index: usize) -> String {
        let base = format!("{}{}", label, index);
        let mut name = base.clone();
        let mut n = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{}#{}", base, n);
            n += 1;
        }
        if n > 2 {
            log::warn!("tile group name `{}` already taken, using `{}`", base, name);
        }
        name
    }

    fn draw_rotation(&mut self) -> f32 {
        self.rng.gen_range_usize(0..ORIENTATIONS) as f32 * ORIENTATION_STEP
    }

    fn seal(&mut self) {
        if let GroupState::BuildingGroup(pending) = std::mem::replace(&mut self.state, GroupState::NoActiveGroup) {
            let rotation = self.draw_rotation();
            let mut group = TileGroup::new(pending.name, pending.anchor);
            group.tiles = pending.tiles;
            group.set_pose(group.position, rotation);
            log::debug!("sealed {} with {} tiles at {} degrees", group.name, group.len(), rotation);
            self.groups.push(group);
        }
    }

    fn feed(&mut self, index: usize, row: &Row, header: &HeaderIndex) {
        let name = lookup(row, header, COL_NAME, "");
        if name.is_empty() {
            self.seal();
            return;
        }

        let raw_coords = lookup(row, header, COL_COORDS, "");
        let description = display_text(lookup(row, header, COL_DESCRIPTION, ""));

        if is_truthy(lookup(row, header, COL_SPECIAL, "")) {
            let coords = HexCoord::parse(raw_coords).unwrap_or_default();
            self.specials.push(SpecialRow {
                index,
                label: group_label(row, header),
                tile: Tile::new(name, description, coords, Vec2::ZERO),
            });
            return;
        }

        let Some(coords) = HexCoord::parse(raw_coords) else {
            log::warn!("tile row {} (`{}`): bad coordinates `{}`, skipped", index, name, raw_coords);
            return;
        };
        let tile = Tile::new(name, description, coords, coords.to_world(self.hex_size));

        if let GroupState::BuildingGroup(pending) = &mut self.state {
            pending.tiles.push(tile);
            return;
        }
        let name = self.claim_name(&group_label(row, header), index);
        self.state = GroupState::BuildingGroup(PendingGroup {
            name,
            anchor: self.layout.group_anchor(self.groups.len()),
            tiles: vec![tile],
        });
    }

    fn draw_specials(&mut self, amount: usize) {
        let pool = std::mem::take(&mut self.specials);
        let mut drawn = self.rng.sample_indices(pool.len(), amount);
        drawn.sort_unstable();

        let mut pool: Vec<Option<SpecialRow>> = pool.into_iter().map(Some).collect();
        for i in drawn {
            let Some(special) = pool[i].take() else { continue };
            let anchor = self.layout.group_anchor(self.groups.len());
            let rotation = self.draw_rotation();
            let name = self.claim_name(&special.label, special.index);
            let mut group = TileGroup::new(name, anchor);
            group.push(special.tile);
            group.set_pose(group.position, rotation);
            self.groups.push(group);
        }
    }

    fn finish(mut self, special_tile_count: usize) -> Vec<TileGroup> {
        self.seal();
        if special_tile_count > self.specials.len() {
            log::warn!(
                "{} special tiles requested but only {} available",
                special_tile_count,
                self.specials.len()
            );
        }
        self.draw_specials(special_tile_count);
        self.groups
    }
}

/// Build every tile group from a Tiles table.
///
/// Group `k` (in sealing order) is anchored at `layout.group_anchor(k)`;
/// drawn special tiles follow the regular groups.
pub fn build_groups(
    table: &Table,
    layout: &Layout,
    hex_size: f32,
    special_tile_count: usize,
    rng: &mut GameRng,
) -> Vec<TileGroup> {
    let header = table.header();
    let mut builder = GroupBuilder::new(layout, hex_size, rng);

    for (index, row) in table.rows().iter().enumerate() {
        if row.is_malformed() {
            log::warn!("tile row {}: unterminated quote, joined to end of line", index);
        }
        builder.feed(index, row, header);
    }

    let groups = builder.finish(special_tile_count);
    log::debug!("built {} tile groups", groups.len());
    groups
}
