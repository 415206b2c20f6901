//! Tiles and the named groups that carry them.
//!
//! A `TileGroup` is the unit the player moves and the unit persistence
//! restores: one anchor position and one rotation about Z. Member tiles
//! store only their local offset; their world positions follow from the
//! group pose. Tiles themselves never rotate, so their content stays
//! upright however the group boundary is turned.

use serde::{Deserialize, Serialize};

use super::hex::HexCoord;
use crate::core::transform::{Position, Vec2};

/// A hex tile inside a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub name: String,
    pub description: String,
    pub coords: HexCoord,

    /// Offset from the group anchor before group rotation.
    pub offset: Vec2,

    /// World position, derived from the group pose.
    pub position: Vec2,

    /// Tile orientation in degrees. Always identity after any group pose change.
    pub rotation_z: f32,
}

impl Tile {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, coords: HexCoord, offset: Vec2) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            coords,
            offset,
            position: offset,
            rotation_z: 0.0,
        }
    }
}

/// A named cluster of tiles with a shared anchor and orientation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGroup {
    /// Unique across the session; persistence matches on it.
    pub name: String,

    /// Anchor in world space. `z` is carried through saves untouched.
    pub position: Position,

    /// Rotation about Z in degrees.
    pub rotation_z: f32,

    pub tiles: Vec<Tile>,
}

impl TileGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, anchor: Vec2) -> Self {
        Self {
            name: name.into(),
            position: Position::on_plane(anchor, 0.0),
            rotation_z: 0.0,
            tiles: Vec::new(),
        }
    }

    /// Append a tile and place it against the current pose.
    pub fn push(&mut self, mut tile: Tile) {
        tile.position = self.world_of(tile.offset);
        tile.rotation_z = 0.0;
        self.tiles.push(tile);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// World position of a point given relative to the anchor.
    #[must_use]
    pub fn world_of(&self, offset: Vec2) -> Vec2 {
        self.position.planar() + offset.rotated(self.rotation_z)
    }

    /// Move and turn the group, then re-place every tile.
    pub fn set_pose(&mut self, position: Position, rotation_z: f32) {
        self.position = position;
        self.rotation_z = rotation_z;
        self.refresh_tiles();
    }

    /// Recompute tile world positions and snap tile rotations to identity.
    pub fn refresh_tiles(&mut self) {
        let anchor = self.position.planar();
        let rotation = self.rotation_z;
        for tile in &mut self.tiles {
            tile.position = anchor + tile.offset.rotated(rotation);
            tile.rotation_z = 0.0;
        }
    }

    /// Tile names in insertion order.
    pub fn tile_names(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(|t| t.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_push_places_at_anchor_plus_offset() {
        let mut group = TileGroup::new("Group0", Vec2::new(10.0, 5.0));
        group.push(Tile::new("Cave", "", HexCoord::new(0, 0), Vec2::new(1.0, 0.0)));

        assert_eq!(group.len(), 1);
        assert!(close(group.tiles[0].position, Vec2::new(11.0, 5.0)));
    }

    #[test]
    fn test_set_pose_rotates_offsets_not_tiles() {
        let mut group = TileGroup::new("Group0", Vec2::ZERO);
        group.push(Tile::new("Cave", "", HexCoord::new(1, 0), Vec2::new(1.0, 0.0)));
        group.tiles[0].rotation_z = 45.0;

        group.set_pose(Position::new(2.0, 2.0, 0.5), 90.0);

        let tile = &group.tiles[0];
        assert!(close(tile.position, Vec2::new(2.0, 3.0)));
        assert_eq!(tile.rotation_z, 0.0);
        assert_eq!(group.position.z, 0.5);
    }

    #[test]
    fn test_tile_names() {
        let mut group = TileGroup::new("Group3", Vec2::ZERO);
        group.push(Tile::new("B", "", HexCoord::new(0, 0), Vec2::ZERO));
        group.push(Tile::new("C", "", HexCoord::new(0, 1), Vec2::ZERO));
        assert_eq!(group.tile_names().collect::<Vec<_>>(), vec!["B", "C"]);
    }
}
