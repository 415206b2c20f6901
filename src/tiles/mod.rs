//! Hex tiles grouped into movable clusters.
//!
//! ## Key Types
//!
//! - `HexCoord`: Offset hex coordinate and its planar conversion
//! - `Tile`: One hex tile with its offset inside a group
//! - `TileGroup`: Named cluster with a shared anchor and rotation
//! - `build_groups`: Tiles table → groups, via the open/seal state machine

pub mod builder;
pub mod group;
pub mod hex;

pub use builder::{build_groups, DEFAULT_GROUP_LABEL, ORIENTATIONS, ORIENTATION_STEP};
pub use group::{Tile, TileGroup};
pub use hex::{HexCoord, HEX_PIXEL_SCALE};
