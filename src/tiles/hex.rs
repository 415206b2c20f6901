//! Offset hex coordinates and their planar layout.
//!
//! Tiles name their cell as `"col,row"` in offset coordinates. Odd
//! columns are shifted half a cell along Y:
//!
//! ```text
//! x = size * 1.5 * col
//! y = size * sqrt(3) * (row + 0.5 * (col mod 2))
//! ```
//!
//! The result is in pixels; dividing by [`HEX_PIXEL_SCALE`] gives world
//! units. The scale is fixed because saved tile-group anchors were taken
//! against it.

use serde::{Deserialize, Serialize};

use crate::core::transform::Vec2;

/// Pixels per world unit.
pub const HEX_PIXEL_SCALE: f32 = 100.0;

const SQRT_3: f32 = 1.732_050_8;

/// A cell in offset hex coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub col: i32,
    pub row: i32,
}

impl HexCoord {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Parse `"col,row"`. Surrounding whitespace is ignored.
    ///
    /// ```
    /// use depths_tabletop::tiles::HexCoord;
    ///
    /// assert_eq!(HexCoord::parse(" 2, -1 "), Some(HexCoord::new(2, -1)));
    /// assert_eq!(HexCoord::parse("2"), None);
    /// assert_eq!(HexCoord::parse("a,b"), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (col, row) = raw.split_once(',')?;
        Some(Self {
            col: col.trim().parse().ok()?,
            row: row.trim().parse().ok()?,
        })
    }

    /// Centre of the cell in pixels for hexes of radius `size`.
    #[must_use]
    pub fn to_pixel(self, size: f32) -> Vec2 {
        let shift = 0.5 * self.col.rem_euclid(2) as f32;
        Vec2::new(
            size * 1.5 * self.col as f32,
            size * SQRT_3 * (self.row as f32 + shift),
        )
    }

    /// Centre of the cell in world units.
    #[must_use]
    pub fn to_world(self, size: f32) -> Vec2 {
        let pixel = self.to_pixel(size);
        Vec2::new(pixel.x / HEX_PIXEL_SCALE, pixel.y / HEX_PIXEL_SCALE)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}
