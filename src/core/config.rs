//! Session configuration.
//!
//! Hosts configure a tabletop at startup by providing a `SessionConfig`:
//! player count, special tile count, RNG seed, hex size, autosave cadence
//! and the spatial `Layout` of decks and tile groups.
//!
//! Configs can be built in code or read from JSON; every JSON field is
//! optional and falls back to the defaults below.
//!
//! ```
//! use depths_tabletop::core::SessionConfig;
//!
//! let config = SessionConfig::from_json_str(r#"{ "player_count": 3, "seed": 9 }"#).unwrap();
//! assert_eq!(config.player_count, 3);
//! assert_eq!(config.seed, Some(9));
//! assert_eq!(config.hex_size, 50.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transform::Vec2;

/// Gap between neighbouring decks, in world units.
pub const DEFAULT_DECK_GAP: f32 = 1.75;

/// Errors raised while reading or validating a `SessionConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("player count must be between 1 and 255, got {0}")]
    PlayerCount(usize),

    #[error("hex size must be positive, got {0}")]
    HexSize(f32),

    #[error("autosave interval must be positive, got {0}s")]
    AutosaveInterval(f32),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where decks and tile groups are placed before any saved position is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Origin of the main deck. Side and mine decks stack above it.
    pub deck_origin: Vec2,

    /// Distance between neighbouring decks.
    pub deck_gap: f32,

    /// Origin of the first starting-hand deck; later ones step along X.
    pub starting_origin: Vec2,

    /// Origin of player 0's deck; later players step along X.
    pub player_origin: Vec2,

    /// Anchor of the first tile group.
    pub tile_origin: Vec2,

    /// Distance between neighbouring tile group anchors along X.
    pub group_spacing: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            deck_origin: Vec2::ZERO,
            deck_gap: DEFAULT_DECK_GAP,
            starting_origin: Vec2::new(DEFAULT_DECK_GAP * 2.0, 0.0),
            player_origin: Vec2::new(0.0, -DEFAULT_DECK_GAP * 2.0),
            tile_origin: Vec2::new(0.0, 8.0),
            group_spacing: 6.0,
        }
    }
}

impl Layout {
    /// Origin of the main (resource/utility/equipment) deck.
    #[must_use]
    pub fn main_deck(&self) -> Vec2 {
        self.deck_origin
    }

    /// Origin of the monster deck.
    #[must_use]
    pub fn side_deck(&self) -> Vec2 {
        self.deck_origin.stepped(Vec2::new(0.0, self.deck_gap), 1)
    }

    /// Origin of the mine deck.
    #[must_use]
    pub fn mine_deck(&self) -> Vec2 {
        self.deck_origin.stepped(Vec2::new(0.0, self.deck_gap), 2)
    }

    /// Origin of the `index`th starting-hand deck.
    #[must_use]
    pub fn starting_deck(&self, index: usize) -> Vec2 {
        self.starting_origin.stepped(Vec2::new(self.deck_gap, 0.0), index)
    }

    /// Origin of the per-player deck at `player_index`.
    #[must_use]
    pub fn player_deck(&self, player_index: usize) -> Vec2 {
        self.player_origin.stepped(Vec2::new(self.deck_gap, 0.0), player_index)
    }

    /// Anchor of the tile group with the given ordinal.
    #[must_use]
    pub fn group_anchor(&self, ordinal: usize) -> Vec2 {
        self.tile_origin.stepped(Vec2::new(self.group_spacing, 0.0), ordinal)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of players (1-255).
    pub player_count: usize,

    /// Number of special tiles drawn onto the map.
    pub special_tile_count: usize,

    /// RNG seed. `None` draws a fresh seed from OS entropy.
    pub seed: Option<u64>,

    /// Hex radius in pixels, before the pixel-to-world scale.
    pub hex_size: f32,

    /// Seconds between periodic saves.
    pub autosave_interval_secs: f32,

    /// Default spatial layout.
    pub layout: Layout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            special_tile_count: 0,
            seed: None,
            hex_size: 50.0,
            autosave_interval_secs: 5.0,
            layout: Layout::default(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration for `player_count` players with defaults elsewhere.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of special tiles.
    #[must_use]
    pub fn with_special_tiles(mut self, count: usize) -> Self {
        self.special_tile_count = count;
        self
    }

    /// Set the hex radius.
    #[must_use]
    pub fn with_hex_size(mut self, hex_size: f32) -> Self {
        self.hex_size = hex_size;
        self
    }

    /// Set the autosave cadence.
    #[must_use]
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval_secs = interval.as_secs_f32();
        self
    }

    /// Replace the spatial layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Autosave cadence as a `Duration`.
    #[must_use]
    pub fn autosave_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.autosave_interval_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 || self.player_count > 255 {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if !(self.hex_size > 0.0) {
            return Err(ConfigError::HexSize(self.hex_size));
        }
        if !(self.autosave_interval_secs > 0.0 && self.autosave_interval_secs.is_finite()) {
            return Err(ConfigError::AutosaveInterval(self.autosave_interval_secs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.special_tile_count, 0);
        assert_eq!(config.seed, None);
        assert_eq!(config.autosave_interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new(4)
            .with_seed(11)
            .with_special_tiles(2)
            .with_hex_size(32.0)
            .with_autosave_interval(Duration::from_secs(10));

        assert_eq!(config.player_count, 4);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.special_tile_count, 2);
        assert_eq!(config.hex_size, 32.0);
        assert_eq!(config.autosave_interval_secs, 10.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(SessionConfig::new(0).validate(), Err(ConfigError::PlayerCount(0))));
        assert!(matches!(SessionConfig::new(300).validate(), Err(ConfigError::PlayerCount(300))));
        assert!(matches!(
            SessionConfig::new(2).with_hex_size(0.0).validate(),
            Err(ConfigError::HexSize(_))
        ));

        let mut config = SessionConfig::new(2);
        config.autosave_interval_secs = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::AutosaveInterval(_))));
        config.autosave_interval_secs = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::AutosaveInterval(_))));
        config.autosave_interval_secs = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::AutosaveInterval(_))));
    }

    #[test]
    fn test_autosave_interval_never_panics() {
        let mut config = SessionConfig::new(2);
        config.autosave_interval_secs = f32::INFINITY;
        assert_eq!(config.autosave_interval(), Duration::MAX);
        config.autosave_interval_secs = -3.0;
        assert_eq!(config.autosave_interval(), Duration::ZERO);
    }

    #[test]
    fn test_json_partial_fields() {
        let config = SessionConfig::from_json_str(
            r#"{ "special_tile_count": 3, "layout": { "deck_gap": 2.5 } }"#,
        )
        .unwrap();

        assert_eq!(config.player_count, 2);
        assert_eq!(config.special_tile_count, 3);
        assert_eq!(config.layout.deck_gap, 2.5);
        assert_eq!(config.layout.group_spacing, Layout::default().group_spacing);
    }

    #[test]
    fn test_json_invalid() {
        assert!(matches!(SessionConfig::from_json_str("{ nope"), Err(ConfigError::Json(_))));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "player_count": 0 }"#),
            Err(ConfigError::PlayerCount(0))
        ));
    }

    #[test]
    fn test_layout_offsets_do_not_overlap() {
        let layout = Layout::default();
        assert_eq!(layout.main_deck(), Vec2::ZERO);
        assert_eq!(layout.side_deck(), Vec2::new(0.0, 1.75));
        assert_eq!(layout.mine_deck(), Vec2::new(0.0, 3.5));
        assert_eq!(layout.starting_deck(1).x - layout.starting_deck(0).x, 1.75);
        assert_eq!(layout.player_deck(2), Vec2::new(3.5, -3.5));
        assert_eq!(layout.group_anchor(2), Vec2::new(12.0, 8.0));
    }
}
