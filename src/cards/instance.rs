//! Card entities: live copies of a record on the table.
//!
//! `CardEntity` is what the rendering layer draws and the player drags.
//! Its name and text come from the record; its position and stacking
//! index come from the deck it was assembled into, and later from saved
//! positions or user interaction.

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeKey, AttributeValue, Attributes};
use super::definition::{CardRecord, Category, DisplayLines, Placement};
use crate::core::entity::EntityId;
use crate::core::transform::Position;

/// A live card on the tabletop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardEntity {
    /// Unique entity ID for this copy.
    pub id: EntityId,

    /// Persistence join key. Shared and starting copies use the record
    /// name; per-player copies carry the player suffix.
    pub name: String,

    pub category: Category,

    pub placement: Placement,

    pub display: DisplayLines,

    pub attributes: Attributes,

    /// Draw order within the deck, assigned after shuffling.
    pub stacking_index: usize,

    /// World position. Mutable by the host between save ticks.
    pub position: Position,
}

impl CardEntity {
    /// Create a copy of `record` at the origin.
    #[must_use]
    pub fn from_record(id: EntityId, record: &CardRecord, name: String, placement: Placement) -> Self {
        Self {
            id,
            name,
            category: record.category,
            placement,
            display: record.display.clone(),
            attributes: record.attributes.clone(),
            stacking_index: 0,
            position: Position::default(),
        }
    }

    /// Get an integer attribute with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.attributes
            .get(&AttributeKey::new(key))
            .and_then(AttributeValue::as_int)
            .unwrap_or(default)
    }

    /// Whether this copy belongs to the category's shared deck.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.placement == Placement::Shared
    }
}
