//! Card records: one parsed table row and its replication plan.
//!
//! A `CardRecord` holds what a row says about a card. How many live
//! copies it becomes, and where they go, is the `ReplicationPlan`.
//! Per-copy state (position, stacking index) lives on `CardEntity`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::{AttributeKey, AttributeValue, Attributes};
use crate::core::PlayerId;
use crate::table::TableKind;

/// Content category of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Equipment,
    Utility,
    Resource,
    Monster,
    Mine,
}

impl Category {
    /// Categories in save-block declaration order.
    pub const ALL: [Category; 5] = [
        Category::Equipment,
        Category::Utility,
        Category::Resource,
        Category::Monster,
        Category::Mine,
    ];

    /// Table the category is read from.
    #[must_use]
    pub const fn table(self) -> TableKind {
        match self {
            Category::Equipment => TableKind::Equipment,
            Category::Utility => TableKind::Utility,
            Category::Resource => TableKind::Resources,
            Category::Monster => TableKind::Monsters,
            Category::Mine => TableKind::Mines,
        }
    }

    /// Title printed on cards whose name cell is empty.
    #[must_use]
    pub const fn fallback_name(self) -> &'static str {
        match self {
            Category::Equipment => "EQUIPMENT",
            Category::Utility => "UTILITY",
            Category::Resource => "RESOURCE",
            Category::Monster => "MONSTER",
            Category::Mine => "MINE",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where a live copy of a record ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// The category's shared deck.
    Shared,
    /// One player's deck.
    PerPlayer(PlayerId),
    /// The starting-hand deck with this creation index.
    Starting(usize),
}

/// How many live copies a record produces, and where.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationPlan {
    /// Unsuffixed copies in the shared deck.
    pub deck_count: usize,
    /// Copies per player, suffixed with the player index.
    pub per_player_count: usize,
    /// Copies in this record's own starting-hand deck.
    pub starting_count: usize,
}

impl ReplicationPlan {
    #[must_use]
    pub const fn new(deck_count: usize, per_player_count: usize, starting_count: usize) -> Self {
        Self {
            deck_count,
            per_player_count,
            starting_count,
        }
    }

    /// Only shared-deck copies.
    #[must_use]
    pub const fn deck_only(deck_count: usize) -> Self {
        Self::new(deck_count, 0, 0)
    }

    /// Total live copies for a session with `player_count` players.
    #[must_use]
    pub const fn total(&self, player_count: usize) -> usize {
        self.deck_count + self.per_player_count * player_count + self.starting_count
    }

    /// Whether this record opens its own starting-hand deck.
    #[must_use]
    pub const fn needs_starting_deck(&self) -> bool {
        self.starting_count > 0
    }

    /// Names and placements of every copy, in creation order: shared copies,
    /// then per-player copies by player index, then starting copies.
    ///
    /// `starting_deck` is the index the record's starting deck will get; it
    /// is only used when `starting_count > 0`.
    ///
    /// ```
    /// use depths_tabletop::cards::{Placement, ReplicationPlan};
    ///
    /// let copies = ReplicationPlan::new(3, 1, 0).expand("Pick", 2, 0);
    /// let names: Vec<_> = copies.iter().map(|(n, _)| n.as_str()).collect();
    /// assert_eq!(names, ["Pick", "Pick", "Pick", "Pick0", "Pick1"]);
    /// assert_eq!(copies[4].1, Placement::PerPlayer(depths_tabletop::core::PlayerId::new(1)));
    /// ```
    #[must_use]
    pub fn expand(&self, name: &str, player_count: usize, starting_deck: usize) -> Vec<(String, Placement)> {
        let mut copies = Vec::with_capacity(self.total(player_count));

        copies.extend((0..self.deck_count).map(|_| (name.to_string(), Placement::Shared)));

        for player in PlayerId::all(player_count) {
            let suffixed = player.suffixed(name);
            copies.extend(
                (0..self.per_player_count).map(|_| (suffixed.clone(), Placement::PerPlayer(player))),
            );
        }

        copies.extend(
            (0..self.starting_count).map(|_| (name.to_string(), Placement::Starting(starting_deck))),
        );

        copies
    }
}

/// Presentation strings for a card, in the order its template lays them out.
pub type DisplayLines = SmallVec<[String; 5]>;

/// One card row after validation.
///
/// ```
/// use depths_tabletop::cards::{CardRecord, Category, ReplicationPlan};
///
/// let record = CardRecord::new("Pickaxe", Category::Equipment)
///     .with_attr("mining", 3i32)
///     .with_plan(ReplicationPlan::deck_only(2));
///
/// assert_eq!(record.get_int("mining", 0), 3);
/// assert_eq!(record.plan.total(4), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Persistence join key; suffixed per player on per-player copies.
    pub name: String,

    pub category: Category,

    /// Formatted text for the card template.
    pub display: DisplayLines,

    /// Category-specific numbers and text.
    pub attributes: Attributes,

    pub plan: ReplicationPlan,

    /// Data-row index the record came from (header excluded).
    pub source_row: usize,
}

impl CardRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            display: DisplayLines::new(),
            attributes: Attributes::default(),
            plan: ReplicationPlan::default(),
            source_row: 0,
        }
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<AttributeKey>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a display line (builder pattern).
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.display.push(line.into());
        self
    }

    #[must_use]
    pub fn with_plan(mut self, plan: ReplicationPlan) -> Self {
        self.plan = plan;
        self
    }

    #[must_use]
    pub fn at_row(mut self, source_row: usize) -> Self {
        self.source_row = source_row;
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(&AttributeKey::new(key))
    }

    /// Get an integer attribute with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_attr(key).and_then(AttributeValue::as_int).unwrap_or(default)
    }

    /// Get a text attribute.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get_attr(key).and_then(AttributeValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_category_tables() {
        assert_eq!(Category::Resource.table(), TableKind::Resources);
        assert_eq!(Category::Mine.table(), TableKind::Mines);
        assert_eq!(Category::Monster.fallback_name(), "MONSTER");
    }

    #[test]
    fn test_three_deck_one_per_player_two_players() {
        let copies = ReplicationPlan::new(3, 1, 0).expand("Lamp", 2, 0);
        assert_eq!(copies.len(), 5);

        let shared = copies.iter().filter(|(n, p)| n == "Lamp" && *p == Placement::Shared).count();
        assert_eq!(shared, 3);
        assert!(copies.contains(&("Lamp0".to_string(), Placement::PerPlayer(PlayerId::new(0)))));
        assert!(copies.contains(&("Lamp1".to_string(), Placement::PerPlayer(PlayerId::new(1)))));
    }

    #[test]
    fn test_starting_copies_use_given_deck() {
        let copies = ReplicationPlan::new(0, 0, 2).expand("Torch", 3, 4);
        assert_eq!(
            copies,
            vec![
                ("Torch".to_string(), Placement::Starting(4)),
                ("Torch".to_string(), Placement::Starting(4)),
            ]
        );
        assert!(ReplicationPlan::new(0, 0, 2).needs_starting_deck());
        assert!(!ReplicationPlan::deck_only(2).needs_starting_deck());
    }

    #[test]
    fn test_record_builder() {
        let record = CardRecord::new("Goblin", Category::Monster)
            .with_attr("attack", 2i32)
            .with_attr("reward", "1 gold")
            .with_line("Goblin")
            .at_row(7);

        assert_eq!(record.get_int("attack", 0), 2);
        assert_eq!(record.get_int("defence", -1), -1);
        assert_eq!(record.get_text("reward"), Some("1 gold"));
        assert_eq!(record.display.as_slice(), &["Goblin".to_string()]);
        assert_eq!(record.source_row, 7);
    }

    proptest! {
        #[test]
        fn prop_expand_matches_total(
            deck in 0usize..6,
            per_player in 0usize..4,
            starting in 0usize..4,
            players in 1usize..6,
        ) {
            let plan = ReplicationPlan::new(deck, per_player, starting);
            let copies = plan.expand("Card", players, 0);
            prop_assert_eq!(copies.len(), plan.total(players));
            prop_assert_eq!(copies.len(), deck + per_player * players + starting);

            for player in PlayerId::all(players) {
                let mine = copies
                    .iter()
                    .filter(|(_, p)| *p == Placement::PerPlayer(player))
                    .all(|(n, _)| *n == player.suffixed("Card"));
                prop_assert!(mine);
            }
        }
    }
}
