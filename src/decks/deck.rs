//! A deck: entity IDs stacked at one origin.
//!
//! ## Stacking
//!
//! After `assemble`, `cards[i]` has stacking index `i` and sits at the deck
//! origin with depth `z = i`. Index 0 is the bottom of the stack; the last
//! card is drawn first. Depth only encodes draw order; it is not collision
//! geometry.

use serde::{Deserialize, Serialize};

use crate::cards::CardEntity;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::transform::{Position, Vec2};

/// Which logical deck this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    /// Resources, utility and equipment.
    Main,
    /// Monsters.
    Side,
    /// Mines, when the session has a Mines table.
    Mine,
    /// Starting hand, by creation index.
    Starting(usize),
    /// A player's own deck.
    Player(PlayerId),
}

impl std::fmt::Display for DeckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckKind::Main => f.write_str("main deck"),
            DeckKind::Side => f.write_str("side deck"),
            DeckKind::Mine => f.write_str("mine deck"),
            DeckKind::Starting(i) => write!(f, "starting deck {}", i),
            DeckKind::Player(p) => write!(f, "{} deck", p),
        }
    }
}

/// Ordered cards sharing a spatial origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    kind: DeckKind,
    origin: Vec2,
    cards: Vec<EntityId>,
}

impl Deck {
    #[must_use]
    pub fn new(kind: DeckKind, origin: Vec2) -> Self {
        Self {
            kind,
            origin,
            cards: Vec::new(),
        }
    }

    /// Deck with the given members, in insertion order.
    #[must_use]
    pub fn with_cards(kind: DeckKind, origin: Vec2, cards: Vec<EntityId>) -> Self {
        Self { kind, origin, cards }
    }

    pub fn push(&mut self, id: EntityId) {
        self.cards.push(id);
    }

    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Members in stacking order (bottom first) once assembled.
    #[must_use]
    pub fn cards(&self) -> &[EntityId] {
        &self.cards
    }

    /// Card drawn next.
    #[must_use]
    pub fn top(&self) -> Option<EntityId> {
        self.cards.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle uniformly, then stack every member at the origin with its
    /// stacking index as depth.
    ///
    /// `arena` is indexed by `EntityId`.
    pub fn assemble(&mut self, arena: &mut [CardEntity], rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
        for (index, id) in self.cards.iter().enumerate() {
            let card = &mut arena[id.index()];
            card.stacking_index = index;
            card.position = Position::on_plane(self.origin, index as f32);
        }
        log::debug!("assembled {} with {} cards", self.kind, self.cards.len());
    }
}

/// Shuffle `cards` and stack them at `origin`.
///
/// Free-standing form of [`Deck::assemble`] for callers that own their
/// entities directly rather than through an arena.
pub fn assemble_deck(origin: Vec2, cards: &mut [CardEntity], rng: &mut GameRng) {
    rng.shuffle(cards);
    for (index, card) in cards.iter_mut().enumerate() {
        card.stacking_index = index;
        card.position = Position::on_plane(origin, index as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRecord, Category, Placement};
    use proptest::prelude::*;

    fn arena(n: usize) -> Vec<CardEntity> {
        let record = CardRecord::new("Coin", Category::Resource);
        (0..n)
            .map(|i| CardEntity::from_record(EntityId(i as u32), &record, format!("Coin{}", i), Placement::Shared))
            .collect()
    }

    #[test]
    fn test_assemble_stacks_at_origin() {
        let mut cards = arena(6);
        let mut deck = Deck::with_cards(DeckKind::Main, Vec2::new(2.0, 3.0), (0..6).map(EntityId).collect());

        deck.assemble(&mut cards, &mut GameRng::new(3));

        for (i, id) in deck.cards().iter().enumerate() {
            let card = &cards[id.index()];
            assert_eq!(card.stacking_index, i);
            assert_eq!(card.position, Position::new(2.0, 3.0, i as f32));
        }
        assert_eq!(deck.top(), deck.cards().last().copied());
    }

    #[test]
    fn test_assemble_empty_deck() {
        let mut deck = Deck::new(DeckKind::Side, Vec2::ZERO);
        deck.assemble(&mut [], &mut GameRng::new(1));
        assert!(deck.is_empty());
        assert_eq!(deck.top(), None);
    }

    #[test]
    fn test_deck_kind_labels() {
        assert_eq!(DeckKind::Starting(2).to_string(), "starting deck 2");
        assert_eq!(DeckKind::Player(PlayerId::new(1)).to_string(), "Player 1 deck");
    }

    proptest! {
        #[test]
        fn prop_stacking_is_permutation(n in 0usize..40, seed in any::<u64>()) {
            let mut cards = arena(n);
            assemble_deck(Vec2::ZERO, &mut cards, &mut GameRng::new(seed));

            let mut indices: Vec<_> = cards.iter().map(|c| c.stacking_index).collect();
            indices.sort_unstable();
            prop_assert_eq!(indices, (0..n).collect::<Vec<_>>());

            for card in &cards {
                prop_assert_eq!(card.position.z, card.stacking_index as f32);
            }
        }

        #[test]
        fn prop_deck_assemble_keeps_members(n in 0usize..40, seed in any::<u64>()) {
            let mut cards = arena(n);
            let mut deck = Deck::with_cards(DeckKind::Main, Vec2::ZERO, (0..n as u32).map(EntityId).collect());
            deck.assemble(&mut cards, &mut GameRng::new(seed));

            let mut members: Vec<_> = deck.cards().to_vec();
            members.sort_unstable();
            prop_assert_eq!(members, (0..n as u32).map(EntityId).collect::<Vec<_>>());
        }
    }
}
