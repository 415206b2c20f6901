//! Every deck of a session, built from the card arena.
//!
//! - Main deck: resource, utility and equipment shared copies (concatenated
//!   in that order, then shuffled as one)
//! - Side deck: monster shared copies
//! - Mine deck: mine shared copies, only when the session has mines
//! - Starting decks: one per record with a starting count, creation order
//! - Player decks: one per player, holding that player's suffixed copies

use serde::{Deserialize, Serialize};

use super::deck::{Deck, DeckKind};
use crate::cards::{CardEntity, Category, Placement};
use crate::core::config::Layout;
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;

/// All decks on the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckSet {
    pub main: Deck,
    pub side: Deck,
    pub mine: Option<Deck>,
    pub starting: Vec<Deck>,
    pub players: PlayerMap<Deck>,
}

impl DeckSet {
    /// Sort arena entities into decks by category and placement.
    ///
    /// Members are collected in creation order; nothing is shuffled or
    /// positioned until [`DeckSet::assemble`].
    #[must_use]
    pub fn collect(
        arena: &[CardEntity],
        layout: &Layout,
        player_count: usize,
        starting_decks: usize,
        with_mines: bool,
    ) -> Self {
        let shared = move |category: Category| {
            arena
                .iter()
                .filter(move |e| e.category == category && e.is_shared())
                .map(|e| e.id)
        };

        let main = Deck::with_cards(
            DeckKind::Main,
            layout.main_deck(),
            shared(Category::Resource)
                .chain(shared(Category::Utility))
                .chain(shared(Category::Equipment))
                .collect(),
        );
        let side = Deck::with_cards(DeckKind::Side, layout.side_deck(), shared(Category::Monster).collect());
        let mine = with_mines
            .then(|| Deck::with_cards(DeckKind::Mine, layout.mine_deck(), shared(Category::Mine).collect()));

        let mut starting: Vec<Deck> = (0..starting_decks)
            .map(|i| Deck::new(DeckKind::Starting(i), layout.starting_deck(i)))
            .collect();
        let mut players = PlayerMap::new(player_count, |p| {
            Deck::new(DeckKind::Player(p), layout.player_deck(p.index()))
        });

        for entity in arena {
            match entity.placement {
                Placement::Shared => {}
                Placement::Starting(i) => starting[i].push(entity.id),
                Placement::PerPlayer(p) => players[p].push(entity.id),
            }
        }

        Self {
            main,
            side,
            mine,
            starting,
            players,
        }
    }

    /// Shuffle and stack every deck.
    pub fn assemble(&mut self, arena: &mut [CardEntity], rng: &mut GameRng) {
        for deck in self.iter_mut() {
            deck.assemble(arena, rng);
        }
    }

    /// Decks in a fixed order: main, side, mine, starting, players.
    pub fn iter(&self) -> impl Iterator<Item = &Deck> {
        [&self.main, &self.side]
            .into_iter()
            .chain(self.mine.as_ref())
            .chain(self.starting.iter())
            .chain(self.players.iter().map(|(_, d)| d))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Deck> {
        [&mut self.main, &mut self.side]
            .into_iter()
            .chain(self.mine.as_mut())
            .chain(self.starting.iter_mut())
            .chain(self.players.iter_mut().map(|(_, d)| d))
    }

    /// Deck of a given kind.
    #[must_use]
    pub fn get(&self, kind: DeckKind) -> Option<&Deck> {
        match kind {
            DeckKind::Main => Some(&self.main),
            DeckKind::Side => Some(&self.side),
            DeckKind::Mine => self.mine.as_ref(),
            DeckKind::Starting(i) => self.starting.get(i),
            DeckKind::Player(p) => (p.index() < self.players.player_count()).then(|| &self.players[p]),
        }
    }

    /// A player's deck.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Deck {
        &self.players[player]
    }

    /// Total cards across all decks.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.iter().map(Deck::len).sum()
    }
}
