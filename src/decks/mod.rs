//! Deck assembly: shuffling, stacking order, and deck placement.
//!
//! ## Key Types
//!
//! - `Deck`: Entity IDs stacked at one origin
//! - `DeckKind`: Main, side, mine, starting-hand or per-player
//! - `DeckSet`: Every deck of a session

pub mod deck;
pub mod set;

pub use deck::{assemble_deck, Deck, DeckKind};
pub use set::DeckSet;
