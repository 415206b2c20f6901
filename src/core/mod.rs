//! Core types: entity IDs, players, RNG, geometry, configuration and the
//! assembled tabletop.
//!
//! Everything content-specific (card columns, tile rows, save blocks)
//! lives in the other modules; this one holds what they share.

pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;
pub mod transform;

pub use config::{ConfigError, Layout, SessionConfig};
pub use entity::{EntityAllocator, EntityId};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::Tabletop;
pub use transform::{Position, Vec2};
