//! Matching saved transforms to freshly built entities.
//!
//! Entities are rebuilt and reshuffled every run, so saved entries can't
//! be matched by index. They are matched by name instead:
//!
//! - Card blocks are gathered into their `MatchPool`: one per shared
//!   category, plus one for every mine, starting and player block. Each
//!   pool becomes a `NameQueues`: name → FIFO of positions, in file order.
//! - Live entities of that pool, in creation order, pop the front of
//!   their name's queue. The oldest saved entry is used first, so two
//!   copies named `Pick` get the two saved `Pick` positions in order.
//! - Entities with nothing queued keep their assembled position.
//! - Entries left in a queue name nothing live any more and are dropped.
//!
//! Tile groups have unique names and are matched directly.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::codec::{GroupSaveRecord, MatchPool, SaveRecord, SaveSnapshot};
use crate::cards::CardEntity;
use crate::core::transform::Position;
use crate::tiles::TileGroup;

/// Saved positions of one pool, queued per name.
#[derive(Clone, Debug, Default)]
pub struct NameQueues {
    queues: FxHashMap<String, VecDeque<Position>>,
}

impl NameQueues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue records in file order.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = SaveRecord>) -> Self {
        let mut queues = Self::new();
        queues.extend(records);
        queues
    }

    /// Queue more records behind the ones already held.
    pub fn extend(&mut self, records: impl IntoIterator<Item = SaveRecord>) {
        for record in records {
            let position = record.position();
            self.push(record.name, position);
        }
    }

    pub fn push(&mut self, name: String, position: Position) {
        self.queues.entry(name).or_default().push_back(position);
    }

    /// Oldest queued position for `name`.
    pub fn pop(&mut self, name: &str) -> Option<Position> {
        self.queues.get_mut(name)?.pop_front()
    }

    /// Entries not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// Outcome of applying a save to live entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Card entities moved to a saved position.
    pub applied: usize,
    /// Saved entries that matched no live entity.
    pub discarded: usize,
    /// Live card entities left at their assembled position.
    pub defaulted: usize,
    /// Tile groups moved to a saved pose.
    pub groups_restored: usize,
    /// Saved group entries with no live group of that name.
    pub groups_discarded: usize,
}

impl RestoreReport {
    /// Whether nothing at all was restored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied == 0 && self.groups_restored == 0
    }

    fn merge(&mut self, other: RestoreReport) {
        self.applied += other.applied;
        self.discarded += other.discarded;
        self.defaulted += other.defaulted;
        self.groups_restored += other.groups_restored;
        self.groups_discarded += other.groups_discarded;
    }
}

impl std::fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cards restored, {} kept defaults, {} stale entries; {} groups restored",
            self.applied, self.defaulted, self.discarded, self.groups_restored
        )
    }
}

/// Pop a queued position for each live entity, in iteration order.
///
/// `queues` keeps whatever no entity claimed.
pub fn apply_loaded_positions<'a>(
    live: impl IntoIterator<Item = &'a mut CardEntity>,
    queues: &mut NameQueues,
) -> RestoreReport {
    let mut report = RestoreReport::default();
    for entity in live {
        match queues.pop(&entity.name) {
            Some(position) => {
                entity.position = position;
                report.applied += 1;
            }
            None => report.defaulted += 1,
        }
    }
    report
}

/// Apply saved poses to groups with the same name.
///
/// Member tiles are re-placed and their rotations snapped to identity.
pub fn apply_group_poses(groups: &mut [TileGroup], saved: &[GroupSaveRecord]) -> RestoreReport {
    let mut by_name: FxHashMap<&str, &GroupSaveRecord> = FxHashMap::default();
    let mut report = RestoreReport::default();
    for record in saved {
        if by_name.insert(record.name.as_str(), record).is_some() {
            report.groups_discarded += 1;
        }
    }

    for group in groups.iter_mut() {
        if let Some(record) = by_name.remove(group.name.as_str()) {
            group.set_pose(record.position(), record.rotation_z);
            report.groups_restored += 1;
        }
    }
    report.groups_discarded += by_name.len();
    report
}

/// Apply a decoded save to the live collections.
///
/// `entities` must be in creation order.
pub fn restore(entities: &mut [CardEntity], groups: &mut [TileGroup], snapshot: SaveSnapshot) -> RestoreReport {
    let mut pools: Vec<(MatchPool, NameQueues)> = MatchPool::ALL.into_iter().map(|p| (p, NameQueues::new())).collect();
    for (key, records) in snapshot.blocks {
        let pool = key.pool();
        if let Some((_, queues)) = pools.iter_mut().find(|(p, _)| *p == pool) {
            queues.extend(records);
        }
    }

    let mut report = RestoreReport::default();
    for (pool, mut queues) in pools {
        let members = entities.iter_mut().filter(|e| pool.contains(e));
        let mut matched = apply_loaded_positions(members, &mut queues);
        matched.discarded = queues.remaining();
        if matched.discarded > 0 {
            log::debug!("{}: {} saved entries match nothing", pool, matched.discarded);
        }
        report.merge(matched);
    }

    report.merge(apply_group_poses(groups, &snapshot.groups));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRecord, Category, Placement};
    use crate::core::entity::EntityId;
    use crate::core::transform::Vec2;
    use crate::core::player::PlayerId;
    use crate::persistence::codec::BlockKey;
    use crate::tiles::{HexCoord, Tile};

    fn entity(id: u32, name: &str) -> CardEntity {
        let record = CardRecord::new(name, Category::Equipment);
        CardEntity::from_record(EntityId(id), &record, name.to_string(), Placement::Shared)
    }

    fn record(name: &str, x: f32) -> SaveRecord {
        SaveRecord {
            name: name.to_string(),
            x,
            y: 0.0,
            z: 0.0,
        }
    }

    #[test]
    fn test_fifo_per_name() {
        let mut queues = NameQueues::from_records([record("Pick", 1.0), record("Lamp", 5.0), record("Pick", 2.0)]);
        let mut live = vec![entity(0, "Pick"), entity(1, "Pick"), entity(2, "Lamp")];

        let report = apply_loaded_positions(live.iter_mut(), &mut queues);

        assert_eq!(live[0].position.x, 1.0);
        assert_eq!(live[1].position.x, 2.0);
        assert_eq!(live[2].position.x, 5.0);
        assert_eq!(report.applied, 3);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_missing_and_stale_entries() {
        let mut queues = NameQueues::from_records([record("Pick", 1.0), record("Retired", 9.0)]);
        let mut live = vec![entity(0, "Pick"), entity(1, "Pick"), entity(2, "New")];

        let report = apply_loaded_positions(live.iter_mut(), &mut queues);

        assert_eq!(report.applied, 1);
        assert_eq!(report.defaulted, 2);
        assert_eq!(live[1].position, Position::default());
        assert_eq!(live[2].position, Position::default());
        assert_eq!(queues.remaining(), 1);
        assert_eq!(queues.pop("Retired"), Some(Position::new(9.0, 0.0, 0.0)));
    }

    #[test]
    fn test_group_poses_by_exact_name() {
        let mut group = TileGroup::new("Group0", Vec2::ZERO);
        group.push(Tile::new("A", "", HexCoord::new(1, 0), Vec2::new(1.0, 0.0)));
        let mut groups = vec![group, TileGroup::new("Group4", Vec2::ZERO)];
        let saved = [
            GroupSaveRecord {
                name: "Group0".to_string(),
                x: 3.0,
                y: 4.0,
                z: 0.0,
                rotation_z: 180.0,
            },
            GroupSaveRecord {
                name: "group4".to_string(),
                x: 1.0,
                y: 1.0,
                z: 0.0,
                rotation_z: 60.0,
            },
        ];

        let report = apply_group_poses(&mut groups, &saved);

        assert_eq!(report.groups_restored, 1);
        assert_eq!(report.groups_discarded, 1);
        assert_eq!(groups[0].position, Position::new(3.0, 4.0, 0.0));
        assert_eq!(groups[0].rotation_z, 180.0);
        assert!((groups[0].tiles[0].position.x - 2.0).abs() < 1e-5);
        assert_eq!(groups[0].tiles[0].rotation_z, 0.0);
        assert_eq!(groups[1].position, Position::default());
    }

    #[test]
    fn test_restore_scopes_names_to_blocks() {
        let mut entities = vec![entity(0, "Pick")];
        let snapshot = SaveSnapshot {
            blocks: vec![
                (BlockKey::Category(Category::Utility), vec![record("Pick", 7.0)]),
                (BlockKey::Category(Category::Equipment), vec![record("Pick", 3.0)]),
            ],
            groups: Vec::new(),
        };

        let report = restore(&mut entities, &mut [], snapshot);

        assert_eq!(entities[0].position.x, 3.0);
        assert_eq!(report.applied, 1);
        assert_eq!(report.discarded, 1);
        assert_eq!(report.defaulted, 0);
    }

    #[test]
    fn test_variable_blocks_match_by_name_across_decks() {
        let record_of = |name: &str| CardRecord::new(name, Category::Equipment);
        let mut entities = vec![
            CardEntity::from_record(EntityId(0), &record_of("Torch"), "Torch".to_string(), Placement::Starting(0)),
            CardEntity::from_record(EntityId(1), &record_of("Lamp"), "Lamp".to_string(), Placement::Starting(1)),
            CardEntity::from_record(EntityId(2), &record_of("Pick"), "Pick0".to_string(), Placement::PerPlayer(PlayerId::new(0))),
        ];
        // Saved under another seed: Lamp's hand was deck 0, Torch's deck 1.
        let snapshot = SaveSnapshot {
            blocks: vec![
                (BlockKey::Starting(0), vec![record("Lamp", 4.0)]),
                (BlockKey::Starting(1), vec![record("Torch", 6.0)]),
                (BlockKey::Player(PlayerId::new(0)), vec![record("Pick0", 8.0)]),
            ],
            groups: Vec::new(),
        };

        let report = restore(&mut entities, &mut [], snapshot);

        assert_eq!(entities[0].position.x, 6.0);
        assert_eq!(entities[1].position.x, 4.0);
        assert_eq!(entities[2].position.x, 8.0);
        assert_eq!(report.applied, 3);
        assert_eq!(report.discarded, 0);
        assert_eq!(report.defaulted, 0);
    }
}
