//! The assembled tabletop: every card entity, deck and tile group.
//!
//! ## Build order
//!
//! 1. Each category table is parsed and built into records (rows shuffled
//!    per category, on that category's own RNG stream).
//! 2. Records are expanded into entities in creation order: categories in
//!    declaration order, records in build order, copies shared → per-player
//!    → starting. `EntityId` equals the entity's index in that order.
//! 3. Decks are collected from the entities, then shuffled and stacked.
//! 4. The Tiles table is grouped into tile groups.
//!
//! After building, a host restores saved positions with `restore_from`,
//! hands out `entity_mut` / `group_mut` to its interaction layer, and
//! saves through a `SaveSlot` or one of the autosave drivers.

use super::config::{ConfigError, SessionConfig};
use super::entity::{EntityAllocator, EntityId};
use super::rng::GameRng;
use crate::cards::{build_records, rules_for, CardEntity, Category};
use crate::decks::DeckSet;
use crate::persistence::{self, PersistenceError, RestoreReport, SaveLayout, SaveSlot, SaveSnapshot};
use crate::table::{Table, TableKind, TableSource};
use crate::tiles::{build_groups, TileGroup};

/// Everything on the table after startup.
#[derive(Clone, Debug)]
pub struct Tabletop {
    config: SessionConfig,
    seed: u64,
    entities: Vec<CardEntity>,
    decks: DeckSet,
    groups: Vec<TileGroup>,
    has_mines: bool,
}

impl Tabletop {
    /// Build a tabletop from raw table text.
    ///
    /// Only an invalid config is an error. Missing tables and bad rows are
    /// logged and skipped.
    pub fn build(config: SessionConfig, source: &dyn TableSource) -> Result<Self, ConfigError> {
        config.validate()?;

        let root = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let player_count = config.player_count;

        let mut ids = EntityAllocator::default();
        let mut entities = Vec::new();
        let mut starting_decks = 0;
        let mut has_mines = false;

        for category in Category::ALL {
            let kind = category.table();
            let Some(text) = source.raw_text(kind) else {
                if kind.is_optional() {
                    log::info!("no {} table, {} deck disabled", kind, category);
                } else {
                    log::warn!("{} table missing, treated as empty", kind);
                }
                continue;
            };
            has_mines |= category == Category::Mine;

            let table = Table::parse(&text);
            let mut rng = root.for_context(kind.sheet_name());
            for record in build_records(rules_for(category), &table, &mut rng) {
                let starting = starting_decks;
                if record.plan.needs_starting_deck() {
                    starting_decks += 1;
                }
                for (name, placement) in record.plan.expand(&record.name, player_count, starting) {
                    entities.push(CardEntity::from_record(ids.alloc(), &record, name, placement));
                }
            }
        }

        let mut decks = DeckSet::collect(&entities, &config.layout, player_count, starting_decks, has_mines);
        decks.assemble(&mut entities, &mut root.for_context("decks"));

        let groups = match source.raw_text(TableKind::Tiles) {
            Some(text) => build_groups(
                &Table::parse(&text),
                &config.layout,
                config.hex_size,
                config.special_tile_count,
                &mut root.for_context("tiles"),
            ),
            None => {
                log::warn!("{} table missing, no tile groups", TableKind::Tiles);
                Vec::new()
            }
        };

        log::info!(
            "tabletop built: {} cards in {} decks, {} tile groups (seed {})",
            entities.len(),
            decks.iter().count(),
            groups.len(),
            root.seed()
        );

        Ok(Self {
            config,
            seed: root.seed(),
            entities,
            decks,
            groups,
            has_mines,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seed actually used, including one drawn from entropy.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    /// Whether a Mines table was supplied.
    #[must_use]
    pub fn has_mines(&self) -> bool {
        self.has_mines
    }

    /// All card entities in creation order.
    #[must_use]
    pub fn entities(&self) -> &[CardEntity] {
        &self.entities
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&CardEntity> {
        self.entities.get(id.index())
    }

    /// Mutable access for the interaction layer (dragging a card).
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut CardEntity> {
        self.entities.get_mut(id.index())
    }

    /// Entities with the given name, in creation order.
    pub fn entities_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CardEntity> + 'a {
        self.entities.iter().filter(move |e| e.name == name)
    }

    #[must_use]
    pub fn decks(&self) -> &DeckSet {
        &self.decks
    }

    /// Tile groups in creation order.
    #[must_use]
    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&TileGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Mutable access for the interaction layer. Call
    /// `TileGroup::set_pose` so member tiles follow.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut TileGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Blocks a save of this tabletop contains.
    #[must_use]
    pub fn save_layout(&self) -> SaveLayout {
        SaveLayout::new(self.has_mines, self.decks.starting.len(), self.config.player_count)
    }

    /// Point-in-time copy of every transform.
    #[must_use]
    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot::capture(&self.entities, &self.groups, &self.save_layout())
    }

    /// Encode the current transforms.
    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        persistence::encode(&self.snapshot())
    }

    /// Decode `bytes` and apply them. Nothing is applied on error.
    pub fn apply_save(&mut self, bytes: &[u8]) -> Result<RestoreReport, PersistenceError> {
        let snapshot = persistence::decode(bytes, &self.save_layout())?;
        Ok(persistence::restore(&mut self.entities, &mut self.groups, snapshot))
    }

    /// Restore positions from a slot, keeping defaults if it can't be read.
    pub fn restore_from(&mut self, slot: &SaveSlot) -> RestoreReport {
        let result = slot.read().and_then(|bytes| self.apply_save(&bytes));
        match result {
            Ok(report) => {
                log::info!("restored from {}: {}", slot.path().display(), report);
                report
            }
            Err(PersistenceError::Missing(path)) => {
                log::info!("no save at {}, using default positions", path.display());
                self.untouched()
            }
            Err(e) => {
                log::warn!("{}; using default positions", e);
                self.untouched()
            }
        }
    }

    fn untouched(&self) -> RestoreReport {
        RestoreReport {
            defaulted: self.entities.len(),
            ..RestoreReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Placement;
    use crate::core::player::PlayerId;
    use crate::decks::DeckKind;
    use crate::table::InMemoryTables;

    fn tables() -> InMemoryTables {
        InMemoryTables::new()
            .with(
                TableKind::Equipment,
                "Name,Attack,Defence,Mining,Count,Extra deck,Starting Count\nPick,1,0,2,2,1,0\nLamp,0,0,1,1,0,2\n",
            )
            .with(TableKind::Utility, "Name,Description,Count\nRope,Climb,3\n")
            .with(TableKind::Resources, "Name,Gold,Count\nCopper,1,4\n")
            .with(TableKind::Monsters, "Name,Attack,Defence,Count\nBat,1,1,2\n")
            .with(TableKind::Tiles, "Name,Coords\nA,\"0,0\"\nB,\"1,0\"\n\nC,\"0,0\"\n")
    }

    fn build(seed: u64) -> Tabletop {
        Tabletop::build(SessionConfig::new(2).with_seed(seed), &tables()).unwrap()
    }

    #[test]
    fn test_build_counts() {
        let tabletop = build(1);

        // Pick: 2 shared + 2 per-player, Lamp: 1 shared + 2 starting.
        assert_eq!(tabletop.entities().len(), 4 + 3 + 3 + 4 + 2);
        assert_eq!(tabletop.decks().main.len(), 2 + 1 + 3 + 4);
        assert_eq!(tabletop.decks().side.len(), 2);
        assert!(tabletop.decks().mine.is_none());
        assert_eq!(tabletop.decks().starting.len(), 1);
        assert_eq!(tabletop.decks().player(PlayerId::new(1)).len(), 1);
        assert_eq!(tabletop.decks().total_cards(), tabletop.entities().len());
        assert_eq!(tabletop.groups().len(), 2);
    }

    #[test]
    fn test_ids_match_creation_index() {
        let tabletop = build(2);
        for (i, entity) in tabletop.entities().iter().enumerate() {
            assert_eq!(entity.id.index(), i);
        }
        assert_eq!(tabletop.entities_named("Pick1").count(), 1);
        assert_eq!(
            tabletop.entities_named("Pick1").next().map(|e| e.placement),
            Some(Placement::PerPlayer(PlayerId::new(1)))
        );
    }

    #[test]
    fn test_same_seed_same_tabletop() {
        let a = build(42);
        let b = build(42);
        assert_eq!(a.entities(), b.entities());
        assert_eq!(a.groups(), b.groups());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_missing_tables_are_empty() {
        let tabletop = Tabletop::build(SessionConfig::new(3).with_seed(1), &InMemoryTables::new()).unwrap();
        assert!(tabletop.entities().is_empty());
        assert!(tabletop.groups().is_empty());
        assert_eq!(tabletop.decks().iter().count(), 2 + 3);
        assert_eq!(tabletop.save_layout(), SaveLayout::new(false, 0, 3));
    }

    #[test]
    fn test_mines_table_enables_mine_deck() {
        let tables = tables().with(TableKind::Mines, "Name,Defence,Count\nShaft,3,2\n");
        let tabletop = Tabletop::build(SessionConfig::new(2).with_seed(5), &tables).unwrap();

        assert!(tabletop.has_mines());
        assert_eq!(tabletop.decks().get(DeckKind::Mine).map(|d| d.len()), Some(2));
        assert!(tabletop.save_layout().has_mines);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Tabletop::build(SessionConfig::new(0), &tables());
        assert!(matches!(result, Err(ConfigError::PlayerCount(0))));
    }

    #[test]
    fn test_apply_save_round_trip() {
        let mut tabletop = build(3);
        let id = tabletop.decks().main.cards()[0];
        tabletop.entity_mut(id).unwrap().position.x = 40.0;
        let bytes = tabletop.encode().unwrap();

        let mut fresh = build(3);
        let report = fresh.apply_save(&bytes).unwrap();

        assert_eq!(report.applied, fresh.entities().len());
        assert_eq!(report.groups_restored, 2);
        assert_eq!(fresh.entities(), tabletop.entities());
    }

    #[test]
    fn test_restore_from_missing_slot_keeps_defaults() {
        let mut tabletop = build(4);
        let before = tabletop.entities().to_vec();
        let slot = SaveSlot::new(std::env::temp_dir().join("depths-state-no-such-dir").join("none.sav"));

        let report = tabletop.restore_from(&slot);

        assert!(report.is_empty());
        assert_eq!(report.defaulted, before.len());
        assert_eq!(tabletop.entities(), before.as_slice());
    }
}
